//! Item ordering for the list view
//!
//! Both sorts are stable and work on copies of a list's items; the stored
//! order is never changed.

use std::cmp::Ordering;

use super::model::Item;

/// How the list view orders items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending priority
    Importance,
    /// Earliest deadline first, items without one last
    Deadline,
    /// Insertion order
    #[default]
    Natural,
}

impl SortMode {
    /// Map the `sortBy` query value; anything unrecognized keeps stored order
    pub fn from_query(value: &str) -> Self {
        match value {
            "importance" => Self::Importance,
            "deadline" => Self::Deadline,
            _ => Self::Natural,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Importance => "importance",
            Self::Deadline => "deadline",
            Self::Natural => "",
        }
    }

    pub fn apply(&self, items: &mut [Item]) {
        match self {
            Self::Importance => sort_by_priority(items),
            Self::Deadline => sort_by_deadline(items),
            Self::Natural => {}
        }
    }
}

/// Sort by ascending priority, keeping ties in their original order
pub fn sort_by_priority(items: &mut [Item]) {
    items.sort_by_key(|item| item.priority);
}

/// Sort by deadline with absent deadlines last
pub fn sort_by_deadline(items: &mut [Item]) {
    items.sort_by(compare_deadlines);
}

pub fn compare_deadlines(a: &Item, b: &Item) -> Ordering {
    match (&a.deadline, &b.deadline) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
