//! List model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Name of one of the fixed task lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    General,
    Work,
}

impl ListName {
    /// Every list, in display order
    pub const ALL: [ListName; 2] = [ListName::General, ListName::Work];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Work => "work",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "work" => Ok(Self::Work),
            other => Err(Error::InvalidInput(format!("Unknown list: {}", other))),
        }
    }
}

/// A task in one of the lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub estimated_duration: Option<u32>,
    pub priority: i32,
}

impl Item {
    /// Create a new item with a fresh id
    pub fn new(title: impl Into<String>, priority: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            deadline: None,
            estimated_duration: None,
            priority,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the estimated duration
    pub fn with_estimated_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration = Some(minutes);
        self
    }
}

/// A named list document holding items in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub name: ListName,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TaskList {
    /// Create an empty list
    pub fn new(name: ListName) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    /// Append an item at the end
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove the item with the given id, returning it if it was present
    pub fn remove(&mut self, id: Uuid) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}
