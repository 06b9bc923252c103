//! Typed commands parsed from the HTML forms
//!
//! Browsers send every field as text. The raw forms keep them that way so a
//! bad value is reported as invalid input instead of a body rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use tasklist_core::list::{Item, ListName};
use tasklist_core::{Error, Result};

/// Body of `POST /add`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub list: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Body of `POST /delete`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteItemForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub list: Option<String>,
}

/// A validated request to append an item to a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemCommand {
    pub list: ListName,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub estimated_duration: Option<u32>,
    pub priority: i32,
}

impl AddItemCommand {
    pub fn parse(form: AddItemForm) -> Result<Self> {
        let list = non_empty(form.list)
            .ok_or_else(|| Error::InvalidInput("list is required".to_string()))?
            .parse::<ListName>()?;

        let priority = non_empty(form.priority)
            .ok_or_else(|| Error::InvalidInput("priority is required".to_string()))?;
        let priority = priority
            .parse::<i32>()
            .map_err(|_| Error::InvalidInput(format!("priority is not an integer: {}", priority)))?;

        let deadline = non_empty(form.deadline)
            .map(|raw| parse_deadline(&raw))
            .transpose()?;

        let estimated_duration = non_empty(form.estimated_duration)
            .map(|raw| parse_duration(&raw))
            .transpose()?
            .flatten();

        Ok(Self {
            list,
            title: form.title.unwrap_or_default().trim().to_string(),
            description: form.description.unwrap_or_default().trim().to_string(),
            deadline,
            estimated_duration,
            priority,
        })
    }

    pub fn into_item(self) -> Item {
        let mut item = Item::new(self.title, self.priority).with_description(self.description);
        item.deadline = self.deadline;
        item.estimated_duration = self.estimated_duration;
        item
    }
}

/// A delete target; `None` when the form names no existing item
pub fn parse_delete(form: DeleteItemForm) -> Option<(ListName, Uuid)> {
    let list = non_empty(form.list)?.parse::<ListName>().ok()?;
    let id = non_empty(form.id)?.parse::<Uuid>().ok()?;
    Some((list, id))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts a date input value (`YYYY-MM-DD`, midnight UTC) or an RFC 3339 timestamp
fn parse_deadline(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidInput(format!("deadline is not a date: {}", raw)))
}

/// Zero and negative durations are treated as not given
fn parse_duration(raw: &str) -> Result<Option<u32>> {
    let minutes = raw
        .parse::<i64>()
        .map_err(|_| Error::InvalidInput(format!("estimatedDuration is not an integer: {}", raw)))?;
    if minutes <= 0 {
        return Ok(None);
    }
    u32::try_from(minutes)
        .map(Some)
        .map_err(|_| Error::InvalidInput(format!("estimatedDuration is too large: {}", raw)))
}
