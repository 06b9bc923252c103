//! Task list pages
//!
//! The index view and the two form endpoints that change a list.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{debug, error, info};

use tasklist_core::list::{ListName, SortMode};

use crate::command::{parse_delete, AddItemCommand, AddItemForm, DeleteItemForm};
use crate::render::{self, ListView};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl SortQuery {
    fn value(&self) -> &str {
        self.sort_by.as_deref().unwrap_or_default()
    }

    /// Back to the index, keeping the caller's sort mode
    fn redirect(&self) -> Redirect {
        Redirect::to(&format!("/{}", render::sort_query(self.value())))
    }

    /// An unreadable query string falls back to stored order
    fn or_default(query: Result<Query<Self>, QueryRejection>) -> Self {
        match query {
            Ok(Query(query)) => query,
            Err(rejection) => {
                debug!("Ignoring query string: {}", rejection.body_text());
                Self::default()
            }
        }
    }
}

type PlainError = (StatusCode, String);

fn invalid_data(reason: impl std::fmt::Display) -> PlainError {
    debug!("Rejected new item: {}", reason);
    (StatusCode::BAD_REQUEST, format!("Invalid data: {}", reason))
}

fn store_failure(message: &str, err: tasklist_core::Error) -> PlainError {
    error!("{}: {}", message, err);
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

/// GET / - Render both lists
async fn index(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Html<String>, PlainError> {
    let query = SortQuery::or_default(query);
    let mode = SortMode::from_query(query.value());

    let mut lists = Vec::with_capacity(ListName::ALL.len());
    for name in ListName::ALL {
        let mut list = state
            .list_store()
            .find_or_create(name)
            .await
            .map_err(|e| store_failure("Failed to load tasks", e))?;
        mode.apply(&mut list.items);
        lists.push(list);
    }

    let views: Vec<ListView<'_>> = lists
        .iter()
        .map(|list| ListView {
            name: list.name,
            items: &list.items,
        })
        .collect();

    Ok(Html(render::index_page(&views, query.value())))
}

/// POST /add - Append an item to a list
async fn add_item(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
    form: Result<Form<AddItemForm>, FormRejection>,
) -> Result<Redirect, PlainError> {
    let query = SortQuery::or_default(query);
    let Form(form) = form.map_err(|rejection| invalid_data(rejection.body_text()))?;
    let command = AddItemCommand::parse(form).map_err(|e| match e {
        tasklist_core::Error::InvalidInput(reason) => invalid_data(reason),
        other => invalid_data(other),
    })?;

    let list = command.list;
    let item = command.into_item();
    let item_id = item.id;

    state
        .list_store()
        .push_item(list, item)
        .await
        .map_err(|e| store_failure("Failed to save task", e))?;

    info!("Added item {} to list {}", item_id, list);
    Ok(query.redirect())
}

/// POST /delete - Remove an item; unknown items are ignored
async fn delete_item(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
    form: Result<Form<DeleteItemForm>, FormRejection>,
) -> Result<Redirect, PlainError> {
    let query = SortQuery::or_default(query);
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Unreadable delete form: {}", rejection.body_text());
            return Ok(query.redirect());
        }
    };
    let Some((list, id)) = parse_delete(form) else {
        debug!("Delete request names no existing item");
        return Ok(query.redirect());
    };

    let removed = state
        .list_store()
        .remove_item(list, id)
        .await
        .map_err(|e| store_failure("Failed to delete task", e))?;

    if removed {
        info!("Deleted item {} from list {}", id, list);
    } else {
        debug!("Item {} not found in list {}", id, list);
    }
    Ok(query.redirect())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add_item))
        .route("/delete", post(delete_item))
}
