//! Server-side HTML for the list view

use tasklist_core::list::{Item, ListName, SortMode};

/// One list ready to render, items already in display order
pub struct ListView<'a> {
    pub name: ListName,
    pub items: &'a [Item],
}

/// Render the full index page
pub fn index_page(lists: &[ListView<'_>], sort_by: &str) -> String {
    let mode = SortMode::from_query(sort_by);
    let query = sort_query(sort_by);

    let mut html = String::with_capacity(4096);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Task lists</title>\n\
         <link rel=\"stylesheet\" href=\"/public/styles.css\">\n\
         </head>\n<body>\n<main>\n<h1>Task lists</h1>\n",
    );

    push_add_form(&mut html, &query);
    push_sort_links(&mut html, mode);

    for list in lists {
        push_list(&mut html, list, &query);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

/// `?sortBy=<value>` with the value percent-encoded
pub fn sort_query(sort_by: &str) -> String {
    format!("?sortBy={}", urlencoding::encode(sort_by))
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn push_add_form(html: &mut String, query: &str) {
    html.push_str(&format!(
        "<section class=\"add\">\n<h2>New task</h2>\n\
         <form method=\"post\" action=\"/add{}\">\n\
         <label>Title <input type=\"text\" name=\"title\" required></label>\n\
         <label>Description <textarea name=\"description\"></textarea></label>\n\
         <label>List <select name=\"list\">",
        escape_html(query)
    ));
    for name in ListName::ALL {
        html.push_str(&format!("<option value=\"{0}\">{0}</option>", name));
    }
    html.push_str(
        "</select></label>\n\
         <label>Deadline <input type=\"date\" name=\"deadline\"></label>\n\
         <label>Estimated duration (min) <input type=\"number\" name=\"estimatedDuration\" min=\"0\"></label>\n\
         <label>Priority <input type=\"number\" name=\"priority\" value=\"1\" required></label>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n</section>\n",
    );
}

fn push_sort_links(html: &mut String, current: SortMode) {
    html.push_str("<nav class=\"sort\">Sort by:");
    for (mode, label) in [
        (SortMode::Natural, "added"),
        (SortMode::Importance, "importance"),
        (SortMode::Deadline, "deadline"),
    ] {
        let class = if mode == current { " class=\"active\"" } else { "" };
        html.push_str(&format!(
            " <a href=\"/{}\"{}>{}</a>",
            escape_html(&sort_query(mode.as_query())),
            class,
            label
        ));
    }
    html.push_str("</nav>\n");
}

fn push_list(html: &mut String, list: &ListView<'_>, query: &str) {
    html.push_str(&format!(
        "<section class=\"list\" id=\"list-{0}\">\n<h2>{0}</h2>\n",
        list.name
    ));

    if list.items.is_empty() {
        html.push_str("<p class=\"empty\">No tasks.</p>\n</section>\n");
        return;
    }

    html.push_str("<ul>\n");
    for item in list.items {
        html.push_str(&item_html(list.name, item, query));
    }
    html.push_str("</ul>\n</section>\n");
}

fn item_html(list: ListName, item: &Item, query: &str) -> String {
    let mut html = format!(
        "<li class=\"item\" data-id=\"{}\">\n<h3>{}</h3>\n",
        item.id,
        escape_html(&item.title)
    );
    if !item.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", escape_html(&item.description)));
    }

    html.push_str(&format!(
        "<dl>\n<dt>Priority</dt><dd class=\"priority\">{}</dd>\n",
        item.priority
    ));
    if let Some(deadline) = item.deadline {
        html.push_str(&format!(
            "<dt>Deadline</dt><dd class=\"deadline\">{}</dd>\n",
            deadline.format("%Y-%m-%d")
        ));
    }
    if let Some(minutes) = item.estimated_duration {
        html.push_str(&format!(
            "<dt>Estimated duration</dt><dd class=\"duration\">{} min</dd>\n",
            minutes
        ));
    }
    html.push_str("</dl>\n");

    html.push_str(&format!(
        "<form method=\"post\" action=\"/delete{}\">\
         <input type=\"hidden\" name=\"id\" value=\"{}\">\
         <input type=\"hidden\" name=\"list\" value=\"{}\">\
         <button type=\"submit\">Delete</button></form>\n</li>\n",
        escape_html(query),
        item.id,
        list
    ));
    html
}
