//! Server-rendered admin pages.

use axum::{extract::State, response::Html};
use serde_json::Value;

use super::{
    auth::AdminSession,
    error::ApiError,
    leads,
    state::{AppState, with_store},
};

const PAGE_STYLE: &str = "\
body { font-family: Arial, sans-serif; background: #fff; margin: 0; padding: 20px; }
.container { max-width: 800px; margin: auto; }
.logout { margin-top: 20px; padding: 10px 20px; background-color: #4285F4; color: white; border: none; border-radius: 4px; cursor: pointer; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; }";

const LOGOUT_SCRIPT: &str = "\
function logout() {
  fetch('/api/logout', { method: 'POST' })
    .finally(() => { window.location.href = '/login.html'; });
}";

/// Escape text for an HTML text node or quoted attribute.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
{PAGE_STYLE}
  </style>
</head>
<body>
  <div class="container">
{body}
    <button class="logout" onclick="logout()">Logout</button>
  </div>
  <script>
{LOGOUT_SCRIPT}
  </script>
</body>
</html>
"#
    )
}

/// `GET /admin`
pub async fn panel(AdminSession(session): AdminSession) -> Html<String> {
    let body = format!(
        "    <h1>Welcome to the Admin Panel</h1>\n    <p>Signed in as {}.</p>\n    <p><a href=\"/admin/leads\">Leads</a></p>",
        escape_html(&session.username)
    );
    Html(layout("Admin Panel", &body))
}

/// `GET /admin/leads`
pub async fn leads_table(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Html<String>, ApiError> {
    let leads = with_store(&state.leads, leads::load_all).await?;

    let body = format!(
        "    <h1>Leads</h1>\n{}",
        render_table(&leads)
    );
    Ok(Html(layout("Leads", &body)))
}

/// Column names across all rows, in first-seen order.
fn columns(rows: &[leads::Lead]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for name in rows.iter().flat_map(|row| row.keys()) {
        if !columns.contains(&name.as_str()) {
            columns.push(name);
        }
    }
    columns
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_table(rows: &[leads::Lead]) -> String {
    if rows.is_empty() {
        return "    <p>No leads yet.</p>".to_string();
    }

    let columns = columns(rows);
    let mut html = String::from("    <table>\n      <tr>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n");

    for row in rows {
        html.push_str("      <tr>");
        for column in &columns {
            let text = cell_text(row.get(*column));
            html.push_str(&format!("<td>{}</td>", escape_html(&text)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("    </table>");
    html
}
