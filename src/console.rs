//! Plain-text rendering of a response for the terminal.

use crate::http::response::Response;

/// Renders `response` as a two column table: status code and body.
///
/// JSON bodies are pretty-printed; anything else is shown as received.
pub fn render_response(title: &str, response: &Response) -> String {
    let status = format!(
        "{} {} ({})",
        response.status,
        response.status_message,
        if response.status.is_success() { "ok" } else { "error" }
    );
    let body = format_body(&response.body);

    let status_width = status.chars().count().max("Status Code".len());
    let body_width = body
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max("Response Body".len());

    let rule = format!("+-{}-+-{}-+\n", "-".repeat(status_width), "-".repeat(body_width));

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push_str(&row("Status Code", status_width, "Response Body", body_width));
    out.push_str(&rule);

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("");
    out.push_str(&row(&status, status_width, first, body_width));
    for line in lines {
        out.push_str(&row("", status_width, line, body_width));
    }
    out.push_str(&rule);
    out
}

fn row(left: &str, left_width: usize, right: &str, right_width: usize) -> String {
    format!("| {left:<left_width$} | {right:<right_width$} |\n")
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(err) => {
            tracing::warn!(%err, "failed to decode response body as JSON");
            body.to_string()
        }
    }
}
