//! Server-rendered pages for every path outside of the API.
//!
//! The home page renders in its loading state and fetches [`API_ENDPOINT`]
//! from the browser, replacing the loading message with either the record
//! or the error. Any other path renders the not found page.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
    routing::get,
    Router,
};

/// Path the home page loads its data from
pub const API_ENDPOINT: &str = "/api";

static LAYOUT: &str = include_str!("../templates/layout.html");
static HOME: &str = include_str!("../templates/home.html");
static NOT_FOUND: &str = include_str!("../templates/not_found.html");

/// Pre-rendered pages, rendered once when the router is built
#[derive(Clone)]
struct Pages {
    home: Arc<str>,
    not_found: Arc<str>,
}

impl Pages {
    fn render(title: &str) -> Pages {
        let title = escape(title);
        let page = |content: &str| -> Arc<str> {
            render(
                LAYOUT,
                &[("content", content.trim_end()), ("title", title.as_str())],
            )
            .into()
        };

        Pages {
            home: page(&render(HOME, &[("endpoint", API_ENDPOINT)])),
            not_found: page(NOT_FOUND),
        }
    }
}

/// Build the page router
pub fn router(settings: &scaffold_config::Client) -> Router {
    Router::new()
        .route("/", get(home))
        .fallback(not_found)
        .with_state(Pages::render(&settings.title))
}

async fn home(State(pages): State<Pages>) -> Html<String> {
    Html(pages.home.to_string())
}

async fn not_found(uri: Uri, State(pages): State<Pages>) -> (StatusCode, Html<String>) {
    tracing::debug!("No page for {uri}");
    (StatusCode::NOT_FOUND, Html(pages.not_found.to_string()))
}

/// Substitute `{{key}}` placeholders
fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |output, (key, value)| {
            output.replace(&format!("{{{{{key}}}}}"), value)
        })
}

/// Escape text for use in HTML content and attributes
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
