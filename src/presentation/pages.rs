// HTML and SVG response builders
//
// Every response carries the no-cache headers; monitoring pages go stale in
// seconds and proxies must not hold them. Error pages append request-scoped
// debug notes collected by the handler, so diagnostics stay per request.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

const CACHE_CONTROL: &str = "no-cache, must-revalidate";
const EXPIRES: &str = "Sat, 26 Jul 1997 05:00:00 GMT";

pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_document(title: &str, body: &str, notes: &[String]) -> String {
    let mut doc = format!(
        "<!DOCTYPE html>\n<html>\n <head>\n   <title>{}</title>\n </head>\n <body><div>\n{}\n</div>\n",
        html_escape(title),
        body
    );
    if !notes.is_empty() {
        doc.push_str("  <ul>\n");
        for note in notes {
            doc.push_str(&format!("    <li>{}</li>\n", html_escape(note)));
        }
        doc.push_str("  </ul>\n");
    }
    doc.push_str(" </body>\n</html>\n");
    doc
}

fn no_cache_headers() -> [(header::HeaderName, &'static str); 2] {
    [
        (header::CACHE_CONTROL, CACHE_CONTROL),
        (header::EXPIRES, EXPIRES),
    ]
}

pub fn msg_page(title: &str, body: &str, notes: &[String]) -> Response {
    (
        StatusCode::OK,
        no_cache_headers(),
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html_document(title, body, notes),
    )
        .into_response()
}

pub fn err_page(status: StatusCode, message: &str, notes: &[String]) -> Response {
    let heading = format!("  <h1>{}</h1>", html_escape(message));
    (
        status,
        no_cache_headers(),
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html_document(message, &heading, notes),
    )
        .into_response()
}

pub fn not_found(notes: &[String]) -> Response {
    err_page(StatusCode::NOT_FOUND, "404 Not Found", notes)
}

pub fn internal_error(notes: &[String]) -> Response {
    err_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
        notes,
    )
}

pub fn svg_response(svg: String) -> Response {
    (
        StatusCode::OK,
        no_cache_headers(),
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
        .into_response()
}

pub fn empty_ok() -> Response {
    (StatusCode::OK, no_cache_headers()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_page_sets_no_cache() {
        let response = msg_page("Uptime", "<div>ok</div>", &[]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_CONTROL
        );
    }

    #[test]
    fn test_err_page_status_and_title() {
        let response = not_found(&["no samples".to_string()]);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_document_escapes_notes() {
        let doc = html_document("t", "", &["<script>".to_string()]);
        assert!(doc.contains("&lt;script&gt;"));
        assert!(!doc.contains("<script>"));
    }
}
