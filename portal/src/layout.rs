use axum::http::StatusCode;
use axum::response::Html;

use crate::components::navbar::{NavTarget, NavbarState};

const STYLE: &str = "\
body{font-family:sans-serif;margin:0}\
nav{background:#24303b;padding:0.6rem 1rem}\
nav a{color:#cfd8de;margin-right:1.25rem;text-decoration:none}\
nav a.active{color:#fff;font-weight:bold}\
main{padding:1rem;max-width:60rem}\
label{display:block;margin-top:0.5rem}\
.notice{padding:0.5rem 0.75rem;border:1px solid;margin:0.5rem 0}\
.notice.success{border-color:#2e7d32;background:#e8f5e9}\
.notice.error{border-color:#c62828;background:#ffebee}\
table{border-collapse:collapse;margin-top:1rem}\
td,th{border:1px solid #9aa5ad;padding:0.3rem 0.8rem;text-align:left}";

/// Escapes text for both element and attribute positions.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page shell. Every handler funnels its body through here, so the
/// navbar is written exactly once per response and only one link can
/// carry the active marker.
pub fn page(title: &str, active: Option<NavTarget>, body: &str) -> Html<String> {
    let mut navbar = NavbarState::default();
    if let Some(target) = active {
        navbar.set_active(target.element_id());
    }
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - LOSAP Hours</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{}\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        escape(title),
        navbar.render(),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    page(
        "Error",
        None,
        &format!(
            "<h2>{} {}</h2>\n<p>{}</p>",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            escape(message)
        ),
    )
}
