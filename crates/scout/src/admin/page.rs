use super::handler::PURGE_ACTION;
use crate::notice::escape_html;
use reqwest::Url;

// Only the path and query of this are ever emitted.
const ACTION_BASE: &str = "http://localhost/admin-post.php";

/// Path and query of the purge action returning to `referer`, with the
/// referer percent-encoded as a query component.
pub fn purge_action_href(referer: &str) -> String {
    let Ok(mut url) = Url::parse(ACTION_BASE) else {
        return format!("/admin-post.php?action={PURGE_ACTION}");
    };
    url.query_pairs_mut()
        .append_pair("action", PURGE_ACTION)
        .append_pair("_wp_http_referer", referer);
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// The "Scout" toolbar entry with its single "Refresh Scout cache" child.
pub fn render_toolbar(referer: &str) -> String {
    format!(
        concat!(
            r#"<ul id="wp-admin-bar-cloudabove-scout" class="ab-top-menu">"#,
            r##"<li><a class="ab-item" href="#" title="Scout">Scout</a>"##,
            r#"<ul class="ab-submenu"><li id="wp-admin-bar-cloudabove-scout-cache">"#,
            r#"<a class="ab-item" href="{}" title="Purge Scout cache">Refresh Scout cache</a>"#,
            "</li></ul></li></ul>"
        ),
        escape_html(&purge_action_href(referer))
    )
}

pub fn render_page(toolbar: Option<&str>, notices: &[String]) -> String {
    let mut body = String::new();
    if let Some(toolbar) = toolbar {
        body.push_str(r#"<div id="wpadminbar">"#);
        body.push_str(toolbar);
        body.push_str("</div>");
    }
    for notice in notices {
        body.push_str(notice);
    }
    format!("<!DOCTYPE html><html><head><title>Scout</title></head><body>{body}</body></html>")
}
