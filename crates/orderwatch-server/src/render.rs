//! HTML rendering for the order page.
//!
//! Every piece of upstream text passes through [`escape_html`] before it is
//! written into the page.

use orderwatch_client::nested::parse_embedded_container;
use orderwatch_core::{OrderSummary, PLACEHOLDER};
use serde_json::Value;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin-bottom:2rem}\
th,td{border:1px solid #ccc;padding:.35rem .75rem;text-align:left;vertical-align:top}\
th{background:#f5f5f5;white-space:nowrap}\
dl{margin:0}dt{font-weight:bold}dd{margin:0 0 .35rem 1rem}\
ol{margin:0;padding-left:1.25rem}";

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Appends the HTML for an arbitrary JSON value to `out`.
///
/// Objects become definition lists and arrays ordered lists, both rendered
/// recursively. A string holding a JSON-encoded object or array is decoded
/// and rendered the same way. `null` shows as the placeholder.
pub fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str(PLACEHOLDER),
        Value::Bool(b) => out.push_str(&b.to_string()),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => match parse_embedded_container(s) {
            Some(inner) => render_value(&inner, out),
            None => out.push_str(&escape_html(s)),
        },
        Value::Array(items) => {
            out.push_str("<ol>");
            for item in items {
                out.push_str("<li>");
                render_value(item, out);
                out.push_str("</li>");
            }
            out.push_str("</ol>");
        }
        Value::Object(map) => {
            out.push_str("<dl>");
            for (key, item) in map {
                out.push_str("<dt>");
                out.push_str(&escape_html(key));
                out.push_str("</dt><dd>");
                render_value(item, out);
                out.push_str("</dd>");
            }
            out.push_str("</dl>");
        }
    }
}

fn summary_table(summary: &OrderSummary) -> String {
    let mut out = String::from("<table class=\"summary\">");
    for (label, value) in summary.lines() {
        out.push_str("<tr><th>");
        out.push_str(&escape_html(label));
        out.push_str("</th><td>");
        out.push_str(&escape_html(value));
        out.push_str("</td></tr>");
    }
    out.push_str("</table>");
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"zh-CN\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape_html(title)
    )
}

/// The full order page: summary table followed by the raw record.
#[must_use]
pub fn render_order_page(summary: &OrderSummary, raw: &Value) -> String {
    let mut body = String::from("<h1>订单进度</h1>");
    body.push_str(&summary_table(summary));
    body.push_str("<h2>原始数据</h2><div class=\"raw\">");
    render_value(raw, &mut body);
    body.push_str("</div>");
    document("订单进度", &body)
}

#[must_use]
pub fn render_error_page(message: &str) -> String {
    let body = format!(
        "<h1>订单数据获取失败</h1><p class=\"error\">{}</p>",
        escape_html(message)
    );
    document("订单数据获取失败", &body)
}
