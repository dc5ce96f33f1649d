//! HTML notification emails sent to the business inbox. Plain string
//! assembly; every submitted value is escaped before interpolation.

use crate::forms::{ApplicationRequest, QuoteRequest};

const BRAND_NAME: &str = "Lone Star Fence & Ironworks";
const BRAND_COLOR: &str = "#1f3a5f";
const ACCENT_COLOR: &str = "#c57b2e";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn quote_subject(req: &QuoteRequest) -> String {
    format!(
        "New quote request: {} ({})",
        req.service.as_deref().unwrap_or("General inquiry"),
        req.name.as_deref().unwrap_or("Unknown")
    )
}

pub fn application_subject(req: &ApplicationRequest) -> String {
    format!(
        "New job application: {} ({})",
        req.position.as_deref().unwrap_or("Unspecified position"),
        req.name.as_deref().unwrap_or("Unknown")
    )
}

fn header(title: &str) -> String {
    format!(
        "<div style=\"font-family:Arial,Helvetica,sans-serif;max-width:600px;margin:0 auto;\">\
         <div style=\"background:{BRAND_COLOR};padding:20px 24px;\">\
         <h1 style=\"color:#ffffff;font-size:20px;margin:0;\">{BRAND_NAME}</h1>\
         <p style=\"color:{ACCENT_COLOR};font-size:14px;margin:4px 0 0;\">{title}</p>\
         </div><div style=\"padding:24px;background:#f7f7f5;\">"
    )
}

fn footer() -> &'static str {
    "</div><div style=\"padding:12px 24px;background:#ebebe8;font-size:12px;color:#666;\">\
     Sent automatically from the website contact forms.</div></div>"
}

fn field_row(label: &str, value: &str) -> String {
    format!(
        "<p style=\"margin:0 0 10px;\"><strong style=\"color:{BRAND_COLOR};\">{label}:</strong> {}</p>",
        escape_html(value)
    )
}

pub fn render_quote_email(req: &QuoteRequest) -> String {
    let mut html = header("New quote request");
    html.push_str(&field_row("Name", req.name.as_deref().unwrap_or("")));
    html.push_str(&field_row("Phone", req.phone.as_deref().unwrap_or("")));
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty()) {
        html.push_str(&field_row("Email", email));
    }
    html.push_str(&field_row(
        "Service",
        req.service.as_deref().unwrap_or(""),
    ));
    if let Some(message) = req.message.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&field_row("Message", message));
    }
    html.push_str(footer());
    html
}

pub fn render_application_email(req: &ApplicationRequest, resume_attached: bool) -> String {
    let mut html = header("New job application");
    html.push_str(&field_row("Name", req.name.as_deref().unwrap_or("")));
    html.push_str(&field_row("Phone", req.phone.as_deref().unwrap_or("")));
    html.push_str(&field_row("Email", req.email.as_deref().unwrap_or("")));
    html.push_str(&field_row(
        "Position",
        req.position.as_deref().unwrap_or(""),
    ));
    if let Some(message) = req.message.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&field_row("Message", message));
    }
    if resume_attached {
        html.push_str(&field_row(
            "Resume",
            req.resume_filename.as_deref().unwrap_or("attached"),
        ));
    } else {
        html.push_str("<p style=\"margin:0 0 10px;color:#666;\">No resume attached.</p>");
    }
    html.push_str(footer());
    html
}
