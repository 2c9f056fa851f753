use serde::Serialize;
use tera::{Context, Tera};

use super::notification_models::SlotAlert;

const EMAIL_HTML_TEMPLATE: &str = include_str!("../../templates/email_notification.html");
const EMAIL_TEXT_TEMPLATE: &str = include_str!("../../templates/email_notification.txt");

/// Escapes text for Telegram MarkdownV2.
/// Characters to escape: _ * [ ] ( ) ~ ` > # + - = | { } . ! \
fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
            | '{' | '}' | '.' | '!' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Inside the `(...)` part of an inline link only `)` and `\` are reserved.
fn escape_markdown_v2_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Message body for Telegram, formatted as MarkdownV2.
pub fn telegram_text(alert: &SlotAlert) -> String {
    let doctor_link = format!(
        "[{}]({})",
        escape_markdown_v2(&alert.doctor_name),
        escape_markdown_v2_url(&alert.doctor_url)
    );

    match alert.slots.as_slice() {
        [slot] => format!(
            "{}\n\nSlot: {} \\- OPEN",
            doctor_link,
            escape_markdown_v2(&slot.to_string())
        ),
        slots => {
            let mut message = format!("{}\n\nFound {} slots:\n\n", doctor_link, slots.len());
            for slot in slots {
                message.push_str(&format!("• {}\n", escape_markdown_v2(&slot.to_string())));
            }
            message
        }
    }
}

pub fn email_subject(alert: &SlotAlert) -> String {
    match alert.slots.len() {
        1 => format!("1 new slot at {}", alert.doctor_name),
        n => format!("{} new slots at {}", n, alert.doctor_name),
    }
}

#[derive(Serialize)]
struct SlotRow {
    date: String,
    time: String,
}

fn email_context(alert: &SlotAlert) -> Context {
    let slots: Vec<SlotRow> = alert
        .slots
        .iter()
        .map(|slot| SlotRow {
            date: slot.date_label(),
            time: slot.time_label(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("doctor_name", &alert.doctor_name);
    context.insert("doctor_url", &alert.doctor_url);
    context.insert("count", &alert.slots.len());
    context.insert("slots", &slots);
    context
}

pub fn email_text(alert: &SlotAlert) -> Result<String, tera::Error> {
    Tera::one_off(EMAIL_TEXT_TEMPLATE, &email_context(alert), false)
}

pub fn email_html(alert: &SlotAlert) -> Result<String, tera::Error> {
    Tera::one_off(EMAIL_HTML_TEMPLATE, &email_context(alert), true)
}
