use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::slot::Slot;

static DOCTOR_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-d(\d+)\.html$").expect("valid doctor code regex"));

static DOCTOR_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+)-d\d+\.html$").expect("valid doctor slug regex"));

static TITLE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*-\s*navstevalekara\.sk.*$").expect("valid title suffix regex")
});

// get_order('2025-12-30', 2, '09:00', 20, false)
static GET_ORDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"get_order\('([^']+)',\s*\d+,\s*'([^']+)'").expect("valid get_order regex")
});

static DAY_COLUMN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.day-col").expect("valid day column selector"));

static AVAILABLE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href="javascript:;"]"#).expect("valid slot link selector")
});

static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid heading selector"));

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// Extracts the doctor code from a doctor page URL ending in `-d<digits>.html`.
pub fn extract_doctor_code(url: &str) -> Option<String> {
    DOCTOR_CODE_RE
        .captures(url.trim())
        .map(|captures| captures[1].to_string())
}

/// Display name derived from the URL slug, used when the page itself
/// cannot be fetched or has no usable heading.
pub fn doctor_name_from_url(url: &str, doctor_code: &str) -> String {
    match DOCTOR_SLUG_RE.captures(url.trim()) {
        Some(captures) => captures[1]
            .split('-')
            .filter(|word| !word.is_empty())
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" "),
        None => format!("Doctor {}", doctor_code),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Reads the doctor's name from their page: the first `<h1>`, falling back
/// to the page title without the site suffix.
pub fn parse_doctor_name(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(heading) = document.select(&HEADING).next() {
        let text = collapse_whitespace(&heading.text().collect::<String>());
        if !text.is_empty() {
            return Some(text);
        }
    }

    let title = document.select(&TITLE).next()?;
    let text = collapse_whitespace(&title.text().collect::<String>());
    let text = TITLE_SUFFIX_RE.replace(&text, "").trim().to_string();

    (!text.is_empty()).then_some(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a weekly availability fragment and returns only the open slots.
///
/// Open slots are links carrying a `get_order(...)` click handler; reserved
/// slots are rendered as plain spans and never match.
pub fn parse_available_slots(html: &str) -> Vec<Slot> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let document = Html::parse_fragment(html);
    let mut slots = Vec::new();

    for column in document.select(&DAY_COLUMN) {
        for link in column.select(&AVAILABLE_LINK) {
            let Some(onclick) = link.value().attr("onclick") else {
                continue;
            };
            if !onclick.contains("get_order") {
                continue;
            }

            match parse_get_order(onclick) {
                Some(slot) => slots.push(slot),
                None => tracing::debug!("Skipping unparseable slot handler: {}", onclick),
            }
        }
    }

    slots
}

fn parse_get_order(onclick: &str) -> Option<Slot> {
    let captures = GET_ORDER_RE.captures(onclick)?;
    let date = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(&captures[2], "%H:%M").ok()?;
    Some(Slot::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_HTML: &str = r#"
        <div class="calendar">
          <div class="day-col">
            <div class="day-head">Po 29.12.</div>
            <span class="reserved">08:00</span>
            <a href="javascript:;" onclick="get_order('2025-12-29', 1, '08:30', 20, false)">08:30</a>
          </div>
          <div class="day-col">
            <div class="day-head">Ut 30.12.</div>
            <a href="javascript:;" onclick="get_order('2025-12-30', 2, '09:00', 20, false)">09:00</a>
            <a href="javascript:;" onclick="show_info()">info</a>
            <a href="/elsewhere" onclick="get_order('2025-12-30', 2, '11:00', 20, false)">11:00</a>
            <span class="reserved">10:00</span>
          </div>
          <a href="javascript:;" onclick="get_order('2025-12-31', 3, '07:00', 20, false)">outside</a>
        </div>
    "#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_parse_available_slots_only_returns_open_links() {
        let slots = parse_available_slots(WEEK_HTML);
        assert_eq!(
            slots,
            vec![
                Slot::new(date("2025-12-29"), time("08:30")),
                Slot::new(date("2025-12-30"), time("09:00")),
            ]
        );
    }

    #[test]
    fn test_parse_available_slots_empty_input() {
        assert!(parse_available_slots("").is_empty());
        assert!(parse_available_slots("   ").is_empty());
    }

    #[test]
    fn test_parse_available_slots_skips_malformed_handlers() {
        let html = r#"<div class="day-col">
            <a href="javascript:;" onclick="get_order('not-a-date', 1, '08:30', 20, false)">x</a>
            <a href="javascript:;" onclick="get_order('2025-12-29', 1, '25:99', 20, false)">y</a>
            <a href="javascript:;">z</a>
        </div>"#;
        assert!(parse_available_slots(html).is_empty());
    }

    #[test]
    fn test_extract_doctor_code() {
        assert_eq!(
            extract_doctor_code("https://www.navstevalekara.sk/lekar/mudr-jana-novakova-d15313.html"),
            Some("15313".to_string())
        );
        assert_eq!(
            extract_doctor_code("https://www.navstevalekara.sk/x/ambulancia-d84.html"),
            Some("84".to_string())
        );
        assert_eq!(extract_doctor_code("https://www.navstevalekara.sk/lekar/d15313"), None);
        assert_eq!(extract_doctor_code("https://example.com/page-d12.htm"), None);
    }

    #[test]
    fn test_doctor_name_from_url() {
        assert_eq!(
            doctor_name_from_url("https://www.navstevalekara.sk/lekar/mudr-jana-novakova-d15313.html", "15313"),
            "Mudr Jana Novakova"
        );
        assert_eq!(doctor_name_from_url("https://example.com/-d84.html", "84"), "Doctor 84");
    }

    #[test]
    fn test_parse_doctor_name_prefers_heading() {
        let html = "<html><head><title>Ignored - navstevalekara.sk</title></head>\
                    <body><h1>  MUDr. Jana   Nováková </h1></body></html>";
        assert_eq!(parse_doctor_name(html), Some("MUDr. Jana Nováková".to_string()));
    }

    #[test]
    fn test_parse_doctor_name_falls_back_to_title() {
        let html = "<html><head><title>MUDr. Peter Horák - NavstevaLekara.sk | objednanie</title></head>\
                    <body><p>no heading</p></body></html>";
        assert_eq!(parse_doctor_name(html), Some("MUDr. Peter Horák".to_string()));
    }

    #[test]
    fn test_parse_doctor_name_missing() {
        assert_eq!(parse_doctor_name("<html><body><p>nothing</p></body></html>"), None);
    }
}
