//! Lenient decoding of extraction responses into candidate transactions.
//!
//! The extraction service is asked for a single JSON object but may answer
//! with prose around it, partial JSON, or nothing usable at all. Decoding is
//! therefore per-field with defaults: a field the response is missing or
//! that cannot be parsed becomes empty (or `0.0`/`None`) instead of failing
//! the upload. The candidate is reviewed by a human before anything is
//! saved, so leniency here loses no data.

use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::models::CandidateTransaction;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DAY_FIRST_DATE: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]/[year]");
const MONTH_FIRST_DATE: &[BorrowedFormatItem<'_>] = format_description!("[month]/[day]/[year]");

/// Decode the raw extraction response text into a candidate transaction.
///
/// Never fails: unusable responses produce a candidate with default fields.
pub fn parse_candidate(raw: &str) -> CandidateTransaction {
    let Some(object) = extract_json_object(raw) else {
        tracing::warn!("extraction response contained no JSON object: {raw:?}");
        return CandidateTransaction::default();
    };

    CandidateTransaction {
        label: string_field(&object, "label"),
        description: string_field(&object, "description"),
        date: date_field(&object),
        amount: amount_field(&object),
        currency: string_field(&object, "currency"),
        category: string_field(&object, "category"),
        business: string_field(&object, "business"),
    }
}

/// Find and parse the outermost JSON object in `raw`, which may be wrapped
/// in prose or a Markdown code fence.
fn extract_json_object(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;

    if end < start {
        return None;
    }

    serde_json::from_str(&raw[start..=end]).ok()
}

fn string_field(object: &Value, key: &str) -> String {
    match &object[key] {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn amount_field(object: &Value) -> f64 {
    match &object["amount"] {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        // Amounts often come back as text with a currency symbol or
        // thousands separators, e.g. "$1,234.56".
        Value::String(text) => {
            let digits: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();

            digits.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn date_field(object: &Value) -> Option<Date> {
    let text = object["date"].as_str()?.trim();

    parse_date(text).or_else(|| {
        // Timestamps like "2024-01-05T13:37:00" carry the date up front.
        text.get(..10).and_then(parse_date)
    })
}

fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text, ISO_DATE)
        .or_else(|_| Date::parse(text, DAY_FIRST_DATE))
        .or_else(|_| Date::parse(text, MONTH_FIRST_DATE))
        .ok()
}
