//! crates/club_dashboard_core/src/normalize.rs
//!
//! Maps the loosely shaped JSON returned by the backend into canonical
//! domain records. Every lookup walks an ordered list of accepted field
//! names and the first usable value wins; nothing in here returns an error.

use crate::domain::{AnswerPayload, LeaderboardRow, RefreshSummary};
use serde_json::Value;

/// Top-level keys that may hold the leaderboard list.
const LIST_KEYS: &[&str] = &["leaderboard"];
const NAME_FIELDS: &[&str] = &["member", "name"];
const DISTANCE_FIELDS: &[&str] = &["total_km", "distance"];
const ACTIVITY_FIELDS: &[&str] = &["activities"];
const ANSWER_FIELDS: &[&str] = &["answer", "response", "message"];
const REFERENCE_FIELDS: &[&str] = &["references", "refs", "sources"];
const DETAIL_FIELDS: &[&str] = &["detail"];
const REFRESH_ERROR_FIELDS: &[&str] = &["detail", "message"];

/// Shown when a row carries no usable name.
pub const NAME_PLACEHOLDER: &str = "-";

/// Maximum number of cards in the members view.
pub const MEMBERS_VIEW_LIMIT: usize = 12;

/// Returns the first value produced by `extract` over `fields`, in order.
fn first_match<'a, T>(
    raw: &'a Value,
    fields: &[&str],
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    fields
        .iter()
        .filter_map(|field| raw.get(*field))
        .find_map(extract)
}

fn non_empty_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| number(value).filter(|n| *n >= 0.0).map(|n| n as u64))
}

fn array_len(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

/// Normalizes the leaderboard list found in `raw`.
///
/// Ranks are assigned from list position. With `limit` set the list is cut
/// to that many rows before ranking; `None` keeps every row.
pub fn normalize_rows(raw: &Value, limit: Option<usize>) -> Vec<LeaderboardRow> {
    let Some(list) = first_match(raw, LIST_KEYS, Value::as_array) else {
        return Vec::new();
    };
    let take = limit.unwrap_or(list.len());

    list.iter()
        .take(take)
        .enumerate()
        .map(|(index, entry)| normalize_row(index + 1, entry))
        .collect()
}

fn normalize_row(rank: usize, entry: &Value) -> LeaderboardRow {
    let display_name = first_match(entry, NAME_FIELDS, non_empty_text)
        .unwrap_or_else(|| NAME_PLACEHOLDER.to_string());
    let total_distance_km = first_match(entry, DISTANCE_FIELDS, number)
        .unwrap_or(0.0)
        .max(0.0);
    let activity_count = first_match(entry, ACTIVITY_FIELDS, count).unwrap_or(0);

    LeaderboardRow {
        rank,
        display_name,
        total_distance_km,
        activity_count,
    }
}

/// Extracts the answer text and reference count from an `/ask` reply.
pub fn normalize_answer(raw: &Value) -> AnswerPayload {
    let text = first_match(raw, ANSWER_FIELDS, non_empty_text)
        .or_else(|| non_empty_text(raw))
        .unwrap_or_default();
    let reference_count = first_match(raw, REFERENCE_FIELDS, array_len).unwrap_or(0);

    AnswerPayload {
        text,
        reference_count,
    }
}

/// Builds the bot message shown for a successful `/ask` reply.
///
/// An empty answer becomes an em dash; references are listed as `[n]` labels.
pub fn answer_display_text(body: Option<&Value>) -> String {
    let Some(raw) = body.filter(|v| !v.is_null()) else {
        return "No response.".to_string();
    };
    let answer = normalize_answer(raw);
    let main = if answer.text.is_empty() {
        "—".to_string()
    } else {
        answer.text
    };
    if answer.reference_count == 0 {
        return main;
    }
    let labels = (1..=answer.reference_count)
        .map(|i| format!("[{}]", i))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}\n\nReferences: {}", main, labels)
}

/// The `detail` string of an error body, if any.
pub fn error_detail(body: Option<&Value>) -> Option<String> {
    body.and_then(|raw| first_match(raw, DETAIL_FIELDS, non_empty_text))
}

/// The reason carried by a failed refresh body (`detail`, then `message`).
pub fn refresh_error_reason(body: Option<&Value>) -> Option<String> {
    body.and_then(|raw| first_match(raw, REFRESH_ERROR_FIELDS, non_empty_text))
}

/// True when a 2xx refresh body still reports `"status": "error"`.
pub fn reports_error_status(body: Option<&Value>) -> bool {
    body.and_then(|raw| raw.get("status"))
        .and_then(Value::as_str)
        .is_some_and(|status| status.eq_ignore_ascii_case("error"))
}

pub fn refresh_summary(body: Option<&Value>) -> RefreshSummary {
    let read = |field: &str| {
        body.and_then(|raw| first_match(raw, &[field], count))
            .unwrap_or(0)
    };
    RefreshSummary {
        updated: read("updated"),
        skipped: read("skipped"),
    }
}
