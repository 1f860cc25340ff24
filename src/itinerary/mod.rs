//! Generated itinerary handling
//!
//! Itineraries come back from a text generator as "mostly JSON": wrapped in
//! Markdown fences, preceded by chatter, with fields that are sometimes a
//! string and sometimes an object. This module digs the JSON out and reduces
//! every field to display text through one explicit, lossy fallback chain.

use std::fmt;

use crate::models::ConfigValue;

/// Keys consulted, in order, when a mapping stands where text is expected
pub const TEXT_KEYS: &[&str] = &["text", "name", "title", "description", "content", "activity"];

const TIMELINE_KEYS: &[&str] = &["timeline", "activities", "items", "schedule"];
const DAY_TITLE_KEYS: &[&str] = &["title", "theme", "summary"];

/// Find a JSON document inside generator output
///
/// Tries, in order: the contents of the first fenced code block, the whole
/// text, the outermost `{...}` span and the outermost `[...]` span.
pub fn extract_json(text: &str) -> Option<ConfigValue> {
    let mut candidates = Vec::new();
    if let Some(fenced) = fenced_block(text) {
        candidates.push(fenced);
    }
    candidates.push(text.trim());
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let Some(span) = outer_span(text, open, close) {
            candidates.push(span);
        }
    }

    candidates
        .into_iter()
        .filter(|c| !c.is_empty())
        .find_map(|c| ConfigValue::parse(c).ok())
        .filter(|v| !v.is_null())
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    // Skip an info string such as `json`
    let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &rest[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Reduce any value to display text
///
/// Strings are returned as is, numbers and booleans printed, null is empty.
/// Lists join their coerced items with `", "`. A mapping yields the first
/// non-empty of [`TEXT_KEYS`], otherwise its `key: value` pairs joined with
/// `"; "`.
pub fn coerce_text(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => String::new(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Number(n) => n.to_string(),
        ConfigValue::String(s) => s.clone(),
        ConfigValue::List(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        ConfigValue::Map(map) => {
            let preferred = TEXT_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .map(coerce_text)
                .find(|s| !s.trim().is_empty());
            preferred.unwrap_or_else(|| {
                map.iter()
                    .map(|(k, v)| format!("{}: {}", k, coerce_text(v)))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
        }
    }
}

fn first_text(value: &ConfigValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .map(coerce_text)
        .find(|s| !s.trim().is_empty())
}

/// One entry of a day's timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub time: Option<String>,
    pub text: String,
}

/// One itinerary day, reduced to text
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryDay {
    pub title: String,
    pub entries: Vec<TimelineEntry>,
}

/// Display model of a stored itinerary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItineraryView {
    pub days: Vec<ItineraryDay>,
}

impl ItineraryView {
    /// Read days from `{"days": [...]}` or a top-level list
    ///
    /// Anything else yields an empty view.
    pub fn from_value(value: &ConfigValue) -> Self {
        let days = value
            .get("days")
            .and_then(ConfigValue::as_list)
            .or_else(|| value.as_list())
            .unwrap_or(&[]);

        Self {
            days: days
                .iter()
                .enumerate()
                .map(|(i, day)| read_day(i, day))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn read_day(index: usize, day: &ConfigValue) -> ItineraryDay {
    let fallback_title = format!("Day {}", index + 1);

    if !day.is_map() {
        let text = coerce_text(day);
        return ItineraryDay {
            title: if text.is_empty() { fallback_title } else { text },
            entries: Vec::new(),
        };
    }

    let title = first_text(day, DAY_TITLE_KEYS).unwrap_or(fallback_title);
    let entries = TIMELINE_KEYS
        .iter()
        .find_map(|key| day.get(key).and_then(ConfigValue::as_list))
        .unwrap_or(&[])
        .iter()
        .map(read_entry)
        .filter(|e| !e.text.is_empty())
        .collect();

    ItineraryDay { title, entries }
}

fn read_entry(entry: &ConfigValue) -> TimelineEntry {
    let time = entry
        .get("time")
        .map(coerce_text)
        .filter(|t| !t.trim().is_empty());
    TimelineEntry {
        time,
        text: coerce_text(entry),
    }
}

impl fmt::Display for ItineraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days.is_empty() {
            return writeln!(f, "No itinerary stored.");
        }
        for (i, day) in self.days.iter().enumerate() {
            writeln!(f, "Day {}: {}", i + 1, day.title)?;
            for (j, entry) in day.entries.iter().enumerate() {
                match &entry.time {
                    Some(time) => writeln!(f, "  {:>2}. [{}] {}", j + 1, time, entry.text)?,
                    None => writeln!(f, "  {:>2}. {}", j + 1, entry.text)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fenced() {
        let text = "Here you go!\n```json\n{\"days\": []}\n```\nEnjoy.";
        assert_eq!(extract_json(text), Some(ConfigValue::from(json!({"days": []}))));
    }

    #[test]
    fn test_extract_embedded_object() {
        let text = "Sure. {\"a\": 1} Hope that helps";
        assert_eq!(extract_json(text), Some(ConfigValue::from(json!({"a": 1}))));
    }

    #[test]
    fn test_extract_embedded_list() {
        let text = "Plan: [1, 2] done";
        assert_eq!(extract_json(text), Some(ConfigValue::from(json!([1, 2]))));
    }

    #[test]
    fn test_extract_nothing() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("null"), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce_text(&ConfigValue::from("Temple")), "Temple");
        assert_eq!(coerce_text(&ConfigValue::from(3i64)), "3");
        assert_eq!(coerce_text(&ConfigValue::from(true)), "true");
        assert_eq!(coerce_text(&ConfigValue::Null), "");
    }

    #[test]
    fn test_coerce_map_prefers_text_keys() {
        let value = ConfigValue::from(json!({"description": "Walk", "name": "Park"}));
        assert_eq!(coerce_text(&value), "Park");

        let value = ConfigValue::from(json!({"name": "", "activity": "Swim"}));
        assert_eq!(coerce_text(&value), "Swim");
    }

    #[test]
    fn test_coerce_map_without_text_keys() {
        let value = ConfigValue::from(json!({"b": 2, "a": "x"}));
        assert_eq!(coerce_text(&value), "a: x; b: 2");
    }

    #[test]
    fn test_coerce_list() {
        let value = ConfigValue::from(json!(["Tea", {"name": "Cake"}, null]));
        assert_eq!(coerce_text(&value), "Tea, Cake");
    }

    #[test]
    fn test_view_from_days() {
        let value = ConfigValue::from(json!({
            "days": [
                {"title": "Arrival", "timeline": [
                    {"time": "09:00", "activity": "Land"},
                    "Check in",
                    {"time": "19:00", "name": {"text": "Dinner"}}
                ]},
                "Free day"
            ]
        }));
        let view = ItineraryView::from_value(&value);
        assert_eq!(view.days.len(), 2);
        assert_eq!(view.days[0].title, "Arrival");
        assert_eq!(view.days[0].entries.len(), 3);
        assert_eq!(view.days[0].entries[0].time.as_deref(), Some("09:00"));
        assert_eq!(view.days[0].entries[2].text, "Dinner");
        assert_eq!(view.days[1].title, "Free day");

        let text = view.to_string();
        assert!(text.contains("Day 1: Arrival"));
        assert!(text.contains("[09:00] Land"));
    }

    #[test]
    fn test_view_from_list_and_junk() {
        let list = ConfigValue::from(json!([{"activities": ["Hike"]}]));
        let view = ItineraryView::from_value(&list);
        assert_eq!(view.days[0].title, "Day 1");
        assert_eq!(view.days[0].entries[0].text, "Hike");

        assert!(ItineraryView::from_value(&ConfigValue::from("oops")).is_empty());
        assert!(ItineraryView::from_value(&ConfigValue::Null).to_string().contains("No itinerary"));
    }
}
