//! Warning list normalization

use serde_json::Value;
use tracing::warn;

use crate::models::{SkippedWarning, Warning, WarningLink, WarningSkipReason};
use crate::parse::{epoch_millis, json_i64};

const WARNINGS: &str = "warnings";

/// Mapped warnings plus the entries that had to be dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarningBatch {
    /// Warnings in upstream order
    pub warnings: Vec<Warning>,
    /// Dropped entries in upstream order
    pub skipped: Vec<SkippedWarning>,
}

impl FromIterator<Result<Warning, SkippedWarning>> for WarningBatch {
    fn from_iter<I: IntoIterator<Item = Result<Warning, SkippedWarning>>>(iter: I) -> Self {
        let mut batch = Self::default();
        for entry in iter {
            match entry {
                Ok(warning) => batch.warnings.push(warning),
                Err(skipped) => batch.skipped.push(skipped),
            }
        }
        batch
    }
}

/// Map the `warnings` list of a forecast envelope
///
/// Entries that cannot be mapped are logged and reported in
/// [`WarningBatch::skipped`]; they never abort the rest of the list. A
/// missing list yields an empty batch.
pub fn map_warnings(envelope: &Value) -> WarningBatch {
    let Some(entries) = envelope.get(WARNINGS).and_then(Value::as_array) else {
        return WarningBatch::default();
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_warning(entry).map_err(|reason| {
                warn!(index, reason = %reason, "Skipping malformed warning");
                SkippedWarning { index, reason }
            })
        })
        .collect()
}

/// Map a single warning entry
pub fn parse_warning(entry: &Value) -> Result<Warning, WarningSkipReason> {
    if !entry.is_object() {
        return Err(WarningSkipReason::NotAnObject);
    }

    let warning_type = json_i64(entry.get("warnType")).ok_or(WarningSkipReason::InvalidType)?;
    let warning_level =
        json_i64(entry.get("warnLevel")).ok_or(WarningSkipReason::InvalidLevel)?;

    let links = entry
        .get("links")
        .and_then(Value::as_array)
        .ok_or(WarningSkipReason::InvalidLinks)?
        .iter()
        .enumerate()
        .map(|(i, link)| parse_link(link).ok_or(WarningSkipReason::InvalidLink(i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Warning {
        warning_type: warning_type.into(),
        warning_level: warning_level.into(),
        text: string_field(entry, "text"),
        html_text: string_field(entry, "htmlText"),
        outlook: entry.get("outlook").is_some_and(truthy),
        valid_from: epoch_millis(json_i64(entry.get("validFrom"))),
        valid_to: epoch_millis(json_i64(entry.get("validTo"))),
        links,
    })
}

fn parse_link(link: &Value) -> Option<WarningLink> {
    link.is_object().then(|| WarningLink {
        text: string_field(link, "text"),
        url: string_field(link, "url"),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}
