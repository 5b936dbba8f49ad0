//! Record framing: locating the list of `{content, delay}` records inside a
//! payload.

use serde::Deserialize;
use serde_json::Value;

use super::{ContainerFormat, DecodeError};

/// Marker preceding the embedded record array in an HTML export.
const TRANSFER_MARKER: &str = "const transfer = '";

/// A record as persisted by the producing backend.
#[derive(Debug, Deserialize)]
pub(super) struct RawRecord {
    pub content: String,
    #[serde(default)]
    pub delay: Option<f64>,
    #[serde(default)]
    pub offset: Option<f64>,
}

/// Extract the records of a payload in order.
pub(super) fn extract(input: &str, format: ContainerFormat) -> Result<Vec<RawRecord>, DecodeError> {
    match format {
        ContainerFormat::Auto => extract_auto(input),
        ContainerFormat::JsonArray => json_array(input),
        ContainerFormat::Lines => lines(input),
        ContainerFormat::HtmlExport => html_export(input),
    }
}

fn extract_auto(input: &str) -> Result<Vec<RawRecord>, DecodeError> {
    if input.contains(TRANSFER_MARKER) {
        return html_export(input);
    }

    if input.trim_start().starts_with('[') {
        // Several array fragments on separate lines are not one valid array
        return match json_array(input) {
            Ok(records) => Ok(records),
            Err(err) => lines(input).map_err(|_| err),
        };
    }

    lines(input)
}

fn json_array(input: &str) -> Result<Vec<RawRecord>, DecodeError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Value> = serde_json::from_str(input)
        .map_err(|e| DecodeError::malformed(format!("expected a JSON array of records: {}", e)))?;

    to_records(values, 0)
}

fn lines(input: &str) -> Result<Vec<RawRecord>, DecodeError> {
    let mut records = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| {
            DecodeError::malformed(format!("line {}: invalid JSON: {}", line_num + 1, e))
        })?;

        let start = records.len();
        match value {
            Value::Array(values) => records.extend(to_records(values, start)?),
            value @ Value::Object(_) => records.push(to_record(value, start)?),
            other => {
                return Err(DecodeError::malformed(format!(
                    "line {}: expected a record or an array of records, got {}",
                    line_num + 1,
                    kind_of(&other)
                )))
            }
        }
    }

    Ok(records)
}

fn html_export(input: &str) -> Result<Vec<RawRecord>, DecodeError> {
    let line = input
        .lines()
        .find(|line| line.contains(TRANSFER_MARKER))
        .ok_or_else(|| DecodeError::malformed("no embedded transfer array found"))?;

    let (start, end) = match (line.find('['), line.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(DecodeError::malformed(
                "embedded transfer array is not bracketed",
            ))
        }
    };

    json_array(&line[start..=end])
}

fn to_records(values: Vec<Value>, first_index: usize) -> Result<Vec<RawRecord>, DecodeError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| to_record(value, first_index + i))
        .collect()
}

fn to_record(value: Value, index: usize) -> Result<RawRecord, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::entry(
            index,
            format!("expected an object, got {}", kind_of(&value)),
        ));
    }
    serde_json::from_value(value).map_err(|e| DecodeError::entry(index, e))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
