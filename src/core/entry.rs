use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_SCREENSHOT_NAME: &str = "unknown";

/// Layout problems in otherwise valid JSON.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("expected an array of bytes, found {found}")]
    BytesNotAnArray { found: &'static str },

    #[error("byte {index} is not an integer in 0..=255: {value}")]
    ByteOutOfRange { index: usize, value: String },

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// Top-level document produced by the integration test driver. Entries are
/// kept as raw JSON and checked one at a time while extracting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Report {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub screenshots: Vec<Value>,
}

impl Report {
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        require_object(value)?;
        Ok(Report::deserialize(value)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScreenshotEntry {
    #[serde(rename = "screenshotName", default)]
    pub screenshot_name: Option<Value>,
    #[serde(default)]
    pub bytes: Option<Value>,
}

impl ScreenshotEntry {
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        require_object(value)?;
        Ok(ScreenshotEntry::deserialize(value)?)
    }

    /// Strings are used as-is; numbers and other values use their JSON text.
    pub fn name(&self) -> String {
        match &self.screenshot_name {
            None | Some(Value::Null) => DEFAULT_SCREENSHOT_NAME.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.name())
    }

    /// Raw file bytes, or `None` when the entry carries no usable data.
    pub fn data(&self) -> Result<Option<Vec<u8>>, ShapeError> {
        let items = match &self.bytes {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ShapeError::BytesNotAnArray {
                    found: kind(other),
                });
            }
        };
        if items.is_empty() {
            return Ok(None);
        }

        items
            .iter()
            .enumerate()
            .map(|(index, v)| {
                v.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| ShapeError::ByteOutOfRange {
                        index,
                        value: v.to_string(),
                    })
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Some)
    }
}

fn require_object(value: &Value) -> Result<(), ShapeError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ShapeError::NotAnObject { found: kind(value) })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> ScreenshotEntry {
        ScreenshotEntry::from_value(&value).expect("entry")
    }

    #[test]
    fn missing_screenshots_key_is_empty() {
        for v in [json!({}), json!({"screenshots": null}), json!({"other": 1})] {
            assert!(Report::from_value(&v).expect("report").screenshots.is_empty());
        }
    }

    #[test]
    fn report_must_be_an_object_with_a_list() {
        assert!(matches!(
            Report::from_value(&json!([])),
            Err(ShapeError::NotAnObject { found: "an array" })
        ));
        assert!(matches!(
            Report::from_value(&json!({"screenshots": {"a": 1}})),
            Err(ShapeError::Decode(_))
        ));
    }

    #[test]
    fn report_keeps_entries_unchecked() {
        let report = Report::from_value(&json!({"screenshots": [1, {"bytes": [300]}]}))
            .expect("report");
        assert_eq!(report.screenshots.len(), 2);
    }

    #[test]
    fn entry_defaults_apply() {
        for e in [entry(json!({})), entry(json!({"screenshotName": null, "bytes": null}))] {
            assert_eq!(e.name(), "unknown");
            assert_eq!(e.file_name(), "unknown.png");
            assert!(e.data().expect("data").is_none());
        }
        assert!(entry(json!({"bytes": []})).data().expect("data").is_none());
    }

    #[test]
    fn non_string_names_use_json_text() {
        assert_eq!(entry(json!({"screenshotName": 5})).file_name(), "5.png");
        assert_eq!(entry(json!({"screenshotName": 1.5})).name(), "1.5");
        assert_eq!(entry(json!({"screenshotName": true})).name(), "true");
    }

    #[test]
    fn bytes_keep_order_and_values() {
        let e = entry(json!({
            "screenshotName": "home",
            "bytes": [137, 80, 78, 71, 13, 10, 26, 10],
            "extra": true
        }));
        assert_eq!(e.name(), "home");
        assert_eq!(
            e.data().expect("data"),
            Some(vec![137, 80, 78, 71, 13, 10, 26, 10])
        );
    }

    #[test]
    fn invalid_bytes_are_reported_per_entry() {
        for (bytes, index) in [(json!([1, 256]), 1), (json!([-1]), 0), (json!([0, 1, "x"]), 2)] {
            match entry(json!({"bytes": bytes})).data() {
                Err(ShapeError::ByteOutOfRange { index: i, .. }) => assert_eq!(i, index),
                other => panic!("unexpected: {other:?}"),
            }
        }
        assert!(matches!(
            entry(json!({"bytes": "abc"})).data(),
            Err(ShapeError::BytesNotAnArray { found: "a string" })
        ));
    }

    #[test]
    fn non_object_entry_is_rejected() {
        assert!(matches!(
            ScreenshotEntry::from_value(&json!(7)),
            Err(ShapeError::NotAnObject { found: "a number" })
        ));
        assert!(ScreenshotEntry::from_value(&json!(["a", [1]])).is_err());
    }
}
