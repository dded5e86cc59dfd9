use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Accepts `field`, `-field`, `field:asc` and `field:desc`
    pub fn parse(spec: &str) -> Result<Self, FilterError> {
        let spec = spec.trim();
        let invalid = || FilterError::InvalidSort(spec.to_string());

        let (field, direction) = if let Some(field) = spec.strip_prefix('-') {
            (field, SortDirection::Desc)
        } else if let Some((field, dir)) = spec.split_once(':') {
            let direction = match dir.to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                _ => return Err(invalid()),
            };
            (field, direction)
        } else {
            (spec, SortDirection::Asc)
        };

        let valid = !field.is_empty()
            && field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(invalid());
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Compare two records on this order's field; missing values sort last
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.get(&self.field), b.get(&self.field)) {
            (None | Some(Value::Null), None | Some(Value::Null)) => return Ordering::Equal,
            (None | Some(Value::Null), _) => return Ordering::Greater,
            (_, None | Some(Value::Null)) => return Ordering::Less,
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Some(x), Some(y)) => {
                let x = value_text(x).unwrap_or_default().to_lowercase();
                let y = value_text(y).unwrap_or_default().to_lowercase();
                x.cmp(&y)
            }
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Icon bucket of a file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Image,
    Archive,
    Other,
}

impl FileCategory {
    /// Accepts a file name or a bare extension (`report.PDF`, `pdf`)
    pub fn from_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map_or(name, |(_, ext)| ext)
            .trim()
            .to_ascii_lowercase();

        match extension.as_str() {
            "pdf" | "txt" | "doc" | "docx" => FileCategory::Document,
            "jpg" | "jpeg" | "png" | "gif" => FileCategory::Image,
            "zip" | "rar" => FileCategory::Archive,
            _ => FileCategory::Other,
        }
    }

    /// Category of a file record: its `file_type`, else its `name`
    pub fn of(file: &Value) -> Self {
        ["file_type", "name", "file"]
            .iter()
            .filter_map(|key| file.get(*key).and_then(Value::as_str))
            .map(Self::from_name)
            .find(|category| *category != FileCategory::Other)
            .unwrap_or(FileCategory::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar JSON values as display text; arrays, objects and null have none
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
