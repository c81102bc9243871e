use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SampleIndex);

/// A single cell of a dataset row as served by the label service.
///
/// Rows come from loosely typed upstream sources, so anything that is not a
/// plain scalar is kept as raw JSON and rendered as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Other(serde_json::Value),
}

impl FieldValue {
    /// True when the value renders to nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
            FieldValue::Other(value) => value.is_null(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => write!(f, "{number}"),
            FieldValue::Bool(flag) => write!(f, "{flag}"),
            FieldValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

pub type Row = BTreeMap<String, Option<FieldValue>>;

/// Label row already stored server-side for a sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredLabel {
    pub sample_index: String,
    pub title: String,
    pub critical_success_label: String,
    pub popular_success_label: String,
    pub commercial_success_label: String,
    pub annotator: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub sample_index: SampleIndex,
    #[serde(default)]
    pub row: Row,
    #[serde(default)]
    pub labeled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<StoredLabel>,
}

impl Record {
    pub fn new(sample_index: i64, row: Row) -> Self {
        Self {
            sample_index: SampleIndex(sample_index),
            row,
            labeled: false,
            label: None,
        }
    }

    /// Non-blank value stored under `key`, if any.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.row
            .get(key)
            .and_then(Option::as_ref)
            .filter(|value| !value.is_blank())
    }

    /// `title`, else `Title`. Only a missing, null or empty value falls
    /// through; whitespace is kept as given.
    pub fn title(&self) -> Option<String> {
        ["title", "Title"].iter().find_map(|key| {
            self.row
                .get(*key)
                .and_then(Option::as_ref)
                .filter(|value| !matches!(value, FieldValue::Other(other) if other.is_null()))
                .map(ToString::to_string)
                .filter(|text| !text.is_empty())
        })
    }
}

/// Index range selected by the annotator.
///
/// Whether `end` is inclusive is decided by the label service; the client
/// only guarantees `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    start: i64,
    end: i64,
}

impl RangeSelection {
    pub fn new(start: i64, end: i64) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelDimension {
    Critical,
    Popular,
    Commercial,
}

impl LabelDimension {
    pub const ALL: [LabelDimension; 3] = [
        LabelDimension::Critical,
        LabelDimension::Popular,
        LabelDimension::Commercial,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            LabelDimension::Critical => "critical_success_label",
            LabelDimension::Popular => "popular_success_label",
            LabelDimension::Commercial => "commercial_success_label",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSubmission {
    pub sample_index: SampleIndex,
    pub critical_success_label: String,
    pub popular_success_label: String,
    pub commercial_success_label: String,
    pub annotator: String,
}

impl LabelSubmission {
    pub fn has_no_labels(&self) -> bool {
        self.critical_success_label.is_empty()
            && self.popular_success_label.is_empty()
            && self.commercial_success_label.is_empty()
    }
}
