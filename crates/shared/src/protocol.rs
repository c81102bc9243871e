//! Wire shapes of the label service HTTP/JSON API.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{RangeSelection, Record};

pub const PROGRESS_PATH: &str = "api/progress";
pub const ITEMS_PATH: &str = "api/items";
pub const ITEM_PATH: &str = "api/item";
pub const LABEL_PATH: &str = "api/label";

/// Query string of `GET /api/progress`. Both bounds omitted means dataset-wide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl ProgressQuery {
    pub fn dataset() -> Self {
        Self::default()
    }

    pub fn for_range(range: RangeSelection) -> Self {
        Self {
            start: Some(range.start()),
            end: Some(range.end()),
        }
    }
}

/// Query string of `GET /api/items`. Booleans travel as `"true"`/`"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsQuery {
    pub start: i64,
    pub end: i64,
    pub skip_labeled: bool,
    pub show_labeled: bool,
}

impl ItemsQuery {
    pub fn new(range: RangeSelection, skip_labeled: bool, show_labeled: bool) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
            skip_labeled,
            show_labeled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_in_dataset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Record>,
}

/// Servers may send `"items": null` for an empty range.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Progress counters. Range-scoped responses carry `labeled_in_range` and
/// `range_total`; dataset-wide ones carry `total_in_dataset` or `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_in_dataset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeled_in_range: Option<i64>,
}

impl ProgressResponse {
    pub fn dataset_total(&self) -> i64 {
        self.total_in_dataset.or(self.total).unwrap_or(0)
    }
}
