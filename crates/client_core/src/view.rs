//! Render-ready snapshots of the labeling session.

use std::fmt;

use shared::{
    domain::{LabelDimension, LabelSubmission, RangeSelection, Record, SampleIndex, StoredLabel},
    protocol::ProgressResponse,
};

use crate::fields::{collect_field_groups, FieldGroup};

pub const EMPTY_INDEX_MARKER: &str = "-";
pub const EMPTY_TITLE: &str = "No items in range or all skipped";
pub const NO_TITLE: &str = "(no title)";

/// Label inputs as currently entered by the annotator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelForm {
    pub critical: String,
    pub popular: String,
    pub commercial: String,
    pub annotator: String,
}

impl LabelForm {
    pub fn label(&self, dimension: LabelDimension) -> &str {
        match dimension {
            LabelDimension::Critical => &self.critical,
            LabelDimension::Popular => &self.popular,
            LabelDimension::Commercial => &self.commercial,
        }
    }

    pub fn set_label(&mut self, dimension: LabelDimension, value: impl Into<String>) {
        let slot = match dimension {
            LabelDimension::Critical => &mut self.critical,
            LabelDimension::Popular => &mut self.popular,
            LabelDimension::Commercial => &mut self.commercial,
        };
        *slot = value.into();
    }

    /// Empties the three label inputs. The annotator name is kept.
    pub fn clear_labels(&mut self) {
        self.critical.clear();
        self.popular.clear();
        self.commercial.clear();
    }

    pub fn submission_for(&self, sample_index: SampleIndex) -> LabelSubmission {
        LabelSubmission {
            sample_index,
            critical_success_label: self.critical.clone(),
            popular_success_label: self.popular.clone(),
            commercial_success_label: self.commercial.clone(),
            annotator: self.annotator.clone(),
        }
    }
}

/// Values shown in the start/end inputs of the range selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeInputs {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl From<RangeSelection> for RangeInputs {
    fn from(range: RangeSelection) -> Self {
        Self {
            start: Some(range.start()),
            end: Some(range.end()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDisplay {
    Range { labeled: i64, total: i64 },
    Dataset { labeled: i64, total: i64 },
}

impl ProgressDisplay {
    pub fn from_response(range_scoped: bool, response: &ProgressResponse) -> Self {
        let labeled = response.labeled_in_range.unwrap_or(0);
        if range_scoped {
            ProgressDisplay::Range {
                labeled,
                total: response.range_total.unwrap_or(0),
            }
        } else {
            ProgressDisplay::Dataset {
                labeled,
                total: response.dataset_total(),
            }
        }
    }
}

impl fmt::Display for ProgressDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressDisplay::Range { labeled, total } => {
                write!(f, "Labeled {labeled} / {total} (range)")
            }
            ProgressDisplay::Dataset { labeled, total } => {
                write!(f, "Labeled {labeled} / {total} (dataset)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub sample_index: SampleIndex,
    pub title: String,
    pub labeled: bool,
    pub stored_label: Option<StoredLabel>,
    pub groups: Vec<FieldGroup>,
}

impl ItemView {
    pub fn from_record(record: &Record) -> Self {
        Self {
            sample_index: record.sample_index,
            title: record.title().unwrap_or_else(|| NO_TITLE.to_string()),
            labeled: record.labeled,
            stored_label: record.label.clone(),
            groups: collect_field_groups(record),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordView {
    Empty,
    Item {
        position: usize,
        total: usize,
        item: ItemView,
    },
}

impl RecordView {
    pub fn index_marker(&self) -> String {
        match self {
            RecordView::Empty => EMPTY_INDEX_MARKER.to_string(),
            RecordView::Item { item, .. } => item.sample_index.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RecordView::Empty => EMPTY_TITLE,
            RecordView::Item { item, .. } => &item.title,
        }
    }

    pub fn groups(&self) -> &[FieldGroup] {
        match self {
            RecordView::Empty => &[],
            RecordView::Item { item, .. } => &item.groups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub record: RecordView,
    pub progress: Option<ProgressDisplay>,
    pub form: LabelForm,
    pub inputs: RangeInputs,
}
