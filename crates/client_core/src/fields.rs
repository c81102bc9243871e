//! Grouping of a record's row into the fixed display sections.

use shared::domain::Record;

const METADATA_KEYS: &[&str] = &[
    "title",
    "Title",
    "author",
    "Author",
    "publication_year",
    "publicationYear",
    "year",
    "Year",
    "Genre",
    "genre",
    "description",
    "Description",
];
const REVIEW_KEYS: &[&str] = &["review_text", "review", "summary"];
const CRITICAL_KEYS: &[&str] = &[
    "is_expert",
    "isExpert",
    "critical_indicators",
    "critical_flag",
];
const POPULAR_KEYS: &[&str] = &[
    "rating",
    "average_rating",
    "ratings_count",
    "n_votes",
    "total_weeks",
    "best_rank",
];
const COMMERCIAL_KEYS: &[&str] = &[
    "Units_Sold",
    "Gross_Sales",
    "Sale_Price",
    "Sales_Rank",
    "SalesRank",
    "sales_rank",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroupKind {
    Metadata,
    Review,
    Critical,
    Popular,
    Commercial,
}

impl FieldGroupKind {
    /// Display order of the groups.
    pub const ORDERED: [FieldGroupKind; 5] = [
        FieldGroupKind::Metadata,
        FieldGroupKind::Review,
        FieldGroupKind::Critical,
        FieldGroupKind::Popular,
        FieldGroupKind::Commercial,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FieldGroupKind::Metadata => "Metadata",
            FieldGroupKind::Review => "Review & Expertise",
            FieldGroupKind::Critical => "Critical indicators",
            FieldGroupKind::Popular => "Popular indicators",
            FieldGroupKind::Commercial => "Commercial indicators",
        }
    }

    pub fn keys(self) -> &'static [&'static str] {
        match self {
            FieldGroupKind::Metadata => METADATA_KEYS,
            FieldGroupKind::Review => REVIEW_KEYS,
            FieldGroupKind::Critical => CRITICAL_KEYS,
            FieldGroupKind::Popular => POPULAR_KEYS,
            FieldGroupKind::Commercial => COMMERCIAL_KEYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub kind: FieldGroupKind,
    pub entries: Vec<FieldEntry>,
}

impl FieldGroup {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Scans the record against every group's key list and keeps the keys that
/// carry a non-blank value. Case variants of the same key are both kept.
/// Groups without a single entry are left out.
pub fn collect_field_groups(record: &Record) -> Vec<FieldGroup> {
    FieldGroupKind::ORDERED
        .into_iter()
        .filter_map(|kind| {
            let entries: Vec<FieldEntry> = kind
                .keys()
                .iter()
                .filter_map(|&key| {
                    record.field(key).map(|value| FieldEntry {
                        key,
                        value: value.to_string(),
                    })
                })
                .collect();
            (!entries.is_empty()).then_some(FieldGroup { kind, entries })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use shared::domain::{FieldValue, Row};

    use super::*;

    fn record(fields: &[(&str, Option<FieldValue>)]) -> Record {
        let row: Row = fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Record::new(0, row)
    }

    #[test]
    fn keeps_present_keys_and_drops_empty_or_unknown() {
        let record = record(&[
            ("title", Some("X".into())),
            ("year", Some(2020i64.into())),
            ("rating", Some("".into())),
            ("junk", Some("y".into())),
        ]);

        let groups = collect_field_groups(&record);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, FieldGroupKind::Metadata);
        let keys: Vec<_> = groups[0].entries.iter().map(|entry| entry.key).collect();
        assert_eq!(keys, vec!["title", "year"]);
        assert_eq!(groups[0].entries[1].value, "2020");
    }

    #[test]
    fn whitespace_and_null_values_are_skipped() {
        let record = record(&[("review", Some("  \t".into())), ("summary", None)]);
        assert!(collect_field_groups(&record).is_empty());
    }

    #[test]
    fn groups_follow_display_order_and_keep_case_variants() {
        let record = record(&[
            ("sales_rank", Some(4i64.into())),
            ("rating", Some("4.1".into())),
            ("critical_flag", Some(FieldValue::Bool(false))),
            ("summary", Some("Great".into())),
            ("Title", Some("B".into())),
            ("title", Some("A".into())),
        ]);

        let groups = collect_field_groups(&record);
        let titles: Vec<_> = groups.iter().map(FieldGroup::title).collect();
        assert_eq!(
            titles,
            vec![
                "Metadata",
                "Review & Expertise",
                "Critical indicators",
                "Popular indicators",
                "Commercial indicators",
            ]
        );
        let metadata: Vec<_> = groups[0]
            .entries
            .iter()
            .map(|entry| (entry.key, entry.value.as_str()))
            .collect();
        assert_eq!(metadata, vec![("title", "A"), ("Title", "B")]);
        assert_eq!(groups[2].entries[0].value, "false");
    }
}
