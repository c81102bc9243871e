//! Plain-text rendering of session views for the terminal.

use std::fmt::Write as _;

use client_core::{view::ItemView, RecordView, SessionView};

pub fn render_session(view: &SessionView) -> String {
    let mut out = String::new();
    match &view.record {
        RecordView::Empty => {
            let _ = writeln!(out, "#{}  {}", view.record.index_marker(), view.record.title());
        }
        RecordView::Item {
            position,
            total,
            item,
        } => {
            let _ = writeln!(out, "[{}/{}]", position + 1, total);
            out.push_str(&render_item(item));
        }
    }
    if let Some(progress) = view.progress {
        let _ = writeln!(out, "{progress}");
    }
    out
}

pub fn render_item(item: &ItemView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", item.sample_index, item.title);
    for group in &item.groups {
        let _ = writeln!(out, "  {}", group.title());
        for entry in &group.entries {
            let _ = writeln!(out, "    {}: {}", entry.key, entry.value);
        }
    }
    if item.labeled {
        match &item.stored_label {
            Some(label) => {
                let _ = writeln!(
                    out,
                    "  already labeled: critical={} popular={} commercial={} annotator={}",
                    label.critical_success_label,
                    label.popular_success_label,
                    label.commercial_success_label,
                    label.annotator
                );
            }
            None => out.push_str("  already labeled\n"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use client_core::{view::LabelForm, ProgressDisplay, RangeInputs};
    use shared::domain::{Record, Row, StoredLabel};

    use super::*;

    fn view(record: RecordView) -> SessionView {
        SessionView {
            record,
            progress: Some(ProgressDisplay::Range {
                labeled: 2,
                total: 10,
            }),
            form: LabelForm::default(),
            inputs: RangeInputs::default(),
        }
    }

    #[test]
    fn empty_session_shows_sentinel_and_progress() {
        assert_eq!(
            render_session(&view(RecordView::Empty)),
            "#-  No items in range or all skipped\nLabeled 2 / 10 (range)\n"
        );
    }

    #[test]
    fn item_lists_groups_and_stored_label() {
        let mut row = Row::new();
        row.insert("title".into(), Some("Dune".into()));
        row.insert("summary".into(), Some("Sand".into()));
        let mut record = Record::new(12, row);
        record.labeled = true;
        record.label = Some(StoredLabel {
            critical_success_label: "High".into(),
            annotator: "ann".into(),
            ..Default::default()
        });

        let text = render_session(&view(RecordView::Item {
            position: 1,
            total: 4,
            item: ItemView::from_record(&record),
        }));

        assert_eq!(
            text,
            "[2/4]\n#12  Dune\n  Metadata\n    title: Dune\n  Review & Expertise\n    summary: Sand\n  already labeled: critical=High popular= commercial= annotator=ann\nLabeled 2 / 10 (range)\n"
        );
    }
}
