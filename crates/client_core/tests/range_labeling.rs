//! End-to-end labeling against an in-process label service.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use client_core::{Confirm, HttpLabelService, RangeSessionController, RecordView, SaveOutcome};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::domain::{LabelDimension, LabelSubmission};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct Dataset {
    rows: Arc<Vec<Value>>,
    labeled: Arc<Mutex<BTreeMap<i64, LabelSubmission>>>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: Option<i64>,
    end: Option<i64>,
    #[serde(default = "default_true")]
    skip_labeled: bool,
    #[serde(default)]
    show_labeled: bool,
}

fn default_true() -> bool {
    true
}

impl Dataset {
    fn bounds(&self, query: &RangeQuery) -> Result<(i64, i64), (StatusCode, String)> {
        let total = self.rows.len() as i64;
        let start = query.start.unwrap_or(0).max(0);
        let end = query.end.filter(|end| *end < total).unwrap_or(total - 1);
        if end < start {
            return Err((StatusCode::BAD_REQUEST, "end must be >= start".to_string()));
        }
        Ok((start, end))
    }
}

async fn progress(
    State(dataset): State<Dataset>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let (start, end) = dataset.bounds(&query)?;
    let labeled = dataset.labeled.lock().await;
    let labeled_in_range = (start..=end).filter(|i| labeled.contains_key(i)).count();
    Ok(Json(json!({
        "total_in_dataset": dataset.rows.len(),
        "range_total": end - start + 1,
        "labeled_in_range": labeled_in_range,
    })))
}

async fn items(
    State(dataset): State<Dataset>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let (start, end) = dataset.bounds(&query)?;
    let labeled = dataset.labeled.lock().await;
    let items: Vec<Value> = (start..=end)
        .filter(|i| !(query.skip_labeled && labeled.contains_key(i)))
        .map(|i| {
            let mut item = json!({
                "sample_index": i,
                "row": dataset.rows[i as usize],
                "labeled": labeled.contains_key(&i),
            });
            if let (true, Some(label)) = (query.show_labeled, labeled.get(&i)) {
                item["label"] = json!({
                    "sample_index": i.to_string(),
                    "critical_success_label": label.critical_success_label,
                    "popular_success_label": label.popular_success_label,
                    "commercial_success_label": label.commercial_success_label,
                    "annotator": label.annotator,
                });
            }
            item
        })
        .collect();
    Ok(Json(json!({
        "total_in_dataset": dataset.rows.len(),
        "range_total": end - start + 1,
        "returned": items.len(),
        "items": items,
    })))
}

async fn save_label(
    State(dataset): State<Dataset>,
    Json(submission): Json<LabelSubmission>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let index = submission.sample_index.0;
    if index < 0 || index >= dataset.rows.len() as i64 {
        return Err((
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Invalid sample_index"}"#.to_string(),
        ));
    }
    dataset.labeled.lock().await.insert(index, submission);
    Ok(Json(json!({"status": "ok"})))
}

async fn spawn_dataset(rows: usize, prelabeled: &[i64]) -> anyhow::Result<String> {
    let rows: Vec<Value> = (0..rows)
        .map(|i| json!({"title": format!("Book {i}"), "year": 1990 + i, "rating": "", "junk": "x"}))
        .collect();
    let labeled = prelabeled
        .iter()
        .map(|&i| {
            (
                i,
                LabelSubmission {
                    sample_index: shared::domain::SampleIndex(i),
                    critical_success_label: "Low".into(),
                    ..Default::default()
                },
            )
        })
        .collect();
    let dataset = Dataset {
        rows: Arc::new(rows),
        labeled: Arc::new(Mutex::new(labeled)),
    };
    let app = Router::new()
        .route("/api/progress", get(progress))
        .route("/api/items", get(items))
        .route("/api/label", post(save_label))
        .with_state(dataset);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

struct AlwaysYes;

#[async_trait]
impl Confirm for AlwaysYes {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

fn progress_text(view: &client_core::SessionView) -> String {
    view
        .progress
        .map(|progress| progress.to_string())
        .unwrap_or_default()
}

#[tokio::test]
async fn labels_three_of_seven_unlabeled_records() {
    let url = spawn_dataset(20, &[2, 5, 7]).await.expect("server");
    let controller = RangeSessionController::new(HttpLabelService::new(&url).expect("service"));

    let inputs = controller.initialize().await;
    assert_eq!((inputs.start, inputs.end), (Some(0), Some(19)));

    let view = controller.load_range(0, 9, true, false).await.expect("load");
    let RecordView::Item { total, item, .. } = &view.record else {
        panic!("expected a record");
    };
    assert_eq!(*total, 7);
    assert_eq!(item.sample_index.0, 0);
    assert_eq!(progress_text(&view), "Labeled 3 / 10 (range)");
    let metadata: Vec<_> = item.groups[0].entries.iter().map(|e| e.key).collect();
    assert_eq!(metadata, vec!["title", "year"]);
    assert_eq!(item.groups.len(), 1);

    controller.set_annotator("tester").await;
    let mut last_view = view;
    for _ in 0..3 {
        controller
            .set_label(LabelDimension::Critical, "Moderate")
            .await;
        controller.set_label(LabelDimension::Popular, "High").await;
        match controller.save_label(&AlwaysYes).await.expect("save") {
            SaveOutcome::Saved { view, .. } => last_view = view,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    let RecordView::Item { total, item, .. } = &last_view.record else {
        panic!("expected a record");
    };
    assert_eq!(*total, 4);
    assert_eq!(item.sample_index.0, 4);
    assert_eq!(progress_text(&last_view), "Labeled 6 / 10 (range)");

    let reloaded = controller.load_range(0, 9, true, false).await.expect("reload");
    let RecordView::Item { total, .. } = reloaded.record else {
        panic!("expected a record");
    };
    assert_eq!(total, 4);
}

#[tokio::test]
async fn show_labeled_exposes_stored_labels() {
    let url = spawn_dataset(5, &[1]).await.expect("server");
    let controller = RangeSessionController::new(HttpLabelService::new(&url).expect("service"));

    controller.load_range(0, 4, false, true).await.expect("load");
    let view = controller.advance(1).await;

    let RecordView::Item { item, total, .. } = view.record else {
        panic!("expected a record");
    };
    assert_eq!(total, 5);
    assert!(item.labeled);
    assert_eq!(
        item.stored_label.expect("stored label").critical_success_label,
        "Low"
    );
}

#[tokio::test]
async fn server_side_range_rejection_reports_load_failure() {
    let url = spawn_dataset(5, &[]).await.expect("server");
    let controller = RangeSessionController::new(HttpLabelService::new(&url).expect("service"));

    // The server clamps `end` to the dataset, so a start past the end is
    // rejected there rather than by the client.
    let err = controller
        .load_range(8, 9, true, false)
        .await
        .expect_err("server rejects");
    assert_eq!(err.to_string(), "Failed to load range");
    assert_eq!(controller.snapshot().await.record, RecordView::Empty);
}
