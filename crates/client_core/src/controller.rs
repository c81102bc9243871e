//! Range session controller: the only writer of session state.
//!
//! Session state sits behind an async mutex that is never held across a call
//! to the label service, so operations take `&self` and may interleave at
//! request boundaries. Load and save each carry a busy flag; a save that
//! completes after a newer range load replaced the working set is discarded.

use async_trait::async_trait;
use shared::{
    domain::{LabelDimension, LabelSubmission, RangeSelection, SampleIndex},
    protocol::{ItemsQuery, ProgressQuery},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    busy::BusyFlag,
    error::{Action, ControllerError},
    service::LabelService,
    session::RangeSession,
    view::{ItemView, LabelForm, ProgressDisplay, RangeInputs, RecordView, SessionView},
};

pub const EMPTY_LABELS_PROMPT: &str = "No labels selected. Save empty labels?";

/// Asks the annotator a yes/no question.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        sample_index: SampleIndex,
        view: SessionView,
    },
    /// The working set was empty.
    NothingToSave,
    /// The annotator declined to submit a label with every dimension empty.
    Cancelled,
    /// The label was stored, but the working set it belonged to had already
    /// been replaced by another range load, so nothing was removed.
    Discarded { sample_index: SampleIndex },
}

#[derive(Debug, Default)]
struct SessionState {
    session: RangeSession,
    form: LabelForm,
    inputs: RangeInputs,
    progress: Option<ProgressDisplay>,
}

impl SessionState {
    fn snapshot(&self) -> SessionView {
        let record = match (self.session.cursor(), self.session.current()) {
            (Some(position), Some(record)) => RecordView::Item {
                position,
                total: self.session.len(),
                item: ItemView::from_record(record),
            },
            _ => RecordView::Empty,
        };
        SessionView {
            record,
            progress: self.progress,
            form: self.form.clone(),
            inputs: self.inputs,
        }
    }

    fn render(&mut self) -> SessionView {
        if self.session.is_empty() {
            return self.snapshot();
        }
        self.session.clamp_cursor();
        let mut view = self.snapshot();
        self.form.clear_labels();
        view.form = self.form.clone();
        view
    }
}

struct PendingSave {
    generation: u64,
    position: usize,
    submission: LabelSubmission,
}

pub struct RangeSessionController<S> {
    service: S,
    state: Mutex<SessionState>,
    loading: BusyFlag,
    saving: BusyFlag,
}

impl<S: LabelService> RangeSessionController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(SessionState::default()),
            loading: BusyFlag::default(),
            saving: BusyFlag::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    /// Reads dataset-wide totals and pre-fills the range inputs with the
    /// whole dataset. A failure leaves the inputs unset.
    pub async fn initialize(&self) -> RangeInputs {
        match self.service.progress(ProgressQuery::dataset()).await {
            Ok(response) => {
                let total = response.dataset_total();
                let mut state = self.state.lock().await;
                state.inputs = RangeInputs {
                    start: Some(0),
                    end: Some(total.saturating_sub(1).max(0)),
                };
                state.progress = Some(ProgressDisplay::from_response(false, &response));
                info!(total, "dataset totals loaded");
                state.inputs
            }
            Err(error) => {
                debug!(%error, "initial progress request failed");
                self.state.lock().await.inputs
            }
        }
    }

    pub async fn load_range(
        &self,
        start: i64,
        end: i64,
        skip_labeled: bool,
        show_labeled: bool,
    ) -> Result<SessionView, ControllerError> {
        let _busy = self
            .loading
            .try_acquire()
            .ok_or(ControllerError::Busy(Action::LoadRange))?;
        let range = RangeSelection::new(start, end)?;

        let response = self
            .service
            .fetch_items(ItemsQuery::new(range, skip_labeled, show_labeled))
            .await
            .map_err(|error| {
                warn!(start, end, %error, "failed to load range");
                ControllerError::LoadFailed(error)
            })?;
        info!(
            start,
            end,
            skip_labeled,
            show_labeled,
            returned = response.items.len(),
            range_total = ?response.range_total,
            total_in_dataset = ?response.total_in_dataset,
            "range loaded"
        );

        {
            let mut state = self.state.lock().await;
            state.session.replace(range, response.items);
            state.inputs = RangeInputs::from(range);
        }
        self.refresh_progress().await;
        Ok(self.render_current().await)
    }

    /// Clamps the cursor and builds the view of the current record. Label
    /// inputs are reset so every record starts from an empty form.
    pub async fn render_current(&self) -> SessionView {
        self.state.lock().await.render()
    }

    /// Current view without touching the form.
    pub async fn snapshot(&self) -> SessionView {
        self.state.lock().await.snapshot()
    }

    pub async fn advance(&self, delta: i64) -> SessionView {
        let mut state = self.state.lock().await;
        state.session.advance(delta);
        state.render()
    }

    pub async fn set_label(&self, dimension: LabelDimension, value: impl Into<String>) {
        self.state.lock().await.form.set_label(dimension, value);
    }

    pub async fn set_annotator(&self, annotator: impl Into<String>) {
        self.state.lock().await.form.annotator = annotator.into();
    }

    pub async fn form(&self) -> LabelForm {
        self.state.lock().await.form.clone()
    }

    pub async fn save_label(&self, confirm: &dyn Confirm) -> Result<SaveOutcome, ControllerError> {
        let _busy = self
            .saving
            .try_acquire()
            .ok_or(ControllerError::Busy(Action::SaveLabel))?;

        let pending = {
            let state = self.state.lock().await;
            let (Some(position), Some(record)) = (state.session.cursor(), state.session.current())
            else {
                return Ok(SaveOutcome::NothingToSave);
            };
            PendingSave {
                generation: state.session.generation(),
                position,
                submission: state.form.submission_for(record.sample_index),
            }
        };
        let sample_index = pending.submission.sample_index;

        if pending.submission.has_no_labels() && !confirm.confirm(EMPTY_LABELS_PROMPT).await {
            debug!(%sample_index, "empty label submission declined");
            return Ok(SaveOutcome::Cancelled);
        }

        self.service
            .submit_label(&pending.submission)
            .await
            .map_err(|error| {
                warn!(%sample_index, %error, "failed to save label");
                ControllerError::SaveFailed {
                    message: error.detail(),
                }
            })?;

        let removed = self.state.lock().await.session.remove_saved(
            pending.generation,
            pending.position,
            sample_index,
        );
        self.refresh_progress().await;
        if removed.is_none() {
            warn!(%sample_index, "working set changed while saving; label kept, view untouched");
            return Ok(SaveOutcome::Discarded { sample_index });
        }

        info!(%sample_index, "label saved");
        Ok(SaveOutcome::Saved {
            sample_index,
            view: self.render_current().await,
        })
    }

    /// Re-reads progress for the loaded range, or for the whole dataset when
    /// no range has been loaded yet. Failures only leave the display stale.
    pub async fn refresh_progress(&self) -> Option<ProgressDisplay> {
        let range = self.state.lock().await.session.range();
        let query = range.map_or_else(ProgressQuery::dataset, ProgressQuery::for_range);
        match self.service.progress(query).await {
            Ok(response) => {
                let display = ProgressDisplay::from_response(range.is_some(), &response);
                self.state.lock().await.progress = Some(display);
                Some(display)
            }
            Err(error) => {
                debug!(%error, "progress refresh failed");
                None
            }
        }
    }

    /// Fetches a single record by index without touching the working set.
    pub async fn inspect_item(&self, sample_index: i64) -> Result<ItemView, ControllerError> {
        let record = self
            .service
            .fetch_item(SampleIndex(sample_index))
            .await
            .map_err(|error| ControllerError::InspectFailed {
                sample_index,
                message: error.detail(),
            })?;
        Ok(ItemView::from_record(&record))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
