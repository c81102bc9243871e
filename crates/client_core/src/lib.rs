//! Client side of the labeling workflow: talks to the label service and
//! keeps the annotator's range session.

pub mod busy;
pub mod controller;
pub mod error;
pub mod fields;
pub mod service;
pub mod session;
pub mod view;

pub use controller::{Confirm, RangeSessionController, SaveOutcome, EMPTY_LABELS_PROMPT};
pub use error::{Action, ControllerError, ServiceError};
pub use service::{HttpLabelService, LabelService};
pub use view::{LabelForm, ProgressDisplay, RangeInputs, RecordView, SessionView};
