//! Maps prompt commands onto range session controller operations.

use std::ops::ControlFlow;

use client_core::{Confirm, ControllerError, LabelService, RangeSessionController, SaveOutcome};

use crate::{
    commands::{Command, HELP},
    render::{render_item, render_session},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub skip_labeled: bool,
    pub show_labeled: bool,
}

fn alert(error: &ControllerError) -> String {
    format!("! {error}")
}

/// Runs one command. `Break` ends the prompt loop; `Continue` carries the
/// text to show the annotator.
pub async fn dispatch<S: LabelService>(
    controller: &RangeSessionController<S>,
    confirm: &dyn Confirm,
    options: &mut LoadOptions,
    command: Command,
) -> ControlFlow<(), String> {
    let text = match command {
        Command::Load { start, end } => {
            let inputs = controller.snapshot().await.inputs;
            let start = start.or(inputs.start).unwrap_or(0);
            let end = end.or(inputs.end).unwrap_or(0);
            match controller
                .load_range(start, end, options.skip_labeled, options.show_labeled)
                .await
            {
                Ok(view) => render_session(&view),
                Err(error) => alert(&error),
            }
        }
        Command::Move(delta) => render_session(&controller.advance(delta).await),
        Command::Label(dimension, value) => {
            let message = if value.is_empty() {
                format!("{} cleared", dimension.field_name())
            } else {
                format!("{} = {value}", dimension.field_name())
            };
            controller.set_label(dimension, value).await;
            message
        }
        Command::Annotator(name) => {
            let message = format!("annotator = {name}");
            controller.set_annotator(name).await;
            message
        }
        Command::Save => match controller.save_label(confirm).await {
            Ok(SaveOutcome::Saved { sample_index, view }) => {
                format!("saved #{sample_index}\n{}", render_session(&view))
            }
            Ok(SaveOutcome::NothingToSave) => "nothing to save".to_string(),
            Ok(SaveOutcome::Cancelled) => "save cancelled".to_string(),
            Ok(SaveOutcome::Discarded { sample_index }) => {
                format!("saved #{sample_index}, but the range was reloaded meanwhile")
            }
            Err(error) => alert(&error),
        },
        Command::SkipLabeled(enabled) => {
            options.skip_labeled = enabled;
            format!("skip labeled: {enabled} (applies on next load)")
        }
        Command::ShowLabeled(enabled) => {
            options.show_labeled = enabled;
            format!("show labeled: {enabled} (applies on next load)")
        }
        Command::Progress => match controller.refresh_progress().await {
            Some(progress) => progress.to_string(),
            None => "progress unavailable".to_string(),
        },
        Command::Item(sample_index) => match controller.inspect_item(sample_index).await {
            Ok(item) => render_item(&item),
            Err(error) => alert(&error),
        },
        Command::View => render_session(&controller.snapshot().await),
        Command::Help => HELP.to_string(),
        Command::Quit => return ControlFlow::Break(()),
    };
    ControlFlow::Continue(text)
}
