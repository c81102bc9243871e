use std::{ops::ControlFlow, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{HttpLabelService, RangeSessionController};
use tracing::info;

mod commands;
mod config;
mod console;
mod dispatch;
mod render;

use commands::{parse_command, Command};
use config::{load_settings, Settings};
use console::Console;
use dispatch::{dispatch, LoadOptions};

#[derive(Parser, Debug)]
#[command(about = "Label dataset records for critical, popular and commercial success")]
struct Args {
    #[arg(long, default_value = "labeler.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    annotator: Option<String>,
    /// Also load records that already carry a label.
    #[arg(long)]
    include_labeled: bool,
    /// Show stored labels of already labeled records.
    #[arg(long)]
    show_labeled: bool,
    /// Load this range right after start-up.
    #[arg(long, requires = "end")]
    start: Option<i64>,
    #[arg(long, requires = "start")]
    end: Option<i64>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.server_url {
            settings.server_url = v.clone();
        }
        if let Some(v) = &self.annotator {
            settings.annotator = v.clone();
        }
        if self.include_labeled {
            settings.skip_labeled = false;
        }
        if self.show_labeled {
            settings.show_labeled = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    args.apply(&mut settings);

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let service = HttpLabelService::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let controller = RangeSessionController::new(service);
    controller.set_annotator(settings.annotator.clone()).await;
    let mut options = LoadOptions {
        skip_labeled: settings.skip_labeled,
        show_labeled: settings.show_labeled,
    };

    let inputs = controller.initialize().await;
    info!(
        server_url = %settings.server_url,
        start = ?inputs.start,
        end = ?inputs.end,
        "labeler ready"
    );
    if let (Some(start), Some(end)) = (inputs.start, inputs.end) {
        println!("dataset range: {start}..{end}");
    }
    if let Some(progress) = controller.snapshot().await.progress {
        println!("{progress}");
    }
    println!("type 'help' for commands");

    let console = Console::new();
    if let (Some(start), Some(end)) = (args.start, args.end) {
        let command = Command::Load {
            start: Some(start),
            end: Some(end),
        };
        if let ControlFlow::Continue(output) =
            dispatch(&controller, &console, &mut options, command).await
        {
            println!("{}", output.trim_end());
        }
    }

    while let Some(line) = console
        .read_line("> ")
        .await
        .context("failed to read from stdin")?
    {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match dispatch(&controller, &console, &mut options, command).await {
                ControlFlow::Continue(output) => println!("{}", output.trim_end()),
                ControlFlow::Break(()) => break,
            },
            Err(error) => println!("! {error}"),
        }
    }

    Ok(())
}
