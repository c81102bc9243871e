use std::io::{self, Write};

use async_trait::async_trait;
use client_core::Confirm;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};

/// Line-oriented terminal shared by the command loop and confirmations.
pub struct Console {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Prints `prompt` and waits for the next line; `None` at end of input.
    pub async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;
        self.lines.lock().await.next_line().await
    }
}

#[async_trait]
impl Confirm for Console {
    async fn confirm(&self, message: &str) -> bool {
        match self.read_line(&format!("{message} [y/N] ")).await {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
