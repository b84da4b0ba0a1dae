use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use client_core::{ConfirmPrompt, Notice, NoticeLevel, Notifier};

/// Prints notices on stderr so stdout stays clean for tables and JSON.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => eprintln!("ok: {}", notice.message),
            NoticeLevel::Failure => eprintln!("error: {}", notice.message),
        }
    }
}

/// Asks on stderr and reads the answer from stdin.
pub struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            eprint!("{message} [y/N] ");
            let _ = io::stderr().flush();
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() {
                return false;
            }
            is_yes(&line)
        })
        .await
        .unwrap_or(false)
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}
