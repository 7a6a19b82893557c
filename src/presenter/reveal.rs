//! Typewriter-style reveal of the quote text.
//!
//! Runs as a background task so the result screen stays responsive.
//! [`TextReveal::finish`] flushes whatever hasn't been typed yet.

use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct TextReveal {
    /// Taken once the task has been awaited to completion.
    handle: Option<JoinHandle<()>>,
    skip: tokio::sync::watch::Sender<bool>,
}

impl TextReveal {
    /// Reveal `text` on stdout, one character per `interval`.
    pub fn start(text: &str, interval: Duration) -> Self {
        Self::start_with_writer(text, interval, std::io::stdout())
    }

    pub fn start_with_writer<W>(text: &str, interval: Duration, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (skip_tx, mut skip_rx) = tokio::sync::watch::channel(false);
        let chars: Vec<char> = text.chars().collect();

        let handle = tokio::spawn(async move {
            let mut shown = 0;
            while shown < chars.len() {
                let _ = write!(out, "{}", chars[shown]);
                let _ = out.flush();
                shown += 1;
                if shown == chars.len() {
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = skip_rx.changed() => break,
                }
            }
            let rest: String = chars[shown..].iter().collect();
            let _ = writeln!(out, "{rest}");
            let _ = out.flush();
        });

        Self {
            handle: Some(handle),
            skip: skip_tx,
        }
    }

    pub fn is_done(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Resolve once everything has been typed. Cancel-safe, so it can sit
    /// in a `select!` next to user input.
    pub async fn done(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }

    /// Wait for the reveal to finish on its own.
    pub async fn wait(mut self) {
        self.done().await;
    }

    /// Show the rest of the text immediately.
    pub async fn finish(mut self) {
        let _ = self.skip.send(true);
        self.done().await;
    }
}
