//! Paw-print loading line shown while a quote is on its way.
//!
//! Names the requested mood and rotates through cat asides so the minimum
//! loading time has something to look at.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::quote::Category;

const PAWS: &[&str] = &["🐾   ", " 🐾  ", "  🐾 ", "   🐾", "  🐾 ", " 🐾  "];

const ASIDES: &[&str] = &[
    "waking the cat",
    "chasing the red dot",
    "knocking quotes off the shelf",
    "sharpening claws",
];

const TICK: Duration = Duration::from_millis(120);

/// Ticks each aside stays up.
const TICKS_PER_ASIDE: usize = 12;

/// One frame of the loading line.
pub fn status_line(tick: usize, category: Option<Category>, elapsed: Duration) -> String {
    let paws = PAWS[tick % PAWS.len()];
    let aside = ASIDES[(tick / TICKS_PER_ASIDE) % ASIDES.len()];
    let mood = match category {
        Some(category) => format!("a {category} quote"),
        None => "a quote".to_string(),
    };
    format!(
        "{paws} fetching {mood} and a cat ({aside}) {:.1}s",
        elapsed.as_secs_f32()
    )
}

/// Redraws the loading line from a background task.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Draw on stderr so stdout only carries screen content.
    pub fn start(category: Option<Category>) -> Self {
        Self::start_with_writer(category, std::io::stderr())
    }

    pub fn start_with_writer<W>(category: Option<Category>, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (cancel, mut cancelled) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            for tick in 0.. {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancelled.changed() => break,
                }
                // \x1b[2K clears the line, \r returns to its start
                let _ = write!(
                    out,
                    "\x1b[2K\r{}",
                    status_line(tick, category, started.elapsed())
                );
                let _ = out.flush();
            }
            let _ = write!(out, "\x1b[2K\r");
            let _ = out.flush();
        });

        Self { handle, cancel }
    }

    /// Stop and clear the line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_names_the_category() {
        let line = status_line(0, Some(Category::Peace), Duration::ZERO);
        assert!(line.contains("fetching a peace quote"));
        assert!(status_line(0, None, Duration::ZERO).contains("fetching a quote and a cat"));
    }

    #[test]
    fn asides_rotate() {
        let first = status_line(0, None, Duration::ZERO);
        let later = status_line(TICKS_PER_ASIDE, None, Duration::ZERO);
        assert!(first.contains(ASIDES[0]));
        assert!(later.contains(ASIDES[1]));
    }

    #[test]
    fn line_shows_elapsed_seconds() {
        let line = status_line(3, None, Duration::from_millis(1500));
        assert!(line.ends_with("1.5s"));
    }

    #[tokio::test(start_paused = true)]
    async fn draws_then_clears() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start_with_writer(Some(Category::Love), buf.clone());
        tokio::time::sleep(TICK * 3).await;
        spinner.stop().await;

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("a love quote"));
        assert!(out.ends_with("\x1b[2K\r"));
    }

    #[tokio::test]
    async fn immediate_stop() {
        Spinner::start(None).stop().await;
    }
}
