//! The result screen's logic: read the handoff slot, render it, and run
//! the share and "new quote" actions.

pub mod image;
pub mod reveal;
pub mod share;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::consts::{ERROR_DISPLAY_DELAY, REDIRECT_DELAY};
use crate::quote::{Handoff, QuoteResult};
use crate::storage::HandoffStorage;
use image::{ImageLoader, placeholder_image, resolve_image};
use share::{Notice, SHARE_FAILED_MESSAGE, SharePayload, Sharing};

pub const MISSING_QUOTE_MESSAGE: &str = "Could not load a quote.";
pub const LOAD_ERROR_MESSAGE: &str = "Something went wrong while loading the quote.";

/// Everything the result screen shows for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuote {
    /// Image source after resolution and load fallback.
    pub image: String,
    pub quote_text: String,
    /// Whether `quote_text` is real content worth the typewriter reveal.
    pub animate: bool,
    /// `"- {author}"`, or empty.
    pub author_line: String,
    /// Human-readable creation time, hidden when `None`.
    pub timestamp: Option<String>,
}

/// What the result screen does after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Render(RenderedQuote),
    /// Nothing was handed off; go back to the request screen quietly.
    Redirect { after: Duration },
    /// The handoff says the request failed; show `view`, then go back.
    Failed {
        view: RenderedQuote,
        redirect_after: Duration,
    },
}

/// Format an ISO-8601 timestamp for display in local time.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let local = parse_timestamp(raw.trim())?;
    Some(local.format("%B %-d, %Y %H:%M").to_string())
}

/// Offset forms keep their offset, date-times without one are local, and a
/// bare date is midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Local));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return naive.and_local_timezone(Local).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().with_timezone(&Local))
}

fn author_line(author: Option<&str>) -> String {
    match author.filter(|a| !a.is_empty()) {
        Some(author) => format!("- {author}"),
        None => String::new(),
    }
}

pub struct Presenter {
    storage: Arc<HandoffStorage>,
    images: Box<dyn ImageLoader>,
    sharing: Sharing,
}

impl Presenter {
    pub fn new(storage: Arc<HandoffStorage>, images: Box<dyn ImageLoader>, sharing: Sharing) -> Self {
        Self {
            storage,
            images,
            sharing,
        }
    }

    /// Read the handoff slot and decide what to show.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let Some(raw) = self.storage.read()? else {
            tracing::warn!("no quote was handed off, redirecting to the request screen");
            return Ok(LoadOutcome::Redirect {
                after: REDIRECT_DELAY,
            });
        };

        match Handoff::parse(&raw) {
            Ok(Handoff::Quote(quote)) => Ok(LoadOutcome::Render(self.render(&quote).await)),
            Ok(Handoff::Failed) => {
                tracing::error!(stored = %raw, "handed-off response reports failure");
                Ok(Self::failed())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to parse handed-off quote");
                Ok(Self::failed())
            }
        }
    }

    fn failed() -> LoadOutcome {
        LoadOutcome::Failed {
            view: RenderedQuote {
                image: placeholder_image(),
                quote_text: LOAD_ERROR_MESSAGE.to_string(),
                animate: false,
                author_line: String::new(),
                timestamp: None,
            },
            redirect_after: ERROR_DISPLAY_DELAY + REDIRECT_DELAY,
        }
    }

    /// Build the view for a quote, substituting the placeholder for any
    /// image that fails to load.
    pub async fn render(&self, quote: &QuoteResult) -> RenderedQuote {
        let mut image = resolve_image(quote.image_url.as_deref());
        if quote.image_url.as_deref().is_some_and(|u| !u.trim().is_empty())
            && let Err(e) = self.images.load(&image).await
        {
            tracing::warn!(error = %e, src = %image, "image failed to load, using placeholder");
            image = placeholder_image();
        }

        let (quote_text, animate) = match quote.quote.as_deref().filter(|q| !q.is_empty()) {
            Some(text) => (text.to_string(), true),
            None => (MISSING_QUOTE_MESSAGE.to_string(), false),
        };

        RenderedQuote {
            image,
            quote_text,
            animate,
            author_line: author_line(quote.author.as_deref()),
            timestamp: quote.timestamp.as_deref().and_then(format_timestamp),
        }
    }

    /// Share the stored quote. Returns the notice to show, if any.
    pub async fn share(&self) -> Option<Notice> {
        let quote = match self.stored_quote() {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!(error = %e, "nothing to share");
                return Some(Notice::error(SHARE_FAILED_MESSAGE));
            }
        };
        self.sharing.share(&SharePayload::from_quote(&quote)).await
    }

    /// Re-read the slot for sharing. Envelopes are unwrapped.
    fn stored_quote(&self) -> Result<QuoteResult, share::ShareError> {
        let raw = self
            .storage
            .read()
            .map_err(|e| share::ShareError::Failed(format!("{e:#}")))?
            .ok_or(share::ShareError::NothingToShare)?;
        match Handoff::parse(&raw) {
            Ok(Handoff::Quote(quote)) => Ok(quote),
            Ok(Handoff::Failed) => Err(share::ShareError::NothingToShare),
            Err(e) => Err(share::ShareError::Failed(e.to_string())),
        }
    }

    /// Clear the slot so the request screen starts fresh.
    pub fn new_quote(&self) -> Result<()> {
        self.storage.clear()?;
        tracing::debug!("handoff slot cleared");
        Ok(())
    }
}
