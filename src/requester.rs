//! The request screen's logic: category selection and quote acquisition.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::quote::{Category, QuoteResult};
use crate::source::{QuoteError, QuoteSource};
use crate::storage::HandoffStorage;

/// Which category, if any, the user has picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    NoCategorySelected,
    CategorySelected(Category),
}

impl CategorySelection {
    /// Apply a click on `category`: select it, switch to it, or toggle it off.
    pub fn click(&mut self, category: Category) {
        *self = match *self {
            CategorySelection::CategorySelected(current) if current == category => {
                CategorySelection::NoCategorySelected
            }
            _ => CategorySelection::CategorySelected(category),
        };
    }

    pub fn current(&self) -> Option<Category> {
        match self {
            CategorySelection::NoCategorySelected => None,
            CategorySelection::CategorySelected(c) => Some(*c),
        }
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.current() == Some(category)
    }
}

/// Whether a generate action is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Loading,
}

/// A generate action failed. Shown to the user once, selection kept.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error("failed to hand the quote to the result screen: {0:#}")]
    Handoff(anyhow::Error),
}

/// Drives one request screen: holds the selection, calls the source,
/// smooths the loading time, and writes the handoff slot on success.
pub struct Requester {
    source: Box<dyn QuoteSource>,
    storage: Arc<HandoffStorage>,
    min_loading: Duration,
    selection: CategorySelection,
    state: RequestState,
}

impl Requester {
    pub fn new(
        source: Box<dyn QuoteSource>,
        storage: Arc<HandoffStorage>,
        min_loading: Duration,
    ) -> Self {
        Self {
            source,
            storage,
            min_loading,
            selection: CategorySelection::default(),
            state: RequestState::Idle,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn selection(&self) -> CategorySelection {
        self.selection
    }

    pub fn click_category(&mut self, category: Category) {
        self.selection.click(category);
        tracing::debug!(selection = ?self.selection, "category clicked");
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Produce exactly one quote (stored in the handoff slot) or one error.
    ///
    /// On success the call takes at least the configured minimum loading
    /// time. The requester is back in [`RequestState::Idle`] either way.
    pub async fn generate(&mut self) -> Result<QuoteResult, GenerateError> {
        self.state = RequestState::Loading;
        let result = self.acquire().await;
        self.state = RequestState::Idle;

        match &result {
            Ok(_) => tracing::debug!("quote handed off"),
            Err(e) => tracing::error!(error = %e, "failed to generate quote"),
        }
        result
    }

    async fn acquire(&self) -> Result<QuoteResult, GenerateError> {
        let started = Instant::now();
        let quote = self.source.fetch(self.selection.current()).await?;

        let elapsed = started.elapsed();
        if let Some(remaining) = self.min_loading.checked_sub(elapsed)
            && !remaining.is_zero()
        {
            tracing::debug!(?elapsed, ?remaining, "padding loading time");
            tokio::time::sleep(remaining).await;
        }

        self.storage.write(&quote).map_err(GenerateError::Handoff)?;
        Ok(quote)
    }
}
