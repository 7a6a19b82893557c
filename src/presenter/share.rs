//! Share and copy actions on the result screen.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::consts::{APP_NAME, NOTICE_DURATION};
use crate::quote::QuoteResult;

pub const SHARE_TITLE: &str = "Today's quote - Meow-tivation";

/// Text handed to a share target or the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn from_quote(quote: &QuoteResult) -> Self {
        let mut text = quote.quote.clone().unwrap_or_default();
        if let Some(author) = quote.author.as_deref().filter(|a| !a.is_empty()) {
            text.push_str(&format!("\n- {author}"));
        }
        text.push_str(&format!("\n\nToday's quote from {APP_NAME} 🐱"));

        Self {
            title: SHARE_TITLE.to_string(),
            text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// The user dismissed the share dialog. Not reported.
    #[error("share cancelled")]
    Cancelled,
    #[error("nothing to share")]
    NothingToShare,
    #[error("share failed: {0}")]
    Failed(String),
    #[error("clipboard copy failed: {0}")]
    Clipboard(String),
}

/// A platform share sheet.
#[async_trait]
pub trait NativeShare: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Somewhere text can be copied to.
pub trait Clipboard: Send + Sync {
    /// False when this clipboard can't be used in the current environment.
    fn is_available(&self) -> bool;

    fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Shares by opening a pre-filled mail in the default mail client.
pub struct MailShare;

impl MailShare {
    pub fn mailto_url(payload: &SharePayload) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&payload.title),
            urlencoding::encode(&payload.text)
        )
    }
}

#[async_trait]
impl NativeShare for MailShare {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        open::that(Self::mailto_url(payload)).map_err(|e| ShareError::Failed(e.to_string()))
    }
}

/// The desktop clipboard.
///
/// On Linux the owning process serves the copied text, so the handle is
/// kept open for the session. A one-shot copy instead blocks for up to
/// `hold` or until another program takes the selection over.
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
    hold: Option<Duration>,
}

impl SystemClipboard {
    /// For interactive sessions: the handle lives as long as this value.
    pub fn for_session() -> Self {
        Self {
            handle: Mutex::new(None),
            hold: None,
        }
    }

    /// For a process that exits right after copying.
    pub fn one_shot(hold: Duration) -> Self {
        Self {
            handle: Mutex::new(None),
            hold: Some(hold),
        }
    }

    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }

    fn with_handle<T>(
        &self,
        f: impl FnOnce(&mut arboard::Clipboard) -> Result<T, arboard::Error>,
    ) -> Result<T, ShareError> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|_| ShareError::Clipboard("clipboard lock poisoned".to_string()))?;
        if handle.is_none() {
            *handle =
                Some(arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?);
        }
        match handle.as_mut() {
            Some(clipboard) => f(clipboard).map_err(|e| ShareError::Clipboard(e.to_string())),
            None => Err(ShareError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn is_available(&self) -> bool {
        self.with_handle(|_| Ok(())).is_ok()
    }

    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        let hold = self.hold;
        self.with_handle(|clipboard| set_text(clipboard, text, hold))
    }
}

#[cfg(target_os = "linux")]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    match hold {
        Some(hold) => clipboard
            .set()
            .wait_until(std::time::Instant::now() + hold)
            .text(text.to_string()),
        None => clipboard.set_text(text.to_string()),
    }
}

#[cfg(not(target_os = "linux"))]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}

/// OSC 52 escape asking the terminal to put `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Fallback for headless sessions: asks the terminal to copy via OSC 52
/// and prints the text so it can be selected by hand.
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn is_available(&self) -> bool {
        true
    }

    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        write_for_selection(&mut std::io::stdout().lock(), text)
            .map_err(|e| ShareError::Clipboard(e.to_string()))
    }
}

fn write_for_selection(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    write!(out, "{}", osc52_sequence(text))?;
    writeln!(out, "\n{text}\n")?;
    out.flush()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient, non-blocking message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "✅",
            NoticeKind::Error => "❌",
        }
    }

    /// How long the notice stays up.
    pub fn duration(&self) -> std::time::Duration {
        NOTICE_DURATION
    }
}

pub const COPIED_MESSAGE: &str = "Copied to clipboard!";
pub const SHARE_FAILED_MESSAGE: &str = "Sharing failed.";

/// Share targets available to the result screen.
pub struct Sharing {
    native: Option<Box<dyn NativeShare>>,
    clipboard: Box<dyn Clipboard>,
    fallback: Box<dyn Clipboard>,
}

impl Sharing {
    pub fn new(
        native: Option<Box<dyn NativeShare>>,
        clipboard: Box<dyn Clipboard>,
        fallback: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            native,
            clipboard,
            fallback,
        }
    }

    /// No share sheet, system clipboard with the terminal fallback.
    pub fn terminal() -> Self {
        Self::with_clipboard(SystemClipboard::for_session())
    }

    pub fn with_clipboard(clipboard: SystemClipboard) -> Self {
        Self::new(None, Box::new(clipboard), Box::new(TerminalClipboard))
    }

    /// Copy with the primary clipboard, or the fallback when the primary
    /// isn't usable here.
    pub fn copy(&self, text: &str) -> Result<(), ShareError> {
        if self.clipboard.is_available() {
            self.clipboard.write_text(text)
        } else {
            tracing::debug!("system clipboard unavailable, using terminal fallback");
            self.fallback.write_text(text)
        }
    }

    /// Share a payload. Returns the notice to show, if any.
    pub async fn share(&self, payload: &SharePayload) -> Option<Notice> {
        let result = match &self.native {
            Some(native) => native.share(payload).await,
            None => self.copy(&payload.text),
        };

        match (result, self.native.is_some()) {
            (Ok(()), true) => None,
            (Ok(()), false) => Some(Notice::success(COPIED_MESSAGE)),
            (Err(ShareError::Cancelled), _) => None,
            (Err(e), _) => {
                tracing::error!(error = %e, "share failed");
                Some(Notice::error(SHARE_FAILED_MESSAGE))
            }
        }
    }
}
