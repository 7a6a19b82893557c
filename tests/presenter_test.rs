use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use meowtivation::presenter::image::{HttpImageLoader, ImageLoadError, ImageLoader, placeholder_image};
use meowtivation::presenter::share::{
    Clipboard, NativeShare, NoticeKind, ShareError, SharePayload, Sharing,
};
use meowtivation::presenter::{LOAD_ERROR_MESSAGE, LoadOutcome, MISSING_QUOTE_MESSAGE, Presenter};
use meowtivation::quote::QuoteResult;
use meowtivation::storage::HandoffStorage;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Every image loads.
struct AlwaysLoads;

#[async_trait]
impl ImageLoader for AlwaysLoads {
    async fn load(&self, _src: &str) -> Result<(), ImageLoadError> {
        Ok(())
    }
}

/// Every image fails, like a 404.
struct NeverLoads;

#[async_trait]
impl ImageLoader for NeverLoads {
    async fn load(&self, _src: &str) -> Result<(), ImageLoadError> {
        Err(ImageLoadError::Status(404))
    }
}

/// Records copied text. Clones share the record.
#[derive(Clone, Default)]
struct RecordingClipboard {
    available: bool,
    fail: bool,
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    fn working() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn is_available(&self) -> bool {
        self.available
    }

    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::Clipboard("denied".to_string()));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

enum NativeBehavior {
    Succeed,
    Cancel,
    Fail,
}

struct StubNative {
    behavior: NativeBehavior,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl NativeShare for StubNative {
    async fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            NativeBehavior::Succeed => Ok(()),
            NativeBehavior::Cancel => Err(ShareError::Cancelled),
            NativeBehavior::Fail => Err(ShareError::Failed("no share target".to_string())),
        }
    }
}

fn clipboard_only(clipboard: RecordingClipboard, fallback: RecordingClipboard) -> Sharing {
    Sharing::new(None, Box::new(clipboard), Box::new(fallback))
}

fn presenter_with(storage: &Arc<HandoffStorage>, images: Box<dyn ImageLoader>, sharing: Sharing) -> Presenter {
    Presenter::new(Arc::clone(storage), images, sharing)
}

fn presenter(storage: &Arc<HandoffStorage>) -> Presenter {
    presenter_with(
        storage,
        Box::new(AlwaysLoads),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    )
}

fn storage_with(raw: &str) -> Arc<HandoffStorage> {
    let storage = Arc::new(HandoffStorage::in_memory().unwrap());
    storage.write_raw(raw).unwrap();
    storage
}

const SAMPLE: &str = r#"{"quote":"X","author":"Y","imageUrl":"https://a/b.png","category":"love","timestamp":"2024-01-01T00:00:00Z"}"#;

// ── Load ──────────────────────────────────────────────────────────

#[tokio::test]
async fn renders_flat_handoff() {
    let storage = storage_with(SAMPLE);
    let outcome = presenter(&storage).load().await.unwrap();

    let LoadOutcome::Render(view) = outcome else {
        panic!("expected Render, got {outcome:?}");
    };
    assert_eq!(view.quote_text, "X");
    assert!(view.animate);
    assert_eq!(view.author_line, "- Y");
    assert_eq!(view.image, "https://a/b.png");
    assert!(!view.timestamp.unwrap().is_empty());
}

#[tokio::test]
async fn renders_successful_envelope() {
    let storage = storage_with(&format!(r#"{{"success":true,"data":{SAMPLE}}}"#));
    let outcome = presenter(&storage).load().await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Render(ref v) if v.quote_text == "X"));
}

#[tokio::test]
async fn empty_storage_redirects_quietly() {
    let storage = Arc::new(HandoffStorage::in_memory().unwrap());
    let outcome = presenter(&storage).load().await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Redirect {
            after: Duration::from_millis(1000)
        }
    );
}

#[tokio::test]
async fn failed_envelope_shows_error_then_redirects() {
    let storage = storage_with(&format!(r#"{{"success":false,"data":{SAMPLE}}}"#));
    let outcome = presenter(&storage).load().await.unwrap();

    let LoadOutcome::Failed {
        view,
        redirect_after,
    } = outcome
    else {
        panic!("expected Failed, got {outcome:?}");
    };
    assert_eq!(view.quote_text, LOAD_ERROR_MESSAGE);
    assert_eq!(view.image, placeholder_image());
    assert!(view.author_line.is_empty());
    assert!(redirect_after >= Duration::from_millis(2000));
}

#[tokio::test]
async fn corrupt_storage_is_a_load_failure() {
    let storage = storage_with("{not json");
    let outcome = presenter(&storage).load().await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Failed { .. }));
}

#[tokio::test]
async fn missing_fields_get_placeholders() {
    let storage = storage_with(r#"{"category":"random"}"#);
    let LoadOutcome::Render(view) = presenter(&storage).load().await.unwrap() else {
        panic!("expected Render");
    };
    assert_eq!(view.quote_text, MISSING_QUOTE_MESSAGE);
    assert!(!view.animate);
    assert_eq!(view.author_line, "");
    assert!(view.timestamp.is_none());
    assert!(view.image.starts_with("data:image/svg+xml"));
}

#[tokio::test]
async fn empty_image_url_gets_placeholder() {
    let storage = storage_with(r#"{"quote":"X","imageUrl":""}"#);
    let LoadOutcome::Render(view) = presenter(&storage).load().await.unwrap() else {
        panic!("expected Render");
    };
    assert!(view.image.starts_with("data:image/svg+xml"));
    assert!(!view.image.is_empty());
}

#[tokio::test]
async fn unparseable_timestamp_is_hidden() {
    let storage = storage_with(r#"{"quote":"X","timestamp":"last tuesday"}"#);
    let LoadOutcome::Render(view) = presenter(&storage).load().await.unwrap() else {
        panic!("expected Render");
    };
    assert!(view.timestamp.is_none());
}

#[tokio::test]
async fn image_load_failure_falls_back_to_placeholder() {
    let storage = storage_with(SAMPLE);
    let presenter = presenter_with(
        &storage,
        Box::new(NeverLoads),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    );
    let LoadOutcome::Render(view) = presenter.load().await.unwrap() else {
        panic!("expected Render");
    };
    assert_eq!(view.image, placeholder_image());
    assert_eq!(view.quote_text, "X");
}

#[tokio::test]
async fn http_404_image_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let missing = storage_with(&format!(r#"{{"quote":"X","imageUrl":"{}/cat.png"}}"#, server.uri()));
    let presenter = presenter_with(
        &missing,
        Box::new(HttpImageLoader::new().unwrap()),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    );
    let LoadOutcome::Render(view) = presenter.load().await.unwrap() else {
        panic!("expected Render");
    };
    assert_eq!(view.image, placeholder_image());

    let ok_url = format!("{}/ok.png", server.uri());
    let found = storage_with(&format!(r#"{{"quote":"X","imageUrl":"{ok_url}"}}"#));
    let presenter = presenter_with(
        &found,
        Box::new(HttpImageLoader::new().unwrap()),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    );
    let LoadOutcome::Render(view) = presenter.load().await.unwrap() else {
        panic!("expected Render");
    };
    assert_eq!(view.image, ok_url);
}

#[tokio::test]
async fn stalled_image_host_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, b'P', b'N', b'G'])
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let storage = storage_with(&format!(r#"{{"quote":"X","imageUrl":"{}/slow.png"}}"#, server.uri()));
    let presenter = presenter_with(
        &storage,
        Box::new(HttpImageLoader::with_timeout(Duration::from_millis(200)).unwrap()),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    );

    let outcome = tokio::time::timeout(Duration::from_secs(5), presenter.load())
        .await
        .expect("result screen blocked on a stalled image")
        .unwrap();
    let LoadOutcome::Render(view) = outcome else {
        panic!("expected Render");
    };
    assert_eq!(view.image, placeholder_image());
    assert_eq!(view.quote_text, "X");
}

#[tokio::test]
async fn malformed_data_uri_falls_back_to_placeholder() {
    let storage = storage_with(r#"{"quote":"X","imageUrl":"data:image/png;base64,@@@"}"#);
    let presenter = presenter_with(
        &storage,
        Box::new(HttpImageLoader::new().unwrap()),
        clipboard_only(RecordingClipboard::working(), RecordingClipboard::working()),
    );
    let LoadOutcome::Render(view) = presenter.load().await.unwrap() else {
        panic!("expected Render");
    };
    assert_eq!(view.image, placeholder_image());
}

// ── New quote ─────────────────────────────────────────────────────

#[tokio::test]
async fn new_quote_clears_slot_so_next_load_redirects() {
    let storage = storage_with(SAMPLE);
    let presenter = presenter(&storage);
    assert!(matches!(presenter.load().await.unwrap(), LoadOutcome::Render(_)));

    presenter.new_quote().unwrap();
    assert!(storage.read().unwrap().is_none());
    assert!(matches!(
        presenter.load().await.unwrap(),
        LoadOutcome::Redirect { .. }
    ));
}

// ── Share ─────────────────────────────────────────────────────────

#[tokio::test]
async fn share_without_native_copies_to_clipboard() {
    let storage = storage_with(SAMPLE);
    let clipboard = RecordingClipboard::working();
    let fallback = RecordingClipboard::working();
    let presenter = presenter_with(
        &storage,
        Box::new(AlwaysLoads),
        clipboard_only(clipboard.clone(), fallback.clone()),
    );

    let notice = presenter.share().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Copied to clipboard!");

    let copied = clipboard.copied();
    assert_eq!(copied.len(), 1);
    assert!(copied[0].starts_with("X\n- Y"));
    assert!(fallback.copied().is_empty());
}

#[tokio::test]
async fn share_uses_fallback_when_clipboard_unavailable() {
    let storage = storage_with(SAMPLE);
    let clipboard = RecordingClipboard::default();
    let fallback = RecordingClipboard::working();
    let presenter = presenter_with(
        &storage,
        Box::new(AlwaysLoads),
        clipboard_only(clipboard.clone(), fallback.clone()),
    );

    let notice = presenter.share().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(clipboard.copied().is_empty());
    assert_eq!(fallback.copied().len(), 1);
}

#[tokio::test]
async fn clipboard_failure_shows_error_notice() {
    let storage = storage_with(SAMPLE);
    let clipboard = RecordingClipboard {
        available: true,
        fail: true,
        ..RecordingClipboard::default()
    };
    let presenter = presenter_with(
        &storage,
        Box::new(AlwaysLoads),
        clipboard_only(clipboard, RecordingClipboard::working()),
    );

    let notice = presenter.share().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Sharing failed.");
}

#[tokio::test]
async fn native_share_is_preferred_and_silent() {
    let storage = storage_with(SAMPLE);
    let calls = Arc::new(AtomicUsize::new(0));
    let clipboard = RecordingClipboard::working();
    let sharing = Sharing::new(
        Some(Box::new(StubNative {
            behavior: NativeBehavior::Succeed,
            calls: Arc::clone(&calls),
        })),
        Box::new(clipboard.clone()),
        Box::new(RecordingClipboard::working()),
    );
    let presenter = presenter_with(&storage, Box::new(AlwaysLoads), sharing);

    assert!(presenter.share().await.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(clipboard.copied().is_empty());
}

#[tokio::test]
async fn cancelled_native_share_is_not_an_error() {
    let storage = storage_with(SAMPLE);
    let sharing = Sharing::new(
        Some(Box::new(StubNative {
            behavior: NativeBehavior::Cancel,
            calls: Arc::new(AtomicUsize::new(0)),
        })),
        Box::new(RecordingClipboard::working()),
        Box::new(RecordingClipboard::working()),
    );
    let presenter = presenter_with(&storage, Box::new(AlwaysLoads), sharing);
    assert!(presenter.share().await.is_none());
}

#[tokio::test]
async fn failed_native_share_shows_error_notice() {
    let storage = storage_with(SAMPLE);
    let sharing = Sharing::new(
        Some(Box::new(StubNative {
            behavior: NativeBehavior::Fail,
            calls: Arc::new(AtomicUsize::new(0)),
        })),
        Box::new(RecordingClipboard::working()),
        Box::new(RecordingClipboard::working()),
    );
    let presenter = presenter_with(&storage, Box::new(AlwaysLoads), sharing);
    let notice = presenter.share().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
}

#[tokio::test]
async fn share_with_empty_slot_shows_error_notice() {
    let storage = Arc::new(HandoffStorage::in_memory().unwrap());
    let notice = presenter(&storage).share().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
}

#[tokio::test]
async fn share_rereads_the_slot() {
    let storage = storage_with(SAMPLE);
    let clipboard = RecordingClipboard::working();
    let presenter = presenter_with(
        &storage,
        Box::new(AlwaysLoads),
        clipboard_only(clipboard.clone(), RecordingClipboard::working()),
    );

    storage
        .write(&QuoteResult {
            quote: Some("fresh".to_string()),
            author: Some("Z".to_string()),
            ..QuoteResult::default()
        })
        .unwrap();
    presenter.share().await.unwrap();
    assert!(clipboard.copied()[0].starts_with("fresh\n- Z"));
}
