//! Trigger controller tests
//!
//! Most tests run on a paused clock: sleeping in the test auto-advances time
//! once every spawned task is idle, so debounce and slow-response timing is
//! deterministic. The edit/resolution race runs on a multi-threaded runtime.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bookshelf_common::api::BookInfoRequest;
use bookshelf_common::{NormalizedBookRecord, RecordSource};
use bookshelf_ui::client::BookInfoClient;
use bookshelf_ui::controller::DEFAULT_QUIET_PERIOD;
use bookshelf_ui::{LookupController, LookupError, ResolveOutcome, TriggerState};

// ============================================================================
// Recording client
// ============================================================================

type Reply = (Duration, Result<NormalizedBookRecord, LookupError>);

/// Book-info client answering from a reply queue after a per-reply delay
#[derive(Default)]
struct RecordingClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<BookInfoRequest>>,
}

impl RecordingClient {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn reply(&self, delay: Duration, result: Result<NormalizedBookRecord, LookupError>) {
        self.replies.lock().unwrap().push_back((delay, result));
    }

    fn calls(&self) -> Vec<BookInfoRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn requested_isbns(&self) -> Vec<Option<String>> {
        self.calls().into_iter().map(|call| call.isbn).collect()
    }
}

#[async_trait]
impl BookInfoClient for RecordingClient {
    async fn fetch_book_info(
        &self,
        request: &BookInfoRequest,
    ) -> Result<NormalizedBookRecord, LookupError> {
        self.calls.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        let (delay, result) = next.unwrap_or_else(|| {
            (
                Duration::ZERO,
                Ok(NormalizedBookRecord::stub(
                    request.title.as_deref(),
                    request.author.as_deref(),
                )),
            )
        });
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

fn record(title: &str, description: Option<&str>) -> NormalizedBookRecord {
    NormalizedBookRecord::new(
        RecordSource::OpenLibraryIsbn,
        Some(title.to_string()),
        vec![format!("{} Author", title)],
        Some(format!("https://covers.test/{}.jpg", title.replace(' ', "-"))),
        description.map(str::to_string),
    )
}

fn controller(client: &Arc<RecordingClient>) -> LookupController {
    LookupController::new(client.clone())
}

/// Sleep long enough for an armed timer to fire and its run to finish
async fn past_quiet_period() {
    tokio::time::sleep(DEFAULT_QUIET_PERIOD + Duration::from_millis(50)).await;
}

// ============================================================================
// Debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_makes_one_call_with_final_value() {
    let client = RecordingClient::new();
    client.reply(Duration::ZERO, Ok(record("Lab Girl", None)));
    let mut controller = controller(&client);

    let edits = [
        "978",
        "978-0-14",
        "978-0-306-40615-7",
        "978-0-14-312774",
        "978-0-14-312774-1",
    ];
    for edit in edits {
        controller.on_isbn_input(edit).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert!(client.calls().is_empty());

    past_quiet_period().await;
    assert_eq!(client.requested_isbns(), vec![Some("9780143127741".to_string())]);

    let form = controller.form().await;
    assert_eq!(form.isbn, "978-0-14-312774-1");
    assert_eq!(form.title, "Lab Girl");
    assert_eq!(form.author, "Lab Girl Author");
    assert_eq!(form.cover_url, "https://covers.test/Lab-Girl.jpg");
}

#[tokio::test(start_paused = true)]
async fn test_incomplete_edit_cancels_pending_timer() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);

    controller.on_isbn_input("0306406152").await;
    assert_eq!(controller.state(), TriggerState::Pending);

    tokio::time::sleep(Duration::from_millis(300)).await;
    controller.on_isbn_input("030640615").await;
    assert_eq!(controller.state(), TriggerState::Idle);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_state_transitions() {
    let client = RecordingClient::new();
    client.reply(Duration::from_secs(2), Ok(record("Slowly", None)));
    let mut controller = controller(&client);
    let mut states = controller.state_changes();
    assert_eq!(*states.borrow(), TriggerState::Idle);

    controller.on_isbn_input("9780306406157").await;
    assert_eq!(*states.borrow_and_update(), TriggerState::Pending);

    past_quiet_period().await;
    assert_eq!(controller.state(), TriggerState::Resolving);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.state(), TriggerState::Idle);
    assert_eq!(controller.form().await.title, "Slowly");
}

#[tokio::test(start_paused = true)]
async fn test_debounced_bad_check_digit_records_error() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);

    controller.on_isbn_input("9780143127742").await;
    past_quiet_period().await;

    assert!(client.calls().is_empty());
    assert!(matches!(
        controller.last_error().await,
        Some(LookupError::InvalidIsbn(_))
    ));
    assert_eq!(controller.state(), TriggerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_transport_error_records_error() {
    let client = RecordingClient::new();
    client.reply(
        Duration::ZERO,
        Err(LookupError::Transport("connection refused".to_string())),
    );
    let mut controller = controller(&client);
    controller.edit_form(|form| form.title = "Kept".to_string()).await;

    controller.on_isbn_input("9780143127741").await;
    past_quiet_period().await;

    assert_eq!(client.calls().len(), 1);
    assert_eq!(
        controller.last_error().await,
        Some(LookupError::Transport("connection refused".to_string()))
    );
    assert_eq!(controller.form().await.title, "Kept");
}

// ============================================================================
// Manual trigger
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_requires_input() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);

    let result = controller.trigger_now().await;
    assert_eq!(result, Err(LookupError::MissingInput));
    assert_eq!(controller.last_error().await, Some(LookupError::MissingInput));
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_rejects_bad_check_digit() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);

    controller.on_isbn_input("0-306-40615-3").await;
    let result = controller.trigger_now().await;

    assert!(matches!(result, Err(LookupError::InvalidIsbn(_))));
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_with_text_only() {
    let client = RecordingClient::new();
    client.reply(Duration::ZERO, Ok(record("Solaris", Some("A planet ocean."))));
    let mut controller = controller(&client);

    controller
        .edit_form(|form| {
            form.title = "Solaris".to_string();
            form.author = "Lem".to_string();
        })
        .await;
    let outcome = controller.trigger_now().await.unwrap();

    assert!(matches!(outcome, ResolveOutcome::Applied(_)));
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].isbn, None);
    assert_eq!(calls[0].title.as_deref(), Some("Solaris"));
    assert_eq!(controller.form().await.notes, "A planet ocean.");
}

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_cancels_pending_timer() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);

    controller.on_isbn_input("9780143127741").await;
    controller.trigger_now().await.unwrap();
    past_quiet_period().await;

    assert_eq!(client.calls().len(), 1);
}

// ============================================================================
// Merge rules
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_existing_notes_never_overwritten() {
    let client = RecordingClient::new();
    client.reply(Duration::ZERO, Ok(record("Dune", Some("Desert planet."))));
    let mut controller = controller(&client);

    controller
        .edit_form(|form| form.notes = "Lent to Sam".to_string())
        .await;
    controller.on_isbn_input("9780306406157").await;
    past_quiet_period().await;

    let form = controller.form().await;
    assert_eq!(form.title, "Dune");
    assert_eq!(form.notes, "Lent to Sam");
}

#[tokio::test(start_paused = true)]
async fn test_empty_notes_populated() {
    let client = RecordingClient::new();
    client.reply(Duration::ZERO, Ok(record("Dune", Some("Desert planet."))));
    let mut controller = controller(&client);

    controller.on_isbn_input("9780306406157").await;
    past_quiet_period().await;

    assert_eq!(controller.form().await.notes, "Desert planet.");
}

// ============================================================================
// Stale responses and teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_response_is_discarded() {
    let client = RecordingClient::new();
    client.reply(Duration::from_secs(5), Ok(record("Slow Title", None)));
    client.reply(Duration::ZERO, Ok(record("Fast Title", None)));
    let mut controller = controller(&client);

    controller.on_isbn_input("9780143127741").await;
    past_quiet_period().await;
    assert_eq!(controller.state(), TriggerState::Resolving);

    controller.on_isbn_input("9780306406157").await;
    past_quiet_period().await;
    assert_eq!(controller.form().await.title, "Fast Title");

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(client.calls().len(), 2);
    assert_eq!(controller.form().await.title, "Fast Title");
    assert_eq!(controller.state(), TriggerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_supersedes_in_flight_lookup() {
    let client = RecordingClient::new();
    client.reply(Duration::from_secs(5), Ok(record("Debounced", None)));
    client.reply(Duration::ZERO, Ok(record("Manual", None)));
    let mut controller = controller(&client);

    controller.on_isbn_input("9780143127741").await;
    past_quiet_period().await;

    let outcome = controller.trigger_now().await.unwrap();
    assert!(matches!(outcome, ResolveOutcome::Applied(ref r) if r.title.as_deref() == Some("Manual")));

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(controller.form().await.title, "Manual");
}

#[tokio::test(start_paused = true)]
async fn test_teardown_prevents_late_callback() {
    let client = RecordingClient::new();
    let mut controller = controller(&client);
    controller.edit_form(|form| form.title = "Visible".to_string()).await;

    controller.on_isbn_input("9780143127741").await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    controller.teardown().await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(client.calls().is_empty());
    assert_eq!(controller.state(), TriggerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_discards_in_flight_response() {
    let client = RecordingClient::new();
    client.reply(Duration::from_secs(3), Ok(record("Too Late", None)));
    let mut controller = controller(&client);
    controller.edit_form(|form| form.title = "Visible".to_string()).await;

    controller.on_isbn_input("9780143127741").await;
    past_quiet_period().await;
    assert_eq!(client.calls().len(), 1);
    controller.teardown().await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.form().await.title, "Visible");
    assert_eq!(controller.state(), TriggerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_incomplete_edit_during_resolution_settles_idle() {
    let client = RecordingClient::new();
    client.reply(Duration::from_secs(3), Ok(record("Superseded", None)));
    let mut controller = controller(&client);

    controller.on_isbn_input("9780143127741").await;
    past_quiet_period().await;
    assert_eq!(controller.state(), TriggerState::Resolving);

    controller.on_isbn_input("978014312774").await;
    assert_eq!(controller.state(), TriggerState::Idle);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(controller.state(), TriggerState::Idle);
    assert_eq!(controller.form().await.title, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_edit_racing_resolution_never_leaves_resolving() {
    let client = RecordingClient::new();
    let mut controller =
        LookupController::with_quiet_period(client.clone(), Duration::from_millis(1));

    for _ in 0..200 {
        controller.on_isbn_input("9780143127741").await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        controller.on_isbn_input("978014312774").await;
        assert_eq!(controller.state(), TriggerState::Idle);
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(controller.state(), TriggerState::Idle);
}
