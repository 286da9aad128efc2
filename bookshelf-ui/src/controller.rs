//! Interactive Trigger Controller
//!
//! Watches the ISBN field of an in-progress [`BookForm`], schedules a
//! resolution after a quiet period, and merges the resolved record into the
//! form.
//!
//! **State machine:** `Idle → Pending → Resolving → Idle`, observable through
//! [`LookupController::state_changes`]. Transitions are published while the
//! form lock is held, so the observed order matches the generation order.
//!
//! **Stale responses:** every edit, every resolution and teardown advances a
//! generation counter. A resolution remembers the generation it was issued
//! under and its response is dropped unless that generation is still the
//! latest when the response arrives. An in-flight request is never aborted,
//! only ignored.

use std::sync::Arc;
use std::time::Duration;

use bookshelf_common::{isbn, NormalizedBookRecord};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::client::BookInfoClient;
use crate::debounce::DebounceTimer;
use crate::error::LookupError;
use crate::form::BookForm;
use crate::store::{BookRecord, OwnerId, RecordStore};

/// Default quiet period after the last ISBN edit
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(600);

/// Trigger state of the ISBN field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    /// Debounce timer armed
    Pending,
    /// Request in flight
    Resolving,
}

/// Outcome of one resolution run
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// Response merged into the form
    Applied(NormalizedBookRecord),
    /// A newer edit, resolution or teardown superseded this run
    Stale,
}

struct Shared {
    form: BookForm,
    generation: u64,
    last_error: Option<LookupError>,
}

struct Inner {
    client: Arc<dyn BookInfoClient>,
    shared: Mutex<Shared>,
    state_tx: watch::Sender<TriggerState>,
}

impl Inner {
    fn set_state(&self, state: TriggerState) {
        self.state_tx.send_replace(state);
    }

    /// One resolution run.
    ///
    /// `armed_at` is the generation a debounced run was scheduled under; the
    /// run is skipped entirely if anything advanced the counter since.
    async fn run(&self, armed_at: Option<u64>) -> Result<ResolveOutcome, LookupError> {
        let (request, token) = {
            let mut shared = self.shared.lock().await;

            if armed_at.is_some_and(|armed| armed != shared.generation) {
                debug!("Debounced lookup superseded before it started");
                return Ok(ResolveOutcome::Stale);
            }

            let request = match shared.form.lookup_request() {
                Ok(request) => request,
                Err(e) => {
                    shared.last_error = Some(e.clone());
                    self.set_state(TriggerState::Idle);
                    return Err(e);
                }
            };

            shared.generation += 1;
            shared.last_error = None;
            // Published under the lock so a concurrent edit always lands after it
            self.set_state(TriggerState::Resolving);
            (request, shared.generation)
        };

        debug!(generation = token, isbn = ?request.isbn, "Resolving book info");
        let result = self.client.fetch_book_info(&request).await;

        let mut shared = self.shared.lock().await;
        if shared.generation != token {
            debug!(
                generation = token,
                latest = shared.generation,
                "Discarding stale book info response"
            );
            return Ok(ResolveOutcome::Stale);
        }

        self.set_state(TriggerState::Idle);
        match result {
            Ok(record) => {
                debug!(source = record.source.as_str(), "Merging resolved book info");
                shared.form.merge_resolved(&record);
                Ok(ResolveOutcome::Applied(record))
            }
            Err(e) => {
                warn!(error = %e, "Book info lookup failed");
                shared.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}

/// Drives metadata resolution for one add-book form
pub struct LookupController {
    inner: Arc<Inner>,
    timer: DebounceTimer,
    quiet_period: Duration,
}

impl LookupController {
    pub fn new(client: Arc<dyn BookInfoClient>) -> Self {
        Self::with_quiet_period(client, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(client: Arc<dyn BookInfoClient>, quiet_period: Duration) -> Self {
        let (state_tx, _) = watch::channel(TriggerState::Idle);
        Self {
            inner: Arc::new(Inner {
                client,
                shared: Mutex::new(Shared {
                    form: BookForm::default(),
                    generation: 0,
                    last_error: None,
                }),
                state_tx,
            }),
            timer: DebounceTimer::new(),
            quiet_period,
        }
    }

    /// Handle an edit of the ISBN field.
    ///
    /// A structurally complete value (10 or 13 characters after
    /// normalization) re-arms the debounce timer; anything else cancels it.
    /// Either way a resolution already in flight is invalidated.
    pub async fn on_isbn_input(&mut self, raw: &str) {
        let complete = isbn::complete_length(&isbn::normalize(raw));
        let generation = {
            let mut shared = self.inner.shared.lock().await;
            shared.form.isbn = raw.to_string();
            shared.generation += 1;
            self.inner.set_state(if complete {
                TriggerState::Pending
            } else {
                TriggerState::Idle
            });
            shared.generation
        };

        if !complete {
            self.timer.cancel();
            return;
        }

        let inner = self.inner.clone();
        self.timer.arm(self.quiet_period, async move {
            if let Err(e) = inner.run(Some(generation)).await {
                debug!(error = %e, "Debounced lookup not applied");
            }
        });
    }

    /// Resolve immediately (explicit user action).
    ///
    /// Validation failures are returned without any request being made.
    pub async fn trigger_now(&mut self) -> Result<ResolveOutcome, LookupError> {
        self.timer.cancel();
        self.inner.run(None).await
    }

    /// Stop all pending and in-flight work for this form.
    pub async fn teardown(&mut self) {
        self.timer.cancel();
        let mut shared = self.inner.shared.lock().await;
        shared.generation += 1;
        self.inner.set_state(TriggerState::Idle);
        debug!("Lookup controller torn down");
    }

    /// Snapshot of the form
    pub async fn form(&self) -> BookForm {
        self.inner.shared.lock().await.form.clone()
    }

    /// Edit non-ISBN form fields. ISBN edits go through [`Self::on_isbn_input`].
    pub async fn edit_form<F>(&self, edit: F)
    where
        F: FnOnce(&mut BookForm),
    {
        let mut shared = self.inner.shared.lock().await;
        let isbn = shared.form.isbn.clone();
        edit(&mut shared.form);
        shared.form.isbn = isbn;
    }

    /// Error from the most recent resolution run, if it failed
    pub async fn last_error(&self) -> Option<LookupError> {
        self.inner.shared.lock().await.last_error.clone()
    }

    pub fn state(&self) -> TriggerState {
        *self.inner.state_tx.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<TriggerState> {
        self.inner.state_tx.subscribe()
    }

    /// Validate the form and store it for `owner`.
    pub async fn submit(
        &self,
        store: &dyn RecordStore,
        owner: OwnerId,
    ) -> bookshelf_common::Result<BookRecord> {
        let draft = self.inner.shared.lock().await.form.to_draft()?;
        store.create(owner, draft).await
    }
}
