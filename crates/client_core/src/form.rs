//! Record Form Controller: create/edit reconciliation for one record.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{failure_message, ClientError, Operation, INVALID_FORM_MESSAGE},
    events::{ChangeKind, RecordChanged, RecordEvents},
    gateway::RecordGateway,
    notify::{Notice, Notifier},
    resource::Resource,
    validation::ValidationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

struct FormState<R: Resource> {
    draft: R::Draft,
    identity: Option<R::Id>,
    preserved: R::Preserved,
    pristine: bool,
    report: ValidationReport,
}

impl<R: Resource> FormState<R> {
    fn empty() -> Self {
        let draft = R::Draft::default();
        Self {
            report: R::validate(&draft),
            draft,
            identity: None,
            preserved: R::fresh(),
            pristine: true,
        }
    }
}

pub struct FormController<R: Resource> {
    gateway: Arc<dyn RecordGateway<R>>,
    notifier: Arc<dyn Notifier>,
    events: RecordEvents,
    state: Mutex<FormState<R>>,
    /// Bumped by every successful load, edit and reset. A submit only clears
    /// the form if nothing touched it while the request was in flight.
    generation: AtomicU64,
}

impl<R: Resource> FormController<R> {
    pub fn new(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        events: RecordEvents,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            notifier,
            events,
            state: Mutex::new(FormState::empty()),
            generation: AtomicU64::new(0),
        })
    }

    pub async fn draft(&self) -> R::Draft {
        self.state.lock().await.draft.clone()
    }

    pub async fn identity(&self) -> Option<R::Id> {
        self.state.lock().await.identity
    }

    pub async fn mode(&self) -> FormMode {
        match self.state.lock().await.identity {
            Some(_) => FormMode::Edit,
            None => FormMode::Create,
        }
    }

    pub async fn is_pristine(&self) -> bool {
        self.state.lock().await.pristine
    }

    /// Report from the last validation pass.
    pub async fn report(&self) -> ValidationReport {
        self.state.lock().await.report.clone()
    }

    /// Populates the draft from the backend, or starts an empty create-mode
    /// draft when `id` is `None`. A failed fetch leaves the form untouched.
    pub async fn load(&self, id: Option<R::Id>) -> Result<(), ClientError> {
        let Some(id) = id else {
            self.reset().await;
            return Ok(());
        };

        match self.gateway.fetch(id).await {
            Ok(record) => {
                let (draft, preserved) = R::split(&record);
                let mut guard = self.state.lock().await;
                self.generation.fetch_add(1, Ordering::SeqCst);
                guard.report = R::validate(&draft);
                guard.draft = draft;
                guard.identity = R::id_of(&record).or(Some(id));
                guard.preserved = preserved;
                guard.pristine = true;
                debug!(kind = ?R::KIND, %id, "record loaded into form");
                Ok(())
            }
            Err(err) => {
                warn!(kind = ?R::KIND, %id, "failed to load record: {err}");
                self.notifier
                    .notify(Notice::failure(failure_message(R::KIND, Operation::Load, &err)));
                Err(err.into())
            }
        }
    }

    /// Applies a field change and re-validates.
    pub async fn edit(&self, change: impl FnOnce(&mut R::Draft)) -> ValidationReport {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        change(&mut state.draft);
        state.pristine = false;
        state.report = R::validate(&state.draft);
        state.report.clone()
    }

    pub async fn validate(&self) -> ValidationReport {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.report = R::validate(&state.draft);
        state.report.clone()
    }

    /// Back to an empty create-mode draft ("novo").
    pub async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().await = FormState::empty();
    }

    /// Validates, then creates or updates depending on whether an identity
    /// is loaded. Exactly one gateway call is made for a valid draft and
    /// none for an invalid one.
    pub async fn submit(&self) -> Result<R::Record, ClientError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let (draft, identity, preserved) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            state.report = R::validate(&state.draft);
            if !state.report.is_valid() {
                let report = state.report.clone();
                debug!(kind = ?R::KIND, %report, "submit blocked by validation");
                self.notifier.notify(Notice::failure(INVALID_FORM_MESSAGE));
                return Err(ClientError::Validation(report));
            }
            (state.draft.clone(), state.identity, state.preserved.clone())
        };

        let Some(record) = R::assemble(&draft, identity, &preserved) else {
            let report = R::validate(&draft);
            self.notifier.notify(Notice::failure(INVALID_FORM_MESSAGE));
            return Err(ClientError::Validation(report));
        };

        let (operation, change, result) = match identity {
            None => (
                Operation::Create,
                ChangeKind::Created,
                self.gateway.create(&record).await,
            ),
            Some(id) => (
                Operation::Update,
                ChangeKind::Updated,
                self.gateway.update(id, &record).await,
            ),
        };

        match result {
            Ok(saved) => {
                let id = R::id_of(&saved).or(identity);
                info!(kind = ?R::KIND, id = ?id, ?operation, "record saved");
                let verb = if operation == Operation::Create {
                    "created"
                } else {
                    "updated"
                };
                self.notifier
                    .notify(Notice::success(format!("{} {verb}.", R::KIND.label())));

                if self.generation.load(Ordering::SeqCst) == generation {
                    *self.state.lock().await = FormState::empty();
                    self.generation.fetch_add(1, Ordering::SeqCst);
                } else {
                    debug!(kind = ?R::KIND, "form changed during submit; keeping draft");
                }

                self.events.publish(RecordChanged {
                    kind: R::KIND,
                    id: id.map(Into::into),
                    change,
                });
                Ok(saved)
            }
            Err(err) => {
                warn!(kind = ?R::KIND, ?operation, "save failed: {err}");
                self.notifier
                    .notify(Notice::failure(failure_message(R::KIND, operation, &err)));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
