//! List-row mutations that bypass the form: deletion and the person
//! active/inactive toggle. Neither applies anything optimistically; the
//! list only changes through the refresh that follows a confirmed success.

use std::sync::Arc;

use shared::domain::{Person, PersonId, RecordKind};
use tracing::{info, warn};

use crate::{
    error::{failure_message, ClientError, Operation},
    events::ChangeKind,
    gateway::StatusGateway,
    notify::{ConfirmPrompt, Notice},
    query::QueryController,
    resource::{People, Resource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user answered "no"; nothing was sent.
    Declined,
}

impl<R: Resource> QueryController<R> {
    /// Asks for confirmation, deletes, then refreshes this list exactly once.
    /// A backend refusal is shown with the server's own message.
    pub async fn delete(
        &self,
        id: R::Id,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<DeleteOutcome, ClientError> {
        let question = format!("Are you sure you want to delete this {}?", R::KIND.noun());
        if !prompt.confirm(&question).await {
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.gateway().delete(id).await {
            warn!(kind = ?R::KIND, %id, "delete failed: {err}");
            self.notifier()
                .notify(Notice::failure(failure_message(R::KIND, Operation::Delete, &err)));
            return Err(err.into());
        }

        info!(kind = ?R::KIND, %id, "record deleted");
        self.notifier()
            .notify(Notice::success(format!("{} deleted.", R::KIND.label())));
        self.announce(id.into(), ChangeKind::Deleted).await;
        Ok(DeleteOutcome::Deleted)
    }
}

/// Flips a person's active flag straight from the list row.
pub struct StatusToggle {
    gateway: Arc<dyn StatusGateway>,
    list: Arc<QueryController<People>>,
}

impl StatusToggle {
    pub fn new(gateway: Arc<dyn StatusGateway>, list: Arc<QueryController<People>>) -> Self {
        Self { gateway, list }
    }

    pub async fn set_active(&self, id: PersonId, active: bool) -> Result<(), ClientError> {
        if let Err(err) = self.gateway.set_active(id, active).await {
            warn!(%id, active, "status change failed: {err}");
            self.list.notifier().notify(Notice::failure(failure_message(
                RecordKind::Person,
                Operation::ToggleStatus,
                &err,
            )));
            return Err(err.into());
        }

        info!(%id, active, "person status changed");
        let message = if active {
            "Person activated."
        } else {
            "Person deactivated."
        };
        self.list.notifier().notify(Notice::success(message));
        self.list.announce(id.0, ChangeKind::StatusChanged).await;
        Ok(())
    }

    /// Requests the opposite of the status currently displayed for `person`.
    pub async fn toggle(&self, person: &Person) -> Result<bool, ClientError> {
        let id = person.id.ok_or(ClientError::MissingIdentity)?;
        let desired = !person.active;
        self.set_active(id, desired).await?;
        Ok(desired)
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
