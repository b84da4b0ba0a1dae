//! Query-and-mutate core of the ledger administrative console.
//!
//! One generic [`QueryController`] and one generic [`FormController`] are
//! instantiated per record type ([`Entries`], [`People`]) on top of a
//! [`RecordGateway`]. Rendering, prompting and toasts are left to the
//! front end through the [`Notifier`] and [`ConfirmPrompt`] traits.

pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod notify;
pub mod query;
pub mod resource;
pub mod session;
pub mod validation;

pub use actions::{DeleteOutcome, StatusToggle};
pub use config::{load_settings, Settings};
pub use error::{ClientError, GatewayError};
pub use events::{ChangeKind, RecordChanged, RecordEvents};
pub use filter::{EntryFilter, ListFilter, Pagination, PersonFilter};
pub use form::{FormController, FormMode};
pub use gateway::{HttpGateway, RecordGateway, StatusGateway};
pub use notify::{ConfirmPrompt, FixedAnswer, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use query::{QueryController, RefreshOutcome, ResultPage};
pub use resource::{Entries, EntryDraft, People, PersonDraft, Resource};
pub use session::{Credential, Session, SessionState};
pub use validation::{Rule, ValidationReport};

pub type EntryList = QueryController<Entries>;
pub type PersonList = QueryController<People>;
pub type EntryForm = FormController<Entries>;
pub type PersonForm = FormController<People>;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
