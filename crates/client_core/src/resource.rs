//! Record-type bindings that let one controller implementation serve both
//! the entry screens and the person screens.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use shared::domain::{
    Address, CategoryRef, Entry, EntryId, EntryKind, EntrySummary, Person, PersonId, PersonRef,
    RecordKind,
};

use crate::{
    filter::{EntryFilter, ListFilter, PersonFilter},
    validation::ValidationReport,
};

pub const ENTRY_DESCRIPTION_MIN: usize = 10;
pub const ENTRY_DESCRIPTION_MAX: usize = 50;
pub const PERSON_NAME_MIN: usize = 5;
pub const PERSON_NAME_MAX: usize = 50;

pub type QueryOf<R> = <<R as Resource>::Filter as ListFilter>::Query;

pub trait Resource: Send + Sync + 'static {
    type Id: Copy + Eq + fmt::Debug + fmt::Display + Into<i64> + Send + Sync + 'static;
    type Filter: ListFilter;
    type Summary: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static;
    type Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Draft: Clone + fmt::Debug + Default + PartialEq + Send + Sync + 'static;
    /// Record state that is carried through an edit but never shown on the form.
    type Preserved: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: RecordKind;
    /// Collection path, relative to the API base URL.
    const PATH: &'static str;
    const SEARCH_PATH: &'static str;

    fn id_of(record: &Self::Record) -> Option<Self::Id>;
    fn split(record: &Self::Record) -> (Self::Draft, Self::Preserved);
    /// Preserved state for a record that has never been saved.
    fn fresh() -> Self::Preserved;
    fn validate(draft: &Self::Draft) -> ValidationReport;
    /// Builds the request body. `None` when the draft is missing required data.
    fn assemble(
        draft: &Self::Draft,
        id: Option<Self::Id>,
        preserved: &Self::Preserved,
    ) -> Option<Self::Record>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct People;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: Option<EntryKind>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub description: String,
    pub amount: Option<Decimal>,
    pub category: Option<CategoryRef>,
    pub person: Option<PersonRef>,
    pub notes: Option<String>,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            kind: Some(EntryKind::Receita),
            due_date: None,
            payment_date: None,
            description: String::new(),
            amount: Some(Decimal::ZERO),
            category: None,
            person: None,
            notes: None,
        }
    }
}

impl Resource for Entries {
    type Id = EntryId;
    type Filter = EntryFilter;
    type Summary = EntrySummary;
    type Record = Entry;
    type Draft = EntryDraft;
    type Preserved = ();

    const KIND: RecordKind = RecordKind::Entry;
    const PATH: &'static str = "lancamentos";
    const SEARCH_PATH: &'static str = "lancamentos/resumo";

    fn id_of(record: &Entry) -> Option<EntryId> {
        record.id
    }

    fn split(record: &Entry) -> (EntryDraft, ()) {
        let draft = EntryDraft {
            kind: Some(record.kind),
            due_date: Some(record.due_date),
            payment_date: record.payment_date,
            description: record.description.clone(),
            amount: Some(record.amount),
            category: Some(record.category.clone()),
            person: Some(record.person.clone()),
            notes: record.notes.clone(),
        };
        (draft, ())
    }

    fn fresh() {}

    fn validate(draft: &EntryDraft) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.required("tipo", draft.kind.as_ref());
        report.required("dataVencimento", draft.due_date.as_ref());
        report
            .text("descricao", Some(draft.description.as_str()))
            .required()
            .min_len(ENTRY_DESCRIPTION_MIN)
            .max_len(ENTRY_DESCRIPTION_MAX);
        report.positive_amount("valor", draft.amount);
        report.required("categoria", draft.category.as_ref());
        report.required("pessoa", draft.person.as_ref());
        report
    }

    fn assemble(draft: &EntryDraft, id: Option<EntryId>, _: &()) -> Option<Entry> {
        Some(Entry {
            id,
            description: draft.description.clone(),
            due_date: draft.due_date?,
            payment_date: draft.payment_date,
            amount: draft.amount?,
            notes: draft.notes.clone(),
            kind: draft.kind?,
            category: draft.category.clone()?,
            person: draft.person.clone()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub address: Address,
}

impl Resource for People {
    type Id = PersonId;
    type Filter = PersonFilter;
    type Summary = Person;
    type Record = Person;
    type Draft = PersonDraft;
    /// The active flag.
    type Preserved = bool;

    const KIND: RecordKind = RecordKind::Person;
    const PATH: &'static str = "pessoas";
    const SEARCH_PATH: &'static str = "pessoas";

    fn id_of(record: &Person) -> Option<PersonId> {
        record.id
    }

    fn split(record: &Person) -> (PersonDraft, bool) {
        let draft = PersonDraft {
            name: record.name.clone(),
            address: record.address.clone(),
        };
        (draft, record.active)
    }

    fn fresh() -> bool {
        true
    }

    fn validate(draft: &PersonDraft) -> ValidationReport {
        let address = &draft.address;
        let mut report = ValidationReport::default();
        report
            .text("nome", Some(draft.name.as_str()))
            .required()
            .min_len(PERSON_NAME_MIN)
            .max_len(PERSON_NAME_MAX);
        report.text("logradouro", address.street.as_deref()).required();
        report.text("numero", address.number.as_deref()).required();
        report.text("bairro", address.district.as_deref()).required();
        report
            .text("cep", address.postal_code.as_deref())
            .required()
            .postal_code();
        report.text("cidade", address.city.as_deref()).required();
        report.text("estado", address.state.as_deref()).required();
        report
    }

    fn assemble(draft: &PersonDraft, id: Option<PersonId>, active: &bool) -> Option<Person> {
        Some(Person {
            id,
            name: draft.name.clone(),
            active: *active,
            address: draft.address.clone(),
        })
    }
}
