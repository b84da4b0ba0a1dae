use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(EntryId);
id_newtype!(PersonId);
id_newtype!(CategoryId);

/// Which record type an event or notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Entry,
    Person,
}

impl RecordKind {
    /// Capitalised label used at the start of user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Entry => "Entry",
            RecordKind::Person => "Person",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            RecordKind::Entry => "entry",
            RecordKind::Person => "person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    #[default]
    Receita,
    Despesa,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Receita => "RECEITA",
            EntryKind::Despesa => "DESPESA",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "logradouro", default)]
    pub street: Option<String>,
    #[serde(rename = "numero", default)]
    pub number: Option<String>,
    #[serde(rename = "complemento", default)]
    pub complement: Option<String>,
    #[serde(rename = "bairro", default)]
    pub district: Option<String>,
    #[serde(rename = "cep", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
}

/// A counterparty. `id` is absent until the backend assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PersonId>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
    #[serde(rename = "endereco", default)]
    pub address: Address,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "codigo")]
    pub id: CategoryId,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(rename = "codigo")]
    pub id: PersonId,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A financial transaction (lançamento).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "dataVencimento")]
    pub due_date: NaiveDate,
    #[serde(rename = "dataPagamento", default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "observacao", default)]
    pub notes: Option<String>,
    #[serde(rename = "tipoLancamento", alias = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "categoria")]
    pub category: CategoryRef,
    #[serde(rename = "pessoa")]
    pub person: PersonRef,
}

/// Flattened entry row returned by the summary listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    #[serde(rename = "codigo")]
    pub id: EntryId,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "dataVencimento")]
    pub due_date: NaiveDate,
    #[serde(rename = "dataPagamento", default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "tipoLancamento", alias = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "pessoa", default)]
    pub person: String,
}
