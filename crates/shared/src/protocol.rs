use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Paged listing envelope returned by the backend. `number` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parses `field` or `field,asc|desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next()?.trim();
        if field.is_empty() {
            return None;
        }
        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(_) => return None,
        };
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction.as_str())
    }
}

/// Query string for `GET /lancamentos/resumo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(rename = "dataVencimentoDe", skip_serializing_if = "Option::is_none")]
    pub due_from: Option<NaiveDate>,
    #[serde(rename = "dataVencimentoAte", skip_serializing_if = "Option::is_none")]
    pub due_to: Option<NaiveDate>,
    pub page: u32,
    pub size: u32,
    pub sort: String,
}

/// Query string for `GET /pessoas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    pub page: u32,
    pub size: u32,
    pub sort: String,
}
