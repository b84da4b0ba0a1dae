//! Filter State: what the user asked for, before the server answers.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use shared::protocol::{EntrySearchQuery, PersonSearchQuery, SortSpec};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const ENTRY_DEFAULT_SORT: &str = "dataVencimento";
pub const PERSON_DEFAULT_SORT: &str = "nome";

/// Zero-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Search criteria plus pagination for one list screen.
pub trait ListFilter: Clone + fmt::Debug + Default + Send + Sync + 'static {
    type Query: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    fn pagination(&self) -> Pagination;
    fn pagination_mut(&mut self) -> &mut Pagination;
    fn set_sort(&mut self, sort: Option<SortSpec>);
    /// Wire query. Blank criteria are left out entirely.
    fn to_query(&self) -> Self::Query;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub description: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub pagination: Pagination,
    pub sort: Option<SortSpec>,
}

impl EntryFilter {
    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = non_blank(value.into());
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.due_from = from;
        self.due_to = to;
    }
}

impl ListFilter for EntryFilter {
    type Query = EntrySearchQuery;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    fn to_query(&self) -> EntrySearchQuery {
        EntrySearchQuery {
            descricao: self.description.clone().and_then(non_blank),
            due_from: self.due_from,
            due_to: self.due_to,
            page: self.pagination.page,
            size: self.pagination.size,
            sort: sort_or(&self.sort, ENTRY_DEFAULT_SORT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub pagination: Pagination,
    pub sort: Option<SortSpec>,
}

impl PersonFilter {
    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = non_blank(value.into());
    }
}

impl ListFilter for PersonFilter {
    type Query = PersonSearchQuery;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    fn to_query(&self) -> PersonSearchQuery {
        PersonSearchQuery {
            nome: self.name.clone().and_then(non_blank),
            page: self.pagination.page,
            size: self.pagination.size,
            sort: sort_or(&self.sort, PERSON_DEFAULT_SORT),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn sort_or(sort: &Option<SortSpec>, default_field: &str) -> String {
    sort.clone()
        .unwrap_or_else(|| SortSpec::asc(default_field))
        .to_string()
}
