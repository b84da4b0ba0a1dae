//! In-memory collaborators shared by the controller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex as StdMutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    domain::{
        Address, CategoryId, CategoryRef, Entry, EntryId, EntryKind, EntrySummary, Person,
        PersonId, PersonRef,
    },
    error::ApiError,
    protocol::Page,
};
use tokio::sync::Mutex;

use crate::{
    error::GatewayError,
    gateway::{RecordGateway, StatusGateway},
    notify::{ConfirmPrompt, Notice, NoticeLevel, Notifier},
    resource::{People, QueryOf, Resource},
};

struct SearchReply<R: Resource> {
    delay: Duration,
    result: Result<Page<R::Summary>, GatewayError>,
}

pub struct FakeGateway<R: Resource> {
    searches: Mutex<Vec<QueryOf<R>>>,
    search_replies: Mutex<VecDeque<SearchReply<R>>>,
    fetches: Mutex<Vec<R::Id>>,
    fetch_reply: Mutex<Option<Result<R::Record, GatewayError>>>,
    creates: Mutex<Vec<R::Record>>,
    updates: Mutex<Vec<(R::Id, R::Record)>>,
    save_reply: Mutex<Option<Result<R::Record, GatewayError>>>,
    save_delay: Mutex<Duration>,
    deletes: Mutex<Vec<R::Id>>,
    delete_failure: Mutex<Option<GatewayError>>,
    status_calls: Mutex<Vec<(PersonId, bool)>>,
    status_failure: Mutex<Option<GatewayError>>,
}

impl<R: Resource> Default for FakeGateway<R> {
    fn default() -> Self {
        Self {
            searches: Mutex::new(Vec::new()),
            search_replies: Mutex::new(VecDeque::new()),
            fetches: Mutex::new(Vec::new()),
            fetch_reply: Mutex::new(None),
            creates: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            save_reply: Mutex::new(None),
            save_delay: Mutex::new(Duration::ZERO),
            deletes: Mutex::new(Vec::new()),
            delete_failure: Mutex::new(None),
            status_calls: Mutex::new(Vec::new()),
            status_failure: Mutex::new(None),
        }
    }
}

impl<R: Resource> FakeGateway<R> {
    pub async fn reply_search(&self, result: Result<Page<R::Summary>, GatewayError>) {
        self.reply_search_after(Duration::ZERO, result).await;
    }

    pub async fn reply_search_after(
        &self,
        delay: Duration,
        result: Result<Page<R::Summary>, GatewayError>,
    ) {
        self.search_replies
            .lock()
            .await
            .push_back(SearchReply { delay, result });
    }

    pub async fn reply_fetch(&self, result: Result<R::Record, GatewayError>) {
        *self.fetch_reply.lock().await = Some(result);
    }

    pub async fn reply_save(&self, result: Result<R::Record, GatewayError>) {
        *self.save_reply.lock().await = Some(result);
    }

    pub async fn delay_saves(&self, delay: Duration) {
        *self.save_delay.lock().await = delay;
    }

    pub async fn fail_delete(&self, err: GatewayError) {
        *self.delete_failure.lock().await = Some(err);
    }

    pub async fn fail_status(&self, err: GatewayError) {
        *self.status_failure.lock().await = Some(err);
    }

    pub async fn searches(&self) -> Vec<QueryOf<R>> {
        self.searches.lock().await.clone()
    }

    pub async fn fetches(&self) -> Vec<R::Id> {
        self.fetches.lock().await.clone()
    }

    pub async fn creates(&self) -> Vec<R::Record> {
        self.creates.lock().await.clone()
    }

    pub async fn updates(&self) -> Vec<(R::Id, R::Record)> {
        self.updates.lock().await.clone()
    }

    pub async fn deletes(&self) -> Vec<R::Id> {
        self.deletes.lock().await.clone()
    }

    pub async fn status_calls(&self) -> Vec<(PersonId, bool)> {
        self.status_calls.lock().await.clone()
    }

    /// Every call that would have hit the network.
    pub async fn network_calls(&self) -> usize {
        self.searches.lock().await.len()
            + self.fetches.lock().await.len()
            + self.creates.lock().await.len()
            + self.updates.lock().await.len()
            + self.deletes.lock().await.len()
            + self.status_calls.lock().await.len()
    }

    async fn saved(&self, record: &R::Record) -> Result<R::Record, GatewayError> {
        let delay = *self.save_delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.save_reply
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| Ok(record.clone()))
    }
}

#[async_trait]
impl<R: Resource> RecordGateway<R> for FakeGateway<R> {
    async fn search(&self, query: &QueryOf<R>) -> Result<Page<R::Summary>, GatewayError> {
        self.searches.lock().await.push(query.clone());
        let reply = self.search_replies.lock().await.pop_front();
        match reply {
            Some(SearchReply { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(page(Vec::new(), 0, 0)),
        }
    }

    async fn fetch(&self, id: R::Id) -> Result<R::Record, GatewayError> {
        self.fetches.lock().await.push(id);
        self.fetch_reply
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| Err(server_error(404, "not found")))
    }

    async fn create(&self, record: &R::Record) -> Result<R::Record, GatewayError> {
        self.creates.lock().await.push(record.clone());
        self.saved(record).await
    }

    async fn update(&self, id: R::Id, record: &R::Record) -> Result<R::Record, GatewayError> {
        self.updates.lock().await.push((id, record.clone()));
        self.saved(record).await
    }

    async fn delete(&self, id: R::Id) -> Result<(), GatewayError> {
        self.deletes.lock().await.push(id);
        match self.delete_failure.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StatusGateway for FakeGateway<People> {
    async fn set_active(&self, id: PersonId, active: bool) -> Result<(), GatewayError> {
        self.status_calls.lock().await.push((id, active));
        match self.status_failure.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: StdMutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock").clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Failure)
    }

    pub fn successes(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Success)
    }

    fn with_level(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notices lock").push(notice);
    }
}

pub struct RecordingPrompt {
    answer: bool,
    asked: AtomicUsize,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmPrompt for RecordingPrompt {
    async fn confirm(&self, _message: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

pub fn transport_error() -> GatewayError {
    GatewayError::Transport("connection refused".into())
}

pub fn server_error(status: u16, message: &str) -> GatewayError {
    GatewayError::Server(ApiError::new(status, message))
}

pub fn page<T>(content: Vec<T>, total_elements: u64, number: u32) -> Page<T> {
    Page {
        content,
        total_elements,
        number,
        size: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn address() -> Address {
    Address {
        street: Some("Rua do Abacaxi".into()),
        number: Some("10".into()),
        complement: None,
        district: Some("Brasil".into()),
        postal_code: Some("38400-121".into()),
        city: Some("Uberlândia".into()),
        state: Some("MG".into()),
    }
}

pub fn person(id: i64, name: &str, active: bool) -> Person {
    Person {
        id: Some(PersonId(id)),
        name: name.into(),
        active,
        address: address(),
    }
}

pub fn entry(id: i64, description: &str) -> Entry {
    Entry {
        id: Some(EntryId(id)),
        description: description.into(),
        due_date: date(2017, 6, 10),
        payment_date: None,
        amount: Decimal::new(832, 2),
        notes: None,
        kind: EntryKind::Despesa,
        category: CategoryRef {
            id: CategoryId(2),
            name: Some("Alimentação".into()),
        },
        person: PersonRef {
            id: PersonId(3),
            name: Some("Josué Mariano".into()),
        },
    }
}

pub fn entry_summary(id: i64, description: &str) -> EntrySummary {
    EntrySummary {
        id: EntryId(id),
        description: description.into(),
        due_date: date(2017, 6, 10),
        payment_date: None,
        amount: Decimal::new(832, 2),
        kind: EntryKind::Despesa,
        category: "Alimentação".into(),
        person: "Josué Mariano".into(),
    }
}
