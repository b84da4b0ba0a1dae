//! Query Controller: turns Filter State into a request and installs the
//! server's answer as the Result Page.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, OnceLock,
    },
    time::Duration,
};

use shared::protocol::Page;
use tokio::{
    sync::{broadcast::error::RecvError, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    config::{Settings, DEFAULT_SEARCH_DEBOUNCE_MS},
    error::{failure_message, ClientError, Operation},
    events::{ChangeKind, RecordChanged, RecordEvents},
    filter::{ListFilter, Pagination},
    gateway::RecordGateway,
    notify::{Notice, Notifier},
    resource::Resource,
};

/// Server-confirmed slice of records. Replaced wholesale on every
/// successful query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    /// Page index as reported by the server.
    pub number: u32,
    pub size: u32,
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            number: 0,
            size: 0,
        }
    }
}

impl<T> ResultPage<T> {
    fn from_page(page: Page<T>, requested_size: u32) -> Self {
        Self {
            content: page.content,
            total_elements: page.total_elements,
            number: page.number,
            size: page.size.unwrap_or(requested_size),
        }
    }

    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer request was issued while this one was in flight.
    Superseded,
}

struct QueryState<R: Resource> {
    filter: R::Filter,
    result: ResultPage<R::Summary>,
}

pub struct QueryController<R: Resource> {
    gateway: Arc<dyn RecordGateway<R>>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<QueryState<R>>,
    latest_request: AtomicU64,
    latest_schedule: AtomicU64,
    debounce: Duration,
    /// Bus this list follows, once `follow` has been called.
    followed: OnceLock<RecordEvents>,
}

impl<R: Resource> QueryController<R> {
    pub fn new(gateway: Arc<dyn RecordGateway<R>>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Self::with_filter(gateway, notifier, R::Filter::default())
    }

    pub fn with_filter(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        filter: R::Filter,
    ) -> Arc<Self> {
        Self::build(
            gateway,
            notifier,
            filter,
            Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        )
    }

    /// Page size and search debounce taken from `settings`.
    pub fn from_settings(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        settings: &Settings,
    ) -> Arc<Self> {
        let mut filter = R::Filter::default();
        if settings.page_size > 0 {
            filter.pagination_mut().size = settings.page_size;
        }
        Self::build(
            gateway,
            notifier,
            filter,
            Duration::from_millis(settings.search_debounce_ms),
        )
    }

    fn build(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        filter: R::Filter,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            notifier,
            state: Mutex::new(QueryState {
                filter,
                result: ResultPage::default(),
            }),
            latest_request: AtomicU64::new(0),
            latest_schedule: AtomicU64::new(0),
            debounce,
            followed: OnceLock::new(),
        })
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn RecordGateway<R>> {
        &self.gateway
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Reports a mutation made from this list. A following list hears about
    /// it on the bus, so the refresh comes from `follow`; otherwise the list
    /// refreshes itself.
    pub(crate) async fn announce(&self, id: i64, change: ChangeKind) {
        match self.followed.get() {
            Some(events) => events.publish(RecordChanged {
                kind: R::KIND,
                id: Some(id),
                change,
            }),
            None => {
                // a failed refresh reports itself
                let _ = self.refresh().await;
            }
        }
    }

    pub async fn filter(&self) -> R::Filter {
        self.state.lock().await.filter.clone()
    }

    pub async fn result(&self) -> ResultPage<R::Summary> {
        self.state.lock().await.result.clone()
    }

    /// Applies a criterion change. Does not fetch; the page index goes back
    /// to 0 because the old index means nothing against a new result set.
    pub async fn update_filter(&self, change: impl FnOnce(&mut R::Filter)) {
        let mut guard = self.state.lock().await;
        change(&mut guard.filter);
        guard.filter.pagination_mut().page = 0;
    }

    /// Moves the cursor and fetches immediately.
    pub async fn go_to_page(&self, page: u32, size: u32) -> Result<RefreshOutcome, ClientError> {
        {
            let mut guard = self.state.lock().await;
            let pagination = guard.filter.pagination_mut();
            pagination.page = page;
            if size > 0 {
                pagination.size = size;
            }
        }
        self.refresh().await
    }

    /// Issues the current filter. Only the response to the most recently
    /// issued request is installed; failures leave the Result Page as is.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let (query, Pagination { size, .. }) = {
            let guard = self.state.lock().await;
            (guard.filter.to_query(), guard.filter.pagination())
        };

        let response = self.gateway.search(&query).await;

        if self.latest_request.load(Ordering::SeqCst) != token {
            debug!(kind = ?R::KIND, token, "discarding stale list response");
            return Ok(RefreshOutcome::Superseded);
        }

        match response {
            Ok(page) => {
                let result = ResultPage::from_page(page, size);
                debug!(
                    kind = ?R::KIND,
                    number = result.number,
                    total = result.total_elements,
                    "installing result page"
                );
                self.state.lock().await.result = result;
                Ok(RefreshOutcome::Applied)
            }
            Err(err) => {
                warn!(kind = ?R::KIND, "list query failed: {err}");
                self.notifier
                    .notify(Notice::failure(failure_message(R::KIND, Operation::Search, &err)));
                Err(err.into())
            }
        }
    }

    /// Debounced search with the configured quiet period.
    pub fn search_debounced(self: &Arc<Self>) -> JoinHandle<()> {
        self.search_debounced_after(self.debounce)
    }

    /// Refreshes after `delay` unless another search is scheduled, or an
    /// explicit refresh is issued, in the meantime.
    pub fn search_debounced_after(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let schedule = self.latest_schedule.fetch_add(1, Ordering::SeqCst) + 1;
        let issued_at = self.latest_request.load(Ordering::SeqCst);
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if controller.latest_schedule.load(Ordering::SeqCst) != schedule
                || controller.latest_request.load(Ordering::SeqCst) != issued_at
            {
                debug!(kind = ?R::KIND, "debounced search superseded");
                return;
            }
            let _ = controller.refresh().await;
        })
    }

    /// Re-runs the query whenever a record of this kind changes. Deletes and
    /// status changes made through this list are published on `events` too.
    pub fn follow(self: &Arc<Self>, events: &RecordEvents) -> JoinHandle<()> {
        let mut rx = events.subscribe();
        if self.followed.set(events.clone()).is_err() {
            debug!(kind = ?R::KIND, "list already follows a record bus");
        }
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.kind == R::KIND => {
                        info!(kind = ?R::KIND, change = ?event.change, "record changed; refreshing list");
                        let _ = controller.refresh().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "record events lagged; refreshing list");
                        let _ = controller.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
