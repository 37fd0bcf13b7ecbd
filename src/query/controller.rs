//! Keeps a paginated list in sync with the filters a user is editing.
//!
//! A [`QueryController`] owns the committed [`QueryDescriptor`] of one list
//! screen. Intents arrive on a channel and are applied one at a time by a
//! single task; whenever the committed descriptor differs from the one last
//! fetched, the outstanding request is cancelled and a new one is issued.
//! Each request carries a ticket so that a late completion of a superseded
//! request is recognised and dropped.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::config::ClientConfig;
use crate::pagination;
use crate::query::debounce::Debouncer;
use crate::query::descriptor::{QueryDescriptor, SortDirection, SortKey, normalize_search};
use crate::repository::Page;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub const PAGE_INPUT: &str = "page";
pub const PAGE_SIZE_INPUT: &str = "page_size";

/// Remote list endpoint a controller pulls pages from.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Debug + Send + Sync + 'static;
    type Sort: SortKey;

    async fn list(
        &self,
        query: &QueryDescriptor<Self::Sort>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<Self::Item>>;

    /// Validates a raw filter value before it is committed.
    ///
    /// `Ok(None)` deactivates the filter, `Err` carries the message shown next
    /// to the input.
    fn normalize_filter(&self, _name: &str, raw: &str) -> Result<Option<String>, String> {
        let trimmed = raw.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct ControllerOptions<S> {
    /// Descriptor restored by [`QueryController::reset_all`].
    pub defaults: QueryDescriptor<S>,
    /// Descriptor of the first fetch, e.g. parsed from a deep link.
    pub initial: Option<QueryDescriptor<S>>,
    pub search_debounce: Duration,
    pub filter_debounce: Duration,
}

impl<S: SortKey> ControllerOptions<S> {
    pub fn new(defaults: QueryDescriptor<S>) -> Self {
        Self {
            defaults,
            initial: None,
            search_debounce: Duration::from_millis(500),
            filter_debounce: Duration::from_millis(800),
        }
    }

    /// Options with debounce periods taken from the client configuration.
    pub fn from_config(config: &ClientConfig, defaults: QueryDescriptor<S>) -> Self {
        Self {
            search_debounce: config.search_debounce(),
            filter_debounce: config.filter_debounce(),
            ..Self::new(defaults)
        }
    }

    pub fn with_initial(mut self, initial: QueryDescriptor<S>) -> Self {
        self.initial = Some(initial);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    /// The first fetch of the controller is outstanding; nothing to show yet.
    Initial,
    /// A later fetch is outstanding; previous results stay visible.
    Refresh,
}

/// Snapshot published to the view after every state change.
#[derive(Clone, Debug)]
pub struct ListView<T, S> {
    pub items: Vec<T>,
    pub total: usize,
    pub page_count: usize,
    /// Page buttons, `None` marks a gap.
    pub pages: Vec<Option<usize>>,
    pub loading: LoadingState,
    /// Committed descriptor.
    pub query: QueryDescriptor<S>,
    pub draft_search: String,
    pub draft_filters: BTreeMap<String, String>,
    /// Message of the last failed fetch.
    pub error: Option<String>,
    /// Rejected inputs keyed by filter name, [`PAGE_INPUT`] or [`PAGE_SIZE_INPUT`].
    pub validation_errors: BTreeMap<String, String>,
}

enum Message<T, S> {
    FreeText(String),
    Filter { name: String, value: Option<String> },
    FilterDraft { name: String, raw: String },
    Sort { sort_by: S, order: SortDirection },
    SortOrder(SortDirection),
    Page(usize),
    PageSize(usize),
    Reset,
    Refresh,
    SearchElapsed(u64),
    FilterElapsed { name: String, seq: u64 },
    Completed {
        ticket: u64,
        result: RepositoryResult<Page<T>>,
    },
}

type Sender<L> = mpsc::UnboundedSender<Message<<L as ListSource>::Item, <L as ListSource>::Sort>>;

struct InFlight {
    ticket: u64,
    cancel: CancellationToken,
}

/// State owned by the controller task.
struct Engine<L: ListSource> {
    source: Arc<L>,
    tx: Sender<L>,
    view: watch::Sender<ListView<L::Item, L::Sort>>,
    defaults: QueryDescriptor<L::Sort>,
    committed: QueryDescriptor<L::Sort>,
    last_issued: Option<QueryDescriptor<L::Sort>>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    initial_load: bool,
    loading: LoadingState,
    items: Vec<L::Item>,
    total: usize,
    error: Option<String>,
    validation_errors: BTreeMap<String, String>,
    draft_search: String,
    draft_filters: BTreeMap<String, String>,
    search_timer: Debouncer,
    filter_timers: HashMap<String, Debouncer>,
    filter_debounce: Duration,
}

impl<L: ListSource> Engine<L> {
    fn new(source: Arc<L>, options: ControllerOptions<L::Sort>, tx: Sender<L>) -> Self {
        let committed = options.initial.unwrap_or_else(|| options.defaults.clone());
        let draft_search = committed.search.clone().unwrap_or_default();
        let draft_filters = committed.filters.clone();
        let (view, _) = watch::channel(ListView {
            items: Vec::new(),
            total: 0,
            page_count: 1,
            pages: pagination::page_window(1, committed.page),
            loading: LoadingState::Idle,
            query: committed.clone(),
            draft_search: draft_search.clone(),
            draft_filters: draft_filters.clone(),
            error: None,
            validation_errors: BTreeMap::new(),
        });

        Self {
            source,
            tx,
            view,
            defaults: options.defaults,
            committed,
            last_issued: None,
            in_flight: None,
            next_ticket: 0,
            initial_load: true,
            loading: LoadingState::Idle,
            items: Vec::new(),
            total: 0,
            error: None,
            validation_errors: BTreeMap::new(),
            draft_search,
            draft_filters,
            search_timer: Debouncer::new(options.search_debounce),
            filter_timers: HashMap::new(),
            filter_debounce: options.filter_debounce,
        }
    }

    async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Message<L::Item, L::Sort>>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                message = rx.recv() => match message {
                    Some(message) => {
                        self.handle(message);
                        self.publish();
                    }
                    None => break,
                },
            }
        }
        self.teardown();
    }

    fn handle(&mut self, message: Message<L::Item, L::Sort>) {
        match message {
            Message::FreeText(raw) => {
                self.draft_search = raw;
                let tx = self.tx.clone();
                self.search_timer.schedule(move |seq| {
                    let _ = tx.send(Message::SearchElapsed(seq));
                });
            }
            Message::SearchElapsed(seq) => {
                if self.search_timer.fire(seq) {
                    self.committed.search = normalize_search(&self.draft_search);
                    self.committed.page = 1;
                    self.sync();
                }
            }
            Message::Filter { name, value } => {
                if let Some(timer) = self.filter_timers.get_mut(&name) {
                    timer.cancel();
                }
                match &value {
                    Some(raw) => self.draft_filters.insert(name.clone(), raw.clone()),
                    None => self.draft_filters.remove(&name),
                };
                self.commit_filter(name, value.as_deref().unwrap_or_default());
            }
            Message::FilterDraft { name, raw } => {
                self.draft_filters.insert(name.clone(), raw);
                let tx = self.tx.clone();
                let timer_name = name.clone();
                let delay = self.filter_debounce;
                self.filter_timers
                    .entry(name)
                    .or_insert_with(|| Debouncer::new(delay))
                    .schedule(move |seq| {
                        let _ = tx.send(Message::FilterElapsed {
                            name: timer_name,
                            seq,
                        });
                    });
            }
            Message::FilterElapsed { name, seq } => {
                let current = self
                    .filter_timers
                    .get_mut(&name)
                    .is_some_and(|timer| timer.fire(seq));
                if current {
                    let raw = self.draft_filters.get(&name).cloned().unwrap_or_default();
                    self.commit_filter(name, &raw);
                }
            }
            Message::Sort { sort_by, order } => {
                self.committed.sort_by = sort_by;
                self.committed.order = order;
                self.committed.page = 1;
                self.sync();
            }
            Message::SortOrder(order) => {
                self.committed.order = order;
                self.committed.page = 1;
                self.sync();
            }
            Message::Page(page) => {
                if page == 0 {
                    self.reject(PAGE_INPUT, "Page must be at least 1".to_string());
                    return;
                }
                self.validation_errors.remove(PAGE_INPUT);
                self.committed.page = page;
                self.sync();
            }
            Message::PageSize(per_page) => {
                if per_page == 0 {
                    self.reject(PAGE_SIZE_INPUT, "Page size must be positive".to_string());
                    return;
                }
                self.validation_errors.remove(PAGE_SIZE_INPUT);
                self.committed.per_page = per_page;
                self.committed.page = 1;
                self.sync();
            }
            Message::Reset => {
                self.search_timer.cancel();
                self.filter_timers.values_mut().for_each(Debouncer::cancel);
                self.draft_search.clear();
                self.draft_filters.clear();
                self.validation_errors.clear();
                self.committed = self.defaults.clone();
                self.sync();
            }
            Message::Refresh => self.issue(),
            Message::Completed { ticket, result } => self.complete(ticket, result),
        }
    }

    fn commit_filter(&mut self, name: String, raw: &str) {
        match self.source.normalize_filter(&name, raw) {
            Ok(value) => {
                self.validation_errors.remove(&name);
                match value {
                    Some(value) => self.committed.filters.insert(name, value),
                    None => self.committed.filters.remove(&name),
                };
                self.committed.page = 1;
                self.sync();
            }
            Err(message) => self.reject(&name, message),
        }
    }

    fn reject(&mut self, input: &str, message: String) {
        log::debug!("Rejected {input}: {message}");
        self.validation_errors.insert(input.to_string(), message);
    }

    /// Issues a fetch when the committed descriptor changed since the last one.
    fn sync(&mut self) {
        if self.last_issued.as_ref() != Some(&self.committed) {
            self.issue();
        }
    }

    fn issue(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            log::debug!("Cancelling superseded request #{}", previous.ticket);
            previous.cancel.cancel();
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let cancel = CancellationToken::new();
        let query = self.committed.clone();
        log::debug!("Fetching request #{ticket}: {query:?}");

        self.loading = if self.initial_load {
            LoadingState::Initial
        } else {
            LoadingState::Refresh
        };
        self.last_issued = Some(query.clone());
        self.in_flight = Some(InFlight {
            ticket,
            cancel: cancel.clone(),
        });

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
                result = source.list(&query, &cancel) => result,
            };
            let _ = tx.send(Message::Completed { ticket, result });
        });
    }

    fn complete(&mut self, ticket: u64, result: RepositoryResult<Page<L::Item>>) {
        if self.in_flight.as_ref().map(|f| f.ticket) != Some(ticket) {
            log::debug!("Discarding stale response #{ticket}");
            return;
        }

        match result {
            Err(err)
                if err.is_cancelled()
                    && self.in_flight.as_ref().is_some_and(|f| f.cancel.is_cancelled()) =>
            {
                log::debug!("Request #{ticket} cancelled");
                return;
            }
            // The source gave up on its own; settle without an error.
            Err(err) if err.is_cancelled() => {
                log::debug!("Request #{ticket} abandoned by its source");
                self.error = None;
            }
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.error = None;
            }
            Err(err) => {
                log::error!("Failed to load list: {err}");
                self.error = Some(err.to_string());
            }
        }

        self.in_flight = None;
        self.initial_load = false;
        self.loading = LoadingState::Idle;
    }

    fn publish(&self) {
        let page_count = pagination::page_count(self.total, self.committed.per_page);
        self.view.send_replace(ListView {
            items: self.items.clone(),
            total: self.total,
            page_count,
            pages: pagination::page_window(page_count, self.committed.page),
            loading: self.loading,
            query: self.committed.clone(),
            draft_search: self.draft_search.clone(),
            draft_filters: self.draft_filters.clone(),
            error: self.error.clone(),
            validation_errors: self.validation_errors.clone(),
        });
    }

    fn teardown(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
        self.search_timer.cancel();
        self.filter_timers.values_mut().for_each(Debouncer::cancel);
    }
}

/// Handle of a running list controller.
///
/// Dropping the handle cancels the outstanding request and every pending
/// debounce timer.
pub struct QueryController<L: ListSource> {
    tx: Sender<L>,
    view: watch::Receiver<ListView<L::Item, L::Sort>>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<L: ListSource> QueryController<L> {
    /// Starts the controller and issues the first fetch. Requires a tokio
    /// runtime.
    pub fn spawn(source: Arc<L>, options: ControllerOptions<L::Sort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut engine = Engine::new(source, options, tx.clone());
        engine.sync();
        engine.publish();

        let view = engine.view.subscribe();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(engine.run(rx, shutdown.clone()));

        Self {
            tx,
            view,
            shutdown,
            task: Some(task),
        }
    }

    /// Updates the search draft; it is committed after the quiet period.
    pub fn set_free_text(&self, raw: impl Into<String>) {
        self.send(Message::FreeText(raw.into()));
    }

    /// Commits a filter immediately; `None` clears it.
    pub fn set_filter(&self, name: impl Into<String>, value: Option<String>) {
        self.send(Message::Filter {
            name: name.into(),
            value,
        });
    }

    /// Updates a filter draft committed after the filter quiet period.
    pub fn set_filter_draft(&self, name: impl Into<String>, raw: impl Into<String>) {
        self.send(Message::FilterDraft {
            name: name.into(),
            raw: raw.into(),
        });
    }

    pub fn set_sort(&self, sort_by: L::Sort, order: SortDirection) {
        self.send(Message::Sort { sort_by, order });
    }

    pub fn set_sort_order(&self, order: SortDirection) {
        self.send(Message::SortOrder(order));
    }

    pub fn set_page(&self, page: usize) {
        self.send(Message::Page(page));
    }

    pub fn set_page_size(&self, per_page: usize) {
        self.send(Message::PageSize(per_page));
    }

    /// Restores the default descriptor and clears every draft.
    pub fn reset_all(&self) {
        self.send(Message::Reset);
    }

    /// Fetches the committed descriptor again.
    pub fn refresh(&self) {
        self.send(Message::Refresh);
    }

    pub fn view(&self) -> ListView<L::Item, L::Sort> {
        self.view.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListView<L::Item, L::Sort>> {
        self.view.clone()
    }

    /// Stops the controller and waits until its task is gone.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            log::error!("List controller task failed: {err}");
        }
    }

    fn send(&self, message: Message<L::Item, L::Sort>) {
        if self.tx.send(message).is_err() {
            log::debug!("Intent sent to a stopped list controller");
        }
    }
}

impl<L: ListSource> Drop for QueryController<L> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
