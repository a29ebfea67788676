//! Session state and the refresh state machine.
//!
//! Every mutation goes through a method on [`Session`]. Methods that can require
//! new rates return the [`FetchRequest`] the caller must run, and the caller feeds
//! the result back through [`Session::complete`]. At most one request is in flight.

use crate::core::catalog::{self, CurrencyRecord};
use crate::core::rates::{FETCH_ERROR_MESSAGE, RateFetchError, RateSnapshot};
use crate::core::tracked::{TrackedCurrency, TrackedList};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_TRACKED_CODES: [&str; 5] = ["EUR", "GBP", "JPY", "AUD", "CAD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The base currency changed.
    BaseChanged,
    /// The user asked for a refresh.
    Manual,
    /// A currency was added and has no rate yet.
    CurrencyAdded,
    /// Initial fill of the default list.
    Startup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace every tracked rate with the snapshot value, or clear it.
    Overwrite,
    /// Only set rates that are currently missing.
    FillGaps,
}

impl RefreshTrigger {
    pub fn merge_policy(self) -> MergePolicy {
        match self {
            RefreshTrigger::BaseChanged | RefreshTrigger::Manual => MergePolicy::Overwrite,
            RefreshTrigger::CurrencyAdded | RefreshTrigger::Startup => MergePolicy::FillGaps,
        }
    }

    /// Whether a failure is shown to the user.
    pub fn reports_errors(self) -> bool {
        self.merge_policy() == MergePolicy::Overwrite
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub base_code: String,
    pub trigger: RefreshTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was merged into the tracked list.
    Applied,
    /// The fetch failed. `last_error` is set only for explicit triggers.
    Failed,
    /// The base changed while the fetch was in flight, so its result was dropped.
    Discarded { follow_up: Option<FetchRequest> },
    /// No fetch was in flight.
    Ignored,
}

/// Owned copy of everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub base_currency_code: String,
    pub currencies: Vec<TrackedCurrency>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Session {
    base_currency_code: String,
    tracked: TrackedList,
    phase: RefreshPhase,
    in_flight: Option<FetchRequest>,
    last_error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        let tracked = DEFAULT_TRACKED_CODES
            .iter()
            .filter_map(|code| catalog::lookup(code))
            .collect();
        Self::new(DEFAULT_BASE_CURRENCY, tracked)
    }
}

impl Session {
    pub fn new(base_currency_code: &str, tracked: Vec<&'static CurrencyRecord>) -> Self {
        let mut list = TrackedList::new();
        for record in tracked {
            list.add(record);
        }
        Self {
            base_currency_code: base_currency_code.to_string(),
            tracked: list,
            phase: RefreshPhase::Idle,
            in_flight: None,
            last_error: None,
            last_updated: None,
        }
    }

    pub fn base_currency_code(&self) -> &str {
        &self.base_currency_code
    }

    pub fn tracked(&self) -> &TrackedList {
        &self.tracked
    }

    pub fn sorted_view(&self) -> Vec<&TrackedCurrency> {
        self.tracked.sorted_view()
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RefreshPhase::Fetching
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            base_currency_code: self.base_currency_code.clone(),
            currencies: self.sorted_view().into_iter().cloned().collect(),
            is_loading: self.is_loading(),
            last_error: self.last_error.clone(),
            last_updated: self.last_updated,
        }
    }

    /// Catalog entries that may be added: search results minus the base and tracked codes.
    pub fn add_candidates(&self, query: &str) -> Vec<&'static CurrencyRecord> {
        catalog::search(query.trim())
            .into_iter()
            .filter(|record| {
                record.code != self.base_currency_code && !self.tracked.contains(record.code)
            })
            .collect()
    }

    /// Gap-fills the initial list if any entry has no rate yet.
    pub fn startup(&mut self) -> Option<FetchRequest> {
        if !self.tracked.has_missing_rates() {
            return None;
        }
        self.begin(RefreshTrigger::Startup)
    }

    pub fn set_base_currency(&mut self, record: &'static CurrencyRecord) -> Option<FetchRequest> {
        if record.code == self.base_currency_code {
            debug!(base = record.code, "Base currency unchanged");
            return None;
        }
        debug!(
            from = %self.base_currency_code,
            to = record.code,
            "Base currency changed"
        );
        self.base_currency_code = record.code.to_string();
        self.begin(RefreshTrigger::BaseChanged)
    }

    pub fn add_currency(&mut self, record: &'static CurrencyRecord) -> Option<FetchRequest> {
        if record.code == self.base_currency_code {
            debug!(code = record.code, "Refusing to track the base currency");
            return None;
        }
        if !self.tracked.add(record) {
            debug!(code = record.code, "Currency already tracked");
            return None;
        }
        if !self.tracked.has_missing_rates() {
            return None;
        }
        self.begin(RefreshTrigger::CurrencyAdded)
    }

    pub fn remove_currency(&mut self, code: &str) -> bool {
        self.tracked.remove(code)
    }

    pub fn toggle_favorite(&mut self, code: &str) -> Option<bool> {
        self.tracked.toggle_favorite(code)
    }

    pub fn request_refresh(&mut self) -> Option<FetchRequest> {
        self.begin(RefreshTrigger::Manual)
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    fn begin(&mut self, trigger: RefreshTrigger) -> Option<FetchRequest> {
        if self.phase == RefreshPhase::Fetching {
            debug!(?trigger, "Fetch already in flight, ignoring trigger");
            return None;
        }
        if self.tracked.is_empty() {
            debug!(?trigger, "No tracked currencies, nothing to fetch");
            return None;
        }

        let request = FetchRequest {
            base_code: self.base_currency_code.clone(),
            trigger,
        };
        debug!(?trigger, base = %request.base_code, "Starting rate fetch");
        self.phase = RefreshPhase::Fetching;
        self.last_error = None;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Applies the result of the in-flight fetch and returns the machine to idle.
    pub fn complete(&mut self, result: Result<RateSnapshot, RateFetchError>) -> RefreshOutcome {
        let Some(request) = self.in_flight.take() else {
            warn!("Received a fetch result with no fetch in flight");
            return RefreshOutcome::Ignored;
        };
        self.phase = RefreshPhase::Idle;

        if request.base_code != self.base_currency_code {
            debug!(
                stale = %request.base_code,
                current = %self.base_currency_code,
                "Discarding result fetched for a previous base"
            );
            let follow_up = self.begin(RefreshTrigger::BaseChanged);
            return RefreshOutcome::Discarded { follow_up };
        }

        match result {
            Ok(snapshot) => {
                self.merge(&snapshot, request.trigger.merge_policy());
                self.last_updated = Some(snapshot.fetched_at);
                debug!(trigger = ?request.trigger, base = %snapshot.base_code, "Applied rate snapshot");
                RefreshOutcome::Applied
            }
            Err(e) if request.trigger.reports_errors() => {
                warn!(error = %e, "Exchange rate refresh failed");
                self.last_error = Some(FETCH_ERROR_MESSAGE.to_string());
                RefreshOutcome::Failed
            }
            Err(e) => {
                debug!(error = %e, trigger = ?request.trigger, "Background rate fetch failed");
                RefreshOutcome::Failed
            }
        }
    }

    fn merge(&mut self, snapshot: &RateSnapshot, policy: MergePolicy) {
        for entry in self.tracked.iter_mut() {
            let fresh = snapshot.rate_for(entry.code());
            entry.rate = match policy {
                MergePolicy::Overwrite => fresh,
                MergePolicy::FillGaps => entry.rate.or(fresh),
            };
        }
    }
}
