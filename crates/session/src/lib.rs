//! Interaction state machine for the demo client.
//!
//! One `Session` owns the single live result view. Every operation replaces
//! the previous interaction state before dispatching, so a stale result can
//! never render after a newer request begins, and every network await lands
//! in a terminal state on all exit paths.

use async_trait::async_trait;
use common::{Error, LuckyResponse, Result, SearchResult, Signal};
use signal_client::SignalRestClient;
use tracing::{debug, info};

/// Network operations the session drives. Implemented by the REST client,
/// and by scripted stubs in tests.
#[async_trait]
pub trait SignalService {
    async fn search(&self, query: &str) -> Result<SearchResult>;
    async fn signal(&self, symbol: &str) -> Result<Signal>;
    async fn lucky(&self) -> Result<LuckyResponse>;
}

#[async_trait]
impl SignalService for SignalRestClient {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        SignalRestClient::search(self, query).await
    }

    async fn signal(&self, symbol: &str) -> Result<Signal> {
        SignalRestClient::signal(self, symbol).await
    }

    async fn lucky(&self) -> Result<LuckyResponse> {
        SignalRestClient::lucky(self).await
    }
}

/// The single live view of the interaction.
///
/// Replaces the original design's independently-mutated
/// status/result/signal/lucky/error/loading variables with one value and
/// explicit transitions.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    /// Nothing submitted yet, or the previous view was cleared.
    #[default]
    Idle,
    /// A search request is in flight.
    Searching,
    /// A search completed; this is the only live `SearchResult`.
    Resolved(SearchResult),
    /// A signal request is in flight for the selected symbol.
    FetchingSignal { symbol: String },
    /// A lucky-picks request is in flight.
    FetchingLucky,
    /// A signal is on display.
    ShowingSignal(Signal),
    /// A lucky batch is on display.
    ShowingLucky(LuckyResponse),
    /// The single error slot; replaced by the next operation.
    Failed(Error),
}

impl InteractionState {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            InteractionState::Searching
                | InteractionState::FetchingSignal { .. }
                | InteractionState::FetchingLucky
        )
    }
}

/// Drives validate → resolve → select → fetch against a `SignalService`,
/// holding exactly one result view at a time.
pub struct Session<S> {
    service: S,
    state: InteractionState,
}

impl<S: SignalService> Session<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Validate, normalize, and resolve a raw query.
    ///
    /// Whatever was on display is cleared first. Validation failures land
    /// in the error slot without touching the network.
    pub async fn search(&mut self, raw: &str) -> &InteractionState {
        self.state = InteractionState::Idle;

        let normalized = match query::validate_and_normalize(raw) {
            Ok(q) => q,
            Err(e) => {
                debug!("query rejected: {}", e);
                self.state = InteractionState::Failed(e);
                return &self.state;
            }
        };

        self.state = InteractionState::Searching;
        self.state = match self.service.search(&normalized).await {
            Ok(result) => {
                info!(
                    "resolved {} as {:?} {} ({} suggestions)",
                    normalized,
                    result.kind,
                    result.normalized,
                    result.suggestions.len()
                );
                InteractionState::Resolved(result)
            }
            Err(e) => InteractionState::Failed(e),
        };
        &self.state
    }

    /// Fetch the signal for the resolved query.
    ///
    /// Without a live resolved search this is a caller error: the call is a
    /// no-op, nothing is dispatched, and the current view stays untouched.
    pub async fn fetch_signal(&mut self) -> &InteractionState {
        let resolved = match &self.state {
            InteractionState::Resolved(result) => result.clone(),
            _ => {
                debug!("fetch_signal without a resolved query; ignoring");
                return &self.state;
            }
        };

        let symbol = query::select_symbol(&resolved);
        info!("requesting signal for {}", symbol);
        self.state = InteractionState::FetchingSignal {
            symbol: symbol.clone(),
        };

        self.state = match self.service.signal(&symbol).await {
            Ok(signal) => InteractionState::ShowingSignal(signal),
            Err(e) => InteractionState::Failed(e),
        };
        &self.state
    }

    /// Fetch a lucky batch. Bypasses resolution entirely.
    pub async fn fetch_lucky(&mut self) -> &InteractionState {
        self.state = InteractionState::FetchingLucky;

        self.state = match self.service.lucky().await {
            Ok(lucky) => InteractionState::ShowingLucky(lucky),
            Err(e) => InteractionState::Failed(e),
        };
        &self.state
    }
}
