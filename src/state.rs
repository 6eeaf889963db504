// src/state.rs
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::models::UnifiedState;
use crate::services::ambient::AmbientDevice;
use crate::services::cache::FeedCache;
use crate::services::usgs::GaugeReading;

/// Outcome of the most recent render cycle, as published to subscribers.
#[derive(Debug, Clone)]
pub enum Briefing {
    /// No cycle has completed since startup.
    Pending,
    Ready(UnifiedState),
    /// The report artifact could not be loaded; the message blocks the
    /// render until the next successful cycle.
    Failed(String),
}

/// Shared process state: the config, the feed caches, and the watch
/// channel the refresh driver publishes briefings on.
pub struct AppState {
    pub config: AppConfig,
    pub station_cache: FeedCache<Vec<AmbientDevice>>,
    pub gauge_cache: FeedCache<GaugeReading>,
    tx: watch::Sender<Briefing>,
    rx: watch::Receiver<Briefing>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let (tx, rx) = watch::channel(Briefing::Pending);
        Arc::new(Self {
            config,
            station_cache: FeedCache::new(),
            gauge_cache: FeedCache::new(),
            tx,
            rx,
        })
    }

    pub fn publish(&self, briefing: Briefing) {
        let _ = self.tx.send(briefing);
    }

    pub fn latest(&self) -> Briefing {
        self.rx.borrow().clone()
    }

    /// Subscribe to briefing updates, decoupled from the refresh cadence.
    pub fn subscribe(&self) -> watch::Receiver<Briefing> {
        self.rx.clone()
    }
}
