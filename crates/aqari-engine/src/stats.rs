//! Read-only aggregate view plus administrative reset.

use crate::{leads::LeadSink, store::ConversationStore};
use aqari_core::model::LeadRecord;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Point-in-time counters and a lead snapshot. Everything here is a
/// copy; holding a snapshot never pins live state.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub open_sessions: usize,
    pub completed_count: usize,
    pub lead_count: usize,
    pub leads: Vec<LeadRecord>,
}

pub struct StatsFacade {
    store: Arc<ConversationStore>,
    leads: Arc<LeadSink>,
}

impl StatsFacade {
    pub fn new(store: Arc<ConversationStore>, leads: Arc<LeadSink>) -> Self {
        Self { store, leads }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            open_sessions: self.store.open_count(),
            completed_count: self.store.completed_count(),
            lead_count: self.leads.count(),
            leads: self.leads.all(),
        }
    }

    /// Administrative reset: sessions, completed set, and lead buffer.
    pub fn reset_all(&self) {
        self.store.reset_all();
        self.leads.clear();
        info!("stats reset: sessions, completed set, and leads cleared");
    }
}
