//! # aqari-engine
//!
//! The conversation core: per-sender session state machine, offer
//! catalog client with caching and fallback, template resolver with
//! periodic refresh, lead collection, and aggregate stats.

pub mod catalog;
pub mod engine;
pub mod leads;
pub mod session;
pub mod stats;
pub mod store;
pub mod templates;

pub use catalog::{HttpOfferCatalog, OfferCatalogClient};
pub use engine::ConversationEngine;
pub use leads::LeadSink;
pub use session::{OfferChoice, Session, Step};
pub use stats::{StatsFacade, StatsSnapshot};
pub use store::ConversationStore;
pub use templates::TemplateResolver;
