//! Wiring: build the collaborators from config and run the event loop.

use crate::console::ConsoleTransport;
use aqari_core::{
    config::Config,
    error::BotError,
    model::Offer,
    templates::TemplateBundle,
    traits::{MessageTransport, OfferCatalog, TemplateProvider},
};
use aqari_engine::{
    ConversationEngine, ConversationStore, HttpOfferCatalog, LeadSink, OfferCatalogClient,
    StatsFacade, TemplateResolver,
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Catalog stand-in when no API is configured: every fetch fails, so
/// the client serves its fallback offers.
struct NoCatalog;

#[async_trait]
impl OfferCatalog for NoCatalog {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, BotError> {
        Err(BotError::Catalog("no catalog configured".to_string()))
    }
}

/// Template provider backed by an optional local JSON file. No file
/// means no active bundle, i.e. the built-in defaults.
struct FileTemplateProvider {
    path: PathBuf,
}

#[async_trait]
impl TemplateProvider for FileTemplateProvider {
    async fn fetch_active(&self) -> Result<Option<TemplateBundle>, BotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        let bundle: TemplateBundle = serde_json::from_str(&content)?;
        Ok(Some(bundle))
    }
}

/// Build everything from config and run until shutdown.
pub async fn run(cfg: Config) -> anyhow::Result<()> {
    let transport: Arc<dyn MessageTransport> = if cfg.channel.console {
        Arc::new(ConsoleTransport::new())
    } else {
        anyhow::bail!("no transport enabled; set [channel] console = true");
    };

    let catalog: Arc<dyn OfferCatalog> = if cfg.catalog.base_url.is_empty() {
        warn!("no catalog base_url configured, serving fallback offers");
        Arc::new(NoCatalog)
    } else {
        Arc::new(HttpOfferCatalog::new(cfg.catalog.base_url.clone()))
    };

    let store = Arc::new(ConversationStore::new());
    let leads = Arc::new(LeadSink::new());
    let catalog_client = Arc::new(OfferCatalogClient::new(
        catalog,
        Duration::from_secs(cfg.catalog.cache_ttl_secs),
    ));
    let resolver = Arc::new(TemplateResolver::new(
        Arc::new(FileTemplateProvider {
            path: PathBuf::from("templates.json"),
        }),
        store.clone(),
        leads.clone(),
        cfg.templates.reset_on_reload,
    ));

    // Pick up an active bundle before the first message, without the
    // reset side effect mattering (nothing is in flight yet).
    resolver.reload().await;

    let engine = ConversationEngine::new(
        transport.clone(),
        store.clone(),
        catalog_client,
        resolver.clone(),
        leads.clone(),
        cfg.script.variant,
    );
    let stats = StatsFacade::new(store.clone(), leads.clone());

    let mut rx = transport
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start transport: {e}"))?;

    let reload_handle = tokio::spawn(
        resolver
            .clone()
            .run_reload_loop(Duration::from_secs(cfg.templates.reload_interval_secs)),
    );

    info!(
        "aqari running | variant: {:?} | transport: {}",
        cfg.script.variant,
        transport.name()
    );

    // Single logical worker: messages are handled one at a time in
    // arrival order, which serializes all per-sender state access.
    loop {
        tokio::select! {
            maybe_msg = rx.recv() => {
                match maybe_msg {
                    Some(incoming) => engine.handle_message(incoming).await,
                    None => {
                        info!("transport closed the message stream");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received shutdown signal");
                break;
            }
        }
    }

    reload_handle.abort();

    let snapshot = stats.snapshot();
    info!(
        "shutting down | open sessions: {} | completed: {} | leads: {}",
        snapshot.open_sessions, snapshot.completed_count, snapshot.lead_count
    );

    if let Err(e) = transport.stop().await {
        warn!("failed to stop transport: {e}");
    }

    Ok(())
}
