//! Template resolver: holds the active prompt bundle and refreshes it
//! periodically from the template provider.
//!
//! Reload policy: prompt text and conversation state are co-versioned.
//! By default every reload tick resets all sessions, the completed
//! set, and the lead buffer, so no sender sits mid-flow on stale
//! prompts. The policy is named (`reset_on_reload`) rather than an
//! incidental side effect, and can be disabled.

use crate::{leads::LeadSink, store::ConversationStore};
use aqari_core::{templates::TemplateBundle, traits::TemplateProvider};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};

pub struct TemplateResolver {
    provider: Arc<dyn TemplateProvider>,
    store: Arc<ConversationStore>,
    leads: Arc<LeadSink>,
    reset_on_reload: bool,
    current: RwLock<Arc<TemplateBundle>>,
}

impl TemplateResolver {
    pub fn new(
        provider: Arc<dyn TemplateProvider>,
        store: Arc<ConversationStore>,
        leads: Arc<LeadSink>,
        reset_on_reload: bool,
    ) -> Self {
        Self {
            provider,
            store,
            leads,
            reset_on_reload,
            current: RwLock::new(Arc::new(TemplateBundle::default())),
        }
    }

    /// The active bundle. Built-in defaults until a load succeeds.
    pub fn current(&self) -> Arc<TemplateBundle> {
        self.current
            .read()
            .expect("template lock poisoned")
            .clone()
    }

    /// Fetch the active bundle from the provider.
    ///
    /// Failures are logged and leave the existing bundle in place —
    /// never surfaced to callers. A provider with no active bundle
    /// reinstates the built-in defaults.
    pub async fn reload(&self) {
        match self.provider.fetch_active().await {
            Ok(Some(bundle)) => {
                let bundle = Arc::new(bundle.with_defaults());
                *self.current.write().expect("template lock poisoned") = bundle;
                info!("loaded active template bundle");
            }
            Ok(None) => {
                *self.current.write().expect("template lock poisoned") =
                    Arc::new(TemplateBundle::default());
                info!("no active template bundle, using defaults");
            }
            Err(e) => {
                warn!("template reload failed, keeping current bundle: {e}");
            }
        }

        if self.reset_on_reload {
            self.store.reset_all();
            self.leads.clear();
            info!("template reload: all sessions and leads reset");
        }
    }

    /// Periodic reload loop. The first tick fires after one full
    /// interval, not at startup.
    pub async fn run_reload_loop(self: Arc<Self>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            self.reload().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use aqari_core::error::BotError;
    use aqari_core::model::{Lang, LeadPayload, LeadRecord};
    use async_trait::async_trait;

    enum ProviderScript {
        Bundle(String),
        NoneActive,
        Fails,
    }

    struct FakeProvider(ProviderScript);

    #[async_trait]
    impl TemplateProvider for FakeProvider {
        async fn fetch_active(&self) -> Result<Option<TemplateBundle>, BotError> {
            match &self.0 {
                ProviderScript::Bundle(thank) => {
                    let json = format!(r#"{{"en": {{"thank": "{thank}"}}}}"#);
                    Ok(Some(serde_json::from_str(&json).unwrap()))
                }
                ProviderScript::NoneActive => Ok(None),
                ProviderScript::Fails => Err(BotError::Template("db down".into())),
            }
        }
    }

    fn resolver(script: ProviderScript, reset: bool) -> (Arc<TemplateResolver>, Arc<ConversationStore>, Arc<LeadSink>) {
        let store = Arc::new(ConversationStore::new());
        let leads = Arc::new(LeadSink::new());
        let resolver = Arc::new(TemplateResolver::new(
            Arc::new(FakeProvider(script)),
            store.clone(),
            leads.clone(),
            reset,
        ));
        (resolver, store, leads)
    }

    #[tokio::test]
    async fn test_current_is_default_before_first_load() {
        let (resolver, _, _) = resolver(ProviderScript::NoneActive, true);
        assert_eq!(
            resolver.current().en.thank,
            TemplateBundle::default().en.thank
        );
    }

    #[tokio::test]
    async fn test_reload_installs_bundle_with_defaults_filled() {
        let (resolver, _, _) = resolver(ProviderScript::Bundle("Shukran!".into()), true);
        resolver.reload().await;

        let bundle = resolver.current();
        assert_eq!(bundle.en.thank, "Shukran!");
        // Fields the provider left out come from the built-in defaults.
        assert_eq!(bundle.ar.thank, TemplateBundle::default().ar.thank);
        assert!(!bundle.en.welcome.is_empty());
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_existing_bundle() {
        let (failing, _, _) = resolver(ProviderScript::Fails, false);
        failing.reload().await;
        assert_eq!(
            failing.current().en.thank,
            TemplateBundle::default().en.thank,
            "failed reload keeps the pre-existing bundle"
        );
    }

    #[tokio::test]
    async fn test_reload_resets_sessions_and_leads() {
        let (resolver, store, leads) = resolver(ProviderScript::NoneActive, true);
        store.put(Session::new("s3"));
        store.mark_completed("done");
        leads.append(LeadRecord::new(
            "done",
            Lang::En,
            LeadPayload::Updates {
                wants_updates: false,
            },
        ));

        resolver.reload().await;

        assert_eq!(store.open_count(), 0);
        assert!(!store.is_completed("done"));
        assert_eq!(leads.count(), 0);
    }

    #[tokio::test]
    async fn test_reload_reset_applies_even_when_fetch_fails() {
        let store = Arc::new(ConversationStore::new());
        let leads = Arc::new(LeadSink::new());
        let resolver = TemplateResolver::new(
            Arc::new(FakeProvider(ProviderScript::Fails)),
            store.clone(),
            leads.clone(),
            true,
        );
        store.put(Session::new("s1"));

        resolver.reload().await;
        assert_eq!(store.open_count(), 0, "reset policy is per tick, not per successful fetch");
    }

    #[tokio::test]
    async fn test_reset_on_reload_disabled_preserves_state() {
        let (resolver, store, leads) = resolver(ProviderScript::NoneActive, false);
        store.put(Session::new("s1"));
        store.mark_completed("done");

        resolver.reload().await;

        assert_eq!(store.open_count(), 1);
        assert!(store.is_completed("done"));
        assert_eq!(leads.count(), 0);
    }
}
