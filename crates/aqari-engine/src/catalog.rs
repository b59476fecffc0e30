//! Offer catalog client: time-boxed caching over the remote catalog,
//! with a static fallback list when the fetch fails.

use aqari_core::{error::BotError, model::Offer, traits::OfferCatalog};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct CacheEntry {
    fetched_at: Instant,
    offers: Vec<Offer>,
}

/// Caching client over an [`OfferCatalog`] collaborator.
///
/// `get_offers` never fails and never returns an error to the
/// conversation flow: a failed fetch yields the built-in fallback
/// list, an empty successful fetch yields the empty list as-is (a
/// valid, distinct state the flow handles as the no-offers path).
pub struct OfferCatalogClient {
    catalog: Arc<dyn OfferCatalog>,
    ttl: Duration,
    /// Staleness is measured from the last successful fetch; failed
    /// attempts leave the entry untouched.
    cache: Mutex<Option<CacheEntry>>,
}

impl OfferCatalogClient {
    pub fn new(catalog: Arc<dyn OfferCatalog>, ttl: Duration) -> Self {
        Self {
            catalog,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Current offers: cached if fresh, otherwise fetched. Falls back
    /// to [`fallback_offers`] on any fetch error.
    pub async fn get_offers(&self) -> Vec<Offer> {
        // The lock is held across the fetch so concurrent callers
        // cannot stampede the catalog API.
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!("serving {} offers from cache", entry.offers.len());
                return entry.offers.clone();
            }
        }

        match self.catalog.fetch_offers().await {
            Ok(offers) => {
                info!("fetched {} offers from catalog", offers.len());
                *cache = Some(CacheEntry {
                    fetched_at: Instant::now(),
                    offers: offers.clone(),
                });
                offers
            }
            Err(e) => {
                warn!("offer fetch failed, using fallback offers: {e}");
                fallback_offers()
            }
        }
    }

    /// Drop the cached entry; the next call fetches fresh.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }
}

/// Placeholder offers shown when the catalog is unreachable.
pub fn fallback_offers() -> Vec<Offer> {
    vec![
        Offer::new(
            "عرض احتياطي - فيلا راقية 500م²",
            "Fallback Offer - Luxury Villa 500m²",
        ),
        Offer::new(
            "عرض احتياطي - شقة فاخرة مطلة على البحر",
            "Fallback Offer - Luxury Sea View Apartment",
        ),
    ]
}

// --- HTTP collaborator implementation ---

#[derive(Deserialize)]
struct OffersResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<Offer>>,
    #[serde(default)]
    count: Option<u64>,
}

/// Catalog API client: `GET {base}/api/bot/offers` returning a
/// `{ success, count, data }` envelope.
pub struct HttpOfferCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOfferCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl OfferCatalog for HttpOfferCatalog {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, BotError> {
        let url = format!("{}/api/bot/offers", self.base_url.trim_end_matches('/'));
        debug!("catalog: GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Catalog(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::Catalog(format!(
                "catalog returned {}",
                resp.status()
            )));
        }

        let parsed: OffersResponse = resp
            .json()
            .await
            .map_err(|e| BotError::Catalog(format!("failed to parse response: {e}")))?;

        if !parsed.success {
            return Err(BotError::Catalog("catalog reported failure".to_string()));
        }

        let offers = parsed
            .data
            .ok_or_else(|| BotError::Catalog("missing data field".to_string()))?;

        if let Some(count) = parsed.count {
            if count as usize != offers.len() {
                debug!("catalog count field {} != data length {}", count, offers.len());
            }
        }

        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted catalog: counts fetches, returns a fixed result.
    struct FakeCatalog {
        fetches: AtomicUsize,
        result: Result<Vec<Offer>, String>,
    }

    impl FakeCatalog {
        fn ok(offers: Vec<Offer>) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                result: Ok(offers),
            }
        }

        fn failing() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                result: Err("connection refused".to_string()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OfferCatalog for FakeCatalog {
        async fn fetch_offers(&self) -> Result<Vec<Offer>, BotError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(BotError::Catalog)
        }
    }

    fn two_offers() -> Vec<Offer> {
        vec![Offer::new("أ", "A"), Offer::new("ب", "B")]
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_served_from_cache() {
        let catalog = Arc::new(FakeCatalog::ok(two_offers()));
        let client = OfferCatalogClient::new(catalog.clone(), Duration::from_secs(300));

        let first = client.get_offers().await;
        let second = client.get_offers().await;

        assert_eq!(first, second);
        assert_eq!(catalog.fetch_count(), 1, "cache hit must not re-fetch");
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let catalog = Arc::new(FakeCatalog::ok(two_offers()));
        let client = OfferCatalogClient::new(catalog.clone(), Duration::ZERO);

        client.get_offers().await;
        client.get_offers().await;
        assert_eq!(catalog.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let catalog = Arc::new(FakeCatalog::ok(two_offers()));
        let client = OfferCatalogClient::new(catalog.clone(), Duration::from_secs(300));

        client.get_offers().await;
        client.invalidate().await;
        client.get_offers().await;
        assert_eq!(catalog.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_fallback_offers() {
        let catalog = Arc::new(FakeCatalog::failing());
        let client = OfferCatalogClient::new(catalog.clone(), Duration::from_secs(300));

        let offers = client.get_offers().await;
        assert!(!offers.is_empty(), "fallback list must be non-empty");
        assert_eq!(offers, fallback_offers());
    }

    #[tokio::test]
    async fn test_failure_does_not_poison_cache() {
        let catalog = Arc::new(FakeCatalog::failing());
        let client = OfferCatalogClient::new(catalog.clone(), Duration::from_secs(300));

        client.get_offers().await;
        client.get_offers().await;
        // No successful fetch yet, so every call retries the catalog.
        assert_eq!(catalog.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_success_is_returned_as_is() {
        let catalog = Arc::new(FakeCatalog::ok(Vec::new()));
        let client = OfferCatalogClient::new(catalog.clone(), Duration::from_secs(300));

        let offers = client.get_offers().await;
        assert!(offers.is_empty(), "empty catalog is a valid state, not an error");

        // And the empty result is cached like any other success.
        client.get_offers().await;
        assert_eq!(catalog.fetch_count(), 1);
    }

    #[test]
    fn test_offers_envelope_parsing() {
        let json = r#"{"success":true,"count":2,"data":[
            {"display_text_ar":"فيلا","display_text_en":"Villa"},
            {"display_text_ar":"شقة","display_text_en":"Apartment"}
        ]}"#;
        let parsed: OffersResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        let offers = parsed.data.unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].display_text_en, "Villa");
    }

    #[test]
    fn test_offers_envelope_missing_data() {
        let json = r#"{"success":true}"#;
        let parsed: OffersResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.is_none());
    }
}
