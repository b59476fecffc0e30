use crate::{
    error::BotError,
    message::InboundMessage,
    model::Offer,
    templates::TemplateBundle,
};
use async_trait::async_trait;

/// Messaging transport trait — the bot's connection to the chat network.
///
/// Implementations own connection/session/auth concerns (QR pairing,
/// reconnects, delivery semantics). The engine only ever sees
/// [`InboundMessage`] values and replies by sender ID.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Start receiving. Returns a receiver that yields inbound messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<InboundMessage>, BotError>;

    /// Send a text reply to a sender.
    async fn send(&self, sender_id: &str, text: &str) -> Result<(), BotError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), BotError>;
}

/// Remote offer catalog trait.
///
/// A fetch may fail with a transport-level error; callers go through
/// the caching client, which owns fallback behavior.
#[async_trait]
pub trait OfferCatalog: Send + Sync {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, BotError>;
}

/// Template provider trait — source of the active prompt bundle.
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    /// Fetch the currently active bundle, or `None` when no bundle is
    /// configured as active.
    async fn fetch_active(&self) -> Result<Option<TemplateBundle>, BotError>;
}
