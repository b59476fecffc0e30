//! Conversation engine — consumes inbound messages one at a time,
//! drives the per-sender state machine, and emits replies.
//!
//! Includes: origin/completed-sender filtering, digit normalization,
//! per-message error containment with a best-effort bilingual apology.

mod flow;


use crate::{
    catalog::OfferCatalogClient, leads::LeadSink, store::ConversationStore,
    templates::TemplateResolver,
};
use aqari_core::{
    config::ScriptVariant,
    digits,
    error::BotError,
    message::{InboundMessage, Origin},
    model::{Lang, LeadPayload, LeadRecord},
    templates::APOLOGY,
    traits::MessageTransport,
};
use crate::session::Session;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The message-dispatch core: one instance per process, shared by the
/// event loop.
pub struct ConversationEngine {
    transport: Arc<dyn MessageTransport>,
    store: Arc<ConversationStore>,
    catalog: Arc<OfferCatalogClient>,
    templates: Arc<TemplateResolver>,
    leads: Arc<LeadSink>,
    variant: ScriptVariant,
}

impl ConversationEngine {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        store: Arc<ConversationStore>,
        catalog: Arc<OfferCatalogClient>,
        templates: Arc<TemplateResolver>,
        leads: Arc<LeadSink>,
        variant: ScriptVariant,
    ) -> Self {
        Self {
            transport,
            store,
            catalog,
            templates,
            leads,
            variant,
        }
    }

    /// Process a single inbound message end to end.
    ///
    /// Never panics and never propagates an error: anything that goes
    /// wrong past the silent-drop filters results in (at most) an
    /// apology reply. One malformed message must not poison the loop.
    pub async fn handle_message(&self, incoming: InboundMessage) {
        if incoming.origin != Origin::Direct {
            debug!(
                "ignoring {:?} message from {}",
                incoming.origin, incoming.sender_id
            );
            return;
        }

        if self.store.is_completed(&incoming.sender_id) {
            debug!("sender {} already completed, ignoring", incoming.sender_id);
            return;
        }

        let text = incoming.text.trim().to_string();
        let normalized = digits::normalize(&text);
        debug!(
            "processing message from {}: {:?} (normalized {:?})",
            incoming.sender_id, text, normalized
        );

        if let Err(e) = self.process(&incoming.sender_id, &text, &normalized).await {
            error!(
                "error handling message from {}: {e}",
                incoming.sender_id
            );
            if let Err(send_err) = self.transport.send(&incoming.sender_id, APOLOGY).await {
                error!(
                    "failed to send apology to {}: {send_err}",
                    incoming.sender_id
                );
            }
        }
    }

    /// Route to the step handler for this sender's session.
    async fn process(
        &self,
        sender_id: &str,
        text: &str,
        normalized: &str,
    ) -> Result<(), BotError> {
        match self.store.get(sender_id) {
            None => self.start_conversation(sender_id, normalized).await,
            Some(session) => self.step_session(session, text, normalized).await,
        }
    }

    /// Send a reply to a sender. Failures propagate to the per-message
    /// boundary, which logs them and attempts the apology.
    async fn reply(&self, sender_id: &str, text: &str) -> Result<(), BotError> {
        self.transport.send(sender_id, text).await
    }

    /// Terminal transition: record the lead, silence the sender for
    /// this generation, drop the session, and send the closing reply —
    /// in that order.
    async fn finalize(
        &self,
        session: &Session,
        payload: LeadPayload,
        reply: &str,
    ) -> Result<(), BotError> {
        let lang = session.lang.unwrap_or(Lang::Ar);
        self.leads
            .append(LeadRecord::new(session.sender_id.clone(), lang, payload));
        self.store.mark_completed(&session.sender_id);
        self.store.remove(&session.sender_id);
        info!(
            "conversation completed for {} ({} leads total)",
            session.sender_id,
            self.leads.count()
        );
        self.reply(&session.sender_id, reply).await
    }
}
