//! Step handlers — one per row of the state graph.
//!
//! Each handler reads the session snapshot, applies the transition
//! rule for its step, commits the new session (or finalizes it), and
//! sends the reply. Invalid input self-loops with a re-prompt and
//! never mutates state.

use super::ConversationEngine;
use crate::session::{OfferChoice, Session, Step};
use aqari_core::{
    config::ScriptVariant,
    digits,
    error::BotError,
    model::Lang,
    model::LeadPayload,
};
use tracing::{debug, info, warn};

impl ConversationEngine {
    /// First message from an unseen sender.
    ///
    /// Catalog variant: any message opens a session at language
    /// selection. Fire-message variant: only a normalized 1/2 (the
    /// broadcast answer) opens a session; everything else is ignored.
    pub(super) async fn start_conversation(
        &self,
        sender_id: &str,
        normalized: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();

        match self.variant {
            ScriptVariant::Catalog => {
                self.store.put(Session::new(sender_id));
                info!("new sender {sender_id}, asking for language");
                self.reply(sender_id, &bundle.ar.choose_lang).await
            }
            ScriptVariant::FireMessage => {
                if normalized == "1" || normalized == "2" {
                    let mut session = Session::new(sender_id);
                    session.fire_response = Some(normalized.to_string());
                    self.store.put(session);
                    info!("sender {sender_id} answered fire message with {normalized}");
                    self.reply(sender_id, &bundle.ar.choose_lang).await
                } else {
                    debug!("sender {sender_id} is not a fire-message response, ignoring");
                    Ok(())
                }
            }
        }
    }

    /// Dispatch an open session to the handler for its current step.
    ///
    /// A (variant, step) pair outside the configured graph means the
    /// session state is malformed: reply with the step-appropriate
    /// invalid prompt and leave the session untouched.
    pub(super) async fn step_session(
        &self,
        session: Session,
        text: &str,
        normalized: &str,
    ) -> Result<(), BotError> {
        match (self.variant, session.step) {
            (_, Step::ChooseLang) => self.on_choose_lang(session, text, normalized).await,
            (ScriptVariant::Catalog, Step::Welcome) => self.on_welcome(session, text).await,
            (ScriptVariant::Catalog, Step::ChooseOffer) => {
                self.on_choose_offer(session, text, normalized).await
            }
            (ScriptVariant::Catalog, Step::AskName) => self.on_ask_name(session, text).await,
            (ScriptVariant::Catalog, Step::AskPhone) => self.on_ask_phone(session, text).await,
            (ScriptVariant::FireMessage, Step::WaitPropertyDetails) => {
                self.on_wait_property_details(session, normalized).await
            }
            (ScriptVariant::FireMessage, Step::CollectPropertyDetails) => {
                self.on_collect_property_details(session, text).await
            }
            (ScriptVariant::FireMessage, Step::WaitUpdateChoice) => {
                self.on_wait_update_choice(session, normalized).await
            }
            (variant, step) => {
                warn!(
                    "session for {} in step {step:?} not reachable under {variant:?} script",
                    session.sender_id
                );
                let bundle = self.templates.current();
                let texts = bundle.texts_or_ar(session.lang);
                self.reply(&session.sender_id, &texts.invalid_choice).await
            }
        }
    }

    /// CHOOSE_LANG: 1 → Arabic, 2 → English, anything else re-prompts.
    async fn on_choose_lang(
        &self,
        mut session: Session,
        text: &str,
        normalized: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();

        if !digits::is_numeric(text) {
            debug!("invalid language input from {}: {text:?}", session.sender_id);
            return self.reply(&session.sender_id, &bundle.ar.invalid_lang).await;
        }

        let Some(lang) = Lang::from_menu_choice(normalized) else {
            debug!(
                "language choice out of range from {}: {normalized:?}",
                session.sender_id
            );
            return self.reply(&session.sender_id, &bundle.ar.invalid_lang).await;
        };

        session.lang = Some(lang);
        info!("sender {} chose {lang:?}", session.sender_id);

        match self.variant {
            ScriptVariant::Catalog => {
                session.advance(Step::Welcome);
                let sender_id = session.sender_id.clone();
                self.store.put(session);
                self.reply(&sender_id, &bundle.texts(lang).welcome).await
            }
            ScriptVariant::FireMessage => {
                // Branch on the stored broadcast answer: 1 = has a
                // property to sell, anything else = wants (or not) updates.
                let has_property = session.fire_response.as_deref() == Some("1");
                let texts = bundle.texts(lang);
                let (next, reply) = if has_property {
                    (Step::WaitPropertyDetails, texts.yes_response.clone())
                } else {
                    (Step::WaitUpdateChoice, texts.no_response.clone())
                };
                session.advance(next);
                let sender_id = session.sender_id.clone();
                self.store.put(session);
                self.reply(&sender_id, &reply).await
            }
        }
    }

    /// WELCOME: any numeric input proceeds to the offer listing (or,
    /// on an empty catalog, straight to contact collection).
    async fn on_welcome(&self, mut session: Session, text: &str) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        if !digits::is_numeric(text) {
            debug!("invalid welcome input from {}: {text:?}", session.sender_id);
            return self.reply(&session.sender_id, &texts.send_number).await;
        }

        // Interim notice first; the fetch may take a moment.
        self.reply(&session.sender_id, &texts.loading_offers).await?;

        let offers = self.catalog.get_offers().await;

        if offers.is_empty() {
            // No offers is a valid state: collect contact details and
            // tag the lead so the team knows to follow up manually.
            info!(
                "no offers available, sender {} goes to contact collection",
                session.sender_id
            );
            session.selected_offer = Some(OfferChoice::NoneAvailable {
                text: texts.no_offers.clone(),
            });
            session.advance(Step::AskName);
            let sender_id = session.sender_id.clone();
            let prompt = texts.no_offers_ask_name.clone();
            self.store.put(session);
            return self.reply(&sender_id, &prompt).await;
        }

        let listing = bundle.offers_list(&offers, lang);
        // Freeze the listing on the session so the sender's numeric
        // choice resolves against exactly what they saw.
        session.offers = offers;
        session.advance(Step::ChooseOffer);
        let sender_id = session.sender_id.clone();
        self.store.put(session);
        self.reply(&sender_id, &listing).await
    }

    /// CHOOSE_OFFER: a number within the frozen listing selects; any
    /// other input re-fetches and re-displays with an error prefix.
    async fn on_choose_offer(
        &self,
        mut session: Session,
        text: &str,
        normalized: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        let choice = if digits::is_numeric(text) {
            normalized.parse::<usize>().ok()
        } else {
            None
        };

        if let Some(number) = choice {
            if number >= 1 && number <= session.offers.len() {
                let offer_text = session.offers[number - 1].text(lang).to_string();
                info!(
                    "sender {} chose offer {number}: {offer_text}",
                    session.sender_id
                );
                session.selected_offer = Some(OfferChoice::Listed {
                    number,
                    text: offer_text.clone(),
                });
                session.advance(Step::AskName);
                let sender_id = session.sender_id.clone();
                self.store.put(session);
                return self
                    .reply(&sender_id, &texts.ask_name_for(number, &offer_text))
                    .await;
            }
        }

        debug!(
            "invalid offer choice from {}: {text:?}",
            session.sender_id
        );
        // Re-fetch (served from cache inside the TTL) and re-freeze, so
        // the re-displayed listing and the session stay in sync.
        let offers = self.catalog.get_offers().await;
        let listing = bundle.offers_list(&offers, lang);
        let prefix = texts.valid_number.clone();
        session.offers = offers;
        let sender_id = session.sender_id.clone();
        self.store.put(session);
        self.reply(&sender_id, &format!("{prefix}\n\n{listing}")).await
    }

    /// ASK_NAME: any non-empty text is the name; empty input re-prompts.
    async fn on_ask_name(&self, mut session: Session, text: &str) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        if text.is_empty() {
            let reprompt = match &session.selected_offer {
                Some(OfferChoice::Listed { number, text }) => {
                    texts.ask_name_for(*number, text)
                }
                _ => texts.no_offers_ask_name.clone(),
            };
            return self.reply(&session.sender_id, &reprompt).await;
        }

        info!("sender {} provided name {text:?}", session.sender_id);
        session.name = Some(text.to_string());
        session.advance(Step::AskPhone);
        let sender_id = session.sender_id.clone();
        self.store.put(session);
        self.reply(&sender_id, &texts.ask_phone_for(text)).await
    }

    /// ASK_PHONE: terminal. Whatever the sender typed is the phone.
    async fn on_ask_phone(&self, session: Session, text: &str) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        let (offer_number, offer_text, had_offers) = match &session.selected_offer {
            Some(OfferChoice::Listed { number, text }) => (*number, text.clone(), true),
            Some(OfferChoice::NoneAvailable { text }) => (0, text.clone(), false),
            None => (0, texts.no_offers.clone(), false),
        };

        let payload = LeadPayload::Offer {
            offer_number,
            offer_text,
            name: session.name.clone().unwrap_or_default(),
            phone: text.to_string(),
            had_offers,
        };

        let reply = if had_offers {
            texts.thank.clone()
        } else {
            texts.thank_no_offers.clone()
        };

        self.finalize(&session, payload, &reply).await
    }

    /// WAIT_PROPERTY_DETAILS: 1 proceeds to detail collection.
    async fn on_wait_property_details(
        &self,
        mut session: Session,
        normalized: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        if normalized != "1" {
            debug!(
                "invalid input awaiting property confirmation from {}: {normalized:?}",
                session.sender_id
            );
            return self.reply(&session.sender_id, &texts.invalid_choice).await;
        }

        session.advance(Step::CollectPropertyDetails);
        let sender_id = session.sender_id.clone();
        self.store.put(session);
        self.reply(&sender_id, &texts.ask_details).await
    }

    /// COLLECT_PROPERTY_DETAILS: terminal. The message body is the lead.
    async fn on_collect_property_details(
        &self,
        session: Session,
        text: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let reply = bundle.texts(lang).thank.clone();

        self.finalize(
            &session,
            LeadPayload::Property {
                details: text.to_string(),
            },
            &reply,
        )
        .await
    }

    /// WAIT_UPDATE_CHOICE: 1 opts in, 2 opts out, both terminal.
    async fn on_wait_update_choice(
        &self,
        session: Session,
        normalized: &str,
    ) -> Result<(), BotError> {
        let bundle = self.templates.current();
        let lang = session.lang.unwrap_or(Lang::Ar);
        let texts = bundle.texts(lang);

        let (wants_updates, reply) = match normalized {
            "1" => (true, texts.updates_confirmed.clone()),
            "2" => (false, texts.updates_declined.clone()),
            _ => {
                debug!(
                    "invalid update choice from {}: {normalized:?}",
                    session.sender_id
                );
                return self.reply(&session.sender_id, &texts.invalid_choice).await;
            }
        };

        self.finalize(
            &session,
            LeadPayload::Updates { wants_updates },
            &reply,
        )
        .await
    }
}
