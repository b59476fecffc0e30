use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation language, chosen once at the language-selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ar,
    En,
}

impl Lang {
    /// Parse a normalized menu choice: `1` is Arabic, `2` is English.
    /// Any other input is not a valid language choice.
    pub fn from_menu_choice(normalized: &str) -> Option<Self> {
        match normalized {
            "1" => Some(Lang::Ar),
            "2" => Some(Lang::En),
            _ => None,
        }
    }
}

/// A localized catalog entry presented to the sender for selection.
///
/// Offers carry no ID of their own; within a session they are
/// identified by their 1-based position in the frozen listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub display_text_ar: String,
    pub display_text_en: String,
}

impl Offer {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            display_text_ar: ar.into(),
            display_text_en: en.into(),
        }
    }

    /// The display text for the given language.
    pub fn text(&self, lang: Lang) -> &str {
        match lang {
            Lang::Ar => &self.display_text_ar,
            Lang::En => &self.display_text_en,
        }
    }
}

/// A completed conversation's extracted data, one per sender per generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub sender_id: String,
    pub lang: Lang,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: LeadPayload,
}

/// What the sender actually gave us, depending on which script path
/// they went down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadPayload {
    /// Catalog flow: a chosen offer plus contact details.
    Offer {
        /// 1-based position in the listing shown to the sender, or 0
        /// when no offers were available.
        offer_number: usize,
        /// The chosen offer's text in the session language (or the
        /// localized no-offers note).
        offer_text: String,
        name: String,
        phone: String,
        /// False when the catalog was empty and the lead was collected
        /// through the no-offers path.
        had_offers: bool,
    },
    /// Fire-message flow, "has property" branch.
    Property { details: String },
    /// Fire-message flow, "no property" branch.
    Updates { wants_updates: bool },
}

impl LeadRecord {
    pub fn new(sender_id: impl Into<String>, lang: Lang, payload: LeadPayload) -> Self {
        Self {
            sender_id: sender_id.into(),
            lang,
            timestamp: Utc::now(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_menu_choice() {
        assert_eq!(Lang::from_menu_choice("1"), Some(Lang::Ar));
        assert_eq!(Lang::from_menu_choice("2"), Some(Lang::En));
        assert_eq!(Lang::from_menu_choice("3"), None);
        assert_eq!(Lang::from_menu_choice("hello"), None);
        assert_eq!(Lang::from_menu_choice(""), None);
    }

    #[test]
    fn test_offer_text_by_lang() {
        let offer = Offer::new("فيلا", "Villa");
        assert_eq!(offer.text(Lang::Ar), "فيلا");
        assert_eq!(offer.text(Lang::En), "Villa");
    }

    #[test]
    fn test_lead_record_serializes_flat_payload() {
        let lead = LeadRecord::new(
            "966500000001@c.us",
            Lang::En,
            LeadPayload::Updates {
                wants_updates: true,
            },
        );
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["kind"], "updates");
        assert_eq!(json["wants_updates"], true);
        assert_eq!(json["lang"], "en");
        assert!(json["timestamp"].is_string());
    }
}
