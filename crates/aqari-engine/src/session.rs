//! Per-sender conversation state.

use aqari_core::model::{Lang, Offer};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Where a sender is in the script.
///
/// Steps only ever move forward (see [`Step::rank`]); invalid input
/// self-loops on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    ChooseLang,
    Welcome,
    ChooseOffer,
    AskName,
    AskPhone,
    WaitPropertyDetails,
    CollectPropertyDetails,
    WaitUpdateChoice,
}

impl Step {
    /// Position along the script. Both variants share the ordering:
    /// the catalog flow walks ChooseLang..AskPhone, the fire-message
    /// flow walks ChooseLang then one of the two tail branches.
    pub fn rank(self) -> u8 {
        match self {
            Step::ChooseLang => 0,
            Step::Welcome => 1,
            Step::ChooseOffer => 2,
            Step::AskName => 3,
            Step::AskPhone => 4,
            Step::WaitPropertyDetails => 1,
            Step::CollectPropertyDetails => 2,
            Step::WaitUpdateChoice => 1,
        }
    }
}

/// The offer a sender settled on, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferChoice {
    /// A numbered pick from the session's frozen listing.
    Listed { number: usize, text: String },
    /// The catalog was empty; the lead goes down the no-offers path.
    NoneAvailable { text: String },
}

/// Mutable per-sender state while a lead is mid-flow.
///
/// Created on first contact, mutated in place by each valid
/// transition, deleted the moment a terminal step completes. Never
/// outlives the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub sender_id: String,
    pub step: Step,
    /// Set once at ChooseLang, immutable afterward.
    pub lang: Option<Lang>,
    /// Fire-message variant: the normalized 1/2 the sender answered
    /// the broadcast with, branched on after language selection.
    pub fire_response: Option<String>,
    /// Offers frozen at display time, so a later numeric choice maps
    /// unambiguously even if the catalog changes underneath.
    pub offers: Vec<Offer>,
    pub selected_offer: Option<OfferChoice>,
    pub name: Option<String>,
}

impl Session {
    /// New session at the language-selection step.
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            step: Step::ChooseLang,
            lang: None,
            fire_response: None,
            offers: Vec::new(),
            selected_offer: None,
            name: None,
        }
    }

    /// Move to the next step. Steps never go backward; a backward
    /// request indicates a handler bug and is logged and ignored.
    pub fn advance(&mut self, next: Step) {
        if next.rank() < self.step.rank() {
            warn!(
                "refusing backward step {:?} -> {:?} for {}",
                self.step, next, self.sender_id
            );
            return;
        }
        self.step = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_choose_lang() {
        let s = Session::new("966500000001@c.us");
        assert_eq!(s.step, Step::ChooseLang);
        assert!(s.lang.is_none());
        assert!(s.offers.is_empty());
    }

    #[test]
    fn test_advance_moves_forward() {
        let mut s = Session::new("x");
        s.advance(Step::Welcome);
        s.advance(Step::ChooseOffer);
        s.advance(Step::AskName);
        s.advance(Step::AskPhone);
        assert_eq!(s.step, Step::AskPhone);
    }

    #[test]
    fn test_advance_refuses_backward() {
        let mut s = Session::new("x");
        s.advance(Step::AskName);
        s.advance(Step::Welcome);
        assert_eq!(s.step, Step::AskName);
    }

    #[test]
    fn test_advance_allows_self_loop() {
        let mut s = Session::new("x");
        s.advance(Step::ChooseLang);
        assert_eq!(s.step, Step::ChooseLang);
    }

    #[test]
    fn test_fire_branch_is_forward() {
        let mut s = Session::new("x");
        s.advance(Step::WaitPropertyDetails);
        s.advance(Step::CollectPropertyDetails);
        assert_eq!(s.step, Step::CollectPropertyDetails);

        let mut s = Session::new("y");
        s.advance(Step::WaitUpdateChoice);
        assert_eq!(s.step, Step::WaitUpdateChoice);
    }
}
