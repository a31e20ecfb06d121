//! Reply templates and random selection.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::domain::engagement::Intent;

/// Reply used when an intent has no templates.
pub const FALLBACK_REPLY: &str = "I see.";

/// Reply templates keyed by intent.
///
/// Blank templates are dropped on insertion, so any list present is
/// non-empty and holds only non-empty strings.
#[derive(Debug, Clone, Default)]
pub struct ResponseCatalog {
    templates: HashMap<Intent, Vec<String>>,
}

impl ResponseCatalog {
    /// An empty catalog; every intent falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replaces the templates for an intent.
    pub fn with_templates<I, S>(mut self, intent: Intent, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let templates: Vec<String> = templates
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.trim().is_empty())
            .collect();
        if templates.is_empty() {
            self.templates.remove(&intent);
        } else {
            self.templates.insert(intent, templates);
        }
        self
    }

    /// Templates for an intent, empty if none.
    pub fn templates(&self, intent: Intent) -> &[String] {
        self.templates
            .get(&intent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The built-in persona: a cautious, slightly flustered account holder.
    pub fn standard() -> Self {
        Self::empty()
            .with_templates(
                Intent::ConfirmDetails,
                [
                    "Oh no, this is worrying. Which of my accounts has the problem exactly?",
                    "Sorry, I am confused. Can you explain again what went wrong and when?",
                    "I want to get this right. Is it my savings account or the joint one with my wife?",
                    "Please go slowly, I am writing this down. What exactly do I have to do?",
                    "How did you come to know about this issue? Nobody from the branch told me.",
                    "What happens if I cannot finish this today? I am not good with these apps.",
                ],
            )
            .with_templates(
                Intent::AskUpi,
                [
                    "Okay, I have the payment app open. Which UPI ID should I enter?",
                    "My grandson set up UPI for me. Can you type the UPI ID so I copy it correctly?",
                    "There are two IDs showing here. Tell me the exact UPI ID you want me to use.",
                    "I missed the UPI ID, could you send it again letter by letter?",
                ],
            )
            .with_templates(
                Intent::AskPhone,
                [
                    "Can I call you back on your direct number? I feel safer that way.",
                    "My daughter says I should always call back. What number can I reach you on?",
                    "Give me your mobile number please, my line keeps dropping.",
                    "What is your office phone number? I will note it in my diary.",
                ],
            )
            .with_templates(
                Intent::AskBank,
                [
                    "Which account number is showing blocked on your side? I have three accounts.",
                    "Should I transfer into some other account? Please send the account number.",
                    "Let me check with my passbook. What account number do you have there?",
                ],
            )
            .with_templates(
                Intent::AskEmail,
                [
                    "Can you email me the details? What is your official email ID?",
                    "I like to keep things in writing. Which email address should I reply to?",
                    "My son wants to see this too. Please share your email so I can forward it.",
                ],
            )
            .with_templates(
                Intent::AskLink,
                [
                    "The page is not opening for me. Can you send the link again?",
                    "Where exactly do I have to do the verification? Please share the website.",
                    "I deleted the message by mistake. Send me the link one more time?",
                ],
            )
            .with_templates(
                Intent::AskCaseId,
                [
                    "Is there a complaint number for this? I want to note it down.",
                    "What is the reference number, in case the branch asks me?",
                    "Please give me the case ID so I can follow up later.",
                ],
            )
            .with_templates(
                Intent::AskPolicyNumber,
                [
                    "I have policies with two companies. Which policy number is this about?",
                    "Let me find the papers. What policy number do you have on record?",
                ],
            )
            .with_templates(
                Intent::AskOrderNumber,
                [
                    "I ordered a few things last week. Which order number is this?",
                    "Can you tell me the order or tracking number so I can check?",
                ],
            )
            .with_templates(
                Intent::AskCardNumber,
                [
                    "I have more than one card. Which card number are you talking about?",
                    "Can you read out the card number you have so I know which one it is?",
                ],
            )
            .with_templates(
                Intent::AskIfsc,
                [
                    "My branch changed last year. What IFSC code do you have for me?",
                    "Which IFSC code should I use for this? I want to check it with the branch.",
                ],
            )
            .with_templates(
                Intent::AskIdentity,
                [
                    "Before I go further, what is your full name and employee ID?",
                    "Which department are you calling from, and who is your manager?",
                    "Where is your office located? I may come in person.",
                    "How do I know this call is genuine? Is there an ID I can check?",
                    "Please spell your name for me and tell me which branch you sit in.",
                ],
            )
            .with_templates(
                Intent::DeepProbe,
                [
                    "I would like to speak to your supervisor. What is their name and direct number?",
                    "What is the registered name of your organisation? I will look it up first.",
                    "Can you send an official notice on letterhead by email before I do anything?",
                    "How did you get my number and account details in the first place?",
                    "If I do not do this, what exactly happens? Please explain every step.",
                ],
            )
            .with_templates(
                Intent::Stall,
                [
                    "One minute please, I am looking for my reading glasses.",
                    "Hold on, the app is loading very slowly today.",
                    "Let me find my passbook, it is in the cupboard somewhere.",
                    "Please wait, someone is at the door.",
                    "My phone battery is low, let me plug it in. Just a moment.",
                ],
            )
            .with_templates(
                Intent::Neutral,
                [
                    "Okay, I am listening.",
                    "Alright, go on.",
                    "I understand, please continue.",
                ],
            )
    }
}

/// Picks a reply for an intent uniformly at random.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    catalog: ResponseCatalog,
}

impl ResponseSelector {
    pub fn new(catalog: ResponseCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ResponseCatalog {
        &self.catalog
    }

    /// A reply for `intent`, never empty.
    pub fn select_reply(&self, intent: Intent) -> String {
        self.select_with(intent, &mut rand::thread_rng())
    }

    /// Like [`select_reply`](Self::select_reply) with a caller-supplied RNG.
    pub fn select_with<R: Rng + ?Sized>(&self, intent: Intent, rng: &mut R) -> String {
        self.catalog
            .templates(intent)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new(ResponseCatalog::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn standard_catalog_covers_every_intent() {
        let catalog = ResponseCatalog::standard();
        for intent in Intent::ALL {
            assert!(!catalog.templates(intent).is_empty(), "{}", intent);
        }
    }

    #[test]
    fn replies_come_from_the_intent_templates() {
        let selector = ResponseSelector::default();
        for intent in Intent::ALL {
            let reply = selector.select_reply(intent);
            assert!(!reply.is_empty());
            assert!(selector.catalog().templates(intent).contains(&reply));
        }
    }

    #[test]
    fn missing_intent_falls_back() {
        let selector = ResponseSelector::new(ResponseCatalog::empty());
        assert_eq!(selector.select_reply(Intent::AskUpi), FALLBACK_REPLY);
    }

    #[test]
    fn blank_templates_are_dropped() {
        let catalog = ResponseCatalog::empty().with_templates(Intent::Stall, ["", "   "]);
        assert!(catalog.templates(Intent::Stall).is_empty());
        let selector = ResponseSelector::new(catalog);
        assert_eq!(selector.select_reply(Intent::Stall), FALLBACK_REPLY);
    }

    #[test]
    fn seeded_selection_is_deterministic() {
        let selector = ResponseSelector::default();
        let a = selector.select_with(Intent::AskIdentity, &mut StdRng::seed_from_u64(7));
        let b = selector.select_with(Intent::AskIdentity, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn selection_reaches_every_template() {
        let selector = ResponseSelector::default();
        let mut rng = StdRng::seed_from_u64(42);
        let total = selector.catalog().templates(Intent::Stall).len();
        let seen: std::collections::HashSet<_> = (0..500)
            .map(|_| selector.select_with(Intent::Stall, &mut rng))
            .collect();
        assert_eq!(seen.len(), total);
    }
}
