//! Scripted Responder
//!
//! The support assistant answers from a fixed, ordered keyword table. The first
//! entry whose keyword appears in the message wins; table order matters, not the
//! position of the keyword in the message.

use std::{fs, io, path::Path};

use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

const GREETING: &str = "Hi there! I'm your support assistant. Ask me about orders, delivery, payments, products or your account.";

const FALLBACK: &str = "I'm not sure I understood that. Could you tell me a bit more? You can ask about orders, delivery, payments, products or your account.";

const TICKET_SUGGESTION: &str = "It sounds like you're having trouble. Would you like to create a support ticket so our team can look into it?";

const DEFAULT_RULES: [(&str, &str); 6] = [
    (
        "order",
        "You can see all your orders and their status on the Orders page. If something is wrong with an order, share the order ID and we'll look into it.",
    ),
    (
        "delivery",
        "Most deliveries arrive within 30-45 minutes. Delivery times can be longer during peak hours or bad weather.",
    ),
    (
        "payment",
        "We accept cash on delivery, cards and UPI. If you were charged for an order that failed, the amount is refunded within 5-7 business days.",
    ),
    (
        "product",
        "Every product page lists price, unit and brand. If an item arrived damaged or not as described, let us know and we'll arrange a replacement or refund.",
    ),
    (
        "account",
        "You can update your name, phone number and saved addresses from your profile. For sign-in problems, try resetting your password from the login page.",
    ),
    (
        "general",
        "I'm here to help with anything about the store. What would you like to know?",
    ),
];

const DEFAULT_TICKET_TRIGGERS: [&str; 3] = ["issue", "problem", "help"];

/// Errors raised while loading a responder script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read chat script: {0}")]
    Io(#[from] io::Error),

    /// The script is not valid YAML or has the wrong shape.
    #[error("failed to parse chat script: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The script has no keyword rules.
    #[error("chat script has no rules")]
    NoRules,

    /// A rule has an empty keyword.
    #[error("chat script rule {0} has an empty keyword")]
    EmptyKeyword(usize),
}

/// Keyword and the canned reply it selects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rule {
    /// Lowercase substring to look for
    pub keyword: String,

    /// Reply sent when the keyword matches
    pub response: String,
}

#[derive(Debug, Deserialize)]
struct Script {
    greeting: Option<String>,
    rules: Vec<Rule>,
    fallback: Option<String>,
    ticket_triggers: Option<Vec<String>>,
    ticket_suggestion: Option<String>,
}

/// Keyword-table responder for the support chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Responder {
    greeting: String,
    rules: SmallVec<[Rule; 6]>,
    fallback: String,
    ticket_triggers: SmallVec<[String; 3]>,
    ticket_suggestion: String,
}

impl Default for Responder {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            rules: DEFAULT_RULES
                .into_iter()
                .map(|(keyword, response)| Rule {
                    keyword: keyword.to_string(),
                    response: response.to_string(),
                })
                .collect(),
            fallback: FALLBACK.to_string(),
            ticket_triggers: DEFAULT_TICKET_TRIGGERS
                .into_iter()
                .map(str::to_string)
                .collect(),
            ticket_suggestion: TICKET_SUGGESTION.to_string(),
        }
    }
}

impl Responder {
    /// Build a responder from a YAML script. Omitted sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the YAML is invalid or defines no usable rules.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_norway::from_str(yaml)?;

        if script.rules.is_empty() {
            return Err(ScriptError::NoRules);
        }

        let mut rules = SmallVec::with_capacity(script.rules.len());

        for (idx, rule) in script.rules.into_iter().enumerate() {
            let keyword = rule.keyword.trim().to_lowercase();

            if keyword.is_empty() {
                return Err(ScriptError::EmptyKeyword(idx));
            }

            rules.push(Rule {
                keyword,
                response: rule.response,
            });
        }

        let defaults = Self::default();

        Ok(Self {
            greeting: script.greeting.unwrap_or(defaults.greeting),
            rules,
            fallback: script.fallback.unwrap_or(defaults.fallback),
            ticket_triggers: script.ticket_triggers.map_or(defaults.ticket_triggers, |triggers| {
                triggers
                    .into_iter()
                    .map(|trigger| trigger.trim().to_lowercase())
                    .filter(|trigger| !trigger.is_empty())
                    .collect()
            }),
            ticket_suggestion: script
                .ticket_suggestion
                .unwrap_or(defaults.ticket_suggestion),
        })
    }

    /// Load a YAML script from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Opening message of a new conversation.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Canned reply for a customer message.
    pub fn reply(&self, text: &str) -> &str {
        self.matching_rule(text)
            .map_or(self.fallback.as_str(), |rule| rule.response.as_str())
    }

    /// The first rule whose keyword occurs in the message.
    pub fn matching_rule(&self, text: &str) -> Option<&Rule> {
        let text = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| text.contains(rule.keyword.as_str()))
    }

    /// Whether the message should also prompt the customer to open a ticket.
    pub fn suggests_ticket(&self, text: &str) -> bool {
        let text = text.to_lowercase();

        self.ticket_triggers
            .iter()
            .any(|trigger| text.contains(trigger.as_str()))
    }

    /// Message prompting the customer to open a ticket.
    pub fn ticket_suggestion(&self) -> &str {
        &self.ticket_suggestion
    }

    /// Reply used when no keyword matches.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Keyword rules in match order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn response_for(keyword: &str) -> &'static str {
        DEFAULT_RULES
            .iter()
            .find(|(k, _)| *k == keyword)
            .map_or("", |(_, response)| *response)
    }

    #[test]
    fn payment_question_gets_payment_reply() {
        let responder = Responder::default();

        assert_eq!(
            responder.reply("Which payment options do you take?"),
            response_for("payment")
        );
    }

    #[test]
    fn unmatched_text_gets_fallback() {
        let responder = Responder::default();

        assert_eq!(responder.reply("hello there"), FALLBACK);
        assert!(responder.matching_rule("hello there").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let responder = Responder::default();

        assert_eq!(responder.reply("DELIVERY time?"), response_for("delivery"));
    }

    #[test]
    fn table_order_beats_message_order() {
        let responder = Responder::default();

        // "payment" appears first in the text, but "order" comes first in the table.
        assert_eq!(
            responder.reply("payment failed for my order"),
            response_for("order")
        );
    }

    #[test]
    fn keywords_match_as_substrings() {
        let responder = Responder::default();

        assert_eq!(responder.reply("I reordered yesterday"), response_for("order"));
    }

    #[test]
    fn ticket_triggers_are_detected() {
        let responder = Responder::default();

        assert!(responder.suggests_ticket("I have an ISSUE with delivery"));
        assert!(responder.suggests_ticket("problem"));
        assert!(responder.suggests_ticket("please help"));
        assert!(!responder.suggests_ticket("where is my order"));
    }

    #[test]
    fn yaml_script_replaces_rules_and_keeps_defaults() -> TestResult {
        let yaml = r"
rules:
  - keyword: Refund
    response: Refunds take five days.
  - keyword: order
    response: Check the orders page.
";

        let responder = Responder::from_yaml(yaml)?;

        assert_eq!(responder.rules().len(), 2);
        assert_eq!(responder.reply("refund please"), "Refunds take five days.");
        assert_eq!(responder.reply("payment"), FALLBACK);
        assert_eq!(responder.greeting(), GREETING);
        assert!(responder.suggests_ticket("help"));

        Ok(())
    }

    #[test]
    fn yaml_script_can_override_triggers() -> TestResult {
        let yaml = r"
greeting: Hello!
rules:
  - keyword: order
    response: Orders.
ticket_triggers: [broken]
ticket_suggestion: Open a ticket?
";

        let responder = Responder::from_yaml(yaml)?;

        assert_eq!(responder.greeting(), "Hello!");
        assert!(responder.suggests_ticket("it's BROKEN"));
        assert!(!responder.suggests_ticket("help"));
        assert_eq!(responder.ticket_suggestion(), "Open a ticket?");

        Ok(())
    }

    #[test]
    fn yaml_script_without_rules_is_rejected() {
        let result = Responder::from_yaml("rules: []");

        assert!(matches!(result, Err(ScriptError::NoRules)));
    }

    #[test]
    fn yaml_script_with_blank_keyword_is_rejected() {
        let yaml = r#"
rules:
  - keyword: order
    response: Orders.
  - keyword: "  "
    response: Nothing.
"#;

        assert!(matches!(
            Responder::from_yaml(yaml),
            Err(ScriptError::EmptyKeyword(1))
        ));
    }
}
