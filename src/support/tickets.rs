//! Support Tickets

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ticket form validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum TicketError {
    /// The title is blank.
    #[error("please enter a title for your issue")]
    MissingTitle,

    /// The description is blank.
    #[error("please describe your issue")]
    MissingDescription,
}

/// Unrecognised category or priority name.
#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// What was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// What the issue is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// Anything else
    #[default]
    General,
    /// A placed order
    Order,
    /// Delivery of an order
    Delivery,
    /// Payments and refunds
    Payment,
    /// A catalog product
    Product,
    /// The customer's account
    Account,
}

impl IssueCategory {
    /// Every category, in form order.
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::General,
        IssueCategory::Order,
        IssueCategory::Delivery,
        IssueCategory::Payment,
        IssueCategory::Product,
        IssueCategory::Account,
    ];

    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::General => "general",
            IssueCategory::Order => "order",
            IssueCategory::Delivery => "delivery",
            IssueCategory::Payment => "payment",
            IssueCategory::Product => "product",
            IssueCategory::Account => "account",
        }
    }
}

/// How urgent the issue is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    /// Low
    Low,
    /// Medium
    #[default]
    Medium,
    /// High
    High,
    /// Urgent
    Urgent,
}

impl IssuePriority {
    /// Every priority, lowest first.
    pub const ALL: [IssuePriority; 4] = [
        IssuePriority::Low,
        IssuePriority::Medium,
        IssuePriority::High,
        IssuePriority::Urgent,
    ];

    /// Wire name of the priority.
    pub fn as_str(self) -> &'static str {
        match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
            IssuePriority::Urgent => "urgent",
        }
    }
}

macro_rules! wire_names {
    ($ty:ident, $kind:literal) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();

                $ty::ALL
                    .into_iter()
                    .find(|variant| variant.as_str() == wanted)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl $ty {
            /// Parse form input, where blank input keeps the default.
            ///
            /// # Errors
            ///
            /// Returns [`UnknownVariant`] for non-blank input that names no variant.
            pub fn parse_or_default(input: &str) -> Result<Self, UnknownVariant> {
                if input.trim().is_empty() {
                    Ok(Self::default())
                } else {
                    input.parse()
                }
            }
        }
    };
}

wire_names!(IssueCategory, "category");
wire_names!(IssuePriority, "priority");

/// Contents of the ticket form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketDraft {
    /// Short summary
    pub title: String,

    /// What happened
    pub description: String,

    /// Issue category
    pub category: IssueCategory,

    /// Issue priority
    pub priority: IssuePriority,
}

impl TicketDraft {
    /// Check that the title and description have been filled in.
    ///
    /// # Errors
    ///
    /// Returns a [`TicketError`] naming the first blank field.
    pub fn validate(&self) -> Result<(), TicketError> {
        if self.title.trim().is_empty() {
            return Err(TicketError::MissingTitle);
        }

        if self.description.trim().is_empty() {
            return Err(TicketError::MissingDescription);
        }

        Ok(())
    }
}
