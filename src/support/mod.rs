//! Support
//!
//! Pieces of the customer-support chat widget that need no I/O: the scripted
//! responder, the message history and the ticket form.

pub mod conversation;
pub mod responder;
pub mod tickets;

pub use conversation::{Author, ChatMessage, ChatView, Conversation};
pub use responder::{Responder, Rule, ScriptError};
pub use tickets::{IssueCategory, IssuePriority, TicketDraft, TicketError, UnknownVariant};
