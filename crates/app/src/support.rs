//! Support Chat
//!
//! The chat widget answers locally from the scripted responder. Replies are
//! delayed to feel conversational; the delays run on spawned timer tasks that
//! append to the shared conversation when they fire.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use smallvec::SmallVec;
use storefront::support::{
    ChatMessage, ChatView, Conversation, Responder, TicketDraft, TicketError,
};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

use crate::{
    domain::issues::{IssuesService, IssuesServiceError, models::NewIssue, records::IssueRecord},
    session::{AuthenticationRequired, Session},
};

const TICKET_CREATED: &str = "Your support ticket has been created. Our team will get back to you soon.";

/// Errors that can occur when submitting a support ticket.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Nobody is signed in.
    #[error(transparent)]
    AuthenticationRequired(#[from] AuthenticationRequired),

    /// The ticket form is incomplete.
    #[error(transparent)]
    Validation(#[from] TicketError),

    /// The ticket could not be stored.
    #[error("failed to create support ticket")]
    Submit(#[source] IssuesServiceError),
}

/// How long the assistant waits before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatDelays {
    /// Delay before the canned reply
    pub reply: Duration,

    /// Delay before suggesting a ticket
    pub suggestion: Duration,
}

impl Default for ChatDelays {
    fn default() -> Self {
        Self {
            reply: Duration::from_secs(1),
            suggestion: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
struct ChatState {
    conversation: Conversation,
    view: ChatView,
    draft: TicketDraft,
}

/// Bot messages still waiting on their timers.
#[derive(Debug)]
pub struct PendingReplies {
    handles: SmallVec<[JoinHandle<()>; 2]>,
}

impl PendingReplies {
    /// Number of scheduled bot messages.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no bot message was scheduled.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait until every scheduled bot message has been appended.
    ///
    /// # Errors
    ///
    /// Returns a [`JoinError`] if a timer task panicked or was cancelled.
    pub async fn settle(self) -> Result<(), JoinError> {
        for handle in self.handles {
            handle.await?;
        }

        Ok(())
    }
}

/// The support chat widget.
#[derive(Clone)]
pub struct SupportChat {
    state: Arc<Mutex<ChatState>>,
    responder: Arc<Responder>,
    issues: Arc<dyn IssuesService>,
    delays: ChatDelays,
}

impl std::fmt::Debug for SupportChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupportChat")
            .field("state", &self.state)
            .field("delays", &self.delays)
            .finish_non_exhaustive()
    }
}

impl SupportChat {
    /// Open a chat greeted by the responder.
    pub fn new(responder: Responder, issues: Arc<dyn IssuesService>, delays: ChatDelays) -> Self {
        let state = ChatState {
            conversation: Conversation::with_greeting(responder.greeting()),
            view: ChatView::default(),
            draft: TicketDraft::default(),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            responder: Arc::new(responder),
            issues,
            delays,
        }
    }

    /// Send a customer message.
    ///
    /// Blank input is ignored. Otherwise the message is appended immediately,
    /// the canned reply after the reply delay and, when the message sounds like
    /// a problem, a ticket suggestion after the suggestion delay.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn send(&self, text: &str) -> PendingReplies {
        let text = text.trim();
        let mut handles = SmallVec::new();

        if text.is_empty() {
            return PendingReplies { handles };
        }

        self.lock().conversation.push_user(text);

        handles.push(self.schedule(self.delays.reply, self.responder.reply(text).to_string()));

        if self.responder.suggests_ticket(text) {
            handles.push(self.schedule(
                self.delays.suggestion,
                self.responder.ticket_suggestion().to_string(),
            ));
        }

        PendingReplies { handles }
    }

    /// Conversation so far.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().conversation.messages().to_vec()
    }

    /// Panel currently showing.
    pub fn view(&self) -> ChatView {
        self.lock().view
    }

    /// Switch to the ticket form.
    pub fn open_ticket_form(&self) {
        self.lock().view = ChatView::TicketForm;
    }

    /// Switch back to the conversation.
    pub fn close_ticket_form(&self) {
        self.lock().view = ChatView::Conversation;
    }

    /// Ticket form contents.
    pub fn draft(&self) -> TicketDraft {
        self.lock().draft.clone()
    }

    /// Replace the ticket form contents.
    pub fn set_draft(&self, draft: TicketDraft) {
        self.lock().draft = draft;
    }

    /// Submit the ticket form.
    ///
    /// On success a confirmation is added to the conversation, the form is
    /// reset and the conversation is shown again. On failure the form keeps
    /// its contents.
    ///
    /// # Errors
    ///
    /// - [`SupportError::AuthenticationRequired`]: nobody is signed in.
    /// - [`SupportError::Validation`]: the title or description is blank; nothing is written.
    /// - [`SupportError::Submit`]: the ticket could not be stored.
    pub async fn submit_ticket(&self, session: &Session) -> Result<IssueRecord, SupportError> {
        let user = session.require_user()?;
        let draft = self.draft();

        draft.validate()?;

        let issue = self
            .issues
            .create_issue(NewIssue::from_draft(user.clone(), &draft))
            .await
            .map_err(|source| {
                error!("failed to create support ticket: {source}");
                SupportError::Submit(source)
            })?;

        info!(issue_id = %issue.id, category = %issue.category, "support ticket created");

        let mut state = self.lock();

        state.conversation.push_bot(TICKET_CREATED);
        state.draft = TicketDraft::default();
        state.view = ChatView::Conversation;

        Ok(issue)
    }

    fn schedule(&self, delay: Duration, reply: String) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .conversation
                .push_bot(reply);
        })
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use storefront::support::{Author, IssueCategory, IssuePriority};
    use testresult::TestResult;

    use crate::{
        backend::BackendError,
        domain::issues::{
            MockIssuesService,
            records::{IssueId, IssueStatus},
        },
        session::UserId,
    };

    use super::*;

    fn chat(issues: MockIssuesService) -> SupportChat {
        SupportChat::new(Responder::default(), Arc::new(issues), ChatDelays::default())
    }

    fn idle_chat() -> SupportChat {
        let mut issues = MockIssuesService::new();
        issues.expect_create_issue().never();
        chat(issues)
    }

    fn texts(chat: &SupportChat) -> Vec<(Author, String)> {
        chat.messages()
            .into_iter()
            .map(|message| (message.author, message.text))
            .collect()
    }

    fn draft() -> TicketDraft {
        TicketDraft {
            title: "Damaged item".to_string(),
            description: "The eggs arrived broken.".to_string(),
            category: IssueCategory::Product,
            priority: IssuePriority::High,
        }
    }

    fn stored(issue: NewIssue) -> IssueRecord {
        IssueRecord {
            id: IssueId::new("i-1"),
            user_id: issue.user_id,
            title: issue.title,
            description: issue.description,
            category: issue.category,
            priority: issue.priority,
            status: issue.status,
            created_at: Some(Timestamp::UNIX_EPOCH),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_delay() -> TestResult {
        let chat = idle_chat();
        let responder = Responder::default();

        let pending = chat.send("Which payment methods do you accept?");

        assert_eq!(pending.len(), 1);
        assert_eq!(chat.messages().len(), 2);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(chat.messages().len(), 2);

        pending.settle().await?;

        assert_eq!(
            texts(&chat).last(),
            Some(&(
                Author::Bot,
                responder.reply("payment").to_string()
            ))
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn problem_messages_also_suggest_a_ticket() -> TestResult {
        let chat = idle_chat();
        let responder = Responder::default();

        let pending = chat.send("I have a problem with my delivery");

        assert_eq!(pending.len(), 2);

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(
            texts(&chat).last().map(|(_, text)| text.as_str()),
            Some(responder.reply("delivery"))
        );

        pending.settle().await?;

        assert_eq!(
            texts(&chat).last().map(|(_, text)| text.as_str()),
            Some(responder.ticket_suggestion())
        );
        assert_eq!(chat.messages().len(), 4);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn unmatched_message_gets_fallback() -> TestResult {
        let chat = idle_chat();

        chat.send("hello").settle().await?;

        assert_eq!(
            texts(&chat).last().map(|(_, text)| text.clone()),
            Some(Responder::default().fallback().to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let chat = idle_chat();

        let pending = chat.send("   ");

        assert!(pending.is_empty());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn ticket_form_toggles() {
        let chat = idle_chat();

        assert_eq!(chat.view(), ChatView::Conversation);

        chat.open_ticket_form();
        assert_eq!(chat.view(), ChatView::TicketForm);

        chat.close_ticket_form();
        assert_eq!(chat.view(), ChatView::Conversation);
    }

    #[tokio::test]
    async fn empty_description_is_not_submitted() {
        let chat = idle_chat();

        chat.open_ticket_form();
        chat.set_draft(TicketDraft {
            description: String::new(),
            ..draft()
        });

        let result = chat
            .submit_ticket(&Session::authenticated(UserId::new("u-1")))
            .await;

        assert!(matches!(
            result,
            Err(SupportError::Validation(TicketError::MissingDescription))
        ));
        assert_eq!(chat.view(), ChatView::TicketForm);
    }

    #[tokio::test]
    async fn anonymous_ticket_requires_sign_in() {
        let chat = idle_chat();

        chat.set_draft(draft());

        let result = chat.submit_ticket(&Session::anonymous()).await;

        assert!(matches!(result, Err(SupportError::AuthenticationRequired(_))));
        assert_eq!(chat.draft(), draft());
    }

    #[tokio::test]
    async fn submitted_ticket_resets_form() -> TestResult {
        let mut issues = MockIssuesService::new();

        issues
            .expect_create_issue()
            .once()
            .withf(|issue| {
                issue.user_id.as_str() == "u-1"
                    && issue.title == "Damaged item"
                    && issue.category == IssueCategory::Product
                    && issue.priority == IssuePriority::High
                    && issue.status == IssueStatus::Open
            })
            .return_once(|issue| Ok(stored(issue)));

        let chat = chat(issues);

        chat.open_ticket_form();
        chat.set_draft(draft());

        let issue = chat
            .submit_ticket(&Session::authenticated(UserId::new("u-1")))
            .await?;

        assert_eq!(issue.id, IssueId::new("i-1"));
        assert_eq!(chat.view(), ChatView::Conversation);
        assert_eq!(chat.draft(), TicketDraft::default());
        assert_eq!(
            texts(&chat).last(),
            Some(&(Author::Bot, TICKET_CREATED.to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft() {
        let mut issues = MockIssuesService::new();

        issues.expect_create_issue().once().return_once(|_| {
            Err(IssuesServiceError::Backend(BackendError::UnexpectedResponse(
                "bad gateway".to_string(),
            )))
        });

        let chat = chat(issues);

        chat.open_ticket_form();
        chat.set_draft(draft());

        let result = chat
            .submit_ticket(&Session::authenticated(UserId::new("u-1")))
            .await;

        assert!(matches!(result, Err(SupportError::Submit(_))));
        assert_eq!(chat.draft(), draft());
        assert_eq!(chat.view(), ChatView::TicketForm);
        assert_eq!(chat.messages().len(), 1);
    }
}
