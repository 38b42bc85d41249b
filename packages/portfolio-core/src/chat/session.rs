//! Conversational session manager.
//!
//! Owns the message log, the open/closed flag, the unread counter and the
//! single outbound reply request. Every change to the log or the open flag is
//! written through to storage before the call returns.
//!
//! Requests are single-flight: each `send` bumps a generation counter and
//! cancels the previous call's token. A call only touches state after its
//! request if its generation is still the current one.

use super::client::{ReplyOutcome, ReplyTransport};
use super::pacing::{pause, Pacing};
use super::types::{ChatMessage, ChatRole, QuickTopic, SessionEvent, SessionState};
use crate::locale::SharedLocale;
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Storage key for the JSON message log.
pub const MESSAGES_KEY: &str = "portfolio.chat.messages";
/// Storage key for the open flag (`"1"` or `"0"`).
pub const OPEN_KEY: &str = "portfolio.chat.open";

const EVENT_CAPACITY: usize = 64;

const DEFAULT_GREETING: &str = "Hi, I'm Khalid. How can I help?";
const DEFAULT_ERROR: &str = "Oops! Something went wrong. Please try again later.";
const DEFAULT_FALLBACK: &str = "Thanks! I'll get back to you shortly.";

/// Handle to the chat session. Clones share the same state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    shared: Mutex<Shared>,
    storage: Arc<dyn KeyValueStore>,
    transport: Arc<dyn ReplyTransport>,
    locale: SharedLocale,
    pacing: Pacing,
    events: broadcast::Sender<SessionEvent>,
}

struct Shared {
    session: SessionState,
    /// Generation of the authoritative request
    generation: u64,
    inflight: Option<CancellationToken>,
}

impl SessionManager {
    /// Restore the session from storage, seeding a greeting when the stored
    /// log is missing, empty or unreadable.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        transport: Arc<dyn ReplyTransport>,
        locale: SharedLocale,
        pacing: Pacing,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let inner = Inner {
            shared: Mutex::new(Shared {
                session: SessionState::default(),
                generation: 0,
                inflight: None,
            }),
            storage,
            transport,
            locale,
            pacing,
            events,
        };

        let messages = inner.restore_messages().unwrap_or_else(|| {
            vec![ChatMessage::new(
                ChatRole::Bot,
                inner.translate("chat.greeting", DEFAULT_GREETING),
                None,
            )]
        });
        let is_open = inner.storage.get(OPEN_KEY).as_deref() == Some("1");

        {
            let mut shared = inner.lock();
            shared.session.messages = messages;
            shared.session.is_open = is_open;
            inner.persist_messages(&shared.session);
            inner.persist_open(is_open);
            tracing::debug!(
                "Chat session restored with {} messages (open={})",
                shared.session.messages.len(),
                is_open
            );
        }

        Self {
            inner: Arc::new(inner),
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().session.clone()
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().session.is_open
    }

    pub fn typing(&self) -> bool {
        self.inner.lock().session.typing
    }

    pub fn unread(&self) -> u32 {
        self.inner.lock().session.unread
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().session.messages.clone()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn open_chat(&self) {
        self.set_open(|_| true);
    }

    pub fn close_chat(&self) {
        self.set_open(|_| false);
    }

    pub fn toggle_chat(&self) {
        self.set_open(|open| !open);
    }

    fn set_open(&self, next: impl FnOnce(bool) -> bool) {
        let mut shared = self.inner.lock();
        let was_open = shared.session.is_open;
        let open = next(was_open);

        shared.session.is_open = open;
        if open && !was_open {
            shared.session.unread = 0;
        }
        self.inner.persist_open(open);

        if open != was_open {
            tracing::debug!("Chat {}", if open { "opened" } else { "closed" });
            let _ = self.inner.events.send(SessionEvent::VisibilityChanged(open));
        }
    }

    // ========================================================================
    // Messaging
    // ========================================================================

    /// Send a user message and append the reply once it arrives.
    ///
    /// Whitespace-only input is ignored. A newer call supersedes this one;
    /// a superseded call returns without touching state again. Failures end
    /// up as bot messages, never as errors.
    pub async fn send(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let (generation, token) = {
            let mut shared = self.inner.lock();
            self.inner
                .append(&mut shared, ChatRole::User, trimmed.to_string());

            if let Some(previous) = shared.inflight.take() {
                previous.cancel();
                tracing::debug!("Superseded reply request {}", shared.generation);
            }
            shared.generation += 1;
            let token = CancellationToken::new();
            shared.inflight = Some(token.clone());
            self.inner.set_typing(&mut shared, true);

            (shared.generation, token)
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            outcome = self.inner.request_reply(trimmed) => Some(outcome),
        };
        let Some(outcome) = outcome else {
            return;
        };

        let reply = self.inner.outcome_text(outcome);

        let mut shared = self.inner.lock();
        if shared.generation != generation {
            tracing::debug!("Dropping stale reply for request {}", generation);
            return;
        }
        self.inner.append(&mut shared, ChatRole::Bot, reply);
        shared.inflight = None;
        self.inner.set_typing(&mut shared, false);
    }

    /// Send the canned prompt for `topic` in the active language.
    pub async fn quick_ask(&self, topic: QuickTopic) {
        let prompt = self
            .inner
            .locale
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .t(topic.prompt_key(), None);
        self.send(&prompt).await;
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn translate(&self, key: &str, fallback: &str) -> String {
        self.locale
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .t(key, Some(fallback))
    }

    fn restore_messages(&self) -> Option<Vec<ChatMessage>> {
        let raw = self.storage.get(MESSAGES_KEY)?;
        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) if !messages.is_empty() => Some(messages),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Discarding unreadable chat history: {}", e);
                None
            }
        }
    }

    fn append(&self, shared: &mut Shared, role: ChatRole, text: String) {
        let last = shared.session.messages.last().map(|m| m.timestamp);
        let message = ChatMessage::new(role, text, last);

        shared.session.messages.push(message.clone());
        if !shared.session.is_open && role.counts_as_unread() {
            shared.session.unread += 1;
        }
        self.persist_messages(&shared.session);

        let _ = self.events.send(SessionEvent::MessageAppended(message));
    }

    fn set_typing(&self, shared: &mut Shared, typing: bool) {
        if shared.session.typing != typing {
            shared.session.typing = typing;
            let _ = self.events.send(SessionEvent::TypingChanged(typing));
        }
    }

    async fn request_reply(&self, message: &str) -> ReplyOutcome {
        pause(self.pacing.request_delay()).await;

        let response = self.transport.post_message(message).await;
        if let Err(e) = &response {
            tracing::warn!("Reply request failed: {}", e);
        }

        let outcome = ReplyOutcome::from_response(&response);
        if matches!(outcome, ReplyOutcome::Reply(_) | ReplyOutcome::Fallback) {
            pause(self.pacing.reply_delay()).await;
        }
        outcome
    }

    fn outcome_text(&self, outcome: ReplyOutcome) -> String {
        match outcome {
            ReplyOutcome::Reply(text) | ReplyOutcome::ServerError(text) => text,
            ReplyOutcome::Fallback => self.translate("chat.fallback", DEFAULT_FALLBACK),
            ReplyOutcome::Failed => self.translate("chat.error", DEFAULT_ERROR),
        }
    }

    fn persist_messages(&self, session: &SessionState) {
        let result = serde_json::to_string(&session.messages)
            .map_err(crate::Error::from)
            .and_then(|raw| self.storage.set(MESSAGES_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!("Failed to persist chat history: {}", e);
        }
    }

    fn persist_open(&self, open: bool) {
        if let Err(e) = self.storage.set(OPEN_KEY, if open { "1" } else { "0" }) {
            tracing::warn!("Failed to persist chat visibility: {}", e);
        }
    }
}
