//! Chat surface: message types, the reply transport and the session manager.

mod client;
mod pacing;
mod session;
mod types;

pub use client::{HttpReplyClient, RawReply, ReplyOutcome, ReplyTransport};
pub use pacing::Pacing;
pub use session::{SessionManager, MESSAGES_KEY, OPEN_KEY};
pub use types::{ChatMessage, ChatRole, QuickTopic, SessionEvent, SessionState};
