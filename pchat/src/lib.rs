//! Chat sessions for the PumaPromos assistant sidebar.
//!
//! `ChatResponder` adapts a provider's event stream into displayable
//! fragments, `ChatService` owns a session transcript and allows one reply
//! at a time, and `ChatSession` drives the `Conversation` reducer that the
//! sidebar renders.

mod conversation;
mod error;
mod message;
mod responder;
mod service;
mod session;

pub mod prelude {
    pub use crate::{
        CHAT_APOLOGY, ChatError, ChatErrorKind, ChatMessage, ChatResponder, ChatRole,
        ChatService, ChatSession, Conversation, ConversationSnapshot, ReplyFragment, ReplyStream,
        SendOutcome, TurnOutcome, TurnPhase,
    };
    pub use pcommon::SessionId;
}

pub use conversation::{Conversation, TurnOutcome, TurnPhase};
pub use error::{ChatError, ChatErrorKind};
pub use message::{CHAT_APOLOGY, CONNECTION_APOLOGY, ChatMessage, ChatRole, GREETING};
pub use pcommon::SessionId;
pub use responder::{ChatResponder, ReplyFragment, ReplyStream};
pub use service::ChatService;
pub use session::{ChatSession, ConversationSnapshot, SendOutcome};
