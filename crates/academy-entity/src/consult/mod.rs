//! Peer-to-peer consult messages.

pub mod model;

pub use model::{ConsultMessage, ConversationSummary, RECALL_WINDOW_SECONDS};
