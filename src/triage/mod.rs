//! Symptom Triage
//!
//! Keyword-matched triage chat: free text is scored against a static symptom
//! dictionary, and a match is answered with a likely disease (preferring one
//! present in the latest surveillance month) and a clinical department.
//!
//! There is no language model here. Scoring is plain substring counting.

pub mod dictionary;
pub mod responder;
pub mod session;

pub use dictionary::{SymptomCategory, SYMPTOM_CATEGORIES};
pub use responder::{classify, greeting, respond, TriageMatch, TriageReply, UNCLEAR_REPLY};
pub use session::{ChatMessage, ChatRole, ChatSession, SessionStore, DEFAULT_MAX_MESSAGES};
