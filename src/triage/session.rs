//! Chat sessions
//!
//! Ephemeral transcripts for the triage chat. Sessions live in memory only
//! and the oldest one is evicted once `max_sessions` is reached. Each
//! transcript keeps its greeting plus the most recent turns.

use super::responder::{greeting, respond, TriageReply};
use crate::surveillance::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default transcript length, greeting included
pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// Greeting plus one user/assistant turn
const MIN_MESSAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One transcript, opened with the assistant greeting
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(reporting_year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: greeting(reporting_year),
            }],
        }
    }

    /// Append the user's message and the triage reply
    pub fn exchange(&mut self, message: &str, dataset: &Dataset) -> TriageReply {
        let reply = respond(message, dataset);
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
        });
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.message.clone(),
        });
        reply
    }

    /// Drop the oldest turns until at most `max_messages` remain.
    /// The greeting is kept and turns are removed as whole pairs.
    pub fn truncate(&mut self, max_messages: usize) {
        let max_messages = max_messages.max(MIN_MESSAGES);
        if self.messages.len() <= max_messages {
            return;
        }

        let excess = self.messages.len() - max_messages;
        let drop = (excess + 1) / 2 * 2;
        self.messages.drain(1..1 + drop);
    }
}

/// In-memory store of chat sessions keyed by id
#[derive(Debug)]
pub struct SessionStore {
    inner: RwLock<Sessions>,
    max_sessions: usize,
    max_messages: usize,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<Uuid, ChatSession>,
    /// Session ids, oldest first
    order: VecDeque<Uuid>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: RwLock::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }

    /// Cap each transcript at `max_messages`, greeting included
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(MIN_MESSAGES);
        self
    }

    /// Send a message, continuing `session_id` or starting a new session
    /// when it is absent or unknown. Returns the updated transcript.
    pub async fn send(
        &self,
        session_id: Option<Uuid>,
        message: &str,
        dataset: &Dataset,
    ) -> (ChatSession, TriageReply) {
        let mut inner = self.inner.write().await;

        let id = match session_id {
            Some(id) if inner.by_id.contains_key(&id) => id,
            _ => {
                while inner.by_id.len() >= self.max_sessions {
                    let Some(oldest) = inner.order.pop_front() else {
                        break;
                    };
                    inner.by_id.remove(&oldest);
                    tracing::debug!(session_id = %oldest, "Evicted oldest chat session");
                }

                let session = ChatSession::new(dataset.reporting_year);
                let id = session.id;
                inner.order.push_back(id);
                inner.by_id.insert(id, session);
                tracing::debug!(session_id = %id, "Chat session started");
                id
            }
        };

        let session = inner
            .by_id
            .entry(id)
            .or_insert_with(|| ChatSession::new(dataset.reporting_year));
        let reply = session.exchange(message, dataset);
        session.truncate(self.max_messages);

        (session.clone(), reply)
    }

    pub async fn get(&self, id: Uuid) -> Option<ChatSession> {
        self.inner.read().await.by_id.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        inner.order.retain(|s| *s != id);
        inner.by_id.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}
