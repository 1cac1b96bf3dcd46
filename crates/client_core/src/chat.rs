use reqwest::Client;
use shared::{
    domain::ViewName,
    protocol::{ChatActionKind, ChatRequest, ChatResponse},
};
use tracing::{debug, warn};

use crate::intent;

/// First transcript line of every conversation.
pub const CHAT_GREETING: &str =
    "Hi! Ask me anything about the projects or articles in this portfolio.";

/// Appended locally when the backend cannot be reached; the conversation
/// continues, nothing is retried.
pub const CHAT_FALLBACK: &str = "I can only answer questions about the projects \
     and articles on this portfolio. Try asking about a project.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
}

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// A round trip is already outstanding; the new send is rejected, not
    /// queued.
    Busy,
    /// The transcript gained a reply. `navigate_to` is present only when the
    /// backend attached a navigation action whose payload survived
    /// normalization; raw payloads never leave this type.
    Replied { navigate_to: Option<ViewName> },
}

/// One conversation with the chat backend: local transcript, a single
/// outstanding request at a time, and the intent-normalization boundary in
/// front of navigation.
pub struct ChatSession {
    http: Client,
    server_url: String,
    transcript: Vec<ChatMessage>,
    in_flight: bool,
}

impl ChatSession {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
            transcript: vec![ChatMessage {
                sender: ChatSender::Bot,
                text: CHAT_GREETING.to_string(),
            }],
            in_flight: false,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.in_flight {
            debug!("chat request already outstanding, rejecting send");
            return SendOutcome::Busy;
        }

        self.in_flight = true;
        self.transcript.push(ChatMessage {
            sender: ChatSender::User,
            text: trimmed.to_string(),
        });
        let result = self.round_trip(trimmed).await;
        self.in_flight = false;

        match result {
            Ok(reply) => {
                self.transcript.push(ChatMessage {
                    sender: ChatSender::Bot,
                    text: reply.response.clone(),
                });
                let navigate_to = reply
                    .action
                    .as_ref()
                    .filter(|action| action.kind == ChatActionKind::Navigate)
                    .and_then(|action| intent::normalize(&action.payload));
                SendOutcome::Replied { navigate_to }
            }
            Err(error) => {
                warn!(%error, "chat round trip failed, using canned fallback");
                self.transcript.push(ChatMessage {
                    sender: ChatSender::Bot,
                    text: CHAT_FALLBACK.to_string(),
                });
                SendOutcome::Replied { navigate_to: None }
            }
        }
    }

    async fn round_trip(&self, message: &str) -> Result<ChatResponse, reqwest::Error> {
        self.http
            .post(format!("{}/api/chat", self.server_url))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
