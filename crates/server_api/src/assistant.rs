use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::{ChatAction, ChatResponse};
use storage::Storage;
use tracing::debug;

/// Canned refusal for requests the guardrail filters out.
pub const OFF_TOPIC_REPLY: &str = "I can only answer questions about this portfolio. \
     Please ask me about projects, skills, or blog posts.";

/// Canned reply when retrieval finds nothing relevant.
pub const NO_MATCH_REPLY: &str = "I don't have that information in the portfolio yet. \
     Try asking about a specific project or blog post.";

/// Answering strategy behind `/api/chat`. Implementations read the content
/// store and may attach a navigation action to their reply.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    async fn reply(&self, storage: &Storage, message: &str) -> Result<ChatResponse>;
}

/// Filters out coding requests, general-knowledge trivia and prompt-meddling
/// before the message reaches the assistant.
pub fn is_request_off_topic(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();

    const FORBIDDEN_KEYWORDS: &[&str] = &[
        "write code",
        "fastapi",
        "python code",
        "javascript",
        "react",
        "what is the capital of",
        "who is the president of",
        "ignore your instructions",
        "you are now",
        "act as",
    ];
    if FORBIDDEN_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
    {
        return true;
    }

    // Code-shaped input is off topic no matter how it is phrased.
    lower.contains("def ") || lower.contains("import ") || message.contains("=> {")
}

/// Deterministic keyword assistant: ranks stored content fragments by term
/// overlap with the message and infers a navigation payload from section
/// phrasing. Stands in for the hosted agent without any model dependency.
pub struct RetrievalAssistant {
    top_k: usize,
}

impl RetrievalAssistant {
    pub fn new() -> Self {
        Self { top_k: 3 }
    }
}

impl Default for RetrievalAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatAssistant for RetrievalAssistant {
    async fn reply(&self, storage: &Storage, message: &str) -> Result<ChatResponse> {
        if let Some(payload) = infer_navigation_payload(message) {
            debug!(payload, "navigation intent inferred from chat message");
            return Ok(ChatResponse {
                response: format!("Sure - taking you to the {payload} page."),
                action: Some(ChatAction::navigate(payload)),
            });
        }

        let fragments = gather_fragments(storage).await?;
        let query = tokenize(message);
        let mut scored: Vec<(usize, &Fragment)> = fragments
            .iter()
            .map(|fragment| (fragment.score(&query), fragment))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.title.cmp(&b.1.title)));

        if scored.is_empty() {
            return Ok(ChatResponse {
                response: NO_MATCH_REPLY.to_string(),
                action: None,
            });
        }

        let mut lines = vec!["Here's what I found in the portfolio:".to_string()];
        for (_, fragment) in scored.iter().take(self.top_k) {
            lines.push(format!("- {}: {}", fragment.title, fragment.snippet()));
        }
        Ok(ChatResponse {
            response: lines.join("\n"),
            action: None,
        })
    }
}

/// Mirrors the section phrasing the hosted agent recognized. Payloads are
/// deliberately loose text; clients normalize them before navigating.
fn infer_navigation_payload(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    if lower.contains("projects page")
        || lower.contains("projects section")
        || lower.contains("view all the projects")
    {
        Some("projects")
    } else if lower.contains("blog page")
        || lower.contains("blogs page")
        || lower.contains("blogs section")
    {
        Some("blogs")
    } else if lower.contains("home page") || lower.contains("homepage") {
        Some("home")
    } else {
        None
    }
}

struct Fragment {
    title: String,
    text: String,
    terms: HashSet<String>,
}

impl Fragment {
    fn new(title: String, text: String) -> Self {
        let terms = tokenize(&format!("{title} {text}"));
        Self { title, text, terms }
    }

    fn score(&self, query: &HashSet<String>) -> usize {
        query.intersection(&self.terms).count()
    }

    fn snippet(&self) -> String {
        let flattened = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flattened.chars().count() <= 160 {
            flattened
        } else {
            let cut: String = flattened.chars().take(160).collect();
            format!("{}...", cut.trim_end())
        }
    }
}

async fn gather_fragments(storage: &Storage) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();

    for document in storage.list_documents().await? {
        fragments.push(Fragment::new(
            document.title.clone(),
            format!("{} {}", document.content, document.tags.join(" ")),
        ));
    }
    for project in storage.list_projects().await? {
        let details = project
            .long_summary
            .clone()
            .unwrap_or_else(|| project.short_summary.clone());
        fragments.push(Fragment::new(
            project.name.clone(),
            format!(
                "{} {} {}",
                project.short_summary,
                details,
                project.tags.join(" ")
            ),
        ));
    }
    for blog in storage.list_blogs().await? {
        let detail = storage.blog_by_slug(&blog.slug).await?;
        let content = detail.map(|d| d.content).unwrap_or_default();
        fragments.push(Fragment::new(
            blog.title.clone(),
            format!("{} {} {}", blog.excerpt, content, blog.tags.join(" ")),
        ));
    }

    Ok(fragments)
}

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "about", "what", "which", "that", "this", "your", "you", "are",
    "was", "were", "have", "has", "can", "does", "did", "how", "tell", "show", "please",
];

fn tokenize(text: &str) -> HashSet<String> {
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|term| term.len() > 2 && !STOPWORDS.contains(term))
        .map(str::to_string)
        .collect()
}
