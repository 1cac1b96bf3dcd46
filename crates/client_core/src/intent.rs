use shared::domain::ViewName;
use tracing::debug;

/// Fixed synonym table for chat navigation intents. Matching is
/// case-insensitive and whitespace-trimmed; anything outside the table is
/// rejected. The table deliberately has no blog-detail entry: the backend can
/// steer between sections, never into a specific article.
const SYNONYM_TABLE: &[(&str, ViewName)] = &[
    ("projects", ViewName::Projects),
    ("project", ViewName::Projects),
    ("projects page", ViewName::Projects),
    ("project page", ViewName::Projects),
    ("blog", ViewName::Blog),
    ("blogs", ViewName::Blog),
    ("blog page", ViewName::Blog),
    ("blogs page", ViewName::Blog),
    ("home", ViewName::Home),
    ("home page", ViewName::Home),
    ("homepage", ViewName::Home),
    ("chat", ViewName::Chat),
    ("chat page", ViewName::Chat),
];

/// Maps an untrusted chat payload to a canonical view name, or rejects it.
/// This is the only door between backend-authored text and the navigation
/// store; a `None` here must never be forwarded.
pub fn normalize(payload: &str) -> Option<ViewName> {
    let needle = payload.trim().to_ascii_lowercase();
    let matched = SYNONYM_TABLE
        .iter()
        .find(|(synonym, _)| *synonym == needle)
        .map(|(_, view)| view.clone());
    if matched.is_none() {
        debug!(payload, "dropping unrecognized navigation intent");
    }
    matched
}
