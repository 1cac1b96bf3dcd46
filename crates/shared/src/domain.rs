use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A view name as carried in navigation state. The canonical variants are the
/// only ones the resolver mounts; `Other` carries an unrecognized name
/// verbatim so the store can stay total and defer fallback to resolve time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewName {
    Home,
    Projects,
    Blog,
    BlogDetail,
    Chat,
    Other(String),
}

impl ViewName {
    pub fn as_str(&self) -> &str {
        match self {
            ViewName::Home => "home",
            ViewName::Projects => "projects",
            ViewName::Blog => "blog",
            ViewName::BlogDetail => "blog-detail",
            ViewName::Chat => "chat",
            ViewName::Other(name) => name.as_str(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, ViewName::Other(_))
    }
}

impl From<&str> for ViewName {
    fn from(name: &str) -> Self {
        match name {
            "home" => ViewName::Home,
            "projects" => ViewName::Projects,
            "blog" => ViewName::Blog,
            "blog-detail" => ViewName::BlogDetail,
            "chat" => ViewName::Chat,
            other => ViewName::Other(other.to_string()),
        }
    }
}

impl From<String> for ViewName {
    fn from(name: String) -> Self {
        ViewName::from(name.as_str())
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ViewName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViewName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name.is_empty() {
            return Err(de::Error::custom("view name cannot be empty"));
        }
        Ok(ViewName::from(name))
    }
}

/// The complete current navigation state: which view is on screen plus the
/// payload that view needs. Invariant: `slug` is `Some` iff the view is
/// `BlogDetail`; the store enforces this on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub view: ViewName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Route {
    /// The route every session starts on.
    pub fn initial() -> Self {
        Self {
            view: ViewName::Home,
            slug: None,
        }
    }

    pub fn blog_detail(slug: impl Into<String>) -> Self {
        Self {
            view: ViewName::BlogDetail,
            slug: Some(slug.into()),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_name_round_trips_canonical_names() {
        for name in ["home", "projects", "blog", "blog-detail", "chat"] {
            let view = ViewName::from(name);
            assert!(view.is_canonical());
            assert_eq!(view.as_str(), name);
        }
    }

    #[test]
    fn unrecognized_view_names_are_carried_verbatim() {
        let view = ViewName::from("settings");
        assert_eq!(view, ViewName::Other("settings".to_string()));
        assert!(!view.is_canonical());
        assert_eq!(view.to_string(), "settings");
    }

    #[test]
    fn initial_route_is_home_without_slug() {
        let route = Route::initial();
        assert_eq!(route.view, ViewName::Home);
        assert_eq!(route.slug, None);
    }
}
