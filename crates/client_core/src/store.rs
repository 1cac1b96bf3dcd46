use shared::domain::{Route, ViewName};
use tokio::sync::watch;
use tracing::debug;

/// Marker prefix for the `blog:<slug>` shorthand accepted by `navigate`.
pub const BLOG_SLUG_PREFIX: &str = "blog:";

/// Argument to [`NavigationStore::navigate`]. The historical string form is
/// parsed into an explicit variant exactly once, at the string boundary;
/// nothing downstream re-sniffs prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Shorthand view name; unknown names are accepted and resolved to the
    /// home fallback at render time.
    ByName(ViewName),
    /// Jump straight to a blog article.
    ToBlog(String),
    /// Explicit object form. An omitted view keeps the previous one; an
    /// omitted slug always clears.
    Partial {
        view: Option<ViewName>,
        slug: Option<String>,
    },
}

impl From<&str> for NavigationRequest {
    fn from(target: &str) -> Self {
        match target.strip_prefix(BLOG_SLUG_PREFIX) {
            Some(slug) => NavigationRequest::ToBlog(slug.to_string()),
            None => NavigationRequest::ByName(ViewName::from(target)),
        }
    }
}

impl From<ViewName> for NavigationRequest {
    fn from(view: ViewName) -> Self {
        NavigationRequest::ByName(view)
    }
}

/// Owner of the single current [`Route`]. `navigate` is the only mutation
/// entry point; observers subscribe through a watch channel and re-resolve
/// on every change. Mutation is synchronous and infallible.
pub struct NavigationStore {
    route: watch::Sender<Route>,
}

impl NavigationStore {
    pub fn new() -> Self {
        let (route, _) = watch::channel(Route::initial());
        Self { route }
    }

    pub fn current(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Hands out a read-only view of the route for render-layer observers.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }

    pub fn navigate(&mut self, request: impl Into<NavigationRequest>) {
        let next = apply(&self.route.borrow(), request.into());
        debug!(view = %next.view, slug = ?next.slug, "route changed");
        self.route.send_replace(next);
    }

    /// The designated back transition: leaving an article returns to the
    /// blog index. Anywhere else there is nothing to go back to.
    pub fn back(&mut self) {
        let on_article = self.route.borrow().view == ViewName::BlogDetail;
        if on_article {
            self.navigate(ViewName::Blog);
        }
    }
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(prev: &Route, request: NavigationRequest) -> Route {
    let mut next = match request {
        NavigationRequest::ToBlog(slug) => Route {
            view: ViewName::BlogDetail,
            slug: Some(slug),
        },
        NavigationRequest::ByName(view) => Route { view, slug: None },
        NavigationRequest::Partial { view, slug } => Route {
            view: view.unwrap_or_else(|| prev.view.clone()),
            slug,
        },
    };
    // Invariant: a slug exists iff the view is blog-detail. Enforced here,
    // for every request shape, rather than trusted at call sites.
    if next.view != ViewName::BlogDetail {
        next.slug = None;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home_without_slug() {
        let store = NavigationStore::new();
        assert_eq!(store.current(), Route::initial());
    }

    #[test]
    fn blog_prefix_shorthand_targets_an_article() {
        let mut store = NavigationStore::new();
        store.navigate("blog:my-post");
        assert_eq!(store.current(), Route::blog_detail("my-post"));
    }

    #[test]
    fn plain_name_clears_the_slug() {
        let mut store = NavigationStore::new();
        store.navigate("blog:x");
        store.navigate("blog");
        assert_eq!(
            store.current(),
            Route {
                view: ViewName::Blog,
                slug: None
            }
        );
    }

    #[test]
    fn unknown_names_are_stored_untouched() {
        let mut store = NavigationStore::new();
        store.navigate("dashboard");
        assert_eq!(store.current().view, ViewName::Other("dashboard".into()));
        assert_eq!(store.current().slug, None);
    }

    #[test]
    fn partial_without_view_keeps_the_previous_view() {
        let mut store = NavigationStore::new();
        store.navigate(ViewName::Blog);
        store.navigate(NavigationRequest::Partial {
            view: None,
            slug: None,
        });
        assert_eq!(store.current().view, ViewName::Blog);
    }

    #[test]
    fn partial_slug_only_survives_on_blog_detail() {
        let mut store = NavigationStore::new();
        store.navigate(NavigationRequest::Partial {
            view: None,
            slug: Some("x".into()),
        });
        assert_eq!(store.current().slug, None);

        store.navigate(NavigationRequest::Partial {
            view: Some(ViewName::BlogDetail),
            slug: Some("x".into()),
        });
        assert_eq!(store.current(), Route::blog_detail("x"));
    }

    #[test]
    fn partial_changing_view_never_preserves_a_prior_slug() {
        let mut store = NavigationStore::new();
        store.navigate("blog:kept");
        store.navigate(NavigationRequest::Partial {
            view: Some(ViewName::Projects),
            slug: None,
        });
        assert_eq!(store.current().slug, None);
    }

    #[test]
    fn back_returns_from_article_to_blog_index() {
        let mut store = NavigationStore::new();
        store.navigate("blog:x");
        store.back();
        assert_eq!(
            store.current(),
            Route {
                view: ViewName::Blog,
                slug: None
            }
        );
    }

    #[test]
    fn back_is_a_no_op_elsewhere() {
        let mut store = NavigationStore::new();
        store.navigate(ViewName::Projects);
        store.back();
        assert_eq!(store.current().view, ViewName::Projects);
    }

    #[test]
    fn observers_see_every_change() {
        let mut store = NavigationStore::new();
        let watcher = store.subscribe();
        store.navigate(ViewName::Chat);
        assert_eq!(watcher.borrow().view, ViewName::Chat);
    }
}
