use shared::domain::{Route, ViewName};
use tracing::debug;

/// Which page the render layer should mount, plus the data props it needs.
/// Pages that trigger further navigation receive the store itself from the
/// shell; the descriptor only carries route-derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageDescriptor {
    Home,
    Projects,
    Blog,
    /// `slug: None` is the missing-parameter form; the page surfaces it as an
    /// inline error instead of failing resolution.
    BlogDetail { slug: Option<String> },
    Chat,
}

impl PageDescriptor {
    pub fn is_missing_slug(&self) -> bool {
        matches!(self, PageDescriptor::BlogDetail { slug: None })
    }
}

/// Pure, total mapping from route to page. Unrecognized views fall back to
/// home rather than erroring.
pub fn resolve(route: &Route) -> PageDescriptor {
    match &route.view {
        ViewName::Home => PageDescriptor::Home,
        ViewName::Projects => PageDescriptor::Projects,
        ViewName::Blog => PageDescriptor::Blog,
        ViewName::Chat => PageDescriptor::Chat,
        ViewName::BlogDetail => PageDescriptor::BlogDetail {
            slug: route
                .slug
                .as_deref()
                .map(str::trim)
                .filter(|slug| !slug.is_empty())
                .map(str::to_string),
        },
        ViewName::Other(name) => {
            debug!(view = %name, "unrecognized view, resolving to home");
            PageDescriptor::Home
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_views_resolve_to_their_pages() {
        let cases = [
            (ViewName::Home, PageDescriptor::Home),
            (ViewName::Projects, PageDescriptor::Projects),
            (ViewName::Blog, PageDescriptor::Blog),
            (ViewName::Chat, PageDescriptor::Chat),
        ];
        for (view, expected) in cases {
            let route = Route { view, slug: None };
            assert_eq!(resolve(&route), expected);
        }
    }

    #[test]
    fn unknown_views_fall_back_to_home() {
        for name in ["settings", "admin", ""] {
            let route = Route {
                view: ViewName::Other(name.to_string()),
                slug: None,
            };
            assert_eq!(resolve(&route), PageDescriptor::Home);
        }
    }

    #[test]
    fn blog_detail_carries_its_slug() {
        let page = resolve(&Route::blog_detail("my-post"));
        assert_eq!(
            page,
            PageDescriptor::BlogDetail {
                slug: Some("my-post".to_string())
            }
        );
        assert!(!page.is_missing_slug());
    }

    #[test]
    fn blog_detail_without_slug_is_flagged_not_failed() {
        let route = Route {
            view: ViewName::BlogDetail,
            slug: None,
        };
        assert!(resolve(&route).is_missing_slug());
    }

    #[test]
    fn blank_slug_counts_as_missing() {
        let route = Route {
            view: ViewName::BlogDetail,
            slug: Some("   ".to_string()),
        };
        assert!(resolve(&route).is_missing_slug());
    }
}
