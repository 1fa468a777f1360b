use crate::auth::resolver::{AccessDecision, PermissionResolver};

/// Paths every authenticated principal may see regardless of the allowed
/// set: the overview shell, the profile page, and the unauthorized notice
/// itself.
pub const COMMON_PATHS: &[&str] = &[
    "/dashboard/overview",
    "/dashboard/profile",
    "/dashboard/unauthorized",
];

/// Per-navigation rendering decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Principal or permissions not resolved yet; render nothing and wait.
    Pending,
    /// Render the requested view.
    Render,
    /// Navigate to the contained path instead of rendering.
    Redirect(String),
    /// Render nothing and stay put. Used when redirecting would loop.
    Suppress,
}

/// Gates page rendering on every path change.
///
/// Re-evaluation uses the resolver's cached state; the guard never fetches.
/// A denied path redirects to the fallback at most once per navigation, and
/// if the fallback itself would be denied the guard suppresses rendering
/// rather than looping.
pub struct RouteGuard {
    fallback_path: String,
    last_redirect_from: Option<String>,
}

impl RouteGuard {
    pub fn new(fallback_path: impl Into<String>) -> Self {
        Self { fallback_path: fallback_path.into(), last_redirect_from: None }
    }

    pub fn from_config() -> Self {
        Self::new(crate::config::config().guard.fallback_path.clone())
    }

    pub fn evaluate(&mut self, path: &str, resolver: &PermissionResolver) -> GuardOutcome {
        if !resolver.is_loaded() {
            return GuardOutcome::Pending;
        }

        match resolver.can_access(path) {
            // Absent principal: the auth layer owns the login redirect.
            AccessDecision::Unauthenticated => GuardOutcome::Pending,
            AccessDecision::Granted => {
                self.last_redirect_from = None;
                GuardOutcome::Render
            }
            AccessDecision::Denied => {
                if COMMON_PATHS.contains(&path) {
                    self.last_redirect_from = None;
                    return GuardOutcome::Render;
                }
                if self.last_redirect_from.as_deref() == Some(path) {
                    return GuardOutcome::Suppress;
                }
                let fallback_reachable = COMMON_PATHS.contains(&self.fallback_path.as_str())
                    || resolver.can_access(&self.fallback_path) == AccessDecision::Granted;
                if !fallback_reachable {
                    tracing::warn!(path, fallback = %self.fallback_path,
                        "fallback path is itself denied, suppressing render");
                    return GuardOutcome::Suppress;
                }
                tracing::debug!(path, fallback = %self.fallback_path, "access denied, redirecting");
                self.last_redirect_from = Some(path.to_string());
                GuardOutcome::Redirect(self.fallback_path.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::principal::{Principal, Role};

    fn admin_with(pages: &[&str]) -> PermissionResolver {
        PermissionResolver::seeded(
            Some(Principal {
                id: "a1".to_string(),
                name: "Ops Admin".to_string(),
                email: "ops@rinsr.example".to_string(),
                role: Role::Admin,
                allowed_pages: Vec::new(),
                hub_id: None,
            }),
            pages.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn granted_path_renders() {
        let resolver = admin_with(&["/dashboard/orders"]);
        let mut guard = RouteGuard::new("/dashboard/unauthorized");
        assert_eq!(guard.evaluate("/dashboard/orders/9", &resolver), GuardOutcome::Render);
    }

    #[test]
    fn denied_path_redirects_once_then_suppresses() {
        let resolver = admin_with(&[]);
        let mut guard = RouteGuard::new("/dashboard/unauthorized");
        assert_eq!(
            guard.evaluate("/dashboard/orders", &resolver),
            GuardOutcome::Redirect("/dashboard/unauthorized".to_string())
        );
        // Same navigation re-evaluated: no second redirect.
        assert_eq!(guard.evaluate("/dashboard/orders", &resolver), GuardOutcome::Suppress);
        // A different navigation may redirect again.
        assert_eq!(
            guard.evaluate("/dashboard/vendors", &resolver),
            GuardOutcome::Redirect("/dashboard/unauthorized".to_string())
        );
    }

    #[test]
    fn common_paths_render_without_grant() {
        let resolver = admin_with(&[]);
        let mut guard = RouteGuard::new("/dashboard/unauthorized");
        assert_eq!(guard.evaluate("/dashboard/overview", &resolver), GuardOutcome::Render);
        assert_eq!(guard.evaluate("/dashboard/profile", &resolver), GuardOutcome::Render);
    }

    #[test]
    fn denied_fallback_suppresses_instead_of_looping() {
        let resolver = admin_with(&[]);
        let mut guard = RouteGuard::new("/dashboard/elsewhere");
        assert_eq!(guard.evaluate("/dashboard/orders", &resolver), GuardOutcome::Suppress);
    }

    #[test]
    fn unresolved_state_is_pending() {
        let resolver = PermissionResolver::seeded(None, Vec::new());
        let mut guard = RouteGuard::new("/dashboard/unauthorized");
        // Seeded resolvers are loaded; an absent principal still yields
        // Pending because the auth layer owns that redirect.
        assert_eq!(guard.evaluate("/dashboard/orders", &resolver), GuardOutcome::Pending);
    }
}
