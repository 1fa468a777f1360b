use std::sync::{Arc, Mutex};

use crate::api::RinsrClient;
use crate::auth::permissions::{path_allowed, ALL_ACCESS};
use crate::auth::principal::Principal;

/// Outcome of a page-access check.
///
/// `Unauthenticated` is deliberately distinct from `Denied`: an absent
/// principal means the auth layer owns the redirect, while a present
/// principal without the page is a hard deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
    Unauthenticated,
}

#[derive(Debug, Default)]
struct ResolverState {
    principal: Option<Principal>,
    /// Effective allowed prefixes: the principal's own pages merged with the
    /// per-role set fetched from the backend.
    allowed: Vec<String>,
    /// False until the first load_permissions completes, success or not.
    loaded: bool,
}

/// Resolves "can the current principal access path X" without re-fetching
/// on every check.
///
/// All network failures degrade to the safe default: absent principal for
/// identity, empty allowed set for permissions. Nothing here may ever fail
/// open.
pub struct PermissionResolver {
    client: Arc<RinsrClient>,
    state: Mutex<ResolverState>,
}

impl PermissionResolver {
    pub fn new(client: Arc<RinsrClient>) -> Self {
        Self { client, state: Mutex::new(ResolverState::default()) }
    }

    /// Fetch the current principal. Failure is silent and observable only
    /// as the absent state.
    pub async fn load_principal(&self) {
        match self.client.fetch_principal().await {
            Ok(principal) => {
                tracing::debug!(id = %principal.id, role = principal.role.as_str(),
                    "principal loaded");
                self.state.lock().unwrap().principal = Some(principal);
            }
            Err(e) => {
                tracing::warn!("identity fetch failed, treating session as logged out: {e}");
                self.state.lock().unwrap().principal = None;
            }
        }
    }

    /// Resolve the effective allowed-page set for the loaded principal.
    ///
    /// Superusers short-circuit to the all-access sentinel with no network
    /// call. For everyone else the per-role set is fetched cache-busted;
    /// any failure leaves an empty set. A network error must never grant
    /// access.
    pub async fn load_permissions(&self) {
        let snapshot = {
            let state = self.state.lock().unwrap();
            state.principal.as_ref().map(|p| (p.role, p.allowed_pages.clone()))
        };

        let Some((role, own_pages)) = snapshot else {
            let mut state = self.state.lock().unwrap();
            state.allowed.clear();
            state.loaded = true;
            return;
        };

        let role_pages = if role.is_superuser() {
            vec![ALL_ACCESS.to_string()]
        } else {
            match self.client.fetch_role_pages(role).await {
                Ok(pages) => pages,
                Err(e) => {
                    tracing::warn!(role = role.as_str(),
                        "permission fetch failed, failing closed: {e}");
                    Vec::new()
                }
            }
        };

        let mut allowed = own_pages;
        for page in role_pages {
            if !allowed.contains(&page) {
                allowed.push(page);
            }
        }

        let mut state = self.state.lock().unwrap();
        state.allowed = allowed;
        state.loaded = true;
    }

    /// Re-run both loads. Exposed for manual invalidation, e.g. after an
    /// admin's role changes.
    pub async fn refresh(&self) {
        self.load_principal().await;
        self.load_permissions().await;
    }

    /// True once the first permission resolution has completed.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().unwrap().loaded
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.lock().unwrap().principal.clone()
    }

    pub fn can_access(&self, path: &str) -> AccessDecision {
        let state = self.state.lock().unwrap();
        let Some(principal) = &state.principal else {
            return AccessDecision::Unauthenticated;
        };
        if principal.role.is_superuser() {
            return AccessDecision::Granted;
        }
        if path_allowed(path, &state.allowed) {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied
        }
    }
}

#[cfg(test)]
impl PermissionResolver {
    /// Build a resolver with pre-resolved state, bypassing the network.
    pub(crate) fn seeded(principal: Option<Principal>, allowed: Vec<String>) -> Self {
        let client = Arc::new(
            RinsrClient::new(&crate::config::ApiConfig {
                base_url: "http://127.0.0.1:0".to_string(),
                token: None,
                request_timeout_secs: 1,
                notification_limit: 10,
            })
            .expect("test client"),
        );
        Self {
            client,
            state: Mutex::new(ResolverState { principal, allowed, loaded: true }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::principal::Role;

    fn admin(role: Role) -> Principal {
        Principal {
            id: "a1".to_string(),
            name: "Ops Admin".to_string(),
            email: "ops@rinsr.example".to_string(),
            role,
            allowed_pages: Vec::new(),
            hub_id: None,
        }
    }

    #[test]
    fn absent_principal_is_unauthenticated() {
        let resolver = PermissionResolver::seeded(None, Vec::new());
        assert_eq!(resolver.can_access("/dashboard"), AccessDecision::Unauthenticated);
    }

    #[test]
    fn superuser_bypasses_page_set() {
        let resolver = PermissionResolver::seeded(Some(admin(Role::SuperAdmin)), Vec::new());
        assert_eq!(resolver.can_access("/never/seen/before"), AccessDecision::Granted);
    }

    #[test]
    fn sentinel_in_allowed_set_grants_all() {
        let resolver = PermissionResolver::seeded(
            Some(admin(Role::Admin)),
            vec![ALL_ACCESS.to_string()],
        );
        assert_eq!(resolver.can_access("/dashboard/payments/42"), AccessDecision::Granted);
    }

    #[test]
    fn empty_set_denies_non_superuser() {
        let resolver = PermissionResolver::seeded(Some(admin(Role::Admin)), Vec::new());
        assert_eq!(resolver.can_access("/dashboard/orders"), AccessDecision::Denied);
    }
}
