use serde::{Deserialize, Serialize};

/// Backend-assigned role of an authenticated admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    VendorUser,
    HubUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::VendorUser => "vendor_user",
            Role::HubUser => "hub_user",
        }
    }

    /// Superusers bypass page checks entirely.
    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

/// The authenticated actor whose role and hub association drive all gating
/// decisions. Fetched from the identity endpoint, held in memory for the
/// session, re-fetched on explicit refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Page prefixes granted directly to this principal. May contain the
    /// all-access sentinel.
    #[serde(default)]
    pub allowed_pages: Vec<String>,
    /// Physical hub this principal belongs to, if any. Scopes which realtime
    /// channel the session joins.
    #[serde(default, alias = "hub_id")]
    pub hub_id: Option<String>,
}
