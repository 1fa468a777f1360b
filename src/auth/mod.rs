pub mod guard;
pub mod permissions;
pub mod principal;
pub mod resolver;

pub use guard::{GuardOutcome, RouteGuard};
pub use principal::{Principal, Role};
pub use resolver::{AccessDecision, PermissionResolver};
