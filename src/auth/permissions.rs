/// Sentinel page entry meaning "access to everything".
pub const ALL_ACCESS: &str = "*";

/// The console shell. A grant of the bare root is narrower than any other
/// prefix: it covers only the root itself and its overview child.
pub const ROOT_PATH: &str = "/dashboard";
pub const ROOT_OVERVIEW: &str = "/dashboard/overview";

/// Decide whether `path` is covered by the allowed page prefixes.
///
/// Matching rules:
/// - the `*` sentinel grants everything;
/// - `ROOT_PATH` matches only itself and `ROOT_OVERVIEW`: a root-level
///   grant means "can see the shell", not "can see every page";
/// - every other prefix matches itself exactly or any descendant reached
///   through a `/` boundary, so `/dashboard/orders` never matches
///   `/dashboard/order-notes`.
pub fn path_allowed(path: &str, allowed: &[String]) -> bool {
    for prefix in allowed {
        if prefix == ALL_ACCESS {
            return true;
        }
        if prefix == ROOT_PATH {
            if path == ROOT_PATH || path == ROOT_OVERVIEW {
                return true;
            }
            continue;
        }
        if path == prefix || path.starts_with(&format!("{}/", prefix)) {
            return true;
        }
    }
    false
}
