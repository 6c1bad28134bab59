//! Which routes require a bearer token.
//!
//! [`ROUTE_POLICIES`] is the single place where authentication coverage is
//! declared. [`AuthMiddleware`](super::AuthMiddleware) consults it for every
//! request; routes that are not listed are public.

use actix_web::http::Method;

/// Capability a caller needs to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone may call the route.
    Public,
    /// The caller must present a valid bearer token.
    Authenticated,
}

/// One entry of the policy table. `{name}` in a pattern matches a single path segment.
#[derive(Debug)]
pub struct RoutePolicy {
    pub method: Method,
    pub pattern: &'static str,
    pub access: Access,
}

pub static ROUTE_POLICIES: &[RoutePolicy] = &[
    RoutePolicy { method: Method::GET, pattern: "/", access: Access::Public },
    RoutePolicy { method: Method::GET, pattern: "/health", access: Access::Public },
    RoutePolicy { method: Method::POST, pattern: "/jwt", access: Access::Public },
    RoutePolicy { method: Method::POST, pattern: "/users", access: Access::Public },
    RoutePolicy { method: Method::GET, pattern: "/tasks", access: Access::Public },
    RoutePolicy { method: Method::POST, pattern: "/tasks", access: Access::Authenticated },
    RoutePolicy { method: Method::GET, pattern: "/tasks/{id}", access: Access::Public },
    RoutePolicy { method: Method::PUT, pattern: "/tasks/{id}", access: Access::Public },
    RoutePolicy { method: Method::DELETE, pattern: "/tasks/{id}", access: Access::Public },
];

/// Looks up the access level for a request.
pub fn required_access(method: &Method, path: &str) -> Access {
    ROUTE_POLICIES
        .iter()
        .find(|policy| policy.method == *method && pattern_matches(policy.pattern, path))
        .map(|policy| policy.access)
        .unwrap_or(Access::Public)
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let is_param = expected.starts_with('{') && expected.ends_with('}');
                if !is_param && expected != actual {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
