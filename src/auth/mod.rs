pub mod extractors;
pub mod middleware;
pub mod policy;
pub mod token;

pub use extractors::AuthenticatedClaims;
pub use middleware::AuthMiddleware;
pub use policy::{required_access, Access, ROUTE_POLICIES};
pub use token::{AuthError, Claims, TokenService, TOKEN_TTL_HOURS};
