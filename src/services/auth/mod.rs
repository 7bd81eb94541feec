pub mod authorizer;
pub mod claims;
pub mod cookies;
pub mod factory;
pub mod issuer;
pub mod jwks;
pub mod policy;
pub mod token;

pub use authorizer::{AuthorizationDecision, Authorizer};
pub use factory::build_authorizer;
pub use issuer::IssuerLocator;
pub use token::TokenVerifier;
