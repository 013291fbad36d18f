pub mod access_jwt;
pub mod authenticator;
pub mod factory;

pub use access_jwt::JwtVerifier;
pub use authenticator::Authenticator;
pub use factory::build_authenticator;
