//! Client authentication (AUTHINFO USER/PASS, RFC 4643)

mod handler;

pub use handler::AuthHandler;
