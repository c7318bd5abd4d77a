//! Client sessions
//!
//! A session tracks what one reader has selected (group, article pointer,
//! authentication) and answers its commands from the shared store.

mod auth_state;
mod connection;
mod executor;
mod state;

pub use auth_state::AuthState;
pub use connection::{ConnectionOptions, handle_client};
pub use executor::{Session, error_response};
pub use state::SessionState;
