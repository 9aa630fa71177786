//! `storefront-auth`: the signed-in user's session, passed around explicitly.
//!
//! Logging in and registering happen elsewhere; this crate only holds the result
//! (bearer token, display name, wallet balance) and hands it to whoever needs it.

pub mod session;
pub mod token;

pub use session::{InMemorySessionStore, Session, SessionStore};
pub use token::AuthToken;
