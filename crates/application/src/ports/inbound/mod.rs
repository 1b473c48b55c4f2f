//! These traits define what the application can do.

pub mod auth;
pub mod logout;
pub mod refresh_token;

pub use auth::*;
pub use logout::*;
pub use refresh_token::*;
