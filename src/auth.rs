//! Token models handed between the OAuth client, the profile fetcher, and verify callbacks.

pub mod grant;
pub mod secret;

pub use grant::*;
pub use secret::*;
