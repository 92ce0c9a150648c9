//! Accounts, sessions and the ownership guard.
//!
//! Passwords are Argon2id hashes. Sessions are opaque random tokens handed to
//! the client (cookie or bearer header) and stored server-side only as a
//! SHA-256 digest.

pub mod guard;
pub mod handlers;
pub mod password;
pub mod session;

pub use guard::authorize;
pub use session::AuthUser;
