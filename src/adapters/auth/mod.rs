//! Authentication adapters implementing the `TokenValidator` port.
//!
//! - `jwt` - HS256 tokens signed with a shared secret
//! - `mock` - fixed token table for tests

mod jwt;
mod mock;

pub use jwt::JwtTokenValidator;
pub use mock::MockTokenValidator;
