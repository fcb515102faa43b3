//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens signed with the configured shared secret
//! - `mock` - Fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{issue_token, Claims, JwtSessionValidator};
pub use mock::MockSessionValidator;
