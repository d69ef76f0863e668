//! Authentication Module
//!
//! Turns an `Authorization: Bearer <token>` header into a caller identity.

mod extractor;
mod resolver;

pub use extractor::AuthenticatedUser;
pub use resolver::{bearer_token, IdentityResolver, SUBJECT_CLAIMS};
