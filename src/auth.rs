//! Auth-domain secrets, exchanged credentials, and scope primitives.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::*;
