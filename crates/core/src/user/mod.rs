//! User accounts: registration, login lookup and account types.
//!
//! Passwords reach this module already digested by the caller. The stored
//! digest is compared verbatim; hashing is not this crate's concern.

mod error;
mod service;
mod types;

pub use error::UserError;
pub use service::{UserService, UserStore};
pub use types::{AccountType, NewUser, RegisterInput, User, UserProfile};
