//! Domain types shared across Flock components.

mod member;
mod role;
mod user;

pub use member::Member;
pub use role::Role;
pub use user::{User, UserFromValueError};
