//! Users domain module.
//!
//! Identity records of the marketplace: names, contact email, admin flag and a
//! one-way password hash. Pure domain logic (no IO, no storage).

pub mod password;
pub mod user;

pub use password::PasswordHash;
pub use user::{NewUser, User, UserPatch, UserUpdate, UserView};
