//! Gogs entity types and their collections.

mod branch;
mod org;
mod owner;
mod repo;
mod token;
mod user;

pub use branch::*;
pub use org::*;
pub use owner::*;
pub use repo::*;
pub use token::*;
pub use user::*;
