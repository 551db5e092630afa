pub mod connection;
pub mod post;
pub mod profile;
pub mod user;

pub use connection::*;
pub use post::*;
pub use profile::*;
pub use user::*;

/// Backend row ids
pub type Id = i64;
