//! Client core for the NEXUS social network.
//!
//! [`AppContext`] wires an [`ApiClient`] and a [`SessionStore`] over one
//! [`Storage`]; view models in [`view`] take the context and talk to the
//! backend through it.

pub mod api;
pub mod context;
pub mod error;
pub mod events;
pub mod guard;
pub mod models;
pub mod search;
pub mod session;
pub mod storage;
pub mod utils;
pub mod view;

pub use api::ApiClient;
pub use context::AppContext;
pub use error::{Error, Result};
pub use session::{Session, SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
