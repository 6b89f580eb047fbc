//! Client-side counterpart of the HTTP API: a typed [`ApiClient`] plus the
//! [`TaskStore`] holding the mirrored task list with optimistic updates.

mod api;
mod store;

pub use api::{ApiClient, ClientError};
pub use store::{FilterPatch, TaskStore};
