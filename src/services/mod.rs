//! Services behind the query hooks.
//!
//! This module contains the backend client, the query cache, local storage,
//! the UI event bus and the page error collector. None of them know about
//! rendering; the hosting shell consumes their output.

pub mod backend_client;
pub mod events;
pub mod local_storage;
pub mod page_errors;
pub mod query_cache;

pub use backend_client::{BackendClient, BackendClientConfig};
pub use events::{EventBus, Notification, UiEvent};
pub use local_storage::{LocalStorage, StorageKey};
pub use page_errors::PageErrors;
pub use query_cache::{QueryCache, QueryKey, QueryState};
