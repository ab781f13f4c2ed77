//! Task Ordering Domain
//!
//! Layered the same way for every consumer:
//! - entity / view: what is being ordered and under which key
//! - reconcile: merging a remote item set with a stored order
//! - store: persisted order access
//! - source: the remote item source and the workflows built on it
//!
//! This crate has no platform dependencies, so the browser front-end and
//! native tests share it unchanged.

mod entity;
mod error;
mod reconcile;
mod source;
mod store;
mod view;

pub use entity::Entity;
pub use error::{OrderStoreError, RemoteError};
pub use reconcile::{ids_of, reconcile};
pub use source::{
    complete_and_prune, create_and_append, load_working_list, LoadOutcome, LoadSequence, LoadTicket,
    TaskSource,
};
pub use store::{append_id, commit_order, load_order, prune_id, MemoryOrderStore, OrderStore};
pub use view::{ViewIdentity, ViewMode};
