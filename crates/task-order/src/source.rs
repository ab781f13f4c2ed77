//! Remote Item Source
//!
//! The remote task service is an external collaborator; this module fixes
//! the contract the application needs from it and the order bookkeeping
//! that accompanies each call.

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::RemoteError;
use crate::reconcile::reconcile;
use crate::store::{append_id, load_order, prune_id, OrderStore};
use crate::view::ViewIdentity;

/// Supplier of the items for a view
///
/// Futures are not `Send` so browser fetch implementations qualify.
#[async_trait(?Send)]
pub trait TaskSource {
    type Item: Entity<Id = String>;
    type Draft;

    /// Items of `view`, in the order the service returns them
    async fn fetch_items(&self, view: &ViewIdentity) -> Result<Vec<Self::Item>, RemoteError>;

    /// Mark an item done
    async fn complete_item(&self, id: &str) -> Result<(), RemoteError>;

    /// Create an item from a draft
    async fn create_item(&self, draft: &Self::Draft) -> Result<Self::Item, RemoteError>;
}

/// Fetch `view` and arrange it by the saved order.
///
/// A fetch failure returns before the store is consulted, so nothing
/// persisted changes.
pub async fn load_working_list<S, O>(
    source: &S,
    store: &O,
    view: &ViewIdentity,
) -> Result<Vec<S::Item>, RemoteError>
where
    S: TaskSource + ?Sized,
    O: OrderStore + ?Sized,
{
    let remote = source.fetch_items(view).await?;
    Ok(reconcile(remote, &load_order(store, view)))
}

/// Complete `id` remotely, then remove it from the saved order.
pub async fn complete_and_prune<S, O>(
    source: &S,
    store: &O,
    view: &ViewIdentity,
    id: &str,
) -> Result<(), RemoteError>
where
    S: TaskSource + ?Sized,
    O: OrderStore + ?Sized,
{
    source.complete_item(id).await?;
    // store implementations report their own write failures
    let _ = prune_id(store, view, id);
    Ok(())
}

/// Create an item remotely and save it at the end of the displayed order.
pub async fn create_and_append<S, O>(
    source: &S,
    store: &O,
    view: &ViewIdentity,
    displayed: &[String],
    draft: &S::Draft,
) -> Result<S::Item, RemoteError>
where
    S: TaskSource + ?Sized,
    O: OrderStore + ?Sized,
{
    let created = source.create_item(draft).await?;
    let _ = append_id(store, view, displayed, &created.id());
    Ok(created)
}

/// One load of a view, numbered so that late answers can be recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub view: ViewIdentity,
}

/// What to do with the answer to a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    /// Show these items under the ticket's view
    Loaded(Vec<T>),
    /// The current load failed; nothing of the previous view may stay shown
    Failed(RemoteError),
    /// A newer load was started, or the view changed since; drop the answer
    Stale,
}

/// Hands out load tickets and knows which one is current.
///
/// Answers arrive in any order. Only the newest ticket, and only while its
/// view is still the selected one, may replace the list on screen, so a
/// reorder is never saved under a view whose items are not displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSequence {
    latest: u64,
}

impl LoadSequence {
    pub fn begin(&mut self, view: ViewIdentity) -> LoadTicket {
        self.latest += 1;
        LoadTicket {
            seq: self.latest,
            view,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket, selected: &ViewIdentity) -> bool {
        ticket.seq == self.latest && ticket.view == *selected
    }

    pub fn settle<T>(
        &self,
        ticket: &LoadTicket,
        selected: &ViewIdentity,
        result: Result<Vec<T>, RemoteError>,
    ) -> LoadOutcome<T> {
        if !self.is_current(ticket, selected) {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(items) => LoadOutcome::Loaded(items),
            Err(e) => LoadOutcome::Failed(e),
        }
    }
}
