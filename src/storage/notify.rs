//! Change notifications for live queries.
//!
//! Every committed mutation of the wish table is published as a
//! [`WishChange`]. Live streams subscribe before running their first query,
//! then re-run the query whenever a change relevant to them arrives.

use futures_util::stream::BoxStream;
use log::{debug, error, warn};
use std::future::Future;
use tokio::sync::broadcast::{self, error::RecvError};

use super::StorageError;

/// A committed mutation of the wish table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WishChange {
    Inserted(i64),
    Updated(i64),
    Deleted(i64),
    /// The database handle was closed; live streams end.
    Closed,
}

impl WishChange {
    /// Id of the affected row, if any.
    pub fn id(&self) -> Option<i64> {
        match self {
            WishChange::Inserted(id) | WishChange::Updated(id) | WishChange::Deleted(id) => Some(*id),
            WishChange::Closed => None,
        }
    }
}

/// Publish/subscribe hub shared by every DAO built on one database.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<WishChange>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WishChange> {
        self.sender.subscribe()
    }

    /// Publish a change. Having no subscribers is not an error.
    pub fn publish(&self, change: WishChange) {
        if self.sender.send(change).is_err() {
            debug!("No live subscribers for {:?}", change);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Build a live stream over `query`.
///
/// The query runs once immediately and again after every change for which
/// `relevant` returns true. `Ok(None)` results are skipped, so a lookup that
/// matches nothing emits nothing. A failed query is yielded once and ends the
/// stream. A lagged subscriber re-queries once, collapsing the missed changes.
pub(crate) fn watch<T, Q, Fut, R>(
    mut changes: broadcast::Receiver<WishChange>,
    relevant: R,
    query: Q,
) -> BoxStream<'static, Result<T, StorageError>>
where
    T: Send + 'static,
    Q: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<T>, StorageError>> + Send + 'static,
    R: Fn(&WishChange) -> bool + Send + 'static,
{
    Box::pin(async_stream::stream! {
        'outer: loop {
            let result = query().await;
            match result {
                Ok(Some(value)) => yield Ok(value),
                Ok(None) => {}
                Err(e) => {
                    error!("Live query failed: {}", e);
                    yield Err(e);
                    break 'outer;
                }
            }

            loop {
                let received = changes.recv().await;
                match received {
                    Ok(WishChange::Closed) | Err(RecvError::Closed) => break 'outer,
                    Ok(change) if relevant(&change) => break,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Live query lagged by {} changes, re-querying", skipped);
                        break;
                    }
                }
            }
        }
    })
}
