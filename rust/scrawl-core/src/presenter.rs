//! Rendering boundary between the transcript and a front-end.

use crate::transcript::Entry;

/// What the controller needs from its UI collaborator.
///
/// Implementations receive explicit `(index, &Entry)` snapshots taken on
/// the interactive thread; they never hold a live reference into the store,
/// so a row redraw can never race the background evaluation writing into
/// the same entry.
pub trait Presenter {
    /// A new row exists at `index`. Fired synchronously with submission,
    /// so insert notifications arrive in submission order.
    fn row_inserted(&mut self, index: usize, entry: &Entry);

    /// The row at `index` changed and must be redrawn. Fired at most once
    /// per entry, in completion order.
    fn row_updated(&mut self, index: usize, entry: &Entry);

    /// Bring the row at `index` into view. Visual convenience only.
    fn scroll_to(&mut self, index: usize);
}
