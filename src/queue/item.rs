//! Work queue entries.

use crate::parser::Link;

/// An element of the work queue.
///
/// Shutdown is signalled with a dedicated variant rather than a sentinel
/// link, so no real link can ever be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEntry {
    /// A link waiting to be downloaded.
    Item(Link),
    /// Poison entry: the worker exits when it pops this.
    Stop,
}

impl QueueEntry {
    /// Returns the link carried by this entry, if any.
    #[must_use]
    pub fn link(&self) -> Option<&Link> {
        match self {
            Self::Item(link) => Some(link),
            Self::Stop => None,
        }
    }

    /// Returns true for the poison entry.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl From<Link> for QueueEntry {
    fn from(link: Link) -> Self {
        Self::Item(link)
    }
}
