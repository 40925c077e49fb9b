use crate::diagram::StageLink;
use crate::geometry::Vec2;
use stageloop_core::{LinkId, StageId};

/// A delta the view layer reports against the node list.
///
/// Changes are collected per input event and applied to the diagram as one
/// batch, so a render never sees a half-applied event.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// The user dragged a stage card to a new position.
    Position { id: StageId, position: Vec2 },
    /// Selection toggled by clicking a card or the canvas background.
    Select { id: StageId, selected: bool },
    /// Explicit removal request. The current view never emits this for
    /// stages; the store still honors it.
    Remove { id: StageId },
}

/// A delta the view layer reports against the link list.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkChange {
    /// A fully-formed link to append. Links with endpoints that are not in
    /// the diagram are dropped, not an error.
    Add { link: StageLink },
    Remove { id: LinkId },
    Select { id: LinkId, selected: bool },
}
