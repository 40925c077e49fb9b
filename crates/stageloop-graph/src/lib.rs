pub mod changes;
pub mod diagram;
pub mod editing;
pub mod geometry;
pub mod router;
pub mod style;
pub mod view_transform;

pub use changes::{LinkChange, NodeChange};
pub use diagram::{
    Connection, Diagram, StageLink, StageNode, apply_link_changes, apply_node_changes,
};
pub use editing::{EditSession, EditorState};
pub use geometry::{AnchorSide, Rect, Vec2};
pub use router::{CubicBezier, LinkRouter};
pub use style::{
    CardState, Color, LinkState, LinkStyle, StageColors, link_style, phase_colors, stage_style,
};
pub use view_transform::{MAX_ZOOM, MIN_ZOOM, ViewTransform};
