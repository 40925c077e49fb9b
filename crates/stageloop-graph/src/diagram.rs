use crate::changes::{LinkChange, NodeChange};
use crate::geometry::{AnchorSide, Vec2};
use serde::{Deserialize, Serialize};
use stageloop_core::{LinkId, Phase, SEED_STAGES, StageId, StageSeed};

/// One stage card of the diagram.
///
/// Records are treated as immutable: every store operation that touches a
/// stage replaces it with a new record instead of mutating fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNode {
    pub id: StageId,
    pub phase: Phase,
    /// Canvas coordinates of the card's top-left corner.
    pub position: Vec2,
    pub title: String,
    pub description: String,
    pub selected: bool,
}

impl StageNode {
    pub fn from_seed(seed: &StageSeed) -> Self {
        Self {
            id: seed.id,
            phase: seed.phase,
            position: Vec2::new(seed.x, seed.y),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            selected: false,
        }
    }

    pub fn with_position(&self, position: Vec2) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn with_selected(&self, selected: bool) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }

    pub fn with_text(&self, title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            ..self.clone()
        }
    }
}

/// A user-drawn connection between two stages.
///
/// Both endpoints record which side of the card the link attaches to.
/// Duplicates and self-loops are allowed; the store never deduplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLink {
    pub id: LinkId,
    pub source: StageId,
    pub target: StageId,
    pub source_side: AnchorSide,
    pub target_side: AnchorSide,
    pub selected: bool,
}

impl StageLink {
    pub fn with_selected(&self, selected: bool) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }
}

/// A completed connect gesture, as reported by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source: StageId,
    pub source_side: AnchorSide,
    pub target: StageId,
    pub target_side: AnchorSide,
}

/// Apply a batch of node deltas, producing the updated node list.
///
/// Changes referencing a stage that is not in the list are dropped with a
/// warning; they are programming errors, not runtime failures.
pub fn apply_node_changes(nodes: &[StageNode], changes: &[NodeChange]) -> Vec<StageNode> {
    let mut next = nodes.to_vec();
    for change in changes {
        match change {
            NodeChange::Position { id, position } => {
                if let Some(node) = next.iter_mut().find(|n| n.id == *id) {
                    *node = node.with_position(*position);
                } else {
                    tracing::warn!(
                        "Dropping position change for stage {} because it is not in the diagram",
                        id
                    );
                }
            }
            NodeChange::Select { id, selected } => {
                if let Some(node) = next.iter_mut().find(|n| n.id == *id) {
                    *node = node.with_selected(*selected);
                } else {
                    tracing::warn!(
                        "Dropping selection change for stage {} because it is not in the diagram",
                        id
                    );
                }
            }
            NodeChange::Remove { id } => {
                let before = next.len();
                next.retain(|n| n.id != *id);
                if next.len() == before {
                    tracing::warn!(
                        "Dropping removal of stage {} because it is not in the diagram",
                        id
                    );
                }
            }
        }
    }
    next
}

/// Apply a batch of link deltas, producing the updated link list.
///
/// `nodes` is the current node list; added links must reference stages in it.
pub fn apply_link_changes(
    links: &[StageLink],
    nodes: &[StageNode],
    changes: &[LinkChange],
) -> Vec<StageLink> {
    let mut next = links.to_vec();
    for change in changes {
        match change {
            LinkChange::Add { link } => {
                let source_missing = !nodes.iter().any(|n| n.id == link.source);
                let target_missing = !nodes.iter().any(|n| n.id == link.target);
                if source_missing {
                    tracing::warn!(
                        "Dropping link {:?} because source stage {} is missing from the diagram",
                        link.id,
                        link.source
                    );
                }
                if target_missing {
                    tracing::warn!(
                        "Dropping link {:?} because target stage {} is missing from the diagram",
                        link.id,
                        link.target
                    );
                }
                if !source_missing && !target_missing {
                    next.push(link.clone());
                }
            }
            LinkChange::Remove { id } => {
                let before = next.len();
                next.retain(|l| l.id != *id);
                if next.len() == before {
                    tracing::warn!(
                        "Dropping removal of link {} because it is not in the diagram",
                        id
                    );
                }
            }
            LinkChange::Select { id, selected } => {
                if let Some(link) = next.iter_mut().find(|l| l.id == *id) {
                    *link = link.with_selected(*selected);
                } else {
                    tracing::warn!(
                        "Dropping selection change for link {} because it is not in the diagram",
                        id
                    );
                }
            }
        }
    }
    next
}

/// The diagram state store.
///
/// Owns the canonical node and link lists. The view reports change batches
/// against them; each batch is applied as one atomic swap of the affected
/// list, so a render never observes a partially-applied event.
#[derive(Debug, Clone)]
pub struct Diagram {
    nodes: Vec<StageNode>,
    links: Vec<StageLink>,
    next_link_id: i64,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            next_link_id: 1,
        }
    }

    /// Build the diagram from the fixed seed table: seven stages, no links.
    pub fn seeded() -> Self {
        Self {
            nodes: SEED_STAGES.iter().map(StageNode::from_seed).collect(),
            links: Vec::new(),
            next_link_id: 1,
        }
    }

    pub fn nodes(&self) -> &[StageNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[StageLink] {
        &self.links
    }

    pub fn node(&self, id: StageId) -> Option<&StageNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        self.nodes = apply_node_changes(&self.nodes, changes);
    }

    pub fn apply_link_changes(&mut self, changes: &[LinkChange]) {
        self.links = apply_link_changes(&self.links, &self.nodes, changes);
    }

    /// Append a new link for a completed connect gesture.
    ///
    /// No validation beyond the given endpoints; connecting the same pair
    /// again appends a second, independent link.
    pub fn connect(&mut self, connection: Connection) -> LinkId {
        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;
        let link = StageLink {
            id,
            source: connection.source,
            target: connection.target,
            source_side: connection.source_side,
            target_side: connection.target_side,
            selected: false,
        };
        self.apply_link_changes(&[LinkChange::Add { link }]);
        id
    }

    /// Commit edited text into a stage, replacing its record.
    pub fn commit_node_text(&mut self, id: StageId, title: &str, description: &str) {
        if self.node(id).is_none() {
            tracing::warn!(
                "Dropping text commit for stage {} because it is not in the diagram",
                id
            );
            return;
        }
        self.nodes = self
            .nodes
            .iter()
            .map(|n| {
                if n.id == id {
                    n.with_text(title, description)
                } else {
                    n.clone()
                }
            })
            .collect();
    }

    pub fn selected_node_ids(&self) -> Vec<StageId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    pub fn selected_link_ids(&self) -> Vec<LinkId> {
        self.links
            .iter()
            .filter(|l| l.selected)
            .map(|l| l.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn seed_ids() -> HashSet<StageId> {
        SEED_STAGES.iter().map(|s| s.id).collect()
    }

    fn side_strategy() -> impl Strategy<Value = AnchorSide> {
        prop_oneof![
            Just(AnchorSide::Left),
            Just(AnchorSide::Right),
            Just(AnchorSide::Top),
            Just(AnchorSide::Bottom),
        ]
    }

    /// Position changes aimed at ids 1-9: 8 and 9 are not in the seed and
    /// must be dropped without touching the rest of the batch.
    fn position_batch_strategy() -> impl Strategy<Value = Vec<NodeChange>> {
        proptest::collection::vec(
            (1i64..=9, -2000.0f32..2000.0, -2000.0f32..2000.0).prop_map(|(id, x, y)| {
                NodeChange::Position {
                    id: StageId(id),
                    position: Vec2::new(x, y),
                }
            }),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn prop_position_changes_preserve_id_set(
            batches in proptest::collection::vec(position_batch_strategy(), 0..6)
        ) {
            let mut diagram = Diagram::seeded();
            for batch in &batches {
                diagram.apply_node_changes(batch);
            }

            let ids: HashSet<StageId> = diagram.nodes().iter().map(|n| n.id).collect();
            prop_assert_eq!(
                ids, seed_ids(),
                "Position changes must never create or destroy stages"
            );
        }

        #[test]
        fn prop_position_change_affects_only_its_target(
            id in 1i64..=7,
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
        ) {
            let mut diagram = Diagram::seeded();
            let before = diagram.nodes().to_vec();

            diagram.apply_node_changes(&[NodeChange::Position {
                id: StageId(id),
                position: Vec2::new(x, y),
            }]);

            for (old, new) in before.iter().zip(diagram.nodes()) {
                prop_assert_eq!(old.id, new.id, "order must be stable");
                if old.id == StageId(id) {
                    prop_assert_eq!(new.position, Vec2::new(x, y));
                    prop_assert_eq!(&old.title, &new.title);
                    prop_assert_eq!(&old.description, &new.description);
                } else {
                    prop_assert_eq!(old, new, "untouched stages must be identical");
                }
            }
        }

        #[test]
        fn prop_connect_appends_exactly_one_link(
            source in 1i64..=7,
            target in 1i64..=7,
            source_side in side_strategy(),
            target_side in side_strategy(),
        ) {
            let mut diagram = Diagram::seeded();
            let connection = Connection {
                source: StageId(source),
                source_side,
                target: StageId(target),
                target_side,
            };

            diagram.connect(connection);
            prop_assert_eq!(diagram.link_count(), 1);

            let link = &diagram.links()[0];
            prop_assert_eq!(link.source, StageId(source));
            prop_assert_eq!(link.target, StageId(target));
            prop_assert_eq!(link.source_side, source_side);
            prop_assert_eq!(link.target_side, target_side);

            // Connecting the same pair again adds a second, independent link.
            let second = diagram.connect(connection);
            prop_assert_eq!(diagram.link_count(), 2);
            prop_assert_ne!(diagram.links()[0].id, second);
        }
    }

    #[test]
    fn test_drag_then_edit_scenario() {
        let mut diagram = Diagram::seeded();
        assert_eq!(diagram.node_count(), 7);
        assert_eq!(diagram.link_count(), 0);

        // Drag from stage 1's bottom handle to stage 2's top handle.
        diagram.connect(Connection {
            source: StageId(1),
            source_side: AnchorSide::Bottom,
            target: StageId(2),
            target_side: AnchorSide::Top,
        });
        assert_eq!(diagram.link_count(), 1);
        assert_eq!(diagram.links()[0].source, StageId(1));
        assert_eq!(diagram.links()[0].target, StageId(2));

        // Retitle stage 1 via the edit form's save path.
        let description = diagram.node(StageId(1)).unwrap().description.clone();
        diagram.commit_node_text(StageId(1), "New Goal", &description);
        assert_eq!(diagram.node(StageId(1)).unwrap().title, "New Goal");
        assert_eq!(diagram.link_count(), 1, "editing must not touch links");
    }

    #[test]
    fn test_moving_one_stage_leaves_the_rest_alone() {
        let mut diagram = Diagram::seeded();
        let before_nodes = diagram.nodes().to_vec();

        diagram.connect(Connection {
            source: StageId(6),
            source_side: AnchorSide::Right,
            target: StageId(7),
            target_side: AnchorSide::Left,
        });
        let before_links = diagram.links().to_vec();

        diagram.apply_node_changes(&[NodeChange::Position {
            id: StageId(4),
            position: Vec2::new(600.0, 520.0),
        }]);

        assert_eq!(
            diagram.node(StageId(4)).unwrap().position,
            Vec2::new(600.0, 520.0)
        );
        for old in &before_nodes {
            if old.id != StageId(4) {
                assert_eq!(diagram.node(old.id).unwrap(), old);
            }
        }
        assert_eq!(diagram.links(), &before_links[..]);
    }

    #[test]
    fn test_unknown_ids_are_dropped_silently() {
        let mut diagram = Diagram::seeded();
        let before = diagram.clone();

        diagram.apply_node_changes(&[
            NodeChange::Position {
                id: StageId(99),
                position: Vec2::new(1.0, 2.0),
            },
            NodeChange::Select {
                id: StageId(42),
                selected: true,
            },
            NodeChange::Remove { id: StageId(13) },
        ]);
        diagram.apply_link_changes(&[
            LinkChange::Remove { id: LinkId(5) },
            LinkChange::Select {
                id: LinkId(6),
                selected: true,
            },
        ]);

        assert_eq!(diagram.nodes(), before.nodes());
        assert_eq!(diagram.links(), before.links());
    }

    #[test]
    fn test_empty_diagram_drops_every_change() {
        let mut diagram = Diagram::default();
        assert_eq!(diagram.node_count(), 0);
        assert_eq!(diagram.link_count(), 0);

        diagram.apply_node_changes(&[
            NodeChange::Position {
                id: StageId(3),
                position: Vec2::new(10.0, 10.0),
            },
            NodeChange::Select {
                id: StageId(3),
                selected: true,
            },
            NodeChange::Remove { id: StageId(3) },
        ]);
        diagram.apply_link_changes(&[LinkChange::Remove { id: LinkId(1) }]);

        // A connect whose endpoints are not in the store is dropped too.
        diagram.connect(Connection {
            source: StageId(1),
            source_side: AnchorSide::Bottom,
            target: StageId(2),
            target_side: AnchorSide::Top,
        });

        assert_eq!(diagram.node_count(), 0);
        assert_eq!(diagram.link_count(), 0);
    }

    #[test]
    fn test_added_links_validate_their_endpoints() {
        let mut diagram = Diagram::seeded();
        let link = StageLink {
            id: LinkId(1),
            source: StageId(1),
            target: StageId(99),
            source_side: AnchorSide::Right,
            target_side: AnchorSide::Left,
            selected: false,
        };
        diagram.apply_link_changes(&[LinkChange::Add { link }]);
        assert_eq!(diagram.link_count(), 0);
    }

    #[test]
    fn test_self_loops_are_permitted() {
        let mut diagram = Diagram::seeded();
        diagram.connect(Connection {
            source: StageId(3),
            source_side: AnchorSide::Top,
            target: StageId(3),
            target_side: AnchorSide::Bottom,
        });
        assert_eq!(diagram.link_count(), 1);
    }

    #[test]
    fn test_remove_honored_for_nodes_and_links() {
        let mut diagram = Diagram::seeded();
        let id = diagram.connect(Connection {
            source: StageId(1),
            source_side: AnchorSide::Bottom,
            target: StageId(2),
            target_side: AnchorSide::Top,
        });

        diagram.apply_link_changes(&[
            LinkChange::Select { id, selected: true },
        ]);
        assert_eq!(diagram.selected_link_ids(), vec![id]);

        diagram.apply_link_changes(&[LinkChange::Remove { id }]);
        assert_eq!(diagram.link_count(), 0);

        diagram.apply_node_changes(&[NodeChange::Remove { id: StageId(5) }]);
        assert_eq!(diagram.node_count(), 6);
        assert!(diagram.node(StageId(5)).is_none());
    }

    #[test]
    fn test_selection_round_trip() {
        let mut diagram = Diagram::seeded();
        diagram.apply_node_changes(&[NodeChange::Select {
            id: StageId(2),
            selected: true,
        }]);
        assert_eq!(diagram.selected_node_ids(), vec![StageId(2)]);

        diagram.apply_node_changes(&[NodeChange::Select {
            id: StageId(2),
            selected: false,
        }]);
        assert!(diagram.selected_node_ids().is_empty());
    }

    #[test]
    fn test_link_serialization() {
        let link = StageLink {
            id: LinkId(3),
            source: StageId(1),
            target: StageId(2),
            source_side: AnchorSide::Bottom,
            target_side: AnchorSide::Top,
            selected: false,
        };
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"source":1,"target":2,"source_side":"Bottom","target_side":"Top","selected":false}"#
        );

        let back: StageLink = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }
}
