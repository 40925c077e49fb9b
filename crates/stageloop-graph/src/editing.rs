use crate::diagram::{Diagram, StageNode};
use stageloop_core::StageId;
use std::collections::HashMap;

/// Draft text for one stage card while it is in edit mode.
///
/// Drafts are seeded from the committed values when the session begins and
/// stay separate from them until a save commits them back.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    stage: StageId,
    pub draft_title: String,
    pub draft_description: String,
}

impl EditSession {
    fn begin(node: &StageNode) -> Self {
        Self {
            stage: node.id,
            draft_title: node.title.clone(),
            draft_description: node.description.clone(),
        }
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }
}

/// Per-card edit coordinator.
///
/// Each card cycles Viewing -> Editing -> Viewing independently of the
/// others: a card is in edit mode exactly while a session for it exists
/// here. Save commits the drafts into the diagram; Cancel drops them.
#[derive(Debug, Default)]
pub struct EditorState {
    sessions: HashMap<StageId, EditSession>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self, id: StageId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Enter edit mode for `node`, seeding the drafts from its committed
    /// title and description.
    pub fn begin(&mut self, node: &StageNode) {
        self.sessions.insert(node.id, EditSession::begin(node));
    }

    pub fn session_mut(&mut self, id: StageId) -> Option<&mut EditSession> {
        self.sessions.get_mut(&id)
    }

    /// Commit the drafts for `id` into the diagram and leave edit mode.
    ///
    /// A save without a running session is a no-op.
    pub fn save(&mut self, id: StageId, diagram: &mut Diagram) {
        if let Some(session) = self.sessions.remove(&id) {
            diagram.commit_node_text(id, &session.draft_title, &session.draft_description);
        }
    }

    /// Leave edit mode for `id`, discarding the drafts.
    pub fn cancel(&mut self, id: StageId) {
        self.sessions.remove(&id);
    }
}
