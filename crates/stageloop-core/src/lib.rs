use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(pub i64);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub i64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which half of the execution-evaluation cycle a stage belongs to.
///
/// Set once when the seed table is loaded and never re-derived afterwards.
/// Only styling depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Goal,
    Execution,
    Evaluation,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Goal => "Goal",
            Phase::Execution => "Execution",
            Phase::Evaluation => "Evaluation",
        }
    }
}

// ============================================================================
// Seed Data
// ============================================================================

/// One row of the fixed table the diagram is built from at startup.
///
/// Positions are canvas coordinates of the card's top-left corner. Titles and
/// descriptions are starting values; both are editable at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSeed {
    pub id: StageId,
    pub phase: Phase,
    pub x: f32,
    pub y: f32,
    pub title: &'static str,
    pub description: &'static str,
}

pub const SEED_STAGES: [StageSeed; 7] = [
    StageSeed {
        id: StageId(1),
        phase: Phase::Goal,
        x: 500.0,
        y: 0.0,
        title: "Establish the Goal",
        description: "The user decides what they want to achieve.",
    },
    StageSeed {
        id: StageId(2),
        phase: Phase::Execution,
        x: 750.0,
        y: 150.0,
        title: "Formulate Intention",
        description: "The user decides on the plan of action to reach the goal.",
    },
    StageSeed {
        id: StageId(3),
        phase: Phase::Execution,
        x: 750.0,
        y: 350.0,
        title: "Specify Action Sequence",
        description: "The user translates their intention into a specific sequence of actions for the interface.",
    },
    StageSeed {
        id: StageId(4),
        phase: Phase::Execution,
        x: 500.0,
        y: 500.0,
        title: "Execute Action",
        description: "The user performs the actions on the system interface.",
    },
    StageSeed {
        id: StageId(5),
        phase: Phase::Evaluation,
        x: 250.0,
        y: 350.0,
        title: "Perceive System State",
        description: "The user observes the system to see what has happened as a result of their action.",
    },
    StageSeed {
        id: StageId(6),
        phase: Phase::Evaluation,
        x: 250.0,
        y: 150.0,
        title: "Interpret System State",
        description: "The user makes sense of the system's response.",
    },
    StageSeed {
        id: StageId(7),
        phase: Phase::Evaluation,
        x: 500.0,
        y: 100.0,
        title: "Evaluate System State",
        description: "The user compares the perceived and interpreted system state to their original goal, deciding if it was achieved.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_serialization() {
        let id = StageId(4);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "4");

        let back: StageId = serde_json::from_str("4").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let ids: HashSet<StageId> = SEED_STAGES.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), SEED_STAGES.len());
    }

    #[test]
    fn test_seed_phases() {
        for seed in &SEED_STAGES {
            let expected = match seed.id.0 {
                1 => Phase::Goal,
                2..=4 => Phase::Execution,
                5..=7 => Phase::Evaluation,
                other => panic!("Unexpected seed id {other}"),
            };
            assert_eq!(seed.phase, expected, "stage {} phase", seed.id);
        }
    }

    #[test]
    fn test_seed_text_is_nonempty() {
        for seed in &SEED_STAGES {
            assert!(!seed.title.is_empty());
            assert!(!seed.description.is_empty());
        }
    }
}
