//! Diagram style system
//!
//! Color mapping for stage cards and links, keyed by the phase tag each
//! stage carries.

use stageloop_core::Phase;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) * (1.0 - factor)) as u8,
            g: ((self.g as f32) * (1.0 - factor)) as u8,
            b: ((self.b as f32) * (1.0 - factor)) as u8,
            a: self.a,
        }
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

/// Card color palette
#[derive(Debug, Clone, Copy)]
pub struct StageColors {
    pub fill: Color,
    pub border: Color,
    pub text: Color,
}

/// Link color and stroke width
#[derive(Debug, Clone, Copy)]
pub struct LinkStyle {
    pub color: Color,
    pub width: f32,
}

// ============================================================================
// Color Constants
// ============================================================================

// Goal stage (neutral, no group accent)
pub const COLOR_GOAL_FILL: Color = Color::rgb(110, 110, 120);
pub const COLOR_GOAL_BORDER: Color = Color::rgb(85, 85, 95);
pub const COLOR_GOAL_TEXT: Color = Color::rgb(255, 255, 255);

// Execution stages (amber tones)
pub const COLOR_EXECUTION_FILL: Color = Color::rgb(200, 160, 80);
pub const COLOR_EXECUTION_BORDER: Color = Color::rgb(170, 130, 60);
pub const COLOR_EXECUTION_TEXT: Color = Color::rgb(30, 30, 30);

// Evaluation stages (blue tones)
pub const COLOR_EVALUATION_FILL: Color = Color::rgb(80, 130, 180);
pub const COLOR_EVALUATION_BORDER: Color = Color::rgb(60, 110, 160);
pub const COLOR_EVALUATION_TEXT: Color = Color::rgb(255, 255, 255);

// Focus/selection
pub const COLOR_FOCUS_BORDER: Color = Color::rgb(255, 200, 100);

// Links
pub const COLOR_LINK: Color = Color::rgb(140, 140, 140);

// Connection handles
pub const COLOR_HANDLE_FILL: Color = Color::rgb(120, 120, 120);
pub const COLOR_HANDLE_ARMED: Color = Color::rgb(255, 200, 100);

// Background dot grid
pub const COLOR_GRID_DOT: Color = Color::rgba(170, 170, 170, 100);

// ============================================================================
// Style Functions
// ============================================================================

/// State tracking for card rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardState {
    /// Whether the card is currently selected
    pub is_selected: bool,

    /// Whether the card is currently being hovered over
    pub is_hovered: bool,
}

impl CardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selected state
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    /// Set the hovered state
    pub fn with_hovered(mut self, hovered: bool) -> Self {
        self.is_hovered = hovered;
        self
    }
}

/// State tracking for link rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkState {
    pub is_selected: bool,
    pub is_hovered: bool,
}

impl LinkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    pub fn with_hovered(mut self, hovered: bool) -> Self {
        self.is_hovered = hovered;
        self
    }
}

/// Get the base colors for a phase
pub fn phase_colors(phase: Phase) -> StageColors {
    match phase {
        Phase::Goal => StageColors {
            fill: COLOR_GOAL_FILL,
            border: COLOR_GOAL_BORDER,
            text: COLOR_GOAL_TEXT,
        },
        Phase::Execution => StageColors {
            fill: COLOR_EXECUTION_FILL,
            border: COLOR_EXECUTION_BORDER,
            text: COLOR_EXECUTION_TEXT,
        },
        Phase::Evaluation => StageColors {
            fill: COLOR_EVALUATION_FILL,
            border: COLOR_EVALUATION_BORDER,
            text: COLOR_EVALUATION_TEXT,
        },
    }
}

/// Get the colors for a card given its phase and interaction state
pub fn stage_style(phase: Phase, state: CardState) -> StageColors {
    let base = phase_colors(phase);

    if state.is_selected {
        StageColors {
            fill: base.fill,
            border: COLOR_FOCUS_BORDER,
            text: base.text,
        }
    } else if state.is_hovered {
        StageColors {
            fill: base.fill.lighten(0.1),
            border: base.border,
            text: base.text,
        }
    } else {
        base
    }
}

/// Get the stroke for a link given its interaction state
pub fn link_style(state: LinkState) -> LinkStyle {
    if state.is_selected {
        LinkStyle {
            color: COLOR_FOCUS_BORDER,
            width: 3.0,
        }
    } else if state.is_hovered {
        LinkStyle {
            color: COLOR_LINK.lighten(0.25),
            width: 3.0,
        }
    } else {
        LinkStyle {
            color: COLOR_LINK,
            width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_have_distinct_palettes() {
        let goal = phase_colors(Phase::Goal);
        let execution = phase_colors(Phase::Execution);
        let evaluation = phase_colors(Phase::Evaluation);

        assert_ne!(goal.fill, execution.fill);
        assert_ne!(execution.fill, evaluation.fill);
        assert_ne!(goal.fill, evaluation.fill);
    }

    #[test]
    fn test_selection_overrides_border() {
        for phase in [Phase::Goal, Phase::Execution, Phase::Evaluation] {
            let style = stage_style(phase, CardState::new().with_selected(true));
            assert_eq!(style.border, COLOR_FOCUS_BORDER);
        }
    }

    #[test]
    fn test_hover_lightens_fill() {
        let base = phase_colors(Phase::Evaluation);
        let hovered = stage_style(Phase::Evaluation, CardState::new().with_hovered(true));
        assert!(hovered.fill.r >= base.fill.r);
        assert!(hovered.fill.g >= base.fill.g);
        assert!(hovered.fill.b >= base.fill.b);
        assert_ne!(hovered.fill, base.fill);
    }

    #[test]
    fn test_selected_links_render_wider() {
        let normal = link_style(LinkState::new());
        let selected = link_style(LinkState::new().with_selected(true));
        assert!(selected.width > normal.width);
        assert_eq!(selected.color, COLOR_FOCUS_BORDER);
    }
}
