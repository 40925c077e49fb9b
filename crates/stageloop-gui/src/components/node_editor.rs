use eframe::egui;
use egui_phosphor::regular as ph;
use stageloop_core::{Phase, StageId};
use stageloop_graph::{EditSession, phase_colors};

use crate::theme::{self, badge, to_egui_color};

const EDITOR_WIDTH: f32 = 240.0;

/// Outcome of one frame of the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Cancel,
}

/// In-place edit form, floating over the card being edited.
pub struct NodeEditor;

impl NodeEditor {
    pub fn new() -> Self {
        Self
    }

    /// Widget id of the title field for `stage`, stable across frames.
    pub(crate) fn title_field_id(stage: StageId) -> egui::Id {
        egui::Id::new(("stage_editor_title", stage))
    }

    /// Widget id of the description field for `stage`.
    pub(crate) fn description_field_id(stage: StageId) -> egui::Id {
        egui::Id::new(("stage_editor_description", stage))
    }

    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        anchor: egui::Pos2,
        phase: Phase,
        session: &mut EditSession,
    ) -> Option<EditorAction> {
        let mut action = None;
        let stage = session.stage();

        egui::Area::new(egui::Id::new(("stage_editor", stage)))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(EDITOR_WIDTH);

                    badge(ui, phase.label(), to_egui_color(phase_colors(phase).fill));

                    let title_edit = ui.add(
                        egui::TextEdit::singleline(&mut session.draft_title)
                            .id(Self::title_field_id(stage))
                            .hint_text("Title")
                            .desired_width(f32::INFINITY),
                    );
                    let description_edit = ui.add(
                        egui::TextEdit::multiline(&mut session.draft_description)
                            .id(Self::description_field_id(stage))
                            .hint_text("Description")
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );

                    ui.horizontal(|ui| {
                        if ui
                            .add(theme::primary_button(ui, &format!("{} Save", ph::CHECK)))
                            .clicked()
                        {
                            action = Some(EditorAction::Save);
                        }
                        if ui
                            .add(theme::secondary_button(ui, &format!("{} Cancel", ph::X)))
                            .clicked()
                        {
                            action = Some(EditorAction::Cancel);
                        }
                    });

                    // Enter in the title field commits, Escape in a focused
                    // field backs out of this form only
                    if title_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = Some(EditorAction::Save);
                    }
                    if (title_edit.lost_focus() || description_edit.lost_focus())
                        && ui.input(|i| i.key_pressed(egui::Key::Escape))
                    {
                        action = Some(EditorAction::Cancel);
                    }
                });
            });

        action
    }
}
