use std::time::{Duration, Instant};

use eframe::egui;
use egui_phosphor::regular as ph;
use stageloop_graph::{Diagram, EditorState, LinkChange};

use crate::components::concepts_panel::ConceptsPanel;
use crate::components::diagram_canvas::{CanvasOutput, DiagramCanvas};
use crate::components::status_bar::StatusBar;
use crate::settings::{AppSettings, ThemeMode};
use crate::theme::{Theme, spacing};

pub struct StageLoopApp {
    diagram: Diagram,
    editor_state: EditorState,
    settings: AppSettings,
    theme: Theme,

    canvas: DiagramCanvas,
    status_bar: StatusBar,
    concepts_panel: ConceptsPanel,

    // Initialization flag - ensures theme is applied on first update() frame
    needs_initial_theme_apply: bool,
    last_settings_save: Instant,
}

impl StageLoopApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();

        let theme = Theme::new(settings.theme);
        tracing::info!(
            "Applying initial theme mode: {:?} with scale {}",
            settings.theme,
            settings.ui_scale
        );
        theme.apply(&cc.egui_ctx);
        cc.egui_ctx.set_pixels_per_point(settings.ui_scale);

        Self {
            diagram: Diagram::seeded(),
            editor_state: EditorState::new(),
            settings,
            theme,
            canvas: DiagramCanvas::new(),
            status_bar: StatusBar::new(),
            concepts_panel: ConceptsPanel::new(),
            needs_initial_theme_apply: true,
            last_settings_save: Instant::now(),
        }
    }

    fn apply_canvas_output(&mut self, output: CanvasOutput) {
        if !output.node_changes.is_empty() {
            self.diagram.apply_node_changes(&output.node_changes);
        }
        if !output.link_changes.is_empty() {
            self.diagram.apply_link_changes(&output.link_changes);
        }
        if let Some(connection) = output.connection {
            self.diagram.connect(connection);
            self.status_bar.set_message("Link added");
        }
        if let Some(id) = output.save_edit {
            self.editor_state.save(id, &mut self.diagram);
            self.status_bar.set_message("Stage updated");
        }
        for id in output.cancel_edit {
            self.editor_state.cancel(id);
        }
        if output.toggle_lock {
            self.settings.locked = !self.settings.locked;
            self.settings.save();
            self.status_bar.set_message(if self.settings.locked {
                "Diagram locked"
            } else {
                "Diagram unlocked"
            });
        }
    }

    fn remove_selected_links(&mut self) {
        let selected = self.diagram.selected_link_ids();
        if selected.is_empty() {
            return;
        }
        let changes: Vec<LinkChange> = selected
            .into_iter()
            .map(|id| LinkChange::Remove { id })
            .collect();
        let removed = changes.len();
        self.diagram.apply_link_changes(&changes);
        self.status_bar.set_message(if removed == 1 {
            "Link removed".to_string()
        } else {
            format!("{removed} links removed")
        });
    }

    fn settings_menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> bool {
        let mut dirty = false;
        let menu = ui.menu_button(ph::PALETTE, |ui| {
            ui.label(egui::RichText::new("Theme").strong());
            for (mode, label) in [
                (ThemeMode::Latte, "Latte"),
                (ThemeMode::Frappe, "Frappé"),
                (ThemeMode::Macchiato, "Macchiato"),
                (ThemeMode::Mocha, "Mocha"),
            ] {
                if ui
                    .radio_value(&mut self.settings.theme, mode, label)
                    .changed()
                {
                    dirty = true;
                }
            }
            ui.separator();

            let scale = ui.add(
                egui::Slider::new(&mut self.settings.ui_scale, 0.5..=2.0).text("UI Scale"),
            );
            if scale.changed() {
                dirty = true;
            }
            // Rescale once the drag ends, not on every tick
            if scale.drag_stopped() || scale.lost_focus() {
                ctx.set_pixels_per_point(self.settings.ui_scale);
            }

            if ui
                .checkbox(&mut self.settings.show_grid, "Show Grid")
                .changed()
            {
                dirty = true;
            }
        });
        menu.response.on_hover_text("Appearance");
        dirty
    }
}

impl eframe::App for StageLoopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Theme Management - apply on first frame or when flavor changes
        if self.needs_initial_theme_apply || self.theme.mode != self.settings.theme {
            tracing::info!(
                "Applying theme on first frame or mode change: {:?}",
                self.settings.theme
            );
            self.theme = Theme::new(self.settings.theme);
            self.theme.apply(ctx);
            ctx.set_pixels_per_point(self.settings.ui_scale);
            self.needs_initial_theme_apply = false;
        }

        if !ctx.wants_keyboard_input()
            && ctx.input(|i| {
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
            })
            && !self.settings.locked
        {
            self.remove_selected_links();
        }

        let mut settings_dirty = false;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(spacing::ITEM_SPACING);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                settings_dirty |= self.settings_menu(ui, ctx);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    ui.heading(
                        egui::RichText::new("Norman's Model of Interaction")
                            .size(self.theme.font_size_heading)
                            .strong(),
                    );
                    ui.label(
                        egui::RichText::new(
                            "The Execution-Evaluation Cycle in Human-Computer Interaction",
                        )
                        .size(self.theme.font_size_small)
                        .color(ui.visuals().weak_text_color()),
                    );
                });
            });
            ui.add_space(spacing::ITEM_SPACING);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar.ui(
                ui,
                self.diagram.node_count(),
                self.diagram.link_count(),
                self.canvas.zoom(),
            );
        });

        egui::TopBottomPanel::bottom("concepts").show(ctx, |ui| {
            egui::Frame::NONE
                .inner_margin(spacing::PANEL_PADDING)
                .show(ui, |ui| {
                    self.concepts_panel.ui(ui);
                });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let output = self.canvas.ui(
                    ui,
                    rect,
                    &self.diagram,
                    &mut self.editor_state,
                    self.settings.locked,
                    self.settings.show_grid,
                );
                self.apply_canvas_output(output);
            });

        if settings_dirty && self.last_settings_save.elapsed() >= Duration::from_millis(500) {
            self.settings.save();
            self.last_settings_save = Instant::now();
        }
    }
}
