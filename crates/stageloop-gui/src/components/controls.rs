use crate::theme;
use eframe::egui;
use egui_phosphor::regular as ph;

/// Actions requested from the canvas controls cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ToggleLock,
}

pub struct CanvasControls;

impl CanvasControls {
    pub fn new() -> Self {
        Self
    }

    /// Floating button cluster in the bottom-left corner of the canvas
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        parent_rect: egui::Rect,
        zoom: f32,
        locked: bool,
    ) -> Option<ControlAction> {
        let button_size = egui::vec2(26.0, 26.0);
        let margin = 10.0;
        let inner_margin = 6.0;
        let cluster_pos = egui::pos2(
            parent_rect.min.x + margin,
            parent_rect.max.y - margin - (button_size.y + inner_margin * 2.0),
        );

        let mut action = None;

        egui::Area::new("canvas_controls".into())
            .order(egui::Order::Foreground)
            .fixed_pos(cluster_pos)
            .show(ui.ctx(), |ui| {
                ui.spacing_mut().item_spacing = egui::vec2(4.0, 0.0);

                let frame = egui::Frame::NONE
                    .fill(ui.visuals().window_fill)
                    .inner_margin(inner_margin)
                    .corner_radius(egui::CornerRadius::same(6))
                    .stroke(ui.visuals().window_stroke);

                frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .add(theme::icon_button(ph::MAGNIFYING_GLASS_MINUS))
                            .on_hover_text("Zoom out")
                            .clicked()
                        {
                            action = Some(ControlAction::ZoomOut);
                        }

                        ui.label(egui::RichText::new(format!("{:.0}%", zoom * 100.0)).size(11.0));

                        if ui
                            .add(theme::icon_button(ph::MAGNIFYING_GLASS_PLUS))
                            .on_hover_text("Zoom in")
                            .clicked()
                        {
                            action = Some(ControlAction::ZoomIn);
                        }

                        if ui
                            .add(theme::icon_button(ph::ARROWS_OUT_SIMPLE))
                            .on_hover_text("Zoom to fit")
                            .clicked()
                        {
                            action = Some(ControlAction::ZoomToFit);
                        }

                        ui.separator();

                        let (lock_icon, lock_hint) = if locked {
                            (ph::LOCK_SIMPLE, "Unlock diagram editing")
                        } else {
                            (ph::LOCK_SIMPLE_OPEN, "Lock diagram editing")
                        };
                        if ui
                            .add(theme::icon_button(lock_icon))
                            .on_hover_text(lock_hint)
                            .clicked()
                        {
                            action = Some(ControlAction::ToggleLock);
                        }
                    });
                });
            });

        action
    }
}
