use crate::theme::badge;
use eframe::egui;
use std::time::Instant;

const MESSAGE_LIFETIME_SECS: u64 = 4;

pub struct StatusBar {
    message: Option<(String, Instant)>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Show a transient message, e.g. "Link added"
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, stage_count: usize, link_count: usize, zoom: f32) {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, set_at)| set_at.elapsed().as_secs() >= MESSAGE_LIFETIME_SECS);
        if expired {
            self.message = None;
        }

        ui.horizontal(|ui| {
            match &self.message {
                Some((text, _)) => {
                    ui.label(egui::RichText::new(text).color(ui.visuals().text_color()));
                    // Keep repainting so the message clears without input
                    ui.ctx()
                        .request_repaint_after(std::time::Duration::from_millis(250));
                }
                None => badge(ui, "Ready", egui::Color32::LIGHT_GREEN),
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                badge(
                    ui,
                    &format!("{:.0}%", zoom * 100.0),
                    ui.visuals().window_fill,
                );
                ui.separator();
                badge(
                    ui,
                    &format!("{} links", link_count),
                    ui.visuals().window_fill,
                );
                ui.separator();
                badge(
                    ui,
                    &format!("{} stages", stage_count),
                    ui.visuals().selection.bg_fill,
                );
            });
        });
    }
}
