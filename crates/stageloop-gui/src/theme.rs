//! StageLoop theme and UI polish
//!
//! Provides consistent styling, colors, and visual polish across the application.
//! Powered by catppuccin-egui.

use eframe::egui::{self, Color32, Vec2};

use crate::settings::ThemeMode;

/// Spacing constants
pub mod spacing {
    pub const PANEL_PADDING: f32 = 12.0;
    pub const PANEL_PADDING_I8: i8 = 12;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
    pub const BUTTON_PADDING: f32 = 8.0;
    pub const ICON_SIZE: f32 = 16.0;
    pub const SMALL_ICON: f32 = 12.0;
}

/// Border radius constants
pub mod radius {
    use eframe::egui::CornerRadius;

    pub const MEDIUM: CornerRadius = CornerRadius::same(4);
    pub const LARGE: CornerRadius = CornerRadius::same(8);
    pub const PILL: CornerRadius = CornerRadius::same(255);
}

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub flavor: catppuccin_egui::Theme,

    pub font_size_base: f32,
    pub font_size_small: f32,
    pub font_size_heading: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Mocha,
            flavor: catppuccin_egui::MOCHA,
            font_size_base: 13.0,
            font_size_small: 11.0,
            font_size_heading: 16.0,
        }
    }
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        let flavor = match mode {
            ThemeMode::Latte => catppuccin_egui::LATTE,
            ThemeMode::Frappe => catppuccin_egui::FRAPPE,
            ThemeMode::Macchiato => catppuccin_egui::MACCHIATO,
            ThemeMode::Mocha => catppuccin_egui::MOCHA,
        };

        Self {
            mode,
            flavor,
            ..Default::default()
        }
    }

    /// Apply theme to egui context
    pub fn apply(&self, ctx: &egui::Context) {
        catppuccin_egui::set_theme(ctx, self.flavor);
        self.setup_fonts(ctx);
    }

    fn setup_fonts(&self, ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        ctx.set_fonts(fonts);

        let mut style = (*ctx.style()).clone();

        use egui::FontFamily::{Monospace, Proportional};
        use egui::FontId;
        use egui::TextStyle::{Body, Button, Heading, Small};

        style.text_styles = [
            (Heading, FontId::new(self.font_size_heading, Proportional)),
            (Body, FontId::new(self.font_size_base, Proportional)),
            (
                egui::TextStyle::Monospace,
                FontId::new(self.font_size_base, Monospace),
            ),
            (Button, FontId::new(self.font_size_base, Proportional)),
            (Small, FontId::new(self.font_size_small, Proportional)),
        ]
        .into();

        style.spacing.item_spacing = Vec2::new(spacing::ITEM_SPACING, spacing::ITEM_SPACING);
        style.spacing.button_padding =
            Vec2::new(spacing::BUTTON_PADDING, spacing::BUTTON_PADDING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING as i8);

        style.interaction.show_tooltips_only_when_still = false;

        ctx.set_style(style);
    }
}

// Helpers using current Context/Ui visuals

/// Helper to create styled buttons
pub fn primary_button(ui: &egui::Ui, text: &str) -> egui::Button<'static> {
    let color = ui.visuals().selection.bg_fill;
    let text_color = ui.visuals().strong_text_color();
    egui::Button::new(egui::RichText::new(text).color(text_color)).fill(color)
}

/// Helper to create styled secondary buttons
pub fn secondary_button(ui: &egui::Ui, text: &str) -> egui::Button<'static> {
    let color = ui.visuals().faint_bg_color;
    let text_color = ui.visuals().text_color();
    egui::Button::new(egui::RichText::new(text).color(text_color)).fill(color)
}

/// Helper to create icon buttons with standard sizing
pub fn icon_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(egui::RichText::new(text).size(spacing::ICON_SIZE))
}

/// Helper for colors
pub fn to_egui_color(color: stageloop_graph::Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Badge component for counts or status
pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    let frame = egui::Frame::default()
        .fill(color)
        .corner_radius(radius::PILL)
        .inner_margin(egui::Margin::symmetric(6, 2));

    frame.show(ui, |ui| {
        ui.label(
            egui::RichText::new(text)
                .small()
                .color(ui.visuals().strong_text_color()),
        );
    });
}

/// Card container with elevation effect - theme-aware
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    let frame = egui::Frame::default()
        .fill(ui.visuals().window_fill)
        .corner_radius(radius::LARGE)
        .inner_margin(egui::Margin::same(spacing::PANEL_PADDING_I8))
        .stroke(ui.visuals().window_stroke);

    frame.show(ui, |ui| {
        add_contents(ui);
    });
}
