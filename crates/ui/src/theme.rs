use bevy_egui::{egui, EguiContexts};

/// Console-style dark theme: cold greys with a single cyan accent.
pub fn apply_dark_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    let panel = egui::Color32::from_rgb(24, 26, 32);
    let surface = egui::Color32::from_rgb(38, 42, 52);
    let hover = egui::Color32::from_rgb(58, 66, 84);
    let accent = egui::Color32::from_rgb(64, 200, 220);

    style.visuals.panel_fill = panel;
    style.visuals.window_fill = panel;
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(16, 18, 24);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(30, 33, 42);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.bg_fill = surface;
    style.visuals.widgets.inactive.weak_bg_fill = surface;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.bg_fill = accent;
    style.visuals.widgets.active.weak_bg_fill = accent;

    style.visuals.selection.bg_fill = accent.linear_multiply(0.4);
    style.visuals.selection.stroke = egui::Stroke::new(1.0, accent);

    // Anchored HUD windows: flat, bordered, no drop shadow.
    style.visuals.window_shadow = egui::Shadow::NONE;
    style.visuals.window_stroke = egui::Stroke::new(1.0, surface);
    style.visuals.window_corner_radius = egui::CornerRadius::same(4);

    let widget_rounding = egui::CornerRadius::same(2);
    style.visuals.widgets.noninteractive.corner_radius = widget_rounding;
    style.visuals.widgets.inactive.corner_radius = widget_rounding;
    style.visuals.widgets.hovered.corner_radius = widget_rounding;
    style.visuals.widgets.active.corner_radius = widget_rounding;

    ctx.set_style(style);
}
