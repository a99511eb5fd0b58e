use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod control_bar;
pub mod log_panel;
pub mod report_panel;
pub mod site_form;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_dark_theme)
            .add_systems(
                Update,
                (
                    control_bar::control_bar_ui,
                    site_form::site_form_ui,
                    log_panel::log_panel_ui,
                    report_panel::report_panel_ui,
                ),
            );
    }
}
