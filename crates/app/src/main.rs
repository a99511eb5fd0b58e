use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use analysis::feed::FeedConfig;
use analysis::report::load_pending_report;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Massform".to_string(),
                resolution: (1440.0, 810.0).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
            unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
        })
        // Env-derived resources land before the plugins' defaults would.
        .insert_resource(FeedConfig::from_env())
        .insert_resource(load_pending_report())
        .add_plugins((
            analysis::AnalysisPlugin,
            rendering::RenderingPlugin,
            ui::UiPlugin,
        ))
        .run();
}
