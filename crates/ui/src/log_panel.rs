//! Streaming log console along the bottom edge. Lines are color-coded by
//! pipeline stage, the policy verdict is called out in cyan, and the view
//! sticks to the newest entry.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use analysis::feed::{LogBuffer, LogCategory};
use analysis::progress::OptimizationRun;

/// Rows rendered at most; older entries stay in the buffer but off screen.
pub const LOG_PANEL_CAPACITY: usize = 200;

const PANEL_HEIGHT: f32 = 180.0;

const IDLE_PLACEHOLDER: &str = "State: Idle. Waiting for case injection...";

fn category_icon(category: LogCategory) -> &'static str {
    match category {
        LogCategory::System => "[>]",
        LogCategory::Retrieval => "[db]",
        LogCategory::Inference => "[ai]",
        LogCategory::Policy => "[rl]",
        LogCategory::Success => "[ok]",
    }
}

fn category_color(category: LogCategory) -> egui::Color32 {
    match category {
        LogCategory::System => egui::Color32::from_rgb(170, 175, 185),
        LogCategory::Retrieval => egui::Color32::from_rgb(255, 180, 60),
        LogCategory::Inference => egui::Color32::from_rgb(100, 170, 255),
        LogCategory::Policy => egui::Color32::from_rgb(175, 120, 255),
        LogCategory::Success => egui::Color32::from_rgb(90, 220, 120),
    }
}

/// Policy verdict lines get promoted regardless of their category styling.
fn is_verdict(text: &str) -> bool {
    text.contains("OPTIMAL ACTION")
}

pub fn log_panel_ui(
    mut contexts: EguiContexts,
    buffer: Res<LogBuffer>,
    run: Res<OptimizationRun>,
    time: Res<Time>,
) {
    egui::TopBottomPanel::bottom("analysis_log")
        .exact_height(PANEL_HEIGHT)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Analysis Log")
                        .strong()
                        .color(egui::Color32::from_rgb(180, 200, 240)),
                );
                let shown = buffer.tail(LOG_PANEL_CAPACITY).len();
                ui.label(
                    egui::RichText::new(format!("({shown})"))
                        .small()
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if buffer.is_empty() && !run.playing {
                        ui.label(
                            egui::RichText::new(IDLE_PLACEHOLDER)
                                .italics()
                                .color(egui::Color32::from_rgb(130, 130, 140)),
                        );
                        return;
                    }

                    for event in buffer.tail(LOG_PANEL_CAPACITY) {
                        let icon = category_icon(event.category);
                        let line = format!("{} {}", icon, event.text);
                        let text = if is_verdict(&event.text) {
                            egui::RichText::new(line)
                                .monospace()
                                .strong()
                                .color(egui::Color32::from_rgb(90, 230, 240))
                        } else {
                            egui::RichText::new(line)
                                .monospace()
                                .color(category_color(event.category))
                        };
                        ui.label(text);
                    }

                    if run.playing {
                        let dots = (time.elapsed_secs() * 2.0) as usize % 4;
                        ui.label(
                            egui::RichText::new(format!("Processing{}", ".".repeat(dots)))
                                .monospace()
                                .color(egui::Color32::from_rgb(130, 130, 140)),
                        );
                    }
                });
        });
}
