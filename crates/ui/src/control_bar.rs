//! Top status strip: run phase, progress bar, reset, and the feed
//! connection indicator.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use analysis::feed::ConnectionStatus;
use analysis::progress::{OptimizationRun, ResetRequested, RunPhase};

fn phase_color(phase: RunPhase) -> egui::Color32 {
    match phase {
        RunPhase::Idle => egui::Color32::from_rgb(160, 160, 170),
        RunPhase::Complete => egui::Color32::from_rgb(80, 220, 200),
        _ => egui::Color32::from_rgb(255, 190, 70),
    }
}

fn connection_color(status: ConnectionStatus) -> egui::Color32 {
    match status {
        ConnectionStatus::Connected => egui::Color32::from_rgb(80, 220, 80),
        ConnectionStatus::Disconnected => egui::Color32::from_rgb(130, 130, 140),
        ConnectionStatus::Error => egui::Color32::from_rgb(230, 70, 60),
    }
}

pub fn control_bar_ui(
    mut contexts: EguiContexts,
    run: Res<OptimizationRun>,
    status: Res<ConnectionStatus>,
    mut reset_events: EventWriter<ResetRequested>,
) {
    egui::TopBottomPanel::top("control_bar")
        .exact_height(36.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 12.0;

                ui.label(
                    egui::RichText::new("MASSFORM")
                        .strong()
                        .color(egui::Color32::from_rgb(180, 200, 240)),
                );

                ui.separator();

                ui.label(
                    egui::RichText::new(run.phase.label())
                        .strong()
                        .color(phase_color(run.phase)),
                );

                ui.add(
                    egui::ProgressBar::new(run.value)
                        .desired_width(260.0)
                        .show_percentage(),
                );

                ui.separator();

                let reset_btn =
                    ui.add_enabled(run.phase == RunPhase::Complete, egui::Button::new("Reset"));
                if reset_btn.clicked() {
                    reset_events.send(ResetRequested);
                }

                // Connection dot pinned to the right edge
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(status.label())
                            .small()
                            .color(egui::Color32::from_rgb(150, 150, 150)),
                    );
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 4.0, connection_color(*status));
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_colors_distinct() {
        let colors = [
            connection_color(ConnectionStatus::Connected),
            connection_color(ConnectionStatus::Disconnected),
            connection_color(ConnectionStatus::Error),
        ];
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn terminal_phases_read_calm() {
        assert_ne!(phase_color(RunPhase::Idle), phase_color(RunPhase::Running));
        assert_ne!(
            phase_color(RunPhase::Complete),
            phase_color(RunPhase::Running)
        );
    }
}
