//! Entitlement report window, shown once a run has completed and cleared
//! again when the next run begins.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use analysis::report::{CalculatedGeometry, ReportStore};

fn geometry_caption(geometry: &CalculatedGeometry) -> String {
    format!(
        "{:.1} m \u{d7} {:.1} m \u{d7} {:.1} m",
        geometry.width, geometry.depth, geometry.height
    )
}

pub fn report_panel_ui(mut contexts: EguiContexts, store: Res<ReportStore>) {
    let Some(report) = store.current.as_ref() else {
        return;
    };

    egui::Window::new("Entitlement Report")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 48.0))
        .default_width(300.0)
        .resizable(false)
        .collapsible(true)
        .show(contexts.ctx_mut(), |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "Project: {} | Case: {}",
                    report.project_id, report.case_id
                ))
                .small()
                .color(egui::Color32::from_rgb(150, 150, 150)),
            );
            ui.separator();

            match report.summary() {
                Some(summary) => {
                    ui.label(summary);
                }
                None => {
                    ui.label(
                        egui::RichText::new("No detailed analysis available.")
                            .italics()
                            .color(egui::Color32::from_rgb(130, 130, 140)),
                    );
                }
            }

            if let Some(rl) = report.rl_decision.as_ref() {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("OPTIMAL ACTION: {}", rl.optimal_action))
                        .strong()
                        .color(egui::Color32::from_rgb(90, 230, 240)),
                );
            }
            if let Some(percent) = report.confidence_percent() {
                ui.label("Policy confidence:");
                ui.add(egui::ProgressBar::new(percent as f32 / 100.0).show_percentage());
            }

            if let Some(geometry) = report.calculated_geometry.as_ref() {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(geometry_caption(geometry))
                        .small()
                        .color(egui::Color32::from_rgb(180, 200, 240)),
                );
            }
            if let Some(carpet) = report
                .entitlements
                .as_ref()
                .and_then(|e| e.carpet_area_sqm)
            {
                ui.label(
                    egui::RichText::new(format!("Carpet area: {carpet:.0} m\u{b2}"))
                        .small()
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_rounds_to_one_decimal() {
        let geometry = CalculatedGeometry {
            width: 20.0,
            depth: 20.04,
            height: 50.25,
        };
        assert_eq!(
            geometry_caption(&geometry),
            "20.0 m \u{d7} 20.0 m \u{d7} 50.2 m"
        );
    }
}
