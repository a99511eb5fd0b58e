//! Site parameter form: everything the user fills in before submitting a
//! case. The proposed-use options narrow to whatever the selected zoning
//! allows, and the Run button locks while a run is in flight.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use analysis::progress::{OptimizationRun, RunRequested};
use analysis::site::{uses_for_zone, CaseRequest, City, Location, SiteParameters, Zoning};

pub fn site_form_ui(
    mut contexts: EguiContexts,
    mut params: ResMut<SiteParameters>,
    run: Res<OptimizationRun>,
    mut run_events: EventWriter<RunRequested>,
) {
    egui::Window::new("Site Parameters")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 48.0))
        .default_width(250.0)
        .resizable(false)
        .collapsible(true)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                ui.label("City:");
                egui::ComboBox::from_id_salt("site_city")
                    .selected_text(params.city.label())
                    .show_ui(ui, |ui| {
                        for city in City::ALL {
                            ui.selectable_value(&mut params.city, city, city.label());
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label("Location:");
                egui::ComboBox::from_id_salt("site_location")
                    .selected_text(params.location.label())
                    .show_ui(ui, |ui| {
                        for location in Location::ALL {
                            ui.selectable_value(&mut params.location, location, location.label());
                        }
                    });
            });

            let zoning_before = params.zoning;
            ui.horizontal(|ui| {
                ui.label("Zoning:");
                egui::ComboBox::from_id_salt("site_zoning")
                    .selected_text(params.zoning.label())
                    .show_ui(ui, |ui| {
                        for zoning in Zoning::ALL {
                            ui.selectable_value(&mut params.zoning, zoning, zoning.label());
                        }
                    });
            });
            if params.zoning != zoning_before {
                params.sync_use_with_zoning();
            }

            ui.horizontal(|ui| {
                ui.label("Proposed use:");
                egui::ComboBox::from_id_salt("site_proposed_use")
                    .selected_text(params.proposed_use.label())
                    .show_ui(ui, |ui| {
                        for use_option in uses_for_zone(params.zoning) {
                            ui.selectable_value(
                                &mut params.proposed_use,
                                *use_option,
                                use_option.label(),
                            );
                        }
                    });
            });

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label("Plot size:");
                ui.add(
                    egui::Slider::new(&mut params.plot_size, 100.0..=20_000.0).suffix(" m\u{b2}"),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Road width:");
                ui.add(egui::Slider::new(&mut params.road_width, 6.0..=60.0).suffix(" m"));
            });

            egui::CollapsingHeader::new("Advanced")
                .default_open(false)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Target height:");
                        ui.add(
                            egui::Slider::new(&mut params.building_height, 9.0..=120.0)
                                .suffix(" m"),
                        );
                    });
                    ui.horizontal(|ui| {
                        ui.label("ASR rate:");
                        ui.add(
                            egui::Slider::new(&mut params.asr_rate, 0.0..=100_000.0)
                                .suffix(" /m\u{b2}"),
                        );
                    });
                    ui.horizontal(|ui| {
                        ui.label("Deductions:");
                        ui.add(
                            egui::Slider::new(&mut params.plot_deductions, 0.0..=1_000.0)
                                .suffix(" m\u{b2}"),
                        );
                    });
                });

            ui.add_space(6.0);

            let run_btn = ui.add_enabled(
                !run.playing,
                egui::Button::new(egui::RichText::new("Run Analysis").strong()),
            );
            if run_btn.clicked() {
                run_events.send(RunRequested {
                    request: CaseRequest::from_parameters(&params),
                });
            }
            run_btn.on_disabled_hover_text("Analysis already in progress");
        });
}
