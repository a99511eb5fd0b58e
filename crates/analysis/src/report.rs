//! Report payload types and the run-completion lifecycle.
//!
//! The analysis service compiles one JSON report per case. The core reads
//! three things out of it (geometry hints, the RL decision, the entitlement
//! summary) and passes every other field through uninterpreted.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::progress::{PhaseChanged, RunPhase, RunSet, RunStarted};
use crate::site::BuildingSpec;

/// Env var naming a report JSON file to load at startup.
pub const REPORT_ENV: &str = "MASSFORM_REPORT";

/// Confidence below this is treated as an inactive policy agent and hidden.
pub const CONFIDENCE_FLOOR: f64 = 0.1;

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// Geometry hints computed by the pipeline's envelope step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatedGeometry {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RlDecision {
    pub optimal_action: i64,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Entitlements {
    #[serde(default)]
    pub analysis_summary: String,
    #[serde(default)]
    pub carpet_area_sqm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisReport {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub case_id: String,
    #[serde(default)]
    pub calculated_geometry: Option<CalculatedGeometry>,
    #[serde(default)]
    pub entitlements: Option<Entitlements>,
    #[serde(default)]
    pub rl_decision: Option<RlDecision>,
    /// Fields the core does not interpret, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisReport {
    /// Massing envelope for this report. Missing geometry falls back to the
    /// default placeholder; bad values are coerced by `BuildingSpec::new`.
    pub fn building_spec(&self) -> BuildingSpec {
        match self.calculated_geometry {
            Some(g) => BuildingSpec::new(g.width as f32, g.depth as f32, g.height as f32),
            None => BuildingSpec::default(),
        }
    }

    /// Confidence as a whole percentage, only when above the display floor.
    pub fn confidence_percent(&self) -> Option<u32> {
        let score = self.rl_decision.as_ref()?.confidence_score;
        if score > CONFIDENCE_FLOOR {
            Some((score * 100.0).round() as u32)
        } else {
            None
        }
    }

    pub fn summary(&self) -> Option<&str> {
        let text = self.entitlements.as_ref()?.analysis_summary.as_str();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Report waiting to be published when the current run completes.
#[derive(Resource, Debug, Clone)]
pub struct PendingReport(pub AnalysisReport);

impl Default for PendingReport {
    fn default() -> Self {
        Self(sample_report())
    }
}

/// The report currently on screen. Cleared when a new run starts.
#[derive(Resource, Debug, Clone, Default)]
pub struct ReportStore {
    pub current: Option<AnalysisReport>,
}

/// Loads the startup report from `MASSFORM_REPORT`, falling back to the
/// built-in sample on any failure.
pub fn load_pending_report() -> PendingReport {
    let Ok(path) = std::env::var(REPORT_ENV) else {
        return PendingReport::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str::<AnalysisReport>(&raw) {
            Ok(report) => PendingReport(report),
            Err(e) => {
                warn!("report {path}: parse failed, using sample: {e}");
                PendingReport::default()
            }
        },
        Err(e) => {
            warn!("report {path}: read failed, using sample: {e}");
            PendingReport::default()
        }
    }
}

/// Demo report used when no external report file is configured.
pub fn sample_report() -> AnalysisReport {
    AnalysisReport {
        project_id: crate::site::PROJECT_ID.to_string(),
        case_id: "case_demo".to_string(),
        calculated_geometry: Some(CalculatedGeometry {
            width: 20.0,
            depth: 20.0,
            height: 50.0,
        }),
        entitlements: Some(Entitlements {
            analysis_summary: "Base FSI 1.05 applies for Island City residential plots. \
                Road width above 18 m grants a 0.5 premium FSI component. \
                Permissible built-up area for the submitted plot is 3100 sq.m; \
                the proposed envelope stays inside the allowable height band."
                .to_string(),
            carpet_area_sqm: Some(2635.0),
        }),
        rl_decision: Some(RlDecision {
            optimal_action: 2,
            confidence_score: 0.84,
        }),
        extra: serde_json::Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn clear_report_on_run_start(
    mut events: EventReader<RunStarted>,
    mut store: ResMut<ReportStore>,
) {
    if events.read().next().is_none() {
        return;
    }
    store.current = None;
}

/// Publishes the pending report the moment the run enters Complete, and
/// re-derives the building spec from its geometry.
fn publish_report_on_complete(
    mut events: EventReader<PhaseChanged>,
    pending: Res<PendingReport>,
    mut store: ResMut<ReportStore>,
    mut spec: ResMut<BuildingSpec>,
) {
    let completed = events.read().any(|e| e.phase == RunPhase::Complete);
    if !completed {
        return;
    }
    let report = pending.0.clone();
    *spec = report.building_spec();
    info!("report ready: case {}", report.case_id);
    store.current = Some(report);
}

pub struct ReportPlugin;

impl Plugin for ReportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingReport>()
            .init_resource::<ReportStore>()
            .add_systems(
                Update,
                (clear_report_on_run_start, publish_report_on_complete)
                    .in_set(RunSet::Reaction),
            );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_report() {
        let json = r#"{
            "project_id": "massform_prj_01",
            "case_id": "case_17",
            "city": "Mumbai",
            "calculated_geometry": {"width": 44.7, "depth": 44.7, "height": 15.0},
            "entitlements": {"analysis_summary": "FSI 1.5 applies.", "carpet_area_sqm": 2550.0},
            "rl_decision": {"optimal_action": 1, "confidence_score": 0.72},
            "geometry_file": "/outputs/projects/massform_prj_01/case_17_geometry.stl"
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).expect("parse");
        assert_eq!(report.case_id, "case_17");
        assert_eq!(report.confidence_percent(), Some(72));
        assert_eq!(report.summary(), Some("FSI 1.5 applies."));

        let spec = report.building_spec();
        assert!((spec.width - 44.7).abs() < 1e-4);
        assert_eq!(spec.height, 15.0);

        // Uninterpreted fields survive a round trip.
        assert!(report.extra.contains_key("geometry_file"));
        assert!(report.extra.contains_key("city"));
        let back = serde_json::to_value(&report).expect("serialize");
        assert_eq!(
            back["geometry_file"],
            "/outputs/projects/massform_prj_01/case_17_geometry.stl"
        );
    }

    #[test]
    fn missing_geometry_falls_back_to_placeholder() {
        let report: AnalysisReport = serde_json::from_str(r#"{"case_id": "x"}"#).expect("parse");
        assert_eq!(report.building_spec(), BuildingSpec::default());
    }

    #[test]
    fn bad_geometry_values_are_coerced() {
        let json = r#"{"calculated_geometry": {"width": -3.0, "depth": 0.0, "height": 12.0}}"#;
        let report: AnalysisReport = serde_json::from_str(json).expect("parse");
        let spec = report.building_spec();
        assert_eq!(spec.width, crate::site::FALLBACK_DIMENSION);
        assert_eq!(spec.depth, crate::site::FALLBACK_DIMENSION);
        assert_eq!(spec.height, 12.0);
    }

    #[test]
    fn low_confidence_is_hidden() {
        let mut report = sample_report();
        report.rl_decision = Some(RlDecision {
            optimal_action: 0,
            confidence_score: 0.05,
        });
        assert_eq!(report.confidence_percent(), None);

        report.rl_decision = None;
        assert_eq!(report.confidence_percent(), None);
    }

    #[test]
    fn sample_report_is_presentable() {
        let report = sample_report();
        assert_eq!(report.confidence_percent(), Some(84));
        assert!(report.summary().is_some());
        assert_eq!(report.building_spec(), BuildingSpec::new(20.0, 20.0, 50.0));
    }
}
