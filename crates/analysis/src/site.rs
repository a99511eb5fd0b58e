//! Site parameters and the building envelope.
//!
//! `SiteParameters` is the mutable state bag behind the parameter form;
//! `CaseRequest` is the JSON payload the analysis service receives;
//! `BuildingSpec` is the sanitized geometry the massing model renders.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Dimension used when a report supplies a missing, non-numeric, or
/// non-positive value.
pub const FALLBACK_DIMENSION: f32 = 10.0;

// ---------------------------------------------------------------------------
// BuildingSpec
// ---------------------------------------------------------------------------

/// Target envelope of the proposed building, in meters.
///
/// All dimensions are strictly positive: the only way to construct one is
/// through [`BuildingSpec::new`], which coerces bad values to
/// [`FALLBACK_DIMENSION`]. The envelope is immutable for the duration of a
/// visualization session and replaced wholesale when a new report arrives.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BuildingSpec {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Default for BuildingSpec {
    fn default() -> Self {
        // Placeholder massing shown before the first report lands.
        Self::new(20.0, 20.0, 50.0)
    }
}

impl BuildingSpec {
    pub fn new(width: f32, depth: f32, height: f32) -> Self {
        Self {
            width: sanitize_dimension(width),
            depth: sanitize_dimension(depth),
            height: sanitize_dimension(height),
        }
    }

    /// Largest of the three dimensions; drives camera framing and stage size.
    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.depth).max(self.height)
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        FALLBACK_DIMENSION
    }
}

// ---------------------------------------------------------------------------
// Form option enums
// ---------------------------------------------------------------------------

/// Municipality whose development control rules the pipeline consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum City {
    Mumbai,
    Pune,
    Nashik,
}

impl City {
    pub const ALL: [City; 3] = [City::Mumbai, City::Pune, City::Nashik];

    pub fn label(self) -> &'static str {
        match self {
            City::Mumbai => "Mumbai",
            City::Pune => "Pune",
            City::Nashik => "Nashik",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Island City")]
    IslandCity,
    Suburbs,
    #[serde(rename = "Extended Suburbs")]
    ExtendedSuburbs,
}

impl Location {
    pub const ALL: [Location; 3] = [
        Location::IslandCity,
        Location::Suburbs,
        Location::ExtendedSuburbs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Location::IslandCity => "Island City",
            Location::Suburbs => "Suburbs",
            Location::ExtendedSuburbs => "Extended Suburbs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zoning {
    #[serde(rename = "Residential (R-Zone)")]
    Residential,
    #[serde(rename = "Commercial (C-Zone)")]
    Commercial,
    #[serde(rename = "Industrial (I-Zone)")]
    Industrial,
}

impl Zoning {
    pub const ALL: [Zoning; 3] = [Zoning::Residential, Zoning::Commercial, Zoning::Industrial];

    pub fn label(self) -> &'static str {
        match self {
            Zoning::Residential => "Residential (R-Zone)",
            Zoning::Commercial => "Commercial (C-Zone)",
            Zoning::Industrial => "Industrial (I-Zone)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposedUse {
    #[serde(rename = "Residential Building")]
    ResidentialBuilding,
    #[serde(rename = "Commercial Office")]
    CommercialOffice,
    #[serde(rename = "IT Park")]
    ItPark,
    Hospital,
}

impl ProposedUse {
    pub fn label(self) -> &'static str {
        match self {
            ProposedUse::ResidentialBuilding => "Residential Building",
            ProposedUse::CommercialOffice => "Commercial Office",
            ProposedUse::ItPark => "IT Park",
            ProposedUse::Hospital => "Hospital",
        }
    }
}

/// Proposed-use options permitted under a zoning class. The first entry is
/// the default the form snaps to when the zoning changes.
pub fn uses_for_zone(zoning: Zoning) -> &'static [ProposedUse] {
    match zoning {
        Zoning::Residential => &[ProposedUse::ResidentialBuilding, ProposedUse::Hospital],
        Zoning::Commercial => &[
            ProposedUse::CommercialOffice,
            ProposedUse::ItPark,
            ProposedUse::Hospital,
        ],
        Zoning::Industrial => &[ProposedUse::ItPark, ProposedUse::CommercialOffice],
    }
}

// ---------------------------------------------------------------------------
// SiteParameters
// ---------------------------------------------------------------------------

/// Everything the user can type or pick before pressing Run.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteParameters {
    pub city: City,
    pub plot_size: f32,
    pub road_width: f32,
    pub location: Location,
    pub zoning: Zoning,
    pub proposed_use: ProposedUse,
    pub building_height: f32,
    pub asr_rate: f32,
    pub plot_deductions: f32,
}

impl Default for SiteParameters {
    fn default() -> Self {
        Self {
            city: City::Mumbai,
            plot_size: 2000.0,
            road_width: 20.0,
            location: Location::IslandCity,
            zoning: Zoning::Residential,
            proposed_use: ProposedUse::ResidentialBuilding,
            building_height: 15.0,
            asr_rate: 0.0,
            plot_deductions: 0.0,
        }
    }
}

impl SiteParameters {
    /// Snaps `proposed_use` back to a valid option after `zoning` changed.
    /// Keeps the current use if the new zone still allows it.
    pub fn sync_use_with_zoning(&mut self) {
        let allowed = uses_for_zone(self.zoning);
        if !allowed.contains(&self.proposed_use) {
            self.proposed_use = allowed[0];
        }
    }
}

// ---------------------------------------------------------------------------
// CaseRequest
// ---------------------------------------------------------------------------

/// Project identifier sent with every case.
pub const PROJECT_ID: &str = "massform_prj_01";

/// Rules document the pipeline ingests for every case.
pub const RULES_DOCUMENT: &str = "io/DCPR_2034.pdf";

/// The submission payload handed to the analysis service when a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRequest {
    pub project_id: String,
    pub case_id: String,
    pub city: City,
    pub document: String,
    pub parameters: SiteParameters,
}

impl CaseRequest {
    pub fn from_parameters(params: &SiteParameters) -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            project_id: PROJECT_ID.to_string(),
            case_id: format!("case_{millis}"),
            city: params.city,
            document: RULES_DOCUMENT.to_string(),
            parameters: params.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_keeps_valid_dimensions() {
        let spec = BuildingSpec::new(20.0, 20.0, 50.0);
        assert_eq!(spec.width, 20.0);
        assert_eq!(spec.depth, 20.0);
        assert_eq!(spec.height, 50.0);
    }

    #[test]
    fn spec_coerces_bad_dimensions_to_fallback() {
        let spec = BuildingSpec::new(f32::NAN, 0.0, -3.0);
        assert_eq!(spec.width, FALLBACK_DIMENSION);
        assert_eq!(spec.depth, FALLBACK_DIMENSION);
        assert_eq!(spec.height, FALLBACK_DIMENSION);

        let inf = BuildingSpec::new(f32::INFINITY, 10.0, 10.0);
        assert_eq!(inf.width, FALLBACK_DIMENSION);
    }

    #[test]
    fn max_dimension_picks_largest_axis() {
        let spec = BuildingSpec::new(20.0, 35.0, 12.0);
        assert_eq!(spec.max_dimension(), 35.0);
    }

    #[test]
    fn default_parameters_match_form_defaults() {
        let params = SiteParameters::default();
        assert_eq!(params.city, City::Mumbai);
        assert_eq!(params.plot_size, 2000.0);
        assert_eq!(params.road_width, 20.0);
        assert_eq!(params.zoning, Zoning::Residential);
        assert_eq!(params.proposed_use, ProposedUse::ResidentialBuilding);
        assert_eq!(params.building_height, 15.0);
    }

    #[test]
    fn zoning_change_snaps_invalid_use() {
        let mut params = SiteParameters::default();
        params.zoning = Zoning::Industrial;
        params.sync_use_with_zoning();
        assert_eq!(params.proposed_use, ProposedUse::ItPark);
    }

    #[test]
    fn zoning_change_keeps_still_valid_use() {
        let mut params = SiteParameters {
            zoning: Zoning::Commercial,
            proposed_use: ProposedUse::Hospital,
            ..Default::default()
        };
        params.zoning = Zoning::Residential;
        params.sync_use_with_zoning();
        // Hospital is allowed in both zones, so it survives the switch.
        assert_eq!(params.proposed_use, ProposedUse::Hospital);
    }

    #[test]
    fn every_zone_offers_at_least_one_use() {
        for zoning in Zoning::ALL {
            assert!(!uses_for_zone(zoning).is_empty());
        }
    }

    #[test]
    fn case_request_serializes_wire_labels() {
        let request = CaseRequest {
            project_id: PROJECT_ID.to_string(),
            case_id: "case_1".to_string(),
            city: City::Mumbai,
            document: RULES_DOCUMENT.to_string(),
            parameters: SiteParameters::default(),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["city"], "Mumbai");
        assert_eq!(json["document"], RULES_DOCUMENT);
        assert_eq!(json["parameters"]["zoning"], "Residential (R-Zone)");
        assert_eq!(json["parameters"]["proposed_use"], "Residential Building");
        assert_eq!(json["parameters"]["plot_size"], 2000.0);
    }

    #[test]
    fn case_request_ids_carry_prefixes() {
        let request = CaseRequest::from_parameters(&SiteParameters::default());
        assert_eq!(request.project_id, PROJECT_ID);
        assert!(request.case_id.starts_with("case_"));
    }
}
