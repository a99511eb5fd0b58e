use bevy::prelude::*;

pub mod feed;
pub mod massing;
pub mod progress;
pub mod report;
pub mod site;

#[cfg(test)]
mod test_harness;

/// Headless core: site parameters, the run state machine, the log feed and
/// report lifecycle. No rendering or UI types in here, so the whole crate
/// runs under `MinimalPlugins` in tests.
pub struct AnalysisPlugin;

impl Plugin for AnalysisPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<site::BuildingSpec>()
            .init_resource::<site::SiteParameters>()
            .add_plugins((
                progress::ProgressPlugin,
                feed::FeedPlugin,
                report::ReportPlugin,
            ));
    }
}
