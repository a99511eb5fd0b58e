//! # TestRig: headless harness for run-lifecycle integration tests
//!
//! Wraps `bevy::app::App` + [`AnalysisPlugin`] on `MinimalPlugins`, with the
//! clock driven manually: every frame advances by exactly one fixed timestep,
//! so a run progresses one tick per frame regardless of wall-clock jitter.

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::feed::{ConnectionStatus, LogBuffer};
use crate::progress::{
    OptimizationRun, ResetRequested, RunPhase, RunRequested, TICK_INTERVAL,
};
use crate::report::ReportStore;
use crate::site::{CaseRequest, SiteParameters};
use crate::AnalysisPlugin;

pub struct TestRig {
    app: App,
}

impl TestRig {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK_INTERVAL));
        app.add_plugins(AnalysisPlugin);
        // Run one update so Startup systems execute.
        app.update();
        Self { app }
    }

    /// Advance n frames, one progress tick each.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Submit the current site parameters as a run request and advance one
    /// frame so the driver processes it.
    pub fn request_run(&mut self) {
        let request = CaseRequest::from_parameters(self.app.world().resource::<SiteParameters>());
        self.app.world_mut().send_event(RunRequested { request });
        self.tick(1);
    }

    pub fn request_reset(&mut self) {
        self.app.world_mut().send_event(ResetRequested);
        self.tick(1);
    }

    /// Request a run and advance until it reaches Complete.
    pub fn complete_run(&mut self) {
        self.request_run();
        self.tick(80);
        assert_eq!(self.run().phase, RunPhase::Complete, "run did not complete");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn run(&self) -> &OptimizationRun {
        self.app.world().resource::<OptimizationRun>()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.app
            .world()
            .resource::<LogBuffer>()
            .events()
            .iter()
            .map(|e| e.text.clone())
            .collect()
    }

    pub fn connection(&self) -> ConnectionStatus {
        *self.app.world().resource::<ConnectionStatus>()
    }

    pub fn report(&self) -> &ReportStore {
        self.app.world().resource::<ReportStore>()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
