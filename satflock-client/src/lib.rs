//! Headless driver for the satellite flock.
//!
//! Stands in for a render loop: builds the starting circle, steps the flock
//! once per tick and writes each frame as a JSON line for whatever draws it.

use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use satflock_core::FlockStd;
use satflock_shared::{FrameSnapshot, SimulationSettings};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Read settings from a JSON file, or fall back to defaults
pub fn load_settings(path: Option<&Path>) -> Result<SimulationSettings> {
    let Some(path) = path else {
        log::info!("No config file given, using defaults");
        return Ok(SimulationSettings::default());
    };

    log::info!("Loading config from {}", path.display());
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let settings = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(settings)
}

/// Reject settings the stepper assumes never happen
pub fn validate(settings: &SimulationSettings) -> Result<()> {
    ensure!(
        settings.avoid_radius > 0.0,
        "avoid_radius must be positive (got {})",
        settings.avoid_radius
    );
    ensure!(
        settings.avoid_radius < settings.neighbor_radius,
        "avoid_radius ({}) must be smaller than neighbor_radius ({})",
        settings.avoid_radius,
        settings.neighbor_radius
    );
    ensure!(
        settings.world_width > 0.0 && settings.world_height > 0.0,
        "world must have positive dimensions (got {}x{})",
        settings.world_width,
        settings.world_height
    );
    ensure!(settings.drift_speed >= 0.0, "drift_speed must not be negative");
    ensure!(
        settings.formation.count >= 1,
        "formation needs at least one satellite for the leader"
    );
    Ok(())
}

/// Totals over a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames_written: u64,
    pub links_seen: u64,
    pub avoids_seen: u64,
}

pub struct Driver {
    flock: FlockStd,
    tick: u64,
}

impl Driver {
    pub fn new(settings: &SimulationSettings) -> Result<Self> {
        validate(settings)?;

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let formation = settings.formation;
        let flock = FlockStd::new(
            formation.count,
            formation.center.into(),
            formation.radius,
            settings.flock_params(),
            &mut rng,
        );
        log::debug!(
            "Placed {} satellites on a {:.1} circle (seed {})",
            flock.len(),
            formation.radius,
            settings.seed
        );

        Ok(Self { flock, tick: 0 })
    }

    pub fn flock(&self) -> &FlockStd {
        &self.flock
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick and return the frame for it
    pub fn advance(&mut self) -> FrameSnapshot {
        // links carry tick-start positions, agents are post-step
        let report = self.flock.step();
        self.tick += 1;
        FrameSnapshot::capture(self.tick, &self.flock.agents, &report)
    }

    /// Run `ticks` ticks, writing every `every`-th frame to `out`
    pub fn run<W: Write>(&mut self, ticks: u64, every: u64, out: &mut W) -> Result<RunSummary> {
        ensure!(every >= 1, "frame interval must be at least 1");

        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            let frame = self.advance();
            summary.ticks += 1;
            summary.links_seen += frame.links.len() as u64;
            summary.avoids_seen += frame.avoids.len() as u64;

            if frame.tick % every == 0 {
                let line = frame.to_json().context("Failed to encode frame")?;
                writeln!(out, "{line}").context("Failed to write frame")?;
                summary.frames_written += 1;
                log::debug!(
                    "tick {}: {} links, {} avoids",
                    frame.tick,
                    frame.links.len(),
                    frame.avoids.len()
                );
            }
        }
        out.flush().context("Failed to flush output")?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        assert!(validate(&SimulationSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_radii() {
        let settings = SimulationSettings {
            avoid_radius: 120.0,
            ..SimulationSettings::default()
        };
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("neighbor_radius"));
    }

    #[test]
    fn test_validate_rejects_empty_flock() {
        let mut settings = SimulationSettings::default();
        settings.formation.count = 0;
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_advance_counts_ticks() {
        let mut driver = Driver::new(&SimulationSettings::default()).unwrap();
        let frame = driver.advance();
        assert_eq!(frame.tick, 1);
        assert_eq!(driver.tick(), 1);
        assert_eq!(frame.agents.len(), 10);
        assert!(frame.leader.is_some());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut driver = Driver::new(&SimulationSettings::default()).unwrap();
        assert!(driver.run(5, 0, &mut Vec::new()).is_err());
    }
}
