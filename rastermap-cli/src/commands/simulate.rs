//! `simulate`: drive the navigator along a straight track.
//!
//! Each step moves the position and runs the requested number of pager
//! updates, logging what every update evicted, reused and loaded.

use indicatif::{ProgressBar, ProgressStyle};
use rastermap::config::ConfigFile;
use tracing::{debug, info, warn};

use super::common::{build_navigator, DemoNavigator, MapArgs};
use crate::error::CliError;

/// A straight track between two positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub steps: usize,
}

impl Track {
    /// Position at `step` (0 = start, `steps` = end).
    pub fn position(&self, step: usize) -> (f64, f64) {
        if self.steps == 0 {
            return self.from;
        }
        let t = step.min(self.steps) as f64 / self.steps as f64;
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }
}

/// Totals over a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub updates: usize,
    pub loads: usize,
    pub evictions: usize,
    pub reuses: usize,
    pub uncovered_steps: usize,
    pub zone_changes: usize,
}

/// Fly `track`, running `ticks_per_step` updates at each position.
///
/// When `zoom_in_at` names a step, the navigator zooms in once there.
pub fn simulate(
    nav: &mut DemoNavigator,
    track: Track,
    ticks_per_step: usize,
    zoom_in_at: Option<usize>,
    progress: &ProgressBar,
) -> SimulationSummary {
    let mut summary = SimulationSummary::default();
    let mut zone = None;

    for step in 0..=track.steps {
        let (lat, lon) = track.position(step);

        if zoom_in_at == Some(step) {
            match nav.zoom_in() {
                Ok(scale) => info!(step, scale, "zoomed in"),
                Err(e) => warn!(step, error = %e, "zoom in failed"),
            }
        }

        let mut outcome = nav.set_position(lat, lon);
        for tick in 0..ticks_per_step.max(1) {
            if tick > 0 {
                outcome = nav.tick();
            }
            let Some(outcome) = outcome else {
                break;
            };
            summary.updates += 1;
            summary.evictions += outcome.evicted;
            summary.reuses += outcome.reused;
            summary.loads += usize::from(outcome.loaded.is_some());
            debug!(
                step,
                tick,
                evicted = outcome.evicted,
                reused = outcome.reused,
                loaded = ?outcome.loaded.map(|l| l.tile),
                "update"
            );
        }

        if outcome.is_none() {
            summary.uncovered_steps += 1;
        }
        let current = nav.zone().map(|z| z.name.clone());
        if current != zone {
            if let Some(name) = &current {
                info!(step, lat, lon, zone = %name, "entered zone");
            }
            summary.zone_changes += 1;
            zone = current;
        }
        progress.inc(1);
    }

    summary
}

/// Run the simulate command.
pub fn run(
    config: &ConfigFile,
    args: &MapArgs,
    from: (f64, f64),
    to: (f64, f64),
    steps: usize,
    ticks_per_step: usize,
    zoom_in_at: Option<usize>,
) -> Result<(), CliError> {
    let mut nav = build_navigator(config, args)?;
    let track = Track { from, to, steps };

    let progress = ProgressBar::new(steps as u64 + 1);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} steps")
            .map_err(|e| CliError::Config(e.to_string()))?
            .progress_chars("=> "),
    );
    let summary = simulate(&mut nav, track, ticks_per_step, zoom_in_at, &progress);
    progress.finish_and_clear();

    let stats = nav.pager().stats();
    println!("Simulation Summary");
    println!("==================");
    println!("  Steps:         {}", steps + 1);
    println!("  Updates:       {}", summary.updates);
    println!("  Loads:         {}", summary.loads);
    println!("  Evictions:     {}", summary.evictions);
    println!("  Reuses:        {}", summary.reuses);
    println!("  Flushes:       {}", stats.flushes);
    println!("  Zone changes:  {}", summary.zone_changes);
    println!("  Uncovered:     {}", summary.uncovered_steps);
    println!("  Final scale:   {}", nav.scale());
    println!(
        "  Resident:      {}/{}",
        nav.pager().occupied_count(),
        nav.pager().capacity()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_navigator(window: usize) -> DemoNavigator {
        let mut config = ConfigFile::default();
        config.pager.window_size = window;
        config.source.parallel_decode = false;
        build_navigator(&config, &MapArgs::default()).unwrap()
    }

    #[test]
    fn test_track_interpolation() {
        let track = Track {
            from: (50.0, 10.0),
            to: (52.0, 14.0),
            steps: 4,
        };
        assert_eq!(track.position(0), (50.0, 10.0));
        assert_eq!(track.position(2), (51.0, 12.0));
        assert_eq!(track.position(4), (52.0, 14.0));
        assert_eq!(track.position(9), (52.0, 14.0));
    }

    #[test]
    fn test_stationary_track_fills_window() {
        let mut nav = demo_navigator(3);
        let track = Track {
            from: (50.0, 10.0),
            to: (50.0, 10.0),
            steps: 0,
        };
        let summary = simulate(&mut nav, track, 12, None, &ProgressBar::hidden());

        assert_eq!(summary.updates, 12);
        assert_eq!(summary.loads, 9);
        assert_eq!(summary.evictions, 0);
        assert_eq!(summary.zone_changes, 1);
        assert!(nav.pager().is_complete());
    }

    #[test]
    fn test_track_leaving_coverage() {
        let mut nav = demo_navigator(3);
        let track = Track {
            from: (50.0, 10.0),
            to: (0.0, 10.0),
            steps: 10,
        };
        let summary = simulate(&mut nav, track, 1, None, &ProgressBar::hidden());

        assert!(summary.uncovered_steps > 0);
        assert_eq!(nav.pager().occupied_count(), 0);
        assert_eq!(
            nav.pager().occupied_count() + nav.pager().free_count(),
            nav.pager().capacity()
        );
    }

    #[test]
    fn test_zoom_during_track() {
        let mut nav = demo_navigator(3);
        let track = Track {
            from: (50.0, 10.0),
            to: (50.5, 10.5),
            steps: 4,
        };
        simulate(&mut nav, track, 2, Some(2), &ProgressBar::hidden());

        assert_eq!(nav.scale(), "1:250K");
        assert_eq!(nav.zone().unwrap().name, "demo-regional");
    }
}
