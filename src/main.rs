/*
 *  main.rs
 *
 *  PhaseScope - stereo field monitor
 *  (c) 2025-26 the PhaseScope authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
//! Demo driver: runs the engine against the in-memory surface with a
//! synthetic (or scripted) sample feed and reports render statistics.

use std::fs::File;
use std::io::BufWriter;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use env_logger::Env;
use log::{info, warn};
use rand::Rng;

use phasescope::config;
use phasescope::{ColorScheme, FrameSurface, PhaseScope, StereoSample};

/// Synthetic refresh signal, deliberately faster than any sensible
/// render target so the pacer has something to do.
const REFRESH_HZ: u64 = 120;
/// Analysis cadence of the fake producer.
const SAMPLE_HZ: u64 = 40;
/// Rolling window length the producer maintains.
const HISTORY_LEN: usize = 128;

/// Random-walk program material: drifts through in-phase, wide and
/// problem territory so alerts and all four views have something to show.
struct SampleSynth {
    correlation: f32,
    width: f32,
    position: f32,
    correlation_history: Vec<f32>,
    phase_history: Vec<f32>,
}

impl SampleSynth {
    fn new() -> Self {
        Self {
            correlation: 0.9,
            width: 0.4,
            position: 0.0,
            correlation_history: Vec::with_capacity(HISTORY_LEN),
            phase_history: Vec::with_capacity(HISTORY_LEN),
        }
    }

    fn step(&mut self, rng: &mut impl Rng) -> StereoSample {
        self.correlation = (self.correlation + rng.random_range(-0.08..0.08)).clamp(-1.0, 1.0);
        self.width = (self.width + rng.random_range(-0.05..0.05)).clamp(0.0, 2.0);
        self.position = (self.position + rng.random_range(-0.06..0.06)).clamp(-1.0, 1.0);

        let mono = ((self.correlation + 1.0) / 2.0 * (1.0 - self.width * 0.25)).clamp(0.0, 1.0);
        let stability = (1.0 - (1.0 - self.correlation.abs()) * 0.5).clamp(0.0, 1.0);
        let base = rng.random_range(0.3..0.8);
        let tilt = self.position * 0.3;

        push_window(&mut self.correlation_history, self.correlation);
        push_window(&mut self.phase_history, 1.0 - stability);

        StereoSample {
            correlation: self.correlation,
            stereo_width: self.width,
            mono_compatibility: mono,
            phase_stability: stability,
            phase_deviation: (1.0 - stability) * std::f32::consts::PI,
            stereo_position: self.position,
            left_energy: (base - tilt).clamp(0.0, 1.0),
            right_energy: (base + tilt).clamp(0.0, 1.0),
            mid_energy: Some(((self.correlation + 1.0) / 2.0 * base).clamp(0.0, 1.0)),
            side_energy: Some((self.width * 0.5 * base).clamp(0.0, 1.0)),
            correlation_history: Some(self.correlation_history.clone()),
            phase_history: Some(self.phase_history.clone()),
            timestamp_ms: None,
        }
    }
}

fn push_window(window: &mut Vec<f32>, value: f32) {
    if window.len() == HISTORY_LEN {
        window.remove(0);
    }
    window.push(value);
}

fn load_script(path: &std::path::Path) -> anyhow::Result<Vec<StereoSample>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sample script {}", path.display()))?;
    let samples: Vec<StereoSample> = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing sample script {}", path.display()))?;
    Ok(samples)
}

fn main() -> anyhow::Result<()> {
    let (app, viz, cli) = config::load()?;

    let level = app.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let width = app.width.unwrap_or(256);
    let height = app.height.unwrap_or(192);
    let scheme = ColorScheme::by_id_or_default(&viz.color_scheme);

    let surface = FrameSurface::new(width, height, scheme.background);
    let mut scope = PhaseScope::new(surface, viz)?;

    scope.on_phase_alert(Box::new(|message, severity| {
        warn!("phase alert [{}]: {message}", severity.as_str());
    }));
    scope.on_mono_compatibility_alert(Box::new(|value| {
        warn!("mono compatibility down to {value:.2}");
    }));

    let script = match cli.script.as_deref() {
        Some(path) => {
            let samples = load_script(path)?;
            info!("replaying {} scripted samples", samples.len());
            Some(samples)
        }
        None => None,
    };

    let mut synth = SampleSynth::new();
    let mut rng = rand::rng();
    let mut script_cursor = 0usize;

    let started = Instant::now();
    let tick_interval = Duration::from_micros(1_000_000 / REFRESH_HZ);
    let sample_interval = Duration::from_micros(1_000_000 / SAMPLE_HZ);
    let deadline = Duration::from_secs(cli.duration_secs);
    let mut next_sample = Duration::ZERO;

    info!("running for {}s at {REFRESH_HZ}Hz refresh", cli.duration_secs);
    while started.elapsed() < deadline {
        let elapsed = started.elapsed();

        // producer runs at its own cadence, independent of render rate
        if elapsed >= next_sample {
            let sample = match script.as_ref() {
                Some(samples) if !samples.is_empty() => {
                    let s = samples[script_cursor % samples.len()].clone();
                    script_cursor += 1;
                    s
                }
                _ => synth.step(&mut rng),
            };
            scope.submit_sample(sample);
            next_sample = elapsed + sample_interval;
        }

        scope.tick(elapsed.as_millis() as u64);
        thread::sleep(tick_interval);
    }
    scope.stop();

    let stats = scope.stats();
    info!(
        "done: fps {:.1} | quality {:.0}% | {} rendered / {} dropped",
        stats.fps,
        stats.quality * 100.0,
        stats.frames_rendered,
        stats.frames_dropped
    );

    if let Some(path) = cli.snapshot.as_deref() {
        let file = File::create(path)
            .with_context(|| format!("creating snapshot {}", path.display()))?;
        scope
            .surface()
            .write_ppm(&mut BufWriter::new(file))
            .context("writing snapshot")?;
        info!("final frame written to {}", path.display());
    }

    Ok(())
}
