/*
 *  controller.rs
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
//! The engine proper: owns configuration, trace history, scheduler and
//! surface; accepts samples at the producer's cadence and renders the
//! active mode on the host's refresh ticks.
//!
//! Everything here runs on one logical thread of control. `submit_sample`
//! is an O(1) overwrite (rendering is lossy by design; alerting is not),
//! and nothing in the tick path blocks or suspends.

use chrono::Utc;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use log::{debug, info, warn};

use crate::alerts::{self, AlertSink, MonoAlertHandler, PhaseAlertHandler};
use crate::colors::ColorScheme;
use crate::config::{ConfigError, DisplayMode, VizConfig};
use crate::pacer::{RenderScheduler, RenderStats};
use crate::sample::StereoSample;
use crate::trace::TraceHistory;
use crate::{balance, correlation, goniometer, history};

/// Stereo-field visualization engine over any RGB draw target. Surface
/// dimensions are fixed for the engine's lifetime; to resize, rebuild.
pub struct PhaseScope<D> {
    surface: D,
    config: VizConfig,
    scheme: &'static ColorScheme,
    scheduler: RenderScheduler,
    trace: TraceHistory,
    sink: AlertSink,
    latest: Option<StereoSample>,
    running: bool,
}

impl<D> PhaseScope<D>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
    D::Error: core::fmt::Debug,
{
    pub fn new(surface: D, config: VizConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheme = ColorScheme::by_id_or_default(&config.color_scheme);
        let scheduler = RenderScheduler::new(config.target_fps);
        let size = surface.size();
        info!(
            "phasescope engine up: {}x{} mode={} scheme={} target_fps={}",
            size.width,
            size.height,
            config.mode.name(),
            scheme.id,
            config.target_fps
        );
        Ok(Self {
            surface,
            config,
            scheme,
            scheduler,
            trace: TraceHistory::new(),
            sink: AlertSink::new(),
            latest: None,
            running: true,
        })
    }

    /// Accept a new analysis sample. Never blocks; only the most recent
    /// sample is rendered, but every sample is alert-checked.
    pub fn submit_sample(&mut self, mut sample: StereoSample) {
        if sample.timestamp_ms.is_none() {
            sample.timestamp_ms = Some(Utc::now().timestamp_millis());
        }
        if self.config.show_warnings {
            let alerts = alerts::evaluate(&sample);
            self.sink.dispatch(&alerts);
        }
        self.latest = Some(sample);
    }

    /// One display-refresh tick. Decides in O(1) whether to draw; a
    /// drawing failure is logged, counted as a dropped frame and never
    /// propagated.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        self.scheduler.on_tick(now_ms);
        if !self.scheduler.should_render(now_ms) {
            return;
        }
        self.scheduler.start_render();
        let completed = match self.render_frame(now_ms) {
            Ok(()) => true,
            Err(e) => {
                warn!("render tick failed: {e:?}");
                false
            }
        };
        self.scheduler.end_render(completed);
    }

    fn render_frame(&mut self, now_ms: u64) -> Result<(), D::Error> {
        // clearing is always the first drawing operation of a tick
        self.surface.clear(self.scheme.background)?;

        let Some(sample) = self.latest.as_ref() else {
            // Idle: no sample yet, chrome only
            return match self.config.mode {
                DisplayMode::Goniometer => {
                    goniometer::draw_backdrop(&mut self.surface, &self.config, self.scheme)
                }
                DisplayMode::Correlation => {
                    correlation::draw_backdrop(&mut self.surface, &self.config, self.scheme)
                }
                DisplayMode::Balance => {
                    balance::draw_backdrop(&mut self.surface, &self.config, self.scheme)
                }
                DisplayMode::History => {
                    history::draw_backdrop(&mut self.surface, &self.config, self.scheme)
                }
            };
        };

        let quality = self.scheduler.quality();
        match self.config.mode {
            DisplayMode::Goniometer => {
                if self.config.show_history {
                    let size = self.surface.size();
                    let (x, y) = goniometer::trace_anchor(
                        sample,
                        quality,
                        self.config.sensitivity,
                        size.width,
                        size.height,
                    );
                    self.trace.push(x, y, now_ms, self.config.trace_length);
                }
                goniometer::draw(
                    &mut self.surface,
                    sample,
                    &self.config,
                    self.scheme,
                    &self.trace,
                    quality,
                    now_ms,
                )
            }
            DisplayMode::Correlation => {
                correlation::draw(&mut self.surface, sample, &self.config, self.scheme)
            }
            DisplayMode::Balance => {
                balance::draw(&mut self.surface, sample, &self.config, self.scheme)
            }
            DisplayMode::History => {
                history::draw(&mut self.surface, sample, &self.config, self.scheme, quality)
            }
        }
    }

    // --- configuration setters; each takes effect on the next tick ---

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.config.mode != mode {
            debug!("display mode -> {}", mode.name());
            self.config.mode = mode;
            // the trail belongs to the goniometer alone
            self.trace.clear();
        }
    }

    pub fn set_show_grid(&mut self, on: bool) {
        self.config.show_grid = on;
    }

    pub fn set_show_labels(&mut self, on: bool) {
        self.config.show_labels = on;
    }

    pub fn set_show_history(&mut self, on: bool) {
        self.config.show_history = on;
        if !on {
            self.trace.clear();
        }
    }

    pub fn set_show_midside(&mut self, on: bool) {
        self.config.show_midside = on;
    }

    pub fn set_show_warnings(&mut self, on: bool) {
        self.config.show_warnings = on;
    }

    pub fn set_trace_length(&mut self, units: u32) {
        self.config.trace_length = units.max(1);
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() && sensitivity > 0.0 {
            self.config.sensitivity = sensitivity;
        }
    }

    pub fn set_color_scheme(&mut self, id: &str) {
        self.scheme = ColorScheme::by_id_or_default(id);
        self.config.color_scheme = self.scheme.id.to_string();
    }

    pub fn set_target_fps(&mut self, fps: i32) {
        self.config.target_fps = fps;
        self.scheduler.set_target_fps(fps);
    }

    // --- outbound contract ---

    pub fn on_phase_alert(&mut self, handler: PhaseAlertHandler) {
        self.sink.set_phase_handler(handler);
    }

    pub fn on_mono_compatibility_alert(&mut self, handler: MonoAlertHandler) {
        self.sink.set_mono_handler(handler);
    }

    /// Read-only render statistics for the host UI.
    pub fn stats(&self) -> RenderStats {
        self.scheduler.stats()
    }

    /// True once the first sample has arrived.
    pub fn is_active(&self) -> bool {
        self.latest.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the render loop; idempotent. Further ticks are no-ops until
    /// `start` is called again.
    pub fn stop(&mut self) {
        if self.running {
            info!("phasescope engine stopped");
            self.running = false;
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// The rendered frame, for the host to blit or export.
    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn scheme(&self) -> &'static ColorScheme {
        self.scheme
    }
}
