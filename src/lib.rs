/*
 *  lib.rs
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
//! Real-time stereo-field visualization engine for a music player:
//! goniometer, correlation meter, stereo balance and correlation
//! history views over any embedded-graphics RGB draw target, with an
//! adaptive frame-quality scheduler and phase / mono-compatibility
//! alerting.
//!
//! The engine is single-threaded and cooperative: the host pushes
//! samples with [`PhaseScope::submit_sample`] at the analysis cadence
//! and calls [`PhaseScope::tick`] on its display-refresh signal.

pub mod alerts;
pub mod balance;
pub mod colors;
pub mod config;
pub mod controller;
pub mod correlation;
pub mod draw;
pub mod goniometer;
pub mod history;
pub mod pacer;
pub mod sample;
pub mod surface;
pub mod trace;

pub use alerts::{Alert, AlertKind, AlertSeverity};
pub use colors::ColorScheme;
pub use config::{ConfigError, DisplayMode, VizConfig};
pub use controller::PhaseScope;
pub use pacer::RenderStats;
pub use sample::StereoSample;
pub use surface::FrameSurface;
pub use trace::TraceHistory;
