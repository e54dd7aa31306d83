/*
 *  sample.rs
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
//! One pre-computed stereo-field analysis sample, as delivered by the
//! player's analysis pipeline. Pure data; the engine never mutates a
//! sample after submission.

use serde::{Deserialize, Serialize};

/// A single analysis snapshot of the stereo field.
///
/// `correlation` is the inter-channel correlation coefficient:
/// +1 fully in phase, 0 uncorrelated, -1 fully anti-phase.
/// The optional history vectors are rolling windows maintained by the
/// producer and consumed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoSample {
    pub correlation: f32,
    /// Divergence from pure mono; 0 = mono, larger = wider.
    pub stereo_width: f32,
    /// Estimated survival of the signal under a mono downmix, 0..=1.
    pub mono_compatibility: f32,
    /// Consistency of the phase relationship over a recent window, 0..=1.
    pub phase_stability: f32,
    pub phase_deviation: f32,
    /// Perceived position in the stereo image, -1 (left) ..= +1 (right).
    pub stereo_position: f32,
    pub left_energy: f32,
    pub right_energy: f32,
    pub mid_energy: Option<f32>,
    pub side_energy: Option<f32>,
    pub correlation_history: Option<Vec<f32>>,
    pub phase_history: Option<Vec<f32>>,
    /// Millisecond tick from the producer; stamped on arrival when absent.
    pub timestamp_ms: Option<i64>,
}
