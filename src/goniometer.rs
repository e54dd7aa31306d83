/*
 *  goniometer.rs
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
//! Goniometer (vectorscope) view: sum/difference plot of the stereo
//! pair, synthesized as an illustrative Lissajous loop from the
//! aggregate correlation and width readings. The per-sample waveform is
//! not available here, so the figure is a visual approximation, not a
//! signal-accurate goniometer.

use core::f32::consts::{PI, TAU};
use core::fmt::Write as _;

use arrayvec::ArrayString;
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
};

use crate::colors::{ColorScheme, fade};
use crate::config::VizConfig;
use crate::draw::draw_label;
use crate::sample::StereoSample;
use crate::trace::{TRACE_WINDOW_MS_PER_UNIT, TraceHistory};

/// Synthesized loop size at full quality.
pub const GONIO_POINTS: usize = 50;
/// Fraction of the half-extent the figure may occupy.
const SCALE_RATIO: f32 = 0.8;
/// Trail opacity relative to the live figure.
const TRAIL_OPACITY: f32 = 0.6;

/// Figure scale for a surface: `min(w,h)/2 * 0.8`.
#[inline]
pub fn scale_for(width: u32, height: u32) -> f32 {
    width.min(height) as f32 / 2.0 * SCALE_RATIO
}

/// Map a channel pair to surface coordinates. Mid (L+R) runs along X,
/// side (L-R) along negative Y; the mapping is linear and invertible.
pub fn project(left: f32, right: f32, width: u32, height: u32) -> (f32, f32) {
    let scale = scale_for(width, height);
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    (
        cx + (left + right) * 0.5 * scale,
        cy - (left - right) * 0.5 * scale,
    )
}

/// How many loop points to synthesize at a given quality level.
#[inline]
pub fn point_count(quality: f32) -> usize {
    ((GONIO_POINTS as f32 * quality.clamp(0.0, 1.0)).round() as usize).max(2)
}

#[inline]
fn loop_amplitude(sample: &StereoSample, sensitivity: f32) -> f32 {
    ((1.0 - sample.stereo_width * 0.5) * sensitivity).clamp(0.0, 1.0)
}

#[inline]
fn loop_phase(sample: &StereoSample) -> f32 {
    PI * (1.0 - sample.correlation)
}

/// Synthesize the illustrative stereo loop: a phase-offset sinusoid
/// pair whose offset encodes correlation and whose amplitude encodes
/// width. Returns (left, right) pairs in -1..=1.
pub fn synthesize(sample: &StereoSample, quality: f32, sensitivity: f32) -> Vec<(f32, f32)> {
    let count = point_count(quality);
    let amp = loop_amplitude(sample, sensitivity);
    let phase = loop_phase(sample);
    (0..count)
        .map(|i| {
            let theta = i as f32 * TAU / count as f32;
            (theta.sin() * amp, (theta + phase).sin() * amp)
        })
        .collect()
}

/// Surface position of the newest synthesized point; the controller
/// appends this to the trace history.
pub fn trace_anchor(
    sample: &StereoSample,
    quality: f32,
    sensitivity: f32,
    width: u32,
    height: u32,
) -> (f32, f32) {
    let count = point_count(quality);
    let theta = (count - 1) as f32 * TAU / count as f32;
    let amp = loop_amplitude(sample, sensitivity);
    let phase = loop_phase(sample);
    project(theta.sin() * amp, (theta + phase).sin() * amp, width, height)
}

/// Static chrome: concentric circles, crosshair, phase-reference
/// diagonals, channel labels. Also what the Idle state shows.
pub fn draw_backdrop<D>(target: &mut D, config: &VizConfig, scheme: &ColorScheme) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let Size { width, height } = target.size();
    let scale = scale_for(width, height);
    let cx = width as i32 / 2;
    let cy = height as i32 / 2;
    let d45 = (scale * core::f32::consts::FRAC_1_SQRT_2).round() as i32;

    if config.show_grid {
        let style = PrimitiveStyle::with_stroke(scheme.grid, 1);
        // concentric rings at 100/50/25% of scale
        for ratio in [1.0f32, 0.5, 0.25] {
            let diameter = (scale * ratio * 2.0).round() as u32;
            Circle::with_center(Point::new(cx, cy), diameter)
                .into_styled(style)
                .draw(target)?;
        }
        // crosshair
        let r = scale.round() as i32;
        Line::new(Point::new(cx - r, cy), Point::new(cx + r, cy))
            .into_styled(style)
            .draw(target)?;
        Line::new(Point::new(cx, cy - r), Point::new(cx, cy + r))
            .into_styled(style)
            .draw(target)?;
        // +/-45 degree phase-reference diagonals
        Line::new(Point::new(cx - d45, cy - d45), Point::new(cx + d45, cy + d45))
            .into_styled(style)
            .draw(target)?;
        Line::new(Point::new(cx - d45, cy + d45), Point::new(cx + d45, cy - d45))
            .into_styled(style)
            .draw(target)?;
    }

    if config.show_labels {
        draw_label(target, "L", Point::new(cx - d45 - 8, cy - d45 - 9), scheme.text)?;
        draw_label(target, "R", Point::new(cx + d45 + 3, cy - d45 - 9), scheme.text)?;
    }

    Ok(())
}

/// Render the goniometer for one sample. Trail first so the live
/// figure draws over it.
pub fn draw<D>(
    target: &mut D,
    sample: &StereoSample,
    config: &VizConfig,
    scheme: &ColorScheme,
    trace: &TraceHistory,
    quality: f32,
    now_ms: u64,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    draw_backdrop(target, config, scheme)?;
    let Size { width, height } = target.size();

    if config.show_history && trace.len() >= 2 {
        let window = (config.trace_length as u64 * TRACE_WINDOW_MS_PER_UNIT) as f32;
        let mut prev: Option<&crate::trace::TracePoint> = None;
        for point in trace.iter() {
            if let Some(prev_point) = prev {
                let age = now_ms.saturating_sub(point.captured_at_ms) as f32;
                let opacity = (1.0 - age / window).clamp(0.05, 1.0) * TRAIL_OPACITY;
                let color = fade(scheme.trace, scheme.background, opacity);
                Line::new(
                    Point::new(prev_point.x.round() as i32, prev_point.y.round() as i32),
                    Point::new(point.x.round() as i32, point.y.round() as i32),
                )
                .into_styled(PrimitiveStyle::with_stroke(color, 1))
                .draw(target)?;
            }
            prev = Some(point);
        }
    }

    // live figure, newest points most opaque (fade-in by index)
    let points = synthesize(sample, quality, config.sensitivity);
    let count = points.len();
    for (i, (left, right)) in points.iter().enumerate() {
        let opacity = (i + 1) as f32 / count as f32;
        let color = fade(scheme.trace, scheme.background, opacity);
        let (x, y) = project(*left, *right, width, height);
        Circle::with_center(Point::new(x.round() as i32, y.round() as i32), 3)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target)?;
    }

    if config.show_midside {
        if let (Some(mid), Some(side)) = (sample.mid_energy, sample.side_energy) {
            let mut line = ArrayString::<24>::new();
            let _ = write!(line, "M {mid:.2}  S {side:.2}");
            draw_label(target, &line, Point::new(4, 4), scheme.text)?;
        }
    }

    Ok(())
}
