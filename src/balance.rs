/*
 *  balance.rs
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
//! Stereo balance view: image position inside a circle with flanking
//! channel-energy bars. A bar turns the warning color when its channel
//! runs hot (clip risk).

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
};

use crate::colors::ColorScheme;
use crate::config::VizConfig;
use crate::draw::draw_label;
use crate::sample::StereoSample;

/// Energy above this recolors the bar as a clip-risk indicator.
pub const ENERGY_HOT_THRESHOLD: f32 = 0.9;
/// Fraction of the radius the dot and bars may span.
const TRAVEL_RATIO: f32 = 0.8;
const DOT_DIAMETER: u32 = 7;
const BAR_GAP: i32 = 8;

#[inline]
fn radius_for(width: u32, height: u32) -> i32 {
    (width.min(height) / 3) as i32
}

#[inline]
fn bar_width(radius: i32) -> i32 {
    (radius / 4).max(6)
}

/// Circle, horizontal axis and channel letters; what the Idle state
/// shows.
pub fn draw_backdrop<D>(target: &mut D, config: &VizConfig, scheme: &ColorScheme) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let Size { width, height } = target.size();
    let r = radius_for(width, height);
    let cx = width as i32 / 2;
    let cy = height as i32 / 2;
    let style = PrimitiveStyle::with_stroke(scheme.grid, 1);

    Circle::with_center(Point::new(cx, cy), (r * 2) as u32)
        .into_styled(style)
        .draw(target)?;

    if config.show_grid {
        // travel axis and a center tick
        Line::new(Point::new(cx - r, cy), Point::new(cx + r, cy))
            .into_styled(style)
            .draw(target)?;
        Line::new(Point::new(cx, cy - 3), Point::new(cx, cy + 3))
            .into_styled(style)
            .draw(target)?;
    }

    if config.show_labels {
        let bw = bar_width(r);
        draw_label(
            target,
            "L",
            Point::new(cx - r - BAR_GAP - bw / 2 - 2, cy + r - 2),
            scheme.text,
        )?;
        draw_label(
            target,
            "R",
            Point::new(cx + r + BAR_GAP + bw / 2 - 2, cy + r - 2),
            scheme.text,
        )?;
    }

    Ok(())
}

pub fn draw<D>(
    target: &mut D,
    sample: &StereoSample,
    config: &VizConfig,
    scheme: &ColorScheme,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    draw_backdrop(target, config, scheme)?;
    let Size { width, height } = target.size();
    let r = radius_for(width, height);
    let cx = width as i32 / 2;
    let cy = height as i32 / 2;

    // channel energy bars flanking the circle, growing upward
    let bw = bar_width(r);
    let travel = r as f32 * TRAVEL_RATIO;
    let baseline = cy + (travel / 2.0).round() as i32;
    let left_x = cx - r - BAR_GAP - bw;
    let right_x = cx + r + BAR_GAP;
    for (x, energy) in [(left_x, sample.left_energy), (right_x, sample.right_energy)] {
        let level = energy.clamp(0.0, 1.0);
        let bar_h = (level * travel).round() as i32;
        if bar_h > 0 {
            let color = if energy > ENERGY_HOT_THRESHOLD {
                scheme.warning
            } else {
                scheme.trace
            };
            Rectangle::new(
                Point::new(x, baseline - bar_h),
                Size::new(bw as u32, bar_h as u32),
            )
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target)?;
        }
    }

    // position dot along the horizontal travel axis
    let dx = cx + (sample.stereo_position.clamp(-1.0, 1.0) * travel).round() as i32;
    Circle::with_center(Point::new(dx, cy), DOT_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(scheme.accent))
        .draw(target)?;

    Ok(())
}
