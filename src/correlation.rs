/*
 *  correlation.rs
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
//! Correlation meter view: a horizontal bar over the fixed anti-phase
//! -> in-phase gradient with a pointer at the current reading, plus
//! numeric readouts.

use core::fmt::Write as _;

use arrayvec::ArrayString;
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

use crate::colors::{ColorScheme, correlation_gradient};
use crate::config::VizConfig;
use crate::draw::{draw_label, draw_readout};
use crate::sample::StereoSample;

const MARGIN: i32 = 10;
const READOUT_LINE_H: i32 = 12;

#[derive(Debug, Clone, Copy)]
struct BarLayout {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

fn layout(width: u32, height: u32) -> BarLayout {
    let w = (width as i32 - 2 * MARGIN).max(2);
    let h = (height as i32 / 8).clamp(8, 24);
    BarLayout { x: MARGIN, y: height as i32 / 4 - h / 2, w, h }
}

/// Horizontal position of a correlation value on the bar.
#[inline]
pub fn pointer_fraction(correlation: f32) -> f32 {
    (correlation.clamp(-1.0, 1.0) + 1.0) / 2.0
}

/// Gradient bar, frame and scale marks; what the Idle state shows.
pub fn draw_backdrop<D>(target: &mut D, config: &VizConfig, scheme: &ColorScheme) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let Size { width, height } = target.size();
    let bar = layout(width, height);

    // red -> yellow -> green, one column at a time
    for col in 0..bar.w {
        let t = col as f32 / (bar.w - 1).max(1) as f32;
        Rectangle::new(Point::new(bar.x + col, bar.y), Size::new(1, bar.h as u32))
            .into_styled(PrimitiveStyle::with_fill(correlation_gradient(t)))
            .draw(target)?;
    }
    Rectangle::new(
        Point::new(bar.x - 1, bar.y - 1),
        Size::new(bar.w as u32 + 2, bar.h as u32 + 2),
    )
    .into_styled(PrimitiveStyle::with_stroke(scheme.grid, 1))
    .draw(target)?;

    if config.show_grid {
        // scale marks at -1, 0, +1
        for frac in [0.0f32, 0.5, 1.0] {
            let x = bar.x + (frac * (bar.w - 1) as f32).round() as i32;
            Rectangle::new(Point::new(x, bar.y + bar.h + 2), Size::new(1, 4))
                .into_styled(PrimitiveStyle::with_fill(scheme.grid))
                .draw(target)?;
        }
    }
    if config.show_labels {
        let y = bar.y + bar.h + 8;
        draw_label(target, "-1", Point::new(bar.x - 4, y), scheme.text)?;
        draw_label(target, "0", Point::new(bar.x + bar.w / 2 - 2, y), scheme.text)?;
        draw_label(target, "+1", Point::new(bar.x + bar.w - 6, y), scheme.text)?;
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
    let bar = layout(width, height);

    // pointer, 3px wide, overhanging the bar slightly
    let frac = pointer_fraction(sample.correlation);
    let px = bar.x + (frac * (bar.w - 1) as f32).round() as i32;
    Rectangle::new(Point::new(px - 1, bar.y - 3), Size::new(3, bar.h as u32 + 6))
        .into_styled(PrimitiveStyle::with_fill(scheme.accent))
        .draw(target)?;

    if config.show_labels {
        let mut y = bar.y + bar.h + 18;
        let mut line = ArrayString::<32>::new();
        let _ = write!(line, "corr  {:+.2}", sample.correlation);
        draw_readout(target, &line, Point::new(bar.x, y), scheme.text)?;
        y += READOUT_LINE_H;

        line.clear();
        let _ = write!(line, "width {:.2}", sample.stereo_width);
        draw_readout(target, &line, Point::new(bar.x, y), scheme.text)?;
        y += READOUT_LINE_H;

        line.clear();
        let _ = write!(line, "mono  {:.2}", sample.mono_compatibility);
        draw_readout(target, &line, Point::new(bar.x, y), scheme.text)?;
        y += READOUT_LINE_H;

        line.clear();
        let _ = write!(line, "phase {:.2}", sample.phase_stability);
        draw_readout(target, &line, Point::new(bar.x, y), scheme.text)?;
    }

    Ok(())
}
