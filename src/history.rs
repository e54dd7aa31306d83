/*
 *  history.rs
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
//! Correlation history view: the producer-maintained rolling window as
//! a time-series line chart, newest on the right, with a marker for the
//! live reading.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
};

use crate::colors::ColorScheme;
use crate::config::VizConfig;
use crate::draw::draw_label;
use crate::sample::StereoSample;

const MARGIN_LEFT: i32 = 18;
const MARGIN_RIGHT: i32 = 14;
const MARGIN_TOP: i32 = 6;
const MARGIN_BOTTOM: i32 = 6;
const MARKER_DIAMETER: u32 = 5;

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl PlotArea {
    fn for_surface(width: u32, height: u32) -> Self {
        Self {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            w: (width as i32 - MARGIN_LEFT - MARGIN_RIGHT).max(2),
            h: (height as i32 - MARGIN_TOP - MARGIN_BOTTOM).max(2),
        }
    }

    /// Y-axis is inverted: +1 at the top edge, -1 at the bottom.
    fn y_of(&self, value: f32) -> i32 {
        let norm = (value.clamp(-1.0, 1.0) + 1.0) / 2.0;
        self.y + ((1.0 - norm) * (self.h - 1) as f32).round() as i32
    }

    fn x_of(&self, index: usize, len: usize) -> i32 {
        if len < 2 {
            return self.x;
        }
        self.x + (index as f32 / (len - 1) as f32 * (self.w - 1) as f32).round() as i32
    }
}

/// Frame, gridlines and axis labels; also the degraded rendering when
/// no history is available.
pub fn draw_backdrop<D>(target: &mut D, config: &VizConfig, scheme: &ColorScheme) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let Size { width, height } = target.size();
    let plot = PlotArea::for_surface(width, height);
    let style = PrimitiveStyle::with_stroke(scheme.grid, 1);

    if config.show_grid {
        // +1 / 0 / -1 gridlines
        for value in [1.0f32, 0.0, -1.0] {
            let y = plot.y_of(value);
            Line::new(Point::new(plot.x, y), Point::new(plot.x + plot.w - 1, y))
                .into_styled(style)
                .draw(target)?;
        }
        // left axis
        Line::new(
            Point::new(plot.x, plot.y),
            Point::new(plot.x, plot.y + plot.h - 1),
        )
        .into_styled(style)
        .draw(target)?;
    }

    if config.show_labels {
        draw_label(target, "+1", Point::new(2, plot.y_of(1.0) - 3), scheme.text)?;
        draw_label(target, "0", Point::new(2, plot.y_of(0.0) - 3), scheme.text)?;
        draw_label(target, "-1", Point::new(2, plot.y_of(-1.0) - 3), scheme.text)?;
    }

    Ok(())
}

pub fn draw<D>(
    target: &mut D,
    sample: &StereoSample,
    config: &VizConfig,
    scheme: &ColorScheme,
    quality: f32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    draw_backdrop(target, config, scheme)?;
    let Size { width, height } = target.size();
    let plot = PlotArea::for_surface(width, height);

    // fewer than two points: nothing to plot, axes only
    let history = match sample.correlation_history.as_deref() {
        Some(h) if h.len() >= 2 => h,
        _ => return Ok(()),
    };

    // under load, stride over the window instead of thinning the stroke
    let stride = if quality < 0.5 { 2 } else { 1 };
    let len = history.len();
    let style = PrimitiveStyle::with_stroke(scheme.trace, 1);
    let mut prev: Option<Point> = None;
    let mut index = 0;
    while index < len {
        let p = Point::new(plot.x_of(index, len), plot.y_of(history[index]));
        if let Some(pp) = prev {
            Line::new(pp, p).into_styled(style).draw(target)?;
        }
        prev = Some(p);
        if index == len - 1 {
            break;
        }
        index = (index + stride).min(len - 1);
    }

    // live reading marker on the right edge
    let marker = Point::new(
        plot.x + plot.w - 1 + MARGIN_RIGHT / 2,
        plot.y_of(sample.correlation),
    );
    Circle::with_center(marker, MARKER_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(scheme.accent))
        .draw(target)?;

    Ok(())
}
