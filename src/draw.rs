/*
 *  draw.rs
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
//! Small text helpers shared by the mode renderers.

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_5X8, ascii::FONT_6X10},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};

/// Small annotation text (axis labels, channel letters).
pub fn draw_label<D>(target: &mut D, text: &str, origin: Point, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Text::with_baseline(text, origin, MonoTextStyle::new(&FONT_5X8, color), Baseline::Top)
        .draw(target)?;
    Ok(())
}

/// Numeric readout text, one size up.
pub fn draw_readout<D>(target: &mut D, text: &str, origin: Point, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Text::with_baseline(text, origin, MonoTextStyle::new(&FONT_6X10, color), Baseline::Top)
        .draw(target)?;
    Ok(())
}
