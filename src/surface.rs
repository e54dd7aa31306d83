/*
 *  surface.rs
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
//! Runtime-sized framebuffer the engine renders into. Dimensions are
//! fixed at construction; the host blits or exports the frame.

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use std::io::{self, Write};

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSurface<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor + Clone> FrameSurface<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access (row-major)
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Mutable raw access (useful for pushing regions to a host canvas)
    pub fn as_mut_slice(&mut self) -> &mut [C] { &mut self.buf }

    /// Read a single pixel; None if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<C> {
        self.idx(Point::new(x, y)).map(|i| self.buf[i])
    }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl FrameSurface<Rgb888> {
    /// Dump the frame as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P6\n{} {}\n255", self.w, self.h)?;
        for c in &self.buf {
            out.write_all(&[c.r(), c.g(), c.b()])?;
        }
        Ok(())
    }
}

impl<C: PixelColor> OriginDimensions for FrameSurface<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor + Clone> DrawTarget for FrameSurface<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // fast path for the rectangular fills the primitives use
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let mut it = colors.into_iter();
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let Some(c) = it.next() else { return Ok(()) };
                let p = Point::new(area.top_left.x + col, area.top_left.y + row);
                if let Some(i) = self.idx(p) {
                    self.buf[i] = c;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_clear_and_get() {
        let bg = Rgb888::new(1, 2, 3);
        let mut fb = FrameSurface::new(8, 4, Rgb888::new(0, 0, 0));
        fb.clear_color(bg);
        assert_eq!(fb.get(0, 0), Some(bg));
        assert_eq!(fb.get(7, 3), Some(bg));
        assert_eq!(fb.get(8, 0), None);
        assert_eq!(fb.get(-1, 0), None);
    }

    #[test]
    fn test_out_of_bounds_draw_is_clipped() {
        let mut fb = FrameSurface::new(4, 4, Rgb888::new(0, 0, 0));
        let c = Rgb888::new(9, 9, 9);
        Rectangle::new(Point::new(2, 2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(c))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.get(3, 3), Some(c));
        assert_eq!(fb.get(1, 1), Some(Rgb888::new(0, 0, 0)));
    }

    #[test]
    fn test_ppm_header() {
        let fb = FrameSurface::new(2, 2, Rgb888::new(10, 20, 30));
        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(out.len(), b"P6\n2 2\n255\n".len() + 4 * 3);
    }
}
