//! RAM framebuffer with per-pixel change detection.
//!
//! Widgets can draw into this buffer instead of a slow SPI display. After
//! drawing completes, only the rectangular region containing changed pixels is
//! flushed to the hardware display in a single transfer. Writing a pixel with
//! the color it already has is not a change, which makes the buffer a cheap
//! way to check that a repaint produced identical output.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Heap-allocated framebuffer implementing `DrawTarget<Color = Rgb565>`.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a new framebuffer filled with black pixels.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    /// Color of a single pixel, `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Region changed since the last flush or [`FrameBuffer::clear_changes`].
    pub fn changed_region(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    /// Forget pending changes without flushing them anywhere.
    pub fn clear_changes(&mut self) {
        self.dirty = None;
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to a hardware display, then reset the dirty state.
    ///
    /// Only the bounding rectangle of changed pixels is sent, via
    /// `fill_contiguous`. If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        let width = area.size.width as usize;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = self.width as i64;
        let h = self.height as i64;

        let x_start = (area.top_left.x as i64).clamp(0, w) as usize;
        let y_start = (area.top_left.y as i64).clamp(0, h) as usize;
        let x_end = (area.top_left.x as i64 + area.size.width as i64).clamp(0, w) as usize;
        let y_end = (area.top_left.y as i64 + area.size.height as i64).clamp(0, h) as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, StyledDrawable};

    #[test]
    fn test_repaint_with_same_color_is_not_a_change() {
        let mut fb = FrameBuffer::new(Size::new(32, 32));
        let rect = Rectangle::new(Point::new(4, 4), Size::new(8, 8));

        rect.draw_styled(&PrimitiveStyle::with_fill(Rgb565::RED), &mut fb)
            .unwrap();
        assert_eq!(fb.changed_region(), Some(rect));

        fb.clear_changes();
        rect.draw_styled(&PrimitiveStyle::with_fill(Rgb565::RED), &mut fb)
            .unwrap();
        assert_eq!(fb.changed_region(), None);
    }

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut fb = FrameBuffer::new(Size::new(10, 10));
        fb.fill_solid(
            &Rectangle::new(Point::new(-5, 8), Size::new(20, 20)),
            Rgb565::GREEN,
        )
        .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 9)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(9, 8)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(0, 7)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(10, 0)), None);
    }

    #[test]
    fn test_flush_sends_only_changed_region() {
        let mut fb = FrameBuffer::new(Size::new(16, 16));
        fb.fill_solid(&Rectangle::new(Point::new(2, 3), Size::new(4, 2)), Rgb565::BLUE)
            .unwrap();

        let mut target = FrameBuffer::new(Size::new(16, 16));
        fb.flush(&mut target).unwrap();

        assert_eq!(
            target.changed_region(),
            Some(Rectangle::new(Point::new(2, 3), Size::new(4, 2)))
        );
        assert_eq!(fb.changed_region(), None);
    }
}
