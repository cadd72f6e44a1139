//! Gauge: a display-only bar filled in proportion to a value
//!
//! The fill length is the linear interpolation of `value` within `[min, max]`
//! onto the element's inner extent. Horizontal gauges fill from the left edge,
//! vertical gauges from the bottom edge upward.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::warn;

use super::{Orientation, WidgetError};
use crate::ui::element::Frame;
use crate::ui::redraw::Redraw;

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    min: i16,
    max: i16,
    value: i16,
    fill_color: Rgb565,
    orientation: Orientation,
}

impl Gauge {
    /// Create a gauge. `min >= max` is rejected; `value` is clamped.
    pub fn new(
        min: i16,
        max: i16,
        value: i16,
        fill_color: Rgb565,
        orientation: Orientation,
    ) -> Result<Self, WidgetError> {
        if min >= max {
            warn!("Gauge rejected: min {} >= max {}", min, max);
            return Err(WidgetError::InvalidRange { min, max });
        }

        Ok(Self {
            min,
            max,
            value: value.clamp(min, max),
            fill_color,
            orientation,
        })
    }

    pub fn value(&self) -> i16 {
        self.value
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    pub fn fill_color(&self) -> Rgb565 {
        self.fill_color
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Store a new value, clamped to the range.
    ///
    /// Only the fill area depends on the value, so a change requests an
    /// incremental redraw. No callback is involved.
    pub fn update(&mut self, frame: &mut Frame, value: i16) {
        let value = value.clamp(self.min, self.max);
        if self.value != value {
            self.value = value;
            frame.request_redraw(Redraw::Incremental);
        }
    }

    /// Fill length in pixels for an inner extent of `extent` pixels.
    pub fn fill_length(&self, extent: u32) -> u32 {
        let range = self.max as i64 - self.min as i64;
        let offset = self.value as i64 - self.min as i64;
        (offset * extent as i64 / range) as u32
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        level: Redraw,
    ) -> Result<(), D::Error> {
        let style = frame.style;

        if level.is_full() && style.frame_enabled {
            frame
                .bounds
                .into_styled(PrimitiveStyle::with_stroke(style.frame, 1))
                .draw(display)?;
        }

        let inner = if style.frame_enabled {
            frame.bounds.offset(-1)
        } else {
            frame.bounds
        };
        let origin = inner.top_left;
        let Size { width, height } = inner.size;

        let (filled, remainder) = match self.orientation {
            Orientation::Horizontal => {
                let len = self.fill_length(width);
                (
                    Rectangle::new(origin, Size::new(len, height)),
                    Rectangle::new(origin + Point::new(len as i32, 0), Size::new(width - len, height)),
                )
            }
            Orientation::Vertical => {
                let len = self.fill_length(height);
                let empty = height - len;
                (
                    Rectangle::new(origin + Point::new(0, empty as i32), Size::new(width, len)),
                    Rectangle::new(origin, Size::new(width, empty)),
                )
            }
        };

        if !filled.is_zero_sized() {
            filled
                .into_styled(PrimitiveStyle::with_fill(self.fill_color))
                .draw(display)?;
        }
        if !remainder.is_zero_sized() {
            remainder
                .into_styled(PrimitiveStyle::with_fill(style.fill))
                .draw(display)?;
        }

        Ok(())
    }
}
