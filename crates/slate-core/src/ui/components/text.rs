// src/ui/components/text.rs
//! Text label primitive

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::ui::element::{DrawError, Frame};
use crate::ui::fonts::{FontId, FontTable};
use crate::ui::redraw::Redraw;

/// Maximum label length in bytes
pub const TEXT_LABEL_LEN: usize = 48;

/// Horizontal padding between the frame and left/right aligned text
const TEXT_PADDING: i32 = 3;

/// Single-line text, vertically centered in its bounds.
///
/// Replacing the text only needs an incremental redraw: the interior is
/// cleared with the fill color and the text drawn again, the frame is kept.
pub struct TextLabel {
    text: heapless::String<TEXT_LABEL_LEN>,
    font: FontId,
    alignment: Alignment,
}

impl TextLabel {
    pub fn new(text: &str, font: FontId) -> Self {
        let mut text_string = heapless::String::new();
        text_string.push_str(text).ok();

        Self {
            text: text_string,
            font,
            alignment: Alignment::Left,
        }
    }

    /// Set the text alignment (Left, Center, or Right).
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Update the displayed text, returning whether it changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        let mut new_text = heapless::String::new();
        new_text.push_str(text).ok();

        if self.text != new_text {
            self.text = new_text;
            true
        } else {
            false
        }
    }

    /// Get the current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    fn text_position(&self, bounds: Rectangle) -> Point {
        let center = bounds.center();
        match self.alignment {
            Alignment::Left => Point::new(bounds.top_left.x + TEXT_PADDING, center.y),
            Alignment::Center => center,
            Alignment::Right => Point::new(
                bounds.top_left.x + bounds.size.width as i32 - 1 - TEXT_PADDING,
                center.y,
            ),
        }
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>> {
        let font = fonts.get(self.font).ok_or(DrawError::MissingFont(self.font))?;
        let style = frame.style;

        if level.is_full() {
            frame
                .bounds
                .into_styled(style.to_primitive_style(frame.is_glowing()))
                .draw(display)
                .map_err(DrawError::Target)?;
        } else if style.fill_enabled {
            // Keep the frame, clear only the interior
            let interior = if style.frame_enabled {
                frame.bounds.offset(-1)
            } else {
                frame.bounds
            };
            interior
                .into_styled(PrimitiveStyle::with_fill(style.fill))
                .draw(display)
                .map_err(DrawError::Target)?;
        }

        let text_style = MonoTextStyle::new(font, style.text);
        let layout = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(
            &self.text,
            self.text_position(frame.bounds),
            text_style,
            layout,
        )
        .draw(display)
        .map_err(DrawError::Target)?;

        Ok(())
    }
}
