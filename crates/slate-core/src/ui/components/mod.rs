// src/ui/components/mod.rs
//! Primitive elements: box, text label and button
//!
//! [`Primitive`] is the payload of elements that any collection can hold,
//! including the stepper's private sub-collection.

pub mod button;
pub mod text;

pub use button::Button;
pub use text::TextLabel;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Primitive as _;

use crate::ui::core::{TouchInput, TouchResult};
use crate::ui::element::{DrawError, ElementBehavior, Frame};
use crate::ui::fonts::FontTable;
use crate::ui::redraw::Redraw;

/// A primitive element payload
pub enum Primitive {
    /// Filled and/or framed rectangle
    Box,
    Text(TextLabel),
    Button(Button),
}

impl Primitive {
    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            Primitive::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextLabel> {
        match self {
            Primitive::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Primitive::Button(b) => Some(b),
            _ => None,
        }
    }
}

impl ElementBehavior for Primitive {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>> {
        match self {
            Primitive::Box => frame
                .bounds
                .into_styled(frame.style.to_primitive_style(frame.is_glowing()))
                .draw(display)
                .map_err(DrawError::Target),
            Primitive::Text(t) => t.draw(display, frame, fonts, level),
            Primitive::Button(b) => b.draw(display, frame, fonts),
        }
    }

    fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        match self {
            Primitive::Button(b) => b.handle_touch(frame, input),
            Primitive::Box | Primitive::Text(_) => TouchResult::NotHandled,
        }
    }

    fn is_touchable(&self) -> bool {
        matches!(self, Primitive::Button(_))
    }
}
