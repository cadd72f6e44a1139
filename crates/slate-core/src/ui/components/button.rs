// src/ui/components/button.rs
//! Text button primitive

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, RoundedRectangle};
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};

use crate::ui::core::{Action, TouchInput, TouchPhase, TouchResult};
use crate::ui::element::{DrawError, Frame};
use crate::ui::fonts::{FontId, FontTable};

/// Maximum label length in bytes
pub const BUTTON_LABEL_LEN: usize = 16;

/// Button with a centered text label.
///
/// # Touch Behavior
/// - Glows while pressed and the pointer is over it
/// - Dragging away removes the glow, dragging back restores it
/// - Clicks on release inside its bounds
pub struct Button {
    label: heapless::String<BUTTON_LABEL_LEN>,
    font: FontId,
    border_radius: u32,
}

impl Button {
    pub fn new(label: &str, font: FontId) -> Self {
        let mut label_string = heapless::String::new();
        label_string.push_str(label).ok();

        Self {
            label: label_string,
            font,
            border_radius: 4,
        }
    }

    /// Set the border radius for rounded corners.
    pub fn with_border_radius(mut self, radius: u32) -> Self {
        self.border_radius = radius;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label, returning whether it changed.
    pub fn set_label(&mut self, label: &str) -> bool {
        let mut new_label = heapless::String::new();
        new_label.push_str(label).ok();

        if self.label != new_label {
            self.label = new_label;
            true
        } else {
            false
        }
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
    ) -> Result<(), DrawError<D::Error>> {
        let font = fonts.get(self.font).ok_or(DrawError::MissingFont(self.font))?;
        let style = frame.style;
        let glowing = frame.is_glowing();

        let mut builder = PrimitiveStyleBuilder::new();
        if style.fill_enabled {
            builder = builder.fill_color(if glowing { style.glow } else { style.fill });
        }
        if style.frame_enabled {
            builder = builder
                .stroke_color(style.frame_color(glowing))
                .stroke_width(1);
        }

        let corner_radius = Size::new(self.border_radius, self.border_radius);
        RoundedRectangle::with_equal_corners(frame.bounds, corner_radius)
            .into_styled(builder.build())
            .draw(display)
            .map_err(DrawError::Target)?;

        let text_style = MonoTextStyle::new(font, style.text);
        let layout = TextStyleBuilder::new()
            .alignment(TextAlignment::Center)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(&self.label, frame.bounds.center(), text_style, layout)
            .draw(display)
            .map_err(DrawError::Target)?;

        Ok(())
    }

    pub fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        match input.phase {
            TouchPhase::Down => {
                frame.set_glowing(true);
                TouchResult::Handled
            }
            TouchPhase::Move => {
                // Update pressed state based on whether drag is still over button
                frame.set_glowing(input.is_inside());
                TouchResult::Handled
            }
            TouchPhase::Up => {
                frame.set_glowing(false);
                if input.is_inside() {
                    TouchResult::Action(Action::Clicked(input.id))
                } else {
                    TouchResult::Handled
                }
            }
        }
    }
}
