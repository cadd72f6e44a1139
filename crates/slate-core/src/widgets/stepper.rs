//! Stepper: a numeric counter with decrement and increment buttons
//!
//! The stepper is a compound element. It owns a private collection of four
//! primitive sub-elements laid out in its own coordinate space:
//!
//! ```text
//! +-----+-------------------+-----+
//! |  -  |       1234        |  +  |
//! +-----+-------------------+-----+
//! ```
//!
//! Touches arrive already relative to the stepper's top-left corner, which is
//! also the origin of the sub-collection, so they are forwarded unchanged.
//! Drawing goes through a translated draw target for the same reason.
//!
//! The counter wraps around at the `i16` limits.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;
use embedded_layout::prelude::*;
use log::debug;

use super::{Callback, WidgetError};
use crate::ui::collection::Collection;
use crate::ui::components::{Button, Primitive, TextLabel};
use crate::ui::core::{Action, ElementId, ElementIdRequest, TouchInput, TouchResult};
use crate::ui::element::{DrawError, Frame};
use crate::ui::fonts::{FontId, FontTable};
use crate::ui::redraw::Redraw;
use crate::ui::styling::ElementStyle;

const BACKGROUND: ElementId = ElementId(0);
const DECREMENT: ElementId = ElementId(1);
const READOUT: ElementId = ElementId(2);
const INCREMENT: ElementId = ElementId(3);

/// Room for "-32768"
type Readout = heapless::String<8>;

pub struct Stepper {
    counter: i16,
    parts: Collection<Primitive, 4>,
    on_change: Option<Callback<i16>>,
}

impl Stepper {
    /// Build the stepper and its sub-elements for a widget of `size`.
    ///
    /// The buttons are squares as tall as the widget; the readout takes the
    /// space between them.
    pub fn new(
        size: Size,
        style: ElementStyle,
        font: FontId,
        counter: i16,
    ) -> Result<Self, WidgetError> {
        let area = Rectangle::new(Point::zero(), size);
        let side = size.height.min(size.width / 2);
        let button = Rectangle::new(Point::zero(), Size::new(side, side));

        let dec_bounds = button.align_to(&area, horizontal::Left, vertical::Center);
        let inc_bounds = button.align_to(&area, horizontal::Right, vertical::Center);
        let readout_bounds = Rectangle::new(
            Point::zero(),
            Size::new(size.width.saturating_sub(2 * side), size.height),
        )
        .align_to(&area, horizontal::Center, vertical::Center);

        let mut parts = Collection::new();
        parts.add(
            ElementIdRequest::Fixed(BACKGROUND),
            Frame::new(area, style),
            Primitive::Box,
        )?;
        parts.add(
            ElementIdRequest::Fixed(DECREMENT),
            Frame::new(dec_bounds, style),
            Primitive::Button(Button::new("-", font)),
        )?;
        parts.add(
            ElementIdRequest::Fixed(READOUT),
            Frame::new(readout_bounds, style.with_frame_enabled(false)),
            Primitive::Text(TextLabel::new("", font).with_alignment(Alignment::Center)),
        )?;
        parts.add(
            ElementIdRequest::Fixed(INCREMENT),
            Frame::new(inc_bounds, style),
            Primitive::Button(Button::new("+", font)),
        )?;

        let mut stepper = Self {
            counter,
            parts,
            on_change: None,
        };
        stepper.sync_readout();
        Ok(stepper)
    }

    pub fn with_callback(mut self, callback: Callback<i16>) -> Self {
        self.on_change = Some(callback);
        self
    }

    pub fn set_callback(&mut self, callback: Option<Callback<i16>>) {
        self.on_change = callback;
    }

    pub fn counter(&self) -> i16 {
        self.counter
    }

    /// Set the counter directly. Does not invoke the callback.
    pub fn set_counter(&mut self, counter: i16) {
        self.counter = counter;
        self.sync_readout();
    }

    /// Text currently held by the readout sub-element
    pub fn readout(&self) -> &str {
        self.parts
            .get(READOUT)
            .and_then(|e| e.kind().as_text())
            .map_or("", |t| t.text())
    }

    fn sync_readout(&mut self) {
        let mut text = Readout::new();
        write!(text, "{}", self.counter).ok();

        if let Some(element) = self.parts.get_mut(READOUT) {
            let (frame, kind) = element.parts_mut();
            if let Some(label) = kind.as_text_mut()
                && label.set_text(&text)
            {
                frame.request_redraw(Redraw::Incremental);
            }
        }
    }

    pub fn handle_touch(&mut self, _frame: &mut Frame, input: &TouchInput) -> TouchResult {
        let result = self.parts.dispatch(input.phase, input.point);

        let counter = match result {
            TouchResult::Action(Action::Clicked(DECREMENT)) => self.counter.wrapping_sub(1),
            TouchResult::Action(Action::Clicked(INCREMENT)) => self.counter.wrapping_add(1),
            TouchResult::Action(_) => return TouchResult::Handled,
            other => return other,
        };

        debug!("Stepper {:?}: {} -> {}", input.id, self.counter, counter);
        self.counter = counter;
        self.sync_readout();
        if let Some(callback) = self.on_change.as_mut() {
            callback.call(input.id, counter);
        }
        TouchResult::Action(Action::CounterChanged {
            id: input.id,
            counter,
        })
    }

    /// Draw the sub-elements. A full redraw repaints all of them, otherwise
    /// only those with their own pending redraw.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>> {
        let mut local = display.translated(frame.bounds.top_left);
        self.parts.draw(&mut local, fonts, level.is_full())
    }

    pub fn needs_redraw(&self) -> bool {
        self.parts.needs_redraw()
    }

    pub fn mark_clean(&mut self) {
        self.parts.mark_clean();
    }
}
