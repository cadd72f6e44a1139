//! Checkbox and radio button
//!
//! A checkbox commits on release inside its bounds. A plain checkbox toggles.
//! A radio checkbox only *asks* to be selected by returning
//! [`Action::RadioSelected`]; the element store then unchecks the other
//! members of the radio group on the same page and checks this one. Tapping a
//! checked radio again keeps it checked.
//!
//! The programmatic [`Checkbox::set_state`] and [`Checkbox::toggle`] do not
//! look at the radio group at all.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_layout::prelude::*;

use super::Callback;
use crate::ui::core::{Action, ElementId, TouchInput, TouchPhase, TouchResult};
use crate::ui::element::Frame;
use crate::ui::redraw::Redraw;

/// Drawing style of the checked mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStyle {
    /// Filled inner square
    Box,
    /// Diagonal cross
    Cross,
    /// Circular outline with a filled inner disc
    Round,
}

pub struct Checkbox {
    radio: bool,
    style: CheckStyle,
    checked: bool,
    fill_color: Rgb565,
    pressed: bool,
    on_change: Option<Callback<bool>>,
}

impl Checkbox {
    pub fn new(radio: bool, style: CheckStyle, fill_color: Rgb565, checked: bool) -> Self {
        Self {
            radio,
            style,
            checked,
            fill_color,
            pressed: false,
            on_change: None,
        }
    }

    /// Install a callback fired on touch-committed state changes.
    pub fn with_callback(mut self, callback: Callback<bool>) -> Self {
        self.on_change = Some(callback);
        self
    }

    pub fn set_callback(&mut self, callback: Option<Callback<bool>>) {
        self.on_change = callback;
    }

    pub fn is_radio(&self) -> bool {
        self.radio
    }

    pub fn style(&self) -> CheckStyle {
        self.style
    }

    pub fn fill_color(&self) -> Rgb565 {
        self.fill_color
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Transient pressed flag between a press inside and the release
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Set the state directly. Radio groups are not consulted.
    ///
    /// Returns whether the state changed.
    pub fn set_state(&mut self, frame: &mut Frame, checked: bool) -> bool {
        if self.checked == checked {
            return false;
        }
        self.checked = checked;
        frame.request_redraw(Redraw::Incremental);
        true
    }

    pub fn toggle(&mut self, frame: &mut Frame) {
        let checked = !self.checked;
        self.set_state(frame, checked);
    }

    /// Check this radio as the winner of its group. The store has already
    /// unchecked the other members.
    pub(crate) fn commit_radio(&mut self, frame: &mut Frame, id: ElementId) {
        if self.set_state(frame, true)
            && let Some(callback) = self.on_change.as_mut()
        {
            callback.call(id, true);
        }
    }

    pub fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        match input.phase {
            TouchPhase::Down => {
                if !input.is_inside() {
                    return TouchResult::NotHandled;
                }
                self.pressed = true;
                frame.set_glowing(true);
                TouchResult::Handled
            }
            TouchPhase::Move => TouchResult::Handled,
            TouchPhase::Up => {
                let was_pressed = core::mem::take(&mut self.pressed);
                frame.set_glowing(false);

                if !was_pressed || !input.is_inside() {
                    return TouchResult::Handled;
                }

                if self.radio {
                    return TouchResult::Action(Action::RadioSelected { id: input.id });
                }

                self.toggle(frame);
                if let Some(callback) = self.on_change.as_mut() {
                    callback.call(input.id, self.checked);
                }
                TouchResult::Action(Action::Toggled {
                    id: input.id,
                    checked: self.checked,
                })
            }
        }
    }

    /// Square area holding the mark, centered in `bounds`
    fn mark_area(bounds: Rectangle) -> Rectangle {
        let side = bounds.size.width.min(bounds.size.height);
        let margin = (side / 4).max(2);
        let inner = side.saturating_sub(2 * margin);

        Rectangle::new(Point::zero(), Size::new(inner, inner)).align_to(
            &bounds,
            horizontal::Center,
            vertical::Center,
        )
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        level: Redraw,
    ) -> Result<(), D::Error> {
        let style = frame.style;
        let glowing = frame.is_glowing();
        let mark = Self::mark_area(frame.bounds);

        if level.is_full() {
            match self.style {
                CheckStyle::Box | CheckStyle::Cross => {
                    frame
                        .bounds
                        .into_styled(style.to_primitive_style(glowing))
                        .draw(display)?;
                }
                CheckStyle::Round => {
                    frame
                        .bounds
                        .into_styled(PrimitiveStyle::with_fill(style.fill))
                        .draw(display)?;

                    let diameter = frame.bounds.size.width.min(frame.bounds.size.height);
                    Circle::with_center(frame.bounds.center(), diameter)
                        .into_styled(
                            PrimitiveStyleBuilder::new()
                                .stroke_color(style.frame_color(glowing))
                                .stroke_width(1)
                                .build(),
                        )
                        .draw(display)?;
                }
            }
        } else {
            // Erase the previous mark
            mark.into_styled(PrimitiveStyle::with_fill(style.fill))
                .draw(display)?;
        }

        if !self.checked || mark.is_zero_sized() {
            return Ok(());
        }

        match self.style {
            CheckStyle::Box => {
                mark.into_styled(PrimitiveStyle::with_fill(self.fill_color))
                    .draw(display)?;
            }
            CheckStyle::Cross => {
                let Some(bottom_right) = mark.bottom_right() else {
                    return Ok(());
                };
                let top_left = mark.top_left;
                let line_style = PrimitiveStyle::with_stroke(self.fill_color, 1);

                Line::new(top_left, bottom_right)
                    .into_styled(line_style)
                    .draw(display)?;
                Line::new(
                    Point::new(top_left.x, bottom_right.y),
                    Point::new(bottom_right.x, top_left.y),
                )
                .into_styled(line_style)
                .draw(display)?;
            }
            CheckStyle::Round => {
                Circle::with_center(mark.center(), mark.size.width)
                    .into_styled(PrimitiveStyle::with_fill(self.fill_color))
                    .draw(display)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::styling::{ElementStyle, BLACK, GRAY, RED, WHITE};

    extern crate alloc;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn frame() -> Frame {
        let mut f = Frame::new(
            Rectangle::new(Point::new(10, 10), Size::new(20, 20)),
            ElementStyle::new(GRAY, BLACK, WHITE),
        );
        f.mark_clean();
        f
    }

    fn input(phase: TouchPhase, x: i32, y: i32) -> TouchInput {
        TouchInput::new(ElementId(1), phase, Point::new(x, y), Size::new(20, 20))
    }

    #[test]
    fn test_release_inside_toggles() {
        let mut f = frame();
        let mut cb = Checkbox::new(false, CheckStyle::Box, RED, false);

        cb.handle_touch(&mut f, &input(TouchPhase::Down, 5, 5));
        assert!(cb.is_pressed());
        assert!(!cb.is_checked(), "press alone must not change state");

        let result = cb.handle_touch(&mut f, &input(TouchPhase::Up, 6, 6));
        assert_eq!(
            result,
            TouchResult::Action(Action::Toggled {
                id: ElementId(1),
                checked: true
            })
        );
        assert!(cb.is_checked());
        assert!(!cb.is_pressed());

        cb.handle_touch(&mut f, &input(TouchPhase::Down, 5, 5));
        cb.handle_touch(&mut f, &input(TouchPhase::Up, 5, 5));
        assert!(!cb.is_checked());
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut f = frame();
        let mut cb = Checkbox::new(false, CheckStyle::Cross, RED, false);

        cb.handle_touch(&mut f, &input(TouchPhase::Down, 5, 5));
        cb.handle_touch(&mut f, &input(TouchPhase::Move, 40, 5));
        assert!(cb.is_pressed(), "moving away keeps the pressed flag");

        let result = cb.handle_touch(&mut f, &input(TouchPhase::Up, 40, 5));
        assert_eq!(result, TouchResult::Handled);
        assert!(!cb.is_checked());
        assert!(!cb.is_pressed());
    }

    #[test]
    fn test_radio_release_requests_selection() {
        let mut f = frame();
        let mut cb = Checkbox::new(true, CheckStyle::Round, RED, false);

        cb.handle_touch(&mut f, &input(TouchPhase::Down, 5, 5));
        let result = cb.handle_touch(&mut f, &input(TouchPhase::Up, 5, 5));

        assert_eq!(
            result,
            TouchResult::Action(Action::RadioSelected { id: ElementId(1) })
        );
        assert!(!cb.is_checked(), "the group commits the selection");
    }

    #[test]
    fn test_set_state_skips_callback() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut f = frame();
        let mut cb = Checkbox::new(false, CheckStyle::Box, RED, false)
            .with_callback(Callback::new(move |_, _| counter.set(counter.get() + 1)));

        assert!(cb.set_state(&mut f, true));
        assert!(!cb.set_state(&mut f, true));
        cb.toggle(&mut f);
        assert_eq!(fired.get(), 0);

        cb.handle_touch(&mut f, &input(TouchPhase::Down, 5, 5));
        cb.handle_touch(&mut f, &input(TouchPhase::Up, 5, 5));
        assert_eq!(fired.get(), 1);
        assert!(cb.is_checked());
    }

    #[test]
    fn test_state_change_requests_incremental_redraw() {
        let mut f = frame();
        let mut cb = Checkbox::new(false, CheckStyle::Box, RED, false);
        cb.set_state(&mut f, true);
        assert_eq!(f.redraw(), Redraw::Incremental);
    }

    #[test]
    fn test_draw_box_mark() {
        let f = frame();
        let mut fb = FrameBuffer::new(Size::new(40, 40));
        let mut cb = Checkbox::new(false, CheckStyle::Box, RED, true);

        cb.draw(&mut fb, &f, Redraw::Full).unwrap();
        assert_eq!(fb.pixel(Point::new(20, 20)), Some(RED));
        assert_eq!(fb.pixel(Point::new(10, 10)), Some(GRAY));

        let mut f = f;
        cb.set_state(&mut f, false);
        cb.draw(&mut fb, &f, Redraw::Incremental).unwrap();
        assert_eq!(fb.pixel(Point::new(20, 20)), Some(BLACK));
        assert_eq!(fb.pixel(Point::new(10, 10)), Some(GRAY), "frame kept");
    }
}
