//! Slider: a thumb dragged along a track
//!
//! A press inside the slider starts a drag. While dragging, every touch is
//! projected onto the slider axis and the resulting position is clamped to
//! `[pos_min, pos_max]`; the position callback fires whenever that changes
//! the stored value. The release ends the drag wherever it happens and never
//! changes the value itself.
//!
//! Vertical sliders grow upward: the top edge maps to `pos_max`.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use log::warn;

use super::{Callback, Orientation, WidgetError};
use crate::ui::core::{Action, TouchInput, TouchPhase, TouchResult};
use crate::ui::element::Frame;
use crate::ui::redraw::Redraw;
use crate::ui::styling::GRAY;

/// Cosmetic slider decorations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderStyle {
    /// Colored trim drawn along the track up to the thumb
    pub trim: Option<Rgb565>,
    /// Number of tick divisions along the track (0 for none)
    pub tick_divisions: u16,
    /// Tick length in pixels
    pub tick_length: u16,
    pub tick_color: Rgb565,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            trim: None,
            tick_divisions: 0,
            tick_length: 0,
            tick_color: GRAY,
        }
    }
}

pub struct Slider {
    orientation: Orientation,
    thumb_size: u16,
    pos_min: i16,
    pos_max: i16,
    pos: i16,
    style: SliderStyle,
    dragging: bool,
    on_position_changed: Option<Callback<i16>>,
}

impl Slider {
    /// Create a slider. `pos_min >= pos_max` is rejected; `pos` is clamped.
    pub fn new(
        orientation: Orientation,
        thumb_size: u16,
        pos_min: i16,
        pos_max: i16,
        pos: i16,
    ) -> Result<Self, WidgetError> {
        if pos_min >= pos_max {
            warn!("Slider rejected: min {} >= max {}", pos_min, pos_max);
            return Err(WidgetError::InvalidRange {
                min: pos_min,
                max: pos_max,
            });
        }

        Ok(Self {
            orientation,
            thumb_size,
            pos_min,
            pos_max,
            pos: pos.clamp(pos_min, pos_max),
            style: SliderStyle::default(),
            dragging: false,
            on_position_changed: None,
        })
    }

    pub fn with_style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_position_callback(mut self, callback: Callback<i16>) -> Self {
        self.on_position_changed = Some(callback);
        self
    }

    /// Replace the decorations. Ticks and trim span the whole widget, so this
    /// requests a full redraw.
    pub fn set_style(&mut self, frame: &mut Frame, style: SliderStyle) {
        if self.style != style {
            self.style = style;
            frame.request_redraw(Redraw::Full);
        }
    }

    pub fn set_position_callback(&mut self, callback: Option<Callback<i16>>) {
        self.on_position_changed = callback;
    }

    pub fn pos(&self) -> i16 {
        self.pos
    }

    pub fn pos_min(&self) -> i16 {
        self.pos_min
    }

    pub fn pos_max(&self) -> i16 {
        self.pos_max
    }

    pub fn thumb_size(&self) -> u16 {
        self.thumb_size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn style(&self) -> &SliderStyle {
        &self.style
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Set the position directly, clamped. Does not invoke the callback.
    pub fn set_pos(&mut self, frame: &mut Frame, pos: i16) {
        let pos = pos.clamp(self.pos_min, self.pos_max);
        if self.pos != pos {
            self.pos = pos;
            frame.request_redraw(Redraw::Incremental);
        }
    }

    fn range(&self) -> i64 {
        self.pos_max as i64 - self.pos_min as i64
    }

    /// Project an element-relative touch point onto the position range.
    pub fn position_from_touch(&self, point: Point, size: Size) -> i16 {
        let (along, extent) = match self.orientation {
            Orientation::Horizontal => (point.x as i64, size.width as i64),
            Orientation::Vertical => (size.height as i64 - point.y as i64, size.height as i64),
        };
        if extent == 0 {
            return self.pos_min;
        }

        let raw = self.pos_min as i64 + along * self.range() / extent;
        raw.clamp(self.pos_min as i64, self.pos_max as i64) as i16
    }

    /// Pixel on an axis `extent` pixels long that projects back onto the
    /// current position, measured from the left or top edge.
    ///
    /// When the axis has at least as many pixels as the range has steps,
    /// [`Slider::position_from_touch`] maps this pixel to [`Slider::pos`]
    /// exactly. The far extreme (`pos_max` horizontally, `pos_min`
    /// vertically) projects just past the edge and is pinned to the last
    /// pixel.
    pub fn thumb_center(&self, extent: u32) -> u32 {
        if extent == 0 {
            return 0;
        }
        let extent = extent as i64;
        let range = self.range();
        let steps = self.pos as i64 - self.pos_min as i64;
        // Rounded up so that the truncating projection lands on `pos`
        let along = (steps * extent + range - 1) / range;

        let center = match self.orientation {
            Orientation::Horizontal => along,
            Orientation::Vertical => extent - along,
        };
        center.clamp(0, extent - 1) as u32
    }

    /// Leading edge of the thumb, relative to an inner area that starts
    /// `inset` pixels into an axis `extent` pixels long.
    ///
    /// The thumb is centred on [`Slider::thumb_center`] and kept inside the
    /// inner area. Horizontal offsets grow with the position; vertical
    /// offsets shrink as the position grows.
    pub fn thumb_offset(&self, extent: u32, inset: u32) -> u32 {
        let thumb = self.thumb_size as u32;
        let travel = extent.saturating_sub(2 * inset).saturating_sub(thumb);
        self.thumb_center(extent)
            .saturating_sub(inset + thumb / 2)
            .min(travel)
    }

    fn track(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        let pos = self.position_from_touch(input.point, input.size);
        if pos == self.pos {
            return TouchResult::Handled;
        }

        self.pos = pos;
        frame.request_redraw(Redraw::Incremental);
        if let Some(callback) = self.on_position_changed.as_mut() {
            callback.call(input.id, pos);
        }
        TouchResult::Action(Action::PositionChanged { id: input.id, pos })
    }

    pub fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        match input.phase {
            TouchPhase::Down => {
                if !input.is_inside() {
                    return TouchResult::NotHandled;
                }
                self.dragging = true;
                frame.set_glowing(true);
                self.track(frame, input)
            }
            TouchPhase::Move => {
                if self.dragging {
                    self.track(frame, input)
                } else {
                    TouchResult::Handled
                }
            }
            TouchPhase::Up => {
                self.dragging = false;
                frame.set_glowing(false);
                TouchResult::Handled
            }
        }
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        level: Redraw,
    ) -> Result<(), D::Error> {
        let style = frame.style;
        let glowing = frame.is_glowing();

        let inset = if style.frame_enabled { 1 } else { 0 };
        let inner = frame.bounds.offset(-(inset as i32));

        if level.is_full() {
            frame
                .bounds
                .into_styled(style.to_primitive_style(glowing))
                .draw(display)?;
        } else {
            // The thumb may be anywhere, repaint the interior
            inner
                .into_styled(PrimitiveStyle::with_fill(style.fill))
                .draw(display)?;
        }

        if inner.is_zero_sized() {
            return Ok(());
        }

        let origin = inner.top_left;
        let Size { width, height } = inner.size;
        let thumb = self.thumb_size as u32;
        let half_thumb = (thumb / 2) as i32;
        let track_color = style.frame_color(glowing);

        let (thumb_rect, track_start, track_end, thumb_center) = match self.orientation {
            Orientation::Horizontal => {
                let mid = origin.y + height as i32 / 2;
                let offset = self.thumb_offset(frame.bounds.size.width, inset) as i32;
                (
                    Rectangle::new(origin + Point::new(offset, 0), Size::new(thumb.min(width), height)),
                    Point::new(origin.x + half_thumb, mid),
                    Point::new(origin.x + width as i32 - 1 - half_thumb, mid),
                    Point::new(origin.x + offset + half_thumb, mid),
                )
            }
            Orientation::Vertical => {
                let mid = origin.x + width as i32 / 2;
                let offset = self.thumb_offset(frame.bounds.size.height, inset) as i32;
                (
                    Rectangle::new(origin + Point::new(0, offset), Size::new(width, thumb.min(height))),
                    Point::new(mid, origin.y + height as i32 - 1 - half_thumb),
                    Point::new(mid, origin.y + half_thumb),
                    Point::new(mid, origin.y + offset + half_thumb),
                )
            }
        };

        Line::new(track_start, track_end)
            .into_styled(PrimitiveStyle::with_stroke(track_color, 1))
            .draw(display)?;

        if self.style.tick_divisions > 0 && self.style.tick_length > 0 {
            let divisions = self.style.tick_divisions as i32;
            let length = self.style.tick_length as i32;
            let tick_style = PrimitiveStyle::with_stroke(self.style.tick_color, 1);

            for i in 0..=divisions {
                let tick = match self.orientation {
                    Orientation::Horizontal => {
                        let span = track_end.x - track_start.x;
                        let x = track_start.x + i * span / divisions;
                        Line::new(Point::new(x, track_start.y), Point::new(x, track_start.y + length))
                    }
                    Orientation::Vertical => {
                        let span = track_start.y - track_end.y;
                        let y = track_start.y - i * span / divisions;
                        Line::new(Point::new(track_start.x, y), Point::new(track_start.x + length, y))
                    }
                };
                tick.into_styled(tick_style).draw(display)?;
            }
        }

        if let Some(trim) = self.style.trim {
            let shift = match self.orientation {
                Orientation::Horizontal => Point::new(0, 1),
                Orientation::Vertical => Point::new(1, 0),
            };
            Line::new(track_start + shift, thumb_center + shift)
                .into_styled(PrimitiveStyle::with_stroke(trim, 1))
                .draw(display)?;
        }

        thumb_rect
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(style.fill)
                    .stroke_color(track_color)
                    .stroke_width(1)
                    .build(),
            )
            .draw(display)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::core::ElementId;
    use crate::ui::styling::{ElementStyle, BLACK, RED, WHITE};

    extern crate alloc;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn frame(w: u32, h: u32) -> Frame {
        let mut f = Frame::new(
            Rectangle::new(Point::zero(), Size::new(w, h)),
            ElementStyle::new(GRAY, BLACK, WHITE),
        );
        f.mark_clean();
        f
    }

    fn input(phase: TouchPhase, x: i32, y: i32, size: Size) -> TouchInput {
        TouchInput::new(ElementId(7), phase, Point::new(x, y), size)
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(matches!(
            Slider::new(Orientation::Horizontal, 8, 5, 5, 5),
            Err(WidgetError::InvalidRange { min: 5, max: 5 })
        ));
    }

    #[test]
    fn test_set_pos_clamps_without_callback() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = calls.clone();
        let mut f = frame(256, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 8, 0, 255, 128)
            .unwrap()
            .with_position_callback(Callback::new(move |id, pos| log.borrow_mut().push((id, pos))));

        slider.set_pos(&mut f, 200);
        assert_eq!(slider.pos(), 200);
        assert_eq!(f.redraw(), Redraw::Incremental);

        slider.set_pos(&mut f, 1000);
        assert_eq!(slider.pos(), 255);
        slider.set_pos(&mut f, -1000);
        assert_eq!(slider.pos(), 0);

        assert!(calls.borrow().is_empty(), "set_pos must not call back");
    }

    #[test]
    fn test_drag_past_end_calls_back_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = calls.clone();
        let size = Size::new(256, 20);
        let mut f = frame(256, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 8, 0, 255, 128)
            .unwrap()
            .with_position_callback(Callback::new(move |id, pos| log.borrow_mut().push((id, pos))));

        slider.set_pos(&mut f, 200);

        // Press right where the thumb already is: no change
        let result = slider.handle_touch(&mut f, &input(TouchPhase::Down, 201, 10, size));
        assert_eq!(result, TouchResult::Handled);
        assert!(slider.is_dragging());

        let result = slider.handle_touch(&mut f, &input(TouchPhase::Move, 400, 10, size));
        assert_eq!(
            result,
            TouchResult::Action(Action::PositionChanged {
                id: ElementId(7),
                pos: 255
            })
        );
        slider.handle_touch(&mut f, &input(TouchPhase::Move, 500, 40, size));
        slider.handle_touch(&mut f, &input(TouchPhase::Up, 500, 40, size));

        assert_eq!(slider.pos(), 255);
        assert!(!slider.is_dragging());
        assert_eq!(calls.borrow().as_slice(), &[(ElementId(7), 255)]);
    }

    #[test]
    fn test_release_does_not_move() {
        let size = Size::new(100, 20);
        let mut f = frame(100, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 8, 0, 100, 50).unwrap();

        slider.handle_touch(&mut f, &input(TouchPhase::Down, 50, 10, size));
        slider.handle_touch(&mut f, &input(TouchPhase::Up, 90, 10, size));
        assert_eq!(slider.pos(), 50);

        // Moves without a drag are ignored
        slider.handle_touch(&mut f, &input(TouchPhase::Move, 10, 10, size));
        assert_eq!(slider.pos(), 50);
    }

    #[test]
    fn test_press_outside_not_handled() {
        let size = Size::new(100, 20);
        let mut f = frame(100, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 8, 0, 100, 50).unwrap();

        let result = slider.handle_touch(&mut f, &input(TouchPhase::Down, 120, 10, size));
        assert_eq!(result, TouchResult::NotHandled);
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_vertical_projection() {
        let size = Size::new(20, 100);
        let slider = Slider::new(Orientation::Vertical, 8, 0, 100, 0).unwrap();

        assert_eq!(slider.position_from_touch(Point::new(5, 0), size), 100);
        assert_eq!(slider.position_from_touch(Point::new(5, 100), size), 0);
        assert_eq!(slider.position_from_touch(Point::new(5, 25), size), 75);
        assert_eq!(slider.position_from_touch(Point::new(5, -30), size), 100);
        assert_eq!(slider.position_from_touch(Point::new(5, 140), size), 0);
    }

    #[test]
    fn test_thumb_offset_monotonic() {
        let mut f = frame(120, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 20, -500, 500, -500).unwrap();
        let mut last = 0;
        for pos in -500..=500 {
            slider.set_pos(&mut f, pos);
            let offset = slider.thumb_offset(120, 0);
            assert!(offset >= last, "thumb must not move back at pos {}", pos);
            assert!(offset <= 100);
            last = offset;
        }
        assert_eq!(last, 100);

        let mut vertical = Slider::new(Orientation::Vertical, 10, 0, 10, 0).unwrap();
        let mut last = u32::MAX;
        for pos in 0..=10 {
            vertical.set_pos(&mut f, pos);
            let offset = vertical.thumb_offset(110, 0);
            assert!(offset < last, "vertical thumb rises as pos grows");
            last = offset;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_tap_on_thumb_center_keeps_position() {
        let mut f = frame(256, 20);
        let size = Size::new(256, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 10, 0, 255, 0).unwrap();
        for pos in 0..255 {
            slider.set_pos(&mut f, pos);
            let x = slider.thumb_center(size.width) as i32;
            assert_eq!(slider.position_from_touch(Point::new(x, 10), size), pos);
        }

        let size = Size::new(20, 100);
        let mut vertical = Slider::new(Orientation::Vertical, 10, 0, 100, 0).unwrap();
        for pos in 1..=100 {
            vertical.set_pos(&mut f, pos);
            let y = vertical.thumb_center(size.height) as i32;
            assert_eq!(vertical.position_from_touch(Point::new(5, y), size), pos);
        }
    }

    #[test]
    fn test_set_style_requests_full_redraw() {
        let mut f = frame(100, 20);
        let mut slider = Slider::new(Orientation::Horizontal, 8, 0, 100, 50).unwrap();
        let style = SliderStyle {
            trim: Some(RED),
            tick_divisions: 4,
            tick_length: 3,
            tick_color: WHITE,
        };

        slider.set_style(&mut f, style);
        assert_eq!(f.redraw(), Redraw::Full);
        assert_eq!(slider.style(), &style);
    }

    #[test]
    fn test_draw_trim_and_thumb() {
        let f = frame(110, 21);
        let slider = Slider::new(Orientation::Horizontal, 10, 0, 98, 98)
            .unwrap()
            .with_style(SliderStyle {
                trim: Some(RED),
                ..SliderStyle::default()
            });
        let mut fb = FrameBuffer::new(Size::new(120, 30));

        slider.draw(&mut fb, &f, Redraw::Full).unwrap();

        // Inner area is 108x19 starting at (1, 1); track runs along y = 10
        assert_eq!(fb.pixel(Point::new(20, 10)), Some(GRAY), "track");
        assert_eq!(fb.pixel(Point::new(20, 11)), Some(RED), "trim");
        assert_eq!(fb.pixel(Point::new(20, 5)), Some(BLACK), "background");
        // Thumb sits at the far end
        assert_eq!(fb.pixel(Point::new(99, 5)), Some(GRAY), "thumb edge");
    }
}
