// src/ui/element.rs
//! Element records
//!
//! An [`Element`] is the unit stored in a [`Collection`](super::Collection):
//! an id, an optional radio group, a [`Frame`] holding the geometry, colors,
//! glow and pending redraw level, and a kind-specific payload `K`.
//!
//! Page collections store `Element<ElementKind>` (primitives plus extended
//! widgets). The stepper's private sub-collection stores `Element<Primitive>`,
//! which keeps the element type non-recursive and lets the stepper draw its
//! children through a translated draw target without recursing into itself.

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::core::{ElementId, GroupId, TouchInput, TouchPhase, TouchResult};
use crate::ui::fonts::{FontId, FontTable};
use crate::ui::redraw::Redraw;
use crate::ui::styling::ElementStyle;

/// Rendering failure reported by an element draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawError<E> {
    /// The draw target rejected a pixel operation
    Target(E),
    /// A text-bearing element refers to a font that was never registered
    MissingFont(FontId),
    /// No element with this id on the current page
    UnknownElement(ElementId),
}

impl<E> fmt::Display for DrawError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::Target(_) => write!(f, "draw target error"),
            DrawError::MissingFont(id) => write!(f, "font {} is not registered", id.0),
            DrawError::UnknownElement(id) => write!(f, "no element {} on the current page", id.0),
        }
    }
}

/// Geometry, colors and redraw state common to every element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub bounds: Rectangle,
    pub style: ElementStyle,
    glow_enabled: bool,
    glowing: bool,
    redraw: Redraw,
}

impl Frame {
    /// New frames start with a pending full redraw.
    pub fn new(bounds: Rectangle, style: ElementStyle) -> Self {
        Self {
            bounds,
            style,
            glow_enabled: true,
            glowing: false,
            redraw: Redraw::Full,
        }
    }

    pub fn redraw(&self) -> Redraw {
        self.redraw
    }

    pub fn request_redraw(&mut self, level: Redraw) {
        self.redraw = self.redraw.merge(level);
    }

    pub fn mark_clean(&mut self) {
        self.redraw = Redraw::None;
    }

    pub fn set_glow_enabled(&mut self, enabled: bool) {
        if self.glow_enabled != enabled {
            self.glow_enabled = enabled;
            self.request_redraw(Redraw::Full);
        }
    }

    /// Glow is only visible when enabled for this element
    pub fn is_glowing(&self) -> bool {
        self.glow_enabled && self.glowing
    }

    /// Change the glow indicator. Frame colors change with it, so a visible
    /// change requires a full redraw.
    pub fn set_glowing(&mut self, glowing: bool) {
        if self.glowing != glowing {
            self.glowing = glowing;
            if self.glow_enabled {
                self.request_redraw(Redraw::Full);
            }
        }
    }

    /// Translate a point in collection space into an element-relative touch.
    pub fn touch_input(&self, id: ElementId, phase: TouchPhase, point: Point) -> TouchInput {
        TouchInput::new(id, phase, point - self.bounds.top_left, self.bounds.size)
    }
}

/// Drawing and touch behavior of an element payload.
///
/// `level` tells the payload how much to repaint: `Full` for everything,
/// `Incremental` for its value-dependent part only.
pub trait ElementBehavior {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>>;

    fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult;

    /// Whether a press may land on this element
    fn is_touchable(&self) -> bool;

    /// Whether any part of the payload has its own pending redraw
    fn needs_redraw(&self) -> bool {
        false
    }

    /// Clear redraw state held inside the payload itself
    fn mark_clean(&mut self) {}
}

/// An element record: identity, frame and payload
#[derive(Debug)]
pub struct Element<K> {
    id: ElementId,
    group: Option<GroupId>,
    frame: Frame,
    kind: K,
}

impl<K: ElementBehavior> Element<K> {
    pub fn new(id: ElementId, frame: Frame, kind: K) -> Self {
        Self {
            id,
            group: None,
            frame,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub fn bounds(&self) -> Rectangle {
        self.frame.bounds
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Split borrow of frame and payload for payload operations that mark
    /// their own element dirty.
    pub fn parts_mut(&mut self) -> (&mut Frame, &mut K) {
        (&mut self.frame, &mut self.kind)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.frame.bounds.contains(point)
    }

    /// Pending redraw level, including redraws requested inside the payload
    pub fn pending_redraw(&self) -> Redraw {
        if self.kind.needs_redraw() {
            self.frame.redraw().merge(Redraw::Incremental)
        } else {
            self.frame.redraw()
        }
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>> {
        self.kind.draw(display, &self.frame, fonts, level)
    }

    pub fn handle_touch(&mut self, phase: TouchPhase, point: Point) -> TouchResult {
        let input = self.frame.touch_input(self.id, phase, point);
        self.kind.handle_touch(&mut self.frame, &input)
    }

    pub fn mark_clean(&mut self) {
        self.frame.mark_clean();
        self.kind.mark_clean();
    }

    pub fn mark_dirty(&mut self) {
        self.frame.request_redraw(Redraw::Full);
    }
}
