// src/ui/core.rs
//! Core UI types shared by elements, widgets and the element store

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

/// Identifier of an element within its collection.
///
/// Ids are unique per page. Stepper sub-element ids live in the stepper's
/// private collection and never clash with page ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u16);

/// Page identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u8);

/// Radio group identifier, assigned to element records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u8);

/// Id selection when creating an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementIdRequest {
    /// Use this exact id; creation fails if it is already taken on the page
    Fixed(ElementId),
    /// Allocate the next free id on the page
    Auto,
}

impl From<ElementId> for ElementIdRequest {
    fn from(id: ElementId) -> Self {
        ElementIdRequest::Fixed(id)
    }
}

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Touch events that can occur on the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// Initial touch press at a point
    Press(TouchPoint),
    /// Touch drag to a new point
    Drag(TouchPoint),
    /// Pointer lifted at a point
    Release(TouchPoint),
}

impl TouchEvent {
    pub fn phase(&self) -> TouchPhase {
        match self {
            TouchEvent::Press(_) => TouchPhase::Down,
            TouchEvent::Drag(_) => TouchPhase::Move,
            TouchEvent::Release(_) => TouchPhase::Up,
        }
    }

    pub fn point(&self) -> TouchPoint {
        match self {
            TouchEvent::Press(p) | TouchEvent::Drag(p) | TouchEvent::Release(p) => *p,
        }
    }
}

/// Phase of a single-pointer touch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// A touch as seen by one element: phase plus element-relative coordinates.
///
/// The point may lie outside the element (negative or past its size) while a
/// press that started inside is being dragged around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchInput {
    pub id: ElementId,
    pub phase: TouchPhase,
    pub point: Point,
    pub size: Size,
}

impl TouchInput {
    pub fn new(id: ElementId, phase: TouchPhase, point: Point, size: Size) -> Self {
        Self {
            id,
            phase,
            point,
            size,
        }
    }

    /// Whether the touch lies within the element's own extent
    pub fn is_inside(&self) -> bool {
        Rectangle::new(Point::zero(), self.size).contains(self.point)
    }
}

/// Result from handling a touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchResult {
    /// Event was handled by this element
    Handled,
    /// Event was not handled, pass to next element
    NotHandled,
    /// Event triggered an action
    Action(Action),
}

/// Semantic outcomes of touch interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A button was released inside its bounds
    Clicked(ElementId),
    /// A non-radio checkbox changed state
    Toggled { id: ElementId, checked: bool },
    /// A radio checkbox asked to become the checked member of its group
    RadioSelected { id: ElementId },
    /// A slider moved to a new position under the pointer
    PositionChanged { id: ElementId, pos: i16 },
    /// A stepper counter changed through its buttons
    CounterChanged { id: ElementId, counter: i16 },
}

/// Dirty region tracking for efficient rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyRegion {
    pub bounds: Rectangle,
    pub is_dirty: bool,
}

impl DirtyRegion {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            is_dirty: true,
        }
    }

    /// An empty region that becomes dirty on the first expansion
    pub fn clean() -> Self {
        Self {
            bounds: Rectangle::zero(),
            is_dirty: false,
        }
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Expand this dirty region to include another region
    pub fn expand_to_include(&mut self, other: Rectangle) {
        if !self.is_dirty {
            self.bounds = other;
            self.is_dirty = true;
        } else {
            let min_x = self.bounds.top_left.x.min(other.top_left.x);
            let min_y = self.bounds.top_left.y.min(other.top_left.y);

            let max_x = (self.bounds.top_left.x + self.bounds.size.width as i32)
                .max(other.top_left.x + other.size.width as i32);
            let max_y = (self.bounds.top_left.y + self.bounds.size.height as i32)
                .max(other.top_left.y + other.size.height as i32);

            self.bounds = Rectangle::new(
                Point::new(min_x, min_y),
                Size::new((max_x - min_x) as u32, (max_y - min_y) as u32),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_input_inside() {
        let size = Size::new(20, 10);
        let id = ElementId(1);
        assert!(TouchInput::new(id, TouchPhase::Down, Point::new(0, 0), size).is_inside());
        assert!(TouchInput::new(id, TouchPhase::Down, Point::new(19, 9), size).is_inside());
        assert!(!TouchInput::new(id, TouchPhase::Up, Point::new(20, 5), size).is_inside());
        assert!(!TouchInput::new(id, TouchPhase::Move, Point::new(-1, 5), size).is_inside());
    }

    #[test]
    fn test_dirty_region_union() {
        let mut region = DirtyRegion::clean();
        assert!(!region.is_dirty());

        region.expand_to_include(Rectangle::new(Point::new(10, 10), Size::new(10, 10)));
        assert_eq!(
            region.bounds,
            Rectangle::new(Point::new(10, 10), Size::new(10, 10))
        );

        region.expand_to_include(Rectangle::new(Point::new(0, 15), Size::new(5, 20)));
        assert_eq!(
            region.bounds,
            Rectangle::new(Point::new(0, 10), Size::new(20, 25))
        );
    }

    #[test]
    fn test_touch_event_phase() {
        let p = TouchPoint::new(3, 4);
        assert_eq!(TouchEvent::Press(p).phase(), TouchPhase::Down);
        assert_eq!(TouchEvent::Drag(p).phase(), TouchPhase::Move);
        assert_eq!(TouchEvent::Release(p).phase(), TouchPhase::Up);
        assert_eq!(TouchEvent::Release(p).point().to_point(), Point::new(3, 4));
    }
}
