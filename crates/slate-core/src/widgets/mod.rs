//! Extended widgets
//!
//! A widget is the stateful payload attached to an element record. Every
//! widget is owned by exactly one element and lives exactly as long as it.
//! Page elements carry an [`ElementKind`], which is either one of the
//! [`Primitive`] elements or one of the four extended [`Widget`] kinds:
//!
//! - [`Gauge`]: display-only fill bar
//! - [`Checkbox`]: checkbox or radio button
//! - [`Slider`]: draggable position control
//! - [`Stepper`]: compound numeric selector built from primitive sub-elements

mod callback;
pub mod checkbox;
pub mod gauge;
pub mod slider;
pub mod stepper;

pub use callback::Callback;
pub use checkbox::{CheckStyle, Checkbox};
pub use gauge::Gauge;
pub use slider::{Slider, SliderStyle};
pub use stepper::Stepper;

extern crate alloc;
use alloc::boxed::Box;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use thiserror_no_std::Error;

use crate::ui::components::Primitive;
use crate::ui::core::{ElementId, PageId, TouchInput, TouchResult};
use crate::ui::element::{DrawError, ElementBehavior, Frame};
use crate::ui::fonts::FontTable;
use crate::ui::redraw::Redraw;

/// Error types for element and widget operations
#[derive(Debug, Error)]
pub enum WidgetError {
    /// No room left in an element collection
    #[error("Collection full (capacity: {capacity})")]
    CollectionFull {
        /// Capacity of the collection
        capacity: usize,
    },

    /// An explicit element id is already used on the page
    #[error("Element id {0:?} already in use")]
    DuplicateId(ElementId),

    /// Range configuration with `min >= max`
    #[error("Invalid range (min {min} >= max {max})")]
    InvalidRange {
        /// Configured minimum
        min: i16,
        /// Configured maximum
        max: i16,
    },

    /// No page with this id
    #[error("Unknown page {0:?}")]
    UnknownPage(PageId),

    /// A page with this id already exists
    #[error("Page {0:?} already exists")]
    DuplicatePage(PageId),

    /// No room left for another page
    #[error("Page table full (max: {max})")]
    PageTableFull {
        /// Maximum page count
        max: usize,
    },

    /// No element with this id on the page
    #[error("Unknown element {0:?}")]
    UnknownElement(ElementId),

    /// The element exists but holds a different kind of payload
    #[error("Element {id:?} is not a {expected}")]
    KindMismatch {
        /// Element that was looked up
        id: ElementId,
        /// Kind the caller asked for
        expected: &'static str,
    },

    /// No room left in the font table
    #[error("Font table full (max: {max})")]
    FontTableFull {
        /// Maximum font count
        max: usize,
    },

    /// A snapshot could not be encoded or decoded
    #[error("Snapshot codec error: {0:?}")]
    Snapshot(postcard::Error),
}

/// Axis along which a gauge fills or a slider travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The four extended widget kinds
pub enum Widget {
    Gauge(Gauge),
    Checkbox(Checkbox),
    Slider(Slider),
    Stepper(Box<Stepper>),
}

impl Widget {
    /// Short kind name used in errors and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Widget::Gauge(_) => "gauge",
            Widget::Checkbox(_) => "checkbox",
            Widget::Slider(_) => "slider",
            Widget::Stepper(_) => "stepper",
        }
    }
}

/// Payload of a page element
pub enum ElementKind {
    Primitive(Primitive),
    Widget(Widget),
}

impl ElementKind {
    pub fn widget(&self) -> Option<&Widget> {
        match self {
            ElementKind::Widget(w) => Some(w),
            ElementKind::Primitive(_) => None,
        }
    }

    pub fn widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            ElementKind::Widget(w) => Some(w),
            ElementKind::Primitive(_) => None,
        }
    }

    pub fn primitive_mut(&mut self) -> Option<&mut Primitive> {
        match self {
            ElementKind::Primitive(p) => Some(p),
            ElementKind::Widget(_) => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<&Checkbox> {
        match self {
            ElementKind::Widget(Widget::Checkbox(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_checkbox_mut(&mut self) -> Option<&mut Checkbox> {
        match self {
            ElementKind::Widget(Widget::Checkbox(c)) => Some(c),
            _ => None,
        }
    }
}

impl ElementBehavior for ElementKind {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        frame: &Frame,
        fonts: &FontTable,
        level: Redraw,
    ) -> Result<(), DrawError<D::Error>> {
        match self {
            ElementKind::Primitive(p) => p.draw(display, frame, fonts, level),
            ElementKind::Widget(Widget::Gauge(g)) => {
                g.draw(display, frame, level).map_err(DrawError::Target)
            }
            ElementKind::Widget(Widget::Checkbox(c)) => {
                c.draw(display, frame, level).map_err(DrawError::Target)
            }
            ElementKind::Widget(Widget::Slider(s)) => {
                s.draw(display, frame, level).map_err(DrawError::Target)
            }
            ElementKind::Widget(Widget::Stepper(s)) => s.draw(display, frame, fonts, level),
        }
    }

    fn handle_touch(&mut self, frame: &mut Frame, input: &TouchInput) -> TouchResult {
        match self {
            ElementKind::Primitive(p) => p.handle_touch(frame, input),
            ElementKind::Widget(Widget::Gauge(_)) => TouchResult::NotHandled,
            ElementKind::Widget(Widget::Checkbox(c)) => c.handle_touch(frame, input),
            ElementKind::Widget(Widget::Slider(s)) => s.handle_touch(frame, input),
            ElementKind::Widget(Widget::Stepper(s)) => s.handle_touch(frame, input),
        }
    }

    fn is_touchable(&self) -> bool {
        match self {
            ElementKind::Primitive(p) => p.is_touchable(),
            ElementKind::Widget(Widget::Gauge(_)) => false,
            ElementKind::Widget(_) => true,
        }
    }

    fn needs_redraw(&self) -> bool {
        match self {
            ElementKind::Widget(Widget::Stepper(s)) => s.needs_redraw(),
            _ => false,
        }
    }

    fn mark_clean(&mut self) {
        if let ElementKind::Widget(Widget::Stepper(s)) = self {
            s.mark_clean();
        }
    }
}
