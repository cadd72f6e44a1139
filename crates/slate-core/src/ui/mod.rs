// src/ui/mod.rs
//! Base element model hosting the extended widgets
//!
//! This module provides:
//! - Core touch, action and id types
//! - Element records with frame, glow and pending redraw level
//! - Fixed-capacity collections with press/drag/release tracking
//! - Primitive box, text and button elements
//! - Colors, element styles and the font registry

pub mod collection;
pub mod components;
pub mod core;
pub mod element;
pub mod fonts;
pub mod redraw;
pub mod styling;

/// Display width in pixels (landscape orientation).
pub const DISPLAY_WIDTH_PX: u16 = 320;

/// Display height in pixels (landscape orientation).
pub const DISPLAY_HEIGHT_PX: u16 = 240;

// Re-export commonly used items
pub use collection::Collection;
pub use components::{Button, Primitive, TextLabel};
pub use self::core::{
    Action, DirtyRegion, ElementId, ElementIdRequest, GroupId, PageId, TouchEvent, TouchInput,
    TouchPhase, TouchPoint, TouchResult,
};
pub use element::{DrawError, Element, ElementBehavior, Frame};
pub use fonts::{FontId, FontTable};
pub use redraw::Redraw;
pub use styling::ElementStyle;
