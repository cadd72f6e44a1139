// src/ui/collection.rs
//! Fixed-capacity element collections with single-pointer touch tracking
//!
//! A collection owns its element records, hit-tests presses against them
//! (topmost, i.e. last added, wins), and remembers which element received the
//! press so that the following drags and the release are delivered to the
//! same element even when the pointer leaves it.
//!
//! Pages use `Collection<ElementKind, N>`; the stepper embeds a
//! `Collection<Primitive, 4>` as its private sub-collection.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::Vec;
use log::debug;

use crate::ui::core::{DirtyRegion, ElementId, ElementIdRequest, TouchPhase, TouchResult};
use crate::ui::element::{DrawError, Element, ElementBehavior, Frame};
use crate::ui::fonts::FontTable;
use crate::ui::redraw::Redraw;
use crate::widgets::WidgetError;

/// First id handed out by [`ElementIdRequest::Auto`]
pub const AUTO_ID_BASE: u16 = 0x4000;

pub struct Collection<K, const N: usize> {
    elements: Vec<Element<K>, N>,
    tracked: Option<ElementId>,
    next_auto_id: u16,
}

impl<K: ElementBehavior, const N: usize> Default for Collection<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ElementBehavior, const N: usize> Collection<K, N> {
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            tracked: None,
            next_auto_id: AUTO_ID_BASE,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Add an element record, returning its id.
    pub fn add(
        &mut self,
        request: ElementIdRequest,
        frame: Frame,
        kind: K,
    ) -> Result<ElementId, WidgetError> {
        if self.elements.is_full() {
            return Err(WidgetError::CollectionFull { capacity: N });
        }

        let id = match request {
            ElementIdRequest::Fixed(id) => {
                if self.contains_id(id) {
                    return Err(WidgetError::DuplicateId(id));
                }
                id
            }
            ElementIdRequest::Auto => self.allocate_id(),
        };

        self.elements
            .push(Element::new(id, frame, kind))
            .map_err(|_| WidgetError::CollectionFull { capacity: N })?;

        Ok(id)
    }

    fn contains_id(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id() == id)
    }

    fn allocate_id(&mut self) -> ElementId {
        loop {
            let id = ElementId(self.next_auto_id);
            self.next_auto_id = self.next_auto_id.wrapping_add(1).max(AUTO_ID_BASE);
            if !self.contains_id(id) {
                return id;
            }
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element<K>> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element<K>> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element<K>> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element<K>> {
        self.elements.iter_mut()
    }

    /// Element currently holding the pointer, if a press is in progress
    pub fn tracked(&self) -> Option<ElementId> {
        self.tracked
    }

    /// Topmost touchable element containing `point`
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.kind().is_touchable() && e.contains(point))
            .map(|e| e.id())
    }

    /// Route one touch phase at a collection-space point.
    ///
    /// A press selects the element under the pointer; drags and the release go
    /// to that element wherever the pointer is, in element-relative
    /// coordinates.
    pub fn dispatch(&mut self, phase: TouchPhase, point: Point) -> TouchResult {
        let target = match phase {
            TouchPhase::Down => {
                if let Some(previous) = self.tracked {
                    debug!("Press while {:?} still tracked, dropping it", previous);
                }
                self.tracked = self.element_at(point);
                self.tracked
            }
            TouchPhase::Move => self.tracked,
            TouchPhase::Up => self.tracked.take(),
        };

        let Some(id) = target else {
            return TouchResult::NotHandled;
        };

        match self.get_mut(id) {
            Some(element) => element.handle_touch(phase, point),
            None => TouchResult::NotHandled,
        }
    }

    /// Abandon a press in progress.
    ///
    /// The tracked element gets a release just outside its top-left corner,
    /// so a checkbox or button cancels and a slider ends its drag without
    /// moving.
    pub fn cancel_press(&mut self) {
        let Some(id) = self.tracked.take() else {
            return;
        };

        if let Some(element) = self.get_mut(id) {
            let outside = element.bounds().top_left - Point::new(1, 1);
            debug!("Cancelling press on {:?}", id);
            element.handle_touch(TouchPhase::Up, outside);
        }
    }

    /// Whether any element has a pending redraw
    pub fn needs_redraw(&self) -> bool {
        self.elements.iter().any(|e| e.pending_redraw().is_needed())
    }

    /// Request a full redraw of every element
    pub fn invalidate(&mut self) {
        for element in self.elements.iter_mut() {
            element.mark_dirty();
        }
    }

    /// Bounding box of all elements with a pending redraw
    pub fn dirty_region(&self) -> DirtyRegion {
        let mut region = DirtyRegion::clean();
        for element in self.elements.iter() {
            if element.pending_redraw().is_needed() {
                region.expand_to_include(element.bounds());
            }
        }
        region
    }

    /// Draw elements in insertion order.
    ///
    /// With `force_full` every element is repainted completely; otherwise only
    /// elements with a pending redraw are drawn, at their pending level.
    /// Redraw state is left untouched; call [`Collection::mark_clean`] after a
    /// successful pass.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        fonts: &FontTable,
        force_full: bool,
    ) -> Result<(), DrawError<D::Error>> {
        for element in self.elements.iter() {
            let level = if force_full {
                Redraw::Full
            } else {
                element.pending_redraw()
            };

            if level.is_needed() {
                element.draw(display, fonts, level)?;
            }
        }
        Ok(())
    }

    pub fn mark_clean(&mut self) {
        for element in self.elements.iter_mut() {
            element.mark_clean();
        }
    }
}
