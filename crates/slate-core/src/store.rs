//! Element store: pages of elements, touch routing and the redraw pass
//!
//! The store owns every page collection, the font table and the current page.
//! Applications create elements through the `create_*` functions, feed touch
//! events to [`ElementStore::handle_touch`] and call
//! [`ElementStore::redraw`] once per frame to repaint whatever became dirty.
//!
//! Radio groups are resolved here: a radio checkbox only reports that it was
//! selected, and the store unchecks the other members of its group on the
//! same page before checking it.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use log::{debug, info};

use crate::ui::collection::Collection;
use crate::ui::components::{Button, Primitive, TextLabel};
use crate::ui::core::{
    Action, DirtyRegion, ElementId, ElementIdRequest, GroupId, PageId, TouchEvent, TouchResult,
};
use crate::ui::element::{DrawError, Element, Frame};
use crate::ui::fonts::{FontId, FontTable};
use crate::ui::redraw::Redraw;
use crate::ui::styling::{BLACK, ElementStyle};
use crate::widgets::{
    Callback, Checkbox, ElementKind, Gauge, Slider, SliderStyle, Stepper, Widget, WidgetError,
};

extern crate alloc;
use alloc::boxed::Box;

struct Page<const N: usize> {
    id: PageId,
    elements: Collection<ElementKind, N>,
}

/// Owner of all pages and elements.
///
/// `PAGES` bounds the number of pages and `ELEMS` the number of elements per
/// page.
pub struct ElementStore<const PAGES: usize, const ELEMS: usize> {
    pages: Vec<Page<ELEMS>, PAGES>,
    current: Option<PageId>,
    fonts: FontTable,
    background: Rgb565,
    /// The whole screen must be cleared before the next redraw
    page_changed: bool,
}

impl<const PAGES: usize, const ELEMS: usize> Default for ElementStore<PAGES, ELEMS> {
    fn default() -> Self {
        Self::new(BLACK)
    }
}

impl<const PAGES: usize, const ELEMS: usize> ElementStore<PAGES, ELEMS> {
    /// Create an empty store. `background` clears the screen on page changes.
    pub fn new(background: Rgb565) -> Self {
        Self {
            pages: Vec::new(),
            current: None,
            fonts: FontTable::new(),
            background,
            page_changed: true,
        }
    }

    /// Add an empty page. The first page added becomes the current page.
    pub fn add_page(&mut self, id: PageId) -> Result<(), WidgetError> {
        if self.pages.iter().any(|p| p.id == id) {
            return Err(WidgetError::DuplicatePage(id));
        }

        self.pages
            .push(Page {
                id,
                elements: Collection::new(),
            })
            .map_err(|_| WidgetError::PageTableFull { max: PAGES })?;

        if self.current.is_none() {
            self.current = Some(id);
            self.page_changed = true;
        }
        info!("Added page {:?}", id);
        Ok(())
    }

    pub fn current_page(&self) -> Option<PageId> {
        self.current
    }

    /// Switch pages. A press in progress on the old page is cancelled. The
    /// next redraw clears the screen and repaints the new page completely.
    pub fn set_current_page(&mut self, id: PageId) -> Result<(), WidgetError> {
        self.page_index(id)?;
        if self.current != Some(id) {
            if let Some(elements) = self.current_elements_mut() {
                elements.cancel_press();
            }
            info!("Switching to page {:?}", id);
            self.current = Some(id);
            self.page_changed = true;
        }
        Ok(())
    }

    /// Register a font under `id`, replacing any font already there.
    pub fn add_font(&mut self, id: FontId, font: &'static MonoFont<'static>) -> Result<(), WidgetError> {
        self.fonts.add(id, font)
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    fn page_index(&self, id: PageId) -> Result<usize, WidgetError> {
        self.pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(WidgetError::UnknownPage(id))
    }

    /// Elements of a page, in drawing order
    pub fn page(&self, id: PageId) -> Result<&Collection<ElementKind, ELEMS>, WidgetError> {
        let index = self.page_index(id)?;
        Ok(&self.pages[index].elements)
    }

    pub(crate) fn page_mut(
        &mut self,
        id: PageId,
    ) -> Result<&mut Collection<ElementKind, ELEMS>, WidgetError> {
        let index = self.page_index(id)?;
        Ok(&mut self.pages[index].elements)
    }

    fn current_elements_mut(&mut self) -> Option<&mut Collection<ElementKind, ELEMS>> {
        let id = self.current?;
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| &mut p.elements)
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    fn create(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        kind: ElementKind,
    ) -> Result<ElementId, WidgetError> {
        let name = match &kind {
            ElementKind::Widget(w) => w.kind_name(),
            ElementKind::Primitive(Primitive::Box) => "box",
            ElementKind::Primitive(Primitive::Text(_)) => "text",
            ElementKind::Primitive(Primitive::Button(_)) => "button",
        };

        let id = self
            .page_mut(page)?
            .add(id, Frame::new(bounds, style), kind)?;

        info!("Created {} {:?} on page {:?} at {:?}", name, id, page, bounds);
        Ok(id)
    }

    pub fn create_box(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
    ) -> Result<ElementId, WidgetError> {
        self.create(page, id, bounds, style, ElementKind::Primitive(Primitive::Box))
    }

    pub fn create_text(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        label: TextLabel,
    ) -> Result<ElementId, WidgetError> {
        self.create(page, id, bounds, style, ElementKind::Primitive(Primitive::Text(label)))
    }

    pub fn create_button(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        button: Button,
    ) -> Result<ElementId, WidgetError> {
        self.create(page, id, bounds, style, ElementKind::Primitive(Primitive::Button(button)))
    }

    /// Create a gauge element. Build the gauge with [`Gauge::new`], which
    /// rejects an empty range.
    pub fn create_gauge(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        gauge: Gauge,
    ) -> Result<ElementId, WidgetError> {
        self.create(page, id, bounds, style, ElementKind::Widget(Widget::Gauge(gauge)))
    }

    /// Create a checkbox, optionally as a member of a radio group.
    pub fn create_checkbox(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        checkbox: Checkbox,
        group: Option<GroupId>,
    ) -> Result<ElementId, WidgetError> {
        let id = self.create(page, id, bounds, style, ElementKind::Widget(Widget::Checkbox(checkbox)))?;
        if group.is_some() {
            self.set_group(page, id, group)?;
        }
        Ok(id)
    }

    pub fn create_slider(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        slider: Slider,
    ) -> Result<ElementId, WidgetError> {
        self.create(page, id, bounds, style, ElementKind::Widget(Widget::Slider(slider)))
    }

    /// Create a stepper with its sub-elements laid out to fit `bounds`.
    pub fn create_stepper(
        &mut self,
        page: PageId,
        id: ElementIdRequest,
        bounds: Rectangle,
        style: ElementStyle,
        font: FontId,
        counter: i16,
    ) -> Result<ElementId, WidgetError> {
        let stepper = Stepper::new(bounds.size, style, font, counter)?;
        self.create(
            page,
            id,
            bounds,
            style,
            ElementKind::Widget(Widget::Stepper(Box::new(stepper))),
        )
    }

    // ---------------------------------------------------------------------
    // Element access
    // ---------------------------------------------------------------------

    pub fn element(&self, page: PageId, id: ElementId) -> Result<&Element<ElementKind>, WidgetError> {
        self.page(page)?
            .get(id)
            .ok_or(WidgetError::UnknownElement(id))
    }

    fn element_mut(
        &mut self,
        page: PageId,
        id: ElementId,
    ) -> Result<&mut Element<ElementKind>, WidgetError> {
        self.page_mut(page)?
            .get_mut(id)
            .ok_or(WidgetError::UnknownElement(id))
    }

    pub fn widget(&self, page: PageId, id: ElementId) -> Result<&Widget, WidgetError> {
        self.element(page, id)?
            .kind()
            .widget()
            .ok_or(WidgetError::KindMismatch {
                id,
                expected: "widget",
            })
    }

    /// Mutable access to a widget payload.
    ///
    /// Changes made this way bypass the redraw bookkeeping of the typed
    /// setters, so the element is marked for a full redraw.
    pub fn widget_mut(&mut self, page: PageId, id: ElementId) -> Result<&mut Widget, WidgetError> {
        let element = self.element_mut(page, id)?;
        element.mark_dirty();
        let (_, kind) = element.parts_mut();
        kind.widget_mut().ok_or(WidgetError::KindMismatch {
            id,
            expected: "widget",
        })
    }

    fn read_widget<R>(
        &self,
        page: PageId,
        id: ElementId,
        expected: &'static str,
        f: impl FnOnce(&Widget) -> Option<R>,
    ) -> Result<R, WidgetError> {
        self.element(page, id)?
            .kind()
            .widget()
            .and_then(f)
            .ok_or(WidgetError::KindMismatch { id, expected })
    }

    fn update_widget<R>(
        &mut self,
        page: PageId,
        id: ElementId,
        expected: &'static str,
        f: impl FnOnce(&mut Frame, &mut Widget) -> Option<R>,
    ) -> Result<R, WidgetError> {
        let (frame, kind) = self.element_mut(page, id)?.parts_mut();
        kind.widget_mut()
            .and_then(|w| f(frame, w))
            .ok_or(WidgetError::KindMismatch { id, expected })
    }

    fn update_primitive<R>(
        &mut self,
        page: PageId,
        id: ElementId,
        expected: &'static str,
        f: impl FnOnce(&mut Frame, &mut Primitive) -> Option<R>,
    ) -> Result<R, WidgetError> {
        let (frame, kind) = self.element_mut(page, id)?.parts_mut();
        kind.primitive_mut()
            .and_then(|p| f(frame, p))
            .ok_or(WidgetError::KindMismatch { id, expected })
    }

    /// Assign or clear the radio group of an element.
    pub fn set_group(
        &mut self,
        page: PageId,
        id: ElementId,
        group: Option<GroupId>,
    ) -> Result<(), WidgetError> {
        self.element_mut(page, id)?.set_group(group);
        Ok(())
    }

    /// Replace the colors of an element. Requests a full redraw.
    pub fn set_style(
        &mut self,
        page: PageId,
        id: ElementId,
        style: ElementStyle,
    ) -> Result<(), WidgetError> {
        let element = self.element_mut(page, id)?;
        element.frame_mut().style = style;
        element.mark_dirty();
        Ok(())
    }

    /// Enable or disable the glow indicator of an element.
    pub fn set_glow_enabled(
        &mut self,
        page: PageId,
        id: ElementId,
        enabled: bool,
    ) -> Result<(), WidgetError> {
        self.element_mut(page, id)?
            .frame_mut()
            .set_glow_enabled(enabled);
        Ok(())
    }

    /// Replace a text label's text. Returns whether it changed.
    pub fn set_text(&mut self, page: PageId, id: ElementId, text: &str) -> Result<bool, WidgetError> {
        self.update_primitive(page, id, "text", |frame, p| {
            let label = p.as_text_mut()?;
            let changed = label.set_text(text);
            if changed {
                frame.request_redraw(Redraw::Incremental);
            }
            Some(changed)
        })
    }

    /// Replace a button's label. Returns whether it changed.
    pub fn set_button_label(
        &mut self,
        page: PageId,
        id: ElementId,
        label: &str,
    ) -> Result<bool, WidgetError> {
        self.update_primitive(page, id, "button", |frame, p| {
            let button = p.as_button_mut()?;
            let changed = button.set_label(label);
            if changed {
                frame.request_redraw(Redraw::Full);
            }
            Some(changed)
        })
    }

    // ---------------------------------------------------------------------
    // Gauge
    // ---------------------------------------------------------------------

    pub fn gauge_value(&self, page: PageId, id: ElementId) -> Result<i16, WidgetError> {
        self.read_widget(page, id, "gauge", |w| match w {
            Widget::Gauge(g) => Some(g.value()),
            _ => None,
        })
    }

    /// Update a gauge value, clamped to its range.
    pub fn update_gauge(&mut self, page: PageId, id: ElementId, value: i16) -> Result<(), WidgetError> {
        self.update_widget(page, id, "gauge", |frame, w| match w {
            Widget::Gauge(g) => {
                g.update(frame, value);
                Some(())
            }
            _ => None,
        })
    }

    // ---------------------------------------------------------------------
    // Checkbox
    // ---------------------------------------------------------------------

    pub fn checkbox_state(&self, page: PageId, id: ElementId) -> Result<bool, WidgetError> {
        self.read_widget(page, id, "checkbox", |w| match w {
            Widget::Checkbox(c) => Some(c.is_checked()),
            _ => None,
        })
    }

    /// Set a checkbox state directly. Other members of a radio group are left
    /// as they are, and no callback is invoked.
    pub fn set_checkbox_state(
        &mut self,
        page: PageId,
        id: ElementId,
        checked: bool,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "checkbox", |frame, w| match w {
            Widget::Checkbox(c) => {
                c.set_state(frame, checked);
                Some(())
            }
            _ => None,
        })
    }

    pub fn toggle_checkbox(&mut self, page: PageId, id: ElementId) -> Result<(), WidgetError> {
        self.update_widget(page, id, "checkbox", |frame, w| match w {
            Widget::Checkbox(c) => {
                c.toggle(frame);
                Some(())
            }
            _ => None,
        })
    }

    pub fn set_checkbox_callback(
        &mut self,
        page: PageId,
        id: ElementId,
        callback: Option<Callback<bool>>,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "checkbox", |_, w| match w {
            Widget::Checkbox(c) => {
                c.set_callback(callback);
                Some(())
            }
            _ => None,
        })
    }

    /// Checked member of a radio group on a page, if any
    pub fn find_checked(&self, page: PageId, group: GroupId) -> Result<Option<ElementId>, WidgetError> {
        Ok(self
            .page(page)?
            .iter()
            .filter(|e| e.group() == Some(group))
            .find(|e| e.kind().as_checkbox().is_some_and(|c| c.is_checked()))
            .map(|e| e.id()))
    }

    fn select_radio(elements: &mut Collection<ElementKind, ELEMS>, winner: ElementId) {
        let group = elements.get(winner).and_then(|e| e.group());

        if let Some(group) = group {
            for element in elements.iter_mut() {
                if element.id() == winner || element.group() != Some(group) {
                    continue;
                }
                let (frame, kind) = element.parts_mut();
                if let Some(checkbox) = kind.as_checkbox_mut() {
                    checkbox.set_state(frame, false);
                }
            }
        }

        if let Some(element) = elements.get_mut(winner) {
            let (frame, kind) = element.parts_mut();
            if let Some(checkbox) = kind.as_checkbox_mut() {
                checkbox.commit_radio(frame, winner);
            }
        }
        debug!("Radio {:?} selected in group {:?}", winner, group);
    }

    // ---------------------------------------------------------------------
    // Slider
    // ---------------------------------------------------------------------

    pub fn slider_pos(&self, page: PageId, id: ElementId) -> Result<i16, WidgetError> {
        self.read_widget(page, id, "slider", |w| match w {
            Widget::Slider(s) => Some(s.pos()),
            _ => None,
        })
    }

    /// Move a slider, clamped to its range. No callback is invoked.
    pub fn set_slider_pos(&mut self, page: PageId, id: ElementId, pos: i16) -> Result<(), WidgetError> {
        self.update_widget(page, id, "slider", |frame, w| match w {
            Widget::Slider(s) => {
                s.set_pos(frame, pos);
                Some(())
            }
            _ => None,
        })
    }

    pub fn set_slider_style(
        &mut self,
        page: PageId,
        id: ElementId,
        style: SliderStyle,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "slider", |frame, w| match w {
            Widget::Slider(s) => {
                s.set_style(frame, style);
                Some(())
            }
            _ => None,
        })
    }

    pub fn set_slider_callback(
        &mut self,
        page: PageId,
        id: ElementId,
        callback: Option<Callback<i16>>,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "slider", |_, w| match w {
            Widget::Slider(s) => {
                s.set_position_callback(callback);
                Some(())
            }
            _ => None,
        })
    }

    // ---------------------------------------------------------------------
    // Stepper
    // ---------------------------------------------------------------------

    pub fn stepper_counter(&self, page: PageId, id: ElementId) -> Result<i16, WidgetError> {
        self.read_widget(page, id, "stepper", |w| match w {
            Widget::Stepper(s) => Some(s.counter()),
            _ => None,
        })
    }

    /// Set a stepper counter and its readout. No callback is invoked.
    pub fn set_stepper_counter(
        &mut self,
        page: PageId,
        id: ElementId,
        counter: i16,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "stepper", |_, w| match w {
            Widget::Stepper(s) => {
                s.set_counter(counter);
                Some(())
            }
            _ => None,
        })
    }

    pub fn set_stepper_callback(
        &mut self,
        page: PageId,
        id: ElementId,
        callback: Option<Callback<i16>>,
    ) -> Result<(), WidgetError> {
        self.update_widget(page, id, "stepper", |_, w| match w {
            Widget::Stepper(s) => {
                s.set_callback(callback);
                Some(())
            }
            _ => None,
        })
    }

    // ---------------------------------------------------------------------
    // Touch
    // ---------------------------------------------------------------------

    /// Route a touch event to the current page.
    ///
    /// The element under a press receives the following drags and the
    /// release. A radio selection is committed for the whole group before
    /// this returns.
    pub fn handle_touch(&mut self, event: TouchEvent) -> TouchResult {
        let Some(elements) = self.current_elements_mut() else {
            return TouchResult::NotHandled;
        };

        let result = elements.dispatch(event.phase(), event.point().to_point());

        if let TouchResult::Action(action) = result {
            debug!("Touch {:?} -> {:?}", event, action);
            if let Action::RadioSelected { id } = action {
                Self::select_radio(elements, id);
            }
        }

        result
    }

    // ---------------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------------

    /// Whether the current page has anything to repaint
    pub fn needs_redraw(&self) -> bool {
        self.page_changed || self.current_region().is_dirty()
    }

    fn current_region(&self) -> DirtyRegion {
        self.current
            .and_then(|id| self.page(id).ok())
            .map_or(DirtyRegion::clean(), |elements| elements.dirty_region())
    }

    /// Union of the bounds of all dirty elements on the current page
    pub fn dirty_region(&self) -> DirtyRegion {
        self.current_region()
    }

    /// Repaint one element of the current page completely.
    ///
    /// Redraw state is left untouched, so drawing an element whose state did
    /// not change produces identical pixels.
    pub fn draw_element<D: DrawTarget<Color = Rgb565>>(
        &self,
        id: ElementId,
        display: &mut D,
    ) -> Result<(), DrawError<D::Error>> {
        let element = self
            .current
            .and_then(|page| self.page(page).ok())
            .and_then(|elements| elements.get(id))
            .ok_or(DrawError::UnknownElement(id))?;

        element.draw(display, &self.fonts, Redraw::Full)
    }

    /// Repaint whatever is dirty on the current page.
    ///
    /// After a page change the screen is cleared with the background color and
    /// every element is drawn in full. Returns the region that was repainted.
    pub fn redraw<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<DirtyRegion, DrawError<D::Error>> {
        let Some(page) = self.current else {
            return Ok(DirtyRegion::clean());
        };
        let Some(index) = self.pages.iter().position(|p| p.id == page) else {
            return Ok(DirtyRegion::clean());
        };

        let elements = &mut self.pages[index].elements;
        let region = if self.page_changed {
            display.clear(self.background).map_err(DrawError::Target)?;
            elements.invalidate();
            DirtyRegion::new(display.bounding_box())
        } else {
            elements.dirty_region()
        };

        if !region.is_dirty() {
            return Ok(region);
        }

        elements.draw(display, &self.fonts, false)?;
        elements.mark_clean();
        self.page_changed = false;

        debug!("Redrew page {:?}, region {:?}", page, region.bounds);
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::core::TouchPoint;
    use crate::ui::styling::{BLUE, GRAY, GREEN, RED, WHITE};
    use crate::widgets::{CheckStyle, Orientation};
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    use alloc::rc::Rc;
    use alloc::vec::Vec as StdVec;
    use core::cell::{Cell, RefCell};

    const PAGE: PageId = PageId(0);
    const GROUP: GroupId = GroupId(1);

    type Store = ElementStore<2, 16>;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    fn store() -> Store {
        let mut store = Store::new(BLACK);
        store.add_page(PAGE).unwrap();
        store.add_font(FontId(0), &FONT_6X10).unwrap();
        store
    }

    fn style() -> ElementStyle {
        ElementStyle::new(GRAY, BLACK, WHITE)
    }

    fn tap(store: &mut Store, x: u16, y: u16) -> TouchResult {
        store.handle_touch(TouchEvent::Press(TouchPoint::new(x, y)));
        store.handle_touch(TouchEvent::Release(TouchPoint::new(x, y)))
    }

    /// Three radios A, B, C at x = 10, 40, 70, A checked
    fn radios(store: &mut Store, calls: &Rc<RefCell<StdVec<(ElementId, bool)>>>) -> [ElementId; 3] {
        let mut ids = [ElementId(0); 3];
        for (i, slot) in ids.iter_mut().enumerate() {
            let log = calls.clone();
            let checkbox = Checkbox::new(true, CheckStyle::Round, RED, i == 0)
                .with_callback(Callback::new(move |id, checked| log.borrow_mut().push((id, checked))));
            *slot = store
                .create_checkbox(
                    PAGE,
                    ElementIdRequest::Fixed(ElementId(10 + i as u16)),
                    rect(10 + 30 * i as i32, 10, 20, 20),
                    style(),
                    checkbox,
                    Some(GROUP),
                )
                .unwrap();
        }
        ids
    }

    #[test]
    fn test_radio_group_single_winner() {
        let calls = Rc::new(RefCell::new(StdVec::new()));
        let mut store = store();
        let [a, b, c] = radios(&mut store, &calls);

        let result = tap(&mut store, 45, 15);
        assert_eq!(result, TouchResult::Action(Action::RadioSelected { id: b }));

        assert!(!store.checkbox_state(PAGE, a).unwrap());
        assert!(store.checkbox_state(PAGE, b).unwrap());
        assert!(!store.checkbox_state(PAGE, c).unwrap());
        assert_eq!(store.find_checked(PAGE, GROUP).unwrap(), Some(b));
        assert_eq!(calls.borrow().as_slice(), &[(b, true)], "only the winner calls back");

        // Tapping the checked radio again changes nothing
        tap(&mut store, 45, 15);
        assert!(store.checkbox_state(PAGE, b).unwrap());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_radio_group_from_all_unchecked() {
        let calls = Rc::new(RefCell::new(StdVec::new()));
        let mut store = store();
        let [a, b, c] = radios(&mut store, &calls);
        store.set_checkbox_state(PAGE, a, false).unwrap();
        assert_eq!(store.find_checked(PAGE, GROUP).unwrap(), None);

        tap(&mut store, 45, 15);
        assert_eq!(store.find_checked(PAGE, GROUP).unwrap(), Some(b));

        tap(&mut store, 75, 15);
        assert!(!store.checkbox_state(PAGE, a).unwrap());
        assert!(!store.checkbox_state(PAGE, b).unwrap());
        assert!(store.checkbox_state(PAGE, c).unwrap());
        assert_eq!(calls.borrow().as_slice(), &[(b, true), (c, true)]);
    }

    #[test]
    fn test_set_checkbox_state_bypasses_group() {
        let calls = Rc::new(RefCell::new(StdVec::new()));
        let mut store = store();
        let [a, _, c] = radios(&mut store, &calls);

        store.set_checkbox_state(PAGE, c, true).unwrap();
        assert!(store.checkbox_state(PAGE, a).unwrap());
        assert!(store.checkbox_state(PAGE, c).unwrap());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_checkbox_cancel_outside() {
        let mut store = store();
        let id = store
            .create_checkbox(
                PAGE,
                ElementIdRequest::Auto,
                rect(10, 10, 20, 20),
                style(),
                Checkbox::new(false, CheckStyle::Box, GREEN, false),
                None,
            )
            .unwrap();

        store.handle_touch(TouchEvent::Press(TouchPoint::new(15, 15)));
        store.handle_touch(TouchEvent::Drag(TouchPoint::new(100, 100)));
        let result = store.handle_touch(TouchEvent::Release(TouchPoint::new(100, 100)));

        assert_eq!(result, TouchResult::Handled);
        assert!(!store.checkbox_state(PAGE, id).unwrap());

        assert_eq!(
            tap(&mut store, 15, 15),
            TouchResult::Action(Action::Toggled { id, checked: true })
        );
    }

    #[test]
    fn test_slider_drag_through_store() {
        let seen = Rc::new(RefCell::new(StdVec::new()));
        let log = seen.clone();
        let mut store = store();
        let slider = Slider::new(Orientation::Horizontal, 10, 0, 255, 128)
            .unwrap()
            .with_position_callback(Callback::new(move |_, pos| log.borrow_mut().push(pos)));
        let id = store
            .create_slider(PAGE, ElementIdRequest::Auto, rect(20, 50, 256, 20), style(), slider)
            .unwrap();

        store.set_slider_pos(PAGE, id, 200).unwrap();
        assert!(seen.borrow().is_empty());

        store.handle_touch(TouchEvent::Press(TouchPoint::new(20 + 201, 60)));
        store.handle_touch(TouchEvent::Drag(TouchPoint::new(310, 60)));
        store.handle_touch(TouchEvent::Drag(TouchPoint::new(319, 90)));
        store.handle_touch(TouchEvent::Release(TouchPoint::new(319, 90)));

        assert_eq!(store.slider_pos(PAGE, id).unwrap(), 255);
        assert_eq!(seen.borrow().as_slice(), &[255]);
    }

    #[test]
    fn test_stepper_through_store() {
        let last = Rc::new(Cell::new(0));
        let seen = last.clone();
        let mut store = store();
        let id = store
            .create_stepper(PAGE, ElementIdRequest::Auto, rect(10, 100, 120, 30), style(), FontId(0), 5)
            .unwrap();
        store
            .set_stepper_callback(PAGE, id, Some(Callback::new(move |_, c| seen.set(c))))
            .unwrap();

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        store.redraw(&mut fb).unwrap();

        for _ in 0..4 {
            tap(&mut store, 125, 115);
        }
        for _ in 0..6 {
            tap(&mut store, 15, 115);
        }

        assert_eq!(store.stepper_counter(PAGE, id).unwrap(), 3, "5 + 4 - 6");
        assert_eq!(last.get(), 3);

        let region = store.dirty_region();
        assert!(region.is_dirty());
        assert_eq!(region.bounds, rect(10, 100, 120, 30));

        store.set_stepper_counter(PAGE, id, -9).unwrap();
        assert_eq!(last.get(), 3, "setter must not call back");
    }

    #[test]
    fn test_gauge_update_marks_only_gauge() {
        let mut store = store();
        let gauge = Gauge::new(0, 100, 0, BLUE, Orientation::Horizontal).unwrap();
        let id = store
            .create_gauge(PAGE, ElementIdRequest::Auto, rect(10, 10, 102, 12), style(), gauge)
            .unwrap();
        store
            .create_box(PAGE, ElementIdRequest::Auto, rect(10, 40, 50, 50), style())
            .unwrap();

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        store.redraw(&mut fb).unwrap();
        assert!(!store.needs_redraw());

        store.update_gauge(PAGE, id, 500).unwrap();
        assert_eq!(store.gauge_value(PAGE, id).unwrap(), 100);
        assert_eq!(store.dirty_region().bounds, rect(10, 10, 102, 12));

        let region = store.redraw(&mut fb).unwrap();
        assert_eq!(region.bounds, rect(10, 10, 102, 12));
        assert!(!store.needs_redraw());
    }

    #[test]
    fn test_draw_is_idempotent() {
        let mut store = store();
        let gauge = store
            .create_gauge(
                PAGE,
                ElementIdRequest::Auto,
                rect(10, 10, 102, 12),
                style(),
                Gauge::new(0, 100, 42, BLUE, Orientation::Horizontal).unwrap(),
            )
            .unwrap();
        let checkbox = store
            .create_checkbox(
                PAGE,
                ElementIdRequest::Auto,
                rect(10, 30, 20, 20),
                style(),
                Checkbox::new(false, CheckStyle::Cross, RED, true),
                None,
            )
            .unwrap();
        let slider = store
            .create_slider(
                PAGE,
                ElementIdRequest::Auto,
                rect(10, 60, 150, 20),
                style(),
                Slider::new(Orientation::Horizontal, 10, 0, 100, 30)
                    .unwrap()
                    .with_style(SliderStyle {
                        trim: Some(GREEN),
                        tick_divisions: 5,
                        tick_length: 4,
                        tick_color: WHITE,
                    }),
            )
            .unwrap();
        let stepper = store
            .create_stepper(PAGE, ElementIdRequest::Auto, rect(10, 100, 120, 30), style(), FontId(0), 7)
            .unwrap();

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        store.redraw(&mut fb).unwrap();
        let before = fb.pixels().to_vec();

        // A full repaint may overwrite pixels on the way, so only the
        // final contents are compared.
        for id in [gauge, checkbox, slider, stepper] {
            store.draw_element(id, &mut fb).unwrap();
            assert!(fb.pixels() == &before[..], "repainting {:?} changed pixels", id);
        }

        fb.clear_changes();
        let region = store.redraw(&mut fb).unwrap();
        assert!(!region.is_dirty());
        assert_eq!(fb.changed_region(), None);
    }

    #[test]
    fn test_creation_errors() {
        let mut store = store();
        store
            .create_box(PAGE, ElementId(1).into(), rect(0, 0, 10, 10), style())
            .unwrap();

        assert!(matches!(
            store.create_box(PAGE, ElementId(1).into(), rect(0, 0, 10, 10), style()),
            Err(WidgetError::DuplicateId(ElementId(1)))
        ));
        assert!(matches!(
            store.create_box(PageId(9), ElementIdRequest::Auto, rect(0, 0, 10, 10), style()),
            Err(WidgetError::UnknownPage(PageId(9)))
        ));
        assert!(matches!(
            store.slider_pos(PAGE, ElementId(1)),
            Err(WidgetError::KindMismatch { expected: "slider", .. })
        ));
        assert!(matches!(
            store.gauge_value(PAGE, ElementId(2)),
            Err(WidgetError::UnknownElement(ElementId(2)))
        ));

        for _ in 1..16 {
            store
                .create_box(PAGE, ElementIdRequest::Auto, rect(0, 0, 10, 10), style())
                .unwrap();
        }
        assert!(matches!(
            store.create_box(PAGE, ElementIdRequest::Auto, rect(0, 0, 10, 10), style()),
            Err(WidgetError::CollectionFull { capacity: 16 })
        ));
    }

    #[test]
    fn test_page_switch_routes_touch() {
        let mut store = store();
        store.add_page(PageId(1)).unwrap();
        assert!(matches!(store.add_page(PageId(1)), Err(WidgetError::DuplicatePage(_))));
        assert!(matches!(store.add_page(PageId(2)), Err(WidgetError::PageTableFull { max: 2 })));

        let id = store
            .create_checkbox(
                PageId(1),
                ElementIdRequest::Auto,
                rect(10, 10, 20, 20),
                style(),
                Checkbox::new(false, CheckStyle::Box, RED, false),
                None,
            )
            .unwrap();

        assert_eq!(tap(&mut store, 15, 15), TouchResult::NotHandled);

        store.set_current_page(PageId(1)).unwrap();
        assert!(store.needs_redraw());
        tap(&mut store, 15, 15);
        assert!(store.checkbox_state(PageId(1), id).unwrap());

        let mut fb = FrameBuffer::new(Size::new(320, 240));
        let region = store.redraw(&mut fb).unwrap();
        assert_eq!(region.bounds, rect(0, 0, 320, 240));
    }

    #[test]
    fn test_page_switch_cancels_press() {
        let mut store = store();
        store.add_page(PageId(1)).unwrap();
        let slider = store
            .create_slider(
                PAGE,
                ElementIdRequest::Auto,
                rect(0, 0, 100, 20),
                style(),
                Slider::new(Orientation::Horizontal, 8, 0, 100, 50).unwrap(),
            )
            .unwrap();
        let checkbox = store
            .create_checkbox(
                PAGE,
                ElementIdRequest::Auto,
                rect(0, 40, 20, 20),
                style(),
                Checkbox::new(false, CheckStyle::Box, RED, false),
                None,
            )
            .unwrap();

        store.handle_touch(TouchEvent::Press(TouchPoint::new(30, 10)));
        store.set_current_page(PageId(1)).unwrap();
        store.handle_touch(TouchEvent::Release(TouchPoint::new(30, 10)));
        store.set_current_page(PAGE).unwrap();

        let Widget::Slider(s) = store.widget(PAGE, slider).unwrap() else {
            panic!("not a slider");
        };
        assert!(!s.is_dragging());
        assert_eq!(s.pos(), 30);
        assert!(!store.element(PAGE, slider).unwrap().frame().is_glowing());
        assert_eq!(store.page(PAGE).unwrap().tracked(), None);

        store.handle_touch(TouchEvent::Press(TouchPoint::new(5, 45)));
        store.set_current_page(PageId(1)).unwrap();
        store.set_current_page(PAGE).unwrap();

        let Widget::Checkbox(c) = store.widget(PAGE, checkbox).unwrap() else {
            panic!("not a checkbox");
        };
        assert!(!c.is_pressed());
        assert!(!c.is_checked(), "a cancelled press does not toggle");
        assert!(!store.element(PAGE, checkbox).unwrap().frame().is_glowing());
    }
}
