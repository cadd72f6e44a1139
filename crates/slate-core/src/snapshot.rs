//! Widget value snapshots
//!
//! A [`PageSnapshot`] records the value of every widget on a page so that an
//! application can persist control settings and put them back later. Snapshots
//! are encoded with postcard. Restoring goes through the programmatic setters,
//! so no callbacks fire and every restored widget is marked for redraw.

extern crate alloc;
use alloc::vec::Vec;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::store::ElementStore;
use crate::ui::core::{ElementId, PageId};
use crate::widgets::{ElementKind, Widget, WidgetError};

/// Value held by one widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetValue {
    Gauge(i16),
    Checkbox(bool),
    Slider(i16),
    Stepper(i16),
}

impl WidgetValue {
    fn of(widget: &Widget) -> Self {
        match widget {
            Widget::Gauge(g) => WidgetValue::Gauge(g.value()),
            Widget::Checkbox(c) => WidgetValue::Checkbox(c.is_checked()),
            Widget::Slider(s) => WidgetValue::Slider(s.pos()),
            Widget::Stepper(s) => WidgetValue::Stepper(s.counter()),
        }
    }

    /// Kind name of the widget this value belongs to
    pub fn kind_name(&self) -> &'static str {
        match self {
            WidgetValue::Gauge(_) => "gauge",
            WidgetValue::Checkbox(_) => "checkbox",
            WidgetValue::Slider(_) => "slider",
            WidgetValue::Stepper(_) => "stepper",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub id: ElementId,
    pub value: WidgetValue,
}

/// Values of all widgets on one page, in element order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub page: PageId,
    pub widgets: Vec<WidgetSnapshot>,
}

impl<const PAGES: usize, const ELEMS: usize> ElementStore<PAGES, ELEMS> {
    /// Record the widget values of a page.
    pub fn capture(&self, page: PageId) -> Result<PageSnapshot, WidgetError> {
        let widgets = self
            .page(page)?
            .iter()
            .filter_map(|element| match element.kind() {
                ElementKind::Widget(widget) => Some(WidgetSnapshot {
                    id: element.id(),
                    value: WidgetValue::of(widget),
                }),
                ElementKind::Primitive(_) => None,
            })
            .collect();

        Ok(PageSnapshot { page, widgets })
    }

    /// Write recorded values back into their widgets.
    ///
    /// Elements that no longer exist are skipped. An element whose kind no
    /// longer matches the recorded value is an error, and nothing is written.
    pub fn apply(&mut self, snapshot: &PageSnapshot) -> Result<(), WidgetError> {
        let page = snapshot.page;
        let elements = self.page(page)?;

        for entry in &snapshot.widgets {
            let Some(element) = elements.get(entry.id) else {
                continue;
            };
            let expected = entry.value.kind_name();
            if element.kind().widget().map(|w| w.kind_name()) != Some(expected) {
                return Err(WidgetError::KindMismatch { id: entry.id, expected });
            }
        }

        for entry in &snapshot.widgets {
            if self.page(page)?.get(entry.id).is_none() {
                warn!("Snapshot element {:?} not on page {:?}, skipping", entry.id, page);
                continue;
            }

            match entry.value {
                WidgetValue::Gauge(v) => self.update_gauge(page, entry.id, v)?,
                WidgetValue::Checkbox(v) => self.set_checkbox_state(page, entry.id, v)?,
                WidgetValue::Slider(v) => self.set_slider_pos(page, entry.id, v)?,
                WidgetValue::Stepper(v) => self.set_stepper_counter(page, entry.id, v)?,
            }
        }

        Ok(())
    }

    /// Encode the widget values of a page.
    pub fn snapshot(&self, page: PageId) -> Result<Vec<u8>, WidgetError> {
        let snapshot = self.capture(page)?;
        postcard::to_allocvec(&snapshot).map_err(WidgetError::Snapshot)
    }

    /// Decode a snapshot and apply it, returning the page it was taken from.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<PageId, WidgetError> {
        let snapshot: PageSnapshot = postcard::from_bytes(bytes).map_err(WidgetError::Snapshot)?;
        self.apply(&snapshot)?;

        info!(
            "Restored {} widget values on page {:?}",
            snapshot.widgets.len(),
            snapshot.page
        );
        Ok(snapshot.page)
    }
}
