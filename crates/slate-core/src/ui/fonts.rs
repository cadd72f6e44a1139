// src/ui/fonts.rs
//! Font registry
//!
//! Text-bearing elements refer to fonts by [`FontId`]. The table maps ids to
//! embedded-graphics mono fonts; drawing an element whose font was never
//! registered fails with [`DrawError::MissingFont`](crate::ui::DrawError).

use embedded_graphics::mono_font::MonoFont;
use heapless::Vec;

use crate::widgets::WidgetError;

/// Maximum number of fonts a table can hold
pub const MAX_FONTS: usize = 8;

/// Font identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u8);

/// Registered fonts, looked up by id at draw time
#[derive(Default)]
pub struct FontTable {
    fonts: Vec<(FontId, &'static MonoFont<'static>), MAX_FONTS>,
}

impl FontTable {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Register `font` under `id`, replacing any previous font with that id.
    pub fn add(&mut self, id: FontId, font: &'static MonoFont<'static>) -> Result<(), WidgetError> {
        if let Some(slot) = self.fonts.iter_mut().find(|(fid, _)| *fid == id) {
            slot.1 = font;
            return Ok(());
        }

        self.fonts
            .push((id, font))
            .map_err(|_| WidgetError::FontTableFull { max: MAX_FONTS })
    }

    pub fn get(&self, id: FontId) -> Option<&'static MonoFont<'static>> {
        self.fonts
            .iter()
            .find(|(fid, _)| *fid == id)
            .map(|(_, font)| *font)
    }
}
