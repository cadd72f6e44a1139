// src/ui/styling.rs
//! Colors and per-element styling
//!
//! Colors are RGB565, the native format of the small SPI panels this crate
//! targets. To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder};

// ============================================================================
// Base Colors
// ============================================================================

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);
pub const GRAY_DARK: Rgb565 = Rgb565::new(64 >> 3, 64 >> 2, 64 >> 3);
pub const GRAY_DARKER: Rgb565 = Rgb565::new(32 >> 3, 32 >> 2, 32 >> 3);
pub const GRAY_LIGHT: Rgb565 = Rgb565::new(21, 42, 21);
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
pub const RED_DARK: Rgb565 = Rgb565::new(64 >> 3, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
pub const GREEN_DARK: Rgb565 = Rgb565::new(0, 64 >> 2, 0);
pub const BLUE: Rgb565 = Rgb565::new(0, 0, 31);
pub const BLUE_DARK: Rgb565 = Rgb565::new(0, 0, 64 >> 3);
pub const ORANGE: Rgb565 = Rgb565::new(255 >> 3, 165 >> 2, 0);

/// Glow (focus) color shared by the default element styles
pub const COLOR_GLOW: Rgb565 = Rgb565::new(30 >> 3, 144 >> 2, 255 >> 3);

/// Convert an 8-bit-per-channel color to RGB565
pub fn rgb888(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Colors carried by every element record.
///
/// `frame` outlines the element, `fill` paints its background, `glow` replaces
/// the frame (and for buttons the fill) while the element is glowing, and
/// `text` is used by text-bearing primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub frame: Rgb565,
    pub fill: Rgb565,
    pub glow: Rgb565,
    pub text: Rgb565,
    pub frame_enabled: bool,
    pub fill_enabled: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            frame: GRAY,
            fill: BLACK,
            glow: COLOR_GLOW,
            text: WHITE,
            frame_enabled: true,
            fill_enabled: true,
        }
    }
}

impl ElementStyle {
    pub fn new(frame: Rgb565, fill: Rgb565, glow: Rgb565) -> Self {
        Self {
            frame,
            fill,
            glow,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, color: Rgb565) -> Self {
        self.text = color;
        self
    }

    pub fn with_frame_enabled(mut self, enabled: bool) -> Self {
        self.frame_enabled = enabled;
        self
    }

    pub fn with_fill_enabled(mut self, enabled: bool) -> Self {
        self.fill_enabled = enabled;
        self
    }

    /// Frame color, swapped for the glow color while glowing
    pub fn frame_color(&self, glowing: bool) -> Rgb565 {
        if glowing { self.glow } else { self.frame }
    }

    /// Primitive style for the element background and outline
    pub fn to_primitive_style(&self, glowing: bool) -> PrimitiveStyle<Rgb565> {
        let mut builder = PrimitiveStyleBuilder::new();

        if self.fill_enabled {
            builder = builder.fill_color(self.fill);
        }

        if self.frame_enabled {
            builder = builder
                .stroke_color(self.frame_color(glowing))
                .stroke_width(1);
        }

        builder.build()
    }
}
