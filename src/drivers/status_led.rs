//! RGB status LED driver.
//!
//! Three LEDC PWM channels drive a common-cathode RGB LED.  Each mode
//! glyph maps to a fixed colour.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

/// Colour for a mode glyph.  Unknown glyphs render white.
pub const fn glyph_colour(glyph: char) -> (u8, u8, u8) {
    match glyph {
        'R' => (255, 160, 0),  // registering: amber
        'M' => (0, 64, 0),     // monitoring: dim green
        'C' => (0, 0, 255),    // communicating: blue
        'W' => (0, 255, 255),  // watering: cyan
        'A' => (128, 0, 128),  // waiting: purple
        _ => (255, 255, 255),
    }
}

pub struct StatusLed {
    current: (u8, u8, u8),
    glyph: Option<char>,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            current: (0, 0, 0),
            glyph: None,
        }
    }

    /// Render a mode glyph.  Repeating the current glyph touches no
    /// registers.
    pub fn show_glyph(&mut self, glyph: char) {
        if self.glyph == Some(glyph) {
            return;
        }
        let (r, g, b) = glyph_colour(glyph);
        self.set_colour(r, g, b);
        self.glyph = Some(glyph);
    }

    pub fn set_colour(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
        self.glyph = None;
    }

    pub fn off(&mut self) {
        self.set_colour(0, 0, 0);
    }

    pub fn current_colour(&self) -> (u8, u8, u8) {
        self.current
    }

    pub fn current_glyph(&self) -> Option<char> {
        self.glyph
    }
}
