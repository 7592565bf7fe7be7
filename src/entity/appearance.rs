//! Presentation attributes read by rendering collaborators

use serde::{Deserialize, Serialize};

/// Visible outfit of a creature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub look_type: u16,
    pub head: u8,
    pub body: u8,
    pub legs: u8,
    pub feet: u8,
}

impl Outfit {
    pub fn new(look_type: u16) -> Self {
        Self { look_type, ..Self::default() }
    }

    pub fn with_colors(mut self, head: u8, body: u8, legs: u8, feet: u8) -> Self {
        self.head = head;
        self.body = body;
        self.legs = legs;
        self.feet = feet;
        self
    }
}

/// Light emitted by a creature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightInfo {
    pub level: u8,
    pub color: u8,
}

impl LightInfo {
    pub fn new(level: u8, color: u8) -> Self {
        Self { level, color }
    }

    pub fn is_dark(&self) -> bool {
        self.level == 0
    }
}
