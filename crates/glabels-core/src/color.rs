//! Colors and color-or-field values.
//!
//! Colors are packed as `0xRRGGBBAA`. A [`ColorNode`] is what object
//! properties and the fill/line editor pages exchange: either a literal
//! color (possibly "no color") or a reference to a merge field whose value
//! supplies the color at print time.

use crate::error::LabelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A packed RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0x0000_00FF);
    pub const WHITE: Rgba = Rgba(0xFFFF_FFFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    pub fn red(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn alpha(self) -> u8 {
        self.0 as u8
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0xFFFF_FF00) | alpha as u32)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Rgba {
    type Err = LabelError;

    /// Accepts `#RRGGBB` (opaque) and `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LabelError::InvalidColor {
            text: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Self((value << 8) | 0xFF)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }
}

/// A color property value: a literal color or a merge-field reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorNode {
    /// True when the color comes from a merge field.
    pub field_flag: bool,
    /// Merge field key, meaningful when `field_flag` is set.
    pub key: Option<String>,
    /// Literal color; `None` means "no color".
    pub color: Option<Rgba>,
}

impl ColorNode {
    pub fn from_color(color: Rgba) -> Self {
        Self {
            field_flag: false,
            key: None,
            color: Some(color),
        }
    }

    pub fn from_field(key: impl Into<String>) -> Self {
        Self {
            field_flag: true,
            key: Some(key.into()),
            color: None,
        }
    }

    /// Resolve against a merge record lookup. Field values are parsed as
    /// color text; a missing or malformed value resolves to no color.
    pub fn resolve<'a, F>(&self, lookup: F) -> Option<Rgba>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if !self.field_flag {
            return self.color;
        }
        self.key
            .as_deref()
            .and_then(lookup)
            .and_then(|text| text.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        let c = Rgba::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.0, 0x1234_5678);
        assert_eq!(c.red(), 0x12);
        assert_eq!(c.green(), 0x34);
        assert_eq!(c.blue(), 0x56);
        assert_eq!(c.alpha(), 0x78);
        assert_eq!(c.with_alpha(0xFF).0, 0x1234_56FF);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("#336699".parse::<Rgba>().unwrap(), Rgba(0x3366_99FF));
        assert_eq!("#33669980".parse::<Rgba>().unwrap(), Rgba(0x3366_9980));
        assert_eq!(Rgba(0x3366_9980).to_string(), "#33669980");
        assert!("336699".parse::<Rgba>().is_err());
        assert!("#3366".parse::<Rgba>().is_err());
        assert!("#GG6699".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_default_node_has_no_color() {
        let node = ColorNode::default();
        assert!(!node.field_flag);
        assert_eq!(node.key, None);
        assert_eq!(node.color, None);
    }

    #[test]
    fn test_resolve_field() {
        let node = ColorNode::from_field("INK");
        let record = [("INK", "#FF0000")];
        let lookup = |k: &str| record.iter().find(|(key, _)| *key == k).map(|(_, v)| *v);
        assert_eq!(node.resolve(lookup), Some(Rgba(0xFF00_00FF)));

        let missing = ColorNode::from_field("PAPER");
        assert_eq!(missing.resolve(lookup), None);

        let literal = ColorNode::from_color(Rgba::BLACK);
        assert_eq!(literal.resolve(lookup), Some(Rgba::BLACK));
    }
}
