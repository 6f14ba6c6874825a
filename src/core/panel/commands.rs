//! Outgoing panel commands
//! This module defines the commands that can be sent to the panel and the
//! local validation applied before anything reaches the control service.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::panel::error::{PanelError, Result};

fn hex_color() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("valid literal pattern"))
}

fn default_color() -> String {
    "ffffff".to_string()
}

fn default_font() -> String {
    "CUSONG".to_string()
}

fn default_speed() -> u8 {
    80
}

/// Scrolling-text options forwarded to the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOptions {
    pub text: String,
    /// Hex color without the leading '#', e.g. "FF0000"
    #[serde(default = "default_color")]
    pub color: String,
    /// Font name ("CUSONG", "SIMSUN", "VCR_OSD_MONO")
    #[serde(default = "default_font")]
    pub font: String,
    /// Animation type (0-7)
    #[serde(default)]
    pub animation: u8,
    /// Animation speed as a percentage (0-100)
    #[serde(default = "default_speed")]
    pub speed: u8,
    /// Rainbow mode style (0-9)
    #[serde(default)]
    pub rainbow_mode: u8,
    /// Character height in pixels (16, 20, 24, 32 for CUSONG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_height: Option<u8>,
}

/// An image or GIF upload, transmitted as opaque file data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One pixel of a pixel-art frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pixel {
    pub x: u16,
    pub y: u16,
    pub color: String,
}

/// Built-in display modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PanelMode {
    /// Clock face with style options
    Clock {
        /// Clock style (0-8)
        style: u8,
        format_24: bool,
        show_date: bool,
    },
    /// Music-reactive rhythm bars with 11 manual level controls
    Rhythm {
        /// Rhythm style (0-4)
        style: u8,
        /// 11 values, each 0-15
        levels: Vec<u8>,
    },
    /// Alternative rhythm mode found on newer firmware
    Rhythm2 {
        /// Rhythm style (0-1)
        style: u8,
        /// Decay time (0-7)
        time: u8,
    },
    /// Freeform pixel-by-pixel drawing mode
    Diy,
}

/// One outgoing instruction for the panel.
///
/// Commands are stateless data: constructed by the UI layer, consumed
/// exactly once by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelCommand {
    Text(TextOptions),
    Image(ImageUpload),
    Pixels { pixels: Vec<Pixel> },
    Mode(PanelMode),
    Brightness { level: u8 },
    Orientation { orientation: u8 },
    Power { on: bool },
}

impl PanelCommand {
    /// Short family name used in logs.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Pixels { .. } => "pixels",
            Self::Mode(_) => "mode",
            Self::Brightness { .. } => "brightness",
            Self::Orientation { .. } => "orientation",
            Self::Power { .. } => "power",
        }
    }

    /// Checks every constraint that does not require the device.
    ///
    /// Violations never reach the control service.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Text(options) => {
                if options.text.is_empty() {
                    return invalid("text must not be empty");
                }
                if !hex_color().is_match(&options.color) {
                    return invalid(format!("'{}' is not a hex RRGGBB color", options.color));
                }
                if options.speed > 100 {
                    return invalid(format!("speed {} is outside 0-100", options.speed));
                }
                Ok(())
            }
            Self::Image(upload) => {
                if upload.bytes.is_empty() {
                    return invalid("image payload must not be empty");
                }
                Ok(())
            }
            Self::Pixels { pixels } => {
                if pixels.is_empty() {
                    return invalid("pixel list must not be empty");
                }
                if let Some(pixel) = pixels.iter().find(|p| !hex_color().is_match(&p.color)) {
                    return invalid(format!("'{}' is not a hex RRGGBB color", pixel.color));
                }
                Ok(())
            }
            Self::Mode(mode) => mode.validate(),
            Self::Brightness { level } => {
                if *level > 100 {
                    return invalid(format!("brightness {level} is outside 0-100"));
                }
                Ok(())
            }
            Self::Orientation { orientation } => {
                if *orientation > 3 {
                    return invalid(format!("orientation {orientation} is not one of 0-3"));
                }
                Ok(())
            }
            Self::Power { .. } => Ok(()),
        }
    }
}

impl PanelMode {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Clock { style, .. } => {
                if *style > 8 {
                    return invalid(format!("clock style {style} is outside 0-8"));
                }
                Ok(())
            }
            Self::Rhythm { style, levels } => {
                if *style > 4 {
                    return invalid(format!("rhythm style {style} is outside 0-4"));
                }
                if levels.len() != 11 {
                    return invalid(format!("rhythm needs 11 levels, got {}", levels.len()));
                }
                if let Some(level) = levels.iter().find(|l| **l > 15) {
                    return invalid(format!("rhythm level {level} is outside 0-15"));
                }
                Ok(())
            }
            Self::Rhythm2 { style, time } => {
                if *style > 1 {
                    return invalid(format!("rhythm style {style} is outside 0-1"));
                }
                if *time > 7 {
                    return invalid(format!("rhythm time {time} is outside 0-7"));
                }
                Ok(())
            }
            Self::Diy => Ok(()),
        }
    }
}

fn invalid(detail: impl Into<String>) -> Result<()> {
    Err(PanelError::InvalidCommand(detail.into()))
}
