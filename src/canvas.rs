//! Drawing surface geometry, pen settings and captured canvas payloads

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::image_adapter::{ChannelOrder, RgbaBuffer};

pub const CANVAS_WIDTH: u32 = 700;
pub const CANVAS_HEIGHT: u32 = 450;
pub const CANVAS_BACKGROUND: &str = "#FFFFFF";
pub const CANVAS_FILL: &str = "rgba(255, 255, 255, 0.0)";

pub const DEFAULT_PEN_COLOR: &str = "#000000";
pub const DEFAULT_PEN_WIDTH: u8 = 3;
pub const MIN_PEN_WIDTH: u8 = 1;
pub const MAX_PEN_WIDTH: u8 = 10;

/// Fixed geometry and pen bounds handed to the webview on load
#[derive(Debug, Clone, Serialize)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: &'static str,
    pub fill: &'static str,
    pub min_pen_width: u8,
    pub max_pen_width: u8,
    pub default_pen: PenSettings,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            background: CANVAS_BACKGROUND,
            fill: CANVAS_FILL,
            min_pen_width: MIN_PEN_WIDTH,
            max_pen_width: MAX_PEN_WIDTH,
            default_pen: PenSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenSettings {
    pub color: String,
    pub width: u8,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_PEN_COLOR.to_string(),
            width: DEFAULT_PEN_WIDTH,
        }
    }
}

impl PenSettings {
    /// Normalizes user input: width is clamped to the slider range and an
    /// unparseable color falls back to the default ink.
    pub fn new(color: &str, width: i64) -> Self {
        let width = width.clamp(MIN_PEN_WIDTH as i64, MAX_PEN_WIDTH as i64) as u8;
        let color = if is_hex_color(color) {
            color.to_ascii_lowercase()
        } else {
            DEFAULT_PEN_COLOR.to_string()
        };
        Self { color, width }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Raw pixels as posted by the webview after `getImageData`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasCapture {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub channel_order: ChannelOrder,
    pub rgba_base64: String,
}

impl CanvasCapture {
    pub fn into_buffer(self) -> Result<RgbaBuffer, String> {
        let pixels = BASE64
            .decode(self.rgba_base64.as_bytes())
            .map_err(|e| format!("Failed to decode canvas pixels: {}", e))?;
        RgbaBuffer::new(self.width, self.height, self.channel_order, pixels)
    }
}
