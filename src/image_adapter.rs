//! Turns raw canvas pixels into an image the vision model accepts.
//!
//! The canvas hands over interleaved 8-bit pixels with an alpha channel. The
//! model wants plain RGB, so alpha is flattened onto the white canvas
//! background and the result is encoded losslessly as PNG.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

/// Background every stroke is drawn on
pub const BACKGROUND: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Byte order of one pixel in a captured buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgba,
    Bgra,
}

impl ChannelOrder {
    fn split(self, px: &[u8]) -> ([u8; 3], u8) {
        match self {
            ChannelOrder::Rgba => ([px[0], px[1], px[2]], px[3]),
            ChannelOrder::Bgra => ([px[2], px[1], px[0]], px[3]),
        }
    }
}

/// A validated width × height × 4 pixel buffer
#[derive(Clone, Debug)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    order: ChannelOrder,
    pixels: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, order: ChannelOrder, pixels: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid canvas size {}x{}", width, height));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| format!("Canvas size {}x{} is too large", width, height))?;
        if pixels.len() != expected {
            return Err(format!(
                "Pixel buffer has {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            ));
        }
        Ok(Self {
            width,
            height,
            order,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels
            .chunks_exact(4)
            .map(move |px| {
                let (rgb, alpha) = self.order.split(px);
                flatten(rgb, alpha)
            })
    }
}

/// Composites one pixel over the canvas background.
fn flatten(rgb: [u8; 3], alpha: u8) -> [u8; 3] {
    match alpha {
        255 => rgb,
        0 => BACKGROUND,
        a => {
            let a = a as u32;
            let mut out = [0u8; 3];
            for i in 0..3 {
                let blended = rgb[i] as u32 * a + BACKGROUND[i] as u32 * (255 - a);
                out[i] = ((blended + 127) / 255) as u8;
            }
            out
        }
    }
}

/// True when nothing but background would reach the model.
pub fn is_blank(buffer: &RgbaBuffer) -> bool {
    buffer.rgb_pixels().all(|px| px == BACKGROUND)
}

/// Converts the buffer into an RGB image of the same dimensions.
pub fn to_rgb_image(buffer: &RgbaBuffer) -> Result<RgbImage, String> {
    let data: Vec<u8> = buffer.rgb_pixels().flatten().collect();
    RgbImage::from_raw(buffer.width, buffer.height, data)
        .ok_or_else(|| "Failed to create image from pixels".to_string())
}

/// Image payload ready to be inlined into an API request
#[derive(Clone, Debug, Serialize)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub data: String,
    pub width: u32,
    pub height: u32,
}

/// Converts and PNG-encodes the buffer, returning base64 data.
pub fn encode_for_model(buffer: &RgbaBuffer) -> Result<EncodedImage, String> {
    let rgb = to_rgb_image(buffer)?;

    let mut cursor = std::io::Cursor::new(Vec::new());
    rgb.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode drawing: {}", e))?;

    Ok(EncodedImage {
        mime_type: "image/png",
        data: BASE64.encode(cursor.into_inner()),
        width: rgb.width(),
        height: rgb.height(),
    })
}
