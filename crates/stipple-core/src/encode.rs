//! Raster → encoded bytes.
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use serde::Serialize;

use crate::error::{NoiseError, NoiseResult};
use crate::params::OutputFormat;
use crate::synth::RasterBuffer;

/// A finished image plus the metadata a caller needs to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encoder quality percentage (1..=100) for a [0, 1] factor.
pub fn quality_percent(quality: f32) -> u8 {
    let q = if quality.is_finite() { quality.clamp(0.0, 1.0) } else { 1.0 };
    ((q * 100.0).round() as u8).clamp(1, 100)
}

/// RGB levels per channel kept by the WEBP quantizer at `percent`.
///
/// Quadratic in quality: high settings keep fine gradations, low settings
/// collapse to a handful of levels.
pub fn webp_levels(percent: u8) -> u16 {
    if percent >= 100 {
        return 256;
    }
    let q = f32::from(percent.max(1)) / 100.0;
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

/// Snap each RGB channel to one of `levels` evenly spaced values. Alpha is untouched.
fn quantize_rgb(data: &mut [u8], levels: u16) {
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (f32::from(levels) - 1.0);
    for pixel in data.chunks_exact_mut(4) {
        for channel in pixel.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Serialize `buffer` in `format`.
///
/// PNG ignores `quality`. JPEG drops the (opaque) alpha channel. The WEBP
/// codec is lossless, so below full quality the colours are quantized first
/// and the loss happens there; `quality = 1` round-trips exactly.
pub fn encode(buffer: &RasterBuffer, format: OutputFormat, quality: f32) -> NoiseResult<EncodedImage> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(NoiseError::encoding("cannot encode an empty raster"));
    }

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        }
        OutputFormat::Jpeg => {
            let rgb = RgbImage::from_fn(width, height, |x, y| {
                let [r, g, b, _] = buffer.get_pixel(x, y).0;
                Rgb([r, g, b])
            });
            JpegEncoder::new_with_quality(&mut bytes, quality_percent(quality)).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Webp => {
            let levels = webp_levels(quality_percent(quality));
            tracing::debug!(quality, levels, "quantizing webp");
            let mut rgba = buffer.as_raw().clone();
            quantize_rgb(&mut rgba, levels);
            WebPEncoder::new_lossless(&mut bytes).write_image(&rgba, width, height, ExtendedColorType::Rgba8)?;
        }
    }

    Ok(EncodedImage { bytes, width, height, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    fn checker(w: u32, h: u32) -> RasterBuffer {
        RasterBuffer::from_fn(w, h, |x, y| {
            let c = if (x + y) % 2 == 0 { 240 } else { 15 };
            Rgba([c, c / 2, 255 - c, 255])
        })
    }

    #[test]
    fn png_round_trips_losslessly() {
        let src = checker(7, 5);
        let out = encode(&src, OutputFormat::Png, 0.1).unwrap();
        assert_eq!((out.width, out.height), (7, 5));
        assert_eq!(out.mime_type(), "image/png");
        let decoded = image::load_from_memory_with_format(&out.bytes, ImageFormat::Png).unwrap().to_rgba8();
        assert_eq!(decoded, src);
    }

    #[test]
    fn png_ignores_quality() {
        let src = checker(8, 8);
        let a = encode(&src, OutputFormat::Png, 0.0).unwrap();
        let b = encode(&src, OutputFormat::Png, 1.0).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let src = RasterBuffer::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, ((x * y) % 256) as u8, 255]));
        let low = encode(&src, OutputFormat::Jpeg, 0.1).unwrap();
        let high = encode(&src, OutputFormat::Jpeg, 1.0).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
        assert_eq!(&high.bytes[..2], &[0xFF, 0xD8], "JPEG SOI marker");
    }

    #[test]
    fn webp_quality_changes_size() {
        let src = RasterBuffer::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, ((x * y) % 256) as u8, 255]));
        let low = encode(&src, OutputFormat::Webp, 0.1).unwrap();
        let high = encode(&src, OutputFormat::Webp, 1.0).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
        assert_eq!(&low.bytes[..4], b"RIFF");
    }

    #[test]
    fn webp_full_quality_round_trips() {
        let src = checker(6, 6);
        let out = encode(&src, OutputFormat::Webp, 1.0).unwrap();
        let decoded = image::load_from_memory_with_format(&out.bytes, ImageFormat::WebP).unwrap().to_rgba8();
        assert_eq!(decoded, src);
    }

    #[test]
    fn webp_low_quality_snaps_channels() {
        let src = RasterBuffer::from_fn(16, 1, |x, _| Rgba([(x * 16) as u8, 7, 200, 255]));
        let out = encode(&src, OutputFormat::Webp, 0.0).unwrap();
        let decoded = image::load_from_memory_with_format(&out.bytes, ImageFormat::WebP).unwrap().to_rgba8();
        // quality 0 → 1% → 2 levels per channel.
        for p in decoded.pixels() {
            assert!(p[0] == 0 || p[0] == 255, "red {} not snapped", p[0]);
            assert_eq!((p[1], p[2], p[3]), (0, 255, 255));
        }
    }

    #[test]
    fn quality_mapping() {
        assert_eq!(quality_percent(0.9), 90);
        assert_eq!(quality_percent(0.0), 1);
        assert_eq!(quality_percent(1.0), 100);
        assert_eq!(quality_percent(f32::NAN), 100);
        assert_eq!(webp_levels(100), 256);
        assert_eq!(webp_levels(1), 2);
        assert_eq!(webp_levels(50), 66);
    }

    #[test]
    fn empty_raster_is_an_encoding_error() {
        let err = encode(&RasterBuffer::new(0, 0), OutputFormat::Png, 1.0).unwrap_err();
        assert!(matches!(err, NoiseError::Encoding(_)));
    }
}
