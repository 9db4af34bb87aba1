//! Deterministic PNG writer and the readers used for comparison and noise
//! tiles.
//!
//! Uses fixed compression settings so the same frame always encodes to the
//! same bytes, which lets exports be compared by hash across sessions.

use std::io::{Read, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};
use thiserror::Error;

use crate::buffer::FrameBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decoding(#[from] png::DecodingError),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),
}

/// Encoder settings; fixed per export so output bytes are reproducible.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write a frame buffer as an 8-bit RGB PNG file.
pub fn write_rgb(buffer: &FrameBuffer, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    write_rgb_to_writer(buffer, std::io::BufWriter::new(file), config)
}

fn encoder<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color: ColorType,
    depth: BitDepth,
    config: &PngConfig,
) -> Encoder<'static, W> {
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color);
    encoder.set_depth(depth);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);
    encoder
}

/// Write a frame buffer as an 8-bit RGB PNG to any writer.
pub fn write_rgb_to_writer<W: Write>(
    buffer: &FrameBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let header = encoder(
        writer,
        buffer.width,
        buffer.height,
        ColorType::Rgb,
        BitDepth::Eight,
        config,
    );
    header.write_header()?.write_image_data(&buffer.to_rgb8())?;
    Ok(())
}

/// Compute the BLAKE3 hash of encoded PNG bytes.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a `Vec<u8>` and return the bytes with their hash.
pub fn write_rgb_to_vec_with_hash(
    buffer: &FrameBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgb_to_writer(buffer, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Decode any 8/16-bit gray, gray+alpha, RGB or RGBA PNG into a frame buffer.
pub fn read_rgb<R: Read>(reader: R) -> Result<FrameBuffer, PngError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut png_reader = decoder.read_info()?;
    let mut buf = vec![0; png_reader.output_buffer_size()];
    let info = png_reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(PngError::Unsupported("indexed color after expansion".into()))
        }
    };

    let mut rgb = Vec::with_capacity(info.width as usize * info.height as usize * 3);
    for px in bytes.chunks_exact(channels) {
        if channels < 3 {
            rgb.extend_from_slice(&[px[0], px[0], px[0]]);
        } else {
            rgb.extend_from_slice(&px[..3]);
        }
    }

    FrameBuffer::from_rgb8(info.width, info.height, &rgb)
        .ok_or_else(|| PngError::Unsupported("decoded size does not match header".into()))
}

/// Decode a PNG file into a frame buffer.
pub fn read_rgb_file(path: &Path) -> Result<FrameBuffer, PngError> {
    let file = std::fs::File::open(path)?;
    read_rgb(std::io::BufReader::new(file))
}

/// Decoded single-channel image with values normalized to [0, 1].
#[derive(Debug, Clone)]
pub struct GrayImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f64>,
}

/// Decode an 8- or 16-bit grayscale PNG, keeping full precision.
pub fn read_grayscale<R: Read>(reader: R) -> Result<GrayImage, PngError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut png_reader = decoder.read_info()?;
    let mut buf = vec![0; png_reader.output_buffer_size()];
    let info = png_reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        other => {
            return Err(PngError::Unsupported(format!(
                "expected a grayscale image, got {:?}",
                other
            )))
        }
    };

    let data: Vec<f64> = match info.bit_depth {
        BitDepth::Sixteen => bytes
            .chunks_exact(2 * channels)
            .map(|px| u16::from_be_bytes([px[0], px[1]]) as f64 / 65535.0)
            .collect(),
        _ => bytes
            .chunks_exact(channels)
            .map(|px| px[0] as f64 / 255.0)
            .collect(),
    };

    Ok(GrayImage {
        width: info.width,
        height: info.height,
        data,
    })
}

/// Decode a grayscale PNG file.
pub fn read_grayscale_file(path: &Path) -> Result<GrayImage, PngError> {
    let file = std::fs::File::open(path)?;
    read_grayscale(std::io::BufReader::new(file))
}
