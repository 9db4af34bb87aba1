//! Frame buffers produced by the renderer and consumed by export.

use crate::color::Color;

/// Row-major RGB image; `data[y * width + x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    pub fn new_black(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::black())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Panics outside the image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.data[self.offset(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let at = self.offset(x, y);
        self.data[at] = color;
    }

    /// Pixel at signed coordinates, `None` outside the image.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<Color> {
        let inside = (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y);
        inside.then(|| self.get(x as u32, y as u32))
    }

    /// Interleaved 8-bit RGB, as PNG expects.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_rgb8()).collect()
    }

    /// Inverse of [`FrameBuffer::to_rgb8`]; `None` on a length mismatch.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 3 {
            return None;
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| Color::from_rgb8([px[0], px[1], px[2]]))
            .collect();
        Some(Self {
            width,
            height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut buffer = FrameBuffer::new_black(4, 3);
        buffer.set(3, 2, Color::gray(1.0));
        assert_eq!(buffer.get(3, 2), Color::gray(1.0));
        assert_eq!(buffer.get(0, 0), Color::black());
        assert_eq!(buffer.data[2 * 4 + 3], Color::gray(1.0));
    }

    #[test]
    fn test_get_checked_bounds() {
        let buffer = FrameBuffer::new(2, 2, Color::gray(0.5));
        assert!(buffer.get_checked(1, 1).is_some());
        assert!(buffer.get_checked(-1, 0).is_none());
        assert!(buffer.get_checked(0, 2).is_none());
    }

    #[test]
    fn test_rgb8_round_trip() {
        let mut buffer = FrameBuffer::new_black(2, 1);
        buffer.set(1, 0, Color::from_rgb8([10, 20, 30]));
        let bytes = buffer.to_rgb8();
        assert_eq!(bytes, vec![0, 0, 0, 10, 20, 30]);
        assert_eq!(FrameBuffer::from_rgb8(2, 1, &bytes), Some(buffer));
        assert_eq!(FrameBuffer::from_rgb8(3, 1, &bytes), None);
    }
}
