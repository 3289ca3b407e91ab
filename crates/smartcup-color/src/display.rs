//! Display abstraction
//!
//! The sink draws through `embedded-graphics`; the display only has to be a
//! [`DrawTarget`] that can push a finished frame to the panel.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

/// Draw target with an explicit frame push
pub trait FrameDisplay: DrawTarget<Color = Rgb565> {
    /// Push the whole frame to the panel
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// In-memory frame of packed RGB565 words, row major
pub struct FrameBuffer<const W: usize, const H: usize> {
    words: [[u16; W]; H],
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    pub const fn new() -> Self {
        Self { words: [[0; W]; H] }
    }

    /// Packed color at `(x, y)`, `None` outside the frame
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        self.words.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn rows(&self) -> &[[u16; W]; H] {
        &self.words
    }
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> OriginDimensions for FrameBuffer<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for FrameBuffer<W, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if let Some(word) = self.words.get_mut(y).and_then(|row| row.get_mut(x)) {
                *word = color.into_storage();
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let word = color.into_storage();
        for row in &mut self.words {
            row.fill(word);
        }
        Ok(())
    }
}
