/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Display, Formatter};

/// PGM versions understood by this crate
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PgmVersion {
    /// Plain grayscale, decimal tokens
    P2,
    /// Raw grayscale, one byte per sample
    P5
}

impl PgmVersion {
    pub fn from_magic(magic: &[u8]) -> Option<PgmVersion> {
        match magic {
            b"P2" => Some(PgmVersion::P2),
            b"P5" => Some(PgmVersion::P5),
            _ => None
        }
    }
}

impl Display for PgmVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P2 => write!(f, "P2"),
            Self::P5 => write!(f, "P5")
        }
    }
}

/// An 8 bit grayscale image
///
/// Samples are stored row-major. Samples are expected to be
/// at most [`max_value`](Self::max_value) but this is not enforced.
///
/// Out of range coordinates read as `0` and writes to them are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GrayscaleImage {
    version:   PgmVersion,
    width:     usize,
    height:    usize,
    max_value: u8,
    pixels:    Vec<u8>
}

impl GrayscaleImage {
    /// Create a new black image
    ///
    /// # Panics
    /// If `width` or `height` is zero, or `width * height` overflows
    pub fn new(version: PgmVersion, width: usize, height: usize, max_value: u8) -> GrayscaleImage {
        let Some(size) = width.checked_mul(height).filter(|size| *size != 0) else {
            panic!("Invalid image dimensions {width}x{height}");
        };

        GrayscaleImage {
            version,
            width,
            height,
            max_value,
            pixels: vec![0; size]
        }
    }

    pub(crate) fn from_parts(
        version: PgmVersion, width: usize, height: usize, max_value: u8, pixels: Vec<u8>
    ) -> GrayscaleImage {
        debug_assert_eq!(pixels.len(), width * height);

        GrayscaleImage {
            version,
            width,
            height,
            max_value,
            pixels
        }
    }

    pub const fn version(&self) -> PgmVersion {
        self.version
    }

    /// Return the image width and height
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Return the sample at `(x, y)` or `0` if outside the image
    pub fn at(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            return self.pixels[y * self.width + x];
        }
        0
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Return all samples, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.width)
    }

    /// Invert every sample
    ///
    /// The formula is `pixel[x,y] = max_value - pixel[x,y]`, wrapping
    /// for samples above the max value.
    pub fn invert(&mut self) {
        let max_value = self.max_value;

        self.pixels
            .iter_mut()
            .for_each(|x| *x = max_value.wrapping_sub(*x));
    }

    /// Reflect the image around its central y-axis
    ///
    ///```text
    ///old image     new image
    ///┌─────────┐   ┌──────────┐
    ///│a b c d e│   │e d c b a │
    ///│f g h i j│   │j i h g f │
    ///└─────────┘   └──────────┘
    ///```
    pub fn flip(&mut self) {
        let width = self.width;

        for width_chunks in self.pixels.chunks_exact_mut(width) {
            let (left_to_right, right_to_left) = width_chunks.split_at_mut(width / 2);

            // iterate and swap
            for (ltr, rtl) in left_to_right.iter_mut().zip(right_to_left.iter_mut().rev()) {
                std::mem::swap(ltr, rtl);
            }
        }
    }
}
