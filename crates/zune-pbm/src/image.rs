/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Display, Formatter};

/// PBM versions understood by this crate
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PbmVersion {
    /// Plain bi-level, `0` and `1` tokens
    P1,
    /// Raw bi-level, packed bits
    P4
}

impl PbmVersion {
    /// Match a magic number against the supported versions
    pub fn from_magic(magic: &[u8]) -> Option<PbmVersion> {
        match magic {
            b"P1" => Some(PbmVersion::P1),
            b"P4" => Some(PbmVersion::P4),
            _ => None
        }
    }
}

impl Display for PbmVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P4 => write!(f, "P4")
        }
    }
}

/// A bi-level image
///
/// Pixels are stored row-major, `true` meaning a set (foreground) pixel.
///
/// Coordinates outside the image are tolerated, [`at`](Self::at) returns
/// `false` for them and [`set`](Self::set) does nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BilevelImage {
    version: PbmVersion,
    width:   usize,
    height:  usize,
    pixels:  Vec<bool>
}

impl BilevelImage {
    /// Create a new image with every pixel clear
    ///
    /// # Panics
    /// If `width` or `height` is zero, or `width * height` overflows
    pub fn new(version: PbmVersion, width: usize, height: usize) -> BilevelImage {
        let Some(size) = width.checked_mul(height).filter(|size| *size != 0) else {
            panic!("Invalid image dimensions {width}x{height}");
        };

        BilevelImage {
            version,
            width,
            height,
            pixels: vec![false; size]
        }
    }

    pub(crate) fn from_parts(
        version: PbmVersion, width: usize, height: usize, pixels: Vec<bool>
    ) -> BilevelImage {
        debug_assert_eq!(pixels.len(), width * height);

        BilevelImage {
            version,
            width,
            height,
            pixels
        }
    }

    /// Return the version this image was decoded from
    /// or will be encoded as
    pub const fn version(&self) -> PbmVersion {
        self.version
    }

    /// Return the image width and height
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Return whether the pixel at `(x, y)` is set
    pub fn at(&self, x: usize, y: usize) -> bool {
        if x < self.width && y < self.height {
            return self.pixels[y * self.width + x];
        }
        false
    }

    /// Set or clear the pixel at `(x, y)`
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Return all pixels, row-major
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Iterate over image rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(self.width)
    }

    /// Expand pixels to 8 bit luma samples
    ///
    /// Set pixels become black (`0`), clear pixels white (`255`)
    pub fn to_luma(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|&set| if set { 0 } else { u8::MAX })
            .collect()
    }
}
