/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding Portable Graymap (PGM) images
//!
//! [Format Specification](https://netpbm.sourceforge.net/doc/pgm.html)
//!
//! # Supported versions
//! - `P2`: plain, whitespace separated decimal samples
//! - `P5`: raw, one byte per sample
//!
//! Only 8 bit images are supported, a declared max value above 255
//! is narrowed to 8 bits.
//!
//! The header is expected to be exactly three lines, magic number,
//! `width height` and max value. Comments are not supported.
//!
//! # Example
//! ```
//! use zune_pgm::PgmDecoder;
//!
//! let mut image = PgmDecoder::new(b"P2\n3 1\n255\n10 20 30\n").decode().unwrap();
//!
//! image.flip();
//! assert_eq!(image.at(0, 0), 30);
//!
//! image.invert();
//! assert_eq!(image.at(0, 0), 225);
//! ```
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use image::*;
pub use zune_core;

mod decoder;
mod encoder;
mod errors;
mod image;
