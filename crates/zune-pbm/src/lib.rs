/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding Portable Bitmap (PBM) images
//!
//! [Format Specification](https://netpbm.sourceforge.net/doc/pbm.html)
//!
//! PBM stores one bit per pixel, a set pixel is foreground (black)
//! and a clear pixel is background (white).
//!
//! # Supported versions
//! - `P1`: plain, `0`/`1` tokens, one row per line
//! - `P4`: raw, bits packed most significant bit first, rows padded to a byte
//!
//! # Example
//! ```
//! use zune_pbm::{PbmDecoder, PbmVersion};
//!
//! let mut decoder = PbmDecoder::new(b"P1\n# a comment\n3 1\n1 0 1\n");
//! let image = decoder.decode().unwrap();
//!
//! assert_eq!(image.version(), PbmVersion::P1);
//! assert_eq!(image.dimensions(), (3, 1));
//! assert!(image.at(0, 0));
//! assert!(!image.at(1, 0));
//! ```
//!
//! # Features
//! - `log`: Emit decoding information through the `log` facade
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use image::*;
pub use zune_core;

mod decoder;
mod encoder;
mod errors;
mod image;
