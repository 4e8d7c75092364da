/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoding support for PBM images
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use zune_core::log::info;

use crate::errors::PbmEncodeErrors;
use crate::image::{BilevelImage, PbmVersion};

/// A PBM encoder
///
/// The output version is the version stored in the image.
///
/// # Note
/// P4 output is real packed binary, most significant bit first with each row
/// padded to a whole byte, so a P4 image survives an encode/decode round trip.
/// Some older writers emitted ASCII `0`/`1` characters after a P4 header,
/// files written by this encoder are not byte compatible with those.
pub struct PbmEncoder<'a, W: Write> {
    writer: &'a mut W
}

impl<'a, W: Write> PbmEncoder<'a, W> {
    /// Create a new PBM encoder that writes to `writer`
    pub fn new(writer: &'a mut W) -> PbmEncoder<'a, W> {
        Self { writer }
    }

    fn write_headers(
        &mut self, version: PbmVersion, width: usize, height: usize
    ) -> Result<(), PbmEncodeErrors> {
        let header = format!("{version}\n{width} {height}\n");

        self.writer.write_all(header.as_bytes())?;

        Ok(())
    }

    /// Encode `image` into the writer
    pub fn encode(&mut self, image: &BilevelImage) -> Result<(), PbmEncodeErrors> {
        let (width, height) = image.dimensions();

        self.write_headers(image.version(), width, height)?;

        match image.version() {
            PbmVersion::P1 => self.encode_plain(image)?,
            PbmVersion::P4 => self.encode_raw(image)?
        }
        Ok(())
    }

    fn encode_plain(&mut self, image: &BilevelImage) -> Result<(), PbmEncodeErrors> {
        let mut line = String::with_capacity(image.dimensions().0 * 2 + 1);

        for row in image.rows() {
            line.clear();

            for &pixel in row {
                line.push_str(if pixel { "1 " } else { "0 " });
            }
            line.push('\n');

            self.writer.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn encode_raw(&mut self, image: &BilevelImage) -> Result<(), PbmEncodeErrors> {
        let mut packed = vec![0_u8; image.dimensions().0.div_ceil(8)];

        for row in image.rows() {
            packed.fill(0);

            for (x, _) in row.iter().enumerate().filter(|(_, pixel)| **pixel) {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
            self.writer.write_all(&packed)?;
        }
        Ok(())
    }
}

/// Encode `image` into a newly created file at `path`
///
/// An existing file is truncated. If encoding fails midway
/// the partially written file is left behind.
pub fn encode_file<P: AsRef<Path>>(image: &BilevelImage, path: P) -> Result<(), PbmEncodeErrors> {
    let path = path.as_ref();
    let file = File::create(path).map_err(PbmEncodeErrors::OpenError)?;
    let mut writer = BufWriter::new(file);

    PbmEncoder::new(&mut writer).encode(image)?;
    writer.flush()?;

    info!("Image saved successfully to {}", path.display());

    Ok(())
}
