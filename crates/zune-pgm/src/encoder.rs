/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoding support for PGM images
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use zune_core::log::info;

use crate::errors::PgmEncodeErrors;
use crate::image::{GrayscaleImage, PgmVersion};

/// A PGM encoder
///
/// Writes the image in the version it carries, with its max value.
pub struct PgmEncoder<'a, W: Write> {
    writer: &'a mut W
}

impl<'a, W: Write> PgmEncoder<'a, W> {
    /// Create a new PGM encoder that writes to `writer`
    pub fn new(writer: &'a mut W) -> PgmEncoder<'a, W> {
        Self { writer }
    }

    fn write_headers(
        &mut self, version: PgmVersion, width: usize, height: usize, max_value: u8
    ) -> Result<(), PgmEncodeErrors> {
        let header = format!("{version}\n{width} {height}\n{max_value}\n");

        self.writer.write_all(header.as_bytes())?;

        Ok(())
    }

    /// Encode `image` into the writer
    pub fn encode(&mut self, image: &GrayscaleImage) -> Result<(), PgmEncodeErrors> {
        let (width, height) = image.dimensions();

        self.write_headers(image.version(), width, height, image.max_value())?;

        match image.version() {
            PgmVersion::P2 => {
                let mut line = String::with_capacity(width * 4);

                for row in image.rows() {
                    line.clear();

                    for (x, sample) in row.iter().enumerate() {
                        if x != 0 {
                            line.push(' ');
                        }
                        // writing into a String cannot fail
                        let _ = write!(line, "{sample}");
                    }
                    line.push('\n');

                    self.writer.write_all(line.as_bytes())?;
                }
            }
            PgmVersion::P5 => {
                self.writer.write_all(image.pixels())?;
            }
        }
        Ok(())
    }
}

/// Encode `image` into a newly created file at `path`
pub fn encode_file<P: AsRef<Path>>(
    image: &GrayscaleImage, path: P
) -> Result<(), PgmEncodeErrors> {
    let path = path.as_ref();
    let file = File::create(path).map_err(PgmEncodeErrors::OpenError)?;
    let mut writer = BufWriter::new(file);

    PgmEncoder::new(&mut writer).encode(image)?;
    writer.flush()?;

    info!("Image saved successfully to {}", path.display());

    Ok(())
}
