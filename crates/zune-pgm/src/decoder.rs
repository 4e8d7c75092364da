/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZByteReader;
use zune_core::colorspace::ColorSpace;
use zune_core::log::{info, trace, warn};
use zune_core::options::DecoderOptions;

use crate::errors::PgmDecodeErrors;
use crate::image::{GrayscaleImage, PgmVersion};

/// An instance of a PGM decoder
///
/// The decoder can decode P2 and P5 formats
pub struct PgmDecoder<'a> {
    stream:          ZByteReader<&'a [u8]>,
    line:            Vec<u8>,
    version:         PgmVersion,
    width:           usize,
    height:          usize,
    max_value:       u8,
    decoded_headers: bool,
    options:         DecoderOptions
}

impl<'a> PgmDecoder<'a> {
    /// Create a new PGM decoder with lenient options
    ///
    /// A max value above 255 is narrowed to 8 bits instead of
    /// failing the decode.
    ///
    /// # Example
    /// ```
    /// use zune_pgm::PgmDecoder;
    /// let mut decoder = PgmDecoder::new(b"NOT VALID PGM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PgmDecoder<'a> {
        // zune-core defaults to strict mode
        let options = DecoderOptions::default().set_strict_mode(false);

        PgmDecoder::new_with_options(options, data)
    }

    /// Create a new PGM decoder with the specified options
    ///
    /// In strict mode, a max value above 255 is an error instead of
    /// being narrowed to 8 bits.
    pub fn new_with_options(options: DecoderOptions, data: &'a [u8]) -> PgmDecoder<'a> {
        PgmDecoder {
            stream: ZByteReader::new(data),
            line: Vec::new(),
            version: PgmVersion::P2,
            width: 0,
            height: 0,
            max_value: 0,
            decoded_headers: false,
            options
        }
    }

    /// Read the three header lines and store them in internal state
    pub fn decode_headers(&mut self) -> Result<(), PgmDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        self.header_line("magic number")?;
        let magic = self.line.trim_ascii();

        self.version = PgmVersion::from_magic(magic).ok_or_else(|| {
            let msg = format!(
                "Invalid magic number `{}`, supported versions are P2 and P5",
                String::from_utf8_lossy(magic)
            );
            PgmDecodeErrors::InvalidHeader(msg)
        })?;

        self.header_line("dimensions")?;
        let (width, height) = parse_dimensions(&self.line)?;

        if width > self.options.get_max_width() {
            return Err(PgmDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                width
            ));
        }
        if height > self.options.get_max_height() {
            return Err(PgmDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                height
            ));
        }
        if width.checked_mul(height).is_none() {
            let msg = format!("Dimensions {width}x{height} overflow the pixel count");
            return Err(PgmDecodeErrors::InvalidHeader(msg));
        }
        self.width = width;
        self.height = height;

        info!("Version: {}", self.version);
        info!("Width: {}, height: {}", self.width, self.height);

        self.header_line("max value")?;
        let value = self.line.trim_ascii();

        let (max_value, narrowed) = parse_max_value(value).ok_or_else(|| {
            let msg = format!("Invalid max value `{}`", String::from_utf8_lossy(value));
            PgmDecodeErrors::InvalidHeader(msg)
        })?;

        if narrowed {
            if self.options.get_strict_mode() {
                let msg = format!(
                    "Max value {} greater than 255",
                    String::from_utf8_lossy(value)
                );
                return Err(PgmDecodeErrors::InvalidHeader(msg));
            }
            warn!(
                "Max value {} does not fit in 8 bits, narrowing to {}",
                String::from_utf8_lossy(value),
                max_value
            );
        }
        self.max_value = max_value;

        info!("Max value: {}", self.max_value);

        self.decoded_headers = true;

        Ok(())
    }

    pub const fn get_version(&self) -> Option<PgmVersion> {
        if self.decoded_headers {
            Some(self.version)
        } else {
            None
        }
    }

    /// Return image dimensions or none if headers are not decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            Some((self.width, self.height))
        } else {
            None
        }
    }

    /// Return the max value narrowed to 8 bits, or none if
    /// headers are not decoded
    pub const fn get_max_value(&self) -> Option<u8> {
        if self.decoded_headers {
            Some(self.max_value)
        } else {
            None
        }
    }

    /// Returns PGM image colorspace.
    ///
    /// This is always Luma
    pub const fn get_colorspace(&self) -> ColorSpace {
        ColorSpace::Luma
    }

    /// Returns PGM image bit depth.
    ///
    /// This is always 8
    pub const fn get_bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Decode a PGM image
    pub fn decode(&mut self) -> Result<GrayscaleImage, PgmDecodeErrors> {
        self.decode_headers()?;

        let pixels = match self.version {
            PgmVersion::P2 => self.decode_plain()?,
            PgmVersion::P5 => self.decode_raw()?
        };
        Ok(GrayscaleImage::from_parts(
            self.version,
            self.width,
            self.height,
            self.max_value,
            pixels
        ))
    }

    fn decode_plain(&mut self) -> Result<Vec<u8>, PgmDecodeErrors> {
        let width = self.width;
        // checked when decoding headers
        let mut pixels = vec![0_u8; width * self.height];

        for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
            if !read_line(&mut self.stream, &mut self.line) {
                return Err(PgmDecodeErrors::InsufficientData(self.height, y));
            }
            let tokens = self
                .line
                .split(|c| c.is_ascii_whitespace())
                .filter(|token| !token.is_empty());

            for (x, token) in tokens.enumerate() {
                let Some(pixel) = row.get_mut(x) else {
                    let msg = format!("index out of range at row {y}");
                    return Err(PgmDecodeErrors::InvalidPixel(msg));
                };
                *pixel = std::str::from_utf8(token)
                    .ok()
                    .and_then(|value| value.parse::<u8>().ok())
                    .ok_or_else(|| {
                        let msg = format!(
                            "Cannot parse pixel value `{}` at row {y}, column {x}",
                            String::from_utf8_lossy(token)
                        );
                        PgmDecodeErrors::InvalidPixel(msg)
                    })?;
            }
            trace!("Decoded row {}", y);
        }
        Ok(pixels)
    }

    fn decode_raw(&mut self) -> Result<Vec<u8>, PgmDecodeErrors> {
        let size = self.width * self.height;
        let remaining = self.stream.remaining();

        if remaining < size {
            return Err(PgmDecodeErrors::InsufficientData(size, remaining));
        }
        if remaining > size {
            warn!("Ignoring {} trailing bytes", remaining - size);
        }
        let pixels = self
            .stream
            .get(size)
            .map_err(|_| PgmDecodeErrors::InsufficientData(size, remaining))?;

        Ok(pixels.to_vec())
    }

    /// Read the next header line into `self.line`
    fn header_line(&mut self, name: &str) -> Result<(), PgmDecodeErrors> {
        if !read_line(&mut self.stream, &mut self.line) {
            return Err(PgmDecodeErrors::InvalidHeader(format!(
                "Missing {name} line"
            )));
        }
        Ok(())
    }
}

/// Read and decode a PGM file
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<GrayscaleImage, PgmDecodeErrors> {
    let data = std::fs::read(path).map_err(PgmDecodeErrors::OpenError)?;

    PgmDecoder::new(&data).decode()
}

/// Read bytes up to the next `\n` into `line`, dropping the terminator
/// and a preceding `\r`.
///
/// Returns false if the stream is already exhausted
fn read_line(stream: &mut ZByteReader<&[u8]>, line: &mut Vec<u8>) -> bool {
    line.clear();

    if stream.eof() {
        return false;
    }
    while !stream.eof() {
        let byte = stream.get_u8();

        if byte == b'\n' {
            break;
        }
        line.push(byte);
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    true
}

/// Parse a decimal max value, keeping its low 8 bits
///
/// The flag is set if the value did not fit in a byte.
/// Returns none for an empty value or one with non-digits.
fn parse_max_value(value: &[u8]) -> Option<(u8, bool)> {
    if value.is_empty() {
        return None;
    }
    let mut narrow = 0_u8;
    let mut wide = 0_u16;

    for byte in value {
        if !byte.is_ascii_digit() {
            return None;
        }
        let digit = byte - b'0';
        // reduced mod 256 as we go, so any length wraps correctly
        narrow = narrow.wrapping_mul(10).wrapping_add(digit);
        wide = wide.saturating_mul(10).saturating_add(u16::from(digit));
    }
    Some((narrow, wide > u16::from(u8::MAX)))
}

fn parse_dimensions(line: &[u8]) -> Result<(usize, usize), PgmDecodeErrors> {
    let mut values = line
        .split(|c| c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            std::str::from_utf8(token)
                .ok()
                .and_then(|token| token.parse::<usize>().ok())
        });

    let (Some(Some(width)), Some(Some(height)), None) = (values.next(), values.next(), values.next())
    else {
        let msg = format!(
            "Invalid dimensions `{}`, expected `width height`",
            String::from_utf8_lossy(line)
        );
        return Err(PgmDecodeErrors::InvalidHeader(msg));
    };
    if width == 0 || height == 0 {
        return Err(PgmDecodeErrors::InvalidHeader(
            "Width and height must be positive".to_string()
        ));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use zune_core::options::DecoderOptions;

    use crate::{PgmDecodeErrors, PgmDecoder, PgmVersion};

    #[test]
    fn decode_plain() {
        let image = PgmDecoder::new(b"P2\n3 1\n255\n10 20 30\n")
            .decode()
            .unwrap();

        assert_eq!(image.version(), PgmVersion::P2);
        assert_eq!(image.max_value(), 255);
        assert_eq!(image.at(0, 0), 10);
        assert_eq!(image.at(1, 0), 20);
        assert_eq!(image.at(2, 0), 30);
        assert_eq!(image.at(3, 0), 0);
    }

    #[test]
    fn short_rows_are_zero_filled() {
        let image = PgmDecoder::new(b"P2\n3 2\n15\n1\n\n").decode().unwrap();

        assert_eq!(image.pixels(), &[1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn last_row_without_newline() {
        let image = PgmDecoder::new(b"P2\n2 1\n15\n3 4").decode().unwrap();

        assert_eq!(image.pixels(), &[3, 4]);
    }

    #[test]
    fn non_numeric_sample() {
        let err = PgmDecoder::new(b"P2\n3 1\n255\n10 x 30\n")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::InvalidPixel(_)));
    }

    #[test]
    fn too_many_samples() {
        let err = PgmDecoder::new(b"P2\n2 1\n255\n1 2 3\n")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::InvalidPixel(_)));
    }

    #[test]
    fn missing_row() {
        let err = PgmDecoder::new(b"P2\n1 3\n255\n1\n2\n")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::InsufficientData(3, 2)));
    }

    #[test]
    fn decode_raw() {
        let mut data = b"P5\n2 2\n255\n".to_vec();
        // a newline byte inside the payload is a sample like any other
        data.extend_from_slice(&[0, b'\n', 128, 255]);

        let image = PgmDecoder::new(&data).decode().unwrap();

        assert_eq!(image.version(), PgmVersion::P5);
        assert_eq!(image.pixels(), &[0, 10, 128, 255]);
    }

    #[test]
    fn raw_too_short() {
        let err = PgmDecoder::new(b"P5\n2 2\n255\n\x01\x02")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::InsufficientData(4, 2)));
    }

    #[test]
    fn invalid_headers() {
        for data in [
            &b"P9\n1 1\n255\n0\n"[..],
            b"",
            b"P2\n",
            b"P2\n-1 2\n255\n",
            b"P2\n0 2\n255\n",
            b"P2\n2\n255\n",
            b"P2\n1 1\n",
            b"P2\n1 1\nmax\n1\n",
            b"# comment\nP2\n1 1\n255\n1\n"
        ] {
            let err = PgmDecoder::new(data).decode().unwrap_err();
            assert!(matches!(err, PgmDecodeErrors::InvalidHeader(_)), "{err:?}");
        }
    }

    #[test]
    fn wide_max_value_is_narrowed() {
        let data = b"P2\n1 1\n300\n7\n";

        let mut decoder = PgmDecoder::new(data);
        decoder.decode_headers().unwrap();
        assert_eq!(decoder.get_max_value(), Some(44));

        let options = DecoderOptions::default().set_strict_mode(true);
        let err = PgmDecoder::new_with_options(options, data)
            .decode()
            .unwrap_err();
        assert!(matches!(err, PgmDecodeErrors::InvalidHeader(_)));
    }

    #[test]
    fn max_value_wider_than_any_integer_still_wraps() {
        // 2^64 + 300
        let data = b"P2\n1 1\n18446744073709551916\n7\n";
        let image = PgmDecoder::new(data).decode().unwrap();

        assert_eq!(image.max_value(), 44);
        assert_eq!(image.at(0, 0), 7);
    }

    #[test]
    fn max_value_of_255_is_kept_in_strict_mode() {
        let options = DecoderOptions::default().set_strict_mode(true);
        let image = PgmDecoder::new_with_options(options, b"P2\n1 1\n255\n7\n")
            .decode()
            .unwrap();

        assert_eq!(image.max_value(), 255);
    }

    #[test]
    fn zune_core_defaults_are_strict() {
        // `new` has to opt out of strict mode explicitly
        assert!(DecoderOptions::default().get_strict_mode());

        let err = PgmDecoder::new_with_options(DecoderOptions::default(), b"P2\n1 1\n256\n0\n")
            .decode()
            .unwrap_err();
        assert!(matches!(err, PgmDecodeErrors::InvalidHeader(_)));
    }

    #[test]
    fn overflowing_dimensions() {
        let options = DecoderOptions::default()
            .set_max_width(usize::MAX)
            .set_max_height(usize::MAX);
        let data = format!("P5\n2 {}\n255\n", usize::MAX);

        let err = PgmDecoder::new_with_options(options, data.as_bytes())
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::InvalidHeader(_)), "{err:?}");
    }

    #[test]
    fn dimension_limits() {
        let options = DecoderOptions::default().set_max_height(2);
        let err = PgmDecoder::new_with_options(options, b"P5\n1 3\n255\n\x00\x00\x00")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PgmDecodeErrors::LargeDimensions(2, 3)));
    }
}
