/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use zune_core::bytestream::ZByteReader;
use zune_core::log::{info, trace, warn};
use zune_core::options::DecoderOptions;

use crate::errors::PbmDecodeErrors;
use crate::image::{BilevelImage, PbmVersion};

/// An instance of a PBM decoder
///
/// The decoder can decode P1 and P4 formats
///
/// Blank lines and lines starting with `#` are skipped anywhere
/// before the pixel data, and between rows of P1 data.
pub struct PbmDecoder<'a> {
    stream:          ZByteReader<&'a [u8]>,
    line:            Vec<u8>,
    version:         PbmVersion,
    width:           usize,
    height:          usize,
    decoded_headers: bool,
    options:         DecoderOptions
}

impl<'a> PbmDecoder<'a> {
    /// Create a new PBM decoder with lenient options
    ///
    /// Missing P1 rows are left clear instead of failing the decode.
    ///
    /// # Arguments
    /// - data: PBM encoded pixels
    ///
    /// # Example
    /// ```
    /// use zune_pbm::PbmDecoder;
    /// let mut decoder = PbmDecoder::new(b"NOT VALID PBM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PbmDecoder<'a> {
        // zune-core defaults to strict mode
        let options = DecoderOptions::default().set_strict_mode(false);

        PbmDecoder::new_with_options(options, data)
    }

    /// Create a new PBM decoder with the specified options
    ///
    /// Options honoured are the maximum width and height,
    /// and strict mode, which turns missing P1 rows into an error.
    pub fn new_with_options(options: DecoderOptions, data: &'a [u8]) -> PbmDecoder<'a> {
        PbmDecoder {
            stream: ZByteReader::new(data),
            line: Vec::new(),
            version: PbmVersion::P1,
            width: 0,
            height: 0,
            decoded_headers: false,
            options
        }
    }

    /// Read the magic number and dimensions and store them
    /// in internal state
    pub fn decode_headers(&mut self) -> Result<(), PbmDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        if !self.next_content_line() {
            return Err(PbmDecodeErrors::InvalidHeader(
                "No magic number found".to_string()
            ));
        }
        let magic = self.line.trim_ascii();

        self.version = PbmVersion::from_magic(magic).ok_or_else(|| {
            let msg = format!(
                "Unsupported magic number `{}`, supported versions are P1 and P4",
                String::from_utf8_lossy(magic)
            );
            PbmDecodeErrors::InvalidHeader(msg)
        })?;

        info!("Version: {}", self.version);

        if !self.next_content_line() {
            return Err(PbmDecodeErrors::InvalidHeader(
                "No dimensions found".to_string()
            ));
        }
        let (width, height) = parse_dimensions(self.line.trim_ascii())?;

        if width > self.options.get_max_width() {
            return Err(PbmDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                width
            ));
        }
        if height > self.options.get_max_height() {
            return Err(PbmDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                height
            ));
        }
        if width.checked_mul(height).is_none() {
            let msg = format!("Dimensions {width}x{height} overflow the pixel count");
            return Err(PbmDecodeErrors::InvalidHeader(msg));
        }
        self.width = width;
        self.height = height;

        info!("Width: {}, height: {}", self.width, self.height);

        self.decoded_headers = true;

        Ok(())
    }

    /// Return the image version or none if headers
    /// are not decoded
    pub const fn get_version(&self) -> Option<PbmVersion> {
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

    /// Decode a PBM image
    pub fn decode(&mut self) -> Result<BilevelImage, PbmDecodeErrors> {
        self.decode_headers()?;

        let pixels = match self.version {
            PbmVersion::P1 => self.decode_plain()?,
            PbmVersion::P4 => self.decode_raw()?
        };
        Ok(BilevelImage::from_parts(
            self.version,
            self.width,
            self.height,
            pixels
        ))
    }

    fn decode_plain(&mut self) -> Result<Vec<bool>, PbmDecodeErrors> {
        let width = self.width;
        // checked when decoding headers
        let mut pixels = vec![false; width * self.height];
        let mut rows_read = 0;

        for row in pixels.chunks_exact_mut(width) {
            if !self.next_content_line() {
                break;
            }
            let mut filled = 0;

            for (pixel, token) in row.iter_mut().zip(tokens(&self.line)) {
                *pixel = token == b"1";
                filled += 1;
            }
            if filled < width {
                let msg = format!("Row {rows_read} has {filled} pixels, expected {width}");
                return Err(PbmDecodeErrors::InvalidPixel(msg));
            }
            trace!("Decoded row {}", rows_read);
            rows_read += 1;
        }
        if rows_read < self.height {
            if self.options.get_strict_mode() {
                return Err(PbmDecodeErrors::InsufficientData(self.height, rows_read));
            }
            warn!(
                "Expected {} rows but found {}, remaining rows left clear",
                self.height, rows_read
            );
        }
        Ok(pixels)
    }

    /// Raw pixels are the last `stride * height` bytes of the stream,
    /// whatever sits between the header and them is ignored.
    fn decode_raw(&mut self) -> Result<Vec<bool>, PbmDecodeErrors> {
        let width = self.width;
        let stride = width.div_ceil(8);
        // stride <= width, so this cannot overflow either
        let size = stride * self.height;
        let remaining = self.stream.remaining();

        if size > remaining {
            return Err(PbmDecodeErrors::InsufficientData(size, remaining));
        }
        self.stream.skip(remaining - size);

        let payload = self
            .stream
            .get(size)
            .map_err(|_| PbmDecodeErrors::InsufficientData(size, remaining))?;

        let mut pixels = vec![false; width * self.height];

        for (row, packed) in pixels
            .chunks_exact_mut(width)
            .zip(payload.chunks_exact(stride))
        {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = (packed[x / 8] >> (7 - (x % 8))) & 1 == 1;
            }
        }
        Ok(pixels)
    }

    /// Read the next line that is neither blank nor a comment into `self.line`
    ///
    /// Returns false if the stream ran out first
    fn next_content_line(&mut self) -> bool {
        while read_line(&mut self.stream, &mut self.line) {
            let line = self.line.trim_ascii();

            if line.is_empty() || line.starts_with(b"#") {
                continue;
            }
            return true;
        }
        false
    }
}

/// Read and decode a PBM file
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<BilevelImage, PbmDecodeErrors> {
    let data = std::fs::read(path).map_err(PbmDecodeErrors::OpenError)?;

    PbmDecoder::new(&data).decode()
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

fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|c| c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

fn parse_dimensions(line: &[u8]) -> Result<(usize, usize), PbmDecodeErrors> {
    let invalid = || {
        let msg = format!(
            "Invalid dimensions `{}`, expected `width height`",
            String::from_utf8_lossy(line)
        );
        PbmDecodeErrors::InvalidHeader(msg)
    };
    let mut values = tokens(line).map(|token| {
        std::str::from_utf8(token)
            .ok()
            .and_then(|token| token.parse::<usize>().ok())
    });

    let (Some(Some(width)), Some(Some(height)), None) = (values.next(), values.next(), values.next())
    else {
        return Err(invalid());
    };
    if width == 0 || height == 0 {
        return Err(PbmDecodeErrors::InvalidHeader(
            "Width and height must be positive".to_string()
        ));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use zune_core::options::DecoderOptions;

    use crate::{PbmDecodeErrors, PbmDecoder, PbmVersion};

    #[test]
    fn decode_plain_with_comments() {
        let data = b"# leading comment\n\nP1\n# size follows\n4 2\n1 0 0 1\n\n# second row\n0 1 1 0\n";
        let image = PbmDecoder::new(data).decode().unwrap();

        assert_eq!(image.version(), PbmVersion::P1);
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(
            image.pixels(),
            &[true, false, false, true, false, true, true, false]
        );
    }

    #[test]
    fn plain_tokens_other_than_one_are_clear() {
        let image = PbmDecoder::new(b"P1\n3 1\n1 2 x\n").decode().unwrap();

        assert_eq!(image.pixels(), &[true, false, false]);
    }

    #[test]
    fn decode_crlf_lines() {
        let image = PbmDecoder::new(b"P1\r\n2 1\r\n0 1\r\n").decode().unwrap();

        assert_eq!(image.pixels(), &[false, true]);
    }

    #[test]
    fn decode_raw_single_byte() {
        let mut data = b"P4\n8 1\n".to_vec();
        data.push(0b1011_0000);

        let image = PbmDecoder::new(&data).decode().unwrap();

        assert_eq!(
            image.pixels(),
            &[true, false, true, true, false, false, false, false]
        );
    }

    #[test]
    fn decode_raw_rows_start_on_new_byte() {
        // width 10 needs two bytes per row, the last six bits are padding
        let mut data = b"P4\n10 2\n".to_vec();
        data.extend_from_slice(&[0b1000_0000, 0b0111_1111, 0b0000_0000, 0b0100_0000]);

        let image = PbmDecoder::new(&data).decode().unwrap();

        assert!(image.at(0, 0));
        assert!(image.at(9, 0));
        assert!(!image.at(8, 0));
        assert!(image.at(9, 1));
        assert_eq!(image.pixels().iter().filter(|x| **x).count(), 3);
    }

    #[test]
    fn raw_payload_is_taken_from_the_end() {
        let mut data = b"P4\n8 1\n# trailing junk before pixels\n".to_vec();
        data.push(0xFF);

        let image = PbmDecoder::new(&data).decode().unwrap();

        assert!(image.pixels().iter().all(|x| *x));
    }

    #[test]
    fn raw_too_short() {
        let err = PbmDecoder::new(b"P4\n16 2\n\xFF").decode().unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::InsufficientData(4, 1)));
    }

    #[test]
    fn unsupported_magic() {
        let err = PbmDecoder::new(b"P9\n1 1\n1\n").decode().unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::InvalidHeader(_)));
    }

    #[test]
    fn empty_stream() {
        let err = PbmDecoder::new(b"").decode().unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::InvalidHeader(_)));
    }

    #[test]
    fn bad_dimensions() {
        for data in [
            &b"P1\n3\n1 1 1\n"[..],
            b"P1\nthree 1\n1 1 1\n",
            b"P1\n0 1\n\n",
            b"P1\n1 2 3\n1\n1\n",
            b"P1\n"
        ] {
            let err = PbmDecoder::new(data).decode().unwrap_err();
            assert!(matches!(err, PbmDecodeErrors::InvalidHeader(_)), "{err:?}");
        }
    }

    #[test]
    fn short_plain_row() {
        let err = PbmDecoder::new(b"P1\n3 1\n1 0\n").decode().unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::InvalidPixel(_)));
    }

    #[test]
    fn missing_rows_depend_on_strictness() {
        let data = b"P1\n2 2\n1 1\n";

        let image = PbmDecoder::new(data).decode().unwrap();
        assert_eq!(image.pixels(), &[true, true, false, false]);

        let options = DecoderOptions::default().set_strict_mode(true);
        let err = PbmDecoder::new_with_options(options, data)
            .decode()
            .unwrap_err();
        assert!(matches!(err, PbmDecodeErrors::InsufficientData(2, 1)));
    }

    #[test]
    fn dimension_limits() {
        let options = DecoderOptions::default().set_max_width(4);
        let err = PbmDecoder::new_with_options(options, b"P1\n5 1\n1 1 1 1 1\n")
            .decode()
            .unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::LargeDimensions(4, 5)));
    }

    #[test]
    fn overflowing_dimensions() {
        let options = DecoderOptions::default()
            .set_max_width(usize::MAX)
            .set_max_height(usize::MAX);
        let data = format!("P1\n{} 2\n", usize::MAX);

        let err = PbmDecoder::new_with_options(options, data.as_bytes())
            .decode()
            .unwrap_err();

        assert!(matches!(err, PbmDecodeErrors::InvalidHeader(_)), "{err:?}");
    }

    #[test]
    fn zune_core_defaults_are_strict() {
        // `new` has to opt out of strict mode explicitly
        assert!(DecoderOptions::default().get_strict_mode());

        let data = b"P1\n1 2\n1\n";
        let err = PbmDecoder::new_with_options(DecoderOptions::default(), data)
            .decode()
            .unwrap_err();
        assert!(matches!(err, PbmDecodeErrors::InsufficientData(2, 1)));

        let image = PbmDecoder::new(data).decode().unwrap();
        assert_eq!(image.pixels(), &[true, false]);
    }

    #[test]
    fn headers_before_pixels() {
        let mut decoder = PbmDecoder::new(b"P1\n2 3\n");

        assert_eq!(decoder.get_dimensions(), None);
        decoder.decode_headers().unwrap();
        assert_eq!(decoder.get_dimensions(), Some((2, 3)));
        assert_eq!(decoder.get_version(), Some(PbmVersion::P1));
    }
}
