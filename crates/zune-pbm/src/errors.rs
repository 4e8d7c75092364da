/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding and encoding.
use std::fmt::{Debug, Display, Formatter};
use std::io;

/// Possible errors that may occur during decoding
pub enum PbmDecodeErrors {
    /// The file could not be opened or read
    OpenError(io::Error),
    /// Missing or malformed magic number or dimensions
    InvalidHeader(String),
    /// A pixel row could not be parsed
    InvalidPixel(String),
    /// Dimensions larger than what the decoder options allow
    ///
    /// # Arguments
    /// - 1st argument is the maximum allowed value
    /// - 2nd argument is the value found in the header
    LargeDimensions(usize, usize),
    /// The stream ended before all pixels were read
    ///
    /// # Arguments
    /// - 1st argument is what we expected
    /// - 2nd argument is what the stream actually had
    InsufficientData(usize, usize)
}

impl Debug for PbmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PbmDecodeErrors::OpenError(err) => {
                writeln!(f, "Cannot open image: {err}")
            }
            PbmDecodeErrors::InvalidHeader(reason) => {
                writeln!(f, "Invalid header, reason: {reason}")
            }
            PbmDecodeErrors::InvalidPixel(reason) => {
                writeln!(f, "Invalid pixel data, reason: {reason}")
            }
            PbmDecodeErrors::LargeDimensions(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            PbmDecodeErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, expected {expected} but the stream only has {found}"
                )
            }
        }
    }
}

impl Display for PbmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for PbmDecodeErrors {}

/// Errors encountered during encoding
pub enum PbmEncodeErrors {
    /// The destination file could not be created
    OpenError(io::Error),
    /// The underlying writer failed mid-encode
    WriteError(io::Error)
}

impl Debug for PbmEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PbmEncodeErrors::OpenError(err) => {
                writeln!(f, "Cannot create file: {err}")
            }
            PbmEncodeErrors::WriteError(err) => {
                writeln!(f, "I/O error {err}")
            }
        }
    }
}

impl Display for PbmEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for PbmEncodeErrors {}

impl From<io::Error> for PbmEncodeErrors {
    fn from(err: io::Error) -> Self {
        PbmEncodeErrors::WriteError(err)
    }
}
