/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};
use std::io;

/// Possible errors that may occur during decoding
pub enum PgmDecodeErrors {
    OpenError(io::Error),
    /// Missing or malformed magic number, dimensions or max value line
    InvalidHeader(String),
    /// A sample could not be parsed or a row has too many samples
    InvalidPixel(String),
    /// Maximum allowed dimension and the one found
    LargeDimensions(usize, usize),
    /// Expected and found, in bytes for P5 and rows for P2
    InsufficientData(usize, usize)
}

impl Debug for PgmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PgmDecodeErrors::OpenError(err) => {
                writeln!(f, "Cannot open image: {err}")
            }
            PgmDecodeErrors::InvalidHeader(reason) => {
                writeln!(f, "Invalid header, reason: {reason}")
            }
            PgmDecodeErrors::InvalidPixel(reason) => {
                writeln!(f, "Invalid pixel data, reason: {reason}")
            }
            PgmDecodeErrors::LargeDimensions(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            PgmDecodeErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data, expected {expected} but the stream only has {found}"
                )
            }
        }
    }
}

impl Display for PgmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for PgmDecodeErrors {}

/// Errors encountered during encoding
pub enum PgmEncodeErrors {
    OpenError(io::Error),
    WriteError(io::Error)
}

impl Debug for PgmEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PgmEncodeErrors::OpenError(err) => {
                writeln!(f, "Cannot create file: {err}")
            }
            PgmEncodeErrors::WriteError(err) => {
                writeln!(f, "I/O error {err}")
            }
        }
    }
}

impl Display for PgmEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for PgmEncodeErrors {}

impl From<io::Error> for PgmEncodeErrors {
    fn from(err: io::Error) -> Self {
        PgmEncodeErrors::WriteError(err)
    }
}
