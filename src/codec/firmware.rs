/*
 * This file is part of msi-ec.
 *
 * Copyright (C) 2025 msi-ec contributors
 *
 * msi-ec is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * msi-ec is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with msi-ec. If not, see <https://www.gnu.org/licenses/>.
 */

//! Packed firmware text fields
//!
//! - version: ASCII, NUL padded to the field length
//! - date: `MMDDYYYY`, eight ASCII digits
//! - time: `HH:MM:SS`
//!
//! Digits are extracted without calendar checks; anything that does not fit
//! the pattern is rejected as a whole.

use super::CodecError;
use crate::value::{FirmwareDate, FirmwareTime};

pub const DATE_LENGTH: usize = 8;
pub const TIME_LENGTH: usize = 8;

pub fn decode_version(bytes: &[u8]) -> Result<String, CodecError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = &bytes[..end];
    if text.is_empty() {
        return Err(CodecError::Malformed("empty firmware version".to_string()));
    }
    if let Some(bad) = text.iter().find(|b| !(b.is_ascii_graphic() || **b == b' ')) {
        return Err(CodecError::Malformed(format!("non-printable byte {:#04x} in firmware version", bad)));
    }
    // Only printable ASCII remains at this point.
    Ok(text.iter().map(|&b| char::from(b)).collect())
}

pub fn decode_date(bytes: &[u8]) -> Result<FirmwareDate, CodecError> {
    if bytes.len() != DATE_LENGTH {
        return Err(CodecError::Malformed(format!(
            "firmware date is {} bytes, expected {}",
            bytes.len(),
            DATE_LENGTH
        )));
    }
    let field = |range: std::ops::Range<usize>| {
        digits(&bytes[range]).ok_or_else(|| {
            CodecError::Malformed(format!("firmware date {:?} is not MMDDYYYY", String::from_utf8_lossy(bytes)))
        })
    };
    Ok(FirmwareDate {
        month: field(0..2)? as u8,
        day: field(2..4)? as u8,
        year: field(4..8)?,
    })
}

pub fn decode_time(bytes: &[u8]) -> Result<FirmwareTime, CodecError> {
    let malformed = || CodecError::Malformed(format!("firmware time {:?} is not HH:MM:SS", String::from_utf8_lossy(bytes)));
    if bytes.len() != TIME_LENGTH || bytes[2] != b':' || bytes[5] != b':' {
        return Err(malformed());
    }
    Ok(FirmwareTime {
        hour: digits(&bytes[0..2]).ok_or_else(malformed)? as u8,
        minute: digits(&bytes[3..5]).ok_or_else(malformed)? as u8,
        second: digits(&bytes[6..8]).ok_or_else(malformed)? as u8,
    })
}

/// Parse a run of ASCII decimal digits (at most four)
fn digits(bytes: &[u8]) -> Option<u16> {
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    bytes.iter().try_fold(0u16, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u16::from(b - b'0'))
    })
}
