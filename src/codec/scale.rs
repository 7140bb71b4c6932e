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

//! Numeric codecs: percentage scales and offset thresholds
//!
//! # Scaled percentages
//!
//! A fan speed register holds a value in `[base_min, base_max]` which maps
//! linearly onto 0-100%:
//!
//! ```text
//! percent  = 100 * (raw - base_min) / (base_max - base_min)
//! raw      = base_min + percent * (base_max - base_min) / 100
//! ```
//!
//! Reads truncate, as the kernel driver does. Writes round to the nearest
//! raw step, so a percentage written and read back comes out as `p` or
//! `p - 1` whenever the base range spans at least 100 steps.
//!
//! # Thresholds
//!
//! Battery charge thresholds are stored as `logical + offset` and the
//! physical value must stay within `[min, max]`.

use serde::{Deserialize, Serialize};

use super::CodecError;

/// Linear mapping between a raw base range and 0-100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub base_min: u8,
    pub base_max: u8,
}

impl Scale {
    pub fn new(base_min: u8, base_max: u8) -> Self {
        Self { base_min, base_max }
    }

    fn span(&self) -> Result<u32, CodecError> {
        if self.base_min >= self.base_max {
            return Err(CodecError::Malformed(format!(
                "empty base range {:#04x}..={:#04x}",
                self.base_min, self.base_max
            )));
        }
        Ok(u32::from(self.base_max - self.base_min))
    }

    /// Convert a raw register value to a percentage
    ///
    /// Raw values outside the base range are reported, never clamped.
    pub fn to_percent(&self, raw: u8) -> Result<u8, CodecError> {
        let span = self.span()?;
        if raw < self.base_min || raw > self.base_max {
            return Err(CodecError::Malformed(format!(
                "raw value {:#04x} outside base range {:#04x}..={:#04x}",
                raw, self.base_min, self.base_max
            )));
        }
        let steps = u32::from(raw - self.base_min);
        Ok((100 * steps / span) as u8)
    }

    /// Convert a percentage (0-100) to a raw register value
    pub fn from_percent(&self, percent: i32) -> Result<u8, CodecError> {
        if !(0..=100).contains(&percent) {
            return Err(CodecError::Invalid(format!("{} is not a percentage (0-100)", percent)));
        }
        let span = self.span()?;
        let steps = (percent as u32 * span + 50) / 100;
        Ok(self.base_min + steps as u8)
    }
}

/// Offset-encoded threshold with a legal physical range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub offset: u8,
    pub min: u8,
    pub max: u8,
}

impl Threshold {
    pub fn new(offset: u8, min: u8, max: u8) -> Self {
        Self { offset, min, max }
    }

    pub fn to_logical(&self, raw: u8) -> i32 {
        i32::from(raw) - i32::from(self.offset)
    }

    pub fn to_physical(&self, logical: i32) -> Result<u8, CodecError> {
        if !(0..=i32::from(u8::MAX)).contains(&logical) {
            return Err(CodecError::Invalid(format!("{} is not a valid threshold", logical)));
        }
        let raw = logical + i32::from(self.offset);
        if raw < i32::from(self.min) || raw > i32::from(self.max) {
            return Err(CodecError::Invalid(format!(
                "{} is out of range ({}-{})",
                logical,
                self.logical_min(),
                self.logical_max()
            )));
        }
        Ok(raw as u8)
    }

    /// Smallest accepted logical value
    pub fn logical_min(&self) -> i32 {
        (i32::from(self.min) - i32::from(self.offset)).max(0)
    }

    /// Largest accepted logical value
    pub fn logical_max(&self) -> i32 {
        i32::from(self.max) - i32::from(self.offset)
    }
}
