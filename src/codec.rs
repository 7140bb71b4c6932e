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

//! Codecs between raw register bytes and logical values
//!
//! Every attribute carries one [`Codec`]. The set of codecs is closed and
//! serialised as an internally tagged enum inside profiles:
//!
//! ```json
//! { "type": "toggle", "on": 74, "off": 72 }
//! { "type": "scaled", "base_min": 0, "base_max": 150 }
//! ```
//!
//! # Decode/encode asymmetry
//!
//! Toggles, enumerations and backlight levels decode any byte: a code with no
//! documented meaning becomes [`Value::Unknown`] so that new firmware states
//! never break reads. Encoding is strict and only accepts documented values.

mod firmware;
mod scale;

pub use firmware::{decode_date, decode_time, decode_version, DATE_LENGTH, TIME_LENGTH};
pub use scale::{Scale, Threshold};

use serde::{Deserialize, Serialize};

use crate::error::EcError;
use crate::value::{FirmwareRelease, Value};

/// Highest keyboard backlight level
pub const MAX_BACKLIGHT_LEVEL: u8 = 3;

/// Failure inside a codec, before the attribute name is known
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Caller-supplied value outside the legal domain
    #[error("{0}")]
    Invalid(String),
    /// Physical bytes that do not fit the expected pattern
    #[error("{0}")]
    Malformed(String),
}

impl CodecError {
    pub fn for_attribute(self, attribute: &str) -> EcError {
        match self {
            Self::Invalid(reason) => EcError::InvalidValue { attribute: attribute.to_string(), reason },
            Self::Malformed(reason) => EcError::Decode { attribute: attribute.to_string(), reason },
        }
    }
}

/// Documented state of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub code: u8,
}

impl State {
    pub fn new(name: impl Into<String>, code: u8) -> Self {
        Self { name: name.into(), code }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Codec {
    /// Two codes for on and off
    Toggle { on: u8, off: u8 },
    /// N named codes
    Enumeration { states: Vec<State> },
    /// `physical = logical + offset`, physical limited to `[min, max]`
    Threshold(Threshold),
    /// Base range mapped onto 0-100%
    Scaled(Scale),
    /// The byte itself, e.g. a temperature in degrees Celsius
    Raw,
    /// NUL-padded ASCII version string
    Version,
    /// `MMDDYYYY`
    Date,
    /// `HH:MM:SS`
    Time,
    /// Date sequence followed by time sequence
    Release,
    /// Level 0-3 in the bits selected by `mask`, written as `levels[level]`
    Backlight { mask: u8, levels: [u8; 4] },
}

impl Codec {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Toggle { .. } => "toggle",
            Self::Enumeration { .. } => "enumeration",
            Self::Threshold(_) => "threshold",
            Self::Scaled(_) => "scaled",
            Self::Raw => "raw",
            Self::Version => "version",
            Self::Date => "date",
            Self::Time => "time",
            Self::Release => "release",
            Self::Backlight { .. } => "backlight",
        }
    }

    /// Number of register sequences the codec decodes from
    ///
    /// Zero means the codec works on a single register.
    pub fn sequence_count(&self) -> usize {
        match self {
            Self::Version | Self::Date | Self::Time => 1,
            Self::Release => 2,
            _ => 0,
        }
    }

    /// Whether values can be encoded back into the register space
    pub fn supports_encode(&self) -> bool {
        matches!(
            self,
            Self::Toggle { .. }
                | Self::Enumeration { .. }
                | Self::Threshold(_)
                | Self::Scaled(_)
                | Self::Backlight { .. }
        )
    }

    /// Decode a single register value
    pub fn decode(&self, raw: u8) -> Result<Value, CodecError> {
        match self {
            Self::Toggle { on, off } => Ok(if raw == *on {
                Value::Switch(true)
            } else if raw == *off {
                Value::Switch(false)
            } else {
                Value::Unknown(raw)
            }),
            Self::Enumeration { states } => Ok(states
                .iter()
                .find(|s| s.code == raw)
                .map(|s| Value::Named(s.name.clone()))
                .unwrap_or(Value::Unknown(raw))),
            Self::Threshold(threshold) => Ok(Value::Integer(threshold.to_logical(raw))),
            Self::Scaled(scale) => Ok(Value::Integer(i32::from(scale.to_percent(raw)?))),
            Self::Raw => Ok(Value::Integer(i32::from(raw))),
            Self::Backlight { mask, .. } => {
                let level = raw & mask;
                Ok(if level <= MAX_BACKLIGHT_LEVEL { Value::Level(level) } else { Value::Unknown(raw) })
            }
            Self::Version | Self::Date | Self::Time | Self::Release => Err(CodecError::Malformed(format!(
                "{} fields span several registers",
                self.type_name()
            ))),
        }
    }

    /// Decode a value spread over one or more register sequences
    pub fn decode_sequences(&self, sequences: &[Vec<u8>]) -> Result<Value, CodecError> {
        if sequences.len() != self.sequence_count() || sequences.is_empty() {
            return Err(CodecError::Malformed(format!(
                "{} expects {} register sequence(s), got {}",
                self.type_name(),
                self.sequence_count(),
                sequences.len()
            )));
        }
        match self {
            Self::Version => Ok(Value::Text(decode_version(&sequences[0])?)),
            Self::Date => Ok(Value::Date(decode_date(&sequences[0])?)),
            Self::Time => Ok(Value::Time(decode_time(&sequences[0])?)),
            Self::Release => Ok(Value::Release(FirmwareRelease {
                date: decode_date(&sequences[0])?,
                time: decode_time(&sequences[1])?,
            })),
            _ => Err(CodecError::Malformed(format!("{} values occupy one register", self.type_name()))),
        }
    }

    /// Encode a logical value into a register byte
    pub fn encode(&self, value: &Value) -> Result<u8, CodecError> {
        match (self, value) {
            (Self::Toggle { on, .. }, Value::Switch(true)) => Ok(*on),
            (Self::Toggle { off, .. }, Value::Switch(false)) => Ok(*off),
            (Self::Enumeration { states }, Value::Named(name)) => states
                .iter()
                .find(|s| s.name == *name)
                .map(|s| s.code)
                .ok_or_else(|| self.invalid(value)),
            (Self::Threshold(threshold), Value::Integer(v)) => threshold.to_physical(*v),
            (Self::Scaled(scale), Value::Integer(p)) => scale.from_percent(*p),
            (Self::Backlight { levels, .. }, Value::Level(level)) => levels
                .get(usize::from(*level))
                .copied()
                .ok_or_else(|| self.invalid(value)),
            _ => Err(self.invalid(value)),
        }
    }

    /// Parse the text form of a value, as written to a sysfs file
    ///
    /// A single trailing newline is ignored.
    pub fn parse(&self, text: &str) -> Result<Value, CodecError> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        match self {
            Self::Toggle { .. } => match text {
                "on" => Ok(Value::Switch(true)),
                "off" => Ok(Value::Switch(false)),
                _ => Err(self.invalid_text(text)),
            },
            Self::Enumeration { states } => states
                .iter()
                .find(|s| s.name == text)
                .map(|s| Value::Named(s.name.clone()))
                .ok_or_else(|| self.invalid_text(text)),
            Self::Threshold(_) | Self::Scaled(_) => text
                .parse::<u8>()
                .map(|v| Value::Integer(i32::from(v)))
                .map_err(|_| self.invalid_text(text)),
            Self::Backlight { .. } => text.parse::<u8>().map(Value::Level).map_err(|_| self.invalid_text(text)),
            Self::Raw | Self::Version | Self::Date | Self::Time | Self::Release => {
                Err(CodecError::Invalid(format!("{} values cannot be written", self.type_name())))
            }
        }
    }

    /// Human-readable description of the accepted input
    pub fn expected(&self) -> String {
        match self {
            Self::Toggle { .. } => "on, off".to_string(),
            Self::Enumeration { states } => states.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", "),
            Self::Threshold(threshold) => format!("{}-{}", threshold.logical_min(), threshold.logical_max()),
            Self::Scaled(_) => "0-100".to_string(),
            Self::Backlight { .. } => format!("0-{}", MAX_BACKLIGHT_LEVEL),
            _ => "nothing (read-only)".to_string(),
        }
    }

    /// Check the codec's own parameters
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Toggle { on, off } => {
                if on == off {
                    return Err(format!("on and off share code {:#04x}", on));
                }
            }
            Self::Enumeration { states } => {
                if states.is_empty() {
                    return Err("enumeration has no states".to_string());
                }
                for (i, s) in states.iter().enumerate() {
                    if s.name.is_empty() {
                        return Err(format!("state #{} has an empty name", i + 1));
                    }
                    if states[..i].iter().any(|o| o.name == s.name) {
                        return Err(format!("duplicate state name '{}'", s.name));
                    }
                    if states[..i].iter().any(|o| o.code == s.code) {
                        return Err(format!("duplicate state code {:#04x}", s.code));
                    }
                }
            }
            Self::Threshold(t) => {
                if t.min > t.max {
                    return Err(format!("threshold range {:#04x}..={:#04x} is empty", t.min, t.max));
                }
                if t.offset > t.max {
                    return Err(format!("threshold offset {:#04x} exceeds maximum {:#04x}", t.offset, t.max));
                }
            }
            Self::Scaled(s) => {
                if s.base_min >= s.base_max {
                    return Err(format!("base range {:#04x}..={:#04x} is empty", s.base_min, s.base_max));
                }
            }
            Self::Backlight { mask, levels } => {
                if mask & MAX_BACKLIGHT_LEVEL != MAX_BACKLIGHT_LEVEL {
                    return Err(format!("mask {:#04x} cannot hold level {}", mask, MAX_BACKLIGHT_LEVEL));
                }
                for (i, code) in levels.iter().enumerate() {
                    if levels[..i].contains(code) {
                        return Err(format!("duplicate backlight code {:#04x}", code));
                    }
                }
            }
            Self::Raw | Self::Version | Self::Date | Self::Time | Self::Release => {}
        }
        Ok(())
    }

    fn invalid(&self, value: &Value) -> CodecError {
        CodecError::Invalid(format!("'{}' is not accepted (expected {})", value, self.expected()))
    }

    fn invalid_text(&self, text: &str) -> CodecError {
        CodecError::Invalid(format!("'{}' is not accepted (expected {})", text.escape_debug(), self.expected()))
    }
}
