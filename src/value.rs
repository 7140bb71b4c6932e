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

//! Logical values exchanged with callers
//!
//! The `Display` impls produce the text representation used by sysfs-style
//! front ends: `on`/`off`, mode names, decimal integers, `unknown (N)` for
//! undocumented codes and `YYYY/MM/DD HH:MM:SS` for the firmware release stamp.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Logical value of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// On/off switch
    Switch(bool),
    /// Documented state of an enumeration, e.g. `balanced`
    Named(String),
    /// Physical code with no documented meaning
    Unknown(u8),
    /// Percentage, threshold or temperature
    Integer(i32),
    /// Keyboard backlight level (0-3)
    Level(u8),
    /// Firmware version string
    Text(String),
    Date(FirmwareDate),
    Time(FirmwareTime),
    Release(FirmwareRelease),
}

impl Value {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch(true) => f.write_str("on"),
            Self::Switch(false) => f.write_str("off"),
            Self::Named(name) => f.write_str(name),
            Self::Unknown(raw) => write!(f, "unknown ({})", raw),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Level(level) => write!(f, "{}", level),
            Self::Text(text) => f.write_str(text),
            Self::Date(date) => write!(f, "{}", date),
            Self::Time(time) => write!(f, "{}", time),
            Self::Release(release) => write!(f, "{}", release),
        }
    }
}

/// Firmware build date as stored by the EC
///
/// Fields hold whatever digits the EC reported; no calendar check is made.
/// Use [`to_naive_date`](Self::to_naive_date) when a real date is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl FirmwareDate {
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

impl fmt::Display for FirmwareDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl FirmwareTime {
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), u32::from(self.second))
    }
}

impl fmt::Display for FirmwareTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Firmware release stamp composed from the date and time fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareRelease {
    pub date: FirmwareDate,
    pub time: FirmwareTime,
}

impl FirmwareRelease {
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(self.date.to_naive_date()?, self.time.to_naive_time()?))
    }
}

impl fmt::Display for FirmwareRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}
