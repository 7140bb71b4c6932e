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

//! msi-ec - validated access to MSI laptop embedded controllers
//!
//! The EC is modelled as 256 byte-wide registers behind a
//! [`RegisterTransport`]. A hardware [`Profile`] names the registers that
//! matter and assigns each a [`Codec`]; [`EcController`] then exposes them
//! through `get`/`set` by name.
//!
//! ```no_run
//! use msi_ec::{EcController, EcSysTransport, Profile, Value};
//!
//! let table = Profile::builtin()?.into_table()?;
//! let ec = EcController::new(EcSysTransport::open()?, table);
//! ec.set("cooler_boost", &Value::Switch(true))?;
//! println!("{}", ec.get_text("fw_release_date")?);
//! # Ok::<(), msi_ec::EcError>(())
//! ```

pub mod attribute;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod sequence;
pub mod transport;
pub mod value;

#[cfg(test)]
pub mod test_utils;

pub use attribute::{Access, Attribute, AttributeTable, Location, Span};
pub use codec::{Codec, CodecError, Scale, State, Threshold};
pub use config::{load_profile, profile_path, Profile};
pub use controller::EcController;
pub use error::{EcError, FaultKind, Result, TransportFault};
pub use sequence::read_sequence;
pub use transport::{EcSysTransport, MemoryTransport, RegisterAccess, RegisterTransport};
pub use value::{FirmwareDate, FirmwareRelease, FirmwareTime, Value};
