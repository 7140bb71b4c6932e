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

//! Multi-register reads
//!
//! Fields such as the firmware version span several consecutive registers and
//! only make sense as a whole. [`read_sequence`] reads them in ascending
//! address order and either returns every byte or none of them.

use crate::error::{EcError, Result};
use crate::transport::{read_register, RegisterTransport, REGISTER_COUNT};

/// Read `length` consecutive registers starting at `base`
///
/// The first failing read aborts the whole sequence and its fault is
/// returned; bytes already read are dropped. A range that would run past the
/// last register is rejected before any transport call.
pub fn read_sequence<T: RegisterTransport + ?Sized>(transport: &T, base: u8, length: usize) -> Result<Vec<u8>> {
    if length == 0 {
        return Err(EcError::config(format!("empty register sequence at {:#04x}", base)));
    }
    if usize::from(base) + length > REGISTER_COUNT {
        return Err(EcError::config(format!(
            "register sequence {:#04x}+{} runs past the end of the register space",
            base, length
        )));
    }

    let mut bytes = Vec::with_capacity(length);
    for address in base..=base + (length - 1) as u8 {
        bytes.push(read_register(transport, address)?);
    }
    Ok(bytes)
}
