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

//! Register transports
//!
//! The controller core never talks to hardware itself. It consumes a
//! [`RegisterTransport`], which issues one-byte reads and writes against the
//! EC's 256-register address space.
//!
//! Two implementations ship with the crate:
//! - [`EcSysTransport`] - the Linux `ec_sys` debugfs file (`/sys/kernel/debug/ec/ec0/io`)
//! - [`MemoryTransport`] - an in-memory register bank with fault injection
//!
//! Transports must not retry on their own behalf unless that is their
//! documented policy; the core propagates every fault verbatim.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{EcError, Result, TransportFault};

/// Number of addressable EC registers
pub const REGISTER_COUNT: usize = 256;

/// debugfs file exposed by the `ec_sys` kernel module
pub const EC_SYS_IO_PATH: &str = "/sys/kernel/debug/ec/ec0/io";

/// Single-byte access to the EC register space
#[cfg_attr(test, mockall::automock)]
pub trait RegisterTransport: Send + Sync {
    fn read(&self, address: u8) -> std::result::Result<u8, TransportFault>;

    fn write(&self, address: u8, value: u8) -> std::result::Result<(), TransportFault>;
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for Arc<T> {
    fn read(&self, address: u8) -> std::result::Result<u8, TransportFault> {
        (**self).read(address)
    }

    fn write(&self, address: u8, value: u8) -> std::result::Result<(), TransportFault> {
        (**self).write(address, value)
    }
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &T {
    fn read(&self, address: u8) -> std::result::Result<u8, TransportFault> {
        (**self).read(address)
    }

    fn write(&self, address: u8, value: u8) -> std::result::Result<(), TransportFault> {
        (**self).write(address, value)
    }
}

/// Read one register, attaching the address to any transport fault
pub fn read_register<T: RegisterTransport + ?Sized>(transport: &T, address: u8) -> Result<u8> {
    match transport.read(address) {
        Ok(value) => {
            debug!("ec read {:#04x} -> {:#04x}", address, value);
            Ok(value)
        }
        Err(source) => {
            debug!("ec read {:#04x} failed: {}", address, source);
            Err(EcError::RegisterRead { address, source })
        }
    }
}

/// Write one register, attaching the address and value to any transport fault
pub fn write_register<T: RegisterTransport + ?Sized>(transport: &T, address: u8, value: u8) -> Result<()> {
    match transport.write(address, value) {
        Ok(()) => {
            debug!("ec write {:#04x} <- {:#04x}", address, value);
            Ok(())
        }
        Err(source) => {
            debug!("ec write {:#04x} <- {:#04x} failed: {}", address, value, source);
            Err(EcError::RegisterWrite { address, value, source })
        }
    }
}

// ============================================================================
// ec_sys debugfs transport
// ============================================================================

/// Transport backed by the `ec_sys` debugfs interface
///
/// Each register maps to the byte at the same offset in the `io` file. The
/// module must be loaded with `write_support=1` for writes to succeed.
#[derive(Debug)]
pub struct EcSysTransport {
    file: File,
    path: PathBuf,
    writable: bool,
}

impl EcSysTransport {
    /// Open the default `ec_sys` interface
    pub fn open() -> Result<Self> {
        Self::open_path(EC_SYS_IO_PATH)
    }

    /// Open an `ec_sys`-style file at `path`
    ///
    /// Falls back to read-only access when the file cannot be opened for
    /// writing; writes through such a transport fail with an I/O fault.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => Ok(Self { file, path, writable: true }),
            Err(rw_err) if rw_err.kind() == io::ErrorKind::PermissionDenied => {
                match File::open(&path) {
                    Ok(file) => {
                        warn!(path = %path.display(), "EC interface opened read-only; writes will fail");
                        Ok(Self { file, path, writable: false })
                    }
                    Err(e) => Err(open_error(path, e)),
                }
            }
            Err(e) => Err(open_error(path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

fn open_error(path: PathBuf, err: io::Error) -> EcError {
    let reason = match err.kind() {
        io::ErrorKind::NotFound => format!("{} (is the ec_sys module loaded?)", err),
        io::ErrorKind::PermissionDenied if unsafe { libc::geteuid() } != 0 => {
            format!("{} (root privileges are required)", err)
        }
        _ => err.to_string(),
    };
    EcError::TransportOpen { path, reason }
}

impl RegisterTransport for EcSysTransport {
    fn read(&self, address: u8) -> std::result::Result<u8, TransportFault> {
        let mut buf = [0u8; 1];
        match self.file.read_exact_at(&mut buf, u64::from(address)) {
            Ok(()) => Ok(buf[0]),
            // A truncated io file does not cover this register.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(TransportFault::AddressOutOfRange { address: usize::from(address) })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, address: u8, value: u8) -> std::result::Result<(), TransportFault> {
        self.file.write_all_at(&[value], u64::from(address))?;
        Ok(())
    }
}

// ============================================================================
// In-memory transport
// ============================================================================

/// One recorded transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    Read(u8),
    Write(u8, u8),
}

struct Bank {
    registers: [u8; REGISTER_COUNT],
    faults: HashSet<u8>,
    log: Vec<RegisterAccess>,
}

/// Register bank held in memory
///
/// Useful for dry runs and tests. Addresses marked with [`fail_at`](Self::fail_at)
/// report a device fault on both read and write. Every call, failed or not, is
/// recorded in the access log.
pub struct MemoryTransport {
    bank: Mutex<Bank>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            bank: Mutex::new(Bank {
                registers: [0u8; REGISTER_COUNT],
                faults: HashSet::new(),
                log: Vec::new(),
            }),
        }
    }

    /// Create a bank with the given `(address, value)` pairs preloaded
    pub fn with_registers(values: &[(u8, u8)]) -> Self {
        let transport = Self::new();
        for &(address, value) in values {
            transport.poke(address, value);
        }
        transport
    }

    /// Copy `bytes` into consecutive registers starting at `base`
    pub fn load(&self, base: u8, bytes: &[u8]) {
        let mut bank = self.bank.lock();
        for (i, &b) in bytes.iter().enumerate() {
            let address = usize::from(base) + i;
            if address >= REGISTER_COUNT {
                break;
            }
            bank.registers[address] = b;
        }
    }

    /// Read a register without going through the transport or the log
    pub fn peek(&self, address: u8) -> u8 {
        self.bank.lock().registers[usize::from(address)]
    }

    /// Set a register without going through the transport or the log
    pub fn poke(&self, address: u8, value: u8) {
        self.bank.lock().registers[usize::from(address)] = value;
    }

    /// Make every access to `address` fail
    pub fn fail_at(&self, address: u8) {
        self.bank.lock().faults.insert(address);
    }

    pub fn clear_faults(&self) {
        self.bank.lock().faults.clear();
    }

    /// Calls received so far, oldest first
    pub fn accesses(&self) -> Vec<RegisterAccess> {
        self.bank.lock().log.clone()
    }

    pub fn clear_log(&self) {
        self.bank.lock().log.clear();
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterTransport for MemoryTransport {
    fn read(&self, address: u8) -> std::result::Result<u8, TransportFault> {
        let mut bank = self.bank.lock();
        bank.log.push(RegisterAccess::Read(address));
        if bank.faults.contains(&address) {
            return Err(TransportFault::Device(format!("injected fault at {:#04x}", address)));
        }
        Ok(bank.registers[usize::from(address)])
    }

    fn write(&self, address: u8, value: u8) -> std::result::Result<(), TransportFault> {
        let mut bank = self.bank.lock();
        bank.log.push(RegisterAccess::Write(address, value));
        if bank.faults.contains(&address) {
            return Err(TransportFault::Device(format!("injected fault at {:#04x}", address)));
        }
        bank.registers[usize::from(address)] = value;
        Ok(())
    }
}
