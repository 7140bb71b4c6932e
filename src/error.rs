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

//! Error types shared by every layer of the crate.
//!
//! Transports report [`TransportFault`]; everything above them reports
//! [`EcError`]. The fault kind of an error survives propagation and can be
//! queried with [`EcError::kind`].

use std::io;
use std::path::PathBuf;

/// Result type alias using EcError
pub type Result<T> = std::result::Result<T, EcError>;

/// Failure reported by a register transport
#[derive(thiserror::Error, Debug)]
pub enum TransportFault {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("address {address:#04x} is outside the register space")]
    AddressOutOfRange { address: usize },

    #[error("{0}")]
    Device(String),
}

/// Broad classification of an [`EcError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transport,
    Validation,
    Decode,
    Access,
    Config,
}

#[derive(thiserror::Error, Debug)]
pub enum EcError {
    // ============================================================================
    // Register Access Errors
    // ============================================================================
    #[error("Failed to read register {address:#04x}: {source}")]
    RegisterRead {
        address: u8,
        source: TransportFault,
    },

    #[error("Failed to write {value:#04x} to register {address:#04x}: {source}")]
    RegisterWrite {
        address: u8,
        value: u8,
        source: TransportFault,
    },

    #[error("Failed to open EC interface {path}: {reason}")]
    TransportOpen {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // Value Errors
    // ============================================================================
    #[error("Invalid value for {attribute}: {reason}")]
    InvalidValue {
        attribute: String,
        reason: String,
    },

    #[error("Failed to decode {attribute}: {reason}")]
    Decode {
        attribute: String,
        reason: String,
    },

    // ============================================================================
    // Access Errors
    // ============================================================================
    #[error("Attribute {0} is read-only")]
    ReadOnly(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("Failed to read profile {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl EcError {
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::RegisterRead { .. } | Self::RegisterWrite { .. } | Self::TransportOpen { .. } => {
                FaultKind::Transport
            }
            Self::InvalidValue { .. } => FaultKind::Validation,
            Self::Decode { .. } => FaultKind::Decode,
            Self::ReadOnly(_) | Self::UnknownAttribute(_) => FaultKind::Access,
            Self::Config(_)
            | Self::InvalidConfig { .. }
            | Self::ProfileRead { .. }
            | Self::JsonParse(_) => FaultKind::Config,
        }
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid configuration error for one field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
