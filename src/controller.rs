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

//! Name-indexed access to EC attributes
//!
//! [`EcController`] is the interface presentation layers call into. Every
//! `get`/`set` is an independent transaction: nothing is cached and writes
//! are not read back. The controller holds no lock of its own; callers that
//! need several calls to be consistent must serialise them.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::attribute::{Attribute, AttributeTable, Location};
use crate::error::{EcError, Result};
use crate::sequence::read_sequence;
use crate::transport::{read_register, write_register, RegisterTransport};
use crate::value::Value;

pub struct EcController<T> {
    transport: T,
    table: Arc<AttributeTable>,
}

impl<T: RegisterTransport> EcController<T> {
    pub fn new(transport: T, table: Arc<AttributeTable>) -> Self {
        Self { transport, table }
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        let attribute = self.table.lookup(name)?;
        let value = self.read_attribute(attribute)?;
        if let Value::Unknown(raw) = value {
            warn!("{} reported undocumented code {:#04x}", name, raw);
        } else {
            debug!("get {} = {}", name, value);
        }
        Ok(value)
    }

    pub fn set(&self, name: &str, value: &Value) -> Result<()> {
        let attribute = self.writable(name)?;
        let Location::Register(address) = attribute.location else {
            return Err(EcError::invalid_config(name, "writable attributes must use a single register"));
        };
        let raw = attribute.codec.encode(value).map_err(|e| {
            warn!("rejected {} = {}: {}", name, value, e);
            e.for_attribute(name)
        })?;
        debug!("set {} = {} ({:#04x})", name, value, raw);
        write_register(&self.transport, address, raw)
    }

    /// Read an attribute and render it as text
    pub fn get_text(&self, name: &str) -> Result<String> {
        self.get(name).map(|v| v.to_string())
    }

    /// Parse `text` with the attribute's codec and write it
    ///
    /// Accepts the same spellings `get_text` produces, plus one trailing newline.
    pub fn set_text(&self, name: &str, text: &str) -> Result<()> {
        let attribute = self.writable(name)?;
        let value = attribute.codec.parse(text).map_err(|e| {
            warn!("rejected {} = {:?}: {}", name, text, e);
            e.for_attribute(name)
        })?;
        self.set(name, &value)
    }

    /// Read every attribute in definition order
    ///
    /// A failing attribute does not stop the others.
    pub fn read_all(&self) -> Vec<(String, Result<Value>)> {
        self.table
            .iter()
            .map(|a| (a.name.clone(), self.get(&a.name)))
            .collect()
    }

    fn writable(&self, name: &str) -> Result<&Attribute> {
        let attribute = self.table.lookup(name)?;
        if !attribute.is_writable() {
            warn!("refused write to read-only attribute {}", name);
            return Err(EcError::ReadOnly(name.to_string()));
        }
        Ok(attribute)
    }

    fn read_attribute(&self, attribute: &Attribute) -> Result<Value> {
        let decoded = match &attribute.location {
            Location::Register(address) => {
                let raw = read_register(&self.transport, *address)?;
                attribute.codec.decode(raw)
            }
            Location::Sequence(_) | Location::Pair(..) => {
                let mut sequences = Vec::new();
                for span in attribute.location.spans() {
                    sequences.push(read_sequence(&self.transport, span.base, usize::from(span.length))?);
                }
                attribute.codec.decode_sequences(&sequences)
            }
        };
        decoded.map_err(|e| e.for_attribute(&attribute.name))
    }
}
