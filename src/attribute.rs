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

//! Attribute definitions and the validated attribute table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::{EcError, Result};
use crate::transport::REGISTER_COUNT;

const MAX_NAME_LEN: usize = 64;

/// Consecutive registers forming one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub base: u8,
    pub length: u8,
}

impl Span {
    pub fn new(base: u8, length: u8) -> Self {
        Self { base, length }
    }

    /// One past the last register, which may be 256
    pub fn end(&self) -> usize {
        usize::from(self.base) + usize::from(self.length)
    }
}

/// Where an attribute lives in the register space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Register(u8),
    Sequence(Span),
    /// Two sequences decoded together, e.g. release date and time
    Pair(Span, Span),
}

impl Location {
    pub fn spans(&self) -> Vec<Span> {
        match self {
            Self::Register(_) => Vec::new(),
            Self::Sequence(span) => vec![*span],
            Self::Pair(a, b) => vec![*a, *b],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// A named control bound to a location and a codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attribute {
    pub name: String,
    pub access: Access,
    pub location: Location,
    pub codec: Codec,
}

impl Attribute {
    pub fn new(name: impl Into<String>, access: Access, location: Location, codec: Codec) -> Self {
        Self {
            name: name.into(),
            access,
            location,
            codec,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }

    /// Check name, location and codec for consistency
    pub fn validate(&self) -> Result<()> {
        if !is_safe_name(&self.name) {
            return Err(EcError::invalid_config(
                if self.name.is_empty() { "<unnamed>" } else { self.name.as_str() },
                "name must be 1-64 characters of [A-Za-z0-9_./-]",
            ));
        }
        let fail = |reason: String| EcError::invalid_config(self.name.clone(), reason);

        self.codec.validate().map_err(fail)?;

        let spans = self.location.spans();
        if spans.len() != self.codec.sequence_count() {
            return Err(fail(format!(
                "{} codec cannot be used with this location",
                self.codec.type_name()
            )));
        }
        for span in &spans {
            if span.length == 0 {
                return Err(fail(format!("empty register sequence at {:#04x}", span.base)));
            }
            if span.end() > REGISTER_COUNT {
                return Err(fail(format!(
                    "sequence {:#04x}+{} runs past the last register",
                    span.base, span.length
                )));
            }
        }
        if self.is_writable() && !self.codec.supports_encode() {
            return Err(fail(format!("{} attributes must be read_only", self.codec.type_name())));
        }
        Ok(())
    }
}

fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
}

/// Validated, immutable set of attributes indexed by name
///
/// Definition order is preserved for listing.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl AttributeTable {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        let mut index = HashMap::with_capacity(attributes.len());
        for (i, attribute) in attributes.iter().enumerate() {
            attribute.validate()?;
            if index.insert(attribute.name.clone(), i).is_some() {
                return Err(EcError::invalid_config(attribute.name.clone(), "duplicate attribute name"));
            }
        }
        Ok(Self { attributes, index })
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Look up an attribute, failing with an access fault for unknown names
    pub fn lookup(&self, name: &str) -> Result<&Attribute> {
        self.get(name).ok_or_else(|| EcError::UnknownAttribute(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Scale, State};
    use crate::error::FaultKind;

    fn webcam() -> Attribute {
        Attribute::new(
            "webcam",
            Access::ReadWrite,
            Location::Register(0x2e),
            Codec::Toggle { on: 0x4a, off: 0x48 },
        )
    }

    fn fw_version() -> Attribute {
        Attribute::new("fw_version", Access::ReadOnly, Location::Sequence(Span::new(0xa0, 12)), Codec::Version)
    }

    #[test]
    fn test_valid_attributes() {
        assert!(webcam().validate().is_ok());
        assert!(fw_version().validate().is_ok());
        let release = Attribute::new(
            "fw_release_date",
            Access::ReadOnly,
            Location::Pair(Span::new(0xac, 8), Span::new(0xb4, 8)),
            Codec::Release,
        );
        assert!(release.validate().is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(is_safe_name("cpu/basic_fan_speed"));
        assert!(is_safe_name("charge_control_end_threshold"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("web cam"));
        assert!(!is_safe_name("webcam\n"));
        assert!(!is_safe_name(&"a".repeat(65)));
    }

    #[test]
    fn test_codec_location_mismatch() {
        let mut attr = fw_version();
        attr.location = Location::Register(0xa0);
        assert!(attr.validate().is_err());

        let mut attr = webcam();
        attr.location = Location::Sequence(Span::new(0x2e, 1));
        assert!(attr.validate().is_err());

        let mut attr = fw_version();
        attr.codec = Codec::Release;
        assert!(attr.validate().is_err());
    }

    #[test]
    fn test_span_bounds() {
        let mut attr = fw_version();
        attr.location = Location::Sequence(Span::new(0xf8, 8));
        assert!(attr.validate().is_ok());
        attr.location = Location::Sequence(Span::new(0xf9, 8));
        assert!(attr.validate().is_err());
        attr.location = Location::Sequence(Span::new(0x10, 0));
        assert!(attr.validate().is_err());
    }

    #[test]
    fn test_read_only_codecs_cannot_be_writable() {
        let mut attr = fw_version();
        attr.access = Access::ReadWrite;
        let err = attr.validate().unwrap_err();
        assert_eq!(err.kind(), FaultKind::Config);

        let temp = Attribute::new("cpu/realtime_temperature", Access::ReadWrite, Location::Register(0x68), Codec::Raw);
        assert!(temp.validate().is_err());
    }

    #[test]
    fn test_invalid_codec_surfaces_attribute_name() {
        let attr = Attribute::new(
            "cpu/basic_fan_speed",
            Access::ReadWrite,
            Location::Register(0x89),
            Codec::Scaled(Scale::new(0x20, 0x10)),
        );
        let err = attr.validate().unwrap_err();
        assert!(err.to_string().contains("cpu/basic_fan_speed"));
    }

    #[test]
    fn test_table_lookup() {
        let table = AttributeTable::new(vec![webcam(), fw_version()]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.lookup("webcam").unwrap().location, Location::Register(0x2e));
        let err = table.lookup("bluetooth").unwrap_err();
        assert_eq!(err.kind(), FaultKind::Access);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["webcam", "fw_version"]);
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let err = AttributeTable::new(vec![webcam(), webcam()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_table_rejects_invalid_member() {
        let bad = Attribute::new(
            "fan_mode",
            Access::ReadWrite,
            Location::Register(0xf4),
            Codec::Enumeration { states: vec![State::new("silent", 0x1d), State::new("basic", 0x1d)] },
        );
        assert!(AttributeTable::new(vec![webcam(), bad]).is_err());
    }

    #[test]
    fn test_location_serde() {
        let json = serde_json::to_string(&Location::Register(46)).unwrap();
        assert_eq!(json, r#"{"register":46}"#);
        let pair: Location =
            serde_json::from_str(r#"{"pair":[{"base":172,"length":8},{"base":180,"length":8}]}"#).unwrap();
        assert_eq!(pair, Location::Pair(Span::new(0xac, 8), Span::new(0xb4, 8)));
    }

    #[test]
    fn test_attribute_serde_rejects_unknown_fields() {
        let json = r#"{"name":"webcam","access":"read_write","location":{"register":46},
                      "codec":{"type":"toggle","on":74,"off":72},"mode":"0644"}"#;
        assert!(serde_json::from_str::<Attribute>(json).is_err());
    }
}
