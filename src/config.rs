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

//! Hardware profiles
//!
//! Register addresses, codes, threshold offsets and fan base ranges are
//! model-specific and live in a JSON profile rather than in code. A profile
//! is loaded once at startup, validated, and turned into an immutable
//! [`AttributeTable`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attribute::{Attribute, AttributeTable};
use crate::error::{EcError, Result};

/// Environment variable overriding the profile location
pub const PROFILE_ENV: &str = "MSI_EC_PROFILE";

const BUILTIN_PROFILE: &str = include_str!("../profiles/msi-ec.json");

/// Profiles larger than this are refused
const MAX_PROFILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// EC firmware family the profile was written for, e.g. `14C1EMS1`
    pub model: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Profile {
    /// Profile shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PROFILE)
    }

    /// Parse and validate a profile from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Profile = serde_json::from_str(json)?;
        validate_profile(&profile)?;
        Ok(profile)
    }

    /// Read, parse and validate a profile file
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| EcError::ProfileRead { path: path.to_path_buf(), source: e })?;
        if meta.len() > MAX_PROFILE_SIZE {
            return Err(EcError::config(format!(
                "profile {} is {} bytes (max {})",
                path.display(),
                meta.len(),
                MAX_PROFILE_SIZE
            )));
        }
        let data = fs::read_to_string(path).map_err(|e| EcError::ProfileRead { path: path.to_path_buf(), source: e })?;
        let profile = Self::from_json(&data)?;
        info!("loaded profile {} ({} attributes) from {}", profile.model, profile.attributes.len(), path.display());
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_table(self) -> Result<Arc<AttributeTable>> {
        AttributeTable::new(self.attributes).map(Arc::new)
    }
}

/// Where to look for a user-supplied profile
pub fn profile_path() -> PathBuf {
    if let Ok(path) = env::var(PROFILE_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("msi-ec").join("profile.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config").join("msi-ec").join("profile.json");
    }
    system_profile_path()
}

pub fn system_profile_path() -> PathBuf {
    PathBuf::from("/etc/msi-ec/profile.json")
}

/// Load the profile at [`profile_path`], or the builtin one if none exists
pub fn load_profile() -> Result<Profile> {
    let path = profile_path();
    if path.exists() {
        return Profile::load(&path);
    }
    let system = system_profile_path();
    if system.exists() {
        return Profile::load(&system);
    }
    debug!("no profile at {}, using builtin", path.display());
    Profile::builtin()
}

pub fn validate_profile(profile: &Profile) -> Result<()> {
    let model = profile.model.trim();
    if model.is_empty() || model.len() > 64 {
        return Err(EcError::invalid_config("model", "must be 1-64 characters"));
    }
    if profile.attributes.is_empty() {
        return Err(EcError::invalid_config("attributes", "profile defines no attributes"));
    }
    if profile.attributes.len() > 256 {
        return Err(EcError::invalid_config("attributes", "too many attributes (max 256)"));
    }
    AttributeTable::new(profile.attributes.clone()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Access, Location};
    use crate::codec::{Codec, Scale};
    use crate::error::FaultKind;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn minimal_profile() -> Profile {
        Profile {
            model: "TEST".to_string(),
            description: None,
            attributes: vec![Attribute::new(
                "cpu/basic_fan_speed",
                Access::ReadWrite,
                Location::Register(0x89),
                Codec::Scaled(Scale::new(0x00, 0x96)),
            )],
        }
    }

    #[test]
    fn test_builtin_profile_is_valid() {
        let profile = Profile::builtin().unwrap();
        assert_eq!(profile.model, "14C1EMS1");
        let table = profile.into_table().unwrap();
        for name in [
            "webcam",
            "fn_key",
            "win_key",
            "battery_mode",
            "cooler_boost",
            "shift_mode",
            "fan_mode",
            "fw_version",
            "fw_release_date",
            "charge_control_start_threshold",
            "charge_control_end_threshold",
            "cpu/realtime_temperature",
            "cpu/realtime_fan_speed",
            "cpu/basic_fan_speed",
            "gpu/realtime_temperature",
            "gpu/realtime_fan_speed",
            "mute_led",
            "micmute_led",
            "kbd_backlight",
        ] {
            assert!(table.get(name).is_some(), "builtin profile lacks {}", name);
        }
    }

    #[test]
    fn test_builtin_profile_access_modes() {
        let table = Profile::builtin().unwrap().into_table().unwrap();
        assert!(!table.get("fw_version").unwrap().is_writable());
        assert!(!table.get("cpu/realtime_fan_speed").unwrap().is_writable());
        assert!(table.get("cpu/basic_fan_speed").unwrap().is_writable());
        assert!(table.get("kbd_backlight").unwrap().is_writable());
    }

    #[test]
    fn test_json_round_trip_preserves_table() {
        let profile = Profile::builtin().unwrap();
        let json = profile.to_json().unwrap();
        let again = Profile::from_json(&json).unwrap();
        assert_eq!(again.attributes, profile.attributes);
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut profile = minimal_profile();
        profile.model = "  ".to_string();
        assert_eq!(validate_profile(&profile).unwrap_err().kind(), FaultKind::Config);
    }

    #[test]
    fn test_validate_rejects_empty_attribute_list() {
        let mut profile = minimal_profile();
        profile.attributes.clear();
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut profile = minimal_profile();
        profile.attributes.push(profile.attributes[0].clone());
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let json = r#"{"model":"X","attributes":[],"extra":1}"#;
        assert_eq!(Profile::from_json(json).unwrap_err().kind(), FaultKind::Config);
    }

    #[test]
    fn test_from_json_rejects_bad_codec_parameters() {
        let json = r#"{
            "model": "X",
            "attributes": [
                {"name": "cpu/basic_fan_speed", "access": "read_write",
                 "location": {"register": 137},
                 "codec": {"type": "scaled", "base_min": 150, "base_max": 0}}
            ]
        }"#;
        let err = Profile::from_json(json).unwrap_err();
        assert!(err.to_string().contains("cpu/basic_fan_speed"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(minimal_profile().to_json().unwrap().as_bytes()).unwrap();
        let profile = Profile::load(file.path()).unwrap();
        assert_eq!(profile.model, "TEST");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Profile::load(Path::new("/nonexistent/msi-ec/profile.json")).unwrap_err();
        assert!(matches!(err, EcError::ProfileRead { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(Profile::load(file.path()), Err(EcError::JsonParse(_))));
    }

    #[test]
    #[serial]
    fn test_profile_path_env_override() {
        env::set_var(PROFILE_ENV, "/tmp/custom.json");
        assert_eq!(profile_path(), PathBuf::from("/tmp/custom.json"));
        env::remove_var(PROFILE_ENV);
    }

    #[test]
    #[serial]
    fn test_profile_path_with_xdg() {
        env::remove_var(PROFILE_ENV);
        env::set_var("XDG_CONFIG_HOME", "/custom/config");
        assert_eq!(profile_path(), PathBuf::from("/custom/config/msi-ec/profile.json"));
        env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    #[serial]
    fn test_profile_path_with_home() {
        env::remove_var(PROFILE_ENV);
        env::remove_var("XDG_CONFIG_HOME");
        let old_home = env::var("HOME").ok();
        env::set_var("HOME", "/home/testuser");
        assert_eq!(profile_path(), PathBuf::from("/home/testuser/.config/msi-ec/profile.json"));
        match old_home {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
    }

    #[test]
    #[serial]
    fn test_load_profile_prefers_env_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, minimal_profile().to_json().unwrap()).unwrap();

        env::set_var(PROFILE_ENV, &path);
        let profile = load_profile().unwrap();
        env::remove_var(PROFILE_ENV);
        assert_eq!(profile.model, "TEST");
    }

    #[test]
    fn test_system_profile_path() {
        assert_eq!(system_profile_path(), PathBuf::from("/etc/msi-ec/profile.json"));
    }
}
