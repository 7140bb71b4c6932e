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

//! Command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "msi-ec")]
#[command(version)]
#[command(about = "Read and write MSI laptop embedded controller settings")]
#[command(long_about = "Read and write MSI laptop embedded controller settings

EXAMPLES:
    msi-ec                             List every attribute
    msi-ec get fw_release_date         Read one attribute
    msi-ec set shift_mode eco          Write one attribute
    msi-ec --dry-run set cooler_boost on

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging
    MSI_EC_PROFILE=PATH    Use a custom hardware profile

FILES:
    ~/.config/msi-ec/profile.json     User hardware profile
    /etc/msi-ec/profile.json          System hardware profile")]
pub struct Cli {
    /// Work on an in-memory register bank instead of the EC
    #[arg(long)]
    pub dry_run: bool,

    /// Hardware profile to load instead of the default lookup
    #[arg(long, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Log register traffic
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print every attribute as `name: value` (default)
    List,

    /// Print one attribute
    Get { name: String },

    /// Write one attribute from its text form
    Set { name: String, value: String },
}
