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

mod cli;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Commands};
use msi_ec::logger::{init_logging, DEFAULT_LOG_LEVEL};
use msi_ec::{load_profile, EcController, EcSysTransport, MemoryTransport, Profile, RegisterTransport};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.verbose { "debug" } else { DEFAULT_LOG_LEVEL });

    let profile = match &cli.profile {
        Some(path) => Profile::load(path),
        None => load_profile(),
    }
    .context("failed to load EC profile")?;
    let table = profile.into_table()?;

    let command = cli.command.unwrap_or(Commands::List);
    if cli.dry_run {
        run(&EcController::new(MemoryTransport::new(), table), command)
    } else {
        let transport = EcSysTransport::open().context("failed to open the EC")?;
        run(&EcController::new(transport, table), command)
    }
}

fn run<T: RegisterTransport>(ec: &EcController<T>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            for (name, result) in ec.read_all() {
                match result {
                    Ok(value) => println!("{}: {}", name, value),
                    Err(e) => println!("{}: <{}>", name, e),
                }
            }
        }
        Commands::Get { name } => println!("{}", ec.get_text(&name)?),
        Commands::Set { name, value } => ec.set_text(&name, &value)?,
    }
    Ok(())
}
