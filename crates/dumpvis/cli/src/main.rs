// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Memory dump visualizer CLI
//!
//! Renders an allocator's JSON dump into an image file.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, init_logging};
use dumpvis_core::{PROGRAM_VERSION, RenderConfig, Visualizer};
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();
    if cli.version {
        println!("{PROGRAM_VERSION}");
        return;
    }
    init_logging(cli.log_level());

    if let Err(e) = run(cli) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dump_file = cli.dump_file.context("DUMP_FILE is required")?;
    let output = cli.output.context("--output is required")?;
    let config = RenderConfig::resolve_config(cli.config, cli.font).context("Failed to resolve render configuration")?;
    debug!("Render configuration: {:?}", config);

    let visualizer = Visualizer::new(config);
    visualizer.run(&dump_file, &output).with_context(|| format!("Failed to visualize {}", dump_file.display()))?;
    Ok(())
}
