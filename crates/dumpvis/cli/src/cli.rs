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

//! Command-line arguments and logging setup

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "dumpvis")]
#[command(about = "Visualization of a GPU memory allocator JSON dump")]
pub struct Cli {
    /// Path to the JSON dump written by the allocator
    #[arg(value_name = "DUMP_FILE", required_unless_present = "version")]
    pub dump_file: Option<PathBuf>,

    /// Path to the destination image file (e.g. PNG)
    #[arg(short, long, required_unless_present = "version")]
    pub output: Option<PathBuf>,

    /// Render configuration file (TOML), defaults to $DUMPVIS_CONFIG
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// TrueType font used for labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print version
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }
}

/// Installs a stderr fmt subscriber at `level`.
pub fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_ansi(std::io::stderr().is_terminal()).with_target(false).init();
}
