// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use pb_common::cli::cli_style;
use pb_common::log::init_logger;
use std::path::PathBuf;
use testbed::source::{CommandSource, FileSource};
use testbed::TopologySource;

mod render;
mod resolve;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "testbed resolution and config rendering",
    long_about = None,
    styles = cli_style(),
    infer_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON topology file.
    #[arg(long, global = true)]
    topology: Option<PathBuf>,

    /// Command that prints a JSON topology on stdout, e.g. the emulation
    /// manager's CLI.
    #[arg(long, global = true)]
    topology_cmd: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a testbed against a topology and show the reservation.
    Resolve(resolve::Args),

    /// Render a device's configuration template.
    Render(render::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = init_logger();
    let source = topology_source(&cli)?;

    match cli.command {
        Commands::Resolve(args) => resolve::run(args, &*source, &log),
        Commands::Render(args) => render::run(args, &*source, &log),
    }
}

fn topology_source(cli: &Cli) -> Result<Box<dyn TopologySource>> {
    match (&cli.topology, &cli.topology_cmd) {
        (Some(path), None) => Ok(Box::new(FileSource::new(path))),
        (None, Some(cmd)) => {
            let mut parts = cmd.split_whitespace();
            let program = parts
                .next()
                .ok_or_else(|| anyhow!("empty --topology-cmd"))?;
            let args: Vec<&str> = parts.collect();
            Ok(Box::new(CommandSource::new(program, &args)))
        }
        _ => Err(anyhow!("exactly one of --topology or --topology-cmd is required")),
    }
}
