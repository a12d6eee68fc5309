// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Result;
use colored::Colorize;
use slog::Logger;
use std::io::Write;
use std::path::PathBuf;
use tabwriter::TabWriter;
use testbed::{ResolvedDevice, TestbedSpec, TopologySource};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to a JSON testbed spec.
    #[arg(long)]
    pub testbed: PathBuf,
}

pub fn run(
    args: Args,
    source: &dyn TopologySource,
    log: &Logger,
) -> Result<()> {
    let spec: TestbedSpec =
        serde_json::from_str(&std::fs::read_to_string(&args.testbed)?)?;
    let topo = source.fetch()?;
    let resolution = testbed::resolve(&spec, &topo, log)?;
    let res = &resolution.reservation;

    println!("reservation {}", res.id);

    let mut tw = TabWriter::new(std::io::stdout());
    writeln!(
        &mut tw,
        "{}\t{}\t{}\t{}\t{}\t{}",
        "Device".dimmed(),
        "Node".dimmed(),
        "Vendor".dimmed(),
        "Type".dimmed(),
        "Port".dimmed(),
        "Interface".dimmed(),
    )?;
    for dev in res.duts.values().chain(res.otgs.values()) {
        write_device(&mut tw, dev)?;
    }
    tw.flush()?;

    if !resolution.gnmi.is_empty() {
        println!();
        let mut tw = TabWriter::new(std::io::stdout());
        writeln!(
            &mut tw,
            "{}\t{}",
            "Device".dimmed(),
            "gNMI".dimmed(),
        )?;
        for (id, addr) in &resolution.gnmi {
            writeln!(&mut tw, "{}\t{}", id, addr)?;
        }
        tw.flush()?;
    }

    Ok(())
}

fn write_device<W: Write>(tw: &mut W, dev: &ResolvedDevice) -> Result<()> {
    for (port, iface) in &dev.ports {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}\t{}",
            dev.id, dev.name, dev.vendor, dev.hardware_model, port, iface,
        )?;
    }
    if dev.ports.is_empty() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t-\t-",
            dev.id, dev.name, dev.vendor, dev.hardware_model,
        )?;
    }
    Ok(())
}
