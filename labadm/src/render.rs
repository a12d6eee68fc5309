// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{anyhow, Result};
use confgen::ConfigSpec;
use slog::{info, Logger};
use std::path::PathBuf;
use testbed::{TestbedSpec, TopologySource, Vendor};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to a JSON testbed spec.
    #[arg(long)]
    pub testbed: PathBuf,

    /// Logical device id to render for.
    #[arg(long)]
    pub device: String,

    /// Template file to render.
    #[arg(long)]
    pub file: PathBuf,

    /// Template variables, key=value. Repeatable.
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Bind the template to the OpenConfig slot instead of the device's
    /// vendor slot.
    #[arg(long)]
    pub openconfig: bool,
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
    let device = resolution
        .reservation
        .device(&args.device)
        .ok_or_else(|| anyhow!("no such device in testbed: {}", args.device))?
        .clone();

    let mut cfg = ConfigSpec::new();
    cfg = if args.openconfig {
        cfg.with_openconfig_file(&args.file)
    } else {
        match device.vendor {
            Vendor::Arista => cfg.with_arista_file(&args.file),
            Vendor::Cisco => cfg.with_cisco_file(&args.file),
            Vendor::Juniper => cfg.with_juniper_file(&args.file),
            // Traffic generators take OpenConfig only.
            Vendor::Ixia => cfg.with_openconfig_file(&args.file),
        }
    };
    for (k, v) in &args.vars {
        cfg = cfg.with_var(k, v);
    }

    let rendered = cfg.render(&device)?;
    info!(log, "rendered config";
        "device" => &args.device,
        "bytes" => rendered.text.len(),
        "openconfig" => rendered.openconfig,
    );
    print!("{}", rendered.text);
    Ok(())
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}
