// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Where topologies come from. The resolver treats a source as a
//! synchronous, single-shot query; retry policy belongs to the caller.

use crate::error::SourceError;
use crate::topology::Topology;
use std::path::PathBuf;

pub trait TopologySource: Send + Sync {
    fn fetch(&self) -> Result<Topology, SourceError>;
}

/// A topology description in a JSON file.
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl TopologySource for FileSource {
    fn fetch(&self) -> Result<Topology, SourceError> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// A topology obtained by running an external program, e.g. the emulation
/// manager's CLI, and parsing its stdout.
pub struct CommandSource {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl TopologySource for CommandSource {
    fn fetch(&self) -> Result<Topology, SourceError> {
        let out = std::process::Command::new(&self.program)
            .args(&self.args)
            .output()?;
        if !out.status.success() {
            return Err(SourceError::Command {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&out.stdout)?)
    }
}

/// An in-memory topology, for tests and embedders that already hold one.
pub struct StaticSource(pub Topology);

impl TopologySource for StaticSource {
    fn fetch(&self) -> Result<Topology, SourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_source_round_trip() -> anyhow::Result<()> {
        let topo = Topology {
            name: "t".into(),
            namespace: "ns".into(),
            ..Default::default()
        };
        let dir = std::env::temp_dir();
        let path = dir.join("patchbay_file_source_test.json");
        std::fs::write(&path, serde_json::to_string(&topo)?)?;
        let fetched = FileSource::new(&path).fetch()?;
        std::fs::remove_file(&path)?;
        assert_eq!(fetched.name, "t");
        assert_eq!(fetched.namespace, "ns");
        Ok(())
    }

    #[test]
    fn test_file_source_missing_file() {
        let err = FileSource::new("/nonexistent/topology.json")
            .fetch()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn test_file_source_parse_error() -> anyhow::Result<()> {
        let path =
            std::env::temp_dir().join("patchbay_parse_error_test.json");
        std::fs::write(&path, "not json")?;
        let err = FileSource::new(&path).fetch().unwrap_err();
        std::fs::remove_file(&path)?;
        assert!(matches!(err, SourceError::Parse(_)));
        Ok(())
    }
}
