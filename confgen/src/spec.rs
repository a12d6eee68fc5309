// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-push configuration spec. A spec is built fresh for each push or
//! append and holds per-vendor configuration sources plus a variable store
//! consumed by the template engine.

use crate::error::ConfigError;
use crate::template;
use std::collections::BTreeMap;
use std::path::PathBuf;
use testbed::{ResolvedDevice, Vendor};

/// One vendor slot of a config spec. A later text/file call for the same
/// slot replaces the earlier one; exactly one of text or file is ever held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    #[default]
    Unset,
    Text(String),
    File(PathBuf),
}

impl ConfigSource {
    /// Materialize the raw template text. File content is read here, at
    /// render time, and used verbatim.
    fn load(&self) -> Result<Option<String>, ConfigError> {
        match self {
            ConfigSource::Unset => Ok(None),
            ConfigSource::Text(text) => Ok(Some(text.clone())),
            ConfigSource::File(path) => {
                Ok(Some(std::fs::read_to_string(path)?))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigSpec {
    arista: ConfigSource,
    cisco: ConfigSource,
    juniper: ConfigSource,
    openconfig: ConfigSource,
    vars: BTreeMap<String, String>,
}

/// The outcome of rendering: the literal text to transmit and whether the
/// OpenConfig branch of the precedence rule fired. The flag travels to the
/// transport separately; it is never mixed into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub openconfig: bool,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arista_text(mut self, text: &str) -> Self {
        self.arista = ConfigSource::Text(text.into());
        self
    }

    pub fn with_arista_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.arista = ConfigSource::File(path.into());
        self
    }

    pub fn with_cisco_text(mut self, text: &str) -> Self {
        self.cisco = ConfigSource::Text(text.into());
        self
    }

    pub fn with_cisco_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cisco = ConfigSource::File(path.into());
        self
    }

    pub fn with_juniper_text(mut self, text: &str) -> Self {
        self.juniper = ConfigSource::Text(text.into());
        self
    }

    pub fn with_juniper_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.juniper = ConfigSource::File(path.into());
        self
    }

    pub fn with_openconfig_text(mut self, text: &str) -> Self {
        self.openconfig = ConfigSource::Text(text.into());
        self
    }

    pub fn with_openconfig_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.openconfig = ConfigSource::File(path.into());
        self
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var_map(mut self, map: BTreeMap<String, String>) -> Self {
        self.vars.extend(map);
        self
    }

    /// Render the configuration for a resolved device. Vendor-specific
    /// configuration always wins over OpenConfig, regardless of the order
    /// the builder calls were made; with neither present the device's
    /// vendor is named in the error.
    pub fn render(
        &self,
        device: &ResolvedDevice,
    ) -> Result<Rendered, ConfigError> {
        let slot = match device.vendor {
            Vendor::Arista => Some(&self.arista),
            Vendor::Cisco => Some(&self.cisco),
            Vendor::Juniper => Some(&self.juniper),
            // Traffic generators carry no CLI vendor slot; only an
            // OpenConfig push can reach them.
            Vendor::Ixia => None,
        };

        let (raw, openconfig) = match slot.and_then(|s| s.load().transpose())
        {
            Some(loaded) => (loaded?, false),
            None => match self.openconfig.load()? {
                Some(text) => (text, true),
                None => {
                    return Err(ConfigError::NoVendorConfig(device.vendor))
                }
            },
        };

        let text = template::expand(&raw, device, &self.vars)?;
        Ok(Rendered { text, openconfig })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn device(vendor: Vendor) -> ResolvedDevice {
        ResolvedDevice {
            id: "dut1".into(),
            name: "node0".into(),
            vendor,
            hardware_model: "X".into(),
            software_version: "X".into(),
            ports: [("port1".to_string(), "Et1/2/3".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_render_vendor_text_selected() {
        let spec = ConfigSpec::new()
            .with_arista_text("Arista config")
            .with_cisco_text("Cisco config")
            .with_juniper_text("Juniper config");
        let got = spec.render(&device(Vendor::Arista)).unwrap();
        assert_eq!(
            got,
            Rendered {
                text: "Arista config".into(),
                openconfig: false,
            }
        );
    }

    #[test]
    fn test_render_openconfig_fallback() {
        let spec = ConfigSpec::new()
            .with_openconfig_text("Openconfig")
            .with_cisco_text("Cisco config");
        let got = spec.render(&device(Vendor::Arista)).unwrap();
        assert_eq!(
            got,
            Rendered {
                text: "Openconfig".into(),
                openconfig: true,
            }
        );
    }

    #[test]
    fn test_render_vendor_overrides_openconfig() {
        // Declaration order must not matter.
        let spec = ConfigSpec::new()
            .with_openconfig_text("Openconfig")
            .with_arista_text("Arista config");
        let got = spec.render(&device(Vendor::Arista)).unwrap();
        assert_eq!(
            got,
            Rendered {
                text: "Arista config".into(),
                openconfig: false,
            }
        );
    }

    #[test]
    fn test_render_no_config_names_vendor() {
        let spec = ConfigSpec::new().with_cisco_text("Cisco config");
        let err = spec.render(&device(Vendor::Arista)).unwrap_err();
        assert!(matches!(err, ConfigError::NoVendorConfig(Vendor::Arista)));
        assert!(err.to_string().contains("Arista"));
    }

    #[test]
    fn test_render_from_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join("patchbay_confgen_test.cfg");
        std::fs::write(&path, "file config")?;
        let spec = ConfigSpec::new().with_arista_file(&path);
        let got = spec.render(&device(Vendor::Arista))?;
        std::fs::remove_file(&path)?;
        assert_eq!(got.text, "file config");
        assert!(!got.openconfig);
        Ok(())
    }

    #[test]
    fn test_render_openconfig_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join("patchbay_confgen_oc_test.cfg");
        std::fs::write(&path, "oc config")?;
        let spec = ConfigSpec::new().with_openconfig_file(&path);
        let got = spec.render(&device(Vendor::Arista))?;
        std::fs::remove_file(&path)?;
        assert_eq!(got.text, "oc config");
        assert!(got.openconfig);
        Ok(())
    }

    #[test]
    fn test_render_expands_template() {
        let spec = ConfigSpec::new()
            .with_arista_text(r#"reconfigure {{ port "port1" }}"#);
        let got = spec.render(&device(Vendor::Arista)).unwrap();
        assert_eq!(got.text, "reconfigure Et1/2/3");
    }

    #[test]
    fn test_render_var_single_and_map_agree() {
        let template = r#"hello {{ var "foo" }} there"#;
        let single = ConfigSpec::new()
            .with_arista_text(template)
            .with_var("foo", "bar");
        let map = ConfigSpec::new().with_arista_text(template).with_var_map(
            [("foo".to_string(), "bar".to_string())].into_iter().collect(),
        );
        let dev = device(Vendor::Arista);
        assert_eq!(
            single.render(&dev).unwrap().text,
            map.render(&dev).unwrap().text
        );
        assert_eq!(single.render(&dev).unwrap().text, "hello bar there");
    }

    #[test]
    fn test_render_ixia_requires_openconfig() {
        let spec = ConfigSpec::new().with_arista_text("Arista config");
        let err = spec.render(&device(Vendor::Ixia)).unwrap_err();
        assert!(matches!(err, ConfigError::NoVendorConfig(Vendor::Ixia)));
    }

    #[test]
    fn test_later_slot_call_replaces_earlier() {
        let spec = ConfigSpec::new()
            .with_arista_text("first")
            .with_arista_text("second");
        let got = spec.render(&device(Vendor::Arista)).unwrap();
        assert_eq!(got.text, "second");
    }
}
