// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-run session: owns the single live reservation and fronts the
//! binding for config pushes and protocol dials. Constructed explicitly by
//! the test-run coordinator and passed by reference; there is no hidden
//! process-wide registry.

use crate::error::BindError;
use crate::{Binding, Channel, PushOptions, StreamClient};
use confgen::ConfigSpec;
use pb_common::lock;
use slog::{info, Logger};
use std::sync::{Arc, Mutex};
use testbed::{Reservation, ResolvedDevice, TestbedSpec};
use uuid::Uuid;

pub struct Session {
    binding: Arc<dyn Binding>,
    reservation: Mutex<Option<Reservation>>,
    log: Logger,
}

impl Session {
    pub fn new(binding: Arc<dyn Binding>, log: Logger) -> Self {
        Self {
            binding,
            reservation: Mutex::new(None),
            log,
        }
    }

    /// Reserve a testbed for this run. At most one reservation is live at
    /// a time; reserving twice without a release is an error.
    pub fn reserve(&self, spec: &TestbedSpec) -> Result<Uuid, BindError> {
        let mut slot = lock!(self.reservation);
        if slot.is_some() {
            return Err(BindError::AlreadyReserved);
        }
        let reservation = self.binding.reserve(spec)?;
        let id = reservation.id;
        info!(self.log, "session reserved"; "reservation" => %id);
        *slot = Some(reservation);
        Ok(id)
    }

    /// Release the live reservation at teardown.
    pub fn release(&self) -> Result<(), BindError> {
        let mut slot = lock!(self.reservation);
        let reservation = slot.take().ok_or(BindError::NotReserved)?;
        info!(self.log, "session released"; "reservation" => %reservation.id);
        self.binding.release()
    }

    pub fn dut(&self, id: &str) -> Result<ResolvedDevice, BindError> {
        let slot = lock!(self.reservation);
        let reservation = slot.as_ref().ok_or(BindError::NotReserved)?;
        reservation
            .duts
            .get(id)
            .cloned()
            .ok_or_else(|| BindError::UnknownDevice(id.to_string()))
    }

    pub fn otg(&self, id: &str) -> Result<ResolvedDevice, BindError> {
        let slot = lock!(self.reservation);
        let reservation = slot.as_ref().ok_or(BindError::NotReserved)?;
        reservation
            .otgs
            .get(id)
            .cloned()
            .ok_or_else(|| BindError::UnknownDevice(id.to_string()))
    }

    /// Replace the device's configuration with the rendered spec.
    pub fn push_config(
        &self,
        dut_id: &str,
        cfg: &ConfigSpec,
    ) -> Result<(), BindError> {
        self.push(dut_id, cfg, false)
    }

    /// Add the rendered spec to the device's configuration.
    pub fn append_config(
        &self,
        dut_id: &str,
        cfg: &ConfigSpec,
    ) -> Result<(), BindError> {
        self.push(dut_id, cfg, true)
    }

    fn push(
        &self,
        dut_id: &str,
        cfg: &ConfigSpec,
        append: bool,
    ) -> Result<(), BindError> {
        let dut = self.dut(dut_id)?;
        // Render first: any template failure aborts the push before the
        // transport is touched.
        let rendered = cfg.render(&dut)?;
        let opts = PushOptions {
            openconfig: rendered.openconfig,
            append,
        };
        info!(self.log, "pushing config";
            "device" => dut_id,
            "bytes" => rendered.text.len(),
            "openconfig" => opts.openconfig,
            "append" => opts.append,
        );
        self.binding.push_config(&dut, &rendered.text, &opts)
    }

    pub fn dial_gnmi(&self, dut_id: &str) -> Result<Channel, BindError> {
        self.binding.dial_gnmi(&self.dut(dut_id)?)
    }

    pub fn dial_gnoi(&self, dut_id: &str) -> Result<Channel, BindError> {
        self.binding.dial_gnoi(&self.dut(dut_id)?)
    }

    pub fn dial_p4rt(&self, dut_id: &str) -> Result<Channel, BindError> {
        self.binding.dial_p4rt(&self.dut(dut_id)?)
    }

    pub fn dial_cli(
        &self,
        dut_id: &str,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        self.binding.dial_cli(&self.dut(dut_id)?)
    }

    pub fn dial_console(
        &self,
        dut_id: &str,
    ) -> Result<Box<dyn StreamClient>, BindError> {
        self.binding.dial_console(&self.dut(dut_id)?)
    }

    pub fn dial_otg(
        &self,
        server: &str,
        https: bool,
    ) -> Result<Channel, BindError> {
        self.binding.dial_otg(server, https)
    }

    pub fn dial_otg_gnmi(&self, server: &str) -> Result<Channel, BindError> {
        self.binding.dial_otg_gnmi(server)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fake::{fake_reservation, FakeBinding};
    use crate::test_logger;
    use pretty_assertions::assert_eq;

    fn session_with_fake() -> (Arc<FakeBinding>, Session) {
        let fake = Arc::new(FakeBinding::new(fake_reservation()));
        let session = Session::new(fake.clone(), test_logger());
        (fake, session)
    }

    #[test]
    fn test_reserve_once() {
        let (_fake, session) = session_with_fake();
        session.reserve(&TestbedSpec::default()).unwrap();
        let err = session.reserve(&TestbedSpec::default()).unwrap_err();
        assert!(matches!(err, BindError::AlreadyReserved));
    }

    #[test]
    fn test_release_requires_reservation() {
        let (_fake, session) = session_with_fake();
        assert!(matches!(
            session.release().unwrap_err(),
            BindError::NotReserved
        ));
        session.reserve(&TestbedSpec::default()).unwrap();
        session.release().unwrap();
        // Cleared after release, so a new run can reserve again.
        session.reserve(&TestbedSpec::default()).unwrap();
    }

    #[test]
    fn test_dut_lookup() {
        let (_fake, session) = session_with_fake();
        assert!(matches!(
            session.dut("dut").unwrap_err(),
            BindError::NotReserved
        ));
        session.reserve(&TestbedSpec::default()).unwrap();
        assert_eq!(session.dut("dut").unwrap().name, "ceos0");
        assert!(matches!(
            session.dut("nope").unwrap_err(),
            BindError::UnknownDevice(d) if d == "nope"
        ));
    }

    #[test]
    fn test_push_captures_text_and_options() {
        let (fake, session) = session_with_fake();
        session.reserve(&TestbedSpec::default()).unwrap();
        session
            .push_config(
                "dut",
                &ConfigSpec::new()
                    .with_arista_text(r#"reconfigure {{ port "port1" }}"#),
            )
            .unwrap();
        let (text, opts) = fake.last_push().unwrap();
        assert_eq!(text, "reconfigure Et1/2/3");
        assert_eq!(
            opts,
            PushOptions {
                openconfig: false,
                append: false,
            }
        );
    }

    #[test]
    fn test_append_sets_flag() {
        let (fake, session) = session_with_fake();
        session.reserve(&TestbedSpec::default()).unwrap();
        session
            .append_config(
                "dut",
                &ConfigSpec::new().with_arista_text("arista config"),
            )
            .unwrap();
        let (text, opts) = fake.last_push().unwrap();
        assert_eq!(text, "arista config");
        assert!(opts.append);
        assert!(!opts.openconfig);
    }

    #[test]
    fn test_openconfig_flag_travels() {
        let (fake, session) = session_with_fake();
        session.reserve(&TestbedSpec::default()).unwrap();
        session
            .push_config(
                "dut",
                &ConfigSpec::new().with_openconfig_text("Openconfig"),
            )
            .unwrap();
        let (text, opts) = fake.last_push().unwrap();
        assert_eq!(text, "Openconfig");
        assert!(opts.openconfig);
    }

    #[test]
    fn test_render_failure_aborts_before_transport() {
        let (fake, session) = session_with_fake();
        session.reserve(&TestbedSpec::default()).unwrap();
        let err = session
            .push_config(
                "dut",
                &ConfigSpec::new()
                    .with_arista_text(r#"{{ port "port10" }}"#),
            )
            .unwrap_err();
        assert!(matches!(err, BindError::Config(_)));
        assert!(fake.last_push().is_none());
    }

    #[test]
    fn test_dial_through_fake() {
        let (fake, session) = session_with_fake();
        fake.set_gnmi_dialer(|dut| {
            Ok(Channel {
                proto: crate::Proto::Gnmi,
                target: format!("{}:9339", dut.name),
                metadata: Default::default(),
                tls_insecure: true,
            })
        });
        session.reserve(&TestbedSpec::default()).unwrap();
        let ch = session.dial_gnmi("dut").unwrap();
        assert_eq!(ch.target, "ceos0:9339");
    }
}
