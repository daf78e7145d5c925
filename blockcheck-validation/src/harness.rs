#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Device ownership and session lifecycle.
//!
//! A [`TestHarness`] owns the device for the length of a run. Construction
//! performs the reset sequence; every session is followed by teardown
//! (enables low, then a reset pulse), whether the session succeeded or not.

use crate::config::HarnessConfig;
use crate::device::sim::{CoreTiming, PipelinedCore};
use crate::device::{ClockedDevice, Port};
use crate::driver::HandshakeDriver;
use crate::error::Result;
use blockcheck_primitives::{Block, Session};
use tracing::{debug, warn};

pub struct TestHarness<D: ClockedDevice> {
    device: D,
    config: HarnessConfig,
    sessions_run: u64,
}

impl<D: ClockedDevice> TestHarness<D> {
    /// Take ownership of `device` and bring it out of reset.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(device: D, config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        let mut harness = Self { device, config, sessions_run: 0 };
        harness.reset();
        Ok(harness)
    }

    /// Reset pulse: every enable low, `RST_N` low for `reset_cycles` edges,
    /// then released with one more edge so ready outputs reflect the idle
    /// state.
    pub fn reset(&mut self) {
        for port in Port::ALL {
            self.device.set_enable(port, false);
        }
        self.device.set_reset(true);
        for _ in 0..self.config.reset_cycles {
            self.device.rising_edge();
        }
        self.device.set_reset(false);
        self.device.rising_edge();
        debug!(cycle = self.device.cycle(), "device reset");
    }

    /// Drive one session to completion and tear down.
    ///
    /// # Errors
    ///
    /// Returns the driver's error; the device has already been reset when
    /// this returns.
    pub fn run_session(&mut self, session: Session) -> Result<Vec<Block>> {
        let max_wait_cycles = self.config.max_wait_cycles;
        let outcome = HandshakeDriver::new(&mut self.device, max_wait_cycles).run_session(session);
        self.sessions_run += 1;

        if let Err(e) = &outcome {
            warn!(error = %e, "session failed, resetting device");
        }
        if self.config.reset_between_sessions || outcome.is_err() {
            self.reset();
        }
        Ok(outcome?)
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions_run(&self) -> u64 {
        self.sessions_run
    }

    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the device.
    pub fn into_device(self) -> D {
        self.device
    }
}

impl TestHarness<PipelinedCore> {
    /// Harness around a fresh behavioral core.
    ///
    /// # Errors
    ///
    /// Returns `Device` for unusable `timing`, `Config` for an invalid
    /// `config`.
    pub fn simulated(timing: CoreTiming, config: HarnessConfig) -> Result<Self> {
        Self::new(PipelinedCore::new(timing)?, config)
    }
}
