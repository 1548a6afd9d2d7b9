// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped phase timer for build logging.

use std::time::Instant;

/// Logs the elapsed time of a build phase when dropped.
pub(crate) struct Timed {
    phase: &'static str,
    start: Instant,
}

impl Timed {
    /// Start timing `phase`; the result is logged at DEBUG.
    pub(crate) fn debug(phase: &'static str) -> Self {
        log::trace!("{phase}...");
        Self {
            phase,
            start: Instant::now(),
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::debug!("{}: {:.3?}", self.phase, self.start.elapsed());
    }
}
