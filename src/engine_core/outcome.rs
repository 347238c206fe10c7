// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Telemetry boundary.
//!
//! Everything the interceptor does around a driver call ends in a
//! [`TelemetryOutcome`]. Failures are logged here and go no further: the
//! instrumented application only ever sees the driver's own result.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

use crate::engine_core::errors::InterceptorError;
use crate::engine_core::models::SecurityEvent;

#[derive(Debug, Clone)]
pub enum TelemetryOutcome {
    /// An enter event was sent
    Emitted(Arc<SecurityEvent>),
    /// Same execution id as the last event for this call-site
    Deduplicated,
    /// No application request behind the call
    NoRequest,
    /// Telemetry failed; already logged
    Failed,
}

impl TelemetryOutcome {
    pub fn event(&self) -> Option<&Arc<SecurityEvent>> {
        match self {
            TelemetryOutcome::Emitted(event) => Some(event),
            _ => None,
        }
    }
}

/// Run telemetry work, containing both errors and panics.
pub fn contain<F>(operation: &str, work: F) -> TelemetryOutcome
where
    F: FnOnce() -> Result<TelemetryOutcome, InterceptorError>,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            warn!(operation, kind = e.kind(), error = %e, "Telemetry failed; call continues");
            TelemetryOutcome::Failed
        }
        Err(_) => {
            warn!(operation, "Telemetry panicked; call continues");
            TelemetryOutcome::Failed
        }
    }
}

/// Like [`contain`] for work with no outcome to report.
pub fn contain_unit<F>(operation: &str, work: F)
where
    F: FnOnce() -> Result<(), InterceptorError>,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(operation, kind = e.kind(), error = %e, "Telemetry failed; call continues");
        }
        Err(_) => {
            warn!(operation, "Telemetry panicked; call continues");
        }
    }
}
