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

//! Completion Correlator.
//!
//! For fuzz/replay requests the collector needs to know that an operation
//! finished, not only that it started. Each correlated call owns its enter
//! event: the interposed callback (or the middleware) carries it until the
//! first successful completion and sends it again as the exit event. The
//! call-site's `in_flight` list records which calls have not completed yet.
//!
//! Per call: `no-event -> enter-emitted -> awaiting-completion -> exit-emitted`.
//! A completion carrying an error never reaches `exit-emitted`.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::driver::{Argument, Callback, Instance};
use crate::engine_core::call_state::CallSiteRegistry;
use crate::engine_core::errors::DriverError;
use crate::engine_core::models::{ApplicationRequest, SecurityEvent};
use crate::engine_core::outcome;
use crate::engine_core::traits::EventTransport;
use crate::engine_core::types::InstanceId;

#[derive(Clone)]
pub struct CompletionCorrelator {
    registry: Arc<CallSiteRegistry>,
    transport: Arc<dyn EventTransport>,
    fuzz_header: String,
}

impl CompletionCorrelator {
    pub fn new(
        registry: Arc<CallSiteRegistry>,
        transport: Arc<dyn EventTransport>,
        fuzz_header: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            transport,
            fuzz_header: fuzz_header.into(),
        }
    }

    /// Whether `request` belongs to a fuzz/replay test run.
    pub fn should_correlate(&self, request: &ApplicationRequest) -> bool {
        request.header(&self.fuzz_header).is_some()
    }

    /// Record `event` as outstanding on the call-site.
    pub fn arm(&self, instance: &Arc<Instance>, event: &Arc<SecurityEvent>) {
        self.registry
            .with_state(instance, |state| state.in_flight.push(Arc::clone(event)));
    }

    /// Replace a trailing completion callback with one that settles `event`
    /// first. Without a trailing callback the arguments are returned untouched.
    pub fn interpose(
        &self,
        instance: InstanceId,
        event: Arc<SecurityEvent>,
        mut args: Vec<Argument>,
    ) -> Vec<Argument> {
        if let Some(Argument::Callback(slot)) = args.last_mut() {
            let original = Arc::clone(slot);
            let correlator = self.clone();
            let pending = Mutex::new(Some(event));
            let wrapped: Callback =
                Arc::new(move |error: Option<&DriverError>, result: Option<&Value>| {
                    let event = {
                        let mut pending = match pending.lock() {
                            Ok(pending) => pending,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        // An error keeps the event for a later successful completion.
                        if error.is_none() {
                            pending.take()
                        } else {
                            Option::clone(&pending)
                        }
                    };
                    if let Some(event) = event {
                        correlator.settle(instance, event, error);
                    }
                    original(error, result)
                });
            *slot = wrapped;
        }
        args
    }

    /// Close the call that emitted `event`. The exit event is sent only when
    /// the completion succeeded.
    pub fn settle(
        &self,
        instance: InstanceId,
        event: Arc<SecurityEvent>,
        error: Option<&DriverError>,
    ) {
        self.registry.with_existing(instance, |state| {
            state.in_flight.retain(|parked| !Arc::ptr_eq(parked, &event))
        });
        if let Some(error) = error {
            debug!(instance = %instance, error = %error, "Operation failed; no exit event");
            return;
        }
        debug!(
            instance = %instance,
            execution_id = %event.execution_id(),
            "Exit event emitted"
        );
        outcome::contain_unit("emit_completion", || self.transport.emit_completion(event));
    }
}
