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

//! NoSQL Interceptor.
//!
//! The central pipeline of lilith-nosql. For every intercepted driver call it
//! captures the payload, resolves the application request, emits a
//! deduplicated enter event and, for fuzz/replay requests, arms completion
//! correlation. It knows nothing about how adapters attach it; adapters only
//! call [`NoSqlInterceptor::intercept`], [`NoSqlInterceptor::observe`] and
//! [`NoSqlInterceptor::settle`].
//!
//! The wrapped driver method always runs with its original receiver and
//! arguments, and its result is returned as-is.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::driver::{Argument, Instance, Method, Prototype};
use crate::engine_core::call_state::CallSiteRegistry;
use crate::engine_core::capture::{CaptureShape, PayloadCapture};
use crate::engine_core::correlator::CompletionCorrelator;
use crate::engine_core::errors::{DriverError, InterceptorError};
use crate::engine_core::event_builder::EventBuilder;
use crate::engine_core::models::{InvocationContext, SecurityEvent};
use crate::engine_core::outcome::{self, TelemetryOutcome};
use crate::engine_core::traits::{
    EventTransport, ExecutionIdProvider, RequestResolver, TraceProvider,
};
use crate::engine_core::types::{EventCategory, InstanceId};

/// External services the pipeline depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub requests: Arc<dyn RequestResolver>,
    pub traces: Arc<dyn TraceProvider>,
    pub executions: Arc<dyn ExecutionIdProvider>,
    pub transport: Arc<dyn EventTransport>,
}

/// Result of the telemetry half of an interception.
#[derive(Debug, Clone)]
pub struct Observation {
    pub outcome: TelemetryOutcome,
    /// Enter event of a fuzz/replay request, awaiting this call's completion
    pub armed: Option<Arc<SecurityEvent>>,
}

pub struct NoSqlInterceptor {
    family: EventCategory,
    collaborators: Collaborators,
    registry: Arc<CallSiteRegistry>,
    capture: PayloadCapture,
    builder: EventBuilder,
    correlator: CompletionCorrelator,
}

impl NoSqlInterceptor {
    pub fn new(config: &Config, family: EventCategory, collaborators: Collaborators) -> Self {
        let registry = Arc::new(CallSiteRegistry::new());
        let builder = EventBuilder::new(family, Arc::clone(&collaborators.transport));
        let correlator = CompletionCorrelator::new(
            Arc::clone(&registry),
            Arc::clone(&collaborators.transport),
            config.fuzz_request_header.clone(),
        );
        Self {
            family,
            collaborators,
            registry,
            capture: PayloadCapture::new(family),
            builder,
            correlator,
        }
    }

    pub fn family(&self) -> EventCategory {
        self.family
    }

    pub fn registry(&self) -> &Arc<CallSiteRegistry> {
        &self.registry
    }

    /// Run the telemetry pipeline for one call. Never fails.
    pub fn observe(
        &self,
        instance: &Arc<Instance>,
        method: &str,
        shape: &CaptureShape,
        args: &[Argument],
    ) -> Observation {
        let mut armed = None;
        let outcome = outcome::contain("observe", || {
            let payload = self
                .capture
                .capture(&self.registry, instance, method, shape, args);

            let ctx = InvocationContext { instance, method };
            let Some(request) = self.collaborators.requests.resolve(&ctx) else {
                debug!(instance = %instance.id(), method, "No active request; skipping event");
                return Ok(TelemetryOutcome::NoRequest);
            };

            let trace = self.collaborators.traces.current_trace(&ctx, &request);
            let execution_id = self
                .collaborators
                .executions
                .current_execution_id(&ctx, &request);

            let outcome = self.builder.emit_deduplicated(
                &self.registry,
                instance,
                &request,
                &payload,
                trace,
                execution_id,
            )?;

            if let Some(event) = outcome.event() {
                if self.correlator.should_correlate(&request) {
                    self.correlator.arm(instance, event);
                    armed = Some(Arc::clone(event));
                }
            }
            Ok(outcome)
        });
        Observation { outcome, armed }
    }

    /// Observe the call, then invoke `original` with the same receiver and
    /// arguments (a trailing callback may be interposed).
    pub fn intercept(
        &self,
        instance: &Arc<Instance>,
        method: &str,
        shape: &CaptureShape,
        original: &Method,
        args: Vec<Argument>,
    ) -> Result<Value, DriverError> {
        let observation = self.observe(instance, method, shape, &args);
        let args = match observation.armed {
            Some(event) => self.correlator.interpose(instance.id(), event, args),
            None => args,
        };
        original(instance, args)
    }

    /// Report the completion of a call that did not use a callback.
    pub fn settle(
        &self,
        instance: InstanceId,
        event: Arc<SecurityEvent>,
        error: Option<&DriverError>,
    ) {
        self.correlator.settle(instance, event, error);
    }

    /// Replace `method` on `prototype` with an intercepting wrapper. A method
    /// is intercepted at most once.
    pub fn hook(
        self: &Arc<Self>,
        prototype: &Prototype,
        method: &str,
        shape: CaptureShape,
    ) -> Result<(), InterceptorError> {
        let interceptor = Arc::clone(self);
        let name = method.to_string();
        prototype.instrument(method, move |original| -> Method {
            Arc::new(move |this: &Arc<Instance>, args: Vec<Argument>| {
                interceptor.intercept(this, &name, &shape, &original, args)
            })
        })
    }
}
