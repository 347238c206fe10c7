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

//! Event Builder & Deduplicator.
//!
//! Turns a captured payload into a [`SecurityEvent`] and sends it, at most once
//! per execution id for each call-site.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::driver::Instance;
use crate::engine_core::call_state::CallSiteRegistry;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::models::{
    ApplicationRequest, CapturedPayload, RequestSnapshot, SecurityEvent, SecurityMetadata,
    TraceObject,
};
use crate::engine_core::outcome::TelemetryOutcome;
use crate::engine_core::traits::EventTransport;
use crate::engine_core::types::{EventCategory, EventType};

/// Serialize-and-reparse copy. The result shares nothing with `value`.
pub fn deep_copy<T: Serialize + ?Sized>(value: &T) -> Result<Value, InterceptorError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub struct EventBuilder {
    category: EventCategory,
    transport: Arc<dyn EventTransport>,
}

impl EventBuilder {
    pub fn new(category: EventCategory, transport: Arc<dyn EventTransport>) -> Self {
        Self {
            category,
            transport,
        }
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    pub fn build(
        &self,
        request: &ApplicationRequest,
        payload: &CapturedPayload,
        trace: TraceObject,
        execution_id: String,
    ) -> Result<SecurityEvent, InterceptorError> {
        let metadata = SecurityMetadata {
            request: RequestSnapshot::from(request),
            operation: payload.category,
            method: payload.method.clone(),
            payload: deep_copy(&payload.raw)?,
            trace,
            execution_id,
            event_type: EventType::NoSqlDbCommand,
            event_category: self.category,
        };
        Ok(SecurityEvent::new(metadata))
    }

    /// Build and send an enter event unless this call-site already sent one
    /// for `execution_id`.
    pub fn emit_deduplicated(
        &self,
        registry: &CallSiteRegistry,
        instance: &Arc<Instance>,
        request: &ApplicationRequest,
        payload: &CapturedPayload,
        trace: TraceObject,
        execution_id: String,
    ) -> Result<TelemetryOutcome, InterceptorError> {
        let reserved = registry.with_state(instance, |state| {
            if state.last_execution_id.as_deref() == Some(execution_id.as_str()) {
                None
            } else {
                Some(state.last_execution_id.replace(execution_id.clone()))
            }
        });
        let Some(previous) = reserved else {
            debug!(
                instance = %instance.id(),
                method = %payload.method,
                execution_id = %execution_id,
                "Duplicate execution id for call-site; enter event suppressed"
            );
            return Ok(TelemetryOutcome::Deduplicated);
        };

        let sent = self
            .build(request, payload, trace, execution_id.clone())
            .map(Arc::new)
            .and_then(|event| {
                self.transport.emit(Arc::clone(&event))?;
                Ok(event)
            });

        match sent {
            Ok(event) => {
                debug!(
                    instance = %instance.id(),
                    method = %payload.method,
                    operation = %payload.category,
                    execution_id = %execution_id,
                    "Enter event emitted"
                );
                Ok(TelemetryOutcome::Emitted(event))
            }
            Err(e) => {
                // Release the reservation so the next call can retry.
                registry.with_state(instance, |state| {
                    if state.last_execution_id.as_deref() == Some(execution_id.as_str()) {
                        state.last_execution_id = previous;
                    }
                });
                Err(e)
            }
        }
    }
}
