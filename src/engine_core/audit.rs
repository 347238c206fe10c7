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

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::engine_core::errors::InterceptorError;
use crate::engine_core::models::SecurityEvent;
use crate::engine_core::traits::EventTransport;

#[derive(Serialize)]
struct AuditEntry<'a> {
    phase: &'a str,
    #[serde(flatten)]
    event: &'a SecurityEvent,
}

/// Transport that writes every event to the structured `audit` log target.
#[derive(Debug, Default, Clone)]
pub struct AuditTransport;

impl AuditTransport {
    pub fn new() -> Self {
        Self
    }

    fn log(&self, phase: &str, event: &SecurityEvent) -> Result<(), InterceptorError> {
        let payload = serde_json::to_string(&AuditEntry { phase, event })?;
        info!(
            target: "audit",
            phase,
            event_id = %event.id,
            execution_id = %event.execution_id(),
            operation = %event.operation(),
            payload = %payload,
            "NOSQL_AUDIT_LOG"
        );
        Ok(())
    }
}

impl EventTransport for AuditTransport {
    fn emit(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.log("enter", &event)
    }

    fn emit_completion(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.log("exit", &event)
    }
}
