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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::driver::Instance;
use crate::engine_core::types::{EventCategory, EventType, OperationCategory};

/// The in-flight application request that caused a driver call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub id: String,
    pub method: String,
    pub url: String,
    /// Header names are stored lower-cased.
    headers: HashMap<String, String>,
}

impl ApplicationRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// What the collaborators see of an intercepted call.
#[derive(Debug, Clone, Copy)]
pub struct InvocationContext<'a> {
    pub instance: &'a Arc<Instance>,
    pub method: &'a str,
}

/// Opaque trace information supplied by the trace provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceObject(pub Value);

/// Payload captured for one call (or, for cursors, one instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPayload {
    pub category: OperationCategory,
    pub method: String,
    /// Plain-data arguments, or the structured command read from the instance
    pub raw: Value,
}

/// Request fields copied into an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub id: String,
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl From<&ApplicationRequest> for RequestSnapshot {
    fn from(request: &ApplicationRequest) -> Self {
        Self {
            id: request.id.clone(),
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
        }
    }
}

/// Security metadata contract handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetadata {
    pub request: RequestSnapshot,
    pub operation: OperationCategory,
    pub method: String,
    pub payload: Value,
    pub trace: TraceObject,
    pub execution_id: String,
    pub event_type: EventType,
    pub event_category: EventCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: SecurityMetadata,
}

impl SecurityEvent {
    pub fn new(metadata: SecurityMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            metadata,
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.metadata.execution_id
    }

    pub fn operation(&self) -> OperationCategory {
        self.metadata.operation
    }
}
