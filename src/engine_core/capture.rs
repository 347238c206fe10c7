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

//! Payload Capture.
//!
//! One-shot calls report their own arguments every time. Cursor and bulk
//! objects report the command they were built from, read once per instance:
//! the command does not change between iterations and drivers may drop it
//! after the first batch.

use serde_json::Value;
use std::sync::Arc;

use crate::driver::{Argument, Instance};
use crate::engine_core::call_state::CallSiteRegistry;
use crate::engine_core::classifier;
use crate::engine_core::models::CapturedPayload;
use crate::engine_core::types::{EventCategory, OperationCategory};

/// Where the payload of a hooked method comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureShape {
    /// Arguments of the call itself
    OneShot,
    /// Command stored on the instance under `command_key`
    Cursor { command_key: String },
}

impl CaptureShape {
    pub fn cursor(command_key: &str) -> Self {
        CaptureShape::Cursor {
            command_key: command_key.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PayloadCapture {
    family: EventCategory,
}

impl PayloadCapture {
    pub fn new(family: EventCategory) -> Self {
        Self { family }
    }

    pub fn capture(
        &self,
        registry: &CallSiteRegistry,
        instance: &Arc<Instance>,
        method: &str,
        shape: &CaptureShape,
        args: &[Argument],
    ) -> Arc<CapturedPayload> {
        match shape {
            CaptureShape::OneShot => {
                let payload = Arc::new(CapturedPayload {
                    category: self.classify_method(method),
                    method: method.to_string(),
                    raw: plain_arguments(args),
                });
                registry.with_state(instance, |state| {
                    state.captured = true;
                    state.payload = Some(Arc::clone(&payload));
                });
                payload
            }
            CaptureShape::Cursor { command_key } => registry.with_state(instance, |state| {
                if state.captured {
                    if let Some(payload) = &state.payload {
                        return Arc::clone(payload);
                    }
                }
                let command = instance.state(command_key);
                let payload = Arc::new(CapturedPayload {
                    category: classifier::classify_command(command.as_ref()),
                    method: method.to_string(),
                    raw: command.unwrap_or(Value::Null),
                });
                state.captured = true;
                state.payload = Some(Arc::clone(&payload));
                payload
            }),
        }
    }

    fn classify_method(&self, method: &str) -> OperationCategory {
        match self.family {
            EventCategory::DocumentDb => classifier::classify_method_name(method),
            EventCategory::KeyValueDb => classifier::classify_key_value_method(method),
        }
    }
}

/// Plain-data arguments as a JSON array. Callbacks are not data.
fn plain_arguments(args: &[Argument]) -> Value {
    Value::Array(args.iter().filter_map(Argument::as_value).cloned().collect())
}
