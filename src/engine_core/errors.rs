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

// Domain error types. None of these ever reach the instrumented application:
// call-time failures stop at the telemetry boundary in `outcome`.

use thiserror::Error;

/// Main error type for the interceptor
#[derive(Error, Debug)]
pub enum InterceptorError {
    /// Payload or metadata could not be serialized into plain data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A method the adapter expected is not defined on the prototype
    #[error("Method not found: {class}.{method}")]
    MethodNotFound { class: String, method: String },

    /// The driver module cannot be instrumented by any adapter
    #[error("Unsupported driver {name}@{version}: {reason}")]
    UnsupportedDriver {
        name: String,
        version: String,
        reason: String,
    },

    /// The event transport refused or lost an event
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Shared state could not be accessed (poisoned lock, duplicate registration)
    #[error("State error: {0}")]
    State(String),
}

impl InterceptorError {
    pub fn unsupported(name: &str, version: &str, reason: impl Into<String>) -> Self {
        InterceptorError::UnsupportedDriver {
            name: name.to_string(),
            version: version.to_string(),
            reason: reason.into(),
        }
    }

    /// Short, stable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            InterceptorError::Serialization(_) => "serialization",
            InterceptorError::MethodNotFound { .. } => "method_not_found",
            InterceptorError::UnsupportedDriver { .. } => "unsupported_driver",
            InterceptorError::Transport(_) => "transport",
            InterceptorError::Configuration(_) => "configuration",
            InterceptorError::State(_) => "state",
        }
    }
}

/// Error raised by a driver method or delivered to a completion callback.
///
/// The core never creates these for its own failures; it only forwards them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    pub code: Option<i32>,
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}
