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

//! lilith-nosql: security telemetry for NoSQL database drivers.
//!
//! This library intercepts document and key-value database driver calls made
//! while serving an application request, classifies each operation and emits
//! deduplicated security events to a collector. For fuzz/replay test requests
//! it also reports when the operation completed.

pub mod adapters;
pub mod config;
pub mod context;
pub mod driver;
pub mod engine_core;
pub mod instrumentation;
pub mod transport;
pub mod utils;

pub use config::Config;
pub use engine_core::errors::{DriverError, InterceptorError};
pub use engine_core::interceptor::{Collaborators, NoSqlInterceptor};
pub use engine_core::models::{ApplicationRequest, SecurityEvent};
pub use instrumentation::Instrumentation;
