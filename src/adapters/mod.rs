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

//! Driver Adapters.
//!
//! One [`DriverAdapter`] per attachment mechanism. [`ActiveAdapter`] holds the
//! variant chosen by [`negotiation::AdapterNegotiator`] and forwards to it with
//! an enum match instead of a vtable.

pub mod catalog;
pub mod hook_registry;
pub mod middleware;
pub mod negotiation;
pub mod prototype;

use serde::Serialize;
use std::sync::Arc;

use crate::driver::DriverModule;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::NoSqlInterceptor;
use crate::engine_core::traits::DriverAdapter;

pub use hook_registry::HookRegistryAdapter;
pub use middleware::MiddlewareAdapter;
pub use negotiation::AdapterNegotiator;
pub use prototype::PrototypeAdapter;

/// What an adapter attached to, as `Class.method` targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttachReport {
    pub adapter: &'static str,
    pub hooked: Vec<String>,
    pub skipped: Vec<String>,
}

impl AttachReport {
    pub fn new(adapter: &'static str) -> Self {
        Self {
            adapter,
            ..Self::default()
        }
    }

    pub fn hooked(&mut self, class: &str, method: &str) {
        self.hooked.push(format!("{}.{}", class, method));
    }

    pub fn skipped(&mut self, class: &str, method: &str) {
        self.skipped.push(format!("{}.{}", class, method));
    }

    pub fn is_hooked(&self, target: &str) -> bool {
        self.hooked.iter().any(|t| t == target)
    }
}

#[derive(Debug)]
pub enum ActiveAdapter {
    HookRegistry(HookRegistryAdapter),
    Prototype(PrototypeAdapter),
    Middleware(MiddlewareAdapter),
}

impl DriverAdapter for ActiveAdapter {
    fn name(&self) -> &'static str {
        match self {
            Self::HookRegistry(a) => a.name(),
            Self::Prototype(a) => a.name(),
            Self::Middleware(a) => a.name(),
        }
    }

    fn attach(
        &self,
        interceptor: Arc<NoSqlInterceptor>,
        module: &DriverModule,
    ) -> Result<AttachReport, InterceptorError> {
        match self {
            Self::HookRegistry(a) => a.attach(interceptor, module),
            Self::Prototype(a) => a.attach(interceptor, module),
            Self::Middleware(a) => a.attach(interceptor, module),
        }
    }
}
