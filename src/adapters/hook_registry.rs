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

//! Adapter for first-generation document drivers that publish an
//! instrumentation registry. Only classes flagged as issuing queries are hooked.

use std::sync::Arc;
use tracing::{debug, info};

use super::AttachReport;
use crate::driver::{DriverModule, HookKind};
use crate::engine_core::capture::CaptureShape;
use crate::engine_core::constants::state_keys;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::NoSqlInterceptor;
use crate::engine_core::traits::DriverAdapter;

#[derive(Debug, Default, Clone, Copy)]
pub struct HookRegistryAdapter;

impl HookRegistryAdapter {
    pub fn new() -> Self {
        Self
    }

    fn shape(kind: HookKind) -> CaptureShape {
        match kind {
            HookKind::Callback => CaptureShape::OneShot,
            HookKind::Cursor => CaptureShape::cursor(state_keys::CURSOR_COMMAND),
        }
    }
}

impl DriverAdapter for HookRegistryAdapter {
    fn name(&self) -> &'static str {
        "hook-registry"
    }

    fn attach(
        &self,
        interceptor: Arc<NoSqlInterceptor>,
        module: &DriverModule,
    ) -> Result<AttachReport, InterceptorError> {
        let hooks = module.hooks().ok_or_else(|| {
            InterceptorError::unsupported(
                &module.name,
                &module.version,
                "driver does not publish an instrumentation registry",
            )
        })?;

        let mut report = AttachReport::new(self.name());
        for class in hooks.classes() {
            if !class.query {
                debug!(class = %class.name, "Class issues no queries; not hooked");
                for method in &class.methods {
                    report.skipped(&class.name, &method.name);
                }
                continue;
            }
            for method in &class.methods {
                match interceptor.hook(&class.prototype, &method.name, Self::shape(method.kind)) {
                    Ok(()) => report.hooked(&class.name, &method.name),
                    Err(InterceptorError::MethodNotFound { .. }) => {
                        debug!(
                            class = %class.name,
                            method = %method.name,
                            "Registered method missing"
                        );
                        report.skipped(&class.name, &method.name);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            driver = %module.name,
            version = %module.version,
            hooked = report.hooked.len(),
            "Hook registry adapter attached"
        );
        Ok(report)
    }
}
