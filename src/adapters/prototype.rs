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

//! Adapter that wraps prototype methods directly, following a static catalog.
//! Classes or methods the loaded driver lacks are reported as skipped.

use std::sync::Arc;
use tracing::{debug, info};

use super::catalog::CatalogEntry;
use super::AttachReport;
use crate::driver::DriverModule;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::NoSqlInterceptor;
use crate::engine_core::traits::DriverAdapter;

#[derive(Debug, Clone, Copy)]
pub struct PrototypeAdapter {
    catalog: &'static [CatalogEntry],
}

impl PrototypeAdapter {
    pub fn new(catalog: &'static [CatalogEntry]) -> Self {
        Self { catalog }
    }
}

impl DriverAdapter for PrototypeAdapter {
    fn name(&self) -> &'static str {
        "prototype"
    }

    fn attach(
        &self,
        interceptor: Arc<NoSqlInterceptor>,
        module: &DriverModule,
    ) -> Result<AttachReport, InterceptorError> {
        let mut report = AttachReport::new(self.name());
        for entry in self.catalog {
            let Some(prototype) = module.prototype(entry.class) else {
                debug!(driver = %module.name, class = entry.class, "Class not exported; skipping");
                for method in entry.methods {
                    report.skipped(entry.class, method);
                }
                continue;
            };
            for method in entry.methods {
                if !prototype.has_method(method) {
                    report.skipped(entry.class, method);
                    continue;
                }
                interceptor.hook(prototype, method, entry.shape.to_capture())?;
                report.hooked(entry.class, method);
            }
        }

        info!(
            driver = %module.name,
            version = %module.version,
            hooked = report.hooked.len(),
            skipped = report.skipped.len(),
            "Prototype adapter attached"
        );
        Ok(report)
    }
}
