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

//! Instrumentation entry point.
//!
//! Owns the configuration and collaborators and installs the interception
//! pipeline into loaded driver modules.

use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::{AdapterNegotiator, AttachReport};
use crate::config::Config;
use crate::context::{HeaderExecutionIds, RequestManager, RequestTraceProvider};
use crate::driver::DriverModule;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::{Collaborators, NoSqlInterceptor};
use crate::engine_core::traits::{DriverAdapter, EventTransport};

pub struct Instrumentation {
    config: Arc<Config>,
    collaborators: Collaborators,
}

impl Instrumentation {
    pub fn new(config: Arc<Config>, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Task-local request context, header execution ids and request traces
    /// in front of `transport`.
    pub fn with_defaults(config: Arc<Config>, transport: Arc<dyn EventTransport>) -> Self {
        let collaborators = Collaborators {
            requests: Arc::new(RequestManager::new()),
            traces: Arc::new(RequestTraceProvider),
            executions: Arc::new(HeaderExecutionIds::from_config(&config)),
            transport,
        };
        Self::new(config, collaborators)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Attach to `module`. `None` when its family is disabled.
    pub fn install(
        &self,
        module: &DriverModule,
    ) -> Result<Option<AttachReport>, InterceptorError> {
        if !self.config.is_enabled(module.family) {
            debug!(
                driver = %module.name,
                family = %module.family,
                "Family disabled; not instrumenting"
            );
            return Ok(None);
        }

        let adapter = AdapterNegotiator::negotiate(module)?;
        let interceptor = Arc::new(NoSqlInterceptor::new(
            &self.config,
            module.family,
            self.collaborators.clone(),
        ));
        let report = adapter.attach(interceptor, module)?;

        info!(
            driver = %module.name,
            version = %module.version,
            adapter = adapter.name(),
            hooked = ?report.hooked,
            skipped = report.skipped.len(),
            "Driver instrumented"
        );
        Ok(Some(report))
    }
}
