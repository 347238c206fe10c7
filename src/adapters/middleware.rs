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

//! Adapter for third-generation key-value clients, which route every command
//! through a middleware stack instead of prototype methods.

use std::sync::Arc;
use tracing::info;

use super::AttachReport;
use crate::driver::{
    Argument, DriverModule, Handler, KvCommand, Middleware, MiddlewareOptions, Priority, Step,
};
use crate::engine_core::capture::CaptureShape;
use crate::engine_core::constants::middleware as names;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::NoSqlInterceptor;
use crate::engine_core::traits::DriverAdapter;

#[derive(Debug, Default, Clone, Copy)]
pub struct MiddlewareAdapter;

impl MiddlewareAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn options() -> MiddlewareOptions {
        MiddlewareOptions {
            name: names::NAME.to_string(),
            step: Step::Initialize,
            priority: Priority::High,
        }
    }

    fn middleware(interceptor: Arc<NoSqlInterceptor>) -> Middleware {
        Arc::new(move |next: Handler| -> Handler {
            let interceptor = Arc::clone(&interceptor);
            Arc::new(move |command: &KvCommand| {
                let method = operation_name(command.name());
                let args = [Argument::Value(command.input.clone())];
                let observation =
                    interceptor.observe(&command.instance, method, &CaptureShape::OneShot, &args);

                let result = next(command);
                if let Some(event) = observation.armed {
                    interceptor.settle(command.instance.id(), event, result.as_ref().err());
                }
                result
            })
        })
    }
}

/// `PutItemCommand` -> `PutItem`
pub fn operation_name(command: &str) -> &str {
    command.strip_suffix(names::COMMAND_SUFFIX).unwrap_or(command)
}

impl DriverAdapter for MiddlewareAdapter {
    fn name(&self) -> &'static str {
        "middleware"
    }

    fn attach(
        &self,
        interceptor: Arc<NoSqlInterceptor>,
        module: &DriverModule,
    ) -> Result<AttachReport, InterceptorError> {
        let stack = module.middleware_stack().ok_or_else(|| {
            InterceptorError::unsupported(
                &module.name,
                &module.version,
                "client exposes no middleware stack",
            )
        })?;
        stack.add(Self::middleware(interceptor), Self::options())?;

        let mut report = AttachReport::new(self.name());
        report.hooked(&module.name, names::NAME);
        info!(
            driver = %module.name,
            version = %module.version,
            middleware = names::NAME,
            "Middleware adapter attached"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_name_strips_suffix() {
        assert_eq!(operation_name("PutItemCommand"), "PutItem");
        assert_eq!(operation_name("Scan"), "Scan");
    }

    #[test]
    fn test_options() {
        let options = MiddlewareAdapter::options();
        assert_eq!(options.name, "lilithNoSqlMiddleware");
        assert_eq!(options.step, Step::Initialize);
        assert_eq!(options.priority, Priority::High);
    }
}
