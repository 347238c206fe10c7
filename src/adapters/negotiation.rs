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

//! Adapter Negotiator (Version Probe).
//!
//! Picks the [`ActiveAdapter`] variant for a loaded driver from its family and
//! major version.

use tracing::info;

use super::catalog;
use super::{ActiveAdapter, HookRegistryAdapter, MiddlewareAdapter, PrototypeAdapter};
use crate::driver::DriverModule;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::types::EventCategory;

pub struct AdapterNegotiator;

impl AdapterNegotiator {
    pub fn negotiate(module: &DriverModule) -> Result<ActiveAdapter, InterceptorError> {
        let major = module.major_version().ok_or_else(|| {
            InterceptorError::unsupported(&module.name, &module.version, "unparseable version")
        })?;

        match (module.family, major) {
            (EventCategory::DocumentDb, 0..=2) => {
                if module.hooks().is_none() {
                    return Err(InterceptorError::unsupported(
                        &module.name,
                        &module.version,
                        "legacy driver without an instrumentation registry",
                    ));
                }
                info!(driver = %module.name, major, "Initializing hook registry adapter...");
                Ok(ActiveAdapter::HookRegistry(HookRegistryAdapter::new()))
            }
            (EventCategory::DocumentDb, _) => {
                info!(driver = %module.name, major, "Initializing document prototype adapter...");
                Ok(ActiveAdapter::Prototype(PrototypeAdapter::new(
                    catalog::for_family(module.family),
                )))
            }
            (EventCategory::KeyValueDb, 2) => {
                info!(driver = %module.name, major, "Initializing key-value prototype adapter...");
                Ok(ActiveAdapter::Prototype(PrototypeAdapter::new(
                    catalog::for_family(module.family),
                )))
            }
            (EventCategory::KeyValueDb, 3..) => {
                if module.middleware_stack().is_none() {
                    return Err(InterceptorError::unsupported(
                        &module.name,
                        &module.version,
                        "command client without a middleware stack",
                    ));
                }
                info!(driver = %module.name, major, "Initializing middleware adapter...");
                Ok(ActiveAdapter::Middleware(MiddlewareAdapter::new()))
            }
            (EventCategory::KeyValueDb, _) => Err(InterceptorError::unsupported(
                &module.name,
                &module.version,
                "key-value SDK generation not supported",
            )),
        }
    }
}
