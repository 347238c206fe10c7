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

use std::collections::HashMap;
use std::sync::Arc;

use super::{HookRegistry, MiddlewareStack, Prototype};
use crate::engine_core::types::EventCategory;

/// A loaded driver or client library, as seen by the adapters.
#[derive(Debug, Clone)]
pub struct DriverModule {
    pub name: String,
    pub family: EventCategory,
    pub version: String,
    prototypes: HashMap<String, Arc<Prototype>>,
    hooks: Option<HookRegistry>,
    middleware_stack: Option<Arc<MiddlewareStack>>,
}

impl DriverModule {
    pub fn new(name: impl Into<String>, family: EventCategory, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family,
            version: version.into(),
            prototypes: HashMap::new(),
            hooks: None,
            middleware_stack: None,
        }
    }

    pub fn with_prototype(mut self, prototype: &Arc<Prototype>) -> Self {
        self.prototypes
            .insert(prototype.name().to_string(), Arc::clone(prototype));
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_middleware_stack(mut self, stack: &Arc<MiddlewareStack>) -> Self {
        self.middleware_stack = Some(Arc::clone(stack));
        self
    }

    pub fn prototype(&self, class: &str) -> Option<&Arc<Prototype>> {
        self.prototypes.get(class)
    }

    pub fn hooks(&self) -> Option<&HookRegistry> {
        self.hooks.as_ref()
    }

    pub fn middleware_stack(&self) -> Option<&Arc<MiddlewareStack>> {
        self.middleware_stack.as_ref()
    }

    /// Leading numeric component of `version` (`"3.6.12"` -> 3).
    pub fn major_version(&self) -> Option<u64> {
        self.version
            .trim_start_matches(['v', '^', '~', '='])
            .split('.')
            .next()
            .and_then(|major| major.trim().parse().ok())
    }
}
