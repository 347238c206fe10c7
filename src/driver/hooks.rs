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

//! Driver-provided instrumentation registry.
//!
//! First-generation document drivers publish the classes and methods they
//! consider instrumentable instead of leaving callers to patch prototypes
//! blindly. Each class says whether it issues queries.

use std::sync::Arc;

use super::Prototype;

/// How a hooked method completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Completes through a trailing error-first callback
    Callback,
    /// Iterates a cursor that already carries its command
    Cursor,
}

#[derive(Debug, Clone)]
pub struct InstrumentedMethod {
    pub name: String,
    pub kind: HookKind,
}

#[derive(Debug, Clone)]
pub struct InstrumentedClass {
    pub name: String,
    pub prototype: Arc<Prototype>,
    /// Whether the class issues queries against the server
    pub query: bool,
    pub methods: Vec<InstrumentedMethod>,
}

#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    classes: Vec<InstrumentedClass>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        prototype: &Arc<Prototype>,
        query: bool,
        methods: &[(&str, HookKind)],
    ) -> &mut Self {
        self.classes.push(InstrumentedClass {
            name: prototype.name().to_string(),
            prototype: Arc::clone(prototype),
            query,
            methods: methods
                .iter()
                .map(|(name, kind)| InstrumentedMethod {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
        });
        self
    }

    pub fn classes(&self) -> &[InstrumentedClass] {
        &self.classes
    }
}
