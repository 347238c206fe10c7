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

//! Command client middleware stack.
//!
//! Third-generation key-value clients send every operation as a command object
//! through a stack of middleware. Each middleware receives the next handler and
//! returns a handler; the stack composes them in step order, then priority,
//! then insertion order, outermost first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::{Instance, Prototype};
use crate::engine_core::errors::{DriverError, InterceptorError};

/// A command sent through a [`KvClient`]. `instance` carries the call-site identity.
#[derive(Debug, Clone)]
pub struct KvCommand {
    pub instance: Arc<Instance>,
    pub input: Value,
}

impl KvCommand {
    /// Build a command of class `name` (e.g. `PutItemCommand`).
    pub fn new(name: &str, input: Value) -> Self {
        Self {
            instance: Instance::new(&Prototype::new(name)),
            input,
        }
    }

    pub fn name(&self) -> &str {
        self.instance.class_name()
    }
}

pub type Handler = Arc<dyn Fn(&KvCommand) -> Result<Value, DriverError> + Send + Sync>;
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Initialize,
    Serialize,
    Build,
    FinalizeRequest,
    Deserialize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareOptions {
    pub name: String,
    pub step: Step,
    pub priority: Priority,
}

struct Entry {
    middleware: Middleware,
    options: MiddlewareOptions,
}

#[derive(Default)]
pub struct MiddlewareStack {
    entries: RwLock<Vec<Entry>>,
}

impl MiddlewareStack {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a middleware. Names are unique within a stack.
    pub fn add(
        &self,
        middleware: Middleware,
        options: MiddlewareOptions,
    ) -> Result<(), InterceptorError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| InterceptorError::State("middleware stack lock poisoned".to_string()))?;
        if entries.iter().any(|e| e.options.name == options.name) {
            return Err(InterceptorError::State(format!(
                "duplicate middleware name: {}",
                options.name
            )));
        }
        entries.push(Entry {
            middleware,
            options,
        });
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.ordered()
            .into_iter()
            .map(|(_, options)| options.name)
            .collect()
    }

    /// Compose the registered middleware around `terminal`.
    pub fn resolve(&self, terminal: Handler) -> Handler {
        self.ordered()
            .into_iter()
            .rev()
            .fold(terminal, |next, (middleware, _)| middleware(next))
    }

    fn ordered(&self) -> Vec<(Middleware, MiddlewareOptions)> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut ordered: Vec<(usize, Middleware, MiddlewareOptions)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, Arc::clone(&e.middleware), e.options.clone()))
            .collect();
        ordered.sort_by_key(|(i, _, options)| (options.step, options.priority, *i));
        ordered.into_iter().map(|(_, m, o)| (m, o)).collect()
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("names", &self.names())
            .finish()
    }
}

/// Minimal command client: a middleware stack in front of a send handler.
#[derive(Clone)]
pub struct KvClient {
    stack: Arc<MiddlewareStack>,
    send_handler: Handler,
}

impl KvClient {
    pub fn new<F>(send_handler: F) -> Self
    where
        F: Fn(&KvCommand) -> Result<Value, DriverError> + Send + Sync + 'static,
    {
        Self {
            stack: MiddlewareStack::new(),
            send_handler: Arc::new(send_handler),
        }
    }

    pub fn middleware_stack(&self) -> &Arc<MiddlewareStack> {
        &self.stack
    }

    pub fn send(&self, command: &KvCommand) -> Result<Value, DriverError> {
        let handler = self.stack.resolve(Arc::clone(&self.send_handler));
        handler(command)
    }
}

impl fmt::Debug for KvClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvClient").field("stack", &self.stack).finish()
    }
}
