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

//! Driver object model.
//!
//! Driver bindings describe their classes as [`Prototype`]s (named method
//! tables) and their live objects as [`Instance`]s. Adapters attach the
//! interception pipeline by replacing entries in a prototype's method table
//! through [`Prototype::wrap`], the same way the host runtime patches a class.

pub mod hooks;
pub mod middleware;
pub mod module;

use dashmap::{DashMap, DashSet};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::engine_core::errors::{DriverError, InterceptorError};
use crate::engine_core::types::InstanceId;

pub use hooks::{HookKind, HookRegistry, InstrumentedClass, InstrumentedMethod};
pub use middleware::{
    Handler, KvClient, KvCommand, Middleware, MiddlewareOptions, MiddlewareStack, Priority, Step,
};
pub use module::DriverModule;

/// Error-first completion callback: `(error, result)`.
pub type Callback = Arc<dyn Fn(Option<&DriverError>, Option<&Value>) + Send + Sync>;

/// A driver method body. Receives the instance it was invoked on.
pub type Method =
    Arc<dyn Fn(&Arc<Instance>, Vec<Argument>) -> Result<Value, DriverError> + Send + Sync>;

/// One positional argument of a driver call.
#[derive(Clone)]
pub enum Argument {
    Value(Value),
    Callback(Callback),
}

impl Argument {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Option<&DriverError>, Option<&Value>) + Send + Sync + 'static,
    {
        Argument::Callback(Arc::new(f))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(v) => Some(v),
            Argument::Callback(_) => None,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Argument::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A driver class: a name and a replaceable method table.
pub struct Prototype {
    name: String,
    methods: DashMap<String, Method>,
    /// Methods already wrapped by [`Prototype::instrument`]
    instrumented: DashSet<String>,
}

impl Prototype {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            methods: DashMap::new(),
            instrumented: DashSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn define<F>(&self, method: &str, body: F)
    where
        F: Fn(&Arc<Instance>, Vec<Argument>) -> Result<Value, DriverError> + Send + Sync + 'static,
    {
        self.methods.insert(method.to_string(), Arc::new(body));
    }

    pub fn method(&self, method: &str) -> Option<Method> {
        self.methods.get(method).map(|m| Arc::clone(m.value()))
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Replace `method` with the result of `factory(original)`.
    pub fn wrap<F>(&self, method: &str, factory: F) -> Result<(), InterceptorError>
    where
        F: FnOnce(Method) -> Method,
    {
        let mut entry =
            self.methods
                .get_mut(method)
                .ok_or_else(|| InterceptorError::MethodNotFound {
                    class: self.name.clone(),
                    method: method.to_string(),
                })?;
        let original = Arc::clone(entry.value());
        *entry.value_mut() = factory(original);
        Ok(())
    }

    /// [`Prototype::wrap`] that refuses to wrap the same method twice.
    pub fn instrument<F>(&self, method: &str, factory: F) -> Result<(), InterceptorError>
    where
        F: FnOnce(Method) -> Method,
    {
        if !self.instrumented.insert(method.to_string()) {
            return Err(InterceptorError::State(format!(
                "{}.{} is already instrumented",
                self.name, method
            )));
        }
        self.wrap(method, factory).map_err(|e| {
            self.instrumented.remove(method);
            e
        })
    }

    pub fn is_instrumented(&self, method: &str) -> bool {
        self.instrumented.contains(method)
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<String> = self.methods.iter().map(|e| e.key().clone()).collect();
        methods.sort();
        f.debug_struct("Prototype")
            .field("name", &self.name)
            .field("methods", &methods)
            .finish()
    }
}

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// A live driver object (collection handle, cursor, bulk operation, command).
pub struct Instance {
    id: InstanceId,
    prototype: Arc<Prototype>,
    state: DashMap<String, Value>,
}

impl Instance {
    pub fn new(prototype: &Arc<Prototype>) -> Arc<Self> {
        Arc::new(Self {
            id: InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
            prototype: Arc::clone(prototype),
            state: DashMap::new(),
        })
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        self.prototype.name()
    }

    pub fn prototype(&self) -> &Arc<Prototype> {
        &self.prototype
    }

    /// Snapshot of a piece of driver-internal state.
    pub fn state(&self, key: &str) -> Option<Value> {
        self.state.get(key).map(|v| v.value().clone())
    }

    pub fn set_state(&self, key: &str, value: Value) {
        self.state.insert(key.to_string(), value);
    }

    pub fn clear_state(&self, key: &str) {
        self.state.remove(key);
    }

    /// Dispatch through the prototype's current method table.
    pub fn call(self: &Arc<Self>, method: &str, args: Vec<Argument>) -> Result<Value, DriverError> {
        let body = self.prototype.method(method).ok_or_else(|| {
            DriverError::new(format!("{}.{} is not a function", self.class_name(), method))
        })?;
        body(self, args)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("class", &self.class_name())
            .finish()
    }
}
