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

//! Collaborator and Adapter Traits.
//!
//! The core resolves requests, traces and execution ids through these traits
//! and hands finished events to an [`EventTransport`]. Driver generations plug
//! in through [`DriverAdapter`].

use std::sync::Arc;

use crate::adapters::AttachReport;
use crate::driver::DriverModule;
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::interceptor::NoSqlInterceptor;
use crate::engine_core::models::{
    ApplicationRequest, InvocationContext, SecurityEvent, TraceObject,
};

/// Finds the application request that caused an invocation.
pub trait RequestResolver: Send + Sync {
    fn resolve(&self, ctx: &InvocationContext<'_>) -> Option<Arc<ApplicationRequest>>;
}

pub trait TraceProvider: Send + Sync {
    fn current_trace(&self, ctx: &InvocationContext<'_>, request: &ApplicationRequest)
        -> TraceObject;
}

/// Supplies the id of the logical security-scan execution, not of the call.
pub trait ExecutionIdProvider: Send + Sync {
    fn current_execution_id(
        &self,
        ctx: &InvocationContext<'_>,
        request: &ApplicationRequest,
    ) -> String;
}

/// Receives finished events. Ownership of the event passes to the transport.
pub trait EventTransport: Send + Sync {
    /// Enter event for an intercepted operation.
    fn emit(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError>;

    /// Exit event closing a previously emitted enter event.
    fn emit_completion(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError>;
}

/// Attaches the interception pipeline to one driver generation.
pub trait DriverAdapter: Send + Sync {
    /// Short name used in logs and attach reports
    fn name(&self) -> &'static str;

    /// Wrap every supported method of `module` with `interceptor`.
    fn attach(
        &self,
        interceptor: Arc<NoSqlInterceptor>,
        module: &DriverModule,
    ) -> Result<AttachReport, InterceptorError>;
}
