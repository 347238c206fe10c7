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

//! Request Context.
//!
//! Default collaborators backed by a tokio task-local holding the request the
//! current task is serving. Driver calls made inside [`RequestManager::scope`]
//! (or [`RequestManager::sync_scope`]) resolve to that request.

use serde_json::json;
use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::engine_core::constants::headers;
use crate::engine_core::models::{ApplicationRequest, InvocationContext, TraceObject};
use crate::engine_core::traits::{ExecutionIdProvider, RequestResolver, TraceProvider};

tokio::task_local! {
    static CURRENT_REQUEST: Arc<ApplicationRequest>;
}

#[derive(Debug, Default, Clone)]
pub struct RequestManager;

impl RequestManager {
    pub fn new() -> Self {
        Self
    }

    /// Run `future` with `request` as the current request.
    pub async fn scope<F>(&self, request: Arc<ApplicationRequest>, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_REQUEST.scope(request, future).await
    }

    /// Run `f` with `request` as the current request.
    pub fn sync_scope<F, R>(&self, request: Arc<ApplicationRequest>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_REQUEST.sync_scope(request, f)
    }

    pub fn current(&self) -> Option<Arc<ApplicationRequest>> {
        CURRENT_REQUEST.try_with(Arc::clone).ok()
    }
}

impl RequestResolver for RequestManager {
    fn resolve(&self, _ctx: &InvocationContext<'_>) -> Option<Arc<ApplicationRequest>> {
        self.current()
    }
}

/// Trace built from the request id, its `traceparent` header and the call site.
#[derive(Debug, Default, Clone)]
pub struct RequestTraceProvider;

impl TraceProvider for RequestTraceProvider {
    fn current_trace(
        &self,
        ctx: &InvocationContext<'_>,
        request: &ApplicationRequest,
    ) -> TraceObject {
        TraceObject(json!({
            "requestId": request.id,
            "traceparent": request.header(headers::TRACEPARENT),
            "class": ctx.instance.class_name(),
            "method": ctx.method,
        }))
    }
}

/// Execution id from the fuzz marker header, falling back to the request id.
#[derive(Debug, Clone)]
pub struct HeaderExecutionIds {
    header: String,
}

impl HeaderExecutionIds {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fuzz_request_header.clone())
    }
}

impl ExecutionIdProvider for HeaderExecutionIds {
    fn current_execution_id(
        &self,
        _ctx: &InvocationContext<'_>,
        request: &ApplicationRequest,
    ) -> String {
        request
            .header(&self.header)
            .map(str::to_string)
            .unwrap_or_else(|| request.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Instance, Prototype};

    #[tokio::test]
    async fn test_scope_resolves_request() {
        let manager = RequestManager::new();
        assert!(manager.current().is_none());

        let request = Arc::new(ApplicationRequest::new("GET", "/items").with_id("req-1"));
        let seen = manager
            .scope(request, async { RequestManager::new().current() })
            .await;
        assert_eq!(seen.map(|r| r.id.clone()), Some("req-1".to_string()));
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_sync_scope_resolves_request() {
        let manager = RequestManager::new();
        let request = Arc::new(ApplicationRequest::new("GET", "/items").with_id("req-2"));
        let id = manager.sync_scope(request, || manager.current().map(|r| r.id.clone()));
        assert_eq!(id.as_deref(), Some("req-2"));
    }

    #[test]
    fn test_execution_id_prefers_fuzz_header() {
        let ids = HeaderExecutionIds::from_config(&Config::default());
        let instance = Instance::new(&Prototype::new("Collection"));
        let ctx = InvocationContext {
            instance: &instance,
            method: "find",
        };

        let plain = ApplicationRequest::new("GET", "/").with_id("req-3");
        assert_eq!(ids.current_execution_id(&ctx, &plain), "req-3");

        let fuzz = plain.with_header("X-Lilith-Fuzz-Request-Id", "scan-9");
        assert_eq!(ids.current_execution_id(&ctx, &fuzz), "scan-9");
    }

    #[test]
    fn test_trace_carries_call_site() {
        let instance = Instance::new(&Prototype::new("Cursor"));
        let ctx = InvocationContext {
            instance: &instance,
            method: "toArray",
        };
        let request = ApplicationRequest::new("GET", "/")
            .with_id("req-4")
            .with_header(headers::TRACEPARENT, "00-abc-def-01");
        let trace = RequestTraceProvider.current_trace(&ctx, &request);
        assert_eq!(trace.0["class"], "Cursor");
        assert_eq!(trace.0["traceparent"], "00-abc-def-01");
    }
}
