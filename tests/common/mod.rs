//! Shared fixtures for integration tests.
#![allow(dead_code)]

use lilith_nosql::config::Config;
use lilith_nosql::context::{HeaderExecutionIds, RequestManager, RequestTraceProvider};
use lilith_nosql::engine_core::errors::InterceptorError;
use lilith_nosql::engine_core::interceptor::{Collaborators, NoSqlInterceptor};
use lilith_nosql::engine_core::models::{ApplicationRequest, SecurityEvent};
use lilith_nosql::engine_core::traits::EventTransport;
use lilith_nosql::engine_core::types::EventCategory;
use lilith_nosql::instrumentation::Instrumentation;
use std::sync::{Arc, Mutex};

pub const FUZZ_HEADER: &str = "x-lilith-fuzz-request-id";

#[derive(Default)]
pub struct RecordingTransport {
    enter: Mutex<Vec<Arc<SecurityEvent>>>,
    exit: Mutex<Vec<Arc<SecurityEvent>>>,
}

impl RecordingTransport {
    pub fn enter(&self) -> Vec<Arc<SecurityEvent>> {
        self.enter.lock().unwrap().clone()
    }

    pub fn exit(&self) -> Vec<Arc<SecurityEvent>> {
        self.exit.lock().unwrap().clone()
    }
}

impl EventTransport for RecordingTransport {
    fn emit(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.enter.lock().unwrap().push(event);
        Ok(())
    }

    fn emit_completion(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.exit.lock().unwrap().push(event);
        Ok(())
    }
}

/// Transport that fails every send.
pub struct BrokenTransport;

impl EventTransport for BrokenTransport {
    fn emit(&self, _event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        Err(InterceptorError::Transport("collector unreachable".to_string()))
    }

    fn emit_completion(&self, _event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        Err(InterceptorError::Transport("collector unreachable".to_string()))
    }
}

/// Transport with a bug.
pub struct PanickingTransport;

impl EventTransport for PanickingTransport {
    fn emit(&self, _event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        panic!("collector crashed")
    }

    fn emit_completion(&self, _event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        panic!("collector crashed")
    }
}

pub fn collaborators(transport: Arc<dyn EventTransport>) -> Collaborators {
    Collaborators {
        requests: Arc::new(RequestManager::new()),
        traces: Arc::new(RequestTraceProvider),
        executions: Arc::new(HeaderExecutionIds::new(FUZZ_HEADER)),
        transport,
    }
}

pub fn interceptor(family: EventCategory) -> (Arc<NoSqlInterceptor>, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let interceptor = NoSqlInterceptor::new(
        &Config::default(),
        family,
        collaborators(transport.clone()),
    );
    (Arc::new(interceptor), transport)
}

pub fn instrumentation(config: Config) -> (Instrumentation, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let instrumentation = Instrumentation::new(Arc::new(config), collaborators(transport.clone()));
    (instrumentation, transport)
}

pub fn plain_request(id: &str) -> Arc<ApplicationRequest> {
    Arc::new(ApplicationRequest::new("POST", "/api/users").with_id(id))
}

pub fn fuzz_request(id: &str, execution: &str) -> Arc<ApplicationRequest> {
    Arc::new(
        ApplicationRequest::new("POST", "/api/users")
            .with_id(id)
            .with_header(FUZZ_HEADER, execution),
    )
}

/// Run `f` while `request` is the current request.
pub fn within<R>(request: &Arc<ApplicationRequest>, f: impl FnOnce() -> R) -> R {
    RequestManager::new().sync_scope(Arc::clone(request), f)
}
