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

//! lilith-nosql Constants - Single source of truth for fixed names and defaults.
//!
//! This module centralizes event names, header names, middleware registration
//! values and configuration keys so adapters and tests agree on them.

/// Security event naming
pub mod event {
    /// Wire name of the single event type emitted by this crate
    pub const NOSQL_DB_COMMAND: &str = "NOSQL_DB_COMMAND";
    /// Human readable event type
    pub const NOSQL_DB_COMMAND_DISPLAY: &str = "NoSQL database command";
    /// Event category for the document database family
    pub const CATEGORY_DOCUMENT_DB: &str = "MONGO";
    /// Event category for the key-value database family
    pub const CATEGORY_KEY_VALUE_DB: &str = "DYNAMO_DB";
}

/// Request headers
pub mod headers {
    /// Default header marking a request as part of a fuzz/replay security test run
    pub const DEFAULT_FUZZ_REQUEST_ID: &str = "x-lilith-fuzz-request-id";
    /// W3C trace context header, copied into the trace object when present
    pub const TRACEPARENT: &str = "traceparent";
}

/// Structured command field names inspected by the classifier, in priority order
pub mod command_fields {
    pub const INSERT: &str = "insert";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const FIND: &str = "find";
}

/// Keys under which drivers keep their internal command state on an instance
pub mod state_keys {
    /// Cursor command (document drivers)
    pub const CURSOR_COMMAND: &str = "cmd";
    /// Pending batch of a bulk operation (document drivers)
    pub const BULK_BATCH: &str = "batch";
}

/// Middleware registration for the key-value command client
pub mod middleware {
    pub const NAME: &str = "lilithNoSqlMiddleware";
    /// Suffix stripped from command class names to obtain the operation name
    pub const COMMAND_SUFFIX: &str = "Command";
}

/// Call-site side table housekeeping
pub mod call_state {
    /// Registry size above which dead instance entries are purged on insert
    pub const PURGE_THRESHOLD: usize = 1024;
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "LILITH_NOSQL_LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LILITH_NOSQL_LOG_FORMAT";
    pub const ENV_FUZZ_HEADER: &str = "LILITH_NOSQL_FUZZ_HEADER";
    pub const ENV_DOCUMENT_DB: &str = "LILITH_NOSQL_DOCUMENT_DB";
    pub const ENV_KEY_VALUE_DB: &str = "LILITH_NOSQL_KEY_VALUE_DB";
}
