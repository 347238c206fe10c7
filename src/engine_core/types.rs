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

//! Security Types.
//!
//! Closed enumerations shared by the classifier, the event builder and the
//! adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine_core::constants::event;

/// Canonical classification of a data-access call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationCategory {
    Insert,
    Update,
    Delete,
    Find,
    #[default]
    Unknown,
}

impl OperationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::Insert => "insert",
            OperationCategory::Update => "update",
            OperationCategory::Delete => "delete",
            OperationCategory::Find => "find",
            OperationCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver family. Doubles as the event category reported to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "MONGO")]
    DocumentDb,
    #[serde(rename = "DYNAMO_DB")]
    KeyValueDb,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::DocumentDb => event::CATEGORY_DOCUMENT_DB,
            EventCategory::KeyValueDb => event::CATEGORY_KEY_VALUE_DB,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type. There is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    #[serde(rename = "NOSQL_DB_COMMAND")]
    NoSqlDbCommand,
}

impl EventType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NoSqlDbCommand => event::NOSQL_DB_COMMAND,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(event::NOSQL_DB_COMMAND_DISPLAY)
    }
}

/// Stable identity of an instrumented driver object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
