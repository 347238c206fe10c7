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

//! Operation Classifier.
//!
//! Maps a driver method name or a structured command to an
//! [`OperationCategory`]. Priority is delete, update, insert, find: method names
//! such as `findOneAndUpdate` carry several keywords and must resolve the same
//! way every time.

use serde_json::Value;

use crate::engine_core::constants::command_fields;
use crate::engine_core::types::OperationCategory;

pub fn classify_method_name(name: &str) -> OperationCategory {
    let name = name.to_lowercase();
    if name.contains("delete") {
        OperationCategory::Delete
    } else if name.contains("update") || name.contains("replace") {
        OperationCategory::Update
    } else if name.contains("insert") || name.contains("write") {
        OperationCategory::Insert
    } else if name.contains("find") {
        OperationCategory::Find
    } else {
        OperationCategory::Unknown
    }
}

/// Classify a command object by the first operation field it carries.
pub fn classify_command(command: Option<&Value>) -> OperationCategory {
    let Some(object) = command.and_then(Value::as_object) else {
        return OperationCategory::Unknown;
    };

    [
        (command_fields::INSERT, OperationCategory::Insert),
        (command_fields::UPDATE, OperationCategory::Update),
        (command_fields::DELETE, OperationCategory::Delete),
        (command_fields::FIND, OperationCategory::Find),
    ]
    .into_iter()
    .find(|(field, _)| object.contains_key(*field))
    .map(|(_, category)| category)
    .unwrap_or_default()
}

/// Key-value clients name their operations `put`, `get`, `query` and `scan`.
/// Those verbs only apply when the generic keywords find nothing.
pub fn classify_key_value_method(name: &str) -> OperationCategory {
    match classify_method_name(name) {
        OperationCategory::Unknown => {
            let name = name.to_lowercase();
            if name.contains("put") {
                OperationCategory::Insert
            } else if name.contains("get") || name.contains("query") || name.contains("scan") {
                OperationCategory::Find
            } else {
                OperationCategory::Unknown
            }
        }
        category => category,
    }
}
