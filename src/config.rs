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

use crate::engine_core::constants::{config as keys, headers};
use crate::engine_core::errors::InterceptorError;
use crate::engine_core::types::EventCategory;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    /// Header whose presence marks a fuzz/replay request
    pub fuzz_request_header: String,
    pub instrument_document_db: bool,
    pub instrument_key_value_db: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, InterceptorError> {
        let defaults = Self::default();
        let fuzz_request_header = env::var(keys::ENV_FUZZ_HEADER)
            .map(|h| h.trim().to_ascii_lowercase())
            .unwrap_or(defaults.fuzz_request_header);
        if fuzz_request_header.is_empty() {
            return Err(InterceptorError::Configuration(format!(
                "{} must not be empty",
                keys::ENV_FUZZ_HEADER
            )));
        }

        Ok(Self {
            log_level: env::var(keys::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: env::var(keys::ENV_LOG_FORMAT).unwrap_or(defaults.log_format),
            fuzz_request_header,
            instrument_document_db: env_flag(keys::ENV_DOCUMENT_DB)
                .unwrap_or(defaults.instrument_document_db),
            instrument_key_value_db: env_flag(keys::ENV_KEY_VALUE_DB)
                .unwrap_or(defaults.instrument_key_value_db),
        })
    }

    pub fn is_enabled(&self, family: EventCategory) -> bool {
        match family {
            EventCategory::DocumentDb => self.instrument_document_db,
            EventCategory::KeyValueDb => self.instrument_key_value_db,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            fuzz_request_header: headers::DEFAULT_FUZZ_REQUEST_ID.to_string(),
            instrument_document_db: true,
            instrument_key_value_db: true,
        }
    }
}
