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

//! Engine core: the driver-agnostic interception pipeline.

pub mod audit;
pub mod call_state;
pub mod capture;
pub mod classifier;
pub mod constants;
pub mod correlator;
pub mod errors;
pub mod event_builder;
pub mod interceptor;
pub mod models;
pub mod outcome;
pub mod traits;
pub mod types;
