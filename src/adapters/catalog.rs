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

//! Instrumentation catalogs.
//!
//! Static plans of which classes and methods the prototype adapter wraps for
//! each driver family, and where each method's payload comes from.

use crate::engine_core::capture::CaptureShape;
use crate::engine_core::constants::state_keys;
use crate::engine_core::types::EventCategory;

/// Where a catalog entry reads its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogShape {
    OneShot,
    /// Instance state under the given key
    Stored(&'static str),
}

impl CatalogShape {
    pub fn to_capture(self) -> CaptureShape {
        match self {
            CatalogShape::OneShot => CaptureShape::OneShot,
            CatalogShape::Stored(key) => CaptureShape::cursor(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub class: &'static str,
    pub methods: &'static [&'static str],
    pub shape: CatalogShape,
}

const COLLECTION_METHODS: &[&str] = &[
    "insert",
    "insertOne",
    "insertMany",
    "update",
    "updateOne",
    "updateMany",
    "replaceOne",
    "remove",
    "deleteOne",
    "deleteMany",
    "save",
    "findOne",
    "findOneAndUpdate",
    "findOneAndDelete",
    "findOneAndReplace",
    "findAndModify",
    "findAndRemove",
    "bulkWrite",
    "count",
    "countDocuments",
    "distinct",
];

const CURSOR_METHODS: &[&str] = &["next", "toArray", "count", "explain", "forEach"];

const BULK_METHODS: &[&str] = &["execute"];

pub const DOCUMENT_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        class: "Collection",
        methods: COLLECTION_METHODS,
        shape: CatalogShape::OneShot,
    },
    CatalogEntry {
        class: "Cursor",
        methods: CURSOR_METHODS,
        shape: CatalogShape::Stored(state_keys::CURSOR_COMMAND),
    },
    CatalogEntry {
        class: "AggregationCursor",
        methods: CURSOR_METHODS,
        shape: CatalogShape::Stored(state_keys::CURSOR_COMMAND),
    },
    CatalogEntry {
        class: "CommandCursor",
        methods: CURSOR_METHODS,
        shape: CatalogShape::Stored(state_keys::CURSOR_COMMAND),
    },
    CatalogEntry {
        class: "OrderedBulkOperation",
        methods: BULK_METHODS,
        shape: CatalogShape::Stored(state_keys::BULK_BATCH),
    },
    CatalogEntry {
        class: "UnorderedBulkOperation",
        methods: BULK_METHODS,
        shape: CatalogShape::Stored(state_keys::BULK_BATCH),
    },
];

pub const KEY_VALUE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        class: "DynamoDB",
        methods: &[
            "putItem",
            "getItem",
            "updateItem",
            "deleteItem",
            "query",
            "scan",
            "batchGetItem",
            "batchWriteItem",
            "transactGetItems",
            "transactWriteItems",
            "executeStatement",
        ],
        shape: CatalogShape::OneShot,
    },
    CatalogEntry {
        class: "DocumentClient",
        methods: &[
            "put",
            "get",
            "update",
            "delete",
            "query",
            "scan",
            "batchGet",
            "batchWrite",
            "transactGet",
            "transactWrite",
        ],
        shape: CatalogShape::OneShot,
    },
];

pub fn for_family(family: EventCategory) -> &'static [CatalogEntry] {
    match family {
        EventCategory::DocumentDb => DOCUMENT_CATALOG,
        EventCategory::KeyValueDb => KEY_VALUE_CATALOG,
    }
}
