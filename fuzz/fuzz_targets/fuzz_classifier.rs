// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use lilith_nosql::engine_core::classifier::{
    classify_command, classify_key_value_method, classify_method_name,
};
use lilith_nosql::engine_core::types::OperationCategory;

#[derive(Debug, Arbitrary)]
struct FuzzClassifierInput {
    method_name: String,
    command_keys: Vec<String>,
}

fuzz_target!(|data: &[u8]| {
    // Raw bytes as a command document
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = classify_command(Some(&value));
    }

    let mut unstructured = Unstructured::new(data);
    if let Ok(input) = FuzzClassifierInput::arbitrary(&mut unstructured) {
        let generic = classify_method_name(&input.method_name);
        let key_value = classify_key_value_method(&input.method_name);
        if generic != OperationCategory::Unknown {
            assert_eq!(generic, key_value);
        }

        let command: serde_json::Map<String, serde_json::Value> = input
            .command_keys
            .into_iter()
            .map(|k| (k, serde_json::Value::Null))
            .collect();
        let _ = classify_command(Some(&serde_json::Value::Object(command)));
    }
});
