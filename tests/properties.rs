use lilith_nosql::engine_core::classifier::{
    classify_command, classify_key_value_method, classify_method_name,
};
use lilith_nosql::engine_core::types::OperationCategory;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const KEYWORDS: [&str; 6] = ["delete", "update", "replace", "insert", "write", "find"];

fn expected(name: &str) -> OperationCategory {
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

proptest! {
    #[test]
    fn test_method_name_priority(
        prefix in "[a-zA-Z]{0,6}",
        picks in proptest::collection::vec(0..KEYWORDS.len(), 1..4),
        suffix in "[a-zA-Z]{0,6}",
        upper in any::<bool>(),
    ) {
        let mut name = prefix.clone();
        for i in &picks {
            name.push_str(KEYWORDS[*i]);
        }
        name.push_str(&suffix);
        if upper {
            name = name.to_uppercase();
        }

        prop_assert_eq!(classify_method_name(&name), expected(&name));
    }

    #[test]
    fn test_delete_always_wins(
        other in proptest::sample::select(KEYWORDS.to_vec()),
        before in any::<bool>(),
    ) {
        let name = if before {
            format!("{}AndDelete", other)
        } else {
            format!("delete{}", other)
        };
        prop_assert_eq!(classify_method_name(&name), OperationCategory::Delete);
    }

    #[test]
    fn test_unclassifiable_names(name in "[a-df-hj-z]{0,16}") {
        // Every keyword contains an 'e' or an 'i'.
        prop_assert_eq!(classify_method_name(&name), OperationCategory::Unknown);
    }

    #[test]
    fn test_key_value_agrees_on_generic_keywords(
        picks in proptest::collection::vec(0..KEYWORDS.len(), 1..3),
    ) {
        let name: String = picks.iter().map(|i| KEYWORDS[*i]).collect();
        prop_assert_eq!(classify_key_value_method(&name), classify_method_name(&name));
    }

    #[test]
    fn test_command_priority(
        present in proptest::collection::btree_set(
            proptest::sample::select(vec!["insert", "update", "delete", "find"]),
            1..=4,
        ),
        extra in proptest::collection::btree_map("[A-Z][a-z]{1,8}", any::<i64>(), 0..4),
    ) {
        let mut object = Map::new();
        for (key, value) in &extra {
            object.insert(key.clone(), json!(value));
        }
        for field in &present {
            object.insert(field.to_string(), json!("users"));
        }

        let winner = ["insert", "update", "delete", "find"]
            .into_iter()
            .find(|f| present.contains(f))
            .unwrap();
        let expected = match winner {
            "insert" => OperationCategory::Insert,
            "update" => OperationCategory::Update,
            "delete" => OperationCategory::Delete,
            _ => OperationCategory::Find,
        };

        prop_assert_eq!(classify_command(Some(&Value::Object(object))), expected);
    }

    #[test]
    fn test_non_object_commands_are_unknown(n in any::<i64>(), s in "\\PC*") {
        prop_assert_eq!(classify_command(Some(&json!(n))), OperationCategory::Unknown);
        prop_assert_eq!(classify_command(Some(&json!(s))), OperationCategory::Unknown);
        prop_assert_eq!(
            classify_command(Some(&json!([{"find": "users"}]))),
            OperationCategory::Unknown
        );
        prop_assert_eq!(classify_command(None), OperationCategory::Unknown);
    }
}
