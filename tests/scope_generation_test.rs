//! Scope Generation Tests
//!
//! Every table entry, in both alias variants, checked through the registry
//! the generator populates.

use query_scopes::registry::{AliasVariant, Normalization, ScopeTable};
use query_scopes::scopes::{apply, ScopeHost, ScopeMethod, ScopeRegistry};
use query_scopes::{ScopeConfig, ScopeError};
use serde_json::{json, Value};
use std::collections::HashMap;

const VARIANTS: [AliasVariant; 2] = [AliasVariant::Aliased, AliasVariant::Direct];

fn collapse_entries(table: &ScopeTable) -> Vec<(String, String)> {
    table
        .entries()
        .iter()
        .filter(|entry| entry.rule == Normalization::Collapse)
        .map(|entry| (entry.name.clone(), entry.key.clone()))
        .collect()
}

#[test]
fn every_parameter_passes_a_single_argument_through() {
    for variant in VARIANTS {
        let table = ScopeTable::for_variant(variant);
        let registry = ScopeRegistry::with_table(&table);

        for (name, key) in collapse_entries(&table) {
            let value = json!({"marker": name});
            assert_eq!(
                registry.call(&name, std::slice::from_ref(&value)),
                Some(json!({ key: value })),
                "{variant}: {name}"
            );
        }
    }
}

#[test]
fn every_parameter_collects_multiple_arguments_in_order() {
    for variant in VARIANTS {
        let table = ScopeTable::for_variant(variant);
        let registry = ScopeRegistry::with_table(&table);

        for (name, key) in collapse_entries(&table) {
            assert_eq!(
                registry.call(&name, &[json!("first"), json!("second")]),
                Some(json!({ key.clone(): ["first", "second"] })),
                "{variant}: {name}"
            );
            assert_eq!(
                registry.call(&name, &[json!(3), json!(1), json!(2)]),
                Some(json!({ key: [3, 1, 2] })),
                "{variant}: {name}"
            );
        }
    }
}

#[test]
fn every_parameter_yields_an_empty_sequence_without_arguments() {
    for variant in VARIANTS {
        let table = ScopeTable::for_variant(variant);
        let registry = ScopeRegistry::with_table(&table);

        for (name, key) in collapse_entries(&table) {
            assert_eq!(
                registry.call(&name, &[]),
                Some(json!({ key: [] })),
                "{variant}: {name}"
            );
        }
    }
}

#[test]
fn aliases_and_canonical_names_write_the_same_key() {
    let registry = ScopeRegistry::with_table(&ScopeTable::for_variant(AliasVariant::Aliased));
    let filter = json!({"published": true});

    let via_alias = registry.call("where", std::slice::from_ref(&filter));
    let via_canonical = registry.call("conditions", std::slice::from_ref(&filter));
    assert_eq!(via_alias, via_canonical);
    assert_eq!(via_alias, Some(json!({"conditions": {"published": true}})));

    assert_eq!(
        registry.call("with", &[json!("author"), json!("comments")]),
        Some(json!({"include": ["author", "comments"]}))
    );
    assert!(registry.get("include").is_none());
}

#[test]
fn direct_variant_exposes_include_by_name() {
    let registry = ScopeRegistry::with_table(&ScopeTable::for_variant(AliasVariant::Direct));

    assert_eq!(
        registry.call("include", &[json!("author"), json!("comments")]),
        Some(json!({"include": ["author", "comments"]}))
    );
    assert!(registry.get("with").is_none());
    assert!(registry.get("where").is_none());
}

#[test]
fn boolean_switches_default_to_true() {
    for variant in VARIANTS {
        let registry = ScopeRegistry::with_table(&ScopeTable::for_variant(variant));

        for switch in ["readonly", "lock"] {
            assert_eq!(registry.call(switch, &[]), Some(json!({ switch: true })));
            assert_eq!(
                registry.call(switch, &[json!(false)]),
                Some(json!({ switch: false }))
            );
            assert_eq!(
                registry.call(switch, &[json!(true)]),
                Some(json!({ switch: true }))
            );
        }
    }
}

#[test]
fn all_scope_is_neutral_or_verbatim() {
    let registry = ScopeRegistry::with_table(&ScopeTable::default());

    assert_eq!(registry.call("all", &[]), Some(json!({})));

    let options = json!({"conditions": {"published": true}, "order": "title", "limit": 2});
    assert_eq!(registry.call("all", std::slice::from_ref(&options)), Some(options));
}

#[test]
fn scope_names_are_unique_per_table() {
    for variant in VARIANTS {
        let table = ScopeTable::for_variant(variant);
        let mut names: Vec<&str> = table.names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "{variant} has duplicate scope names");
    }
}

/// A host that keeps scopes in insertion order, to show `apply` needs nothing
/// beyond `register_scope`
#[derive(Default)]
struct RecordingHost {
    registered: Vec<ScopeMethod>,
}

impl ScopeHost for RecordingHost {
    fn register_scope(&mut self, method: ScopeMethod) {
        self.registered.retain(|existing| existing.name() != method.name());
        self.registered.push(method);
    }
}

#[test]
fn apply_works_against_any_host() {
    let table = ScopeTable::default();
    let mut host = RecordingHost::default();
    apply(&mut host, &table);
    apply(&mut host, &table);

    let names: Vec<&str> = host.registered.iter().map(ScopeMethod::name).collect();
    let expected: Vec<&str> = table.names().collect();
    assert_eq!(names, expected);

    let order = host
        .registered
        .iter()
        .find(|method| method.name() == "order")
        .expect("order registered");
    assert_eq!(order.call(&[json!("title")]), json!({"order": "title"}));
}

#[test]
fn configured_aliases_are_registered() {
    let config = ScopeConfig {
        extra_aliases: HashMap::from([
            ("filter".to_string(), "conditions".to_string()),
            ("sort".to_string(), "order".to_string()),
        ]),
        ..ScopeConfig::default()
    };
    let table = ScopeTable::from_config(&config).expect("valid table");
    let registry = ScopeRegistry::with_table(&table);

    assert_eq!(
        registry.call("filter", &[json!({"id": 1})]),
        Some(json!({"conditions": {"id": 1}}))
    );
    assert_eq!(
        registry.call("sort", &[json!("title"), json!("id")]),
        Some(json!({"order": ["title", "id"]}))
    );
}

#[test]
fn colliding_configured_alias_is_fatal() {
    let config = ScopeConfig {
        extra_aliases: HashMap::from([("limit".to_string(), "offset".to_string())]),
        ..ScopeConfig::default()
    };
    let result = ScopeTable::from_config(&config);
    assert!(matches!(result, Err(ScopeError::Configuration { .. })));
}

#[test]
fn switch_uses_first_argument_when_given_several() {
    let registry = ScopeRegistry::with_table(&ScopeTable::default());
    assert_eq!(
        registry.call("readonly", &[json!(false), json!(true)]),
        Some(json!({"readonly": false}))
    );
    assert_eq!(registry.call("lock", &[Value::from("FOR SHARE")]), Some(json!({"lock": "FOR SHARE"})));
}
