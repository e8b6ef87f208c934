//! Relationship resolver tests against the shared fixtures.

#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeSet;

use common::{invoices_snapshot, keyed, reversed, shop_snapshot};
use schemasight::metadata::{SchemaSnapshot, TableDescriptor};
use schemasight::model::{normalize, QualifiedName};
use schemasight::semantic::inference::{
    thresholds, InferenceWeights, MatchRule, RelationshipKey, RelationshipResolver, Resolution,
};
use schemasight::semantic::{Diagnostic, DiscardReason, InferenceConfig, RelationshipOrigin};

fn resolve_with(snapshot: &SchemaSnapshot, config: InferenceConfig) -> Resolution {
    let model = normalize(snapshot).unwrap().model;
    RelationshipResolver::new(config).resolve(&model)
}

fn resolve(snapshot: &SchemaSnapshot) -> Resolution {
    resolve_with(snapshot, InferenceConfig::default())
}

fn qn(name: &str) -> QualifiedName {
    QualifiedName::new("public", name)
}

fn keys(resolution: &Resolution) -> BTreeSet<RelationshipKey> {
    resolution.edges.iter().map(|e| e.key()).collect()
}

#[test]
fn test_invoices_customer_id_is_inferred() {
    let resolution = resolve(&invoices_snapshot());
    assert_eq!(resolution.edges.len(), 1);

    let edge = &resolution.edges[0];
    assert_eq!(edge.from_table, qn("invoices"));
    assert_eq!(edge.from_column, "customer_id");
    assert_eq!(edge.to_table, qn("customers"));
    assert_eq!(edge.to_column, "id");
    assert_eq!(edge.origin, RelationshipOrigin::Inferred);
    assert_eq!(edge.rule, Some(MatchRule::InflectedTableName));
    assert_eq!(edge.confidence, 0.6);
    assert!(!edge.nullable);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_shop_edges_in_resolution_order() {
    let resolution = resolve(&shop_snapshot());
    let summary: Vec<(usize, String, RelationshipOrigin)> = resolution
        .edges
        .iter()
        .map(|e| (e.id, e.key().to_string(), e.origin))
        .collect();

    use RelationshipOrigin::{Declared, Inferred};
    assert_eq!(
        summary,
        vec![
            (0, "public.orders.customer_id -> public.customers.id".to_string(), Declared),
            (1, "public.employees.manager_id -> public.employees.id".to_string(), Declared),
            (2, "public.order_lines.order_id -> public.orders.id".to_string(), Inferred),
            (3, "public.order_lines.product_id -> public.products.id".to_string(), Inferred),
            (4, "public.invoices.order_id -> public.orders.id".to_string(), Inferred),
            (5, "public.invoices.customer_id -> public.customers.id".to_string(), Inferred),
        ]
    );
}

#[test]
fn test_declared_edges_have_full_confidence() {
    let resolution = resolve(&shop_snapshot());
    for edge in resolution.edges.iter().filter(|e| !e.is_inferred()) {
        assert_eq!(edge.confidence, thresholds::confidence::DECLARED);
        assert!(edge.rule.is_none());
    }
    for edge in resolution.edges.iter().filter(|e| e.is_inferred()) {
        assert!(edge.confidence < 1.0);
        assert!(edge.confidence >= thresholds::confidence::MIN_CONFIDENCE);
    }
}

#[test]
fn test_declared_key_suppresses_inference_on_same_column() {
    // `customer_id` would be inferred to `customers`; the declared key
    // points at `accounts` and wins.
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("accounts"),
        keyed("orders")
            .column("customer_id", "integer", false)
            .foreign_key(&["customer_id"], "accounts", &["id"]),
    ]);
    let resolution = resolve(&snapshot);
    assert_eq!(resolution.edges.len(), 1);
    assert_eq!(resolution.edges[0].to_table, qn("accounts"));
    assert_eq!(resolution.edges[0].origin, RelationshipOrigin::Declared);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_status_id_without_target_yields_nothing() {
    let resolution = resolve(&shop_snapshot());
    assert!(!resolution
        .edges
        .iter()
        .any(|e| e.from_column == "status_id"));
    assert!(!resolution.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::AmbiguousInference(w) if w.column == "status_id"
    )));
}

#[test]
fn test_type_mismatch_is_not_a_candidate() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("invoices").column("customer_id", "text", false),
    ]);
    let resolution = resolve(&snapshot);
    assert!(resolution.edges.is_empty());
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_unverified_type_is_penalized() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("invoices").column("customer_id", "uuid", false),
    ]);
    let resolution = resolve(&snapshot);
    assert_eq!(resolution.edges.len(), 1);
    assert_eq!(resolution.edges[0].confidence, 0.5);
}

#[test]
fn test_primary_key_name_match_with_table_match() {
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new("public", "customer")
            .column("customer_id", "integer", false)
            .primary_key(&["customer_id"]),
        keyed("invoices").column("customer_id", "integer", false),
    ]);
    let resolution = resolve(&snapshot);
    let edge = &resolution.edges[0];
    assert_eq!(edge.to_column, "customer_id");
    assert_eq!(edge.rule, Some(MatchRule::ExactTableName));
    assert_eq!(edge.confidence, 0.9);
}

#[test]
fn test_raised_threshold_discards_candidates() {
    let config = InferenceConfig::default().with_min_confidence(0.8);
    let resolution = resolve_with(&invoices_snapshot(), config);
    assert!(resolution.edges.is_empty());
    assert_eq!(resolution.diagnostics.len(), 1);
    match &resolution.diagnostics[0] {
        Diagnostic::AmbiguousInference(w) => {
            assert_eq!(w.column, "customer_id");
            assert_eq!(w.candidate_table, qn("customers"));
            assert_eq!(w.reason, DiscardReason::BelowThreshold { threshold: 0.8 });
        }
        other => panic!("unexpected diagnostic: {:?}", other),
    }
}

#[test]
fn test_tuned_weights_change_scores() {
    let weights = InferenceWeights {
        inflected_table: 0.4,
        ..InferenceWeights::default()
    };
    let config = InferenceConfig::default().with_weights(weights);
    let resolution = resolve_with(&invoices_snapshot(), config);
    assert!(resolution.edges.is_empty());
    assert_eq!(resolution.diagnostics.len(), 1);
}

#[test]
fn test_declared_only_skips_inference() {
    let resolution = resolve_with(&shop_snapshot(), InferenceConfig::declared_only());
    assert_eq!(resolution.edges.len(), 2);
    assert!(resolution.edges.iter().all(|e| !e.is_inferred()));
}

#[test]
fn test_competing_targets_leave_one_winner() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("customer"),
        keyed("invoices").column("customer_id", "integer", false),
    ]);
    let resolution = resolve(&snapshot);
    assert_eq!(resolution.edges.len(), 1);
    assert_eq!(resolution.edges[0].to_table, qn("customer"));

    assert_eq!(resolution.diagnostics.len(), 1);
    match &resolution.diagnostics[0] {
        Diagnostic::AmbiguousInference(w) => {
            assert_eq!(w.candidate_table, qn("customers"));
            assert_eq!(w.confidence, 0.6);
            assert_eq!(
                w.reason,
                DiscardReason::Outranked {
                    winner: qn("customer")
                }
            );
        }
        other => panic!("unexpected diagnostic: {:?}", other),
    }
}

#[test]
fn test_edge_set_is_independent_of_table_order() {
    let shop = shop_snapshot();
    let forward = resolve(&shop);
    let backward = resolve(&reversed(&shop));
    assert_eq!(keys(&forward), keys(&backward));
    assert_eq!(forward.diagnostics.len(), backward.diagnostics.len());
}

#[test]
fn test_resolution_is_repeatable() {
    let shop = shop_snapshot();
    let first = resolve(&shop);
    let second = resolve(&shop);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_self_reference_is_kept() {
    let resolution = resolve(&shop_snapshot());
    let manager = resolution
        .edges
        .iter()
        .find(|e| e.from_column == "manager_id")
        .unwrap();
    assert!(manager.is_self_reference());
    assert!(manager.nullable);
}
