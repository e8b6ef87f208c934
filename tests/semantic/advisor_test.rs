//! Join advisor tests.

#[path = "../common/mod.rs"]
mod common;

use common::{employees_snapshot, invoices_snapshot, shop_snapshot};
use schemasight::metadata::SchemaSnapshot;
use schemasight::model::normalize;
use schemasight::semantic::advisor::reasons;
use schemasight::semantic::{
    advise, advise_all, JoinRecommendation, JoinType, RelationshipEdge, RelationshipResolver,
};

fn edges(snapshot: &SchemaSnapshot) -> Vec<RelationshipEdge> {
    let model = normalize(snapshot).unwrap().model;
    RelationshipResolver::default().resolve(&model).edges
}

fn recommendation_for(edges: &[RelationshipEdge], table: &str, column: &str) -> JoinRecommendation {
    let edge = edges
        .iter()
        .find(|e| e.from_table.name == table && e.from_column == column)
        .unwrap();
    advise(edge)
}

#[test]
fn test_nullable_self_reference_gets_left_join() {
    let edges = edges(&employees_snapshot());
    let rec = recommendation_for(&edges, "employees", "manager_id");
    assert_eq!(rec.join_type, JoinType::Left);
    assert_eq!(rec.reason, reasons::NULLABLE);
    assert_eq!(
        rec.reason,
        "referencing column is nullable — rows without a match would be excluded by INNER join"
    );
    assert_eq!(rec.condition, "public.employees.manager_id = public.employees.id");
}

#[test]
fn test_inferred_edge_gets_left_join_even_when_not_null() {
    let edges = edges(&invoices_snapshot());
    assert!(!edges[0].nullable);

    let rec = recommendation_for(&edges, "invoices", "customer_id");
    assert_eq!(rec.join_type, JoinType::Left);
    assert_eq!(rec.reason, reasons::INFERRED);
    assert_eq!(rec.keyword(), "LEFT JOIN");
}

#[test]
fn test_mandatory_declared_key_gets_inner_join() {
    let edges = edges(&shop_snapshot());
    let rec = recommendation_for(&edges, "orders", "customer_id");
    assert_eq!(rec.join_type, JoinType::Inner);
    assert_eq!(rec.reason, "foreign key is mandatory");
    assert_eq!(rec.keyword(), "INNER JOIN");
    assert_eq!(rec.condition, "public.orders.customer_id = public.customers.id");
}

#[test]
fn test_every_edge_gets_exactly_one_recommendation() {
    let edges = edges(&shop_snapshot());
    let recs = advise_all(&edges);
    assert_eq!(recs.len(), edges.len());
    for (edge, rec) in edges.iter().zip(&recs) {
        assert_eq!(rec.edge_id, edge.id);
        if edge.is_inferred() {
            assert_eq!(rec.join_type, JoinType::Left);
        }
    }

    let inner = recs.iter().filter(|r| r.join_type == JoinType::Inner).count();
    assert_eq!(inner, 1);
}

#[test]
fn test_recommendation_serializes_uppercase() {
    let edges = edges(&shop_snapshot());
    let json = serde_json::to_value(advise(&edges[0])).unwrap();
    assert_eq!(json["join_type"], "INNER");
    assert_eq!(json["edge_id"], 0);
}
