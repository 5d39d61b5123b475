//! Tests for the circle packing engine: containment, non-overlap,
//! monotonicity, determinism, and degenerate inputs

use std::fs;

use zoompack::config::ChartConfig;
use zoompack::domain::{pack, Hierarchy, LayoutError, NodeKind, PackedTree};

const EPS: f64 = 1e-6;

fn packed_fixture(name: &str) -> (ChartConfig, PackedTree) {
    let input = fs::read_to_string(format!("tests/resources/hierarchies/{}", name)).unwrap();
    let config = ChartConfig::default();
    let hierarchy = Hierarchy::from_json_str(&input, &config.pie_source_field).unwrap();
    let packed = pack(&hierarchy, &config).unwrap();
    (config, packed)
}

// ============================================================
// Structural Property Tests
// ============================================================

#[test]
fn given_basic_fixture_when_packed_then_root_centered_at_origin() {
    let (config, packed) = packed_fixture("basic.json");
    let root = packed.node(packed.root());
    assert_eq!(root.circle.x, 0.0);
    assert_eq!(root.circle.y, 0.0);
    assert_eq!(root.circle.r, config.diameter / 2.0);
    assert_eq!(root.kind, NodeKind::Root);
    assert_eq!(root.depth, 0);
}

#[test]
fn given_nested_fixture_when_packed_then_children_contained_in_parents() {
    let (_, packed) = packed_fixture("nested.json");
    for (_, node) in packed.iter() {
        let Some(parent_id) = node.parent else { continue };
        let parent = packed.node(parent_id);
        let dist = parent.circle.center_distance(&node.circle);
        assert!(
            dist + node.circle.r <= parent.circle.r + EPS,
            "'{}' escapes '{}': dist={} r={} parent_r={}",
            node.name,
            parent.name,
            dist,
            node.circle.r,
            parent.circle.r
        );
    }
}

#[test]
fn given_nested_fixture_when_packed_then_siblings_never_overlap() {
    let (_, packed) = packed_fixture("nested.json");
    for (_, node) in packed.iter() {
        for (i, &a) in node.children.iter().enumerate() {
            for &b in &node.children[i + 1..] {
                let ca = packed.node(a).circle;
                let cb = packed.node(b).circle;
                let dist = ca.center_distance(&cb);
                assert!(
                    dist >= ca.r + cb.r - EPS,
                    "'{}' and '{}' overlap: dist={} ra={} rb={}",
                    packed.node(a).name,
                    packed.node(b).name,
                    dist,
                    ca.r,
                    cb.r
                );
            }
        }
    }
}

#[test]
fn given_heavier_sibling_when_packed_then_radius_not_smaller() {
    let (_, packed) = packed_fixture("basic.json");
    let r = |name: &str| packed.node(packed.find(name).unwrap()).circle.r;
    // weights 50 > 30 > 20
    assert!(r("A") > r("B"));
    assert!(r("B") > r("C"));
}

#[test]
fn given_same_hierarchy_when_packed_twice_then_geometry_identical() {
    let input = fs::read_to_string("tests/resources/hierarchies/nested.json").unwrap();
    let config = ChartConfig::default();
    let h1 = Hierarchy::from_json_str(&input, &config.pie_source_field).unwrap();
    let h2 = Hierarchy::from_json_str(&input, &config.pie_source_field).unwrap();
    let p1 = pack(&h1, &config).unwrap();
    let p2 = pack(&h2, &config).unwrap();
    assert_eq!(p1.len(), p2.len());
    for ((_, a), (_, b)) in p1.iter().zip(p2.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.circle, b.circle, "non-deterministic pack for '{}'", a.name);
    }
}

#[test]
fn given_node_kinds_when_packed_then_root_interior_leaf_assigned() {
    let (_, packed) = packed_fixture("nested.json");
    let kind = |name: &str| packed.node(packed.find(name).unwrap()).kind;
    assert_eq!(kind("root"), NodeKind::Root);
    assert_eq!(kind("analytics"), NodeKind::Interior);
    assert_eq!(kind("force"), NodeKind::Leaf);
}

#[test]
fn given_depths_when_packed_then_increment_per_level() {
    let (_, packed) = packed_fixture("nested.json");
    let depth = |name: &str| packed.node(packed.find(name).unwrap()).depth;
    assert_eq!(depth("root"), 0);
    assert_eq!(depth("analytics"), 1);
    assert_eq!(depth("graph"), 2);
    assert_eq!(depth("force"), 3);
    assert_eq!(packed.depth_count(), 4);
}

// ============================================================
// Edge Case Tests
// ============================================================

#[test]
fn given_zero_weight_leaf_when_packed_then_still_positive_radius() {
    let (_, packed) = packed_fixture("nested.json");
    let palette = packed.node(packed.find("palette").unwrap());
    assert_eq!(palette.weight, 0.0);
    assert!(palette.circle.r > 0.0);
}

#[test]
fn given_single_child_when_packed_then_collapses_inset_by_padding() {
    let input = r#"{"name": "root", "children": [{"name": "only", "size": 7}]}"#;
    let config = ChartConfig::default();
    let h = Hierarchy::from_json_str(input, &config.pie_source_field).unwrap();
    let packed = pack(&h, &config).unwrap();
    let root = packed.node(packed.root());
    let only = packed.node(packed.find("only").unwrap());
    assert!((only.circle.x - root.circle.x).abs() < EPS);
    assert!((only.circle.y - root.circle.y).abs() < EPS);
    assert!((only.circle.r - (root.circle.r - config.padding)).abs() < EPS);
}

#[test]
fn given_zero_total_weight_when_packed_then_degenerate_layout_error() {
    let input = r#"{"name": "root", "children": [
        {"name": "a", "size": 0},
        {"name": "b", "size": 0}
    ]}"#;
    let config = ChartConfig::default();
    let h = Hierarchy::from_json_str(input, &config.pie_source_field).unwrap();
    match pack(&h, &config) {
        Err(LayoutError::DegenerateLayout(reason)) => {
            assert!(reason.contains("zero total weight"), "reason: {}", reason);
        }
        other => panic!("expected degenerate layout error, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn given_lone_root_leaf_when_packed_then_fills_chart() {
    let input = r#"{"name": "solo", "size": 9}"#;
    let config = ChartConfig::default();
    let h = Hierarchy::from_json_str(input, &config.pie_source_field).unwrap();
    let packed = pack(&h, &config).unwrap();
    assert_eq!(packed.len(), 1);
    let solo = packed.node(packed.root());
    assert_eq!(solo.kind, NodeKind::Root);
    assert_eq!(solo.circle.r, config.diameter / 2.0);
}

#[test]
fn given_finite_geometry_when_packed_then_no_nan_anywhere() {
    let (_, packed) = packed_fixture("nested.json");
    for (_, node) in packed.iter() {
        assert!(node.circle.x.is_finite(), "x of '{}'", node.name);
        assert!(node.circle.y.is_finite(), "y of '{}'", node.name);
        assert!(node.circle.r.is_finite() && node.circle.r > 0.0, "r of '{}'", node.name);
    }
}
