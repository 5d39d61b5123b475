//! Weighted hierarchy input: parsing, validation, arena storage.
//!
//! Input is a nested JSON record (`name`, `size`/`weight`, optional
//! `children`, optional sector field). Validation fails fast with the path of
//! the offending node; nothing is clamped or dropped silently.

use generational_arena::{Arena, Index};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::error::{LayoutError, LayoutResult};

/// Per-node sector declaration for the pie augmentation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectorSpec {
    /// Explicit sub-weights, rendered in declaration order.
    Weights(Vec<f64>),
    /// A single percentage (0..=100), rendered as a filled span plus the
    /// remainder.
    Fraction(f64),
}

/// Node in the arena-backed hierarchy.
///
/// `parent` is a plain arena index, never an owning reference; the arena owns
/// every node and the child vectors form a strict owning forest.
#[derive(Debug)]
pub struct HierarchyNode {
    pub name: String,
    /// Weight as declared in the input, if any
    pub declared_weight: Option<f64>,
    /// Leaf: declared weight. Interior: sum of descendant weights.
    pub effective_weight: f64,
    pub sectors: Option<SectorSpec>,
    pub parent: Option<Index>,
    pub children: Vec<Index>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Validated weighted tree, ready for packing.
#[derive(Debug)]
pub struct Hierarchy {
    arena: Arena<HierarchyNode>,
    root: Index,
}

impl Hierarchy {
    /// Parse and validate a hierarchy from a JSON string.
    ///
    /// `pie_field` names the record field carrying sector weights
    /// (`"sectors"` by default, see `ChartConfig::pie_source_field`).
    #[instrument(skip(input))]
    pub fn from_json_str(input: &str, pie_field: &str) -> LayoutResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            LayoutError::validation("(input)", format!("invalid JSON: {}", e))
        })?;
        Self::from_json_value(&value, pie_field)
    }

    /// Validate a hierarchy from an already-parsed JSON value.
    pub fn from_json_value(value: &Value, pie_field: &str) -> LayoutResult<Self> {
        let mut arena = Arena::new();
        let root = build_node(&mut arena, value, "", None, pie_field)?;
        let hierarchy = Hierarchy { arena, root };
        debug!(
            nodes = hierarchy.len(),
            total_weight = hierarchy.total_weight(),
            "hierarchy validated"
        );
        Ok(hierarchy)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    /// Borrow a node. Indices handed out by this hierarchy are always valid.
    pub fn node(&self, idx: Index) -> &HierarchyNode {
        &self.arena[idx]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Sum of all leaf weights.
    pub fn total_weight(&self) -> f64 {
        self.arena[self.root].effective_weight
    }

    /// Number of levels in the hierarchy (a lone root counts as 1). External
    /// color-scale collaborators build their `[0, depth]` domain from this.
    pub fn depth_count(&self) -> usize {
        self.iter()
            .map(|(_, depth, _)| depth)
            .max()
            .map_or(0, |d| d + 1)
    }

    /// Preorder traversal yielding `(index, depth, node)`.
    pub fn iter(&self) -> impl Iterator<Item = (Index, usize, &HierarchyNode)> + '_ {
        let mut stack = vec![(self.root, 0usize)];
        std::iter::from_fn(move || {
            let (idx, depth) = stack.pop()?;
            let node = &self.arena[idx];
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
            Some((idx, depth, node))
        })
    }

    /// Slash-separated path from the root to `idx`, for diagnostics.
    pub fn node_path(&self, idx: Index) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = &self.arena[i];
            parts.push(node.name.as_str());
            cur = node.parent;
        }
        parts.reverse();
        parts.join("/")
    }
}

fn build_node(
    arena: &mut Arena<HierarchyNode>,
    value: &Value,
    parent_path: &str,
    parent: Option<Index>,
    pie_field: &str,
) -> LayoutResult<Index> {
    let obj = value.as_object().ok_or_else(|| {
        LayoutError::validation(
            join_path(parent_path, "?"),
            "hierarchy node must be a JSON object",
        )
    })?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            LayoutError::validation(join_path(parent_path, "?"), "missing string field 'name'")
        })?
        .to_string();
    let path = join_path(parent_path, &name);

    let declared_weight = match obj.get("size").or_else(|| obj.get("weight")) {
        None => None,
        Some(v) => Some(parse_weight(v, &path)?),
    };

    let sectors = match obj.get(pie_field) {
        None => None,
        Some(v) => Some(parse_sectors(v, &path)?),
    };

    let child_values = match obj.get("children") {
        None => &[] as &[Value],
        Some(Value::Array(values)) => values.as_slice(),
        Some(_) => {
            return Err(LayoutError::validation(&path, "'children' must be an array"));
        }
    };

    if child_values.is_empty() && declared_weight.is_none() {
        return Err(LayoutError::validation(
            &path,
            "leaf node must declare a weight ('size' or 'weight')",
        ));
    }
    if !child_values.is_empty() && sectors.is_some() {
        return Err(LayoutError::validation(
            &path,
            format!("'{}' is only allowed on leaf nodes", pie_field),
        ));
    }

    let idx = arena.insert(HierarchyNode {
        name,
        declared_weight,
        effective_weight: 0.0,
        sectors,
        parent,
        children: Vec::with_capacity(child_values.len()),
    });

    let mut sum = 0.0;
    for child_value in child_values {
        let child = build_node(arena, child_value, &path, Some(idx), pie_field)?;
        sum += arena[child].effective_weight;
        arena[idx].children.push(child);
    }

    let node = &mut arena[idx];
    node.effective_weight = if node.children.is_empty() {
        // Checked above: leaves always declare a weight.
        node.declared_weight.unwrap_or(0.0)
    } else {
        if let Some(declared) = node.declared_weight {
            if declared != sum {
                debug!(
                    path = %path,
                    declared,
                    sum,
                    "declared weight on interior node overridden by descendant sum"
                );
            }
        }
        sum
    };

    Ok(idx)
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn parse_weight(value: &Value, path: &str) -> LayoutResult<f64> {
    let w = value
        .as_f64()
        .ok_or_else(|| LayoutError::validation(path, "weight must be a number"))?;
    if !w.is_finite() {
        return Err(LayoutError::validation(path, "weight must be finite"));
    }
    if w < 0.0 {
        return Err(LayoutError::validation(
            path,
            format!("negative weight {}", w),
        ));
    }
    Ok(w)
}

fn parse_sectors(value: &Value, path: &str) -> LayoutResult<SectorSpec> {
    match value {
        Value::Number(_) => {
            let f = value
                .as_f64()
                .ok_or_else(|| LayoutError::validation(path, "sector fraction must be a number"))?;
            if !f.is_finite() || !(0.0..=100.0).contains(&f) {
                return Err(LayoutError::validation(
                    path,
                    format!("sector fraction {} outside 0..=100", f),
                ));
            }
            Ok(SectorSpec::Fraction(f))
        }
        Value::Array(values) => {
            if values.is_empty() {
                return Err(LayoutError::validation(path, "sector list must not be empty"));
            }
            let mut weights = Vec::with_capacity(values.len());
            for (i, v) in values.iter().enumerate() {
                let w = v.as_f64().ok_or_else(|| {
                    LayoutError::validation(path, format!("sector {} must be a number", i))
                })?;
                if !w.is_finite() || w <= 0.0 {
                    return Err(LayoutError::validation(
                        path,
                        format!("sector {} must be a positive finite number, got {}", i, w),
                    ));
                }
                weights.push(w);
            }
            Ok(SectorSpec::Weights(weights))
        }
        _ => Err(LayoutError::validation(
            path,
            "sectors must be a list of weights or a single percentage",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_input_when_parsed_then_effective_weights_sum_up() {
        let input = r#"{
            "name": "root",
            "children": [
                {"name": "a", "size": 10},
                {"name": "b", "children": [
                    {"name": "c", "size": 5},
                    {"name": "d", "size": 7}
                ]}
            ]
        }"#;
        let h = Hierarchy::from_json_str(input, "sectors").unwrap();
        assert_eq!(h.len(), 5);
        assert_eq!(h.total_weight(), 22.0);
        assert_eq!(h.depth_count(), 3);
    }

    #[test]
    fn given_negative_weight_when_parsed_then_error_names_node_path() {
        let input = r#"{
            "name": "root",
            "children": [{"name": "bad", "size": -3}]
        }"#;
        let err = Hierarchy::from_json_str(input, "sectors").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("root/bad"), "missing node path: {}", msg);
        assert!(msg.contains("negative weight"), "wrong reason: {}", msg);
    }

    #[test]
    fn given_sectors_on_interior_node_when_parsed_then_rejected() {
        let input = r#"{
            "name": "root",
            "sectors": [1, 2],
            "children": [{"name": "a", "size": 1}]
        }"#;
        let err = Hierarchy::from_json_str(input, "sectors").unwrap_err();
        assert!(err.to_string().contains("only allowed on leaf nodes"));
    }

    #[test]
    fn given_custom_pie_field_when_parsed_then_sectors_found() {
        let input = r#"{"name": "solo", "size": 4, "shares": [2, 2]}"#;
        let h = Hierarchy::from_json_str(input, "shares").unwrap();
        let root = h.node(h.root());
        assert_eq!(root.sectors, Some(SectorSpec::Weights(vec![2.0, 2.0])));
    }
}
