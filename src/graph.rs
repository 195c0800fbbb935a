//! Model graph representation and flattening.
//!
//! The collaboration platform delivers a version as a nested object graph.
//! This module deserializes that graph and flattens it into the ordered
//! sequence of objects the analysis works on.

use crate::models::FlatObject;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One node of the nested model graph as delivered by the platform.
///
/// Composite nodes carry their children in `children`; every node, leaf or
/// composite, becomes one [`FlatObject`] when flattened.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectNode {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default = "unknown_type")]
    pub object_type: String,

    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default)]
    pub children: Vec<ObjectNode>,
}

fn unknown_type() -> String {
    "Unknown".to_string()
}

/// Flatten a graph into an ordered sequence of objects.
///
/// Traversal is depth-first preorder: a node comes before all of its
/// descendants, and children keep their declared order.
pub fn flatten(root: &ObjectNode) -> Vec<FlatObject> {
    let mut objects = Vec::new();
    walk(root, &mut objects);
    objects
}

fn walk(node: &ObjectNode, objects: &mut Vec<FlatObject>) {
    objects.push(FlatObject {
        id: node.id.clone(),
        object_type: node.object_type.clone(),
        properties: node.properties.clone(),
    });

    for child in &node.children {
        walk(child, objects);
    }
}
