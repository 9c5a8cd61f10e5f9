use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Point};
use crate::error::Error;

/// Root of an ER diagram model as produced by the language server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Entity(Entity),
    Edge(Edge),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hover: bool,
}

fn default_expanded() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Relationship carrying a cardinality in CHEN or BACH notation
    #[default]
    Relationship,
    /// Generalization, drawn with an arrow head at the target
    Inheritance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    #[serde(default)]
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    /// Fully routed points; when present the router uses them verbatim.
    #[serde(default)]
    pub route: Option<Vec<Point>>,
    #[serde(default)]
    pub routing_points: Vec<Point>,
    #[serde(default)]
    pub children: Vec<EdgeChild>,
    #[serde(default)]
    pub hover: bool,
}

/// Child element of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChild {
    Label {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Other,
}

impl EdgeChild {
    pub fn text(&self) -> Option<&str> {
        match self {
            EdgeChild::Label { text } => Some(text),
            EdgeChild::Other => None,
        }
    }
}

impl Edge {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(EdgeChild::text)
    }
}

impl Diagram {
    pub fn from_json(source: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.children.iter().filter_map(|e| match e {
            Element::Entity(entity) => Some(entity),
            Element::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.children.iter().filter_map(|e| match e {
            Element::Edge(edge) => Some(edge),
            Element::Entity(_) => None,
        })
    }

    /// Entities keyed by id. A duplicated id resolves to the last entity.
    pub fn entity_index(&self) -> HashMap<&str, &Entity> {
        self.entities().map(|e| (e.id.as_str(), e)).collect()
    }
}
