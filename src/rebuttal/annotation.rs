//! Paragraph-level evidence annotations
//!
//! After expansion, each paragraph of the rebuttal document is read for
//! statements that support or attack existing nodes and edges. Annotations
//! only append to annotation lists; they never create or remove structure.

use crate::graph::{DebateGraph, EdgeAspect, EdgeKey, NodeAspect};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Wire shape of a `create_annotations` answer
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub(crate) struct LogicAnnotations {
    #[serde(default)]
    pub annotations: Vec<AnnotationWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct AnnotationWire {
    /// node or edge
    pub target_type: String,
    /// The paragraph text the annotation was drawn from
    #[serde(default)]
    pub target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_annotation: Option<NodeAnnotationWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_annotation: Option<EdgeAnnotationWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct NodeAnnotationWire {
    /// argument, importance, uniqueness, importance_rebuttal, or uniqueness_rebuttal
    pub annotation_type: String,
    pub argument: String,
    #[serde(default)]
    pub importance: String,
    #[serde(default)]
    pub uniqueness: String,
    /// Content for the *_rebuttal types
    #[serde(default)]
    pub rebuttal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct EdgeAnnotationWire {
    /// certainty, uniqueness, certainty_rebuttal, or uniqueness_rebuttal
    pub annotation_type: String,
    pub cause_argument: String,
    pub effect_argument: String,
    #[serde(default)]
    pub certainty: String,
    #[serde(default)]
    pub uniqueness: String,
    /// Content for the *_rebuttal types
    #[serde(default)]
    pub rebuttal: String,
}

/// A statement to append to one annotation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Node {
        argument: String,
        aspect: NodeAspect,
        rebuttal: bool,
        content: String,
    },
    Edge {
        key: EdgeKey,
        aspect: EdgeAspect,
        rebuttal: bool,
        content: String,
    },
}

/// Split `importance` / `certainty_rebuttal` style tags into aspect and polarity
fn split_type(annotation_type: &str) -> (&str, bool) {
    match annotation_type.strip_suffix("_rebuttal") {
        Some(aspect) => (aspect, true),
        None => (annotation_type, false),
    }
}

impl Annotation {
    /// Decode one annotation
    ///
    /// `Ok(None)` means the annotation merely restates its target and is
    /// discarded. `Err` carries the reason an annotation is unusable.
    pub(crate) fn decode(wire: AnnotationWire) -> Result<Option<Self>, String> {
        match wire.target_type.as_str() {
            "node" => {
                let payload = wire
                    .node_annotation
                    .ok_or_else(|| "node annotation without payload".to_string())?;
                if payload.annotation_type == "argument" {
                    return Ok(None);
                }
                let (aspect, rebuttal) = split_type(&payload.annotation_type);
                let aspect = NodeAspect::parse(aspect).ok_or_else(|| {
                    format!("unrecognized node annotation type '{}'", payload.annotation_type)
                })?;
                let content = match (aspect, rebuttal) {
                    (_, true) => payload.rebuttal,
                    (NodeAspect::Importance, false) => payload.importance,
                    (NodeAspect::Uniqueness, false) => payload.uniqueness,
                };
                if content.trim().is_empty() || content == payload.argument {
                    return Ok(None);
                }
                Ok(Some(Self::Node {
                    argument: payload.argument,
                    aspect,
                    rebuttal,
                    content,
                }))
            }
            "edge" => {
                let payload = wire
                    .edge_annotation
                    .ok_or_else(|| "edge annotation without payload".to_string())?;
                let (aspect, rebuttal) = split_type(&payload.annotation_type);
                let aspect = EdgeAspect::parse(aspect).ok_or_else(|| {
                    format!("unrecognized edge annotation type '{}'", payload.annotation_type)
                })?;
                let content = match (aspect, rebuttal) {
                    (_, true) => payload.rebuttal,
                    (EdgeAspect::Certainty, false) => payload.certainty,
                    (EdgeAspect::Uniqueness, false) => payload.uniqueness,
                };
                if content.trim().is_empty()
                    || content == payload.cause_argument
                    || content == payload.effect_argument
                {
                    return Ok(None);
                }
                Ok(Some(Self::Edge {
                    key: EdgeKey::new(payload.cause_argument, payload.effect_argument),
                    aspect,
                    rebuttal,
                    content,
                }))
            }
            other => Err(format!("unrecognized annotation target type '{}'", other)),
        }
    }

    /// Append the content to its list; fails when the target is absent
    pub fn apply(&self, graph: &mut DebateGraph) -> Result<(), String> {
        match self {
            Self::Node {
                argument,
                aspect,
                rebuttal,
                content,
            } => {
                let node = graph
                    .get_node_mut(argument)
                    .ok_or_else(|| format!("annotated node '{}' is not in the graph", argument))?;
                if *rebuttal {
                    node.push_rebuttal(*aspect, content.clone());
                } else {
                    node.push_support(*aspect, content.clone());
                }
            }
            Self::Edge {
                key,
                aspect,
                rebuttal,
                content,
            } => {
                let edge = graph
                    .get_edge_mut(&key.cause, &key.effect)
                    .ok_or_else(|| format!("annotated edge '{}' is not in the graph", key))?;
                if *rebuttal {
                    edge.push_rebuttal(*aspect, content.clone());
                } else {
                    edge.push_support(*aspect, content.clone());
                }
            }
        }
        Ok(())
    }
}
