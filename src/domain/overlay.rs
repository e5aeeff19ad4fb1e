// Map overlay instructions exchanged with the rendering collaborator
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Line,
    Circle,
}

/// A style layer drawing features from one geometry source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    pub paint: Value,
}

/// Snapshot of every source and layer currently drawn, layers in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayScene {
    pub sources: Vec<SourceEntry>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub id: String,
    pub data: Value,
}
