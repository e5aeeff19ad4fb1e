// Rendering collaborator seam - the map library that draws overlays
use crate::domain::error::RenderError;
use crate::domain::overlay::LayerSpec;
use serde_json::Value;

/// Map-library surface consumed by the track registry.
///
/// Implementations follow map-library rules: ids are unique, a layer must
/// reference an existing source and a source cannot be removed while a layer
/// still draws from it.
pub trait OverlayRenderer: Send + Sync {
    fn add_source(&self, id: &str, data: Value) -> Result<(), RenderError>;

    /// Add a layer on top, or directly beneath `before_id` when given.
    fn add_layer(&self, layer: LayerSpec, before_id: Option<&str>) -> Result<(), RenderError>;

    fn remove_layer(&self, id: &str) -> Result<(), RenderError>;

    fn remove_source(&self, id: &str) -> Result<(), RenderError>;

    fn get_layer(&self, id: &str) -> Option<LayerSpec>;

    fn get_source(&self, id: &str) -> Option<Value>;
}
