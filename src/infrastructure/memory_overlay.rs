// In-memory overlay scene implementing the rendering collaborator
use crate::application::overlay_renderer::OverlayRenderer;
use crate::domain::error::RenderError;
use crate::domain::overlay::{LayerSpec, OverlayScene, SourceEntry};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Holds the sources and layers a map client should mirror.
#[derive(Debug, Default)]
pub struct InMemoryOverlay {
    scene: Mutex<OverlayScene>,
}

impl InMemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> OverlayScene {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, OverlayScene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OverlayRenderer for InMemoryOverlay {
    fn add_source(&self, id: &str, data: Value) -> Result<(), RenderError> {
        let mut scene = self.lock();
        if scene.sources.iter().any(|s| s.id == id) {
            return Err(RenderError::DuplicateSource(id.to_string()));
        }
        scene.sources.push(SourceEntry {
            id: id.to_string(),
            data,
        });
        Ok(())
    }

    fn add_layer(&self, layer: LayerSpec, before_id: Option<&str>) -> Result<(), RenderError> {
        let mut scene = self.lock();
        if scene.layers.iter().any(|l| l.id == layer.id) {
            return Err(RenderError::DuplicateLayer(layer.id));
        }
        if !scene.sources.iter().any(|s| s.id == layer.source) {
            return Err(RenderError::UnknownSource(layer.source));
        }

        let index = match before_id {
            Some(before) => scene
                .layers
                .iter()
                .position(|l| l.id == before)
                .ok_or_else(|| RenderError::UnknownLayer(before.to_string()))?,
            None => scene.layers.len(),
        };
        scene.layers.insert(index, layer);
        Ok(())
    }

    fn remove_layer(&self, id: &str) -> Result<(), RenderError> {
        let mut scene = self.lock();
        let index = scene
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| RenderError::UnknownLayer(id.to_string()))?;
        scene.layers.remove(index);
        Ok(())
    }

    fn remove_source(&self, id: &str) -> Result<(), RenderError> {
        let mut scene = self.lock();
        if let Some(layer) = scene.layers.iter().find(|l| l.source == id) {
            return Err(RenderError::SourceInUse {
                source_id: id.to_string(),
                layer_id: layer.id.clone(),
            });
        }
        let index = scene
            .sources
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RenderError::UnknownSource(id.to_string()))?;
        scene.sources.remove(index);
        Ok(())
    }

    fn get_layer(&self, id: &str) -> Option<LayerSpec> {
        self.lock().layers.iter().find(|l| l.id == id).cloned()
    }

    fn get_source(&self, id: &str) -> Option<Value> {
        self.lock()
            .sources
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.data.clone())
    }
}
