// Application layer - Use cases and the seams to external collaborators
pub mod buoy_service;
pub mod observation_repository;
pub mod overlay_renderer;
pub mod track_fetcher;
pub mod track_registry;
