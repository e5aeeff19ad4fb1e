// Domain layer - Core models shared by every other layer
pub mod buoy;
pub mod error;
pub mod overlay;
pub mod track;
