// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod digitraffic_repository;
pub mod fmi_wfs_client;
pub mod memory_overlay;
pub mod multipoint_coverage;
