// src/services/mod.rs
pub mod analysis_api;
pub mod image_probe;
pub mod orchestrator;
pub mod session;

pub use analysis_api::{AnalysisBackend, HttpAnalysisService};
pub use image_probe::ImageProbe;
pub use orchestrator::Orchestrator;
pub use session::SessionStore;
