pub mod config;
pub mod conversion;
pub mod error;
pub mod host;
pub mod import;
pub mod scene_graph;

pub use config::ConversionConfig;
pub use conversion::{convert_scene, convert_to_assets, ConversionFailure, ConversionReport, Stage};
pub use error::HostError;
pub use host::SceneHost;
