pub mod scene;
pub mod scene_node;

// Re-export main types for convenience
pub use scene::Scene;
pub use scene_node::{AssetMarker, AssetPreview, NodeId, SceneNode, TypeTag};
