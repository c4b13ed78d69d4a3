mod gltf_scene;

pub use gltf_scene::{import_gltf, spawn_gltf_scene};
