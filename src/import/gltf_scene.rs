use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::scene_graph::{NodeId, Scene, SceneNode, TypeTag};

/// Custom properties exported next to each node.
#[derive(Debug, Default, Deserialize)]
struct NodeExtras {
    sollum_type: Option<String>,
}

/// Reads a glTF or GLB file and builds a scene from one of its scenes.
/// Without an index the document's default scene (or its first one) is used.
pub fn import_gltf(path: impl AsRef<Path>, scene_index: Option<usize>) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("Failed to read glTF file {}", path.display()))?;
    let document = &gltf.document;

    let gltf_scene = match scene_index {
        Some(index) => document
            .scenes()
            .nth(index)
            .with_context(|| format!("No scene {} in {}", index, path.display()))?,
        None => document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("No scenes in gltf")?,
    };

    let mut scene = Scene::new();
    let roots = spawn_gltf_scene(&mut scene, &gltf_scene);
    log::info!(
        "Imported {} nodes ({} roots) from {}",
        scene.len(),
        roots.len(),
        path.display()
    );

    Ok(scene)
}

/// Spawns every node of `gltf_scene` into `scene`, returning the new root ids.
pub fn spawn_gltf_scene(scene: &mut Scene, gltf_scene: &gltf::Scene) -> Vec<NodeId> {
    gltf_scene
        .nodes()
        .map(|node| spawn_gltf_node(scene, &node, None))
        .collect()
}

fn spawn_gltf_node(scene: &mut Scene, node: &gltf::Node, parent: Option<NodeId>) -> NodeId {
    let node_name = node.name().unwrap_or("Unnamed").to_string();
    let mut scene_node = SceneNode::new(node_name.clone());
    scene_node.type_tag = read_type_tag(node, &node_name);

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("{} (Mesh)", node_name));
        scene_node.meshes.push(mesh_name);
    }

    let node_id = scene.spawn(scene_node, parent);

    for child in node.children() {
        spawn_gltf_node(scene, &child, Some(node_id));
    }

    node_id
}

fn read_type_tag(node: &gltf::Node, node_name: &str) -> Option<TypeTag> {
    let raw = node.extras().as_ref()?;

    let extras: NodeExtras = match serde_json::from_str(raw.get()) {
        Ok(extras) => extras,
        Err(e) => {
            log::warn!("Ignoring malformed extras on '{}': {}", node_name, e);
            return None;
        }
    };

    let sollum_type = extras.sollum_type?;
    let type_tag = TypeTag::from_sollum_type(&sollum_type);
    if type_tag.is_none() {
        log::debug!("Unhandled sollum_type '{}' on '{}'", sollum_type, node_name);
    }
    type_tag
}
