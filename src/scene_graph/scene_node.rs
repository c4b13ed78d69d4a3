use std::fmt;

use id_arena::Id;

use crate::scene_graph::scene::Scene;

pub type NodeId = Id<SceneNode>;

/// Node classification assigned by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Drawable,
    Fragment,
    BoundBox,
    DrawableModel,
}

impl TypeTag {
    /// Parses the importer's `sollum_type` property. Unknown values are treated as untagged.
    pub fn from_sollum_type(value: &str) -> Option<TypeTag> {
        match value {
            "sollumz_drawable" => Some(TypeTag::Drawable),
            "sollumz_fragment" => Some(TypeTag::Fragment),
            "sollumz_bound_box" => Some(TypeTag::BoundBox),
            "sollumz_drawable_model" => Some(TypeTag::DrawableModel),
            _ => None,
        }
    }

    pub fn as_sollum_type(self) -> &'static str {
        match self {
            TypeTag::Drawable => "sollumz_drawable",
            TypeTag::Fragment => "sollumz_fragment",
            TypeTag::BoundBox => "sollumz_bound_box",
            TypeTag::DrawableModel => "sollumz_drawable_model",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sollum_type())
    }
}

/// Metadata attached when a node is finalized as an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMarker {
    pub preview: Option<AssetPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPreview {
    pub source_meshes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub type_tag: Option<TypeTag>,
    /// Names of the meshes this node draws. Merging concatenates these.
    pub meshes: Vec<String>,
    pub asset_marker: Option<AssetMarker>,
    pub parent_id: Option<NodeId>,
    pub child_ids: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, type_tag: TypeTag) -> Self {
        self.type_tag = Some(type_tag);
        self
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.meshes.push(mesh.into());
        self
    }

    pub fn is_asset(&self) -> bool {
        self.asset_marker.is_some()
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a SceneNode> {
        self.parent_id.and_then(|id| scene.get_node(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b SceneNode> + 'b
    where
        'a: 'b,
    {
        self.child_ids.iter().filter_map(move |id| scene.get_node(*id))
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            type_tag: None,
            meshes: Vec::new(),
            asset_marker: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
