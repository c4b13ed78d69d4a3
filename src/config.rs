#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Fragment children whose name ends with this are collision meshes and get discarded.
    pub collision_suffix: String,
    /// Fragment children whose name ends with this hold the drawable models.
    pub mesh_suffix: String,
    pub undo_checkpoints: bool,
    /// A fragment's lone drawable model is tagged and then deleted along with its
    /// parent. Turning this off moves the model to the root and keeps it as an asset.
    pub discard_single_model_assets: bool,
    /// Also rename and tag bound-box children before they are deleted.
    /// The resulting scene is the same either way.
    pub flatten_bound_boxes: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            collision_suffix: ".col".to_string(),
            mesh_suffix: ".mesh".to_string(),
            undo_checkpoints: true,
            discard_single_model_assets: true,
            flatten_bound_boxes: false,
        }
    }
}
