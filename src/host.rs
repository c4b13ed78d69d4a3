use std::fmt::Debug;
use std::hash::Hash;

use crate::error::HostError;
use crate::scene_graph::scene_node::TypeTag;

/// The scene operations the conversion pass needs from its host application.
///
/// Ids must stay stable for the whole pass and must never be reused for a different
/// node, since the deletion bookkeeping is keyed on them.
pub trait SceneHost {
    type NodeId: Copy + Eq + Hash + Debug;

    /// All live nodes, in a deterministic order.
    fn node_ids(&self) -> Vec<Self::NodeId>;

    fn name(&self, id: Self::NodeId) -> Result<String, HostError>;

    fn type_tag(&self, id: Self::NodeId) -> Result<Option<TypeTag>, HostError>;

    fn children(&self, id: Self::NodeId) -> Result<Vec<Self::NodeId>, HostError>;

    fn parent(&self, id: Self::NodeId) -> Result<Option<Self::NodeId>, HostError>;

    /// `None` moves the node to the scene root.
    fn set_parent(
        &mut self,
        id: Self::NodeId,
        parent: Option<Self::NodeId>,
    ) -> Result<(), HostError>;

    fn rename(&mut self, id: Self::NodeId, name: &str) -> Result<(), HostError>;

    /// Marks the node as an asset and generates its preview.
    ///
    /// A host may return `Ok` without attaching asset data; callers check
    /// [`SceneHost::has_asset_marker`] afterwards.
    fn tag_as_asset(&mut self, id: Self::NodeId) -> Result<(), HostError>;

    fn has_asset_marker(&self, id: Self::NodeId) -> Result<bool, HostError>;

    /// Joins `ids` into one new root node called `name`, consuming the inputs.
    fn merge(&mut self, ids: &[Self::NodeId], name: &str) -> Result<Self::NodeId, HostError>;

    /// Removes a single node, unlinking it from its parent. Children are not removed.
    fn delete(&mut self, id: Self::NodeId) -> Result<(), HostError>;

    fn undo_push(&mut self, message: &str) -> Result<(), HostError>;
}
