use id_arena::Arena;
use itertools::Itertools;
use std::collections::HashSet;

use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::scene_node::{AssetMarker, AssetPreview, NodeId, SceneNode, TypeTag};

/// In-memory scene graph.
///
/// Removed nodes keep their arena slot, so a `NodeId` never refers to a different
/// node after its original has been deleted.
pub struct Scene {
    pub nodes: Arena<SceneNode>,
    removed: HashSet<NodeId>,
    undo_history: Vec<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            removed: HashSet::new(),
            undo_history: Vec::new(),
        }
    }

    /// Allocates a node as-is. Its `parent_id` and `child_ids` are not linked up.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.alloc(node)
    }

    /// Adds a node under `parent` (or at the root) and links both sides of the relation.
    pub fn spawn(&mut self, node: SceneNode, parent: Option<NodeId>) -> NodeId {
        let node_id = self.add_node(SceneNode {
            parent_id: None,
            child_ids: Vec::new(),
            ..node
        });

        if parent.is_some() {
            if let Err(e) = self.set_node_parent(node_id, parent) {
                log::warn!("Spawned node {:?} left at the root: {}", node_id, e);
            }
        }

        node_id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        if self.removed.contains(&id) {
            return None;
        }
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.removed.contains(&id) {
            return None;
        }
        self.nodes.get_mut(id)
    }

    pub fn is_removed(&self, id: NodeId) -> bool {
        self.removed.contains(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .filter(move |(id, _)| !self.removed.contains(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn roots(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.iter().filter(|(_, node)| node.parent_id.is_none())
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    pub fn undo_history(&self) -> &[String] {
        &self.undo_history
    }

    fn live(&self, id: NodeId) -> Result<&SceneNode, HostError> {
        if self.removed.contains(&id) {
            return Err(HostError::NodeRemoved(format!("{:?}", id)));
        }
        self.nodes
            .get(id)
            .ok_or_else(|| HostError::NodeNotFound(format!("{:?}", id)))
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, HostError> {
        if self.removed.contains(&id) {
            return Err(HostError::NodeRemoved(format!("{:?}", id)));
        }
        self.nodes
            .get_mut(id)
            .ok_or_else(|| HostError::NodeNotFound(format!("{:?}", id)))
    }

    fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.get_node(id).and_then(|node| node.parent_id);
        while let Some(parent_id) = current {
            if parent_id == ancestor {
                return true;
            }
            current = self.get_node(parent_id).and_then(|node| node.parent_id);
        }
        false
    }

    /// Sets the parent of a node and updates child relationships
    pub fn set_node_parent(
        &mut self,
        child_id: NodeId,
        new_parent_id: Option<NodeId>,
    ) -> Result<(), HostError> {
        let old_parent_id = self.live(child_id)?.parent_id;

        if let Some(new_parent_id) = new_parent_id {
            self.live(new_parent_id)?;
            if new_parent_id == child_id || self.is_descendant_of(new_parent_id, child_id) {
                return Err(HostError::rejected(
                    "set_parent",
                    format!("{:?} cannot be parented under its own subtree", child_id),
                ));
            }
        }

        // Remove from old parent's children list
        if let Some(old_parent_id) = old_parent_id {
            if let Some(old_parent) = self.get_node_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        // Set new parent and add to new parent's children list
        self.live_mut(child_id)?.parent_id = new_parent_id;
        if let Some(new_parent_id) = new_parent_id {
            self.live_mut(new_parent_id)?.child_ids.push(child_id);
        }

        Ok(())
    }

    /// Removes a single node. Any children it still has are moved to the root.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), HostError> {
        self.set_node_parent(id, None)?;

        let orphans = std::mem::take(&mut self.live_mut(id)?.child_ids);
        for orphan in orphans {
            if let Some(child) = self.get_node_mut(orphan) {
                child.parent_id = None;
            }
        }

        self.removed.insert(id);
        Ok(())
    }

    pub fn mark_asset(&mut self, id: NodeId) -> Result<(), HostError> {
        let node = self.live_mut(id)?;
        let preview = if node.meshes.is_empty() {
            None
        } else {
            Some(AssetPreview {
                source_meshes: node.meshes.clone(),
            })
        };
        node.asset_marker = Some(AssetMarker { preview });
        Ok(())
    }

    /// Joins several nodes into a new root node. The inputs are consumed: their meshes
    /// are concatenated, their children adopted, and the inputs removed.
    pub fn merge_nodes(&mut self, ids: &[NodeId], name: &str) -> Result<NodeId, HostError> {
        let unique_ids = ids.iter().copied().unique().collect_vec();
        if unique_ids.len() < 2 {
            return Err(HostError::MergeTooFew(unique_ids.len()));
        }

        let mut type_tag: Option<TypeTag> = None;
        let mut meshes = Vec::new();
        let mut adopted = Vec::new();
        for &id in &unique_ids {
            let node = self.live(id)?;
            type_tag = type_tag.or(node.type_tag);
            meshes.extend(node.meshes.iter().cloned());
            adopted.extend(
                node.child_ids
                    .iter()
                    .copied()
                    .filter(|child| !unique_ids.contains(child)),
            );
        }

        let merged_id = self.add_node(SceneNode {
            name: name.to_string(),
            type_tag,
            meshes,
            ..Default::default()
        });

        for child in adopted {
            self.set_node_parent(child, Some(merged_id))?;
        }
        for id in unique_ids {
            self.remove_node(id)?;
        }

        Ok(merged_id)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for Scene {
    type NodeId = NodeId;

    fn node_ids(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    fn name(&self, id: NodeId) -> Result<String, HostError> {
        Ok(self.live(id)?.name.clone())
    }

    fn type_tag(&self, id: NodeId) -> Result<Option<TypeTag>, HostError> {
        Ok(self.live(id)?.type_tag)
    }

    fn children(&self, id: NodeId) -> Result<Vec<NodeId>, HostError> {
        Ok(self.live(id)?.child_ids.clone())
    }

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>, HostError> {
        Ok(self.live(id)?.parent_id)
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), HostError> {
        self.set_node_parent(id, parent)
    }

    fn rename(&mut self, id: NodeId, name: &str) -> Result<(), HostError> {
        self.live_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn tag_as_asset(&mut self, id: NodeId) -> Result<(), HostError> {
        self.mark_asset(id)
    }

    fn has_asset_marker(&self, id: NodeId) -> Result<bool, HostError> {
        Ok(self.live(id)?.is_asset())
    }

    fn merge(&mut self, ids: &[NodeId], name: &str) -> Result<NodeId, HostError> {
        self.merge_nodes(ids, name)
    }

    fn delete(&mut self, id: NodeId) -> Result<(), HostError> {
        self.remove_node(id)
    }

    fn undo_push(&mut self, message: &str) -> Result<(), HostError> {
        self.undo_history.push(message.to_string());
        Ok(())
    }
}
