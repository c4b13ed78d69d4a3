use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::{NodeId, Scene, TypeTag};

/// Wraps a [`Scene`] and makes selected operations fail.
pub(crate) struct FaultyHost<'a> {
    pub scene: &'a mut Scene,
    pub fail_names: HashSet<NodeId>,
    pub fail_tags: HashSet<NodeId>,
    /// The first tag read of these succeeds, every later one fails.
    pub fail_tags_after_first_read: HashSet<NodeId>,
    tag_reads: RefCell<HashMap<NodeId, usize>>,
    pub fail_children: HashSet<NodeId>,
    pub fail_rename: HashSet<NodeId>,
    pub fail_delete: HashSet<NodeId>,
    /// Tagging these reports success but attaches no asset data.
    pub drop_asset_data: HashSet<NodeId>,
    pub fail_merge: bool,
    pub fail_undo: bool,
    pub delete_calls: Vec<NodeId>,
}

impl<'a> FaultyHost<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            fail_names: HashSet::new(),
            fail_tags: HashSet::new(),
            fail_tags_after_first_read: HashSet::new(),
            tag_reads: RefCell::new(HashMap::new()),
            fail_children: HashSet::new(),
            fail_rename: HashSet::new(),
            fail_delete: HashSet::new(),
            drop_asset_data: HashSet::new(),
            fail_merge: false,
            fail_undo: false,
            delete_calls: Vec::new(),
        }
    }
}

fn injected(operation: &'static str) -> HostError {
    HostError::rejected(operation, "injected failure")
}

impl SceneHost for FaultyHost<'_> {
    type NodeId = NodeId;

    fn node_ids(&self) -> Vec<NodeId> {
        self.scene.node_ids()
    }

    fn name(&self, id: NodeId) -> Result<String, HostError> {
        if self.fail_names.contains(&id) {
            return Err(injected("name"));
        }
        self.scene.name(id)
    }

    fn type_tag(&self, id: NodeId) -> Result<Option<TypeTag>, HostError> {
        if self.fail_tags.contains(&id) {
            return Err(injected("type_tag"));
        }
        let mut tag_reads = self.tag_reads.borrow_mut();
        let reads = tag_reads.entry(id).or_insert(0);
        *reads += 1;
        if *reads > 1 && self.fail_tags_after_first_read.contains(&id) {
            return Err(injected("type_tag"));
        }
        self.scene.type_tag(id)
    }

    fn children(&self, id: NodeId) -> Result<Vec<NodeId>, HostError> {
        if self.fail_children.contains(&id) {
            return Err(injected("children"));
        }
        self.scene.children(id)
    }

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>, HostError> {
        self.scene.parent(id)
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), HostError> {
        self.scene.set_parent(id, parent)
    }

    fn rename(&mut self, id: NodeId, name: &str) -> Result<(), HostError> {
        if self.fail_rename.contains(&id) {
            return Err(injected("rename"));
        }
        self.scene.rename(id, name)
    }

    fn tag_as_asset(&mut self, id: NodeId) -> Result<(), HostError> {
        if self.drop_asset_data.contains(&id) {
            return Ok(());
        }
        self.scene.tag_as_asset(id)
    }

    fn has_asset_marker(&self, id: NodeId) -> Result<bool, HostError> {
        self.scene.has_asset_marker(id)
    }

    fn merge(&mut self, ids: &[NodeId], name: &str) -> Result<NodeId, HostError> {
        if self.fail_merge {
            return Err(injected("merge"));
        }
        self.scene.merge(ids, name)
    }

    fn delete(&mut self, id: NodeId) -> Result<(), HostError> {
        self.delete_calls.push(id);
        if self.fail_delete.contains(&id) {
            return Err(injected("delete"));
        }
        self.scene.delete(id)
    }

    fn undo_push(&mut self, message: &str) -> Result<(), HostError> {
        if self.fail_undo {
            return Err(injected("undo_push"));
        }
        self.scene.undo_push(message)
    }
}
