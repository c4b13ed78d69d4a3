use crate::conversion::{Pass, Stage};
use crate::host::SceneHost;

impl<H: SceneHost> Pass<'_, H> {
    /// Schedules a node and its subtree for removal at the end of the rewrite phase.
    pub(crate) fn enqueue_removal(&mut self, id: H::NodeId) {
        self.objects_to_remove.push(id);
    }

    /// Removes everything in the worklist. Nodes already removed, either directly or
    /// as part of another node's subtree, are skipped.
    pub(crate) fn drain_worklist(&mut self) {
        let worklist = std::mem::take(&mut self.objects_to_remove);
        log::debug!("Removing {} queued nodes", worklist.len());

        for id in worklist {
            if !self.removal_attempted.contains(&id) {
                self.remove_recursive(id);
            }
        }
    }

    /// Removes a node after its children. Each node is handed to the host at most once
    /// per pass, even when the removal fails. A failed removal is recorded and its
    /// siblings are still processed.
    pub(crate) fn remove_recursive(&mut self, id: H::NodeId) {
        if self.removal_attempted.contains(&id) {
            return;
        }

        match self.host.children(id) {
            Ok(children) => {
                for child in children {
                    if !self.removal_attempted.contains(&child) {
                        self.remove_recursive(child);
                    }
                }
            }
            Err(e) => self.record(Stage::Delete, Some(id), e),
        }

        self.removal_attempted.insert(id);
        match self.host.delete(id) {
            Ok(()) => {
                self.removed_objects.insert(id);
                self.report.removed += 1;
            }
            Err(e) => self.record(Stage::Delete, Some(id), e),
        }
    }
}
