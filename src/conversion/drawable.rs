use crate::conversion::{Pass, Stage};
use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::TypeTag;

impl<H: SceneHost> Pass<'_, H> {
    /// Moves every child of a drawable to the root as an asset named after the drawable.
    /// Bound boxes are dropped and the drawable itself is always removed.
    pub(crate) fn process_drawable(&mut self, first_parent: H::NodeId) -> Result<(), HostError> {
        let result = self.flatten_drawable_children(first_parent);
        self.enqueue_removal(first_parent);
        result
    }

    fn flatten_drawable_children(&mut self, first_parent: H::NodeId) -> Result<(), HostError> {
        let parent_name = self.host.name(first_parent)?;
        let children = self.host.children(first_parent)?;
        log::debug!(
            "Flattening drawable '{}' ({} children)",
            parent_name,
            children.len()
        );

        for child in children {
            if let Err(e) = self.flatten_drawable_child(child, &parent_name) {
                self.record(Stage::Drawable, Some(child), e);
            }
        }

        Ok(())
    }

    fn flatten_drawable_child(
        &mut self,
        child: H::NodeId,
        parent_name: &str,
    ) -> Result<(), HostError> {
        if self.host.type_tag(child)? == Some(TypeTag::BoundBox) {
            self.enqueue_removal(child);
            if !self.config.flatten_bound_boxes {
                return Ok(());
            }
        }

        self.host.set_parent(child, None)?;
        self.host.rename(child, parent_name)?;

        if !self.tag_asset(child)? {
            log::warn!("No asset data attached to {:?}, removing it", child);
            self.enqueue_removal(child);
        }

        Ok(())
    }
}
