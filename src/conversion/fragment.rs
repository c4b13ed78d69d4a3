use crate::conversion::{Pass, Stage};
use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::TypeTag;

impl<H: SceneHost> Pass<'_, H> {
    /// Drops collision children and turns the drawable models under each mesh child
    /// into one asset named after the fragment. The fragment itself is always removed.
    pub(crate) fn process_fragment(&mut self, first_parent: H::NodeId) -> Result<(), HostError> {
        let result = self.flatten_fragment_children(first_parent);
        self.enqueue_removal(first_parent);
        result
    }

    fn flatten_fragment_children(&mut self, first_parent: H::NodeId) -> Result<(), HostError> {
        let parent_name = self.host.name(first_parent)?;
        let children = self.host.children(first_parent)?;
        log::debug!(
            "Flattening fragment '{}' ({} children)",
            parent_name,
            children.len()
        );

        for child in children {
            if let Err(e) = self.process_fragment_child(child, &parent_name) {
                self.record(Stage::Fragment, Some(child), e);
            }
        }

        Ok(())
    }

    fn process_fragment_child(
        &mut self,
        child: H::NodeId,
        parent_name: &str,
    ) -> Result<(), HostError> {
        let child_name = self.host.name(child)?;

        if child_name.ends_with(self.config.collision_suffix.as_str()) {
            log::debug!("Discarding collision '{}'", child_name);
            self.remove_recursive(child);
        } else if child_name.ends_with(self.config.mesh_suffix.as_str()) {
            let models = self.children_tagged(child, TypeTag::DrawableModel)?;

            if models.len() > 1 {
                self.merge_models(&models, &child_name, parent_name);
                self.enqueue_removal(child);
            } else {
                for model in models {
                    self.promote_single_model(model, parent_name)?;
                }
            }
        }

        Ok(())
    }

    fn children_tagged(
        &self,
        id: H::NodeId,
        tag: TypeTag,
    ) -> Result<Vec<H::NodeId>, HostError> {
        self.host
            .children(id)?
            .into_iter()
            .filter_map(|child| match self.host.type_tag(child) {
                Ok(child_tag) => (child_tag == Some(tag)).then_some(Ok(child)),
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    fn merge_models(&mut self, models: &[H::NodeId], mesh_name: &str, parent_name: &str) {
        log::debug!("Merging {} drawable models of '{}'", models.len(), mesh_name);

        let merged = match self.host.merge(models, mesh_name) {
            Ok(merged) => merged,
            Err(e) => {
                self.record(Stage::Merge, models.first().copied(), e);
                return;
            }
        };

        let tagged = self
            .host
            .rename(merged, parent_name)
            .and_then(|()| self.tag_asset(merged));
        match tagged {
            Ok(true) => {}
            Ok(false) => log::warn!("No asset data attached to merged '{}'", parent_name),
            Err(e) => self.record(Stage::Merge, Some(merged), e),
        }
    }

    fn promote_single_model(
        &mut self,
        model: H::NodeId,
        parent_name: &str,
    ) -> Result<(), HostError> {
        if !self.config.discard_single_model_assets {
            self.host.set_parent(model, None)?;
        }

        self.host.rename(model, parent_name)?;
        self.tag_asset(model)?;

        if self.config.discard_single_model_assets {
            // Tagged and then discarded with the fragment. Kept for compatibility with
            // existing conversions; disable `discard_single_model_assets` to keep it.
            log::warn!(
                "Discarding lone drawable model of '{}' after tagging it",
                parent_name
            );
            self.enqueue_removal(model);
        }

        Ok(())
    }
}
