//! Converts imported drawables and fragments into flat, tagged root assets.
//!
//! One pass runs: classify first parents, apply the drawable or fragment rule to
//! each, delete everything that was queued, then strip numeric name suffixes.

use std::collections::HashSet;
use std::fmt;

use crate::config::ConversionConfig;
use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::scene_node::TypeTag;

pub mod classifier;
mod deletion;
mod drawable;
mod fragment;
pub mod naming;

#[cfg(test)]
pub(crate) mod testing;

pub const UNDO_START_MESSAGE: &str = "Assets Conversion Start";
pub const UNDO_END_MESSAGE: &str = "Assets Conversion End";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Drawable,
    Fragment,
    Merge,
    Delete,
    Normalize,
    Undo,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Drawable => "drawable",
            Stage::Fragment => "fragment",
            Stage::Merge => "merge",
            Stage::Delete => "delete",
            Stage::Normalize => "normalize",
            Stage::Undo => "undo",
        };
        f.write_str(name)
    }
}

/// A failure that was recovered from; the pass carried on with the next node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionFailure<Id> {
    pub stage: Stage,
    pub node: Option<Id>,
    pub error: HostError,
}

#[derive(Debug, Clone)]
pub struct ConversionReport<Id> {
    /// Nodes tagged as assets that are still in the scene after the pass.
    pub assets: Vec<Id>,
    pub removed: usize,
    pub renamed: usize,
    pub failures: Vec<ConversionFailure<Id>>,
    /// Set when the pass stopped early. The scene is left as it was at that point.
    pub aborted: Option<HostError>,
}

impl<Id> ConversionReport<Id> {
    fn new() -> Self {
        Self {
            assets: Vec::new(),
            removed: 0,
            renamed: 0,
            failures: Vec::new(),
            aborted: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }

    pub fn failures_in(&self, stage: Stage) -> impl Iterator<Item = &ConversionFailure<Id>> {
        self.failures.iter().filter(move |failure| failure.stage == stage)
    }
}

/// State for a single conversion pass. Dropped once the pass is over.
pub(crate) struct Pass<'a, H: SceneHost> {
    host: &'a mut H,
    config: &'a ConversionConfig,
    objects_to_remove: Vec<H::NodeId>,
    /// Nodes already handed to the host for removal, whether or not it succeeded.
    removal_attempted: HashSet<H::NodeId>,
    removed_objects: HashSet<H::NodeId>,
    tagged: Vec<H::NodeId>,
    report: ConversionReport<H::NodeId>,
}

impl<'a, H: SceneHost> Pass<'a, H> {
    pub(crate) fn new(host: &'a mut H, config: &'a ConversionConfig) -> Self {
        Self {
            host,
            config,
            objects_to_remove: Vec::new(),
            removal_attempted: HashSet::new(),
            removed_objects: HashSet::new(),
            tagged: Vec::new(),
            report: ConversionReport::new(),
        }
    }

    fn run(&mut self) -> Result<(), HostError> {
        self.checkpoint(UNDO_START_MESSAGE);

        let first_parents = classifier::first_parents(&*self.host)?;
        log::debug!("Found {} first parents", first_parents.len());

        for (first_parent, type_tag) in first_parents {
            self.dispatch(first_parent, type_tag);
        }

        self.drain_worklist();
        self.normalize_names();

        self.checkpoint(UNDO_END_MESSAGE);
        Ok(())
    }

    fn dispatch(&mut self, first_parent: H::NodeId, type_tag: TypeTag) {
        let (stage, result) = match type_tag {
            TypeTag::Drawable => (Stage::Drawable, self.process_drawable(first_parent)),
            TypeTag::Fragment => (Stage::Fragment, self.process_fragment(first_parent)),
            TypeTag::BoundBox | TypeTag::DrawableModel => return,
        };

        if let Err(e) = result {
            self.record(stage, Some(first_parent), e);
        }
    }

    fn checkpoint(&mut self, message: &str) {
        if !self.config.undo_checkpoints {
            return;
        }
        if let Err(e) = self.host.undo_push(message) {
            self.record(Stage::Undo, None, e);
        }
    }

    /// Tags a node as an asset. Returns whether the host actually attached asset data.
    fn tag_asset(&mut self, id: H::NodeId) -> Result<bool, HostError> {
        self.host.tag_as_asset(id)?;
        let tagged = self.host.has_asset_marker(id)?;
        if tagged {
            self.tagged.push(id);
        }
        Ok(tagged)
    }

    fn record(&mut self, stage: Stage, node: Option<H::NodeId>, error: HostError) {
        match node {
            Some(id) => log::error!("Asset conversion ({}) failed on {:?}: {}", stage, id, error),
            None => log::error!("Asset conversion ({}) failed: {}", stage, error),
        }
        self.report.failures.push(ConversionFailure { stage, node, error });
    }

    fn finish(self) -> ConversionReport<H::NodeId> {
        let Pass {
            tagged,
            removed_objects,
            mut report,
            ..
        } = self;

        let mut seen = HashSet::new();
        report.assets = tagged
            .into_iter()
            .filter(|id| !removed_objects.contains(id) && seen.insert(*id))
            .collect();
        report
    }
}

/// Runs one conversion pass over `host`.
///
/// Never fails: errors on individual nodes are logged and collected in the report,
/// and an error that stops the pass is stored in [`ConversionReport::aborted`].
pub fn convert_scene<H: SceneHost>(
    host: &mut H,
    config: &ConversionConfig,
) -> ConversionReport<H::NodeId> {
    let mut pass = Pass::new(host, config);

    if let Err(e) = pass.run() {
        log::error!("Asset conversion aborted: {}", e);
        pass.report.aborted = Some(e);
    }

    let report = pass.finish();
    log::info!(
        "Asset conversion finished: {} assets, {} nodes removed, {} renamed, {} failures",
        report.assets.len(),
        report.removed,
        report.renamed,
        report.failures.len()
    );
    report
}

/// Converts the current scene with the default settings.
pub fn convert_to_assets<H: SceneHost>(host: &mut H) {
    convert_scene(host, &ConversionConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::testing::FaultyHost;
    use crate::scene_graph::{Scene, SceneNode};

    #[test]
    fn pass_is_wrapped_in_undo_checkpoints() {
        let mut scene = Scene::new();
        scene.spawn(SceneNode::new("empty"), None);

        let report = convert_scene(&mut scene, &ConversionConfig::default());

        assert!(report.is_clean());
        assert_eq!(
            scene.undo_history(),
            &[UNDO_START_MESSAGE.to_string(), UNDO_END_MESSAGE.to_string()]
        );
    }

    #[test]
    fn undo_checkpoints_can_be_disabled() {
        let mut scene = Scene::new();
        let config = ConversionConfig {
            undo_checkpoints: false,
            ..Default::default()
        };

        convert_scene(&mut scene, &config);

        assert!(scene.undo_history().is_empty());
    }

    #[test]
    fn untagged_and_other_tagged_first_parents_are_left_alone() {
        let mut scene = Scene::new();
        let group = scene.spawn(SceneNode::new("group"), None);
        scene.spawn(SceneNode::new("group_child"), Some(group));
        let bounds = scene.spawn(SceneNode::new("bounds").with_tag(TypeTag::BoundBox), None);
        let bounds_child = scene.spawn(SceneNode::new("bounds_child"), Some(bounds));

        let report = convert_scene(&mut scene, &ConversionConfig::default());

        assert!(report.is_clean());
        assert_eq!(report.removed, 0);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.get_node(bounds_child).unwrap().parent_id, Some(bounds));
    }

    #[test]
    fn failing_first_parent_does_not_stop_the_others() {
        let mut scene = Scene::new();
        let broken = scene.spawn(SceneNode::new("broken").with_tag(TypeTag::Fragment), None);
        scene.spawn(SceneNode::new("broken.mesh"), Some(broken));
        let drawable = scene.spawn(SceneNode::new("prop").with_tag(TypeTag::Drawable), None);
        let model = scene.spawn(
            SceneNode::new("prop.model").with_tag(TypeTag::DrawableModel),
            Some(drawable),
        );

        let mut host = FaultyHost::new(&mut scene);
        host.fail_names.insert(broken);
        let report = convert_scene(&mut host, &ConversionConfig::default());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures_in(Stage::Fragment).count(), 1);
        assert_eq!(report.failures[0].node, Some(broken));
        assert_eq!(report.aborted, None);
        assert_eq!(report.assets, vec![model]);
        assert!(scene.is_removed(drawable));
        assert_eq!(scene.get_node(model).unwrap().name, "prop");
    }

    #[test]
    fn first_parent_tag_is_read_once() {
        let mut scene = Scene::new();
        let first = scene.spawn(SceneNode::new("bad").with_tag(TypeTag::Drawable), None);
        let first_model = scene.spawn(SceneNode::new("bad.model"), Some(first));
        let second = scene.spawn(SceneNode::new("good.001").with_tag(TypeTag::Drawable), None);
        let second_model = scene.spawn(SceneNode::new("good.model"), Some(second));

        let mut host = FaultyHost::new(&mut scene);
        host.fail_tags_after_first_read.insert(first);
        let report = convert_scene(&mut host, &ConversionConfig::default());

        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(report.assets, vec![first_model, second_model]);
        assert!(scene.is_removed(first));
        assert!(scene.is_removed(second));
        assert_eq!(scene.get_node(second_model).unwrap().name, "good");
    }

    #[test]
    fn failed_undo_checkpoint_is_recorded_but_pass_continues() {
        let mut scene = Scene::new();
        let drawable = scene.spawn(SceneNode::new("prop").with_tag(TypeTag::Drawable), None);
        scene.spawn(SceneNode::new("prop.model"), Some(drawable));

        let mut host = FaultyHost::new(&mut scene);
        host.fail_undo = true;
        let report = convert_scene(&mut host, &ConversionConfig::default());

        assert_eq!(report.failures_in(Stage::Undo).count(), 2);
        assert_eq!(report.assets.len(), 1);
        assert!(scene.is_removed(drawable));
    }

    #[test]
    fn unreadable_scene_aborts_the_pass() {
        let mut scene = Scene::new();
        let drawable = scene.spawn(SceneNode::new("prop").with_tag(TypeTag::Drawable), None);
        scene.spawn(SceneNode::new("prop.model"), Some(drawable));

        let mut host = FaultyHost::new(&mut scene);
        host.fail_tags.insert(drawable);
        let report = convert_scene(&mut host, &ConversionConfig::default());

        assert!(matches!(report.aborted, Some(HostError::Rejected { .. })));
        assert!(report.assets.is_empty());
        assert!(scene.contains(drawable));
        assert_eq!(scene.undo_history(), &[UNDO_START_MESSAGE.to_string()]);
    }
}
