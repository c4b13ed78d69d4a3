use crate::error::HostError;
use crate::host::SceneHost;
use crate::scene_graph::TypeTag;

/// Tagged root nodes that have at least one child, in scene order, with their tag.
pub fn first_parents<H: SceneHost>(host: &H) -> Result<Vec<(H::NodeId, TypeTag)>, HostError> {
    let mut first_parents = Vec::new();

    for id in host.node_ids() {
        let Some(type_tag) = host.type_tag(id)? else {
            continue;
        };
        if host.children(id)?.is_empty() || host.parent(id)?.is_some() {
            continue;
        }
        first_parents.push((id, type_tag));
    }

    Ok(first_parents)
}
