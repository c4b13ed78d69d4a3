use crate::conversion::{Pass, Stage};
use crate::host::SceneHost;

/// Strips one trailing `.<digits>` disambiguation suffix, e.g. `prop.001` -> `prop`.
///
/// Only the last suffix is removed: `a.1.2` -> `a.1`. Only ASCII digits `0-9` count;
/// a suffix written with other Unicode decimal digits (e.g. `prop.٣`) is left as is.
pub fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

impl<H: SceneHost> Pass<'_, H> {
    /// Strips the numeric suffix from every node left in the scene.
    pub(crate) fn normalize_names(&mut self) {
        for id in self.host.node_ids() {
            let name = match self.host.name(id) {
                Ok(name) => name,
                Err(e) => {
                    self.record(Stage::Normalize, Some(id), e);
                    continue;
                }
            };

            let stripped = strip_numeric_suffix(&name);
            if stripped == name {
                continue;
            }

            match self.host.rename(id, stripped) {
                Ok(()) => self.report.renamed += 1,
                Err(e) => self.record(Stage::Normalize, Some(id), e),
            }
        }
    }
}
