//! Output filename derivation.
//!
//! Every output's target file is assembled from the merged options:
//!
//! ```text
//! <path>/<prefix><basename><suffix>.<format>
//! ```
//!
//! Parts the merge left unset are derived from the source file and the
//! output key: `path` from the source's directory, `basename` from the
//! source filename with its extension stripped, `suffix` from the key as
//! `_<key>`. So `photo.png` through an output keyed `thumb` with no
//! overrides lands next to the source as `photo_thumb.jpg`.

use crate::config::{self, Options};
use std::path::{Path, PathBuf};

/// Fill naming fields that are still unset after the merge.
pub fn fill_naming_defaults(opts: &mut Options, source: &Path, key: &str) {
    if opts.path.is_none() {
        opts.path = Some(
            source
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .to_path_buf(),
        );
    }
    if opts.basename.is_none() {
        opts.basename = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    if opts.suffix.is_none() {
        opts.suffix = Some(format!("_{key}"));
    }
}

/// Assemble the output file path from fully-merged options.
///
/// Total over any input: unset string parts degrade to empty and an unset
/// format to the built-in default, so no combination panics.
pub fn output_path(opts: &Options) -> PathBuf {
    let dir = opts.path.clone().unwrap_or_default();
    let prefix = opts.prefix.as_deref().unwrap_or("");
    let basename = opts.basename.as_deref().unwrap_or("");
    let suffix = opts.suffix.as_deref().unwrap_or("");
    let format = opts.format.as_deref().unwrap_or(config::DEFAULT_FORMAT);
    dir.join(format!("{prefix}{basename}{suffix}.{format}"))
}
