//! Option model and three-level configuration merging.
//!
//! Every conversion resolves its settings by layering three option sets,
//! lowest to highest priority:
//!
//! ```text
//! instance config  →  output options  →  per-call options
//! ```
//!
//! The merge is shallow: a field set in a higher layer overwrites the lower
//! one, an unset field falls through. The instance config itself starts from
//! the built-in defaults ([`DEFAULT_FORMAT`], [`DEFAULT_QUALITY`], empty
//! prefix) overlaid with whatever the constructor was given.
//!
//! ## Recognized keys
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `format` | Output extension, no leading dot (e.g. `jpg`) |
//! | `quality` | Encoder quality 0–100 for lossy formats |
//! | `path` | Target directory; unset → the source file's directory |
//! | `basename` | Output filename stem; unset → source filename without extension |
//! | `prefix` | Prepended to the basename |
//! | `suffix` | Appended before the extension; unset → `_` + output key |
//!
//! Any other key ends up in [`Options::extra`] and is passed through to
//! hooks and transforms unmodified.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output format used when no layer sets `format`.
pub const DEFAULT_FORMAT: &str = "jpg";

/// Encoder quality used when no layer sets `quality`.
pub const DEFAULT_QUALITY: u32 = 80;

/// One layer of conversion options.
///
/// All known fields are optional so that merging can distinguish "set at
/// this level" from "inherit". Unknown keys deserialize into `extra` and
/// travel with the merge untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub format: Option<String>,
    pub quality: Option<u32>,
    pub path: Option<PathBuf>,
    pub basename: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Pass-through keys for hooks and transforms.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Options {
    /// Empty layer: everything falls through.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bottom layer: `format = "jpg"`, `quality = 80`, empty
    /// prefix, everything else unset.
    pub fn builtin() -> Self {
        Self {
            format: Some(DEFAULT_FORMAT.to_string()),
            quality: Some(DEFAULT_QUALITY),
            prefix: Some(String::new()),
            ..Self::default()
        }
    }

    /// Shallow merge with `higher` taking precedence.
    ///
    /// Known fields: set wins over unset, higher wins over lower. Extra keys
    /// merge per key, higher layer winning on collisions.
    pub fn merged_with(&self, higher: &Options) -> Options {
        let mut extra = self.extra.clone();
        for (key, value) in &higher.extra {
            extra.insert(key.clone(), value.clone());
        }
        Options {
            format: higher.format.clone().or_else(|| self.format.clone()),
            quality: higher.quality.or(self.quality),
            path: higher.path.clone().or_else(|| self.path.clone()),
            basename: higher.basename.clone().or_else(|| self.basename.clone()),
            prefix: higher.prefix.clone().or_else(|| self.prefix.clone()),
            suffix: higher.suffix.clone().or_else(|| self.suffix.clone()),
            extra,
        }
    }

    /// Look up a pass-through key.
    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// True when the pass-through key is present and `true`.
    pub fn extra_flag(&self, key: &str) -> bool {
        matches!(self.extra.get(key), Some(serde_json::Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_defaults() {
        let opts = Options::builtin();
        assert_eq!(opts.format.as_deref(), Some(DEFAULT_FORMAT));
        assert_eq!(opts.quality, Some(DEFAULT_QUALITY));
        assert_eq!(opts.prefix.as_deref(), Some(""));
        assert_eq!(opts.path, None);
        assert_eq!(opts.basename, None);
        assert_eq!(opts.suffix, None);
        assert!(opts.extra.is_empty());
    }

    #[test]
    fn higher_layer_overwrites() {
        let base = Options {
            format: Some("jpg".into()),
            quality: Some(80),
            ..Options::default()
        };
        let over = Options {
            format: Some("png".into()),
            ..Options::default()
        };
        let merged = base.merged_with(&over);
        assert_eq!(merged.format.as_deref(), Some("png"));
        // quality falls through from the base
        assert_eq!(merged.quality, Some(80));
    }

    #[test]
    fn three_level_precedence() {
        let defaults = Options {
            format: Some("jpg".into()),
            ..Options::default()
        };
        let output = Options {
            format: Some("png".into()),
            ..Options::default()
        };
        let call = Options {
            format: Some("gif".into()),
            ..Options::default()
        };
        let merged = defaults.merged_with(&output).merged_with(&call);
        assert_eq!(merged.format.as_deref(), Some("gif"));
    }

    #[test]
    fn unset_fields_fall_through_all_layers() {
        let defaults = Options {
            prefix: Some("pre_".into()),
            ..Options::default()
        };
        let merged = defaults
            .merged_with(&Options::default())
            .merged_with(&Options::default());
        assert_eq!(merged.prefix.as_deref(), Some("pre_"));
    }

    #[test]
    fn extra_keys_merge_per_key() {
        let mut base = Options::default();
        base.extra.insert("text".into(), json!("hello"));
        base.extra.insert("photo".into(), json!(false));

        let mut over = Options::default();
        over.extra.insert("photo".into(), json!(true));

        let merged = base.merged_with(&over);
        assert_eq!(merged.get_extra("text"), Some(&json!("hello")));
        assert!(merged.extra_flag("photo"));
    }

    #[test]
    fn extra_flag_requires_true_boolean() {
        let mut opts = Options::default();
        opts.extra.insert("a".into(), json!("yes"));
        opts.extra.insert("b".into(), json!(false));
        assert!(!opts.extra_flag("a"));
        assert!(!opts.extra_flag("b"));
        assert!(!opts.extra_flag("missing"));
    }

    #[test]
    fn unknown_toml_keys_land_in_extra() {
        let opts: Options = toml::from_str(
            r#"
format = "png"
quality = 70
watermark = "studio"
photo = true
"#,
        )
        .unwrap();
        assert_eq!(opts.format.as_deref(), Some("png"));
        assert_eq!(opts.quality, Some(70));
        assert_eq!(opts.get_extra("watermark"), Some(&json!("studio")));
        assert!(opts.extra_flag("photo"));
    }
}
