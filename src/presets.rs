//! Declarative outputs: options plus an op chain, loadable from TOML.
//!
//! Code-defined transforms can do anything; presets cover the common case
//! where an output is just "apply these edits in order". A preset file maps
//! output keys to their options and ops:
//!
//! ```toml
//! [outputs.thumb]
//! options = { suffix = "_t", quality = 70 }
//! ops = [{ op = "resize_fit", width = 320, height = 240 }]
//!
//! [outputs.full]
//! ops = [
//!     { op = "resize_fit", width = 1024, height = 768 },
//!     { op = "sharpen", sigma = 0.5, threshold = 0 },
//! ]
//! ```
//!
//! Unknown keys are rejected to catch typos early (inside `options` they are
//! pass-through values, not typos, and flow to hooks/transforms as usual).

use crate::config::Options;
use crate::converter::TransformFn;
use crate::imaging::{ImageHandle, ImageOp};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// One output defined as data instead of code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPreset {
    pub options: Options,
    pub ops: Vec<ImageOp>,
}

impl OutputPreset {
    /// Compile an op chain into a transform applying each op in order.
    pub fn transform_from_ops(ops: Vec<ImageOp>) -> TransformFn {
        Box::new(move |img: &mut dyn ImageHandle, _: &Options| {
            for op in &ops {
                img.apply(op)?;
            }
            Ok(())
        })
    }

    pub fn into_transform(self) -> TransformFn {
        Self::transform_from_ops(self.ops)
    }
}

/// A whole preset file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetFile {
    pub outputs: BTreeMap<String, OutputPreset>,
}

/// Load and parse a preset file.
pub fn load_presets(path: &Path) -> Result<PresetFile, PresetError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::ImageBackend;
    use serde_json::json;

    const SAMPLE: &str = r#"
[outputs.thumb]
options = { suffix = "_t", quality = 70 }
ops = [{ op = "resize_fit", width = 320, height = 240 }]

[outputs.full]
ops = [
    { op = "resize_fit", width = 1024, height = 768 },
    { op = "sharpen", sigma = 0.5, threshold = 0 },
]
"#;

    #[test]
    fn parse_sample_presets() {
        let file: PresetFile = toml::from_str(SAMPLE).unwrap();
        assert_eq!(file.outputs.len(), 2);

        let thumb = &file.outputs["thumb"];
        assert_eq!(thumb.options.suffix.as_deref(), Some("_t"));
        assert_eq!(thumb.options.quality, Some(70));
        assert_eq!(
            thumb.ops,
            vec![ImageOp::ResizeFit {
                width: 320,
                height: 240
            }]
        );

        let full = &file.outputs["full"];
        assert!(full.options.format.is_none());
        assert_eq!(full.ops.len(), 2);
    }

    #[test]
    fn empty_file_parses_to_no_outputs() {
        let file: PresetFile = toml::from_str("").unwrap();
        assert!(file.outputs.is_empty());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let result: Result<PresetFile, _> = toml::from_str(
            r#"
[outpts.thumb]
ops = []
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_preset_field_is_rejected() {
        let result: Result<PresetFile, _> = toml::from_str(
            r#"
[outputs.thumb]
opts = []
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn passthrough_keys_in_options_are_kept() {
        let file: PresetFile = toml::from_str(
            r#"
[outputs.wm]
options = { watermark = "studio" }
"#,
        )
        .unwrap();
        assert_eq!(
            file.outputs["wm"].options.get_extra("watermark"),
            Some(&json!("studio"))
        );
    }

    #[test]
    fn compiled_transform_applies_ops_in_order() {
        let file: PresetFile = toml::from_str(SAMPLE).unwrap();
        let transform = file.outputs["full"].clone().into_transform();

        let backend = MockBackend::new();
        let mut handle = backend.open(Path::new("/in.jpg")).unwrap();
        transform(handle.as_mut(), &Options::default()).unwrap();

        assert_eq!(
            backend.recorded(),
            vec![
                RecordedOp::Open("/in.jpg".into()),
                RecordedOp::Apply(ImageOp::ResizeFit {
                    width: 1024,
                    height: 768
                }),
                RecordedOp::Apply(ImageOp::Sharpen {
                    sigma: 0.5,
                    threshold: 0
                }),
            ]
        );
    }

    #[test]
    fn load_presets_reports_missing_file() {
        let result = load_presets(Path::new("/nonexistent/outputs.toml"));
        assert!(matches!(result, Err(PresetError::Io(_))));
    }

    #[test]
    fn load_presets_reports_bad_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("outputs.toml");
        std::fs::write(&path, "[outputs.thumb").unwrap();
        assert!(matches!(load_presets(&path), Err(PresetError::Toml(_))));
    }
}
