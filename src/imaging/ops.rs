//! Typed image operations.
//!
//! An [`ImageOp`] describes *what* edit to make, not *how* — backends decide
//! how to execute each one. The enum is serde-tagged so preset files can
//! carry op chains as plain data:
//!
//! ```toml
//! ops = [
//!     { op = "resize_fit", width = 320, height = 240 },
//!     { op = "sharpen", sigma = 0.5, threshold = 0 },
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// A single in-place image edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ImageOp {
    /// Shrink to fit within `width`×`height`, preserving aspect ratio.
    /// Sources already inside the box are left untouched (never enlarges).
    ResizeFit { width: u32, height: u32 },
    /// Resize to exactly `width`×`height`, ignoring aspect ratio.
    ResizeExact { width: u32, height: u32 },
    /// Resize to fill `width`×`height`, then center-crop to exactly that size.
    Thumbnail { width: u32, height: u32 },
    /// Unsharp mask: `sigma` is the blur radius, `threshold` the minimum
    /// brightness difference to sharpen.
    Sharpen { sigma: f32, threshold: i32 },
    /// Gaussian blur.
    Blur { sigma: f32 },
    /// Linear contrast stretch over the full luminance range.
    Normalize,
    Grayscale,
    /// Add `value` to every channel; negative darkens.
    Brighten { value: i32 },
    /// Adjust contrast; positive increases, negative decreases.
    Contrast { value: f32 },
    FlipHorizontal,
    FlipVertical,
    /// Rotate clockwise. Only 90, 180 and 270 degrees are supported.
    Rotate { degrees: u32 },
}

impl ImageOp {
    /// Operation name as it appears in preset files.
    pub fn name(&self) -> &'static str {
        match self {
            ImageOp::ResizeFit { .. } => "resize_fit",
            ImageOp::ResizeExact { .. } => "resize_exact",
            ImageOp::Thumbnail { .. } => "thumbnail",
            ImageOp::Sharpen { .. } => "sharpen",
            ImageOp::Blur { .. } => "blur",
            ImageOp::Normalize => "normalize",
            ImageOp::Grayscale => "grayscale",
            ImageOp::Brighten { .. } => "brighten",
            ImageOp::Contrast { .. } => "contrast",
            ImageOp::FlipHorizontal => "flip_horizontal",
            ImageOp::FlipVertical => "flip_vertical",
            ImageOp::Rotate { .. } => "rotate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct OpList {
        ops: Vec<ImageOp>,
    }

    #[test]
    fn parse_op_chain_from_toml() {
        let parsed: OpList = toml::from_str(
            r#"
ops = [
    { op = "resize_fit", width = 320, height = 240 },
    { op = "normalize" },
    { op = "sharpen", sigma = 0.5, threshold = 0 },
]
"#,
        )
        .unwrap();
        assert_eq!(
            parsed.ops,
            vec![
                ImageOp::ResizeFit {
                    width: 320,
                    height: 240
                },
                ImageOp::Normalize,
                ImageOp::Sharpen {
                    sigma: 0.5,
                    threshold: 0
                },
            ]
        );
    }

    #[test]
    fn unknown_op_name_is_rejected() {
        let result: Result<OpList, _> = toml::from_str(r#"ops = [{ op = "swirl" }]"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_op_field_is_rejected() {
        let result: Result<OpList, _> = toml::from_str(r#"ops = [{ op = "resize_fit", width = 320 }]"#);
        assert!(result.is_err());
    }

    #[test]
    fn name_matches_serde_tag() {
        let op = ImageOp::Thumbnail {
            width: 100,
            height: 100,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], op.name());
    }
}
