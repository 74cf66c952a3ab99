//! The converter: output registry, hooks, and the per-output pipeline.
//!
//! A [`Converter`] is configured once — instance options, optional
//! pre/postprocess hooks, named outputs — then fed source files one
//! [`Converter::convert`] call at a time. Options are resolved fresh on
//! every call by layering instance config, the output's own options, and
//! the per-call options (lowest to highest priority), so any setting can be
//! overridden at any level.
//!
//! For each registered output the pipeline is:
//!
//! ```text
//! open source → preprocess hook → set format → output transform
//!             → postprocess hook → set quality → write derived path
//! ```
//!
//! Failure tiers: an unreadable source aborts the whole call with
//! [`ConvertError::Unreadable`] before any output runs. Every other failure
//! — decode, hook, transform, encode, write — is captured in that output's
//! [`Outcome`] and the remaining outputs still run.

use crate::config::{self, Options};
use crate::imaging::{BackendError, ImageBackend, ImageHandle, RustBackend};
use crate::naming;
use crate::presets::OutputPreset;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hook and transform signature: edit the open image in place, with the
/// fully merged options for the current output available for decisions.
pub type TransformFn =
    Box<dyn Fn(&mut dyn ImageHandle, &Options) -> Result<(), BackendError> + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source cannot be read; no output was attempted.
    #[error("source file is unreadable: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A registered named output.
pub struct OutputSpec {
    key: String,
    options: Options,
    transform: TransformFn,
}

impl OutputSpec {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// Result of one output's conversion attempt.
#[derive(Debug)]
pub enum Outcome {
    Done { path: PathBuf },
    Failed { error: BackendError },
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Outcome::Done { path } => Some(path),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&BackendError> {
        match self {
            Outcome::Done { .. } => None,
            Outcome::Failed { error } => Some(error),
        }
    }
}

/// Per-output results of one `convert` call, keyed by output key.
pub type Conversion = BTreeMap<String, Outcome>;

/// See the [module docs](self) and [`Converter::convert`].
pub struct Converter<B = RustBackend> {
    backend: B,
    defaults: Options,
    config: Options,
    outputs: Vec<OutputSpec>,
    preprocess: Option<TransformFn>,
    postprocess: Option<TransformFn>,
}

impl Converter<RustBackend> {
    /// New converter backed by the shipped engine.
    ///
    /// `defaults` are merged over the built-in defaults and preserved as the
    /// `reset` target.
    pub fn new(defaults: Options) -> Self {
        Self::with_backend(RustBackend::new(), defaults)
    }
}

impl<B: ImageBackend> Converter<B> {
    /// New converter driving the given engine (the test seam).
    pub fn with_backend(backend: B, defaults: Options) -> Self {
        let defaults = Options::builtin().merged_with(&defaults);
        Self {
            backend,
            config: defaults.clone(),
            defaults,
            outputs: Vec::new(),
            preprocess: None,
            postprocess: None,
        }
    }

    /// Current instance configuration.
    pub fn config(&self) -> &Options {
        &self.config
    }

    /// Mutable instance configuration, for adjustments between calls.
    pub fn config_mut(&mut self) -> &mut Options {
        &mut self.config
    }

    /// Drop all hooks and outputs and restore the constructor-time
    /// configuration. Returns the restored configuration.
    pub fn reset(&mut self) -> &Options {
        self.preprocess = None;
        self.postprocess = None;
        self.outputs.clear();
        self.config = self.defaults.clone();
        &self.config
    }

    /// Install the preprocess hook, run before every output's transform.
    pub fn set_preprocess(&mut self, hook: TransformFn) {
        self.preprocess = Some(hook);
    }

    pub fn clear_preprocess(&mut self) {
        self.preprocess = None;
    }

    pub fn has_preprocess(&self) -> bool {
        self.preprocess.is_some()
    }

    /// Install the postprocess hook, run after every output's transform.
    pub fn set_postprocess(&mut self, hook: TransformFn) {
        self.postprocess = Some(hook);
    }

    pub fn clear_postprocess(&mut self) {
        self.postprocess = None;
    }

    pub fn has_postprocess(&self) -> bool {
        self.postprocess.is_some()
    }

    /// Register an output. Re-registering an existing key replaces it in
    /// place, keeping its position in the registry.
    pub fn add_output(&mut self, key: impl Into<String>, options: Options, transform: TransformFn) {
        let spec = OutputSpec {
            key: key.into(),
            options,
            transform,
        };
        match self.outputs.iter_mut().find(|o| o.key == spec.key) {
            Some(existing) => *existing = spec,
            None => self.outputs.push(spec),
        }
    }

    /// Register a declarative preset: its op chain becomes the transform.
    pub fn add_preset(&mut self, key: impl Into<String>, preset: OutputPreset) {
        let OutputPreset { options, ops } = preset;
        self.add_output(key, options, OutputPreset::transform_from_ops(ops));
    }

    /// Unregister an output. No-op if the key is absent.
    pub fn remove_output(&mut self, key: &str) {
        self.outputs.retain(|o| o.key != key);
    }

    /// Registered outputs in registration order.
    pub fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    /// Convert `path` into every registered output.
    ///
    /// Returns `Ok(None)` when no outputs are registered,
    /// `Err(ConvertError::Unreadable)` when the source cannot be read, and
    /// otherwise a map with one [`Outcome`] per output key. A failure inside
    /// one output's pipeline never aborts the others; its error is captured
    /// in that output's entry.
    pub fn convert(
        &self,
        path: impl AsRef<Path>,
        call_options: &Options,
    ) -> Result<Option<Conversion>, ConvertError> {
        if self.outputs.is_empty() {
            return Ok(None);
        }

        let path = path.as_ref();
        let source = std::path::absolute(path).map_err(|e| ConvertError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        // Readability gate: the one failure that aborts the whole call
        std::fs::File::open(&source).map_err(|e| ConvertError::Unreadable {
            path: source.clone(),
            source: e,
        })?;

        let mut results = Conversion::new();
        for spec in &self.outputs {
            let mut merged = self
                .config
                .merged_with(&spec.options)
                .merged_with(call_options);
            naming::fill_naming_defaults(&mut merged, &source, &spec.key);
            let target = naming::output_path(&merged);
            log::debug!(
                "output {}: {} -> {}",
                spec.key,
                source.display(),
                target.display()
            );

            let outcome = match self.run_pipeline(&source, &target, spec, &merged) {
                Ok(()) => Outcome::Done { path: target },
                Err(error) => {
                    log::warn!("output {} failed: {}", spec.key, error);
                    Outcome::Failed { error }
                }
            };
            results.insert(spec.key.clone(), outcome);
        }

        Ok(Some(results))
    }

    /// One output's pipeline. Every step funnels into `BackendError` so the
    /// caller records whatever happened without distinguishing stages.
    fn run_pipeline(
        &self,
        source: &Path,
        target: &Path,
        spec: &OutputSpec,
        merged: &Options,
    ) -> Result<(), BackendError> {
        let mut img = self.backend.open(source)?;
        if let Some(hook) = &self.preprocess {
            hook(img.as_mut(), merged)?;
        }
        img.set_format(merged.format.as_deref().unwrap_or(config::DEFAULT_FORMAT))?;
        (spec.transform)(img.as_mut(), merged)?;
        if let Some(hook) = &self.postprocess {
            hook(img.as_mut(), merged)?;
        }
        img.set_quality(merged.quality.unwrap_or(config::DEFAULT_QUALITY))?;
        img.write(target)
    }
}
