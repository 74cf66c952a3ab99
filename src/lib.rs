//! # Thumbsmith
//!
//! A thin convenience layer over an image engine: you register named
//! *outputs* (thumbnail, full-size, …), each defined by per-output options
//! and a chain of edits, then feed it source files one at a time. Every
//! registered output is produced from every source, with configuration
//! merged across three levels and per-output failures kept isolated.
//!
//! ```text
//! Converter
//! ├── instance config      (constructor defaults over built-ins)
//! ├── outputs              thumb: resize 320x240 …
//! │                        full:  resize 1024x768 …
//! └── hooks                optional pre/post step shared by all outputs
//!
//! convert("photo.jpg", call options)
//!   → photo_thumb.jpg, photo_full.jpg   (one result entry per output)
//! ```
//!
//! For each output the pipeline is: open → preprocess hook → set format →
//! output transform → postprocess hook → set quality → write. One output
//! failing (bad transform, encode error, unwritable target) never aborts its
//! siblings; the failure is captured in that output's result entry. The only
//! hard error is an unreadable source, which aborts before any output runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`converter`] | The [`Converter`](converter::Converter): registry, hooks, the convert loop |
//! | [`config`] | Typed options record, built-in defaults, three-level shallow merge |
//! | [`naming`] | Output path derivation: `dir/prefix + basename + suffix + .format` |
//! | [`imaging`] | Engine seam ([`ImageBackend`](imaging::ImageBackend) / [`ImageHandle`](imaging::ImageHandle)), typed ops, the pure-Rust engine |
//! | [`presets`] | Outputs defined as data (options + op list) in a TOML file |
//! | [`output`] | CLI report formatting — pure `format_*` functions plus print wrappers |
//!
//! # Design Decisions
//!
//! ## Options: typed core, open edges
//!
//! The recognized option keys (`format`, `quality`, `path`, `basename`,
//! `prefix`, `suffix`) are typed struct fields, all optional so that merging
//! can tell "set here" from "falls through". Everything else lands in an
//! `extra` map and is handed to hooks and transforms untouched, so callers
//! can thread their own flags (say `photo = true`) from a `convert` call down
//! into their closures.
//!
//! ## Engine Behind a Trait
//!
//! The converter never touches pixels. It drives an [`imaging::ImageHandle`]
//! obtained from an [`imaging::ImageBackend`], which keeps the conversion
//! logic testable against a recording mock and leaves the pixel work to the
//! shipped [`imaging::RustBackend`] (the `image` crate — pure Rust, no
//! system ImageMagick or similar to install).
//!
//! ## One Error Funnel Per Output
//!
//! Every step of an output's pipeline reports the same error type. The
//! converter does not distinguish a decode failure from a bad transform or a
//! full disk; it records whatever happened in that output's entry and moves
//! on. Callers that care (like the CLI's `--delete-source`) inspect the
//! per-output outcomes.

pub mod config;
pub mod converter;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod presets;
