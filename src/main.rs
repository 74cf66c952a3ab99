use clap::Parser;
use std::path::{Path, PathBuf};
use thumbsmith::config::Options;
use thumbsmith::converter::{Converter, TransformFn};
use thumbsmith::imaging::{ImageHandle, ImageOp};
use thumbsmith::{output, presets};

#[derive(Parser)]
#[command(name = "thumbsmith")]
#[command(about = "Convert images into a set of named output variants")]
#[command(long_about = "\
Convert images into a set of named output variants

Each input file is converted into every registered output. By default two
outputs are registered — thumb (320x240) and full (1024x768), both
shrink-to-fit — and land next to the source as <name>_<output>.jpg.
Define your own outputs in a TOML file:

  [outputs.thumb]
  options = { suffix = \"_t\", quality = 70 }
  ops = [{ op = \"resize_fit\", width = 320, height = 240 }]

  [outputs.gallery]
  ops = [
      { op = \"resize_fit\", width = 1600, height = 1200 },
      { op = \"sharpen\", sigma = 0.5, threshold = 0 },
  ]

A failed output never stops the others; its error is reported per output.
Success paths print to stdout, errors to stderr.")]
#[command(version)]
struct Cli {
    /// Input image files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file defining the outputs to generate
    #[arg(long, value_name = "FILE")]
    outputs: Option<PathBuf>,

    /// Directory for generated files (default: next to each source)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Encoder quality for lossy formats
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Output format extension (jpg, png, webp, ...)
    #[arg(short, long)]
    format: Option<String>,

    /// Keep each source's own format instead of converting to jpg
    #[arg(long, conflicts_with = "format")]
    keep_format: bool,

    /// Normalize + sharpen photographic (JPEG) sources before each output
    #[arg(long)]
    photo_enhance: bool,

    /// Delete a source file once all of its outputs succeeded
    #[arg(long)]
    delete_source: bool,

    /// Print a JSON report per file instead of plain paths
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// The built-in registry used when no `--outputs` file is given.
fn register_stock_outputs(conv: &mut Converter) {
    let thumb: TransformFn = Box::new(|img: &mut dyn ImageHandle, _: &Options| {
        img.apply(&ImageOp::ResizeFit {
            width: 320,
            height: 240,
        })
    });
    let full: TransformFn = Box::new(|img: &mut dyn ImageHandle, _: &Options| {
        img.apply(&ImageOp::ResizeFit {
            width: 1024,
            height: 768,
        })
    });
    conv.add_output("thumb", Options::default(), thumb);
    conv.add_output("full", Options::default(), full);
}

/// Normalized source extension: lowercased, `jpeg` collapsed to `jpg`.
fn source_ext(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(if ext == "jpeg" { "jpg".to_string() } else { ext })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut conv = Converter::new(Options::default());
    match &cli.outputs {
        Some(file) => {
            let presets = presets::load_presets(file)?;
            for (key, preset) in presets.outputs {
                conv.add_preset(key, preset);
            }
        }
        None => register_stock_outputs(&mut conv),
    }

    if cli.photo_enhance {
        conv.set_preprocess(Box::new(|img: &mut dyn ImageHandle, opts: &Options| {
            if opts.extra_flag("photo") {
                img.apply(&ImageOp::Normalize)?;
                img.apply(&ImageOp::Sharpen {
                    sigma: 2.0,
                    threshold: 0,
                })?;
            }
            Ok(())
        }));
    }

    let mut had_failure = false;
    for path in &cli.files {
        if !cli.json {
            println!("{}", path.display());
        }

        let mut call = Options {
            quality: cli.quality,
            format: cli.format.clone(),
            path: cli.out_dir.clone(),
            ..Options::default()
        };
        let ext = source_ext(path);
        if cli.keep_format {
            call.format = ext.clone();
        }
        if ext.as_deref() == Some("jpg") {
            call.extra
                .insert("photo".into(), serde_json::Value::Bool(true));
        }

        let results = match conv.convert(path, &call) {
            Ok(Some(results)) => results,
            Ok(None) => {
                eprintln!("ERROR: no outputs defined in {:?}", cli.outputs);
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                had_failure = true;
                continue;
            }
        };

        if cli.json {
            let report = output::build_report(path, &results);
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            output::print_conversion(&results);
        }

        if results.values().all(|outcome| outcome.is_done()) {
            if cli.delete_source {
                if let Err(e) = std::fs::remove_file(path) {
                    eprintln!("ERROR: could not delete {}: {e}", path.display());
                    had_failure = true;
                }
            }
        } else {
            had_failure = true;
        }
    }

    if had_failure {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ext_normalizes_jpeg() {
        assert_eq!(source_ext(Path::new("a/photo.JPEG")).as_deref(), Some("jpg"));
        assert_eq!(source_ext(Path::new("a/photo.jpg")).as_deref(), Some("jpg"));
        assert_eq!(source_ext(Path::new("a/photo.PNG")).as_deref(), Some("png"));
        assert_eq!(source_ext(Path::new("noext")), None);
    }
}
