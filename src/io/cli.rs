//! Command-line interface for rebuilding a destination image from a source

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::algorithm::executor::{RebuildConfig, Rebuilder, Variant};
use crate::analysis::types::expand_types;
use crate::io::configuration::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MEDIUM_THRESHOLD, DEFAULT_OUTPUT_DIRECTORY,
    DEFAULT_SMALL_THRESHOLD, OUTPUT_EXTENSION,
};
use crate::io::error::{Result, WithVariant};
use crate::io::image::{load_rgb, save_rgb};
use crate::io::progress::VariantProgress;

#[derive(Parser, Debug)]
#[command(name = "blockmosaic")]
#[command(
    author,
    version,
    about = "Rebuild an image from blocks of a 512x512 source image"
)]
/// Command-line arguments for the mosaic rebuilder
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image supplying the blocks (must be 512x512)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination image to rebuild
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Nominal block size in pixels
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u32,

    /// Comparison letters from lhsvrgb; every combination is rendered
    #[arg(short, long, default_value = "")]
    pub types: String,

    /// Also render the flat mean-color variant
    #[arg(short, long)]
    pub color_only: bool,

    /// Use randomized, non-uniform block sizes
    #[arg(short, long)]
    pub non_uniform: bool,

    /// Refine high-variance blocks in medium and fine stages
    #[arg(short, long)]
    pub detail: bool,

    /// Variance threshold (1-10) for the medium stage
    #[arg(short, long, default_value_t = DEFAULT_MEDIUM_THRESHOLD)]
    pub medium: u8,

    /// Variance threshold (1-10) for the fine stage
    #[arg(short, long, default_value_t = DEFAULT_SMALL_THRESHOLD)]
    pub small: u8,

    /// Random seed for partitioning and tile orientation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Randomly rotate placed tiles by quarter turns
    #[arg(short, long)]
    pub rotate: bool,

    /// Randomly mirror placed tiles
    #[arg(long)]
    pub mirror: bool,

    /// Directory rebuilt images are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIRECTORY)]
    pub output: PathBuf,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Engine configuration described by the arguments
    ///
    /// Without an explicit seed a fresh one is drawn, so repeated non-uniform
    /// runs produce different block layouts.
    pub fn rebuild_config(&self) -> RebuildConfig {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!("Using seed {seed}");
        RebuildConfig {
            block_size: self.block_size,
            types: expand_types(&self.types, self.color_only),
            non_uniform: self.non_uniform,
            detail: self.detail,
            medium_threshold: self.medium,
            small_threshold: self.small,
            seed,
            include_rotations: self.rotate,
            include_reflections: self.mirror,
        }
    }
}

/// Outcome of one processed source/destination pair
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files written, in variant order
    pub written: Vec<PathBuf>,
    /// Labels of variants that failed to render or save
    pub failed: Vec<String>,
}

/// Output file name for one variant
///
/// Names read `{dest}_{source}_{size}[n][d]_{variant}.tif`, where `n` marks
/// non-uniform blocks, `d` marks detail mode and `size` is the corrected
/// block size.
pub fn output_file_name(
    dest: &Path,
    source: &Path,
    block_size: u32,
    non_uniform: bool,
    detail: bool,
    variant: &Variant,
) -> String {
    let dest_stem = dest.file_stem().unwrap_or_default().to_string_lossy();
    let source_stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let flags = format!(
        "{}{}",
        if non_uniform { "n" } else { "" },
        if detail { "d" } else { "" }
    );
    format!(
        "{dest_stem}_{source_stem}_{block_size}{flags}_{}.{OUTPUT_EXTENSION}",
        variant.label()
    )
}

/// Loads inputs, runs every variant and writes the results
pub struct MosaicProcessor {
    cli: Cli,
}

impl MosaicProcessor {
    /// Create a processor for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Arguments this processor runs with
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Rebuild every variant and save the successful ones
    ///
    /// Failed variants are logged and listed in the summary without stopping
    /// the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns an error if an input image cannot be loaded or the rebuild
    /// configuration is invalid; no output is written in that case
    pub fn process(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let source = load_rgb(&self.cli.source)?;
        let dest = load_rgb(&self.cli.dest)?;
        let rebuilder = Rebuilder::new(source, dest, self.cli.rebuild_config())?;

        let variants = rebuilder.variants();
        let variant_count = variants.len();
        let mut progress = if self.cli.should_show_progress() {
            let job = self
                .cli
                .dest
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            VariantProgress::new(&job, variant_count)
        } else {
            VariantProgress::hidden(variant_count)
        };

        // Variants are saved and dropped one at a time
        let mut summary = RunSummary::default();
        for variant in variants {
            let output = rebuilder.render_output(variant);
            let label = output.variant.label();
            let path = self.cli.output.join(output_file_name(
                &self.cli.dest,
                &self.cli.source,
                rebuilder.block_size(),
                self.cli.non_uniform,
                self.cli.detail,
                &output.variant,
            ));
            let saved = output
                .result
                .and_then(|image| save_rgb(&image, &path).with_variant(&label));
            progress.variant_done(&label, saved.is_ok());
            match saved {
                Ok(()) => summary.written.push(path),
                Err(e) => {
                    error!("{e}");
                    summary.failed.push(label);
                }
            }
        }
        progress.finish();

        if !summary.failed.is_empty() {
            error!(
                "{} of {variant_count} variant(s) failed: {}",
                summary.failed.len(),
                summary.failed.join(", ")
            );
        }
        info!(
            "Wrote {} image(s) to '{}' in {:.2?}",
            summary.written.len(),
            self.cli.output.display(),
            start_time.elapsed()
        );

        Ok(summary)
    }
}
