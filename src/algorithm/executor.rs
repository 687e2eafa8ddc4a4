//! Rebuild engine: validation, shared planning and per-variant rendering
//!
//! A [`Rebuilder`] is built once per source/destination pair. Construction
//! validates every parameter, partitions the destination and runs the detail
//! gates; after that the source partition, destination and refinement plan
//! are read-only and every comparison variant is rendered from them.

use image::RgbImage;
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use std::fmt;

use crate::algorithm::compositor::{Compositor, Orientation};
use crate::algorithm::matcher::{BlockMatcher, MatchResult, SourcePartition};
use crate::algorithm::refiner::{RefinementPlan, StagePlan, Thresholds};
use crate::analysis::types::{CompositeType, expand_types};
use crate::io::configuration::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MEDIUM_THRESHOLD, DEFAULT_SMALL_THRESHOLD, HDR_SUFFIX,
};
use crate::io::error::{Result, WithVariant, invalid_parameter};
use crate::spatial::partition::{Partitioner, correct_block_size};

/// Parameters of one rebuild run
#[derive(Clone, Debug, PartialEq, Eq)]
// Each flag is an independent user switch
#[allow(clippy::struct_excessive_bools)]
pub struct RebuildConfig {
    /// Requested nominal block size, corrected before use
    pub block_size: u32,
    /// Composite types to render, each as a base and an hdr output
    pub types: Vec<CompositeType>,
    /// Draw randomized block sizes instead of a regular grid
    pub non_uniform: bool,
    /// Run the three-stage variance-gated refinement
    pub detail: bool,
    /// Variance threshold gating the medium stage
    pub medium_threshold: u8,
    /// Variance threshold gating the fine stage
    pub small_threshold: u8,
    /// Seed for partitioning and tile orientation
    pub seed: u64,
    /// Randomly rotate placed source tiles by quarter turns
    pub include_rotations: bool,
    /// Randomly mirror placed source tiles
    pub include_reflections: bool,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            types: expand_types("", false),
            non_uniform: false,
            detail: false,
            medium_threshold: DEFAULT_MEDIUM_THRESHOLD,
            small_threshold: DEFAULT_SMALL_THRESHOLD,
            seed: 0,
            include_rotations: false,
            include_reflections: false,
        }
    }
}

impl RebuildConfig {
    /// Validated thresholds, or `None` when detail mode is off
    ///
    /// # Errors
    ///
    /// Returns [`crate::RebuildError::ThresholdOutOfRange`] in detail mode when
    /// either threshold is outside 1-10
    pub fn thresholds(&self) -> Result<Option<Thresholds>> {
        if self.detail {
            Thresholds::new(self.medium_threshold, self.small_threshold).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// One output image: a composite type, optionally rank-matched
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Type the variant compares by
    pub composite: CompositeType,
    /// Rank-scaled matching instead of nearest-key search
    pub hdr: bool,
}

impl Variant {
    /// Label used in logs, errors and output names (`lg`, `lg_hdr`, `c`)
    pub fn label(&self) -> String {
        if self.hdr {
            format!("{}{HDR_SUFFIX}", self.composite)
        } else {
            self.composite.to_string()
        }
    }

    /// Orientation seed for this variant, independent of rendering order
    pub fn seed(&self, base: u64) -> u64 {
        let mut seed = base;
        for byte in self.label().bytes() {
            seed = seed.wrapping_mul(31).wrapping_add(u64::from(byte));
        }
        seed
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of rendering one variant
#[derive(Debug)]
pub struct VariantOutput {
    /// Variant that was rendered
    pub variant: Variant,
    /// Rebuilt image, or the error that stopped this variant alone
    pub result: Result<RgbImage>,
}

/// Rebuilds one destination from one source for every configured variant
#[derive(Debug)]
pub struct Rebuilder {
    source: SourcePartition,
    dest: RgbImage,
    config: RebuildConfig,
    block_size: u32,
    plan: RefinementPlan,
}

impl Rebuilder {
    /// Validate inputs and build the shared partition and refinement plan
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source image is not 512x512
    /// - Detail mode is on and a threshold is outside 1-10
    /// - No composite types are configured
    /// - The destination image is empty
    pub fn new(source: RgbImage, dest: RgbImage, config: RebuildConfig) -> Result<Self> {
        let thresholds = config.thresholds()?;
        if config.types.is_empty() {
            return Err(invalid_parameter(
                "types",
                &"",
                &"at least one comparison type is required",
            ));
        }
        let (width, height) = dest.dimensions();
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "destination",
                &format!("{width}x{height}"),
                &"destination image is empty",
            ));
        }

        let source = SourcePartition::new(source)?;
        let block_size = correct_block_size(config.block_size, config.detail);

        let mut partitioner = Partitioner::new(config.seed);
        let table = partitioner.partition(width, height, block_size, config.non_uniform)?;
        let plan = match thresholds {
            Some(thresholds) => RefinementPlan::build(
                &dest,
                &table,
                &mut partitioner,
                block_size,
                config.non_uniform,
                thresholds,
            )?,
            None => RefinementPlan::single(&dest, &table),
        };

        info!(
            "Planned {width}x{height} rebuild: block size {block_size}, {} stage(s), {} regions",
            plan.stages().len(),
            plan.region_count()
        );

        Ok(Self {
            source,
            dest,
            config,
            block_size,
            plan,
        })
    }

    /// Corrected block size actually used
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Configuration the rebuilder was created with
    pub const fn config(&self) -> &RebuildConfig {
        &self.config
    }

    /// Shared refinement plan
    pub const fn plan(&self) -> &RefinementPlan {
        &self.plan
    }

    /// Partitioned source
    pub const fn source(&self) -> &SourcePartition {
        &self.source
    }

    /// Destination pixels
    pub const fn destination(&self) -> &RgbImage {
        &self.dest
    }

    /// Variants in output order: each type, followed by its hdr form
    pub fn variants(&self) -> Vec<Variant> {
        self.config
            .types
            .iter()
            .flat_map(|composite| {
                [false, true].map(|hdr| Variant {
                    composite: composite.clone(),
                    hdr,
                })
            })
            .collect()
    }

    /// Render one variant onto a fresh canvas
    ///
    /// Stages are placed coarsest first so refined regions overwrite the
    /// coarser result beneath them.
    ///
    /// # Errors
    ///
    /// Returns an error if no source tile can be matched or a placement falls
    /// outside the canvas
    pub fn render(&self, variant: &Variant) -> Result<RgbImage> {
        let matcher = BlockMatcher::new(&self.source, &variant.composite)?;
        let mut rng = StdRng::seed_from_u64(variant.seed(self.config.seed));
        let mut compositor = Compositor::new(self.dest.width(), self.dest.height());

        for stage in self.plan.stages() {
            let results = Self::match_stage(&matcher, stage, variant.hdr)?;
            debug!(
                "{variant}: placing {} {} blocks",
                results.len(),
                stage.stage()
            );
            for result in &results {
                let orientation = Orientation::random(
                    &mut rng,
                    self.config.include_rotations,
                    self.config.include_reflections,
                );
                compositor.place(self.source.image(), result, orientation)?;
            }
        }

        Ok(compositor.finish())
    }

    fn match_stage(
        matcher: &BlockMatcher<'_>,
        stage: &StagePlan,
        hdr: bool,
    ) -> Result<Vec<MatchResult>> {
        if hdr {
            let regions: Vec<_> = stage
                .regions()
                .iter()
                .map(|region| (region.block, &region.stats))
                .collect();
            matcher.match_ranked(&regions)
        } else {
            stage
                .regions()
                .iter()
                .map(|region| matcher.match_stats(region.block, &region.stats))
                .collect()
        }
    }

    /// Render one variant, labelling any error with the variant
    pub fn render_output(&self, variant: Variant) -> VariantOutput {
        let label = variant.label();
        let result = self.render(&variant).with_variant(&label);
        match &result {
            Ok(_) => debug!("Variant '{label}' rendered"),
            Err(e) => warn!("{e}"),
        }
        VariantOutput { variant, result }
    }

    /// Render every variant, reporting each one to `on_variant` as it finishes
    ///
    /// A failing variant is recorded with its error and the run moves on.
    pub fn run<F>(&self, mut on_variant: F) -> Vec<VariantOutput>
    where
        F: FnMut(usize, &VariantOutput),
    {
        let variants = self.variants();
        info!("Rendering {} variant(s)", variants.len());

        let mut outputs = Vec::with_capacity(variants.len());
        for (index, variant) in variants.into_iter().enumerate() {
            let output = self.render_output(variant);
            on_variant(index, &output);
            outputs.push(output);
        }
        outputs
    }
}
