//! Tests for rebuild configuration, variant enumeration and rendering

#[cfg(test)]
mod tests {
    use blockmosaic::RebuildError;
    use blockmosaic::algorithm::executor::{RebuildConfig, Rebuilder, Variant};
    use blockmosaic::analysis::types::{CompositeType, expand_types};
    use image::{Rgb, RgbImage};

    fn tiled_source() -> RgbImage {
        RgbImage::from_fn(512, 512, |x, y| {
            let (tx, ty) = (x / 32, y / 32);
            Rgb([(tx * 16) as u8, (ty * 16) as u8, ((tx + ty) * 8) as u8])
        })
    }

    fn config(types: &str) -> RebuildConfig {
        RebuildConfig {
            types: expand_types(types, false),
            ..RebuildConfig::default()
        }
    }

    // Tests defaults cover every type with the standard block size and thresholds
    // Verified by defaulting to detail mode
    #[test]
    fn test_default_config() {
        let config = RebuildConfig::default();
        assert_eq!(config.block_size, 30);
        assert_eq!(config.types.len(), 127);
        assert_eq!((config.medium_threshold, config.small_threshold), (5, 8));
        assert!(!config.detail && !config.non_uniform);
        assert!(!config.include_rotations && !config.include_reflections);
    }

    // Tests every type yields a base and an hdr variant with or without detail
    // Verified by emitting hdr variants only in detail mode
    #[test]
    fn test_variant_counts() {
        let dest = RgbImage::from_pixel(16, 16, Rgb([1, 2, 3]));
        let plain = Rebuilder::new(tiled_source(), dest.clone(), RebuildConfig::default()).unwrap();
        assert_eq!(plain.variants().len(), 254);

        let detail = Rebuilder::new(
            tiled_source(),
            dest,
            RebuildConfig {
                detail: true,
                ..RebuildConfig::default()
            },
        )
        .unwrap();
        let variants = detail.variants();
        assert_eq!(variants.len(), 254);
        let labels: Vec<String> = variants.iter().take(2).map(Variant::label).collect();
        assert_eq!(labels, vec!["l", "l_hdr"]);
    }

    // Tests labels and per-variant seeds
    // Verified by seeding every variant with the base seed
    #[test]
    fn test_variant_label_and_seed() {
        let base = Variant {
            composite: CompositeType::parse("lg").unwrap(),
            hdr: false,
        };
        let hdr = Variant {
            hdr: true,
            ..base.clone()
        };
        assert_eq!(base.label(), "lg");
        assert_eq!(hdr.to_string(), "lg_hdr");
        assert_eq!(base.seed(4), base.seed(4));
        assert_ne!(base.seed(4), hdr.seed(4));
        assert_ne!(base.seed(4), base.seed(5));
    }

    // Tests every invalid input is rejected before rendering
    // Verified by deferring the source dimension check to render
    #[test]
    fn test_new_validation() {
        let dest = RgbImage::from_pixel(16, 16, Rgb([1, 2, 3]));

        let wrong_source = Rebuilder::new(RgbImage::new(256, 256), dest.clone(), config("l"));
        assert!(matches!(
            wrong_source,
            Err(RebuildError::InvalidSourceDimensions { .. })
        ));

        let bad_threshold = RebuildConfig {
            detail: true,
            medium_threshold: 0,
            ..config("l")
        };
        assert!(matches!(
            Rebuilder::new(tiled_source(), dest.clone(), bad_threshold),
            Err(RebuildError::ThresholdOutOfRange { .. })
        ));

        let no_types = RebuildConfig {
            types: Vec::new(),
            ..config("l")
        };
        assert!(Rebuilder::new(tiled_source(), dest, no_types).is_err());

        assert!(Rebuilder::new(tiled_source(), RgbImage::new(0, 10), config("l")).is_err());
    }

    // Tests thresholds are only checked in detail mode
    // Verified by validating thresholds unconditionally
    #[test]
    fn test_thresholds_ignored_without_detail() {
        let lenient = RebuildConfig {
            medium_threshold: 0,
            small_threshold: 42,
            ..config("l")
        };
        assert!(lenient.thresholds().unwrap().is_none());
        let dest = RgbImage::from_pixel(16, 16, Rgb([1, 2, 3]));
        assert!(Rebuilder::new(tiled_source(), dest, lenient).is_ok());
    }

    // Tests the requested size is corrected before partitioning
    // Verified by partitioning with the requested size
    #[test]
    fn test_block_size_corrected() {
        let dest = RgbImage::from_pixel(62, 62, Rgb([1, 2, 3]));
        let rebuilder = Rebuilder::new(
            tiled_source(),
            dest,
            RebuildConfig {
                block_size: 31,
                ..config("l")
            },
        )
        .unwrap();
        assert_eq!(rebuilder.block_size(), 30);
        assert_eq!(rebuilder.plan().region_count(), 9);
    }

    // Tests a flat destination equal to a source tile color rebuilds to that color
    // Verified by matching against the last tile on ties
    #[test]
    fn test_render_flat_destination() {
        let color = Rgb([48, 80, 64]);
        let dest = RgbImage::from_pixel(60, 60, color);
        let rebuilder = Rebuilder::new(tiled_source(), dest, config("rgb")).unwrap();

        let variant = Variant {
            composite: CompositeType::parse("rgb").unwrap(),
            hdr: false,
        };
        let output = rebuilder.render(&variant).unwrap();
        assert_eq!(output.dimensions(), (60, 60));
        assert!(output.pixels().all(|p| *p == color));
    }

    // Tests color-only output reproduces block means
    // Verified by filling color-only blocks from source tiles
    #[test]
    fn test_render_color_only() {
        let dest = RgbImage::from_fn(60, 30, |x, _| {
            if x < 30 {
                Rgb([10, 20, 30])
            } else {
                Rgb([200, 100, 0])
            }
        });
        let rebuilder = Rebuilder::new(
            tiled_source(),
            dest.clone(),
            RebuildConfig {
                types: expand_types("", true),
                ..RebuildConfig::default()
            },
        )
        .unwrap();

        let variants = rebuilder.variants();
        assert_eq!(variants.len(), 2);
        let output = rebuilder.render(variants.first().unwrap()).unwrap();
        assert_eq!(output, dest);
    }

    // Tests run renders every variant in order and reports each to the callback
    // Verified by skipping the callback for hdr variants
    #[test]
    fn test_run_reports_every_variant() {
        let dest = RgbImage::from_fn(40, 40, |x, y| Rgb([(x * 6) as u8, (y * 6) as u8, 0]));
        let rebuilder = Rebuilder::new(
            tiled_source(),
            dest,
            RebuildConfig {
                detail: true,
                ..config("lg")
            },
        )
        .unwrap();

        let mut seen = Vec::new();
        let outputs = rebuilder.run(|index, output| seen.push((index, output.variant.label())));
        assert_eq!(outputs.len(), 6);
        assert!(outputs.iter().all(|o| o.result.is_ok()));
        let labels: Vec<&str> = seen.iter().map(|(_, label)| label.as_str()).collect();
        assert_eq!(labels, vec!["l", "l_hdr", "g", "g_hdr", "lg", "lg_hdr"]);
        assert_eq!(seen.last().map(|(index, _)| *index), Some(5));
    }

    // Tests identical configurations render identical images
    // Verified by seeding orientation from entropy
    #[test]
    fn test_render_deterministic_with_transforms() {
        let dest = RgbImage::from_fn(50, 50, |x, y| Rgb([(x * 5) as u8, (y * 5) as u8, 90]));
        let make = || {
            Rebuilder::new(
                tiled_source(),
                dest.clone(),
                RebuildConfig {
                    non_uniform: true,
                    include_rotations: true,
                    include_reflections: true,
                    seed: 99,
                    ..config("lh")
                },
            )
            .unwrap()
        };
        let variant = Variant {
            composite: CompositeType::parse("lh").unwrap(),
            hdr: false,
        };
        assert_eq!(
            make().render(&variant).unwrap(),
            make().render(&variant).unwrap()
        );
    }
}
