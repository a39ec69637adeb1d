//! Tests for run configuration defaults and validation

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::io::configuration::{
        AssemblySettings, CacheValidation, CorpusPolicy, CorpusSettings, DEFAULT_BLOCK_SIZE,
        DEFAULT_EXCLUSION_RADIUS, DEFAULT_TILE_SIZE, MosaicConfig,
    };
    use std::path::PathBuf;

    fn config() -> MosaicConfig {
        MosaicConfig {
            target_path: PathBuf::from("target.png"),
            output_path: PathBuf::from("out.png"),
            corpus: CorpusSettings {
                source_dir: PathBuf::from("tiles"),
                converted_dir: PathBuf::from("converted"),
                cache_path: PathBuf::from("tiles.bin"),
                tile_size: DEFAULT_TILE_SIZE,
                resize_and_persist: false,
                cache_validation: CacheValidation::default(),
                policy: CorpusPolicy::default(),
            },
            assembly: AssemblySettings::default(),
            index_only: false,
            threads: None,
        }
    }

    fn rejected_parameter(config: &MosaicConfig) -> Option<&'static str> {
        match config.validate() {
            Err(MosaicError::InvalidParameter { parameter, .. }) => Some(parameter),
            _ => None,
        }
    }

    // Tests the defaults match the documented tool defaults
    // Verified by changing a default constant
    #[test]
    fn test_defaults() {
        let settings = AssemblySettings::default();

        assert_eq!(settings.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(settings.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(settings.exclusion_radius, DEFAULT_EXCLUSION_RADIUS);
        assert_eq!(settings.target_dimensions, None);
        assert_eq!(CacheValidation::default(), CacheValidation::Trust);
        assert_eq!(CorpusPolicy::default(), CorpusPolicy::FailFast);
        assert!(config().validate().is_ok());
    }

    // Tests zero sizes are rejected with the offending parameter
    // Verified by removing the block size check
    #[test]
    fn test_zero_sizes_rejected() {
        let mut zero_block = config();
        zero_block.assembly.block_size = 0;
        assert_eq!(rejected_parameter(&zero_block), Some("block_size"));

        let mut zero_tile = config();
        zero_tile.assembly.tile_size = 0;
        zero_tile.corpus.tile_size = 0;
        assert_eq!(rejected_parameter(&zero_tile), Some("tile_size"));
    }

    // Tests target dimensions must hold at least one block
    // Verified by allowing a zero-sized grid
    #[test]
    fn test_target_dimensions_rejected() {
        let mut settings = AssemblySettings {
            block_size: 10,
            target_dimensions: Some((9, 40)),
            ..AssemblySettings::default()
        };
        assert!(settings.validate().is_err());

        settings.target_dimensions = Some((10, 10));
        assert!(settings.validate().is_ok());
    }

    // Tests the corpus and assembly tile sizes must agree
    // Verified by skipping the cross-check
    #[test]
    fn test_mismatched_tile_sizes() {
        let mut config = config();
        config.corpus.tile_size = DEFAULT_TILE_SIZE + 1;

        assert_eq!(rejected_parameter(&config), Some("tile_size"));
    }

    // Tests a zero worker count is rejected while unset is allowed
    // Verified by treating zero as the default pool
    #[test]
    fn test_thread_count() {
        let mut config = config();
        config.threads = Some(0);
        assert_eq!(rejected_parameter(&config), Some("threads"));

        config.threads = Some(3);
        assert!(config.validate().is_ok());
    }

    // Tests radius zero is a valid setting
    // Verified by requiring a positive radius
    #[test]
    fn test_zero_radius_is_valid() {
        let mut config = config();
        config.assembly.exclusion_radius = 0;

        assert!(config.validate().is_ok());
    }
}
