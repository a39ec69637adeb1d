//! Tests for nearest-tile selection under exclusion

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::algorithm::selection::select_tile;
    use photomosaic::analysis::color::ColorVector;
    use photomosaic::spatial::{SpatialIndex, TileRecord};
    use std::collections::HashSet;

    fn palette_index() -> SpatialIndex {
        SpatialIndex::build(vec![
            TileRecord::new(ColorVector::new(0, 0, 0), "black.jpg"),
            TileRecord::new(ColorVector::new(255, 255, 255), "white.jpg"),
            TileRecord::new(ColorVector::new(128, 128, 128), "gray.jpg"),
        ])
    }

    // Tests an empty exclusion set picks the absolute nearest tile
    // Verified by skipping the first candidate
    #[test]
    fn test_no_exclusion_picks_nearest() {
        let index = palette_index();

        let chosen = select_tile(&index, ColorVector::new(10, 10, 10), &HashSet::new(), (0, 0));

        assert_eq!(chosen.ok().map(|r| r.filename.as_str()), Some("black.jpg"));
    }

    // Tests an excluded nearest tile falls back to the next candidate
    // Verified by ignoring the exclusion set
    #[test]
    fn test_excluded_nearest_falls_back() {
        let index = palette_index();
        let excluded = HashSet::from(["black.jpg"]);

        let chosen = select_tile(&index, ColorVector::new(10, 10, 10), &excluded, (1, 0));

        assert_eq!(chosen.ok().map(|r| r.filename.as_str()), Some("gray.jpg"));
    }

    // Tests exclusions that are far away do not displace the nearest tile
    // Verified by always taking the last candidate
    #[test]
    fn test_unrelated_exclusion_keeps_nearest() {
        let index = palette_index();
        let excluded = HashSet::from(["white.jpg"]);

        let chosen = select_tile(&index, ColorVector::new(10, 10, 10), &excluded, (0, 1));

        assert_eq!(chosen.ok().map(|r| r.filename.as_str()), Some("black.jpg"));
    }

    // Tests all candidates excluded reports the failing cell
    // Verified by returning the nearest excluded tile
    #[test]
    fn test_all_excluded_is_no_match() {
        let index = palette_index();
        let excluded = HashSet::from(["black.jpg", "white.jpg", "gray.jpg"]);

        let result = select_tile(&index, ColorVector::new(200, 200, 200), &excluded, (1, 1));

        assert!(matches!(
            result,
            Err(MosaicError::NoMatch {
                position: (1, 1),
                excluded: 3,
                candidates: 3,
            })
        ));
    }

    // Tests a single-tile corpus cannot satisfy an exclusion of that tile
    // Verified by reusing the excluded tile when the index is exhausted
    #[test]
    fn test_single_tile_corpus_no_match() {
        let index = SpatialIndex::build(vec![TileRecord::new(
            ColorVector::new(40, 40, 40),
            "only.jpg",
        )]);
        let excluded = HashSet::from(["only.jpg"]);

        let result = select_tile(&index, ColorVector::new(40, 40, 40), &excluded, (0, 1));

        assert!(matches!(
            result,
            Err(MosaicError::NoMatch {
                candidates: 1,
                ..
            })
        ));
    }

    // Tests duplicate tiles sharing an excluded color are passed over by name
    // Verified by excluding by color instead of filename
    #[test]
    fn test_duplicate_color_different_name_is_eligible() {
        let index = SpatialIndex::build(vec![
            TileRecord::new(ColorVector::new(0, 0, 0), "night.jpg"),
            TileRecord::new(ColorVector::new(0, 0, 0), "ink.jpg"),
        ]);
        let excluded = HashSet::from(["night.jpg"]);

        let chosen = select_tile(&index, ColorVector::new(0, 0, 0), &excluded, (0, 0));

        assert_eq!(chosen.ok().map(|r| r.filename.as_str()), Some("ink.jpg"));
    }
}
