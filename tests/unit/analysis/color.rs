//! Tests for region mean colors and block color grids

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use photomosaic::MosaicError;
    use photomosaic::analysis::color::{
        ColorVector, MosaicBlock, Region, block_colors, mean_color, mosaic_blocks,
    };

    fn two_tone(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            let [r, g, b] = if x < width / 2 { left } else { right };
            Rgba([r, g, b, 255])
        })
    }

    // Tests a uniform region averages to its own color
    // Verified by dividing by region width only
    #[test]
    fn test_mean_color_uniform_region() {
        let image = RgbaImage::from_pixel(6, 4, Rgba([12, 200, 99, 255]));

        let color = mean_color(&image, Region::whole(6, 4));

        assert_eq!(color.ok(), Some(ColorVector::new(12, 200, 99)));
    }

    // Tests channel means are truncated rather than rounded
    // Verified by switching to rounded division
    #[test]
    fn test_mean_color_truncates() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([1, 10, 255, 255]));
        image.put_pixel(1, 0, Rgba([2, 11, 254, 255]));

        let color = mean_color(&image, Region::whole(2, 1));

        assert_eq!(color.ok(), Some(ColorVector::new(1, 10, 254)));
    }

    // Tests alpha does not influence the mean
    // Verified by weighting channels by alpha
    #[test]
    fn test_mean_color_ignores_alpha() {
        let image = RgbaImage::from_pixel(3, 3, Rgba([90, 60, 30, 0]));

        let color = mean_color(&image, Region::whole(3, 3));

        assert_eq!(color.ok(), Some(ColorVector::new(90, 60, 30)));
    }

    // Tests only the requested region is sampled
    // Verified by sampling from the image origin
    #[test]
    fn test_mean_color_sub_region() {
        let image = two_tone(4, 2, [0, 0, 0], [100, 50, 20]);

        let color = mean_color(&image, Region::new(2, 0, 2, 2));

        assert_eq!(color.ok(), Some(ColorVector::new(100, 50, 20)));
    }

    // Tests regions past the image edge are rejected
    // Verified by removing the bounds check
    #[test]
    fn test_mean_color_out_of_bounds() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

        let result = mean_color(&image, Region::new(2, 2, 3, 2));

        assert!(matches!(
            result,
            Err(MosaicError::RegionOutOfBounds {
                region: (2, 2, 3, 2),
                image_dimensions: (4, 4),
            })
        ));
    }

    // Tests empty regions are rejected instead of dividing by zero
    // Verified by skipping the zero-size check
    #[test]
    fn test_mean_color_empty_region() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

        assert!(mean_color(&image, Region::new(0, 0, 0, 4)).is_err());
    }

    // Tests block grid is indexed [block_x, block_y] with per-block colors
    // Verified by transposing the output array
    #[test]
    fn test_block_colors_layout() {
        let image = two_tone(8, 4, [10, 20, 30], [200, 210, 220]);

        let Ok(colors) = block_colors(&image, 2) else {
            unreachable!("Block sampling should succeed");
        };

        assert_eq!(colors.dim(), (4, 2));
        assert_eq!(colors.get((0, 1)).copied(), Some(ColorVector::new(10, 20, 30)));
        assert_eq!(
            colors.get((3, 0)).copied(),
            Some(ColorVector::new(200, 210, 220))
        );
    }

    // Tests trailing pixels that do not fill a block are ignored
    // Verified by rounding grid dimensions up
    #[test]
    fn test_block_colors_ignores_partial_blocks() {
        let image = RgbaImage::from_pixel(7, 5, Rgba([5, 5, 5, 255]));

        let dims = block_colors(&image, 3).map(|colors| colors.dim());

        assert_eq!(dims.ok(), Some((2, 1)));
    }

    // Tests blocks are visited down each column before moving right
    // Verified by iterating rows first
    #[test]
    fn test_mosaic_blocks_column_major() {
        let image = two_tone(4, 4, [0, 0, 0], [90, 90, 90]);
        let Ok(colors) = block_colors(&image, 2) else {
            unreachable!("Block sampling should succeed");
        };

        let blocks: Vec<MosaicBlock> = mosaic_blocks(&colors).collect();

        let positions: Vec<(usize, usize)> = blocks.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(
            blocks.last().map(|b| b.color),
            Some(ColorVector::new(90, 90, 90))
        );
    }

    // Tests zero block size is rejected
    // Verified by removing the block size guard
    #[test]
    fn test_block_colors_zero_block_size() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

        assert!(matches!(
            block_colors(&image, 0),
            Err(MosaicError::InvalidParameter {
                parameter: "block_size",
                ..
            })
        ));
    }

    // Tests squared distance sums per-channel squared differences
    // Verified by dropping the blue channel term
    #[test]
    fn test_distance_squared() {
        let a = ColorVector::new(10, 20, 30);
        let b = ColorVector::new(13, 16, 30);

        assert_eq!(a.distance_squared(&b), 25);
        assert_eq!(b.distance_squared(&a), 25);
        assert_eq!(
            ColorVector::new(0, 0, 0).distance_squared(&ColorVector::new(255, 255, 255)),
            195_075
        );
    }

    // Tests float conversion accepts channel values and rejects anything else
    // Verified by clamping out-of-range values instead of rejecting
    #[test]
    fn test_from_f64_validation() {
        assert_eq!(
            ColorVector::from_f64(0.0, 127.6, 255.0),
            Some(ColorVector::new(0, 128, 255))
        );
        assert_eq!(ColorVector::from_f64(-1.0, 0.0, 0.0), None);
        assert_eq!(ColorVector::from_f64(0.0, 256.0, 0.0), None);
        assert_eq!(ColorVector::from_f64(0.0, 0.0, f64::NAN), None);
    }
}
