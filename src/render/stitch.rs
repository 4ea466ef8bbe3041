//! Cropping page bitmaps and stitching the crops into one image.

use image::{imageops, Rgb, RgbImage};

use crate::model::CropRegion;

/// Pixel rows of a page bitmap selected by a crop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBand {
    pub y: u32,
    pub height: u32,
}

/// Map a crop region onto a bitmap of `bitmap_height` rows.
///
/// Returns `None` when the scaled region is degenerate
/// (`bottom * scale <= top * scale`) or empty once rounded to whole pixels
/// and clamped to the bitmap.
pub fn pixel_band(region: &CropRegion, bitmap_height: u32) -> Option<PixelBand> {
    if region.page_height <= 0.0 {
        return None;
    }
    let scale_y = bitmap_height as f32 / region.page_height;
    let top = region.top * scale_y;
    let bottom = region.bottom * scale_y;
    if bottom <= top {
        return None;
    }

    let max = bitmap_height as f32;
    let y0 = top.round().clamp(0.0, max) as u32;
    let y1 = bottom.round().clamp(0.0, max) as u32;
    if y1 <= y0 {
        return None;
    }
    Some(PixelBand {
        y: y0,
        height: y1 - y0,
    })
}

/// Cut a full-width band out of a page bitmap.
pub fn crop_band(page: &RgbImage, band: PixelBand) -> RgbImage {
    imageops::crop_imm(page, 0, band.y, page.width(), band.height).to_image()
}

/// Canvas size and paste offsets for a vertical stack of crops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchLayout {
    pub width: u32,
    pub height: u32,
    pub offsets: Vec<u32>,
}

impl StitchLayout {
    /// Lay out crops of the given `(width, height)` sizes top to bottom.
    pub fn plan(sizes: &[(u32, u32)]) -> Self {
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut height = 0;
        let mut width = 0;
        for &(w, h) in sizes {
            offsets.push(height);
            height += h;
            width = width.max(w);
        }
        Self {
            width,
            height,
            offsets,
        }
    }
}

/// Stack crops top to bottom, left-aligned, on a white canvas as wide as the
/// widest crop. Returns `None` for an empty list.
pub fn stitch_vertical(crops: &[RgbImage]) -> Option<RgbImage> {
    if crops.is_empty() {
        return None;
    }

    let sizes: Vec<(u32, u32)> = crops.iter().map(|c| c.dimensions()).collect();
    let layout = StitchLayout::plan(&sizes);
    if layout.width == 0 || layout.height == 0 {
        return None;
    }

    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, Rgb([255, 255, 255]));
    for (crop, &offset) in crops.iter().zip(&layout.offsets) {
        imageops::replace(&mut canvas, crop, 0, i64::from(offset));
    }
    Some(canvas)
}

/// Crop every usable region out of its page bitmap and stitch the results.
///
/// `pages` is indexed by page number. Regions that are degenerate or point at
/// a missing page are skipped. Returns `None` when no region survives.
pub fn compose_question_image(regions: &[CropRegion], pages: &[RgbImage]) -> Option<RgbImage> {
    let mut crops = Vec::with_capacity(regions.len());

    for region in regions {
        let Some(page) = pages.get(region.page) else {
            log::warn!("Crop region references missing page {}", region.page);
            continue;
        };
        match pixel_band(region, page.height()) {
            Some(band) => crops.push(crop_band(page, band)),
            None => log::debug!(
                "Skipping degenerate crop on page {} ({:.1}..{:.1}, height {:.1})",
                region.page,
                region.top,
                region.bottom,
                region.height()
            ),
        }
    }

    stitch_vertical(&crops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(page: usize, top: f32, bottom: f32) -> CropRegion {
        CropRegion {
            page,
            top,
            bottom,
            page_height: 100.0,
            page_width: 50.0,
        }
    }

    fn solid(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn test_pixel_band_scales() {
        // 100pt page rendered at 200px
        let band = pixel_band(&region(0, 10.0, 30.0), 200).unwrap();
        assert_eq!(band, PixelBand { y: 20, height: 40 });
    }

    #[test]
    fn test_pixel_band_degenerate() {
        assert_eq!(pixel_band(&region(0, 30.0, 30.0), 200), None);
        assert_eq!(pixel_band(&region(0, 30.0, 20.0), 200), None);
    }

    #[test]
    fn test_pixel_band_clamps_to_bitmap() {
        let band = pixel_band(&region(0, 90.0, 120.0), 200).unwrap();
        assert_eq!(band, PixelBand { y: 180, height: 20 });
        assert_eq!(pixel_band(&region(0, 110.0, 120.0), 200), None);
    }

    #[test]
    fn test_stitch_geometry() {
        let layout = StitchLayout::plan(&[(400, 100), (500, 150)]);
        assert_eq!(layout.width, 500);
        assert_eq!(layout.height, 250);
        assert_eq!(layout.offsets, vec![0, 100]);

        let stitched = stitch_vertical(&[solid(400, 100, 0), solid(500, 150, 128)]).unwrap();
        assert_eq!(stitched.dimensions(), (500, 250));
        assert_eq!(stitched.get_pixel(0, 0), &Rgb([0, 0, 0]));
        // right of the narrower first crop stays white
        assert_eq!(stitched.get_pixel(450, 50), &Rgb([255, 255, 255]));
        assert_eq!(stitched.get_pixel(0, 100), &Rgb([128, 128, 128]));
        assert_eq!(stitched.get_pixel(499, 249), &Rgb([128, 128, 128]));
    }

    #[test]
    fn test_stitch_empty() {
        assert!(stitch_vertical(&[]).is_none());
    }

    #[test]
    fn test_compose_drops_degenerate_regions() {
        let pages = vec![solid(100, 200, 10), solid(100, 200, 20)];
        let regions = vec![region(0, 10.0, 30.0), region(1, 50.0, 40.0)];

        let image = compose_question_image(&regions, &pages).unwrap();
        assert_eq!(image.dimensions(), (100, 40));
        assert_eq!(image.get_pixel(0, 39), &Rgb([10, 10, 10]));
    }

    #[test]
    fn test_compose_across_pages() {
        let pages = vec![solid(100, 200, 10), solid(100, 200, 20)];
        let regions = vec![region(0, 80.0, 100.0), region(1, 0.0, 10.0)];

        let image = compose_question_image(&regions, &pages).unwrap();
        assert_eq!(image.dimensions(), (100, 60));
        assert_eq!(image.get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(image.get_pixel(0, 40), &Rgb([20, 20, 20]));
    }

    #[test]
    fn test_compose_nothing_usable() {
        let pages = vec![solid(100, 200, 10)];
        assert!(compose_question_image(&[region(0, 20.0, 10.0)], &pages).is_none());
        assert!(compose_question_image(&[region(3, 0.0, 10.0)], &pages).is_none());
        assert!(compose_question_image(&[], &pages).is_none());
    }
}
