//! Raster steps between the rendered page and the output PDF.

use crate::options::StampOptions;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbImage, RgbaImage};

/// Keep the top `ratio` of the image at full width, at least one row tall
pub fn crop_top(image: &DynamicImage, ratio: f64) -> DynamicImage {
    let (width, height) = image.dimensions();
    let crop_height = ((f64::from(height) * ratio) as u32).clamp(1, height.max(1));
    image.crop_imm(0, 0, width, crop_height)
}

/// Offset along one axis, kept inside the base image where possible
fn offset(extent: u32, size: u32, ratio: f64) -> i64 {
    let wanted = (f64::from(extent) * ratio) as i64;
    wanted.min(i64::from(extent) - i64::from(size)).max(0)
}

/// Alpha-composite `stamp` onto `base`, scaled and placed per `options`
pub fn paste_stamp(
    base: &DynamicImage,
    stamp: &DynamicImage,
    options: &StampOptions,
) -> RgbaImage {
    let mut base = base.to_rgba8();
    let (base_w, base_h) = base.dimensions();
    if stamp.width() == 0 || stamp.height() == 0 {
        return base;
    }

    let target_w = ((f64::from(base_w) * options.stamp_w_ratio) as u32).max(1);
    let scale = f64::from(target_w) / f64::from(stamp.width());
    let target_h = ((f64::from(stamp.height()) * scale) as u32).max(1);

    let mut resized =
        imageops::resize(&stamp.to_rgba8(), target_w, target_h, FilterType::Lanczos3);
    if options.stamp_opacity < 1.0 {
        for pixel in resized.pixels_mut() {
            pixel[3] = (f64::from(pixel[3]) * options.stamp_opacity) as u8;
        }
    }

    let x = offset(base_w, target_w, options.stamp_x_ratio);
    let y = offset(base_h, target_h, options.stamp_y_ratio);
    imageops::overlay(&mut base, &resized, x, y);
    base
}

/// Composite onto an opaque white background
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, image, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Crop a rendered page and stamp it when a stamp is given
pub fn compose_page(
    page: &DynamicImage,
    stamp: Option<&DynamicImage>,
    options: &StampOptions,
) -> RgbImage {
    let cropped = crop_top(page, options.top_ratio);
    let stamped = match stamp {
        Some(stamp) => paste_stamp(&cropped, stamp, options),
        None => cropped.to_rgba8(),
    };
    flatten_on_white(&stamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_crop_top_dimensions() {
        let page = solid(100, 200, [0, 0, 0, 255]);
        assert_eq!(crop_top(&page, 0.42).dimensions(), (100, 84));
        assert_eq!(crop_top(&page, 0.001).dimensions(), (100, 1));
        assert_eq!(crop_top(&page, 2.0).dimensions(), (100, 200));
    }

    #[test]
    fn test_offset_clamps_inside_base() {
        assert_eq!(offset(100, 15, 0.75), 75);
        assert_eq!(offset(100, 40, 0.75), 60);
        assert_eq!(offset(100, 150, 0.5), 0);
        assert_eq!(offset(100, 10, -0.2), 0);
    }

    #[test]
    fn test_paste_stamp_places_scaled_stamp() {
        let base = solid(200, 100, [255, 255, 255, 255]);
        let stamp = solid(10, 5, [255, 0, 0, 255]);
        let options = StampOptions::default();

        let out = paste_stamp(&base, &stamp, &options);
        assert_eq!(out.dimensions(), (200, 100));
        // stamp is 30x15 at (150, 60)
        assert_eq!(out.get_pixel(160, 65), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(149, 65), &Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(160, 59), &Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(160, 76), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_transparent_stamp_leaves_base() {
        let base = solid(100, 100, [0, 0, 255, 255]);
        let stamp = solid(10, 10, [255, 0, 0, 255]);
        let options = StampOptions {
            stamp_opacity: 0.0,
            ..StampOptions::default()
        };
        let out = paste_stamp(&base, &stamp, &options);
        assert_eq!(out.get_pixel(80, 65), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_flatten_on_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let flat = flatten_on_white(&image);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_compose_page_without_stamp_only_crops() {
        let page = solid(50, 100, [0, 255, 0, 255]);
        let out = compose_page(&page, None, &StampOptions::default());
        assert_eq!(out.dimensions(), (50, 42));
        assert_eq!(out.get_pixel(40, 30), &Rgb([0, 255, 0]));
    }
}
