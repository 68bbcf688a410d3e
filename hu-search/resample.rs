use hu_core::Rect;
use image::{imageops, GrayImage, Luma};

/// Bilinear resampling of scene windows and whole images
pub struct Resampler;

impl Resampler {
    /// Resample the `src` window of `img` to `width x height`.
    ///
    /// Same-size requests return an exact copy of the window. `src` must lie
    /// inside `img`.
    pub fn resample_region(img: &GrayImage, src: Rect, width: u32, height: u32) -> GrayImage {
        if src.width == width && src.height == height {
            return imageops::crop_imm(img, src.x, src.y, width, height).to_image();
        }
        if src.width == 0 || src.height == 0 {
            return GrayImage::new(width, height);
        }

        let x_ratio = src.width as f32 / width as f32;
        let y_ratio = src.height as f32 / height as f32;

        GrayImage::from_fn(width, height, |x, y| {
            let sx = ((x as f32 + 0.5) * x_ratio - 0.5).clamp(0.0, (src.width - 1) as f32);
            let sy = ((y as f32 + 0.5) * y_ratio - 0.5).clamp(0.0, (src.height - 1) as f32);
            let value = Self::bilinear_sample(img, src, sx, sy);
            Luma([value.round().clamp(0.0, 255.0) as u8])
        })
    }

    /// Scale a whole image by `factor`, rounding the target size
    pub fn scale_image(img: &GrayImage, factor: f64) -> GrayImage {
        let (w, h) = img.dimensions();
        let tw = scaled_length(w, factor).unwrap_or(0);
        let th = scaled_length(h, factor).unwrap_or(0);
        Self::resample_region(img, Rect::new(0, 0, w, h), tw, th)
    }

    /// Sample the `src` window at fractional window coordinates
    fn bilinear_sample(img: &GrayImage, src: Rect, x: f32, y: f32) -> f32 {
        let x1 = x.floor() as u32;
        let y1 = y.floor() as u32;
        let x2 = (x1 + 1).min(src.width - 1);
        let y2 = (y1 + 1).min(src.height - 1);

        let fx = x - x1 as f32;
        let fy = y - y1 as f32;

        let at = |px: u32, py: u32| img.get_pixel(src.x + px, src.y + py)[0] as f32;
        let p11 = at(x1, y1);
        let p12 = at(x2, y1);
        let p21 = at(x1, y2);
        let p22 = at(x2, y2);

        let top = p11 * (1.0 - fx) + p12 * fx;
        let bottom = p21 * (1.0 - fx) + p22 * fx;

        top * (1.0 - fy) + bottom * fy
    }
}

/// `round(len * factor)`, or `None` when the result does not fit a `u32`
pub fn scaled_length(len: u32, factor: f64) -> Option<u32> {
    let v = (len as f64 * factor).round();
    if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}
