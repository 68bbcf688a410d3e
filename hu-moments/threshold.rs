use hu_core::ThresholdParams;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

/// Gaussian kernel of `size` taps, sigma derived from the size the same way
/// a Gaussian adaptive threshold does it (2.0 for 11 taps).
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    let half = (size / 2) as f64;
    let sigma = 0.3 * (half - 1.0) + 0.8;
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - half;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Binarize a region against its Gaussian-weighted local mean.
///
/// Output pixels are 255 where `pixel - round(mean) > -bias`, 0 elsewhere.
/// The region is thresholded in isolation: neighbourhoods that cross the
/// region border see replicated edge pixels.
pub fn binarize(region: &GrayImage, params: &ThresholdParams) -> GrayImage {
    let (w, h) = region.dimensions();
    if w == 0 || h == 0 {
        return GrayImage::new(w, h);
    }

    let kernel = gaussian_kernel(params.block_size);
    let levels: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(w, h, |x, y| Luma([region.get_pixel(x, y)[0] as f32]));
    let mean = separable_filter_equal(&levels, &kernel);
    let bias = params.bias as f32;

    ImageBuffer::from_fn(w, h, |x, y| {
        let local = mean.get_pixel(x, y)[0].round();
        let value = region.get_pixel(x, y)[0] as f32;
        if value - local > -bias {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
