use hu_cli::{present, ShapeLocator};
use hu_search::{CancelToken, Resampler, SearchBuilder, SearchConfig};
use image::{DynamicImage, GrayImage, Luma};
use std::time::Instant;

/// Person-like silhouette on a dark background
fn person(size: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let (x, y) = (x * 20 / size, y * 20 / size);
        let head = (8..13).contains(&x) && (2..7).contains(&y);
        let torso = (5..14).contains(&x) && (8..17).contains(&y);
        let arm = (14..17).contains(&x) && (8..12).contains(&y);
        Luma([if head || torso || arm { 235 } else { 15 }])
    })
}

/// Textured crowd stand-in with the person pasted at `origin`, `grow` times larger
fn scene(width: u32, height: u32, reference: &GrayImage, origin: (u32, u32), grow: f64) -> GrayImage {
    let mut img = GrayImage::from_fn(width, height, |x, y| {
        Luma([(((x * 37 + y * 91 + x * y * 13) % 97) % 61) as u8])
    });
    let patch = Resampler::scale_image(reference, grow);
    for (x, y, p) in patch.enumerate_pixels() {
        img.put_pixel(origin.0 + x, origin.1 + y, *p);
    }
    img
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Hu moment shape localization demo");
    println!("=================================\n");

    let reference = person(40);
    let crowd = scene(240, 180, &reference, (130, 70), 1.1);
    println!("Reference {}x{}, scene {}x{}", reference.width(), reference.height(), crowd.width(), crowd.height());

    let runs = [
        ("simple", SearchBuilder::new().preset_simple().grid_step(2)),
        ("multi_scale", SearchBuilder::new().preset_multi_scale()),
        ("exact_footprint", SearchBuilder::new().preset_original().reference_scale(1.0)),
    ];

    for (name, builder) in runs {
        println!("\n--- {} ---", name);
        println!("{}", builder.summary());
        let locator = ShapeLocator::from_builder(builder)?;

        let t0 = Instant::now();
        let result = locator.locate_images(&reference, &crowd)?;
        println!("Time taken: {:.2?}", t0.elapsed());
        println!("Evaluated {} candidates", result.candidates_evaluated);

        match (result.best_region, result.center()) {
            (Some(region), Some((cx, cy))) => {
                println!(
                    "Best: distance = {:.4}, scale = {:?}, region = {}x{} at ({}, {}), center = ({}, {})",
                    result.best_distance,
                    result.best_scale,
                    region.width,
                    region.height,
                    region.x,
                    region.y,
                    cx,
                    cy
                );
            }
            _ => println!("No candidates"),
        }

        let color = DynamicImage::ImageLuma8(crowd.clone()).into_rgb8();
        let out = std::env::temp_dir().join(format!("hu_demo_{}.png", name));
        present::save_rendered(&color, &result, None, &out)?;
        println!("Saved {}", out.display());
    }

    // A cancelled search reports that it is incomplete instead of a best-so-far.
    let token = CancelToken::new();
    token.cancel();
    let locator = ShapeLocator::new(SearchConfig::multi_scale_preset())?;
    match locator.locate_images_with_cancel(&reference, &crowd, &token) {
        Ok(_) => println!("\nSearch completed before cancellation"),
        Err(e) => println!("\n{}", e),
    }

    Ok(())
}
