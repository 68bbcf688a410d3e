use hu_core::{MatchResult, Rect};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use std::path::Path;

/// Default display box the annotated scene is shrunk into
pub const SCREEN_SIZE: (u32, u32) = (1366, 768);

const RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const RECT_THICKNESS: i32 = 2;
const CENTER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTER_RADIUS: i32 = 10;
const CENTER_THICKNESS: i32 = 3;

/// Outline the matched region and mark its centre.
///
/// The 2 px outline starts on the region's border pixels and grows
/// outward, so the region interior is never covered. A stroke centred
/// on the border would eat one pixel into the match.
pub fn draw_match(canvas: &mut RgbImage, region: Rect) {
    for i in 0..RECT_THICKNESS {
        let outline = imageproc::rect::Rect::at(region.x as i32 - i, region.y as i32 - i)
            .of_size(region.width.max(1) + 2 * i as u32, region.height.max(1) + 2 * i as u32);
        draw_hollow_rect_mut(canvas, outline, RECT_COLOR);
    }

    let (cx, cy) = region.center();
    let half = CENTER_THICKNESS / 2;
    for radius in CENTER_RADIUS - half..=CENTER_RADIUS + half {
        draw_hollow_circle_mut(canvas, (cx as i32, cy as i32), radius, CENTER_COLOR);
    }
}

/// Shrink `img` to fit a `max_w x max_h` box, keeping the aspect ratio.
/// Images that already fit are returned unchanged.
pub fn fit_within(img: &RgbImage, max_w: u32, max_h: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let factor = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    if factor >= 1.0 {
        return img.clone();
    }
    let nw = ((w as f64 * factor).round() as u32).max(1);
    let nh = ((h as f64 * factor).round() as u32).max(1);
    imageops::resize(img, nw, nh, imageops::FilterType::Triangle)
}

/// Annotated copy of `scene`, or a plain copy when nothing was found
pub fn render(scene: &RgbImage, result: &MatchResult, fit: Option<(u32, u32)>) -> RgbImage {
    let mut canvas = scene.clone();
    if let Some(region) = result.best_region {
        draw_match(&mut canvas, region);
    }
    match fit {
        Some((w, h)) => fit_within(&canvas, w, h),
        None => canvas,
    }
}

/// Render and write to `path`; the format follows the extension
pub fn save_rendered<P: AsRef<Path>>(
    scene: &RgbImage,
    result: &MatchResult,
    fit: Option<(u32, u32)>,
    path: P,
) -> image::ImageResult<()> {
    render(scene, result, fit).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn test_draw_match_outline_and_center() {
        let mut canvas = RgbImage::from_pixel(100, 80, BLACK);
        draw_match(&mut canvas, Rect::new(20, 10, 40, 50));

        assert_eq!(*canvas.get_pixel(20, 30), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(19, 30), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(59, 30), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(40, 10), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(18, 30), BLACK);

        // Centre (40, 35), ring radii 9..=11.
        assert_eq!(*canvas.get_pixel(40, 25), CENTER_COLOR);
        assert_eq!(*canvas.get_pixel(50, 35), CENTER_COLOR);
        assert_eq!(*canvas.get_pixel(40, 35), BLACK);
        assert_eq!(*canvas.get_pixel(25, 30), BLACK);
    }

    #[test]
    fn test_outline_grows_outward_only() {
        let mut canvas = RgbImage::from_pixel(100, 80, BLACK);
        let region = Rect::new(20, 10, 40, 50);
        draw_match(&mut canvas, region);

        // Border pixel and the ring just outside it.
        assert_eq!(*canvas.get_pixel(20, 40), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(19, 40), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(59, 40), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(60, 40), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(40, 59), RECT_COLOR);
        assert_eq!(*canvas.get_pixel(40, 60), RECT_COLOR);
        // First interior pixel on each side stays untouched.
        assert_eq!(*canvas.get_pixel(21, 40), BLACK);
        assert_eq!(*canvas.get_pixel(58, 40), BLACK);
        assert_eq!(*canvas.get_pixel(40, 11), BLACK);
        assert_eq!(*canvas.get_pixel(40, 58), BLACK);
    }

    #[test]
    fn test_draw_match_clips_at_border() {
        let mut canvas = RgbImage::from_pixel(30, 30, BLACK);
        draw_match(&mut canvas, Rect::new(0, 0, 8, 8));
        assert_eq!(*canvas.get_pixel(0, 5), RECT_COLOR);
    }

    #[test]
    fn test_fit_within_shrinks_keeping_aspect() {
        let img = RgbImage::new(600, 300);
        assert_eq!(fit_within(&img, 300, 200).dimensions(), (300, 150));

        let wide = RgbImage::new(1000, 100);
        let (w, h) = fit_within(&wide, 300, 200).dimensions();
        assert_eq!(w, 300);
        assert_eq!(h, 30);
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let img = RgbImage::new(100, 50);
        assert_eq!(fit_within(&img, SCREEN_SIZE.0, SCREEN_SIZE.1).dimensions(), (100, 50));
    }

    #[test]
    fn test_render_without_match_is_plain_copy() {
        let scene = RgbImage::from_pixel(20, 20, Rgb([9, 9, 9]));
        let out = render(&scene, &MatchResult::no_candidates(), None);
        assert_eq!(out, scene);
    }

    #[test]
    fn test_render_fits_to_box() {
        let scene = RgbImage::from_pixel(400, 200, BLACK);
        let result = MatchResult {
            best_region: Some(Rect::new(100, 50, 40, 60)),
            best_distance: 0.5,
            best_scale: Some(1.0),
            candidates_evaluated: 1,
        };
        assert_eq!(render(&scene, &result, Some((200, 200))).dimensions(), (200, 100));
    }
}
