use image::GrayImage;

/// Spatial and central moments of a binary mask, up to third order.
///
/// Every non-zero mask pixel counts as 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,
}

impl RegionMoments {
    pub fn from_mask(mask: &GrayImage) -> Self {
        let mut m = RegionMoments::default();

        for (x, y, p) in mask.enumerate_pixels() {
            if p[0] != 0 {
                m.m00 += 1.0;
                m.m10 += x as f64;
                m.m01 += y as f64;
            }
        }

        let Some((cx, cy)) = m.centroid() else {
            return m;
        };

        for (x, y, p) in mask.enumerate_pixels() {
            if p[0] == 0 {
                continue;
            }
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dx2 = dx * dx;
            let dy2 = dy * dy;

            m.mu20 += dx2;
            m.mu11 += dx * dy;
            m.mu02 += dy2;
            m.mu30 += dx2 * dx;
            m.mu21 += dx2 * dy;
            m.mu12 += dx * dy2;
            m.mu03 += dy2 * dy;
        }

        m
    }

    /// Centroid, or `None` for an empty mask
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 <= 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }

    /// Scale-normalized central moments `nu_pq = mu_pq / m00^((p+q)/2 + 1)`.
    /// All zero when the mask is empty.
    pub fn normalized(&self) -> NormalizedMoments {
        if self.m00 <= 0.0 {
            return NormalizedMoments::default();
        }
        let s2 = 1.0 / (self.m00 * self.m00);
        let s3 = s2 / self.m00.sqrt();

        NormalizedMoments {
            nu20: self.mu20 * s2,
            nu11: self.mu11 * s2,
            nu02: self.mu02 * s2,
            nu30: self.mu30 * s3,
            nu21: self.mu21 * s3,
            nu12: self.mu12 * s3,
            nu03: self.mu03 * s3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedMoments {
    pub nu20: f64,
    pub nu11: f64,
    pub nu02: f64,
    pub nu30: f64,
    pub nu21: f64,
    pub nu12: f64,
    pub nu03: f64,
}

impl NormalizedMoments {
    /// The seven classical rotation-invariant combinations I1..I7
    pub fn hu_invariants(&self) -> [f64; 7] {
        let NormalizedMoments {
            nu20,
            nu11,
            nu02,
            nu30,
            nu21,
            nu12,
            nu03,
        } = *self;

        let sum2 = nu20 + nu02;
        let diff2 = nu20 - nu02;

        let a = nu30 + nu12;
        let b = nu21 + nu03;
        let a2 = a * a;
        let b2 = b * b;

        let c = nu30 - 3.0 * nu12;
        let d = 3.0 * nu21 - nu03;

        let ta = a * (a2 - 3.0 * b2);
        let tb = b * (3.0 * a2 - b2);

        [
            sum2,
            diff2 * diff2 + 4.0 * nu11 * nu11,
            c * c + d * d,
            a2 + b2,
            c * ta + d * tb,
            diff2 * (a2 - b2) + 4.0 * nu11 * a * b,
            d * ta - c * tb,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            if x >= x0 && x < x0 + rw && y >= y0 && y < y0 + rh {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    fn l_shape(w: u32, h: u32, ox: u32, oy: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let (x, y) = (x as i64 - ox as i64, y as i64 - oy as i64);
            let stem = (0..3).contains(&x) && (0..9).contains(&y);
            let foot = (0..6).contains(&x) && (6..9).contains(&y);
            if stem || foot {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_single_pixel() {
        let mask = rect_mask(5, 5, 2, 3, 1, 1);
        let m = RegionMoments::from_mask(&mask);
        assert_eq!(m.m00, 1.0);
        assert_eq!(m.centroid(), Some((2.0, 3.0)));
        assert_eq!(m.mu20, 0.0);
        assert_eq!(m.mu03, 0.0);
    }

    #[test]
    fn test_empty_mask_is_all_zero() {
        let mask = GrayImage::new(8, 8);
        let m = RegionMoments::from_mask(&mask);
        assert_eq!(m, RegionMoments::default());
        assert_eq!(m.centroid(), None);
        assert_eq!(m.normalized().hu_invariants(), [0.0; 7]);
    }

    #[test]
    fn test_filled_rectangle_first_invariant() {
        // For a full w x h block, I1 = ((w^2 - 1) + (h^2 - 1)) / (12 w h).
        let mask = rect_mask(20, 20, 0, 0, 20, 20);
        let hu = RegionMoments::from_mask(&mask).normalized().hu_invariants();
        assert!((hu[0] - 798.0 / 4800.0).abs() < 1e-12);
        for v in &hu[1..] {
            assert!(v.abs() < 1e-20);
        }
    }

    #[test]
    fn test_translation_invariance() {
        let a = RegionMoments::from_mask(&l_shape(20, 20, 1, 2)).normalized().hu_invariants();
        let b = RegionMoments::from_mask(&l_shape(30, 25, 17, 11)).normalized().hu_invariants();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() <= 1e-8 * x.abs() + 1e-18, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_rotation_invariance() {
        let mask = l_shape(16, 16, 4, 3);
        let rotated = image::imageops::rotate90(&mask);
        let a = RegionMoments::from_mask(&mask).normalized().hu_invariants();
        let b = RegionMoments::from_mask(&rotated).normalized().hu_invariants();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() <= 1e-8 * x.abs() + 1e-18, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_elongation_raises_second_invariant() {
        let square = RegionMoments::from_mask(&rect_mask(30, 30, 5, 5, 10, 10))
            .normalized()
            .hu_invariants();
        let bar = RegionMoments::from_mask(&rect_mask(30, 30, 5, 5, 20, 5))
            .normalized()
            .hu_invariants();
        assert!(bar[1] > square[1]);
        assert!(bar[0] > square[0]);
    }
}
