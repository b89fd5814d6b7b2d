// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout: decides each page's size and where its image is drawn.
//
// Fixed paper: every page has the paper size; the image is shrunk (never
// enlarged) to fit inside the margins and centred. Fit to content: the page
// is the image's millimetre size plus the margin on all four sides.

use leafpress_core::error::{LeafpressError, Result};
use leafpress_core::{PageSpec, Placement, SizingPolicy, px_to_mm};
use tracing::{debug, instrument};

/// Page size and image placement for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlan {
    pub page: PageSpec,
    pub placement: Placement,
    /// Factor applied to the image's 96 DPI millimetre size; at most 1.
    pub scale: f64,
}

/// A validated sizing policy that lays out one image at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    policy: SizingPolicy,
}

impl PageLayout {
    /// Validate `policy`. The margin must be positive, and under fixed paper
    /// it must leave a non-empty box inside the page.
    pub fn new(policy: SizingPolicy) -> Result<Self> {
        let margin = policy.margin_mm();
        if !margin.is_finite() || margin <= 0.0 {
            return Err(LeafpressError::Validation(format!(
                "margin must be a positive number of millimetres, got {margin}"
            )));
        }
        if let Some(page) = policy.fixed_page() {
            if page.width_mm - 2.0 * margin <= 0.0 || page.height_mm - 2.0 * margin <= 0.0 {
                return Err(LeafpressError::Validation(format!(
                    "a {margin} mm margin leaves no room on a {} x {} mm page",
                    page.width_mm, page.height_mm
                )));
            }
        }
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &SizingPolicy {
        &self.policy
    }

    /// Lay out an image of `pixel_width` x `pixel_height`.
    pub fn place(&self, pixel_width: u32, pixel_height: u32) -> PagePlan {
        let img_w = px_to_mm(pixel_width);
        let img_h = px_to_mm(pixel_height);
        let margin = self.policy.margin_mm();

        let Some(page) = self.policy.fixed_page() else {
            return PagePlan {
                page: PageSpec::new(img_w + 2.0 * margin, img_h + 2.0 * margin),
                placement: Placement {
                    x_mm: margin,
                    y_mm: margin,
                    width_mm: img_w,
                    height_mm: img_h,
                },
                scale: 1.0,
            };
        };

        let max_w = page.width_mm - 2.0 * margin;
        let max_h = page.height_mm - 2.0 * margin;
        // Division by a zero-sized side yields infinity, which `min` ignores.
        let scale = 1.0_f64.min(max_w / img_w).min(max_h / img_h);
        let final_w = img_w * scale;
        let final_h = img_h * scale;

        PagePlan {
            page,
            placement: Placement {
                x_mm: (page.width_mm - final_w) / 2.0,
                y_mm: (page.height_mm - final_h) / 2.0,
                width_mm: final_w,
                height_mm: final_h,
            },
            scale,
        }
    }
}

/// Lay out every image in order, one page each.
///
/// `items` yields pixel dimensions, e.g.
/// `rasters.iter().map(NormalizedRaster::dimensions)`.
#[instrument(skip(items))]
pub fn layout<I>(items: I, policy: SizingPolicy) -> Result<Vec<PagePlan>>
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Err(LeafpressError::EmptyInput);
    }
    let engine = PageLayout::new(policy)?;
    let plans: Vec<PagePlan> = items.map(|(w, h)| engine.place(w, h)).collect();
    debug!(pages = plans.len(), "Layout complete");
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafpress_core::{Orientation, PaperSize};

    const EPS: f64 = 1e-6;

    fn a4(orientation: Orientation, margin_mm: f64) -> SizingPolicy {
        SizingPolicy::FixedPaper {
            paper: PaperSize::A4,
            orientation,
            margin_mm,
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn large_photo_on_a4_portrait() {
        let plans = layout([(1600, 1200)], a4(Orientation::Portrait, 10.0)).unwrap();
        let plan = plans[0];
        assert_eq!(plan.page, PageSpec::new(210.0, 297.0));
        assert_close(plan.scale, 190.0 / (1600.0 * 25.4 / 96.0), EPS);
        assert_close(plan.scale, 0.4488, 1e-4);
        assert_close(plan.placement.width_mm, 190.0, EPS);
        assert_close(plan.placement.height_mm, 142.5, EPS);
        assert_close(plan.placement.x_mm, 10.0, EPS);
        assert_close(plan.placement.y_mm, (297.0 - 142.5) / 2.0, EPS);
    }

    #[test]
    fn fit_to_content_wraps_image_in_margin() {
        let plans = layout([(800, 600)], SizingPolicy::FitToContent { margin_mm: 5.0 }).unwrap();
        let plan = plans[0];
        let img_w = px_to_mm(800);
        let img_h = px_to_mm(600);
        assert_eq!(plan.page, PageSpec::new(img_w + 10.0, img_h + 10.0));
        assert_close(plan.page.width_mm, 221.67, 0.01);
        assert_close(plan.page.height_mm, 168.75, EPS);
        assert_eq!(
            plan.placement,
            Placement {
                x_mm: 5.0,
                y_mm: 5.0,
                width_mm: img_w,
                height_mm: img_h,
            }
        );
        assert_eq!(plan.scale, 1.0);
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let plan = PageLayout::new(a4(Orientation::Portrait, 10.0))
            .unwrap()
            .place(200, 100);
        assert_eq!(plan.scale, 1.0);
        assert_close(plan.placement.width_mm, 200.0 * 25.4 / 96.0, EPS);
        assert_close(plan.placement.x_mm + plan.placement.width_mm / 2.0, 105.0, EPS);
        assert_close(plan.placement.y_mm + plan.placement.height_mm / 2.0, 148.5, EPS);
    }

    #[test]
    fn landscape_letter_uses_swapped_axes() {
        let policy = SizingPolicy::FixedPaper {
            paper: PaperSize::Letter,
            orientation: Orientation::Landscape,
            margin_mm: 10.0,
        };
        let plan = layout([(3000, 3000)], policy).unwrap()[0];
        assert_eq!(plan.page, PageSpec::new(279.0, 216.0));
        // Square image is limited by the shorter (vertical) side.
        assert_close(plan.placement.height_mm, 196.0, EPS);
        assert_close(plan.placement.width_mm, 196.0, EPS);
        assert_close(plan.placement.y_mm, 10.0, EPS);
    }

    #[test]
    fn fixed_paper_placements_stay_inside_margins() {
        let sizes = [
            (1, 1),
            (96, 96),
            (1600, 1200),
            (1200, 1600),
            (10_000, 50),
            (50, 10_000),
            (794, 1123),
        ];
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let margin = 12.5;
            let policy = a4(orientation, margin);
            let page = policy.fixed_page().unwrap();
            for plan in layout(sizes, policy).unwrap() {
                let p = plan.placement;
                assert!(plan.scale <= 1.0);
                assert!(p.x_mm >= margin - EPS && p.y_mm >= margin - EPS);
                assert!(p.x_mm + p.width_mm <= page.width_mm - margin + EPS);
                assert!(p.y_mm + p.height_mm <= page.height_mm - margin + EPS);
                assert!(p.fits_within(&plan.page, EPS));
            }
        }
    }

    #[test]
    fn output_matches_input_order_and_length() {
        let sizes = vec![(100, 50), (50, 100), (300, 300)];
        let plans = layout(sizes.clone(), SizingPolicy::FitToContent { margin_mm: 2.0 }).unwrap();
        assert_eq!(plans.len(), sizes.len());
        for (plan, (w, h)) in plans.iter().zip(sizes) {
            assert_eq!(plan.placement.width_mm, px_to_mm(w));
            assert_eq!(plan.placement.height_mm, px_to_mm(h));
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let sizes = [(640, 480), (4000, 10), (1, 2000)];
        let policy = a4(Orientation::Landscape, 7.0);
        assert_eq!(layout(sizes, policy).unwrap(), layout(sizes, policy).unwrap());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = layout(Vec::new(), a4(Orientation::Portrait, 10.0)).unwrap_err();
        assert!(matches!(err, LeafpressError::EmptyInput));
    }

    #[test]
    fn empty_input_wins_over_bad_margin() {
        let err = layout(Vec::new(), a4(Orientation::Portrait, 150.0)).unwrap_err();
        assert!(matches!(err, LeafpressError::EmptyInput));
        let err = layout([(10, 10)], a4(Orientation::Portrait, 150.0)).unwrap_err();
        assert!(matches!(err, LeafpressError::Validation(_)));
    }

    #[test]
    fn oversized_margin_is_rejected() {
        // 105 mm on each side consumes the full A4 width.
        let err = PageLayout::new(a4(Orientation::Portrait, 105.0)).unwrap_err();
        assert!(matches!(err, LeafpressError::Validation(_)));
        assert!(PageLayout::new(a4(Orientation::Portrait, 104.9)).is_ok());
    }

    #[test]
    fn non_positive_margin_is_rejected() {
        for margin in [0.0, -1.0, f64::INFINITY] {
            let err = PageLayout::new(SizingPolicy::FitToContent { margin_mm: margin }).unwrap_err();
            assert!(matches!(err, LeafpressError::Validation(_)));
        }
    }
}
