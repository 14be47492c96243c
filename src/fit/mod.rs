//! Text fitting: the largest font size at which a single line of text fits a
//! width/height box, found by measuring on a [`MeasureHost`].
//!
//! Candidates are `min_font_px + k * step_px` for `k` in `0..=n`, where the
//! top candidate is `floor(max_height)` (a font cannot usefully be taller
//! than its box). Candidate `k = 0` is the floor: it is returned unmeasured
//! when nothing larger fits, so oversized text degrades to visual overflow
//! instead of failing the render.

pub mod cache;
pub mod estimate;
pub mod glyph;
pub mod host;
pub mod surface;

pub use cache::FitCache;
pub use estimate::EstimateHost;
pub use glyph::GlyphHost;
pub use host::AnyHost;
pub use surface::{AttachedSurface, MeasureHost, MeasureSurface};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;
use crate::models::{SizingRequest, SizingResult};

/// Search order over the candidate sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    /// Binary search; `O(log n)` measurements.
    #[default]
    Bisect,
    /// Walk down from the top candidate until the text fits.
    Descend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    pub min_font_px: f64,
    /// Precision of the search.
    pub step_px: f64,
    pub max_font_px: Option<f64>,
    pub strategy: FitStrategy,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_font_px: 0.0,
            step_px: 1.0,
            max_font_px: None,
            strategy: FitStrategy::Bisect,
        }
    }
}

impl FitOptions {
    // Non-finite or non-positive knobs would break termination.
    fn normalized(self) -> Self {
        let min_font_px = if self.min_font_px.is_finite() {
            self.min_font_px.max(0.0)
        } else {
            0.0
        };
        let step_px = if self.step_px.is_finite() && self.step_px > 0.0 {
            self.step_px
        } else {
            1.0
        };
        Self {
            min_font_px,
            step_px,
            max_font_px: self.max_font_px.filter(|m| m.is_finite()),
            strategy: self.strategy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFitter {
    options: FitOptions,
}

impl TextFitter {
    pub fn new(options: FitOptions) -> Self {
        Self {
            options: options.normalized(),
        }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Largest fitting font size for `req`, measured on a fresh surface from
    /// `host` carrying `container_class`.
    pub fn fit<H: MeasureHost + ?Sized>(
        &self,
        host: &H,
        container_class: &str,
        req: &SizingRequest,
    ) -> Result<SizingResult, SurfaceError> {
        if req.text.is_empty() {
            debug!("fit .{}: empty text", req.style_class);
            return Ok(SizingResult { font_size: 0.0 });
        }

        let FitOptions {
            min_font_px: lower,
            step_px: step,
            max_font_px,
            strategy,
        } = self.options;
        let mut upper = if req.max_height.is_finite() {
            req.max_height.floor()
        } else {
            lower
        };
        if let Some(cap) = max_font_px {
            upper = upper.min(cap);
        }
        let n = if upper > lower {
            ((upper - lower) / step).floor() as usize
        } else {
            0
        };
        if n == 0 {
            debug!("fit .{}: no room above {lower}px", req.style_class);
            return Ok(SizingResult { font_size: lower });
        }

        let size_at = |k: usize| lower + k as f64 * step;
        let mut surface = AttachedSurface::acquire(host, container_class)?;
        let mut probes = 0usize;
        let mut fits = |k: usize| -> Result<bool, SurfaceError> {
            probes += 1;
            let b = surface.measure(&req.text, &req.style_class, size_at(k))?;
            Ok(b.fits(req.max_width, req.max_height))
        };
        let k = match strategy {
            FitStrategy::Bisect => bisect(n, &mut fits)?,
            FitStrategy::Descend => descend(n, &mut fits)?,
        };
        drop(surface);

        let font_size = size_at(k);
        trace!("fit .{}: {probes} probes over {n} candidates", req.style_class);
        debug!(
            "fit .{} {:?} in {}x{} -> {font_size}px",
            req.style_class, req.text, req.max_width, req.max_height
        );
        Ok(SizingResult { font_size })
    }
}

/// Largest `k` in `1..=n` with `fits(k)`, or 0.
fn bisect<E>(n: usize, fits: &mut impl FnMut(usize) -> Result<bool, E>) -> Result<usize, E> {
    let (mut lo, mut hi) = (0usize, n);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid)? {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// First `k` counting down from `n` with `fits(k)`, or 0.
fn descend<E>(n: usize, fits: &mut impl FnMut(usize) -> Result<bool, E>) -> Result<usize, E> {
    let mut k = n;
    while k > 0 && !fits(k)? {
        k -= 1;
    }
    Ok(k)
}

/// Fit with default options.
pub fn compute_max_font_size<H: MeasureHost + ?Sized>(
    host: &H,
    container_class: &str,
    req: &SizingRequest,
) -> Result<SizingResult, SurfaceError> {
    TextFitter::default().fit(host, container_class, req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextBox;
    use crate::style::{HEADER_CLASS, SUBHEADER_CLASS};

    const CONTAINER: &str = "big_number negative";

    fn fit(text: &str, w: f64, h: f64, class: &str) -> f64 {
        let host = EstimateHost::default();
        let r = compute_max_font_size(&host, CONTAINER, &SizingRequest::new(text, w, h, class))
            .unwrap();
        assert_eq!(host.live_surfaces(), 0);
        r.font_size
    }

    fn measure(text: &str, class: &str, px: f64) -> TextBox {
        let host = EstimateHost::default();
        let mut s = AttachedSurface::acquire(&host, CONTAINER).unwrap();
        s.measure(text, class, px).unwrap()
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(fit("", 1230.0, 100.0, HEADER_CLASS), 0.0);
        assert_eq!(fit("", 0.0, 0.0, HEADER_CLASS), 0.0);
    }

    #[test]
    fn short_header_is_height_bound() {
        // 4 bold chars at 100px are 264px wide: only the band height limits
        assert_eq!(fit("2634", 1230.0, 100.0, HEADER_CLASS), 100.0);
    }

    #[test]
    fn long_subheader_is_width_bound() {
        let text = "-86.2% (2015 Q1 - 2018 Q3)";
        let f = fit(text, 300.0, 42.0, SUBHEADER_CLASS);
        assert!(f > 0.0 && f < 42.0);
        let b = measure(text, SUBHEADER_CLASS, f);
        assert!(b.fits(300.0, 42.0));
        assert!(!measure(text, SUBHEADER_CLASS, f + 1.0).fits(300.0, 42.0));
    }

    #[test]
    fn degenerate_width_returns_minimum() {
        assert_eq!(fit("2634", 0.0, 100.0, HEADER_CLASS), 0.0);
        let fitter = TextFitter::new(FitOptions {
            min_font_px: 6.0,
            ..FitOptions::default()
        });
        let host = EstimateHost::default();
        let r = fitter
            .fit(&host, CONTAINER, &SizingRequest::new("2634", 0.5, 100.0, HEADER_CLASS))
            .unwrap();
        assert_eq!(r.font_size, 6.0);
    }

    #[test]
    fn zero_height_box_needs_no_surface() {
        assert_eq!(fit("2634", 1230.0, 0.0, HEADER_CLASS), 0.0);
    }

    #[test]
    fn monotone_in_both_limits() {
        let text = "1,234,567";
        let mut last = 0.0;
        for w in (0..600).step_by(37) {
            let f = fit(text, w as f64, 80.0, HEADER_CLASS);
            assert!(f >= last, "width {w}: {f} < {last}");
            last = f;
        }
        let mut last = 0.0;
        for h in 0..120 {
            let f = fit(text, 400.0, h as f64, HEADER_CLASS);
            assert!(f >= last, "height {h}: {f} < {last}");
            last = f;
        }
    }

    #[test]
    fn result_is_maximal_within_precision() {
        for (w, h) in [(200.0, 90.0), (57.0, 13.0), (1230.0, 42.0), (800.0, 333.0)] {
            let text = "$12.3k";
            let f = fit(text, w, h, HEADER_CLASS);
            if f > 0.0 {
                assert!(measure(text, HEADER_CLASS, f).fits(w, h));
            }
            if f < h.floor() {
                assert!(!measure(text, HEADER_CLASS, f + 1.0).fits(w, h));
            }
        }
    }

    #[test]
    fn descend_agrees_with_bisect() {
        let host = EstimateHost::default();
        let bisect = TextFitter::default();
        let descend = TextFitter::new(FitOptions {
            strategy: FitStrategy::Descend,
            ..FitOptions::default()
        });
        for w in [10.0, 123.0, 480.0, 1230.0] {
            let req = SizingRequest::new("-86.2%", w, 47.0, SUBHEADER_CLASS);
            let a = bisect.fit(&host, CONTAINER, &req).unwrap();
            let b = descend.fit(&host, CONTAINER, &req).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn step_and_cap_shape_candidates() {
        let host = EstimateHost::default();
        let fitter = TextFitter::new(FitOptions {
            step_px: 2.0,
            max_font_px: Some(64.0),
            strategy: FitStrategy::Descend,
            ..FitOptions::default()
        });
        let r = fitter
            .fit(&host, CONTAINER, &SizingRequest::new("7", 1000.0, 99.0, HEADER_CLASS))
            .unwrap();
        assert_eq!(r.font_size, 64.0);
        let r = fitter
            .fit(&host, CONTAINER, &SizingRequest::new("7", 1000.0, 33.0, HEADER_CLASS))
            .unwrap();
        assert_eq!(r.font_size, 32.0);
    }

    #[test]
    fn bad_options_are_normalized() {
        let fitter = TextFitter::new(FitOptions {
            min_font_px: f64::NAN,
            step_px: 0.0,
            ..FitOptions::default()
        });
        assert_eq!(fitter.options().min_font_px, 0.0);
        assert_eq!(fitter.options().step_px, 1.0);
    }

    #[test]
    fn bisect_probe_count_is_logarithmic() {
        let mut probes = 0;
        let k = bisect(1024, &mut |k| {
            probes += 1;
            Ok::<_, ()>(k <= 700)
        })
        .unwrap();
        assert_eq!(k, 700);
        assert!(probes <= 11);
    }
}
