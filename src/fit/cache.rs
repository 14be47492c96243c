//! Memoized fitting. A result depends on the request, the container class,
//! the fitter's options and the host that measured it; all four are part of
//! the key, so one cache can serve several hosts and fitters.

use std::cell::{Cell, RefCell};

use ahash::AHashMap;

use super::{FitStrategy, TextFitter};
use super::surface::MeasureHost;
use crate::error::SurfaceError;
use crate::models::{SizingRequest, SizingResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FitKey {
    host: u64,
    min_font_px: u64,
    step_px: u64,
    max_font_px: Option<u64>,
    strategy: FitStrategy,
    text: String,
    max_width: u64,
    max_height: u64,
    style_class: String,
    container_class: String,
}

#[derive(Debug, Default)]
pub struct FitCache {
    entries: RefCell<AHashMap<FitKey, SizingResult>>,
    hits: Cell<usize>,
}

impl FitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<H: MeasureHost + ?Sized>(
        &self,
        fitter: &TextFitter,
        host: &H,
        container_class: &str,
        req: &SizingRequest,
    ) -> Result<SizingResult, SurfaceError> {
        let options = fitter.options();
        let key = FitKey {
            host: host.host_id(),
            min_font_px: options.min_font_px.to_bits(),
            step_px: options.step_px.to_bits(),
            max_font_px: options.max_font_px.map(f64::to_bits),
            strategy: options.strategy,
            text: req.text.clone(),
            max_width: req.max_width.to_bits(),
            max_height: req.max_height.to_bits(),
            style_class: req.style_class.clone(),
            container_class: container_class.to_string(),
        };
        if let Some(hit) = self.entries.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(*hit);
        }
        let result = fitter.fit(host, container_class, req)?;
        self.entries.borrow_mut().insert(key, result);
        Ok(result)
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.hits.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{EstimateHost, FitOptions};

    #[test]
    fn repeated_requests_hit_the_cache() {
        let cache = FitCache::new();
        let host = EstimateHost::default();
        let fitter = TextFitter::default();
        let req = SizingRequest::new("2634", 1230.0, 100.0, "header_line");
        let a = cache.fit(&fitter, &host, "big_number", &req).unwrap();
        let b = cache.fit(&fitter, &host, "big_number", &req).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);

        // a different container is a different key
        cache
            .fit(&fitter, &host, "big_number no_trendline", &req)
            .unwrap();
        assert_eq!(cache.len(), 2);

        // so are another host and another fitter
        cache
            .fit(&fitter, &EstimateHost::default(), "big_number", &req)
            .unwrap();
        let stepped = TextFitter::new(FitOptions {
            step_px: 2.0,
            ..FitOptions::default()
        });
        cache.fit(&stepped, &host, "big_number", &req).unwrap();
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.hits(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
    }
}
