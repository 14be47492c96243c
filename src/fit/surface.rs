//! Measurement surfaces: where text is actually laid out and read back.
//!
//! A [`MeasureHost`] stands for the rendering environment. It hands out
//! surfaces that are attached for the duration of one fit call and detached
//! again by [`AttachedSurface`]'s `Drop`, whichever way the call exits.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SurfaceError;
use crate::models::TextBox;

/// An offscreen element that can hold one line of text.
pub trait MeasureSurface {
    /// Lay out `text` with `text_class` at `font_px` and return its extent.
    fn measure(&mut self, text: &str, text_class: &str, font_px: f64)
    -> Result<TextBox, SurfaceError>;
}

/// The environment surfaces are created in.
pub trait MeasureHost {
    type Surface: MeasureSurface;

    /// Create a detached surface carrying `container_class`.
    fn create_surface(&self, container_class: &str) -> Result<Self::Surface, SurfaceError>;
    fn attach(&self, surface: &mut Self::Surface) -> Result<(), SurfaceError>;
    fn detach(&self, surface: &mut Self::Surface);
    /// Number of surfaces currently attached.
    fn live_surfaces(&self) -> usize;
    /// Distinct for every host instance; fit results measured on one host
    /// are only reusable on the host with the same id.
    fn host_id(&self) -> u64;
}

/// An attached surface, detached again on drop.
pub struct AttachedSurface<'h, H: MeasureHost + ?Sized> {
    host: &'h H,
    surface: H::Surface,
}

impl<'h, H: MeasureHost + ?Sized> AttachedSurface<'h, H> {
    pub fn acquire(host: &'h H, container_class: &str) -> Result<Self, SurfaceError> {
        let mut surface = host.create_surface(container_class)?;
        // a surface that failed to attach has nothing to tear down
        host.attach(&mut surface)?;
        Ok(Self { host, surface })
    }

    pub fn measure(
        &mut self,
        text: &str,
        text_class: &str,
        font_px: f64,
    ) -> Result<TextBox, SurfaceError> {
        self.surface.measure(text, text_class, font_px)
    }
}

impl<H: MeasureHost + ?Sized> Drop for AttachedSurface<'_, H> {
    fn drop(&mut self) {
        self.host.detach(&mut self.surface);
    }
}

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Attachment bookkeeping shared by the bundled hosts, plus the host's id.
#[derive(Debug)]
pub struct SurfaceCounter {
    id: u64,
    live: Cell<usize>,
}

impl Default for SurfaceCounter {
    fn default() -> Self {
        Self {
            id: NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed),
            live: Cell::new(0),
        }
    }
}

impl SurfaceCounter {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn attached(&self) {
        self.live.set(self.live.get() + 1);
    }

    pub fn detached(&self) {
        self.live.set(self.live.get().saturating_sub(1));
    }

    pub fn live(&self) -> usize {
        self.live.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        counter: SurfaceCounter,
        fail_attach: bool,
    }

    struct FlakySurface;

    impl MeasureSurface for FlakySurface {
        fn measure(&mut self, text: &str, _: &str, font_px: f64) -> Result<TextBox, SurfaceError> {
            Err(SurfaceError::Measure {
                text: text.to_string(),
                font_px,
                reason: "broken".into(),
            })
        }
    }

    impl MeasureHost for Flaky {
        type Surface = FlakySurface;

        fn create_surface(&self, _: &str) -> Result<FlakySurface, SurfaceError> {
            Ok(FlakySurface)
        }

        fn attach(&self, _: &mut FlakySurface) -> Result<(), SurfaceError> {
            if self.fail_attach {
                return Err(SurfaceError::Unavailable("no document".into()));
            }
            self.counter.attached();
            Ok(())
        }

        fn detach(&self, _: &mut FlakySurface) {
            self.counter.detached();
        }

        fn live_surfaces(&self) -> usize {
            self.counter.live()
        }

        fn host_id(&self) -> u64 {
            self.counter.id()
        }
    }

    #[test]
    fn guard_detaches_after_measure_error() {
        let host = Flaky {
            counter: SurfaceCounter::default(),
            fail_attach: false,
        };
        {
            let mut s = AttachedSurface::acquire(&host, "big_number").unwrap();
            assert_eq!(host.live_surfaces(), 1);
            assert!(s.measure("x", "header_line", 10.0).is_err());
        }
        assert_eq!(host.live_surfaces(), 0);
    }

    #[test]
    fn counters_get_distinct_ids() {
        let a = SurfaceCounter::default();
        let b = SurfaceCounter::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn failed_attach_is_reported() {
        let host = Flaky {
            counter: SurfaceCounter::default(),
            fail_attach: true,
        };
        let err = AttachedSurface::acquire(&host, "big_number").err().unwrap();
        assert!(matches!(err, SurfaceError::Unavailable(_)));
        assert_eq!(host.live_surfaces(), 0);
    }
}
