#![forbid(unsafe_code)]

//! Pixel surfaces and where they come from.
//!
//! A surface is an RGBA grid at pixel resolution. In a terminal each cell
//! shows two pixels stacked vertically, so a viewport of `w x h` cells maps
//! to a surface of `w x 2h` pixels ([`pixel_size_for`]).

use vibe_core::Size;
use vibe_render::PackedRgba;

/// Identity of a surface, stable across resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Pixel grid the background program draws into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    id: SurfaceId,
    width: u16,
    height: u16,
    pixels: Vec<PackedRgba>,
}

/// Pixel dimensions backing a viewport of `viewport` cells.
#[must_use]
pub const fn pixel_size_for(viewport: Size) -> Size {
    Size::new(viewport.width, viewport.height.saturating_mul(2))
}

impl Surface {
    #[must_use]
    pub fn new(id: SurfaceId, pixel_size: Size) -> Self {
        Self {
            id,
            width: pixel_size.width,
            height: pixel_size.height,
            pixels: vec![PackedRgba::BLACK; pixel_size.area()],
        }
    }

    #[must_use]
    pub const fn id(&self) -> SurfaceId {
        self.id
    }

    /// Size in pixels.
    #[must_use]
    pub const fn pixel_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize in place, keeping the allocation where possible.
    pub fn resize(&mut self, pixel_size: Size) {
        self.width = pixel_size.width;
        self.height = pixel_size.height;
        self.pixels.clear();
        self.pixels.resize(pixel_size.area(), PackedRgba::BLACK);
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<PackedRgba> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)])
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [PackedRgba] {
        &mut self.pixels
    }
}

/// Source of drawing surfaces. Acquisition may fail; callers must cope.
pub trait SurfaceProvider {
    /// A surface backing `viewport`, or `None` if unavailable.
    fn acquire(&mut self, viewport: Size) -> Option<Surface>;

    /// Hand a surface back.
    fn release(&mut self, surface: Surface);
}

/// In-memory provider with an optional pixel budget.
///
/// Keeps count of outstanding surfaces so leaks are observable.
#[derive(Debug, Clone)]
pub struct CpuSurfaceProvider {
    next_id: u64,
    live: usize,
    acquired: usize,
    max_pixels: Option<usize>,
}

impl Default for CpuSurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSurfaceProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            live: 0,
            acquired: 0,
            max_pixels: None,
        }
    }

    /// Refuse surfaces larger than `max_pixels`.
    #[must_use]
    pub const fn with_max_pixels(mut self, max_pixels: usize) -> Self {
        self.max_pixels = Some(max_pixels);
        self
    }

    /// Surfaces handed out and not yet released.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Total successful acquisitions.
    #[must_use]
    pub const fn acquired(&self) -> usize {
        self.acquired
    }
}

impl SurfaceProvider for CpuSurfaceProvider {
    fn acquire(&mut self, viewport: Size) -> Option<Surface> {
        let pixel_size = pixel_size_for(viewport);
        if let Some(max) = self.max_pixels
            && pixel_size.area() > max
        {
            tracing::debug!(?pixel_size, max, "surface exceeds pixel budget");
            return None;
        }
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.live += 1;
        self.acquired += 1;
        Some(Surface::new(id, pixel_size))
    }

    fn release(&mut self, surface: Surface) {
        self.live = self.live.saturating_sub(1);
        drop(surface);
    }
}

/// Provider that never yields a surface (background disabled).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSurfaceProvider;

impl SurfaceProvider for UnavailableSurfaceProvider {
    fn acquire(&mut self, _viewport: Size) -> Option<Surface> {
        None
    }

    fn release(&mut self, _surface: Surface) {}
}

impl<P: SurfaceProvider + ?Sized> SurfaceProvider for Box<P> {
    fn acquire(&mut self, viewport: Size) -> Option<Surface> {
        (**self).acquire(viewport)
    }

    fn release(&mut self, surface: Surface) {
        (**self).release(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_to_double_height() {
        assert_eq!(pixel_size_for(Size::new(80, 24)), Size::new(80, 48));
    }

    #[test]
    fn resize_keeps_identity() {
        let mut s = Surface::new(SurfaceId(9), Size::new(4, 4));
        s.resize(Size::new(10, 2));
        assert_eq!(s.id(), SurfaceId(9));
        assert_eq!(s.pixels().len(), 20);
        assert_eq!(s.get(9, 1), Some(PackedRgba::BLACK));
        assert_eq!(s.get(10, 0), None);
    }

    #[test]
    fn cpu_provider_tracks_live_surfaces() {
        let mut p = CpuSurfaceProvider::new();
        let a = p.acquire(Size::new(2, 2)).expect("surface");
        let b = p.acquire(Size::new(2, 2)).expect("surface");
        assert_ne!(a.id(), b.id());
        assert_eq!(p.live(), 2);
        p.release(a);
        assert_eq!(p.live(), 1);
        assert_eq!(p.acquired(), 2);
    }

    #[test]
    fn pixel_budget_refuses_large_surfaces() {
        let mut p = CpuSurfaceProvider::new().with_max_pixels(100);
        assert!(p.acquire(Size::new(10, 5)).is_some());
        assert!(p.acquire(Size::new(10, 6)).is_none());
        assert!(UnavailableSurfaceProvider.acquire(Size::new(1, 1)).is_none());
    }
}
