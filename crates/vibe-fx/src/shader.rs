#![forbid(unsafe_code)]

//! The fluid gradient program.
//!
//! A CPU rendition of a small fragment program. For normalized pixel
//! coordinates `(x, y)` (y measured bottom-up) and `t = elapsed * 0.2`:
//!
//! ```text
//! pattern = sin(5x + t) + cos(4y - 0.5t) + sin(3(x + y) + 0.8t)
//! color   = mix(depth, grape, smoothstep(-2, 1, pattern))
//! color   = mix(color, peach, smoothstep(0, 2, pattern * sin t))
//! color   = mix(color, cream, smoothstep(1.5, 3, pattern))
//! color  += 0.05 * fract(sin(dot((x, y), (12.9898, 78.233))) * 43758.5453)
//! ```
//!
//! The first two wave terms are separable and are evaluated once per
//! column/row per frame. The diagonal term is split with the angle-sum
//! identity so it is separable too. The grain depends only on position and
//! is cached until the surface size changes.

use std::fmt;
use std::time::Duration;

use vibe_core::Size;
use vibe_render::PackedRgba;

use crate::surface::Surface;

/// Linear RGB triple with channels in `[0, 1]`.
pub type Rgb = [f64; 3];

/// Fixed parameters of the program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderSource {
    /// Multiplier from elapsed seconds to shader time.
    pub time_scale: f64,
    /// Spatial frequencies of the horizontal, vertical, and diagonal waves.
    pub frequencies: [f64; 3],
    /// Phase speed of each wave relative to shader time.
    pub phase_rates: [f64; 3],
    /// depth, grape, peach, cream.
    pub palette: [Rgb; 4],
    /// smoothstep edges for the grape, peach, and cream blends.
    pub edges: [(f64, f64); 3],
    /// Amplitude of the positional grain.
    pub grain: f64,
}

impl ShaderSource {
    pub const DEPTH: Rgb = [0.004, 0.204, 0.227];
    pub const GRAPE: Rgb = [0.451, 0.400, 0.741];
    pub const PEACH: Rgb = [0.996, 0.663, 0.576];
    pub const CREAM: Rgb = [0.996, 0.871, 0.561];

    /// The program vibehub ships.
    pub const FLUID_GRADIENT: Self = Self {
        time_scale: 0.2,
        frequencies: [5.0, 4.0, 3.0],
        phase_rates: [1.0, -0.5, 0.8],
        palette: [Self::DEPTH, Self::GRAPE, Self::PEACH, Self::CREAM],
        edges: [(-2.0, 1.0), (0.0, 2.0), (1.5, 3.0)],
        grain: 0.05,
    };

    /// Validate and build a runnable program.
    pub fn compile(&self) -> Result<FluidGradientProgram, ProgramError> {
        let scalars = [("time_scale", self.time_scale), ("grain", self.grain)];
        for (name, v) in scalars {
            if !v.is_finite() {
                return Err(ProgramError::NonFinite(name));
            }
        }
        if self
            .frequencies
            .iter()
            .chain(&self.phase_rates)
            .any(|v| !v.is_finite())
        {
            return Err(ProgramError::NonFinite("wave"));
        }
        if !(0.0..=1.0).contains(&self.grain) {
            return Err(ProgramError::GrainOutOfRange(self.grain));
        }
        for (slot, color) in self.palette.iter().enumerate() {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ProgramError::PaletteOutOfRange { slot });
            }
        }
        for (stage, &(lo, hi)) in self.edges.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(ProgramError::InvalidEdges { stage, lo, hi });
            }
        }
        Ok(FluidGradientProgram::new(*self))
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::FLUID_GRADIENT
    }
}

/// Why a [`ShaderSource`] failed to compile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    NonFinite(&'static str),
    GrainOutOfRange(f64),
    PaletteOutOfRange { slot: usize },
    InvalidEdges { stage: usize, lo: f64, hi: f64 },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(what) => write!(f, "non-finite {what} parameter"),
            Self::GrainOutOfRange(g) => write!(f, "grain amplitude {g} outside [0, 1]"),
            Self::PaletteOutOfRange { slot } => {
                write!(f, "palette color {slot} has a channel outside [0, 1]")
            }
            Self::InvalidEdges { stage, lo, hi } => {
                write!(f, "blend stage {stage} has invalid edges ({lo}, {hi})")
            }
        }
    }
}

impl std::error::Error for ProgramError {}

#[inline]
fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn mix(a: Rgb, b: Rgb, t: f64) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[inline]
fn grain_at(x: f64, y: f64) -> f64 {
    let v = (x * 12.9898 + y * 78.233).sin() * 43_758.545_3;
    v - v.floor()
}

/// Normalized coordinates of pixel `(col, row)` on a `size` surface.
#[inline]
fn uv(col: u16, row: u16, size: Size) -> (f64, f64) {
    let x = (f64::from(col) + 0.5) / f64::from(size.width.max(1));
    let y = 1.0 - (f64::from(row) + 0.5) / f64::from(size.height.max(1));
    (x, y)
}

/// Compiled program with per-size and per-frame caches.
#[derive(Debug, Clone)]
pub struct FluidGradientProgram {
    source: ShaderSource,
    grain_size: Size,
    grain: Vec<f32>,
    grain_builds: u64,
    // Per column: sin(f0 x + r0 t), sin(f2 x + r2 t), cos(f2 x + r2 t).
    cols: Vec<[f64; 3]>,
    // Per row: cos(f1 y + r1 t), cos(f2 y), sin(f2 y).
    rows: Vec<[f64; 3]>,
}

impl FluidGradientProgram {
    fn new(source: ShaderSource) -> Self {
        Self {
            source,
            grain_size: Size::default(),
            grain: Vec::new(),
            grain_builds: 0,
            cols: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &ShaderSource {
        &self.source
    }

    /// How many times the grain cache was rebuilt.
    #[must_use]
    pub const fn grain_builds(&self) -> u64 {
        self.grain_builds
    }

    /// Shader time for an elapsed duration.
    #[must_use]
    pub fn shader_time(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * self.source.time_scale
    }

    /// Color of one normalized point, evaluated directly with no caching.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, elapsed: Duration) -> Rgb {
        let s = &self.source;
        let t = self.shader_time(elapsed);
        let [f0, f1, f2] = s.frequencies;
        let [r0, r1, r2] = s.phase_rates;
        let pattern =
            (x * f0 + t * r0).sin() + (y * f1 + t * r1).cos() + ((x + y) * f2 + t * r2).sin();
        let color = self.blend(pattern, t.sin());
        self.finish(color, s.grain * grain_at(x, y))
    }

    #[inline]
    fn blend(&self, pattern: f64, sin_t: f64) -> Rgb {
        let s = &self.source;
        let [depth, grape, peach, cream] = s.palette;
        let [e0, e1, e2] = s.edges;
        let color = mix(depth, grape, smoothstep(e0.0, e0.1, pattern));
        let color = mix(color, peach, smoothstep(e1.0, e1.1, pattern * sin_t));
        mix(color, cream, smoothstep(e2.0, e2.1, pattern))
    }

    #[inline]
    fn finish(&self, color: Rgb, noise: f64) -> Rgb {
        [
            (color[0] + noise).clamp(0.0, 1.0),
            (color[1] + noise).clamp(0.0, 1.0),
            (color[2] + noise).clamp(0.0, 1.0),
        ]
    }

    fn ensure_geometry(&mut self, size: Size) {
        if self.grain_size == size && self.grain.len() == size.area() {
            return;
        }
        let amp = self.source.grain;
        self.grain.clear();
        self.grain.reserve(size.area());
        for row in 0..size.height {
            for col in 0..size.width {
                let (x, y) = uv(col, row, size);
                self.grain.push((amp * grain_at(x, y)) as f32);
            }
        }
        self.grain_size = size;
        self.grain_builds += 1;
        tracing::trace!(?size, "grain cache rebuilt");
    }

    fn fill_wave_terms(&mut self, size: Size, t: f64) {
        let [f0, f1, f2] = self.source.frequencies;
        let [r0, r1, r2] = self.source.phase_rates;
        self.cols.clear();
        self.cols.extend((0..size.width).map(|col| {
            let (x, _) = uv(col, 0, size);
            let diag = x * f2 + t * r2;
            [(x * f0 + t * r0).sin(), diag.sin(), diag.cos()]
        }));
        self.rows.clear();
        self.rows.extend((0..size.height).map(|row| {
            let (_, y) = uv(0, row, size);
            [(y * f1 + t * r1).cos(), (y * f2).cos(), (y * f2).sin()]
        }));
    }

    /// Paint every pixel of `surface` for time `elapsed`.
    pub fn render(&mut self, surface: &mut Surface, elapsed: Duration) {
        let size = surface.pixel_size();
        if size.is_empty() {
            return;
        }
        self.ensure_geometry(size);
        let t = self.shader_time(elapsed);
        self.fill_wave_terms(size, t);
        let sin_t = t.sin();

        let width = usize::from(size.width);
        let pixels = surface.pixels_mut();
        for (row, row_terms) in self.rows.iter().enumerate() {
            let [v2, cos_y, sin_y] = *row_terms;
            let base = row * width;
            for (col, col_terms) in self.cols.iter().enumerate() {
                let [v1, sin_x, cos_x] = *col_terms;
                // sin(a + b) = sin a cos b + cos a sin b
                let v3 = sin_x * cos_y + cos_x * sin_y;
                let color = self.blend(v1 + v2 + v3, sin_t);
                let [r, g, b] = self.finish(color, f64::from(self.grain[base + col]));
                pixels[base + col] = PackedRgba::from_unit(r as f32, g as f32, b as f32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceId;

    fn program() -> FluidGradientProgram {
        ShaderSource::FLUID_GRADIENT.compile().expect("compile")
    }

    #[test]
    fn shipped_source_compiles() {
        assert!(ShaderSource::default().compile().is_ok());
    }

    #[test]
    fn invalid_sources_are_rejected() {
        let mut src = ShaderSource::FLUID_GRADIENT;
        src.edges[1] = (2.0, 2.0);
        assert!(matches!(
            src.compile(),
            Err(ProgramError::InvalidEdges { stage: 1, .. })
        ));

        let mut src = ShaderSource::FLUID_GRADIENT;
        src.palette[3] = [1.2, 0.0, 0.0];
        assert_eq!(
            src.compile().map(|_| ()),
            Err(ProgramError::PaletteOutOfRange { slot: 3 })
        );

        let mut src = ShaderSource::FLUID_GRADIENT;
        src.time_scale = f64::NAN;
        assert_eq!(
            src.compile().map(|_| ()),
            Err(ProgramError::NonFinite("time_scale"))
        );
    }

    #[test]
    fn smoothstep_matches_glsl() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
        assert!((smoothstep(-2.0, 1.0, -0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let p = program();
        for i in 0..50 {
            let elapsed = Duration::from_millis(i * 777);
            for (x, y) in [(0.0, 0.0), (0.3, 0.9), (1.0, 1.0), (0.5, 0.25)] {
                let c = p.sample(x, y, elapsed);
                assert!(c.iter().all(|v| (0.0..=1.0).contains(v)), "{c:?}");
            }
        }
    }

    #[test]
    fn cached_render_matches_direct_sample() {
        let mut p = program();
        let size = Size::new(7, 5);
        let mut s = Surface::new(SurfaceId(1), size);
        let elapsed = Duration::from_millis(12_345);
        p.render(&mut s, elapsed);
        for row in 0..size.height {
            for col in 0..size.width {
                let (x, y) = uv(col, row, size);
                let [r, g, b] = p.sample(x, y, elapsed);
                let want = PackedRgba::from_unit(r as f32, g as f32, b as f32);
                let got = s.get(col, row).unwrap_or_default();
                for (a, b) in [(got.r(), want.r()), (got.g(), want.g()), (got.b(), want.b())] {
                    assert!(a.abs_diff(b) <= 1, "({col},{row}) {got:?} vs {want:?}");
                }
            }
        }
    }

    #[test]
    fn grain_cache_rebuilds_only_on_size_change() {
        let mut p = program();
        let mut s = Surface::new(SurfaceId(1), Size::new(4, 4));
        p.render(&mut s, Duration::ZERO);
        p.render(&mut s, Duration::from_secs(1));
        assert_eq!(p.grain_builds(), 1);
        s.resize(Size::new(6, 2));
        p.render(&mut s, Duration::from_secs(2));
        assert_eq!(p.grain_builds(), 2);
    }

    #[test]
    fn animation_changes_over_time() {
        let mut p = program();
        let mut a = Surface::new(SurfaceId(1), Size::new(8, 8));
        let mut b = a.clone();
        p.render(&mut a, Duration::ZERO);
        p.render(&mut b, Duration::from_secs(10));
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn empty_surface_is_a_no_op() {
        let mut p = program();
        let mut s = Surface::new(SurfaceId(1), Size::new(0, 10));
        p.render(&mut s, Duration::ZERO);
        assert_eq!(p.grain_builds(), 0);
    }
}
