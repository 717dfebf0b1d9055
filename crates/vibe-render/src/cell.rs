#![forbid(unsafe_code)]

//! Colors and terminal cells.

/// Upper half block. A cell showing it paints its top pixel with `fg` and
/// its bottom pixel with `bg`.
pub const UPPER_HALF: char = '\u{2580}';

/// Marker stored in the cell after a double-width glyph.
const CONTINUATION: char = '\0';

/// A compact RGBA color, laid out as `0xRRGGBBAA`.
///
/// Straight alpha. Compositing is SourceOver ([`PackedRgba::over`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Opaque color from unit-range channels; values outside `[0, 1]` clamp.
    #[inline]
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Same color with a different alpha.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// SourceOver: `self` composited on top of `dst`.
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let sa = u32::from(self.a());
        match sa {
            255 => return self,
            0 => return dst,
            _ => {}
        }
        let da = u32::from(dst.a());
        // Everything below is scaled by 255 * 255.
        let out_a = sa * 255 + da * (255 - sa);
        if out_a == 0 {
            return Self::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| -> u8 {
            let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
            ((num + out_a / 2) / out_a).min(255) as u8
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            ((out_a + 127) / 255).min(255) as u8,
        )
    }

    /// Multiply the color channels by `factor` (alpha unchanged).
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        let ch = |c: u8| (f32::from(c) * f).round().clamp(0.0, 255.0) as u8;
        Self::rgba(ch(self.r()), ch(self.g()), ch(self.b()), self.a())
    }

    /// Linear interpolation towards `other`; `t` clamps to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }

    /// Per-channel mean of two colors.
    #[must_use]
    pub const fn average(self, other: Self) -> Self {
        const fn avg(a: u8, b: u8) -> u8 {
            ((a as u16 + b as u16 + 1) / 2) as u8
        }
        Self::rgba(
            avg(self.r(), other.r()),
            avg(self.g(), other.g()),
            avg(self.b(), other.b()),
            avg(self.a(), other.a()),
        )
    }
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

bitflags::bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Displayed character. `'\0'` marks the tail of a wide glyph.
    pub ch: char,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub flags: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: PackedRgba::WHITE,
            bg: PackedRgba::BLACK,
            flags: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// A blank cell with the given background.
    #[must_use]
    pub const fn blank(bg: PackedRgba) -> Self {
        Self {
            ch: ' ',
            fg: PackedRgba::WHITE,
            bg,
            flags: StyleFlags::empty(),
        }
    }

    /// A half-block cell showing two stacked pixels.
    #[must_use]
    pub const fn pixels(top: PackedRgba, bottom: PackedRgba) -> Self {
        Self {
            ch: UPPER_HALF,
            fg: top,
            bg: bottom,
            flags: StyleFlags::empty(),
        }
    }

    pub(crate) const fn continuation(bg: PackedRgba) -> Self {
        Self {
            ch: CONTINUATION,
            fg: PackedRgba::WHITE,
            bg,
            flags: StyleFlags::empty(),
        }
    }

    /// Returns `true` for the trailing half of a wide glyph.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }

    /// The color a viewer perceives behind this cell. For a half-block cell
    /// that is the mix of both pixels.
    #[must_use]
    pub const fn backdrop(&self) -> PackedRgba {
        if self.ch == UPPER_HALF {
            self.fg.average(self.bg)
        } else {
            self.bg
        }
    }

    #[must_use]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[must_use]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }
}
