#![forbid(unsafe_code)]

//! Geometric primitives.

/// A viewport or surface size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of cells covered (`width * height`).
    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle for layout bounds and clipping.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Size of this rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns `true` if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by `horizontal` columns on each side and `vertical` rows on each side.
    #[must_use]
    pub const fn inset(&self, horizontal: u16, vertical: u16) -> Self {
        let dx = if horizontal.saturating_mul(2) > self.width {
            self.width / 2
        } else {
            horizontal
        };
        let dy = if vertical.saturating_mul(2) > self.height {
            self.height / 2
        } else {
            vertical
        };
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - dx * 2,
            self.height - dy * 2,
        )
    }

    /// Split off the top `rows` rows, returning `(top, rest)`.
    #[must_use]
    pub const fn split_top(&self, rows: u16) -> (Self, Self) {
        let rows = if rows > self.height { self.height } else { rows };
        (
            Self::new(self.x, self.y, self.width, rows),
            Self::new(self.x, self.y + rows, self.width, self.height - rows),
        )
    }

    /// Split off the bottom `rows` rows, returning `(rest, bottom)`.
    #[must_use]
    pub const fn split_bottom(&self, rows: u16) -> (Self, Self) {
        let rows = if rows > self.height { self.height } else { rows };
        let rest = self.height - rows;
        (
            Self::new(self.x, self.y, self.width, rest),
            Self::new(self.x, self.y + rest, self.width, rows),
        )
    }

    /// Split off the left `cols` columns, returning `(left, rest)`.
    #[must_use]
    pub const fn split_left(&self, cols: u16) -> (Self, Self) {
        let cols = if cols > self.width { self.width } else { cols };
        (
            Self::new(self.x, self.y, cols, self.height),
            Self::new(self.x + cols, self.y, self.width - cols, self.height),
        )
    }

    /// A `width x height` rectangle centered inside `self`, clamped to fit.
    #[must_use]
    pub const fn centered(&self, width: u16, height: u16) -> Self {
        let w = if width > self.width { self.width } else { width };
        let h = if height > self.height {
            self.height
        } else {
            height
        };
        Self::new(
            self.x + (self.width - w) / 2,
            self.y + (self.height - h) / 2,
            w,
            h,
        )
    }

    /// Intersection with another rectangle (empty if disjoint).
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Self::new(x, y, 0, 0);
        }
        Self::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_area_and_empty() {
        assert_eq!(Size::new(80, 24).area(), 1920);
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn inset_clamps_to_half() {
        let r = Rect::new(0, 0, 3, 3).inset(5, 5);
        assert_eq!(r, Rect::new(1, 1, 1, 1));
        let r = Rect::new(2, 2, 10, 6).inset(1, 1);
        assert_eq!(r, Rect::new(3, 3, 8, 4));
    }

    #[test]
    fn splits_partition_the_rect() {
        let r = Rect::new(0, 0, 20, 10);
        let (top, rest) = r.split_top(3);
        assert_eq!(top.height + rest.height, 10);
        assert_eq!(rest.y, 3);
        let (left, right) = r.split_left(25);
        assert_eq!(left.width, 20);
        assert!(right.is_empty());
        let (rest, bottom) = r.split_bottom(1);
        assert_eq!(bottom, Rect::new(0, 9, 20, 1));
        assert_eq!(rest.height, 9);
    }

    #[test]
    fn centered_fits_inside() {
        let outer = Rect::new(0, 0, 80, 24);
        let inner = outer.centered(40, 10);
        assert_eq!(inner, Rect::new(20, 7, 40, 10));
        assert_eq!(outer.centered(100, 100), outer);
    }

    #[test]
    fn intersection_disjoint_is_empty() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(10, 10, 5, 5);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(
            a.intersection(&Rect::new(3, 3, 5, 5)),
            Rect::new(3, 3, 2, 2)
        );
    }
}
