#![forbid(unsafe_code)]

//! Palette shared by all views.
//!
//! Four system colors (depth, grape, peach, cream) plus a near-black for
//! panels. Muted variants are pre-blended against depth so text stays
//! legible whatever the background animation is doing underneath.

use vibe_render::PackedRgba;

/// Deep teal background.
pub const DEPTH: PackedRgba = PackedRgba::rgb(1, 52, 58);
/// Panel black.
pub const BLACK: PackedRgba = PackedRgba::rgb(3, 14, 18);
pub const GRAPE: PackedRgba = PackedRgba::rgb(115, 102, 189);
pub const PEACH: PackedRgba = PackedRgba::rgb(254, 169, 147);
pub const CREAM: PackedRgba = PackedRgba::rgb(254, 222, 143);
pub const WHITE: PackedRgba = PackedRgba::WHITE;

/// Cream at roughly 60% over depth.
pub const CREAM_MUTED: PackedRgba = PackedRgba::rgb(153, 154, 109);
/// Cream at roughly 40% over depth.
pub const CREAM_FAINT: PackedRgba = PackedRgba::rgb(102, 120, 92);
/// Grape at roughly 40% over depth.
pub const GRAPE_DIM: PackedRgba = PackedRgba::rgb(47, 72, 110);
/// Peach at roughly 50% over depth.
pub const PEACH_DIM: PackedRgba = PackedRgba::rgb(128, 110, 103);

/// Translucent panel wash.
pub const PANEL: PackedRgba = PackedRgba::rgba(3, 14, 18, 150);
/// Darker wash for inset areas such as code previews.
pub const INSET: PackedRgba = PackedRgba::rgba(3, 14, 18, 200);
/// Full-screen dimming behind the detail view.
pub const SCRIM: PackedRgba = PackedRgba::rgba(0, 0, 0, 204);
/// Selected sidebar entry wash.
pub const HIGHLIGHT: PackedRgba = PackedRgba::rgba(254, 169, 147, 50);
/// Selected category entry wash.
pub const HIGHLIGHT_GRAPE: PackedRgba = PackedRgba::rgba(115, 102, 189, 60);
