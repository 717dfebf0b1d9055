#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, text helpers, and the terminal presenter.
//!
//! Views draw into a [`Buffer`]; the [`Presenter`] diffs it against the
//! previously presented frame and writes only the cells that changed.

pub mod buffer;
pub mod cell;
pub mod presenter;
pub mod text;

pub use buffer::Buffer;
pub use cell::{Cell, PackedRgba, StyleFlags, UPPER_HALF};
pub use presenter::{PresentStats, Presenter};
