//! layersplit splits an RGBA8 image into two 4-bit RGBA layers, `front` and `back`.
//!
//! Compositing front over back and upsampling bilinearly should reproduce the source with
//! minimal integrated squared error. Each pixel is solved in raster order against the already
//! decided up, left and up-left neighbours:
//!
//! 1. **Model**: [`AlphaStage`] -> [`ColorStage`] / [`AlphaTrial`] -> [`ChannelTrial`] evaluate
//!    the exact error integral as an integer numerator ([`Ise`]).
//! 2. **Search**: [`Optimizer`] scans `(A_f, A_b)` pairs and, per channel, picks `(C_f, C_b)`
//!    with [`hill_climb`] or [`exhaustive`].
//! 3. **Scan**: [`split`] walks the image row by row, or by anti-diagonals on a rayon pool.
//!
//! Image decode/encode helpers ([`load_source`], [`write_layers`]) sit at the edge and are
//! optional; the core works on [`Raster`] buffers.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod composite;
pub(crate) mod config;
pub(crate) mod io;
pub(crate) mod model;
pub(crate) mod scan;
pub(crate) mod search;

pub use crate::foundation::core::{
    Component, LEVEL_SCALE, MAX_LEVEL, Raster, Rgba4, Rgba8, level_to_u8, nearest_level,
};
pub use crate::foundation::error::{SplitError, SplitResult};

pub use crate::composite::{composite_layers, over};
pub use crate::config::{AlphaOrder, SearchStrategy, SplitOpts};
pub use crate::io::decode::{decode_source, load_source};
pub use crate::io::encode::{encode_rgba, layer_to_rgba8, write_layers, write_rgba8};
pub use crate::model::error_model::{
    AlphaStage, AlphaTrial, ChannelTrial, ColorStage, Ise, evaluate,
};
pub use crate::model::patch::{Bilinear, Cubic, GAMMA, INTEGRAL_DENOM, ONE, Patch, Quadratic};
pub use crate::model::taps::{ChannelTaps, Neighborhood, Trial};
pub use crate::scan::scanner::{Layers, SplitReport, causal_neighborhood, split};
pub use crate::search::color::{ColorChoice, exhaustive, hill_climb};
pub use crate::search::optimizer::{Optimizer, PixelSolution};
