use crate::foundation::core::{Component, Rgba4, Rgba8, level_to_u8};

/// Causal inputs for solving the pixel at `(x, y)`.
///
/// Corner order everywhere is up-left `(x-1, y-1)`, up `(x, y-1)`, left `(x-1, y)`, and for the
/// source the current pixel `(x, y)` last. Front and back carry only the three decided corners;
/// their value at `(x, y)` is the unknown being solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood {
    pub source: [Rgba8; 4],
    pub front: [Rgba4; 3],
    pub back: [Rgba4; 3],
}

impl Neighborhood {
    /// The ten causal taps of one component, at the shared fixed-point scale (0..=255).
    pub fn taps(&self, c: Component) -> ChannelTaps {
        ChannelTaps {
            source: self.source.map(|px| i64::from(px.component(c))),
            front: self.front.map(|px| i64::from(level_to_u8(px.component(c)))),
            back: self.back.map(|px| i64::from(level_to_u8(px.component(c)))),
        }
    }

    /// The current source pixel.
    pub fn current(&self) -> Rgba8 {
        self.source[3]
    }
}

/// Ten causal samples of a single component, each in 0..=255.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelTaps {
    pub source: [i64; 4],
    pub front: [i64; 3],
    pub back: [i64; 3],
}

/// One candidate quantization of a single channel at the current pixel, as 4-bit levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trial {
    pub alpha_front: u8,
    pub alpha_back: u8,
    pub color_front: u8,
    pub color_back: u8,
}
