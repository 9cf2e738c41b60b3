use crate::foundation::error::{SplitError, SplitResult};

/// Highest value a 4-bit level can take.
pub const MAX_LEVEL: u8 = 15;

/// Scale from a 4-bit level to the 8-bit domain (`15 * 17 == 255`).
pub const LEVEL_SCALE: u8 = 17;

/// Promote a 4-bit level to 8 bits by multiplying with 17.
pub fn level_to_u8(level: u8) -> u8 {
    level.min(MAX_LEVEL) * LEVEL_SCALE
}

/// Nearest 4-bit level for an 8-bit value.
pub fn nearest_level(v: u8) -> u8 {
    ((u16::from(v) + 8) / u16::from(LEVEL_SCALE)) as u8
}

/// One of the four RGBA components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Component {
    /// The colour components, in evaluation order.
    pub const COLORS: [Component; 3] = [Component::Red, Component::Green, Component::Blue];
}

/// Straight-alpha RGBA8, as decoded from the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black, the out-of-canvas sentinel.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn component(self, c: Component) -> u8 {
        match c {
            Component::Red => self.r,
            Component::Green => self.g,
            Component::Blue => self.b,
            Component::Alpha => self.a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }
}

/// Straight-alpha RGBA with 4-bit levels (0..=15) per component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba4 {
    /// Build a pixel from four levels, rejecting anything above [`MAX_LEVEL`].
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> SplitResult<Self> {
        if [r, g, b, a].iter().any(|&v| v > MAX_LEVEL) {
            return Err(SplitError::validation(format!(
                "4-bit levels must be <= {MAX_LEVEL}, got ({r}, {g}, {b}, {a})"
            )));
        }
        Ok(Self { r, g, b, a })
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn component(self, c: Component) -> u8 {
        match c {
            Component::Red => self.r,
            Component::Green => self.g,
            Component::Blue => self.b,
            Component::Alpha => self.a,
        }
    }

    /// Expand to the 8-bit palette `{0, 17, ..., 255}`.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(
            level_to_u8(self.r),
            level_to_u8(self.g),
            level_to_u8(self.b),
            level_to_u8(self.a),
        )
    }

    /// Inverse of [`Rgba4::to_rgba8`]; fails unless every component is a multiple of 17.
    pub fn from_rgba8_exact(px: Rgba8) -> SplitResult<Self> {
        let level = |v: u8| -> SplitResult<u8> {
            if v % LEVEL_SCALE != 0 {
                return Err(SplitError::validation(format!(
                    "value {v} is not on the 4-bit palette"
                )));
            }
            Ok(v / LEVEL_SCALE)
        };
        Ok(Self {
            r: level(px.r)?,
            g: level(px.g)?,
            b: level(px.b)?,
            a: level(px.a)?,
        })
    }
}

/// Row-major 2-D pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy + Default> Raster<T> {
    /// Allocate a `width x height` buffer filled with `T::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: vec![T::default(); len],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> SplitResult<Self> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(SplitError::validation(format!(
                "raster {width}x{height} needs {expected} pixels, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Pixel at `(x, y)`; `None` outside the canvas.
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Pixel at signed coordinates, with `T::default()` for anything off-canvas.
    pub fn tap(&self, x: i64, y: i64) -> T {
        if !self.contains(x, y) {
            return T::default();
        }
        self.data[self.index(x as u32, y as u32)]
    }

    pub fn set(&mut self, x: u32, y: u32, px: T) -> SplitResult<()> {
        if x >= self.width || y >= self.height {
            return Err(SplitError::validation(format!(
                "pixel ({x}, {y}) is outside a {}x{} raster",
                self.width, self.height
            )));
        }
        let idx = self.index(x, y);
        self.data[idx] = px;
        Ok(())
    }

    pub fn pixels(&self) -> &[T] {
        &self.data
    }

    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Raster<U> {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&px| f(px)).collect(),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
