//! Exact tensor-product polynomials over the unit square.
//!
//! A `Patch<N>` stores the coefficients of a polynomial of degree `N - 1` in each of `u` and `v`
//! in the *unscaled* Bernstein basis:
//!
//! ```text
//! p(u, v) = sum_{i,j} c[i][j] * u^i (1-u)^(N-1-i) * v^j (1-v)^(N-1-j)
//! ```
//!
//! In this basis a bilinear interpolant's coefficients are its four corner samples, and the
//! product of two patches is the plain 2-D convolution of their coefficient grids. No binomial
//! weights appear, so products of integer samples stay integer.
//!
//! Integration uses `integral u^i (1-u)^(n-i) du = i!(n-i)!/(n+1)!`. For the degree-6 integrand
//! of a squared degree-3 error this gives the weights `GAMMA[i] = i!(6-i)!` and the common
//! denominator `7!^2`, which is dropped: [`Cubic::inner`] returns the integral scaled by `7!^2`.

/// `i!(6-i)!` for `i = 0..=6`.
pub const GAMMA: [i64; 7] = [720, 120, 48, 36, 48, 120, 720];

/// `7!`, the per-axis denominator dropped from [`Cubic::inner`].
pub const INTEGRAL_DENOM: i64 = 5040;

/// Integer value of the constant field `1` at the fixed-point scale of one tap.
pub const ONE: i64 = 255;

/// Coefficient grid of a tensor-product polynomial, see the module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patch<const N: usize> {
    c: [[i64; N]; N],
}

/// Degree (1,1): the bilinear interpolant of four corner samples.
pub type Bilinear = Patch<2>;
/// Degree (2,2).
pub type Quadratic = Patch<3>;
/// Degree (3,3), the degree of every error term before squaring.
pub type Cubic = Patch<4>;

impl<const N: usize> Patch<N> {
    pub const ZERO: Self = Self { c: [[0; N]; N] };

    pub fn coeffs(&self) -> &[[i64; N]; N] {
        &self.c
    }

    /// Convolve two patches. `R` must equal `N + M - 1`.
    pub fn mul<const M: usize, const R: usize>(&self, rhs: &Patch<M>) -> Patch<R> {
        debug_assert_eq!(R, N + M - 1, "patch product degree mismatch");
        let mut out = [[0i64; R]; R];
        for (i, row) in self.c.iter().enumerate() {
            for (j, &a) in row.iter().enumerate() {
                if a == 0 {
                    continue;
                }
                for (k, rrow) in rhs.c.iter().enumerate() {
                    for (l, &b) in rrow.iter().enumerate() {
                        out[i + k][j + l] += a * b;
                    }
                }
            }
        }
        Patch { c: out }
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let mut out = self.c;
        for (orow, rrow) in out.iter_mut().zip(rhs.c.iter()) {
            for (o, r) in orow.iter_mut().zip(rrow.iter()) {
                *o += r;
            }
        }
        Self { c: out }
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    pub fn neg(&self) -> Self {
        let mut out = self.c;
        for v in out.iter_mut().flatten() {
            *v = -*v;
        }
        Self { c: out }
    }
}

impl Bilinear {
    /// Bilinear interpolant through `[p00, p10, p01, p11]`, indexed `(u, v)`.
    ///
    /// Corner order matches the causal taps: up-left, up, left, current.
    pub fn from_corners(corners: [i64; 4]) -> Self {
        Self {
            c: [[corners[0], corners[2]], [corners[1], corners[3]]],
        }
    }

    /// The constant field `1` at tap scale.
    pub fn one() -> Self {
        Self::from_corners([ONE; 4])
    }

    /// The unit interpolant of the current-pixel corner alone.
    pub fn current_corner() -> Self {
        Self::from_corners([0, 0, 0, 1])
    }
}

impl Cubic {
    /// `H * self * H` with the Hankel matrix `H[a][b] = GAMMA[a + b]`.
    ///
    /// Pairing a patch with the dual of another through [`Cubic::dot`] integrates their product,
    /// so a dual can be computed once and reused against many partners.
    pub fn dual(&self) -> Cubic {
        let mut tmp = [[0i64; 4]; 4];
        for (a, trow) in tmp.iter_mut().enumerate() {
            for (j, t) in trow.iter_mut().enumerate() {
                *t = (0..4).map(|i| GAMMA[a + i] * self.c[i][j]).sum();
            }
        }
        let mut out = [[0i64; 4]; 4];
        for (a, orow) in out.iter_mut().enumerate() {
            for (b, o) in orow.iter_mut().enumerate() {
                *o = (0..4).map(|j| tmp[a][j] * GAMMA[j + b]).sum();
            }
        }
        Patch { c: out }
    }

    /// Coefficient-wise dot product, widened to `i128`.
    pub fn dot(&self, rhs: &Cubic) -> i128 {
        self.c
            .iter()
            .flatten()
            .zip(rhs.c.iter().flatten())
            .map(|(&a, &b)| i128::from(a) * i128::from(b))
            .sum()
    }

    /// `7!^2 * integral over [0,1]^2 of self * rhs`.
    pub fn inner(&self, rhs: &Cubic) -> i128 {
        self.dot(&rhs.dual())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/patch.rs"]
mod tests;
