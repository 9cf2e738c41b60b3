use super::*;

fn eval<const N: usize>(p: &Patch<N>, u: f64, v: f64) -> f64 {
    let n = (N - 1) as i32;
    let mut acc = 0.0;
    for (i, row) in p.coeffs().iter().enumerate() {
        for (j, &c) in row.iter().enumerate() {
            let (i, j) = (i as i32, j as i32);
            acc += c as f64
                * u.powi(i)
                * (1.0 - u).powi(n - i)
                * v.powi(j)
                * (1.0 - v).powi(n - j);
        }
    }
    acc
}

fn unit() -> Bilinear {
    Bilinear::from_corners([1; 4])
}

fn lift(b: &Bilinear) -> Cubic {
    let q: Quadratic = b.mul(&unit());
    q.mul(&unit())
}

#[test]
fn bilinear_corners_land_on_unit_square_corners() {
    let p = Bilinear::from_corners([3, 5, 7, 11]);
    assert_eq!(eval(&p, 0.0, 0.0), 3.0);
    assert_eq!(eval(&p, 1.0, 0.0), 5.0);
    assert_eq!(eval(&p, 0.0, 1.0), 7.0);
    assert_eq!(eval(&p, 1.0, 1.0), 11.0);
}

#[test]
fn product_matches_pointwise_product() {
    let a = Bilinear::from_corners([3, -5, 7, 2]);
    let b = Bilinear::from_corners([-1, 4, 0, 9]);
    let c = Bilinear::from_corners([6, 6, -2, 1]);
    let ab: Quadratic = a.mul(&b);
    let abc: Cubic = ab.mul(&c);
    for &(u, v) in &[(0.0, 0.0), (0.25, 0.75), (0.5, 0.5), (0.9, 0.1), (1.0, 1.0)] {
        let want = eval(&a, u, v) * eval(&b, u, v) * eval(&c, u, v);
        assert!((eval(&abc, u, v) - want).abs() < 1e-9);
    }
}

#[test]
fn constant_one_integrates_to_denominator() {
    let one = lift(&unit());
    assert_eq!(
        one.inner(&one),
        i128::from(INTEGRAL_DENOM) * i128::from(INTEGRAL_DENOM)
    );
}

#[test]
fn corner_basis_integrates_exactly() {
    // (uv)^2 over the unit square is 1/9.
    let uv = lift(&Bilinear::current_corner());
    let denom = i128::from(INTEGRAL_DENOM).pow(2);
    assert_eq!(uv.inner(&uv) * 9, denom);
    // uv * 1 is 1/4.
    let one = lift(&unit());
    assert_eq!(uv.inner(&one) * 4, denom);
}

#[test]
fn inner_is_symmetric() {
    let a = lift(&Bilinear::from_corners([200, 17, 0, 255]));
    let b: Quadratic = Bilinear::from_corners([34, 0, 255, 51]).mul(&Bilinear::one());
    let b: Cubic = b.mul(&Bilinear::from_corners([0, 85, 170, 255]));
    assert_eq!(a.inner(&b), b.inner(&a));
}

#[test]
fn add_sub_neg_are_coefficient_wise() {
    let a = Bilinear::from_corners([1, 2, 3, 4]);
    let b = Bilinear::from_corners([10, 20, 30, 40]);
    assert_eq!(a.add(&b), Bilinear::from_corners([11, 22, 33, 44]));
    assert_eq!(b.sub(&a), Bilinear::from_corners([9, 18, 27, 36]));
    assert_eq!(a.neg().add(&a), Bilinear::ZERO);
}
