use super::*;

#[test]
fn levels_expand_to_even_palette() {
    assert_eq!(level_to_u8(0), 0);
    assert_eq!(level_to_u8(8), 136);
    assert_eq!(level_to_u8(15), 255);
    assert_eq!(level_to_u8(200), 255);
}

#[test]
fn nearest_level_rounds_to_closest_palette_entry() {
    assert_eq!(nearest_level(128), 8);
    assert_eq!(nearest_level(8), 0);
    assert_eq!(nearest_level(9), 1);
    assert_eq!(nearest_level(255), 15);
    for v in 0..=255u8 {
        let l = nearest_level(v);
        assert!(l <= MAX_LEVEL);
        let here = (i32::from(level_to_u8(l)) - i32::from(v)).abs();
        if l > 0 {
            assert!(here <= (i32::from(level_to_u8(l - 1)) - i32::from(v)).abs());
        }
        if l < MAX_LEVEL {
            assert!(here <= (i32::from(level_to_u8(l + 1)) - i32::from(v)).abs());
        }
    }
}

#[test]
fn rgba4_rejects_out_of_range_levels() {
    assert!(Rgba4::new(15, 0, 7, 15).is_ok());
    assert!(Rgba4::new(16, 0, 0, 0).is_err());
}

#[test]
fn rgba4_palette_roundtrip_is_exact() {
    let px = Rgba4::new(1, 8, 14, 15).unwrap();
    assert_eq!(px.to_rgba8(), Rgba8::new(17, 136, 238, 255));
    assert_eq!(Rgba4::from_rgba8_exact(px.to_rgba8()).unwrap(), px);
    assert!(Rgba4::from_rgba8_exact(Rgba8::new(18, 0, 0, 0)).is_err());
}

#[test]
fn raster_taps_outside_canvas_are_transparent() {
    let r = Raster::from_fn(2, 1, |x, _| Rgba8::new(x as u8 + 1, 0, 0, 255));
    assert_eq!(r.tap(0, 0), Rgba8::new(1, 0, 0, 255));
    assert_eq!(r.tap(1, 0), Rgba8::new(2, 0, 0, 255));
    assert_eq!(r.tap(-1, 0), Rgba8::transparent());
    assert_eq!(r.tap(0, -1), Rgba8::transparent());
    assert_eq!(r.tap(2, 0), Rgba8::transparent());
    assert_eq!(r.get(2, 0), None);
}

#[test]
fn raster_set_rejects_out_of_bounds() {
    let mut r = Raster::<Rgba4>::new(1, 1);
    r.set(0, 0, Rgba4::new(1, 2, 3, 4).unwrap()).unwrap();
    assert_eq!(r.get(0, 0), Some(Rgba4::new(1, 2, 3, 4).unwrap()));
    assert!(r.set(1, 0, Rgba4::transparent()).is_err());
}

#[test]
fn raster_from_vec_checks_length() {
    assert!(Raster::from_vec(2, 2, vec![Rgba8::transparent(); 3]).is_err());
    assert!(Raster::from_vec(2, 2, vec![Rgba8::transparent(); 4]).is_ok());
}
