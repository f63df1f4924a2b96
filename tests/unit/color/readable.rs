use super::*;

fn hex(s: &str) -> Rgb {
    Rgb::from_hex(s).unwrap()
}

#[test]
fn near_black_background_gets_light_text() {
    let bg = [hex("#101010")];
    let avg = weighted_luminance(&bg);
    assert!(avg < 0.05);
    let c = select_text_color(&bg);
    assert!(c.luminance() > 0.5, "{c} should be light");
    assert!(c.to_hsl().l >= 0.75);
}

#[test]
fn near_white_background_gets_dark_text() {
    let c = select_text_color(&[hex("#FAFAFA")]);
    assert!(c.luminance() < 0.5, "{c} should be dark");
}

#[test]
fn result_is_readable_or_fallback() {
    let mut rng = rand::rng();
    for _ in 0..300 {
        let swatches: Vec<Rgb> = (0..3).map(|_| Rgb::random(&mut rng)).collect();
        let c = select_text_color(&swatches);
        let cr = contrast_ratio(c.luminance(), weighted_luminance(&swatches));
        assert!(
            cr >= MIN_CONTRAST || c == Rgb::BLACK || c == Rgb::WHITE,
            "{c} over {swatches:?} has contrast {cr}"
        );
    }
}

#[test]
fn selection_is_deterministic() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let swatches: Vec<Rgb> = (0..3).map(|_| Rgb::random(&mut rng)).collect();
        assert_eq!(select_text_color(&swatches), select_text_color(&swatches));
    }
}

#[test]
fn dominant_swatch_outweighs_the_rest() {
    let w = weighted_luminance(&[Rgb::WHITE, Rgb::BLACK]);
    assert!((w - 1.0 / 1.7).abs() < 1e-12);
    let w = weighted_luminance(&[Rgb::BLACK, Rgb::WHITE]);
    assert!((w - 0.7 / 1.7).abs() < 1e-12);
}

#[test]
fn mid_grey_falls_back_or_passes_gate() {
    // Mid grey sits where neither extreme gets a large margin.
    let bg = [hex("#777777")];
    let c = select_text_color(&bg);
    let cr = contrast_ratio(c.luminance(), weighted_luminance(&bg));
    assert!(cr >= MIN_CONTRAST || c == Rgb::BLACK || c == Rgb::WHITE);
}

#[test]
fn empty_swatches_fall_back_to_white() {
    assert_eq!(select_text_color(&[]), Rgb::WHITE);
}
