use super::*;

#[test]
fn int_range_samples_stay_inclusive() {
    let r = IntRange::new(3, 5);
    let mut rng = rand::rng();
    let mut seen = [false; 3];
    for _ in 0..500 {
        let v = r.sample(&mut rng);
        assert!(r.contains(v));
        seen[(v - 3) as usize] = true;
    }
    assert!(seen.iter().all(|&s| s), "both bounds must be reachable");
}

#[test]
fn degenerate_ranges_yield_min() {
    let mut rng = rand::rng();
    assert_eq!(IntRange::new(7, 7).sample(&mut rng), 7);
    assert_eq!(FloatRange::new(1.5, 1.5).sample(&mut rng), 1.5);
}

#[test]
fn inverted_ranges_fail_validation() {
    assert!(IntRange::new(5, 3).validate("width").is_err());
    assert!(FloatRange::new(1.0, -1.0).validate("size").is_err());
    assert!(FloatRange::new(f64::NAN, 1.0).validate("size").is_err());
    assert!(FloatRange::symmetric(7.0).validate("angle").is_ok());
}

#[test]
fn float_range_width_must_be_finite() {
    assert!(FloatRange::new(-1e308, 1e308).validate("angle").is_err());
    assert!(FloatRange::new(f64::MIN, 0.0).validate("angle").is_ok());
    assert!(FloatRange::new(-1e300, 1e300).validate("angle").is_ok());
}

#[test]
fn probability_bounds() {
    assert!(Probability::new(-0.1).is_err());
    assert!(Probability::new(1.1).is_err());
    assert!(Probability::new(f64::NAN).is_err());

    let mut rng = rand::rng();
    for _ in 0..1000 {
        assert!(!Probability::NEVER.roll(&mut rng));
        assert!(Probability::ALWAYS.roll(&mut rng));
    }
}

#[test]
fn probability_deserializes_with_validation() {
    let p: Probability = serde_json::from_str("0.25").unwrap();
    assert_eq!(p.get(), 0.25);
    assert!(serde_json::from_str::<Probability>("2.0").is_err());
}

#[test]
fn canvas_rejects_zero_and_centers() {
    assert!(Canvas::new(0, 10).is_err());
    let c = Canvas::new(400, 300).unwrap();
    assert_eq!(c.center(), kurbo::Point::new(200.0, 150.0));
}
