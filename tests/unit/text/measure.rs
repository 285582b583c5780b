use super::*;
use crate::foundation::error::TitlecardError;

struct Counting {
    calls: u32,
}

impl TextMeasurer for Counting {
    fn measure_width(
        &mut self,
        text: &str,
        _weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        self.calls += 1;
        if text == "fail" {
            return Err(TitlecardError::measurement_unavailable("not loaded"));
        }
        Ok(size_px * text.len() as f64)
    }
}

#[test]
fn weights_map_to_css_values() {
    assert_eq!(FontWeight::Regular.value(), 400);
    assert_eq!(FontWeight::Bold.value(), 700);
    assert_eq!(FontWeight::ExtraBold.value(), 800);
}

#[test]
fn heuristic_is_linear_in_size_and_length() {
    let mut m = HeuristicMeasurer::default();
    let a = m.measure_width("ABCD", FontWeight::Bold, 10.0).unwrap();
    let b = m.measure_width("ABCD", FontWeight::Bold, 20.0).unwrap();
    let c = m.measure_width("ABCDABCD", FontWeight::Bold, 10.0).unwrap();
    assert!((a - 24.0).abs() < 1e-9);
    assert!((b - 2.0 * a).abs() < 1e-9);
    assert!((c - 2.0 * a).abs() < 1e-9);
    assert_eq!(m.measure_width("", FontWeight::Regular, 99.0).unwrap(), 0.0);
}

#[test]
fn heavier_weights_are_wider() {
    let mut m = HeuristicMeasurer::default();
    let r = m.measure_width("TITLE", FontWeight::Regular, 50.0).unwrap();
    let b = m.measure_width("TITLE", FontWeight::Bold, 50.0).unwrap();
    let x = m.measure_width("TITLE", FontWeight::ExtraBold, 50.0).unwrap();
    assert!(r < b && b < x);
}

#[test]
fn cache_returns_identical_widths_without_remeasuring() {
    let mut m = CachedMeasurer::new(Counting { calls: 0 });
    let a = m.measure_width("abc", FontWeight::Bold, 12.0).unwrap();
    let b = m.measure_width("abc", FontWeight::Bold, 12.0).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
    assert_eq!(m.inner().calls, 1);
    assert_eq!(m.hits(), 1);

    m.measure_width("abc", FontWeight::Regular, 12.0).unwrap();
    m.measure_width("abc", FontWeight::Bold, 13.0).unwrap();
    assert_eq!(m.inner().calls, 3);
    assert_eq!(m.len(), 3);

    m.clear();
    assert!(m.is_empty());
}

#[test]
fn cache_does_not_store_failures() {
    let mut m = CachedMeasurer::new(Counting { calls: 0 });
    assert!(m.measure_width("fail", FontWeight::Bold, 12.0).is_err());
    assert!(m.measure_width("fail", FontWeight::Bold, 12.0).is_err());
    assert_eq!(m.inner().calls, 2);
    assert!(m.is_empty());
}

#[test]
fn cache_size_stays_within_capacity() {
    let mut m = CachedMeasurer::with_capacity(Counting { calls: 0 }, 4);
    assert_eq!(m.capacity(), 4);
    for i in 0..10 {
        m.measure_width(&format!("w{i}"), FontWeight::Bold, 12.0)
            .unwrap();
        assert!(m.len() <= 4);
    }
    assert_eq!(m.inner().calls, 10);

    // The most recent width survives the reset.
    m.measure_width("w9", FontWeight::Bold, 12.0).unwrap();
    assert_eq!(m.inner().calls, 10);
    assert_eq!(m.hits(), 1);
}

#[test]
fn zero_capacity_still_caches_the_last_width() {
    let mut m = CachedMeasurer::with_capacity(Counting { calls: 0 }, 0);
    assert_eq!(m.capacity(), 1);
    m.measure_width("a", FontWeight::Regular, 10.0).unwrap();
    m.measure_width("a", FontWeight::Regular, 10.0).unwrap();
    assert_eq!(m.inner().calls, 1);
    m.measure_width("b", FontWeight::Regular, 10.0).unwrap();
    assert_eq!(m.len(), 1);
}
