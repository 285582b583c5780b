use super::*;

#[test]
fn every_curve_hits_endpoints() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease}");
    }
}

#[test]
fn progress_is_clamped() {
    assert_eq!(Ease::OutCirc.apply(-3.0), 0.0);
    assert_eq!(Ease::OutQuad.apply(7.0), 1.0);
}

#[test]
fn out_curves_lead_linear() {
    for ease in [Ease::OutQuad, Ease::OutCubic, Ease::OutCirc] {
        assert!(ease.apply(0.3) > 0.3, "{ease}");
    }
    assert_eq!(Ease::OutQuad.apply(0.5), 0.75);
    assert_eq!(Ease::OutCubic.apply(0.5), 0.875);
    assert!((Ease::OutCirc.apply(0.5) - 0.75f64.sqrt()).abs() < 1e-12);
}

#[test]
fn names_round_trip() {
    for ease in Ease::ALL {
        assert_eq!(Ease::from_name(ease.name()).unwrap(), ease);
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
}

#[test]
fn bare_family_names_mean_out() {
    assert_eq!(Ease::from_name("power1").unwrap(), Ease::OutQuad);
    assert_eq!(Ease::from_name("circ").unwrap(), Ease::OutCirc);
    assert_eq!("linear".parse::<Ease>().unwrap(), Ease::Linear);
}

#[test]
fn json_accepts_every_parseable_name() {
    for (name, ease) in [
        ("power1", Ease::OutQuad),
        ("power2", Ease::OutCubic),
        ("circ", Ease::OutCirc),
        ("linear", Ease::Linear),
        ("power2.inOut", Ease::InOutCubic),
    ] {
        let parsed: Ease = serde_json::from_str(&format!("\"{name}\"")).unwrap();
        assert_eq!(parsed, ease, "{name}");
    }
    assert!(serde_json::from_str::<Ease>("\"bounce.out\"").is_err());
}

#[test]
fn unknown_name_is_animation_error() {
    let err = Ease::from_name("elastic.out(1, 0.3)").unwrap_err();
    assert!(matches!(err, crate::TitlecardError::Animation(_)));
}
