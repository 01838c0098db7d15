use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = Config::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.max_width, 1600);
    assert_eq!(cfg.max_dpr, Dpr::from_tenths(50));
    assert_eq!(cfg.default_format, Format::Svg);
    assert_eq!(cfg.supported_names(), "svg, png, jpeg, webp, avif");
}

#[test]
fn default_format_must_be_supported() {
    let cfg = Config {
        default_format: Format::Avif,
        supported_formats: [Format::Svg, Format::Png].into_iter().collect(),
        ..Config::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("default_format 'avif'"));
}

#[test]
fn zero_bounds_are_rejected() {
    for cfg in [
        Config {
            max_width: 0,
            ..Config::default()
        },
        Config {
            max_height: 0,
            ..Config::default()
        },
        Config {
            max_dpr: Dpr::from_tenths(0),
            ..Config::default()
        },
        Config {
            supported_formats: BTreeSet::new(),
            ..Config::default()
        },
    ] {
        assert!(matches!(cfg.validate(), Err(PlaceholdError::Config(_))));
    }
}

#[test]
fn json_partial_overrides_keep_defaults() {
    let dir = std::path::PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("partial.json");
    std::fs::write(
        &path,
        r#"{ "max_width": 3200, "max_dpr": 2.5, "supported_formats": ["svg", "png"] }"#,
    )
    .unwrap();

    let cfg = Config::from_json_file(&path).unwrap();
    assert_eq!(cfg.max_width, 3200);
    assert_eq!(cfg.max_height, 1600);
    assert_eq!(cfg.max_dpr, Dpr::from_tenths(25));
    assert!(cfg.is_supported(Format::Png));
    assert!(!cfg.is_supported(Format::Webp));
}

#[test]
fn json_unknown_keys_are_rejected() {
    let dir = std::path::PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("unknown.json");
    std::fs::write(&path, r#"{ "dimension_max": 10 }"#).unwrap();

    assert!(matches!(
        Config::from_json_file(&path),
        Err(PlaceholdError::Config(_))
    ));
}

#[test]
fn limits_must_fit_the_largest_canvas() {
    // 3300 * 5 = 16500 device pixels
    let cfg = Config {
        max_width: 3300,
        ..Config::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("16500x8000"), "{err}");

    let cfg = Config {
        max_height: 4000,
        max_dpr: Dpr::from_tenths(41),
        ..Config::default()
    };
    assert!(matches!(cfg.validate(), Err(PlaceholdError::Config(_))));

    // Exactly at the limit is fine.
    let cfg = Config {
        max_width: 16_384,
        max_height: 16_384,
        max_dpr: Dpr::ONE,
        ..Config::default()
    };
    assert!(cfg.validate().is_ok());
}
