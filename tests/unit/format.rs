use super::*;

#[test]
fn registry_matches_all_order() {
    let formats: Vec<Format> = REGISTRY.iter().map(|(f, _)| *f).collect();
    assert_eq!(formats, Format::ALL.to_vec());
    for (f, entry) in REGISTRY.iter() {
        assert_eq!(*entry, f.entry());
    }
}

#[test]
fn only_svg_is_text() {
    for f in Format::ALL {
        assert_eq!(f.entry().is_binary, f != Format::Svg, "{f}");
        assert_eq!(f.raster_target().is_none(), f == Format::Svg, "{f}");
    }
}

#[test]
fn webp_is_real_webp() {
    assert_eq!(Format::Webp.entry().media_type, "image/webp");
    assert_eq!(
        Format::Webp.raster_target(),
        Some(RasterTarget::WebpLossless)
    );
}

#[test]
fn lookup_is_case_sensitive() {
    assert_eq!("png".parse::<Format>().unwrap(), Format::Png);
    assert_eq!(
        "PNG".parse::<Format>(),
        Err(UnknownFormat("PNG".to_string()))
    );
    assert!(lookup("jpg").is_none());
    assert!(lookup("heif").is_none());
    assert!(lookup("jxl").is_none());
}

#[test]
fn names_round_trip_through_display_and_serde() {
    for f in Format::ALL {
        assert_eq!(f.to_string().parse::<Format>().unwrap(), f);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, format!("\"{}\"", f.name()));
        assert_eq!(serde_json::from_str::<Format>(&json).unwrap(), f);
    }
}
