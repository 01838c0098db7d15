use super::*;
use crate::grammar::tokenize;

fn check(token: &str, config: &Config) -> Result<ValidatedParameters, Issues> {
    validate(&tokenize(token).unwrap(), config)
}

#[test]
fn width_only_applies_every_default() {
    let cfg = Config {
        default_format: Format::Png,
        ..Config::default()
    };
    let p = check("300", &cfg).unwrap();
    assert_eq!(p.width(), 300);
    assert_eq!(p.height(), 300);
    assert_eq!(p.dpr(), Dpr::ONE);
    assert_eq!(p.format(), Format::Png);
    assert!(!p.dark());
}

#[test]
fn explicit_height_is_kept() {
    let p = check("300x200", &Config::default()).unwrap();
    assert_eq!((p.width(), p.height()), (300, 200));
}

#[test]
fn bounds_are_inclusive_and_never_clamped() {
    let cfg = Config::default();
    let p = check("1600x1600@5x", &cfg).unwrap();
    assert_eq!((p.width(), p.height()), (1600, 1600));

    let issues = check("1601", &cfg).unwrap_err();
    assert_eq!(issues.len(), 1);
    let issue = &issues.as_slice()[0];
    assert_eq!(issue.field, Field::Width);
    assert_eq!(issue.kind, IssueKind::OutOfRange);
    assert_eq!(issue.constraint, Constraint::Maximum("1600".to_string()));
    assert_eq!(issue.value, "1601");
}

#[test]
fn width_and_height_have_separate_maxima() {
    let cfg = Config {
        max_width: 100,
        max_height: 50,
        ..Config::default()
    };
    assert!(check("100x50", &cfg).is_ok());
    assert_eq!(check("50x100", &cfg).unwrap_err().fields(), vec![Field::Height]);
    assert_eq!(check("50", &cfg).unwrap().height(), 50);
}

#[test]
fn defaulted_height_is_bounded_by_max_height() {
    let cfg = Config {
        max_width: 100,
        max_height: 50,
        ..Config::default()
    };
    let issues = check("80", &cfg).unwrap_err();
    assert_eq!(issues.fields(), vec![Field::Height]);
    let issue = &issues.as_slice()[0];
    assert_eq!(issue.kind, IssueKind::OutOfRange);
    assert_eq!(issue.constraint, Constraint::Maximum("50".to_string()));
    assert_eq!(issue.value, "80");

    // An invalid width is reported once, not again as the copied height.
    assert_eq!(check("101", &cfg).unwrap_err().fields(), vec![Field::Width]);
}

#[test]
fn zero_is_not_positive() {
    let issues = check("0x0@0x", &Config::default()).unwrap_err();
    assert_eq!(
        issues.fields(),
        vec![Field::Width, Field::Height, Field::Dpr]
    );
    assert!(issues.iter().all(|i| i.constraint == Constraint::Positive));

    let issues = check("10@0.0x", &Config::default()).unwrap_err();
    assert_eq!(issues.fields(), vec![Field::Dpr]);
}

#[test]
fn oversized_digit_runs_are_out_of_range() {
    let issues = check("99999999999999999999x1", &Config::default()).unwrap_err();
    assert_eq!(issues.fields(), vec![Field::Width]);
    assert_eq!(issues.as_slice()[0].kind, IssueKind::OutOfRange);

    let issues = check("1@99999999999x", &Config::default()).unwrap_err();
    assert_eq!(issues.fields(), vec![Field::Dpr]);
    assert_eq!(issues.as_slice()[0].kind, IssueKind::OutOfRange);
}

#[test]
fn fractional_dpr_is_bounded_by_max() {
    let cfg = Config {
        max_dpr: Dpr::from_tenths(25),
        ..Config::default()
    };
    assert_eq!(check("10@2.5x", &cfg).unwrap().dpr(), Dpr::from_tenths(25));
    let issues = check("10@2.6x", &cfg).unwrap_err();
    assert_eq!(
        issues.as_slice()[0].constraint,
        Constraint::Maximum("2.5".to_string())
    );
}

#[test]
fn unknown_and_unsupported_formats() {
    let issues = check("300.bmp", &Config::default()).unwrap_err();
    assert_eq!(issues.len(), 1);
    let issue = &issues.as_slice()[0];
    assert_eq!(issue.field, Field::Format);
    assert_eq!(issue.kind, IssueKind::UnsupportedFormat);
    assert_eq!(issue.value, "bmp");

    // Case-sensitive.
    assert_eq!(
        check("300.PNG", &Config::default()).unwrap_err().fields(),
        vec![Field::Format]
    );

    // Known to the registry but switched off in config.
    let cfg = Config {
        supported_formats: [Format::Svg, Format::Png].into_iter().collect(),
        ..Config::default()
    };
    let issues = check("300.avif", &cfg).unwrap_err();
    assert_eq!(
        issues.as_slice()[0].constraint,
        Constraint::OneOf("svg, png".to_string())
    );
}

#[test]
fn issues_accumulate_in_field_order() {
    let issues = check("2000x10@9x", &Config::default()).unwrap_err();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues.fields(), vec![Field::Width, Field::Dpr]);

    let issues = check("2000x2000@9x.gif", &Config::default()).unwrap_err();
    assert_eq!(
        issues.fields(),
        vec![Field::Width, Field::Height, Field::Dpr, Field::Format]
    );
}

#[test]
fn failed_width_does_not_duplicate_into_defaulted_height() {
    let issues = check("5000", &Config::default()).unwrap_err();
    assert_eq!(issues.fields(), vec![Field::Width]);
}

#[test]
fn dark_marker_maps_to_flag() {
    assert!(check("300/dark", &Config::default()).unwrap().dark());
    assert!(!check("300", &Config::default()).unwrap().dark());
}

#[test]
fn dpr_syntax_errors_from_hand_built_fields_are_reported() {
    let raw = RawFields {
        width: "10".to_string(),
        dpr: Some("1.25".to_string()),
        ..RawFields::default()
    };
    let issues = validate(&raw, &Config::default()).unwrap_err();
    assert_eq!(issues.as_slice()[0].kind, IssueKind::MalformedToken);
}

#[test]
fn issues_serialize_as_json_objects() {
    let issues = check("2000@9x", &Config::default()).unwrap_err();
    let v = serde_json::to_value(&issues).unwrap();
    assert_eq!(
        v,
        serde_json::json!([
            {
                "field": "width",
                "constraint": "must be at most 1600",
                "value": "2000",
                "code": "out_of_range"
            },
            {
                "field": "dpr",
                "constraint": "must be at most 5",
                "value": "9",
                "code": "out_of_range"
            }
        ])
    );
}

#[test]
fn malformed_token_converts_to_single_token_issue() {
    let issues = Issues::from(tokenize("abc").unwrap_err());
    assert_eq!(issues.fields(), vec![Field::Token]);
    assert_eq!(issues.as_slice()[0].kind, IssueKind::MalformedToken);
    assert_eq!(issues.as_slice()[0].value, "abc");
    assert!(issues.to_string().contains("expected width digits at byte 0"));
}
