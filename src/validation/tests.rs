use super::*;
use crate::diagram::{BarreChord, DifficultyLevel, StringPosition};
use crate::instrument::InstrumentType;
use crate::transform::{create, create_with_barre};

fn c_major() -> ChordDiagram {
    create(
        "C",
        InstrumentType::Guitar,
        vec![
            StringPosition::muted(1),
            StringPosition::fretted(2, 3, 3),
            StringPosition::fretted(3, 2, 2),
            StringPosition::open(4),
            StringPosition::fretted(5, 1, 1),
            StringPosition::open(6),
        ],
    )
}

fn f_barre() -> ChordDiagram {
    create_with_barre(
        "F",
        InstrumentType::Guitar,
        vec![
            StringPosition::fretted(1, 1, 1).with_barre(6),
            StringPosition::fretted(2, 3, 3),
            StringPosition::fretted(3, 3, 4),
            StringPosition::fretted(4, 2, 2),
            StringPosition::fretted(5, 1, 1).with_barre(6),
            StringPosition::fretted(6, 1, 1).with_barre(6),
        ],
        Some(BarreChord {
            fret: 1,
            finger: 1,
            start_string: 1,
            end_string: 6,
            is_partial: false,
        }),
    )
}

#[test]
fn test_open_c_is_clean() {
    let result = validate(&c_major());
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    assert_eq!(result.score, 1.0);
}

#[test]
fn test_barre_chord_is_clean() {
    let result = validate(&f_barre());
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert_eq!(result.score, 1.0, "warnings: {:?}", result.warnings);
}

#[test]
fn test_same_finger_two_frets_is_one_conflict() {
    let mut d = c_major();
    d.positions = vec![
        StringPosition::muted(1),
        StringPosition::fretted(2, 3, 1),
        StringPosition::fretted(3, 5, 1),
        StringPosition::open(4),
        StringPosition::open(5),
        StringPosition::open(6),
    ];
    let result = validate(&d);
    assert!(!result.is_valid);
    assert_eq!(result.error_count("invalid_finger"), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.score, 0.0);
}

#[test]
fn test_same_finger_same_fret_without_barre_is_allowed() {
    // A major with one finger across three strings: x02220
    let mut d = c_major();
    d.positions = vec![
        StringPosition::muted(1),
        StringPosition::open(2),
        StringPosition::fretted(3, 2, 1),
        StringPosition::fretted(4, 2, 1),
        StringPosition::fretted(5, 2, 1),
        StringPosition::open(6),
    ];
    let result = validate(&d);
    assert!(!result.has_error("invalid_finger"));
}

#[test]
fn test_barre_finger_off_barre_fret_conflicts() {
    let mut d = f_barre();
    d.positions[1] = StringPosition::fretted(2, 3, 1);
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_finger"), 1);
}

#[test]
fn test_non_barre_finger_still_checked_with_barre() {
    let mut d = f_barre();
    // Finger 3 on fret 3 and fret 2.
    d.positions[3] = StringPosition::fretted(4, 2, 3);
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_finger"), 1);
}

#[test]
fn test_fret_finger_consistency() {
    let mut d = c_major();
    d.positions[0] = StringPosition::new(1, -1, 0);
    d.positions[3] = StringPosition::new(4, 0, 2);
    d.positions[1] = StringPosition::new(2, 3, 0);
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_finger"), 3);
}

#[test]
fn test_bad_finger_value_reported_once() {
    let mut d = c_major();
    d.positions[1] = StringPosition::new(2, 3, 7);
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_finger"), 1);
}

#[test]
fn test_string_range_and_duplicates() {
    let mut d = c_major();
    d.positions[5] = StringPosition::open(7);
    d.positions[4] = StringPosition::open(2);
    let result = validate(&d);
    // 7 out of range, 2 duplicated
    assert_eq!(result.error_count("invalid_string"), 2);
}

#[test]
fn test_fret_range() {
    let mut d = c_major();
    d.positions[1] = StringPosition::new(2, 25, 3);
    d.positions[2] = StringPosition::new(3, -2, -1);
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_fret"), 2);
}

#[test]
fn test_ukulele_fret_limit() {
    let d = create(
        "C",
        InstrumentType::Ukulele,
        vec![
            StringPosition::open(1),
            StringPosition::open(2),
            StringPosition::open(3),
            StringPosition::fretted(4, 19, 3),
        ],
    );
    let result = validate(&d);
    assert!(result.has_error("invalid_fret"));
}

#[test]
fn test_stretch_above_five_is_error_even_for_expert() {
    let mut d = c_major();
    d.positions = vec![
        StringPosition::muted(1),
        StringPosition::fretted(2, 1, 1),
        StringPosition::fretted(3, 3, 2),
        StringPosition::fretted(4, 5, 3),
        StringPosition::fretted(5, 7, 4),
        StringPosition::open(6),
    ];
    d.difficulty = DifficultyLevel::Expert;
    let result = validate(&d);
    assert!(result.has_error("impossible_stretch"));
    assert!(!result.has_warning(WarningKind::StretchAboveDifficulty));
}

#[test]
fn test_stretch_above_declared_difficulty_warns() {
    let mut d = c_major();
    d.positions = vec![
        StringPosition::muted(1),
        StringPosition::fretted(2, 1, 1),
        StringPosition::open(3),
        StringPosition::open(4),
        StringPosition::fretted(5, 5, 4),
        StringPosition::open(6),
    ];
    d.difficulty = DifficultyLevel::Beginner;
    let result = validate(&d);
    assert!(result.is_valid);
    let warning = result
        .warnings
        .iter()
        .find(|w| w.code == WarningKind::StretchAboveDifficulty)
        .expect("stretch warning");
    assert_eq!(warning.severity, Severity::High);
    assert!(!warning.suggestion.is_empty());
    assert!(result.has_warning(WarningKind::DifficultyMismatch));
    assert!(result.score < 1.0);
}

#[test]
fn test_finger_order_inversion_warns() {
    let mut d = c_major();
    d.positions = vec![
        StringPosition::muted(1),
        StringPosition::fretted(2, 3, 1),
        StringPosition::fretted(3, 2, 2),
        StringPosition::open(4),
        StringPosition::fretted(5, 1, 3),
        StringPosition::open(6),
    ];
    let result = validate(&d);
    assert!(result.is_valid);
    // 1 above 2, 1 above 3, 2 above 3
    let inversions = result.warnings.iter().filter(|w| w.code == WarningKind::FingerOrder).count();
    assert_eq!(inversions, 3);
    assert!((result.score - 0.7).abs() < 1e-9);
}

#[test]
fn test_high_fret_warns() {
    let d = create(
        "E",
        InstrumentType::Guitar,
        vec![
            StringPosition::muted(1),
            StringPosition::muted(2),
            StringPosition::fretted(3, 14, 3),
            StringPosition::fretted(4, 13, 2),
            StringPosition::fretted(5, 12, 1),
            StringPosition::muted(6),
        ],
    );
    let result = validate(&d);
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert!(result.has_warning(WarningKind::HighFret));
}

#[test]
fn test_incomplete_chord_warns() {
    let d = create(
        "E5",
        InstrumentType::Guitar,
        vec![
            StringPosition::open(1),
            StringPosition::fretted(2, 2, 1),
            StringPosition::muted(3),
            StringPosition::muted(4),
            StringPosition::muted(5),
            StringPosition::muted(6),
        ],
    );
    let result = validate(&d);
    assert!(result.is_valid);
    let warning = result.warnings.iter().find(|w| w.code == WarningKind::IncompleteChord).unwrap();
    assert_eq!(warning.severity, Severity::Medium);
}

#[test]
fn test_barre_bounds() {
    let mut d = f_barre();
    d.barre = Some(BarreChord {
        fret: 0,
        finger: 5,
        start_string: 4,
        end_string: 2,
        is_partial: true,
    });
    for p in d.positions.iter_mut() {
        p.is_barre = None;
        p.barre_span = None;
    }
    let result = validate(&d);
    // fret, finger, end <= start
    assert_eq!(result.error_count("invalid_barre"), 3);
}

#[test]
fn test_partial_barre_spanning_everything() {
    let mut d = f_barre();
    if let Some(barre) = d.barre.as_mut() {
        barre.is_partial = true;
    }
    let result = validate(&d);
    assert_eq!(result.error_count("invalid_barre"), 1);
}

#[test]
fn test_barre_marker_mismatch() {
    let mut d = f_barre();
    d.positions[1] = StringPosition::fretted(2, 3, 3).with_barre(6);
    let result = validate(&d);
    assert!(result.has_error("invalid_barre"));

    let mut no_barre = f_barre();
    no_barre.barre = None;
    let result = validate(&no_barre);
    assert!(result.has_error("invalid_barre"));
}

#[test]
fn test_barre_span_marker_too_small() {
    let mut d = f_barre();
    d.positions[0].barre_span = Some(1);
    let result = validate(&d);
    assert!(result.has_error("invalid_barre"));
}

#[test]
fn test_missing_required_fields_all_reported() {
    let mut d = c_major();
    d.id.clear();
    d.name = "  ".to_string();
    d.instrument.string_count = 7;
    let result = validate(&d);
    assert_eq!(result.error_count("missing_required"), 3);
}

#[test]
fn test_empty_positions() {
    let mut d = c_major();
    d.positions.clear();
    let result = validate(&d);
    assert!(result.has_error("missing_required"));
    assert!(result.warnings.is_empty());

    // An empty shape still reports a bad instrument alongside it.
    d.instrument.string_count = 9;
    let result = validate(&d);
    let fields: Vec<&str> = result
        .errors
        .iter()
        .filter_map(|e| match e {
            ValidationError::MissingRequired { field, .. } => Some(field.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec!["instrument", "positions"]);
}

#[test]
fn test_missing_strings_warning_or_error() {
    let mut d = c_major();
    d.positions.truncate(5);
    let relaxed = validate(&d);
    assert!(relaxed.has_warning(WarningKind::MissingStrings));

    let strict = validate_with_options(&d, &ValidationOptions { require_all_strings: true });
    assert!(strict.has_error("missing_required"));
}

#[test]
fn test_valid_never_has_errors() {
    let mut broken = c_major();
    broken.positions[2] = StringPosition::new(3, 30, 9);
    for d in [c_major(), f_barre(), broken] {
        let result = validate(&d);
        assert_eq!(result.is_valid, result.errors.is_empty());
    }
}

#[test]
fn test_warnings_never_raise_score() {
    let clean = validate(&c_major());
    let mut warned = c_major();
    warned.difficulty = DifficultyLevel::Expert;
    let result = validate(&warned);
    assert!(result.is_valid);
    assert!(result.score <= clean.score);
    assert!((result.score - 0.95).abs() < 1e-9);
}

#[test]
fn test_score_floors_at_zero() {
    let warnings: Vec<ValidationWarning> = (0..8)
        .map(|_| ValidationWarning {
            code: WarningKind::FingerOrder,
            message: String::new(),
            severity: Severity::High,
            suggestion: String::new(),
        })
        .collect();
    let result = ValidationResult::from_findings(Vec::new(), warnings);
    assert!(result.is_valid);
    assert_eq!(result.score, 0.0);
}

#[test]
fn test_batch_keyed_by_id() {
    let c = c_major();
    let mut broken = f_barre();
    broken.positions[2] = StringPosition::new(3, 3, 0);
    let results = validate_batch(&[c.clone(), broken.clone()], &ValidationOptions::default());
    assert_eq!(results.len(), 2);
    assert!(results[&c.id].is_valid);
    assert!(!results[&broken.id].is_valid);
}

#[test]
fn test_strict_aggregates_messages() {
    let mut d = c_major();
    d.name.clear();
    d.positions[1] = StringPosition::new(2, 3, 0);
    let err = validate_strict(&d, &ValidationOptions::default()).unwrap_err();
    match err {
        FretworkError::Validation { messages, .. } => assert_eq!(messages.len(), 2),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(validate_strict(&c_major(), &ValidationOptions::default()).is_ok());
}

#[test]
fn test_batch_strict_names_failing_diagram() {
    let mut d = c_major();
    d.positions[1] = StringPosition::new(2, 3, 0);
    let err = validate_batch_strict(&[c_major(), d.clone()], &ValidationOptions::default()).unwrap_err();
    assert!(err.to_string().contains(&d.id));
}

#[test]
fn test_error_serializes_with_type_tag() {
    let err = ValidationError::ImpossibleStretch { span: 6, max_span: 5 };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "impossible_stretch");
    assert_eq!(json["span"], 6);
    assert_eq!(err.code(), "impossible_stretch");
}
