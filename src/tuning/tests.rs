use super::*;
use crate::diagram::{BarreChord, ChordDiagram, StringPosition};
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

fn e_major() -> ChordDiagram {
    create(
        "E",
        InstrumentType::Guitar,
        vec![
            StringPosition::open(1),
            StringPosition::fretted(2, 2, 2),
            StringPosition::fretted(3, 2, 3),
            StringPosition::fretted(4, 1, 1),
            StringPosition::open(5),
            StringPosition::open(6),
        ],
    )
}

fn tuning(id: &str) -> TuningInfo {
    find_tuning(id).unwrap()
}

#[test]
fn test_compare_identical_tunings() {
    let cmp = compare_tunings(&tuning("standard"), &tuning("standard"));
    assert_eq!(cmp.similarity, 100.0);
    assert_eq!(cmp.matching_strings, vec![1, 2, 3, 4, 5, 6]);
    assert!(cmp.different_strings.is_empty());
    assert_eq!(cmp.conversion_difficulty, ConversionDifficulty::Easy);
}

#[test]
fn test_compare_difficulty_bands() {
    // DADGAD differs from standard on strings 1, 5 and 6.
    let cmp = compare_tunings(&tuning("standard"), &tuning("dadgad"));
    assert_eq!(cmp.different_strings, vec![1, 5, 6]);
    assert_eq!(cmp.similarity, 50.0);
    assert_eq!(cmp.conversion_difficulty, ConversionDifficulty::Medium);

    let cmp = compare_tunings(&tuning("standard"), &tuning("half-step-down"));
    assert_eq!(cmp.similarity, 0.0);
    assert_eq!(cmp.conversion_difficulty, ConversionDifficulty::Hard);
}

#[test]
fn test_compare_uneven_lengths() {
    let cmp = compare_tunings(&tuning("standard"), &tuning("ukulele-standard"));
    assert_eq!(cmp.different_strings.len() + cmp.matching_strings.len(), 6);
    assert!(cmp.different_strings.contains(&5));
    assert!(cmp.different_strings.contains(&6));
}

#[test]
fn test_low_g_matches_standard_by_pitch_class() {
    let cmp = compare_tunings(&tuning("ukulele-standard"), &tuning("ukulele-low-g"));
    assert_eq!(cmp.similarity, 100.0);
}

#[test]
fn test_drop_d_keeps_upper_strings() {
    let c = c_major();
    let result = convert_chord_between_tunings(&c, &tuning("standard"), &tuning("drop-d"), &ConversionOptions::default());

    assert!(result.success);
    assert_eq!(result.capo_position, None);
    assert_eq!(result.confidence, 100.0);
    for string_number in 3..=6u8 {
        let before = c.position(string_number).unwrap();
        let after = result
            .converted_positions
            .iter()
            .find(|p| p.string_number == string_number)
            .unwrap();
        assert_eq!(before.fret, after.fret, "string {}", string_number);
    }
    assert!(result.converted_positions[0].is_muted());
    assert_eq!(result.original_positions, c.positions);
}

#[test]
fn test_drop_d_moves_low_string_up_two_frets() {
    let g = create(
        "G",
        InstrumentType::Guitar,
        vec![
            StringPosition::fretted(1, 3, 2),
            StringPosition::fretted(2, 2, 1),
            StringPosition::open(3),
            StringPosition::open(4),
            StringPosition::open(5),
            StringPosition::fretted(6, 3, 3),
        ],
    );
    let result = convert_chord_between_tunings(&g, &tuning("standard"), &tuning("drop-d"), &ConversionOptions::default());
    assert!(result.success);
    assert_eq!(result.converted_positions[0].fret, 5);
    assert_eq!(result.converted_positions[1].fret, 2);
}

#[test]
fn test_half_step_down_prefers_capo_one() {
    let e = e_major();
    let result = convert_chord_between_tunings(
        &e,
        &tuning("standard"),
        &tuning("half-step-down"),
        &ConversionOptions::default(),
    );
    assert!(result.success);
    assert_eq!(result.capo_position, Some(1));
    // Same shape relative to the capo.
    let frets: Vec<i8> = result.converted_positions.iter().map(|p| p.fret).collect();
    assert_eq!(frets, vec![0, 2, 2, 1, 0, 0]);
    assert_eq!(result.confidence, 94.0);
}

#[test]
fn test_half_step_down_without_capo_shifts_frets() {
    let e = e_major();
    let options = ConversionOptions {
        allow_capo: false,
        ..ConversionOptions::default()
    };
    let result = convert_chord_between_tunings(&e, &tuning("standard"), &tuning("half-step-down"), &options);
    assert!(result.success);
    assert_eq!(result.capo_position, None);
    let frets: Vec<i8> = result.converted_positions.iter().map(|p| p.fret).collect();
    assert_eq!(frets, vec![0, 3, 3, 2, 0, 0]);
    // Three open strings no longer sound their original pitch.
    assert!(result.confidence < 100.0);
}

#[test]
fn test_unreachable_fret_is_muted() {
    let whole_step_up =
        TuningInfo::custom("Whole step up", InstrumentType::Guitar, &["F#", "B", "E", "A", "C#", "F#"]).unwrap();
    let options = ConversionOptions {
        allow_capo: false,
        ..ConversionOptions::default()
    };
    let result = convert_chord_between_tunings(&c_major(), &tuning("standard"), &whole_step_up, &options);

    // B string fret 1 (C) would need fret -1 on a C# string.
    assert!(!result.success);
    assert_eq!(result.muted_strings, vec![5]);
    assert!(result.converted_positions[4].is_muted());
    assert!(result.confidence < 100.0);
}

#[test]
fn test_capo_choice_is_optimal() {
    let standard = tuning("standard");
    let targets = ["drop-d", "half-step-down", "whole-step-down", "open-g", "dadgad"];
    for diagram in [c_major(), e_major()] {
        for id in targets {
            let to = tuning(id);
            let best = calculate_optimal_capo(&diagram.positions, &standard, &to, 0, 7, 24);
            for capo in 0..=7 {
                let other = evaluate_capo(&diagram.positions, &standard, &to, 0, capo, 24);
                assert!(best.reproduced >= other.reproduced, "{} capo {}", id, capo);
                if other.reproduced == best.reproduced {
                    assert!(best.capo <= capo);
                }
            }
        }
    }
}

#[test]
fn test_capo_ranks_by_reproduced_pitches_not_weight() {
    // Capo 0 keeps the two fretted strings; capo 1 keeps the three open ones.
    let target =
        TuningInfo::custom("Flat opens", InstrumentType::Guitar, &["Eb", "Ab", "Db", "G#", "C", "E"]).unwrap();
    let shape = vec![
        StringPosition::open(1),
        StringPosition::open(2),
        StringPosition::open(3),
        StringPosition::fretted(4, 1, 1),
        StringPosition::fretted(5, 1, 2),
        StringPosition::muted(6),
    ];
    let standard = tuning("standard");

    let no_capo = evaluate_capo(&shape, &standard, &target, 0, 0, 24);
    let capo_one = evaluate_capo(&shape, &standard, &target, 0, 1, 24);
    assert_eq!(no_capo.reproduced, 2);
    assert_eq!(capo_one.reproduced, 3);
    assert!(no_capo.coverage > capo_one.coverage);

    let best = calculate_optimal_capo(&shape, &standard, &target, 0, 7, 24);
    assert_eq!(best.capo, 1);
    for capo in 0..=7 {
        let other = evaluate_capo(&shape, &standard, &target, 0, capo, 24);
        assert!(best.reproduced >= other.reproduced, "capo {}", capo);
    }
}

#[test]
fn test_source_capo_is_part_of_the_pitch() {
    let mut capoed = e_major();
    capoed.capo_position = Some(2);

    let result =
        convert_chord_between_tunings(&capoed, &tuning("standard"), &tuning("standard"), &ConversionOptions::default());
    assert!(result.success);
    assert_eq!(result.capo_position, Some(2));
    let frets: Vec<i8> = result.converted_positions.iter().map(|p| p.fret).collect();
    assert_eq!(frets, vec![0, 2, 2, 1, 0, 0]);

    let options = ConversionOptions {
        allow_capo: false,
        ..ConversionOptions::default()
    };
    let result = convert_chord_between_tunings(&capoed, &tuning("standard"), &tuning("standard"), &options);
    let frets: Vec<i8> = result.converted_positions.iter().map(|p| p.fret).collect();
    assert_eq!(frets, vec![0, 4, 4, 3, 0, 0]);
}

#[test]
fn test_max_capo_is_clamped() {
    let e = e_major();
    let options = ConversionOptions {
        allow_capo: true,
        max_capo_position: 40,
    };
    let result = convert_chord_between_tunings(&e, &tuning("standard"), &tuning("standard"), &options);
    assert_eq!(result.capo_position, None);
    assert_eq!(result.confidence, 100.0);
}

#[test]
fn test_all_muted_chord_is_not_a_success() {
    let silent = create("N.C.", InstrumentType::Guitar, (1..=6).map(StringPosition::muted).collect());
    let result = convert_chord_between_tunings(&silent, &tuning("standard"), &tuning("drop-d"), &ConversionOptions::default());
    assert!(!result.success);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn test_barre_survives_uniform_shift() {
    let f = create_with_barre(
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
    );
    let options = ConversionOptions {
        allow_capo: false,
        ..ConversionOptions::default()
    };
    let result = convert_chord_between_tunings(&f, &tuning("standard"), &tuning("half-step-down"), &options);
    let barre = result.barre.expect("barre should carry over");
    assert_eq!(barre.fret, 2);
    assert!(result.converted_positions[0].is_barre());
}

#[test]
fn test_apply_conversion_records_capo_and_tuning() {
    let e = e_major();
    let to = tuning("half-step-down");
    let result = convert_chord_between_tunings(&e, &tuning("standard"), &to, &ConversionOptions::default());
    let converted = apply_conversion(&e, &result, &to);

    assert_eq!(converted.capo_position, Some(1));
    assert!(!converted.notes.is_standard_tuning);
    // Capo 1 on Eb tuning sounds concert E major again.
    assert_eq!(converted.notes.root, "E");
    assert_eq!(converted.notes.notes, vec!["E", "G#", "B"]);
    assert!(converted.metadata.tags.contains(&"half-step-down".to_string()));
}
