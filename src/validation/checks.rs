//! Individual validation checks.
//!
//! Each check appends to the shared findings and never returns early, so a
//! single pass reports every defect on the diagram.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Severity, ValidationError, ValidationOptions, ValidationWarning, WarningKind};
use crate::diagram::{fret_stretch, fretted_bounds, BarreChord, ChordDiagram, StringPosition, MUTED, OPEN};
use crate::difficulty::assess_difficulty;
use crate::theory::unique_note_count;

/// Largest fret span any hand can reach, regardless of skill.
pub const MAX_STRETCH: i8 = 5;
/// Frets above this draw a warning.
const HIGH_FRET: i8 = 12;
/// Fewer distinct notes than this is not a full chord.
const MIN_UNIQUE_NOTES: usize = 3;

#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl Findings {
    fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn warn(&mut self, code: WarningKind, severity: Severity, message: String, suggestion: &str) {
        self.warnings.push(ValidationWarning {
            code,
            message,
            severity,
            suggestion: suggestion.to_string(),
        });
    }
}

fn missing(field: &str, message: &str) -> ValidationError {
    ValidationError::MissingRequired {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Non-empty id/name/positions, recognized instrument, position count.
pub(crate) fn check_structure(diagram: &ChordDiagram, options: &ValidationOptions, findings: &mut Findings) {
    if diagram.id.trim().is_empty() {
        findings.error(missing("id", "diagram id is empty"));
    }
    if diagram.name.trim().is_empty() {
        findings.error(missing("name", "chord name is empty"));
    }
    if !diagram.instrument.is_recognized() {
        findings.error(missing(
            "instrument",
            &format!(
                "configuration does not match the known {} ({} strings)",
                diagram.instrument.kind,
                diagram.instrument.kind.string_count()
            ),
        ));
    }
    if diagram.positions.is_empty() {
        findings.error(missing("positions", "at least one string position is required"));
        return;
    }

    let expected = diagram.instrument.kind.string_count() as usize;
    let actual = diagram.positions.len();
    if actual != expected {
        if options.require_all_strings {
            findings.error(missing(
                "positions",
                &format!("expected {} positions for {}, got {}", expected, diagram.instrument.kind, actual),
            ));
        } else if actual < expected {
            findings.warn(
                WarningKind::MissingStrings,
                Severity::Low,
                format!("Only {} of {} strings have a position", actual, expected),
                "Add a muted (x) or open (0) position for every string",
            );
        }
    }
}

/// String numbers, fret range, finger values, fret/finger consistency, barre markers.
pub(crate) fn check_positions(diagram: &ChordDiagram, findings: &mut Findings) {
    let string_count = diagram.instrument.kind.string_count();
    let max_fret = diagram.instrument.kind.max_fret();
    let mut seen: BTreeMap<u8, usize> = BTreeMap::new();

    for position in &diagram.positions {
        let string_number = position.string_number;
        *seen.entry(string_number).or_default() += 1;

        if string_number < 1 || string_number > string_count {
            findings.error(ValidationError::InvalidString {
                string_number,
                message: format!("must be between 1 and {}", string_count),
            });
        }

        if position.fret < MUTED || position.fret > max_fret {
            findings.error(ValidationError::InvalidFret {
                string_number,
                fret: position.fret,
                max_fret,
            });
        }

        check_finger(position, findings);

        if position.is_barre() && position.barre_span.unwrap_or(0) < 2 {
            findings.error(ValidationError::InvalidBarre {
                message: format!(
                    "string {} is marked as barre but spans {} string(s); a barre covers at least 2",
                    string_number,
                    position.barre_span.unwrap_or(0)
                ),
            });
        }
    }

    for (string_number, count) in seen {
        if count > 1 {
            findings.error(ValidationError::InvalidString {
                string_number,
                message: format!("appears {} times", count),
            });
        }
    }
}

fn check_finger(position: &StringPosition, findings: &mut Findings) {
    let (fret, finger) = (position.fret, position.finger);
    let invalid = |message: String| ValidationError::InvalidFinger {
        string_number: Some(position.string_number),
        finger,
        frets: vec![fret],
        message,
    };

    if !(-1..=4).contains(&finger) {
        findings.error(invalid(format!(
            "string {}: finger must be -1 (muted), 0 (open) or 1-4",
            position.string_number
        )));
        return;
    }

    let consistent = match fret {
        MUTED => finger == MUTED,
        OPEN => finger == 0,
        f if f > 0 => (1..=4).contains(&finger),
        // Out-of-range frets are reported by the fret check.
        _ => true,
    };
    if !consistent {
        findings.error(invalid(format!(
            "string {}: fret {} requires {}",
            position.string_number,
            fret,
            match fret {
                MUTED => "finger -1",
                OPEN => "finger 0",
                _ => "a finger from 1 to 4",
            }
        )));
    }
}

/// Barre bounds, string range, partial-span rule, and agreement with position markers.
pub(crate) fn check_barre(diagram: &ChordDiagram, findings: &mut Findings) {
    let string_count = diagram.instrument.kind.string_count();
    let max_fret = diagram.instrument.kind.max_fret();

    let Some(barre) = &diagram.barre else {
        if let Some(marked) = diagram.positions.iter().find(|p| p.is_barre()) {
            findings.error(ValidationError::InvalidBarre {
                message: format!("string {} is marked as barre but the chord has no barre", marked.string_number),
            });
        }
        return;
    };

    let mut invalid = |message: String| findings.error(ValidationError::InvalidBarre { message });

    if barre.fret < 1 || barre.fret > max_fret {
        invalid(format!("fret {} must be between 1 and {}", barre.fret, max_fret));
    }
    if !(1..=4).contains(&barre.finger) {
        invalid(format!("finger {} must be between 1 and 4", barre.finger));
    }
    if barre.start_string < 1 || barre.end_string > string_count {
        invalid(format!(
            "strings {}-{} must lie within 1-{}",
            barre.start_string, barre.end_string, string_count
        ));
    }
    if barre.end_string <= barre.start_string {
        invalid(format!(
            "end string {} must be greater than start string {}",
            barre.end_string, barre.start_string
        ));
    }
    let full_span = barre.start_string <= 1 && barre.end_string >= string_count;
    if barre.is_partial && full_span {
        invalid(format!("partial barre must not span all {} strings", string_count));
    }
    if !barre.is_partial && barre.span() > string_count {
        invalid(format!("barre spans {} strings but the instrument has {}", barre.span(), string_count));
    }

    for position in diagram.positions.iter().filter(|p| p.is_barre()) {
        if !barre_holds(barre, position) {
            invalid(format!(
                "string {} is marked as barre at fret {} but the barre is at fret {} on strings {}-{}",
                position.string_number, position.fret, barre.fret, barre.start_string, barre.end_string
            ));
        }
    }
}

fn barre_holds(barre: &BarreChord, position: &StringPosition) -> bool {
    position.fret == barre.fret && barre.covers(position.string_number)
}

/// A finger may press only one fret, unless it is the barre finger at the barre fret.
///
/// Builds finger → set of frets over fretted positions; any finger with more than
/// one fret is a conflict. For the barre finger, every occurrence off the barre
/// fret is a conflict.
pub(crate) fn check_finger_conflicts(diagram: &ChordDiagram, findings: &mut Findings) {
    let mut frets_by_finger: BTreeMap<i8, BTreeSet<i8>> = BTreeMap::new();
    for position in diagram.positions.iter().filter(|p| p.is_fretted() && (1..=4).contains(&p.finger)) {
        frets_by_finger.entry(position.finger).or_default().insert(position.fret);
    }

    for (finger, frets) in frets_by_finger {
        let conflict = match &diagram.barre {
            Some(barre) if barre.finger == finger => frets.iter().any(|f| *f != barre.fret),
            _ => frets.len() > 1,
        };
        if conflict {
            let frets: Vec<i8> = frets.into_iter().collect();
            findings.error(ValidationError::InvalidFinger {
                string_number: None,
                finger,
                message: format!("finger {} is assigned to different frets {:?}", finger, frets),
                frets,
            });
        }
    }
}

/// Hard physical bound on the fret span.
pub(crate) fn check_stretch(diagram: &ChordDiagram, findings: &mut Findings) {
    let span = fret_stretch(&diagram.positions);
    if span > MAX_STRETCH {
        findings.error(ValidationError::ImpossibleStretch {
            span,
            max_span: MAX_STRETCH,
        });
    }
}

/// Advisory checks: difficulty fit, finger order, high frets, incomplete chords.
pub(crate) fn check_playability(diagram: &ChordDiagram, findings: &mut Findings) {
    let span = fret_stretch(&diagram.positions);
    let allowed = diagram.difficulty.max_stretch();
    if span > allowed && span <= MAX_STRETCH {
        let severity = if span - allowed > 1 { Severity::High } else { Severity::Medium };
        findings.warn(
            WarningKind::StretchAboveDifficulty,
            severity,
            format!(
                "Stretch of {} frets exceeds the {} limit of {}",
                span, diagram.difficulty, allowed
            ),
            "Raise the declared difficulty or choose a more compact voicing",
        );
    }

    let computed = assess_difficulty(&diagram.positions, diagram.barre.as_ref());
    if computed != diagram.difficulty {
        findings.warn(
            WarningKind::DifficultyMismatch,
            Severity::Low,
            format!("Declared difficulty {} but the shape rates as {}", diagram.difficulty, computed),
            "Use the computed difficulty unless the shape has been play-tested",
        );
    }

    check_finger_order(diagram, findings);

    if fretted_bounds(&diagram.positions).is_some_and(|(_, hi)| hi > HIGH_FRET) {
        findings.warn(
            WarningKind::HighFret,
            Severity::Low,
            format!("Chord reaches above fret {}", HIGH_FRET),
            "Consider a voicing lower on the neck",
        );
    }

    let unique = if diagram.notes.is_standard_tuning {
        unique_note_count(
            &diagram.positions,
            &diagram.instrument.standard_tuning,
            diagram.capo_position.unwrap_or(0),
        )
    } else {
        diagram.notes.notes.iter().collect::<BTreeSet<_>>().len()
    };
    if unique < MIN_UNIQUE_NOTES {
        findings.warn(
            WarningKind::IncompleteChord,
            Severity::Medium,
            format!("Only {} unique note(s) sound; a full chord needs {}", unique, MIN_UNIQUE_NOTES),
            "Check for muted strings that should sound",
        );
    }
}

/// A lower-numbered finger on a higher fret than a higher-numbered finger.
fn check_finger_order(diagram: &ChordDiagram, findings: &mut Findings) {
    let fretted: Vec<&StringPosition> = diagram
        .positions
        .iter()
        .filter(|p| p.is_fretted() && (1..=4).contains(&p.finger))
        .collect();

    for (i, a) in fretted.iter().enumerate() {
        for b in &fretted[i + 1..] {
            let (low, high) = if a.finger < b.finger { (a, b) } else { (b, a) };
            if low.finger != high.finger && low.fret > high.fret {
                findings.warn(
                    WarningKind::FingerOrder,
                    Severity::Medium,
                    format!(
                        "Finger {} on fret {} (string {}) sits above finger {} on fret {} (string {})",
                        low.finger, low.fret, low.string_number, high.finger, high.fret, high.string_number
                    ),
                    "Reassign fingers so lower-numbered fingers take lower frets",
                );
            }
        }
    }
}
