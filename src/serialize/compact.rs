//! Compact string form: `name:instrument:frets[:bFret-start-end][:cCapo]`.
//!
//! Frets are listed from string 1 upward, `x` for muted, frets above 9 in
//! parentheses. The form keeps frets, barre and capo only; fingers come back
//! as 1 for every fretted string and metadata is regenerated.

use crate::diagram::{BarreChord, ChordDiagram, StringPosition, MUTED};
use crate::error::{FretworkError, Result};
use crate::generator::parse_pattern;
use crate::instrument::InstrumentType;
use crate::theory::analyze_notes;
use crate::transform::create_with_barre;

fn compact_error(input: &str, message: impl Into<String>) -> FretworkError {
    FretworkError::CompactFormat {
        input: input.to_string(),
        message: message.into(),
    }
}

fn encode_fret(fret: i8) -> String {
    match fret {
        MUTED => "x".to_string(),
        0..=9 => fret.to_string(),
        _ => format!("({})", fret),
    }
}

/// Encode a diagram in compact form.
///
/// Strings without a position are written as muted. Fails when the name
/// contains `:` or a position lies outside the instrument's strings.
///
/// # Examples
/// ```
/// use fretwork::{from_compact_format, to_compact_format};
///
/// let c = from_compact_format("C:guitar:x32010").unwrap();
/// assert_eq!(to_compact_format(&c).unwrap(), "C:guitar:x32010");
/// ```
pub fn to_compact_format(diagram: &ChordDiagram) -> Result<String> {
    let kind = diagram.instrument.kind;
    if diagram.name.contains(':') || diagram.name.trim().is_empty() {
        return Err(compact_error(&diagram.name, "chord name must be non-empty and free of ':'"));
    }

    let count = kind.string_count() as usize;
    let mut frets = vec![MUTED; count];
    for position in &diagram.positions {
        let idx = (position.string_number as usize)
            .checked_sub(1)
            .filter(|idx| *idx < count)
            .ok_or_else(|| {
                compact_error(
                    &diagram.name,
                    format!("string {} is outside 1-{}", position.string_number, count),
                )
            })?;
        frets[idx] = position.fret;
    }

    let mut out = format!(
        "{}:{}:{}",
        diagram.name,
        kind,
        frets.into_iter().map(encode_fret).collect::<String>()
    );
    if let Some(barre) = &diagram.barre {
        out.push_str(&format!(":b{}-{}-{}", barre.fret, barre.start_string, barre.end_string));
    }
    if let Some(capo) = diagram.capo_position.filter(|c| *c > 0) {
        out.push_str(&format!(":c{}", capo));
    }
    Ok(out)
}

fn parse_barre(input: &str, spec: &str, string_count: u8) -> Result<BarreChord> {
    let parts: Vec<&str> = spec.split('-').collect();
    let [fret, start, end] = parts.as_slice() else {
        return Err(compact_error(input, format!("barre '{}' must be b<fret>-<start>-<end>", spec)));
    };
    let number = |s: &str| s.trim().parse::<u8>().map_err(|_| compact_error(input, format!("bad barre value '{}'", s)));
    let fret = number(*fret)?;
    let start_string = number(*start)?;
    let end_string = number(*end)?;
    if fret > i8::MAX as u8 {
        return Err(compact_error(input, format!("barre fret {} is out of range", fret)));
    }

    Ok(BarreChord {
        fret: fret as i8,
        finger: 1,
        start_string,
        end_string,
        is_partial: !(start_string == 1 && end_string == string_count),
    })
}

/// Decode a compact string into a diagram.
///
/// # Examples
/// ```
/// use fretwork::from_compact_format;
///
/// let f = from_compact_format("F:guitar:133211:b1-1-6").unwrap();
/// assert_eq!(f.fret_pattern(), vec![1, 3, 3, 2, 1, 1]);
/// assert_eq!(f.barre.unwrap().fret, 1);
///
/// let capo = from_compact_format("G:guitar:320003:c2").unwrap();
/// assert_eq!(capo.capo_position, Some(2));
/// ```
pub fn from_compact_format(input: &str) -> Result<ChordDiagram> {
    let segments: Vec<&str> = input.trim().split(':').collect();
    if segments.len() < 3 {
        return Err(compact_error(input, "expected at least 3 segments"));
    }
    let name = segments[0].trim();
    if name.is_empty() {
        return Err(compact_error(input, "chord name is empty"));
    }
    let kind = InstrumentType::parse(segments[1])?;
    let frets = parse_pattern(segments[2]).map_err(|e| compact_error(input, e.to_string()))?;
    if frets.len() != kind.string_count() as usize {
        return Err(compact_error(
            input,
            format!("{} has {} strings but {} frets were given", kind, kind.string_count(), frets.len()),
        ));
    }

    let mut barre = None;
    let mut capo = None;
    for segment in &segments[3..] {
        let segment = segment.trim();
        if let Some(spec) = segment.strip_prefix('b') {
            barre = Some(parse_barre(input, spec, kind.string_count())?);
        } else if let Some(spec) = segment.strip_prefix('c') {
            let position = spec
                .parse::<u8>()
                .map_err(|_| compact_error(input, format!("bad capo '{}'", spec)))?;
            capo = Some(position).filter(|c| *c > 0);
        } else {
            return Err(compact_error(input, format!("unknown segment '{}'", segment)));
        }
    }

    let positions: Vec<StringPosition> = frets
        .iter()
        .enumerate()
        .map(|(idx, &fret)| {
            let string_number = idx as u8 + 1;
            let position = match fret {
                MUTED => StringPosition::muted(string_number),
                0 => StringPosition::open(string_number),
                _ => StringPosition::fretted(string_number, fret, 1),
            };
            match &barre {
                Some(b) if b.fret == fret && b.covers(string_number) => position.with_barre(b.span()),
                _ => position,
            }
        })
        .collect();

    let mut diagram = create_with_barre(name, kind, positions, barre);
    diagram.metadata.source = "compact".to_string();
    if let Some(capo) = capo {
        diagram.capo_position = Some(capo);
        diagram.notes = analyze_notes(name, &diagram.positions, &diagram.instrument.standard_tuning, capo, true);
    }
    Ok(diagram)
}

/// Encode and decode, then compare what the compact form keeps: frets, barre, capo.
pub fn verify_compact_round_trip(diagram: &ChordDiagram) -> Result<bool> {
    let back = from_compact_format(&to_compact_format(diagram)?)?;

    let mut expected = vec![MUTED; diagram.instrument.kind.string_count() as usize];
    for position in &diagram.positions {
        if let Some(slot) = (position.string_number as usize)
            .checked_sub(1)
            .and_then(|idx| expected.get_mut(idx))
        {
            *slot = position.fret;
        }
    }

    let barre_key = |b: &Option<BarreChord>| b.as_ref().map(|b| (b.fret, b.start_string, b.end_string));
    Ok(back.fret_pattern() == expected
        && barre_key(&back.barre) == barre_key(&diagram.barre)
        && back.capo_position == diagram.capo_position.filter(|c| *c > 0))
}
