//! MusicXML `<harmony>` export with a `<frame>` fretboard diagram.
//!
//! MusicXML numbers strings from the highest-pitched string down, so string 1
//! of a diagram (the lowest) becomes string `string_count` in the frame.
//! Muted strings get no `<frame-note>`.

use std::io::Cursor;

use quick_xml::events::BytesText;
use quick_xml::Writer;

use crate::diagram::ChordDiagram;
use crate::error::Result;
use crate::pitch::{nearest_interval, parse_pitch_class, split_root};
use crate::theory::ChordType;

/// Frets shown in a frame when the chord fits.
const MIN_FRAME_FRETS: i8 = 4;

fn kind_value(kind: ChordType) -> &'static str {
    match kind {
        ChordType::Major | ChordType::Add9 => "major",
        ChordType::Minor => "minor",
        ChordType::Seventh => "dominant",
        ChordType::Major7 => "major-seventh",
        ChordType::Minor7 => "minor-seventh",
        ChordType::Sus2 => "suspended-second",
        ChordType::Sus4 => "suspended-fourth",
        ChordType::Diminished => "diminished",
        ChordType::Augmented => "augmented",
        ChordType::Power => "power",
        ChordType::Other => "other",
    }
}

/// Root step letter and alteration (`-1`, `0`, `1`) from a chord name.
fn root_parts(name: &str) -> Option<(String, i32)> {
    let name = name.trim();
    let step = name.chars().next()?.to_ascii_uppercase();
    let natural = parse_pitch_class(&step.to_string())?;
    let (pc, _) = split_root(name)?;
    Some((step.to_string(), nearest_interval(natural, pc)))
}

/// Render a diagram as a MusicXML `<harmony>` element.
///
/// # Examples
/// ```
/// use fretwork::from_compact_format;
/// use fretwork::serialize::to_musicxml_frame;
///
/// let c = from_compact_format("C:guitar:x32010").unwrap();
/// let xml = to_musicxml_frame(&c).unwrap();
/// assert!(xml.contains("<frame-strings>6</frame-strings>"));
/// assert!(xml.contains("<root-step>C</root-step>"));
/// ```
pub fn to_musicxml_frame(diagram: &ChordDiagram) -> Result<String> {
    let string_count = diagram.instrument.kind.string_count();
    let fretted: Vec<i8> = diagram.fretted().map(|p| p.fret).collect();
    let lowest = fretted.iter().copied().min().unwrap_or(1);
    let highest = fretted.iter().copied().max().unwrap_or(1);
    let first_fret = if highest > MIN_FRAME_FRETS { lowest } else { 1 };
    let frame_frets = (highest - first_fret + 1).max(MIN_FRAME_FRETS);
    let kind = ChordType::from_name(&diagram.name);
    let suffix = split_root(diagram.name.trim()).map_or("", |(_, rest)| rest);

    let mut positions: Vec<_> = diagram.positions.iter().filter(|p| !p.is_muted()).collect();
    positions.sort_by_key(|p| p.string_number);

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.create_element("harmony").write_inner_content(|w| {
        if let Some((step, alter)) = root_parts(&diagram.name) {
            w.create_element("root").write_inner_content(|w| {
                w.create_element("root-step")
                    .write_text_content(BytesText::new(&step))?;
                if alter != 0 {
                    w.create_element("root-alter")
                        .write_text_content(BytesText::new(&alter.to_string()))?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        }
        w.create_element("kind")
            .with_attribute(("text", suffix))
            .write_text_content(BytesText::new(kind_value(kind)))?;

        w.create_element("frame").write_inner_content(|w| {
            w.create_element("frame-strings")
                .write_text_content(BytesText::new(&string_count.to_string()))?;
            w.create_element("frame-frets")
                .write_text_content(BytesText::new(&frame_frets.to_string()))?;
            if first_fret > 1 {
                w.create_element("first-fret")
                    .write_text_content(BytesText::new(&first_fret.to_string()))?;
            }

            for position in &positions {
                let xml_string = string_count + 1 - position.string_number.min(string_count);
                let barre_mark = diagram.barre.as_ref().and_then(|b| {
                    if position.fret != b.fret {
                        None
                    } else if position.string_number == b.start_string {
                        Some("start")
                    } else if position.string_number == b.end_string {
                        Some("stop")
                    } else {
                        None
                    }
                });

                w.create_element("frame-note").write_inner_content(|w| {
                    w.create_element("string")
                        .write_text_content(BytesText::new(&xml_string.to_string()))?;
                    w.create_element("fret")
                        .write_text_content(BytesText::new(&position.fret.to_string()))?;
                    if position.is_fretted() && (1..=4).contains(&position.finger) {
                        w.create_element("fingering")
                            .write_text_content(BytesText::new(&position.finger.to_string()))?;
                    }
                    if let Some(mark) = barre_mark {
                        w.create_element("barre").with_attribute(("type", mark)).write_empty()?;
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
