use crate::io::error::Error;
use crate::model::{
    settings::{H5mdLayout, MoleculeProperties, NameSequence, Settings},
    types::TypeId,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;
use std::io::{BufRead, Read};

const FORMAT: &str = "settings XML";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    TypeTable,
    NameSequence,
}

struct PendingNameSequence {
    line: usize,
    chain_name: String,
    type_seq: Vec<TypeId>,
    res_name: SmolStr,
    atom_names: Vec<SmolStr>,
}

pub fn read<R: BufRead>(mut reader: R) -> Result<Settings, Error> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| Error::from_io(e, None))?;

    let mut xml = Reader::from_str(&content);
    xml.trim_text(true);

    let mut settings = Settings::new();
    let mut pending: Vec<PendingNameSequence> = Vec::new();
    let mut target: Option<TextTarget> = None;
    let mut has_type_table = false;

    loop {
        let event = xml.read_event().map_err(|e| {
            Error::parse(
                FORMAT,
                None,
                line_at(&content, xml.buffer_position()),
                e.to_string(),
            )
        })?;
        let line = line_at(&content, xml.buffer_position());

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let opened = match e.name().as_ref() {
                    b"type2chain" => {
                        has_type_table = true;
                        Some(TextTarget::TypeTable)
                    }
                    b"molecule_type" => {
                        settings.add_molecule(parse_molecule_type(e, line)?);
                        None
                    }
                    b"name_seq" => {
                        pending.push(parse_name_seq(e, line)?);
                        Some(TextTarget::NameSequence)
                    }
                    b"h5md" => {
                        settings.h5md = parse_h5md(e, line)?;
                        None
                    }
                    _ => None,
                };
                if !is_empty {
                    target = opened;
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::parse(FORMAT, None, line, err.to_string()))?;
                match target {
                    Some(TextTarget::TypeTable) => parse_type_table(&text, line, &mut settings)?,
                    Some(TextTarget::NameSequence) => {
                        if let Some(seq) = pending.last_mut() {
                            seq.atom_names
                                .extend(text.split_whitespace().map(SmolStr::new));
                        }
                    }
                    None => {}
                }
            }
            Event::End(_) => target = None,
            Event::Eof => break,
            _ => {}
        }
    }

    if !has_type_table {
        return Err(Error::inconsistent_data(
            FORMAT,
            None,
            "missing <type2chain> element",
        ));
    }

    for seq in pending {
        register_name_sequence(&mut settings, seq)?;
    }

    Ok(settings)
}

fn line_at(content: &str, position: usize) -> usize {
    let end = position.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

fn attr(e: &BytesStart, name: &str, line: usize) -> Result<String, Error> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .map(|a| String::from_utf8_lossy(&a.value).trim().to_string())
        .ok_or_else(|| {
            Error::parse(
                FORMAT,
                None,
                line,
                format!(
                    "missing attribute '{}' on <{}>",
                    name,
                    String::from_utf8_lossy(e.name().as_ref())
                ),
            )
        })
}

fn parse_attr<T: std::str::FromStr>(e: &BytesStart, name: &str, line: usize) -> Result<T, Error> {
    let raw = attr(e, name, line)?;
    raw.parse::<T>().map_err(|_| {
        Error::parse(
            FORMAT,
            None,
            line,
            format!("invalid value '{}' for attribute '{}'", raw, name),
        )
    })
}

fn parse_type_table(text: &str, line: usize, settings: &mut Settings) -> Result<(), Error> {
    for entry in text.split_whitespace() {
        let fields: Vec<&str> = entry.split(':').collect();
        let [type_id, chain_name, type_name] = fields.as_slice() else {
            return Err(Error::parse(
                FORMAT,
                None,
                line,
                format!(
                    "type table entry '{}' must be 'type_id:chain_name:type_name'",
                    entry
                ),
            ));
        };

        let type_id: TypeId = type_id.trim().parse().map_err(|_| {
            Error::parse(
                FORMAT,
                None,
                line,
                format!("invalid type id in entry '{}'", entry),
            )
        })?;

        if !settings.add_type(type_id, chain_name.trim(), type_name.trim()) {
            return Err(Error::parse(
                FORMAT,
                None,
                line,
                format!("type name '{}' is defined more than once", type_name.trim()),
            ));
        }
    }
    Ok(())
}

fn parse_molecule_type(e: &BytesStart, line: usize) -> Result<MoleculeProperties, Error> {
    Ok(MoleculeProperties {
        name: attr(e, "name", line)?,
        size: parse_attr(e, "size", line)?,
        nrexcl: parse_attr(e, "nrexcl", line)?,
        nrmols: parse_attr(e, "nrmols", line)?,
    })
}

fn parse_name_seq(e: &BytesStart, line: usize) -> Result<PendingNameSequence, Error> {
    let raw_seq = attr(e, "seq", line)?;
    let type_seq = raw_seq
        .split_whitespace()
        .map(|t| t.parse::<TypeId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            Error::parse(
                FORMAT,
                None,
                line,
                format!("invalid type sequence '{}'", raw_seq),
            )
        })?;

    Ok(PendingNameSequence {
        line,
        chain_name: attr(e, "chain_name", line)?,
        type_seq,
        res_name: attr(e, "res_name", line)?.into(),
        atom_names: Vec::new(),
    })
}

fn parse_h5md(e: &BytesStart, line: usize) -> Result<H5mdLayout, Error> {
    let connection_groups = attr(e, "connection_groups", line)?
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect();

    Ok(H5mdLayout {
        atom_group: attr(e, "atom_groups", line)?,
        connection_groups,
    })
}

fn register_name_sequence(settings: &mut Settings, seq: PendingNameSequence) -> Result<(), Error> {
    let line = seq.line;
    let size = settings
        .molecule(&seq.chain_name)
        .map(|m| m.size)
        .ok_or_else(|| {
            Error::parse(
                FORMAT,
                None,
                line,
                format!(
                    "name sequence refers to undeclared molecule type '{}'",
                    seq.chain_name
                ),
            )
        })?;

    if seq.type_seq.len() != size {
        return Err(Error::parse(
            FORMAT,
            None,
            line,
            format!(
                "molecule '{}' type sequence has {} entries but the declared size is {}",
                seq.chain_name,
                seq.type_seq.len(),
                size
            ),
        ));
    }
    if seq.atom_names.len() != size {
        return Err(Error::parse(
            FORMAT,
            None,
            line,
            format!(
                "molecule '{}' lists {} atom names but the declared size is {}",
                seq.chain_name,
                seq.atom_names.len(),
                size
            ),
        ));
    }

    let names = NameSequence {
        atom_names: seq.atom_names,
        res_name: seq.res_name,
    };
    if !settings.add_name_sequence(seq.chain_name.as_str(), seq.type_seq.clone(), names) {
        return Err(Error::parse(
            FORMAT,
            None,
            line,
            format!(
                "type sequence {:?} is already defined for molecule '{}'",
                seq.type_seq, seq.chain_name
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SETTINGS: &str = r#"<settings>
  <type2chain>
    0:PE:CH3 1:PE:CH2
    2:WAT:OW 3:WAT:HW
  </type2chain>
  <molecule_type name="PE" size="3" nrexcl="3" nrmols="1" />
  <molecule_type name="WAT" size="3" nrexcl="2" nrmols="10" />
  <name_seq chain_name="PE" seq="0 1 0" res_name="PE">C1 C2 C3</name_seq>
  <name_seq chain_name="WAT" seq="2 3 3" res_name="SOL">OW HW1 HW2</name_seq>
  <h5md atom_groups="atoms" connection_groups="chem_bonds_0, chem_bonds_1" />
</settings>
"#;

    fn parse(text: &str) -> Result<Settings, Error> {
        read(Cursor::new(text))
    }

    #[test]
    fn reads_all_sections() {
        let settings = parse(SETTINGS).unwrap();

        assert_eq!(settings.type_count(), 4);
        assert_eq!(settings.type_id("HW"), Some(3));
        assert_eq!(settings.type_info(1).unwrap().chain_name, "PE");

        let names: Vec<_> = settings.molecules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["PE", "WAT"]);
        assert_eq!(settings.molecule("WAT").unwrap().nrmols, 10);

        let water = settings.name_sequence("WAT", &[2, 3, 3]).unwrap();
        assert_eq!(water.res_name, "SOL");
        assert_eq!(water.atom_names, vec!["OW", "HW1", "HW2"]);

        assert_eq!(settings.h5md.atom_group, "atoms");
        assert_eq!(
            settings.h5md.connection_groups,
            vec!["chem_bonds_0", "chem_bonds_1"]
        );
    }

    #[test]
    fn h5md_element_is_optional() {
        let text = r#"<s><type2chain>0:A:A</type2chain></s>"#;
        let settings = parse(text).unwrap();
        assert_eq!(settings.h5md, H5mdLayout::default());
    }

    #[test]
    fn rejects_duplicate_type_names() {
        let text = r#"<s><type2chain>0:A:X 1:B:X</type2chain></s>"#;
        assert!(matches!(parse(text), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_malformed_type_entries() {
        let text = r#"<s><type2chain>0:A</type2chain></s>"#;
        assert!(matches!(parse(text), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_name_sequence_with_wrong_length() {
        let text = r#"<s>
<type2chain>0:A:X</type2chain>
<molecule_type name="A" size="2" nrexcl="1" nrmols="1"/>
<name_seq chain_name="A" seq="0 0 0" res_name="A">X1 X2 X3</name_seq>
</s>"#;
        match parse(text) {
            Err(Error::Parse { line_number, .. }) => assert_eq!(line_number, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_name_sequences() {
        let text = r#"<s>
<type2chain>0:A:X</type2chain>
<molecule_type name="A" size="1" nrexcl="1" nrmols="1"/>
<name_seq chain_name="A" seq="0" res_name="A">X1</name_seq>
<name_seq chain_name="A" seq="0" res_name="B">X1</name_seq>
</s>"#;
        assert!(matches!(parse(text), Err(Error::Parse { .. })));
    }

    #[test]
    fn missing_required_attribute_is_reported() {
        let text = r#"<s><type2chain>0:A:X</type2chain><molecule_type name="A" size="1"/></s>"#;
        match parse(text) {
            Err(Error::Parse { details, .. }) => assert!(details.contains("nrexcl")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_type_table_is_inconsistent() {
        assert!(matches!(
            parse("<s></s>"),
            Err(Error::InconsistentData { .. })
        ));
    }
}
