use crate::io::error::Error;
use crate::model::{
    template::{InteractionTypes, TypeDefinition},
    types::{InteractionKind, ParameterRecord},
};
use smol_str::SmolStr;
use std::io::BufRead;
use std::str::FromStr;

const FORMAT: &str = "ITP";

/// Reads the `*types` sections of a GROMACS include file.
///
/// Each data line holds the type names, the functional form, and its coefficients:
///
/// ```text
/// [ angletypes ]
/// ; i    j    k    func  theta0  k_theta
///   CH3  CH2  CH3  1     109.5   300.0
/// ```
///
/// Comments (`;`), preprocessor directives (`#`), and all other sections are skipped.
///
/// # Errors
///
/// Returns [`Error::Parse`] for lines with too few fields or non-numeric values.
pub fn read<R: BufRead>(reader: R) -> Result<InteractionTypes, Error> {
    let mut types = InteractionTypes::new();
    let mut section: Option<InteractionKind> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        let data = strip_comment(&line).trim();
        if data.is_empty() || data.starts_with('#') {
            continue;
        }

        if let Some(header) = data.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| Error::parse(FORMAT, None, line_num, "unterminated section header"))?
                .trim();
            section = section_kind(name);
            continue;
        }

        let Some(kind) = section else {
            continue;
        };

        match kind {
            InteractionKind::Bond => types.bonds.push(parse_definition(data, line_num)?),
            InteractionKind::Angle => types.angles.push(parse_definition(data, line_num)?),
            InteractionKind::Dihedral => types.dihedrals.push(parse_definition(data, line_num)?),
            InteractionKind::Pair => types.pairs.push(parse_definition(data, line_num)?),
        }
    }

    for kind in InteractionKind::ALL {
        log::debug!("Read {} {} definitions", types.count(kind), kind.types_section());
    }

    Ok(types)
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn section_kind(name: &str) -> Option<InteractionKind> {
    InteractionKind::ALL
        .into_iter()
        .find(|kind| kind.types_section() == name)
}

fn parse_definition<const N: usize>(data: &str, line_num: usize) -> Result<TypeDefinition<N>, Error> {
    let fields: Vec<&str> = data.split_whitespace().collect();
    if fields.len() < N + 1 {
        return Err(Error::parse(
            FORMAT,
            None,
            line_num,
            format!(
                "expected {} type names and a function type, found {} fields",
                N,
                fields.len()
            ),
        ));
    }

    let type_names: [SmolStr; N] = std::array::from_fn(|i| SmolStr::new(fields[i]));
    let func = parse_number::<i32>(fields[N], line_num)?;
    let coefficients = fields[N + 1..]
        .iter()
        .map(|f| parse_number::<f64>(f, line_num))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeDefinition::new(
        type_names,
        ParameterRecord::new(func, coefficients),
    ))
}

fn parse_number<T: FromStr>(field: &str, line_num: usize) -> Result<T, Error> {
    field
        .parse::<T>()
        .map_err(|_| Error::parse(FORMAT, None, line_num, format!("invalid number '{}'", field)))
}
