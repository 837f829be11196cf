use crate::io::error::Error;
use crate::model::snapshot::Snapshot;
use std::io::{BufRead, Read};

const FORMAT: &str = "TOML snapshot";

/// Reads a single-frame snapshot stored as TOML.
///
/// ```toml
/// box = [3.0, 3.0, 3.0]
///
/// [[particles]]
/// id = 1
/// species = 0
/// mass = 15.035
/// position = [0.10, 0.20, 0.30]
///
/// [[connectivity]]
/// name = "chem_bonds_0"
/// edges = [[1, 2], [-1, -1]]
/// ```
///
/// Padding rows and sentinel edges are kept verbatim; they are filtered downstream.
pub fn read<R: BufRead>(mut reader: R) -> Result<Snapshot, Error> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| Error::from_io(e, None))?;

    toml::from_str(&content).map_err(|e| {
        let line_number = e
            .span()
            .map(|span| {
                let end = span.start.min(content.len());
                content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
            })
            .unwrap_or(0);
        Error::parse(FORMAT, None, line_number, e.message())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::{ConnectivityGroup, ParticleRecord};
    use std::io::Cursor;

    #[test]
    fn reads_particles_connectivity_and_box() {
        let text = r#"
box = [3.0, 4.0, 5.0]

[[particles]]
id = 1
species = 0
mass = 15.035
position = [0.1, 0.2, 0.3]

[[particles]]
id = 2
species = 1
mass = 14.027
position = [0.2, 0.2, 0.3]
charge = -0.25

[[particles]]
id = -1
species = -1

[[connectivity]]
name = "chem_bonds_0"
edges = [[1, 2], [-1, -1]]
"#;
        let snapshot = read(Cursor::new(text)).unwrap();

        assert_eq!(snapshot.box_edges, [3.0, 4.0, 5.0]);
        assert_eq!(snapshot.particles.len(), 3);
        assert_eq!(snapshot.particle_count(), 2);
        assert_eq!(
            snapshot.particles[1],
            ParticleRecord {
                id: 2,
                species: 1,
                mass: 14.027,
                position: [0.2, 0.2, 0.3],
                charge: Some(-0.25),
            }
        );
        assert_eq!(
            snapshot.connectivity,
            vec![ConnectivityGroup {
                name: "chem_bonds_0".into(),
                edges: vec![[1, 2], [-1, -1]],
            }]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = "[[particles]]\nid = 1\nspecies = 0\nvelocity = [0.0, 0.0, 0.0]\n";
        assert!(matches!(
            read(Cursor::new(text)),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn empty_document_is_an_empty_snapshot() {
        let snapshot = read(Cursor::new("")).unwrap();
        assert_eq!(snapshot, Snapshot::new());
    }
}
