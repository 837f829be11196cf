//! Derived bonded terms: participant particle ids plus the resolved template id.
//!
//! Terms are plain values. Equality and hashing cover every field, so a set of terms has no
//! duplicates by construction, and the derived ordering (participants first, template last)
//! is the deterministic emission order.

use super::types::{InteractionKind, ParticleId, TemplateId};
use std::fmt;

/// Two bonded particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondTerm {
    pub ids: [ParticleId; 2],
    pub template: TemplateId,
}

/// Three particles along a 2-edge path; `ids[1]` is the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AngleTerm {
    pub ids: [ParticleId; 3],
    pub template: TemplateId,
}

/// Four particles along a 3-edge path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DihedralTerm {
    pub ids: [ParticleId; 4],
    pub template: TemplateId,
}

/// The two endpoints of a 3-edge path (1-4 interaction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairTerm {
    pub ids: [ParticleId; 2],
    pub template: TemplateId,
}

macro_rules! impl_term {
    ($ty:ident, $n:literal, $kind:expr) => {
        impl $ty {
            pub const KIND: InteractionKind = $kind;

            pub fn new(ids: [ParticleId; $n], template: TemplateId) -> Self {
                Self { ids, template }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let ids: Vec<String> = self.ids.iter().map(|id| id.to_string()).collect();
                write!(f, "{}({}, #{})", Self::KIND, ids.join("-"), self.template)
            }
        }
    };
}

impl_term!(BondTerm, 2, InteractionKind::Bond);
impl_term!(AngleTerm, 3, InteractionKind::Angle);
impl_term!(DihedralTerm, 4, InteractionKind::Dihedral);
impl_term!(PairTerm, 2, InteractionKind::Pair);

/// Sorted, duplicate-free term lists for every interaction kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms {
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub dihedrals: Vec<DihedralTerm>,
    pub pairs: Vec<PairTerm>,
}

impl Terms {
    pub fn count(&self, kind: InteractionKind) -> usize {
        match kind {
            InteractionKind::Bond => self.bonds.len(),
            InteractionKind::Angle => self.angles.len(),
            InteractionKind::Dihedral => self.dihedrals.len(),
            InteractionKind::Pair => self.pairs.len(),
        }
    }
}

impl fmt::Display for Terms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Terms {{ bonds: {}, angles: {}, dihedrals: {}, pairs: {} }}",
            self.bonds.len(),
            self.angles.len(),
            self.dihedrals.len(),
            self.pairs.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn terms_order_by_leading_participant_then_rest() {
        let mut angles = vec![
            AngleTerm::new([2, 3, 4], 1),
            AngleTerm::new([1, 5, 2], 1),
            AngleTerm::new([1, 2, 3], 2),
        ];
        angles.sort();

        assert_eq!(
            angles,
            vec![
                AngleTerm::new([1, 2, 3], 2),
                AngleTerm::new([1, 5, 2], 1),
                AngleTerm::new([2, 3, 4], 1),
            ]
        );
    }

    #[test]
    fn identity_includes_template() {
        let mut set = HashSet::new();
        set.insert(PairTerm::new([1, 4], 1));
        set.insert(PairTerm::new([1, 4], 1));
        set.insert(PairTerm::new([1, 4], 2));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_names_kind_participants_and_template() {
        assert_eq!(
            DihedralTerm::new([1, 2, 3, 4], 7).to_string(),
            "dihedral(1-2-3-4, #7)"
        );
        assert_eq!(BondTerm::new([5, 6], 1).to_string(), "bond(5-6, #1)");
    }

    #[test]
    fn terms_count_matches_lists() {
        let terms = Terms {
            bonds: vec![BondTerm::new([1, 2], 1), BondTerm::new([2, 3], 1)],
            angles: vec![AngleTerm::new([1, 2, 3], 1)],
            ..Default::default()
        };

        assert_eq!(terms.count(InteractionKind::Bond), 2);
        assert_eq!(terms.count(InteractionKind::Angle), 1);
        assert_eq!(terms.count(InteractionKind::Dihedral), 0);
        assert_eq!(
            terms.to_string(),
            "Terms { bonds: 2, angles: 1, dihedrals: 0, pairs: 0 }"
        );
    }
}
