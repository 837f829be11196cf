use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// Stable particle identifier taken from the snapshot's id column.
pub type ParticleId = u64;

/// Particle type identifier (the snapshot's species column).
pub type TypeId = u32;

/// Dense, 1-based identifier of an interaction template within one [`InteractionKind`].
pub type TemplateId = usize;

/// Raw id value used by fixed-width snapshot storage to mark padding and "no bond" slots.
pub const SENTINEL_ID: i64 = -1;

/// Category of a bonded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionKind {
    Bond,
    Angle,
    Dihedral,
    Pair,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::Bond,
        InteractionKind::Angle,
        InteractionKind::Dihedral,
        InteractionKind::Pair,
    ];

    /// Number of participating particles.
    pub fn arity(&self) -> usize {
        match self {
            InteractionKind::Bond | InteractionKind::Pair => 2,
            InteractionKind::Angle => 3,
            InteractionKind::Dihedral => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionKind::Bond => "bond",
            InteractionKind::Angle => "angle",
            InteractionKind::Dihedral => "dihedral",
            InteractionKind::Pair => "pair",
        }
    }

    /// Section header used for the type definitions of this kind (e.g. `bondtypes`).
    pub fn types_section(&self) -> &'static str {
        match self {
            InteractionKind::Bond => "bondtypes",
            InteractionKind::Angle => "angletypes",
            InteractionKind::Dihedral => "dihedraltypes",
            InteractionKind::Pair => "pairtypes",
        }
    }

    /// Section header used for concrete interactions of this kind (e.g. `bonds`).
    pub fn section(&self) -> &'static str {
        match self {
            InteractionKind::Bond => "bonds",
            InteractionKind::Angle => "angles",
            InteractionKind::Dihedral => "dihedrals",
            InteractionKind::Pair => "pairs",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bond" | "bonds" | "bondtypes" => Ok(InteractionKind::Bond),
            "angle" | "angles" | "angletypes" => Ok(InteractionKind::Angle),
            "dihedral" | "dihedrals" | "dihedraltypes" => Ok(InteractionKind::Dihedral),
            "pair" | "pairs" | "pairtypes" => Ok(InteractionKind::Pair),
            _ => Err(format!("Invalid interaction kind: {}", s)),
        }
    }
}

/// Functional-form selector plus coefficients, carried through the core unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    pub func: i32,
    pub coefficients: Vec<f64>,
}

impl ParameterRecord {
    pub fn new(func: i32, coefficients: Vec<f64>) -> Self {
        Self { func, coefficients }
    }
}

impl fmt::Display for ParameterRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.func)?;
        for c in &self.coefficients {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}
