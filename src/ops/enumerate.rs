//! Bonded-term enumeration over a frozen particle graph.
//!
//! Bonds are validated sequentially: every edge must resolve to a bond template. Angles,
//! dihedrals, and 1-4 pairs come from simple paths of exactly two and three edges. A path is
//! reported only from its lower-ordered endpoint, so every unordered endpoint pair is scanned
//! from exactly one starting node. Starting nodes are split into contiguous chunks that are
//! mapped independently and merged by set union, which makes the result independent of how
//! the work is partitioned or scheduled.

use crate::model::{
    graph::ParticleGraph,
    term::{AngleTerm, BondTerm, DihedralTerm, PairTerm, Terms},
    types::InteractionKind,
};
use crate::ops::error::Error;
use crate::ops::index::TemplateIndex;
use crate::utils::parallel::*;
use std::collections::HashSet;
use std::ops::Range;

const DEFAULT_CHUNK_SIZE: usize = 100;

/// Partial higher-order result of one work unit.
#[derive(Debug, Default)]
struct TermSet {
    angles: HashSet<AngleTerm>,
    dihedrals: HashSet<DihedralTerm>,
    pairs: HashSet<PairTerm>,
}

impl TermSet {
    /// Associative, commutative merge of two partial results.
    fn union(mut self, mut other: Self) -> Self {
        merge_into(&mut self.angles, &mut other.angles);
        merge_into(&mut self.dihedrals, &mut other.dihedrals);
        merge_into(&mut self.pairs, &mut other.pairs);
        self
    }
}

fn merge_into<T: Eq + std::hash::Hash>(target: &mut HashSet<T>, source: &mut HashSet<T>) {
    if source.len() > target.len() {
        std::mem::swap(target, source);
    }
    target.extend(source.drain());
}

fn into_sorted<T: Ord + Send>(set: HashSet<T>) -> Vec<T> {
    let mut terms: Vec<T> = set.into_iter().collect();
    terms.par_sort_unstable();
    terms
}

/// Derives bonds, angles, dihedrals, and 1-4 pairs for a graph.
///
/// The enumerator only borrows its inputs; both must be fully built before it runs.
pub struct TermEnumerator<'a> {
    graph: &'a ParticleGraph,
    index: &'a TemplateIndex,
    chunk_size: usize,
}

impl<'a> TermEnumerator<'a> {
    pub fn new(graph: &'a ParticleGraph, index: &'a TemplateIndex) -> Self {
        Self {
            graph,
            index,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the number of starting nodes per work unit (at least one).
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Runs bond validation followed by the parallel higher-order scan.
    ///
    /// # Returns
    ///
    /// All derived terms, each kind sorted by participant ids then template id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnparameterizedBond`] if any edge lacks a bond template. No
    /// higher-order work is started in that case.
    pub fn enumerate(&self) -> Result<Terms, Error> {
        let bonds = self.enumerate_bonds()?;
        let (angles, dihedrals, pairs) = self.enumerate_higher_order();

        let terms = Terms {
            bonds,
            angles,
            dihedrals,
            pairs,
        };

        for kind in InteractionKind::ALL {
            log::info!("Derived {} {} terms", terms.count(kind), kind);
        }

        Ok(terms)
    }

    /// Resolves one bond term per graph edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnparameterizedBond`] for the first edge without a template.
    pub fn enumerate_bonds(&self) -> Result<Vec<BondTerm>, Error> {
        let graph = self.graph;
        let mut bonds = Vec::with_capacity(graph.edge_count());

        for &(a, b) in graph.edge_indices() {
            let types = [graph.type_of(a), graph.type_of(b)];
            let template = self.index.bonds.lookup(&types).ok_or_else(|| {
                Error::unparameterized_bond(graph.id_of(a), graph.id_of(b), types[0], types[1])
            })?;
            bonds.push(BondTerm::new([graph.id_of(a), graph.id_of(b)], template));
        }

        bonds.sort_unstable();
        Ok(bonds)
    }

    /// Derives angle, dihedral, and pair terms from two- and three-edge simple paths.
    ///
    /// Candidates without a matching template are dropped; this never fails.
    pub fn enumerate_higher_order(&self) -> (Vec<AngleTerm>, Vec<DihedralTerm>, Vec<PairTerm>) {
        let n = self.graph.particle_count();
        let chunks: Vec<Range<usize>> = (0..n)
            .step_by(self.chunk_size)
            .map(|lo| lo..(lo + self.chunk_size).min(n))
            .collect();

        log::debug!(
            "Scanning {} starting nodes in {} chunks on {} workers",
            n,
            chunks.len(),
            worker_count()
        );

        let merged = chunks
            .into_par_iter()
            .map(|starts| self.scan(starts))
            .reduce_with(TermSet::union)
            .unwrap_or_default();

        (
            into_sorted(merged.angles),
            into_sorted(merged.dihedrals),
            into_sorted(merged.pairs),
        )
    }

    /// Walks all two- and three-edge simple paths leaving each start node toward a
    /// higher-ordered endpoint.
    fn scan(&self, starts: Range<usize>) -> TermSet {
        let graph = self.graph;
        let index = self.index;
        let mut local = TermSet::default();

        for s in starts {
            let ts = graph.type_of(s);
            let ids = graph.id_of(s);

            for &m in graph.neighbors(s) {
                let tm = graph.type_of(m);

                for &j in graph.neighbors(m) {
                    if j == s {
                        continue;
                    }
                    let tj = graph.type_of(j);

                    if j > s {
                        if let Some(t) = index.angles.lookup(&[ts, tm, tj]) {
                            local.angles.insert(AngleTerm::new(
                                [ids, graph.id_of(m), graph.id_of(j)],
                                t,
                            ));
                        }
                    }

                    for &k in graph.neighbors(j) {
                        if k == m || k == s || k < s {
                            continue;
                        }
                        let tk = graph.type_of(k);
                        let idk = graph.id_of(k);

                        if let Some(t) = index.dihedrals.lookup(&[ts, tm, tj, tk]) {
                            local.dihedrals.insert(DihedralTerm::new(
                                [ids, graph.id_of(m), graph.id_of(j), idk],
                                t,
                            ));
                        }
                        if let Some(t) = index.pairs.lookup(&[ts, tk]) {
                            local.pairs.insert(PairTerm::new([ids, idk], t));
                        }
                    }
                }
            }
        }

        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::particle::Particle;
    use crate::model::types::{ParameterRecord, TypeId};
    use crate::ops::graph::GraphBuilder;

    fn graph(types: &[(u64, TypeId)], edges: &[[i64; 2]]) -> ParticleGraph {
        GraphBuilder::new()
            .particles(types.iter().map(|&(id, t)| Particle::new(id, t)))
            .edges(edges.iter().copied())
            .build()
            .unwrap()
    }

    fn linear_path() -> ParticleGraph {
        graph(
            &[(1, 0), (2, 0), (3, 0), (4, 0)],
            &[[1, 2], [2, 3], [3, 4]],
        )
    }

    fn full_index(with_angles: bool) -> TemplateIndex {
        let mut index = TemplateIndex::default();
        let rec = |k: f64| ParameterRecord::new(1, vec![k]);
        index.bonds.insert([0, 0], rec(1.0), "A-A").unwrap();
        if with_angles {
            index.angles.insert([0, 0, 0], rec(2.0), "A-A-A").unwrap();
        }
        index
            .dihedrals
            .insert([0, 0, 0, 0], rec(3.0), "A-A-A-A")
            .unwrap();
        index.pairs.insert([0, 0], rec(4.0), "A-A").unwrap();
        index
    }

    #[test]
    fn linear_path_yields_expected_terms() {
        let graph = linear_path();
        let index = full_index(true);
        let terms = TermEnumerator::new(&graph, &index).enumerate().unwrap();

        assert_eq!(
            terms.bonds,
            vec![
                BondTerm::new([1, 2], 1),
                BondTerm::new([2, 3], 1),
                BondTerm::new([3, 4], 1),
            ]
        );
        assert_eq!(
            terms.angles,
            vec![AngleTerm::new([1, 2, 3], 1), AngleTerm::new([2, 3, 4], 1)]
        );
        assert_eq!(terms.dihedrals, vec![DihedralTerm::new([1, 2, 3, 4], 1)]);
        assert_eq!(terms.pairs, vec![PairTerm::new([1, 4], 1)]);
    }

    #[test]
    fn missing_angle_template_drops_only_angles() {
        let graph = linear_path();
        let index = full_index(false);
        let terms = TermEnumerator::new(&graph, &index).enumerate().unwrap();

        assert!(terms.angles.is_empty());
        assert_eq!(terms.bonds.len(), 3);
        assert_eq!(terms.dihedrals, vec![DihedralTerm::new([1, 2, 3, 4], 1)]);
        assert_eq!(terms.pairs, vec![PairTerm::new([1, 4], 1)]);
    }

    #[test]
    fn unparameterized_bond_is_fatal() {
        let graph = graph(&[(1, 0), (2, 1), (3, 0)], &[[1, 2], [1, 3]]);
        let index = full_index(true);
        let result = TermEnumerator::new(&graph, &index).enumerate();

        assert!(matches!(
            result,
            Err(Error::UnparameterizedBond {
                a: 1,
                b: 2,
                type_a: 0,
                type_b: 1
            })
        ));
    }

    #[test]
    fn templates_resolve_in_reversed_orientation() {
        let graph = graph(&[(1, 0), (2, 1), (3, 2)], &[[1, 2], [2, 3]]);
        let mut index = TemplateIndex::default();
        index
            .bonds
            .insert([0, 1], ParameterRecord::new(1, vec![]), "A-B")
            .unwrap();
        index
            .bonds
            .insert([2, 1], ParameterRecord::new(1, vec![1.0]), "C-B")
            .unwrap();
        index
            .angles
            .insert([2, 1, 0], ParameterRecord::new(1, vec![]), "C-B-A")
            .unwrap();

        let terms = TermEnumerator::new(&graph, &index).enumerate().unwrap();
        assert_eq!(
            terms.bonds,
            vec![BondTerm::new([1, 2], 1), BondTerm::new([2, 3], 2)]
        );
        assert_eq!(terms.angles, vec![AngleTerm::new([1, 2, 3], 1)]);
    }

    fn branched() -> ParticleGraph {
        graph(
            &[
                (1, 0),
                (2, 0),
                (3, 0),
                (4, 0),
                (5, 0),
                (6, 0),
                (7, 0),
                (8, 0),
                (9, 0),
                (10, 0),
                (11, 0),
                (12, 0),
            ],
            &[
                [1, 2],
                [2, 3],
                [3, 4],
                [4, 5],
                [5, 6],
                [6, 1],
                [3, 7],
                [7, 8],
                [8, 9],
                [9, 10],
                [8, 11],
                [11, 12],
            ],
        )
    }

    #[test]
    fn result_is_independent_of_chunk_size() {
        let graph = branched();
        let index = full_index(true);
        let reference = TermEnumerator::new(&graph, &index)
            .chunk_size(graph.particle_count())
            .enumerate()
            .unwrap();

        for chunk in [1, 2, 5] {
            let terms = TermEnumerator::new(&graph, &index)
                .chunk_size(chunk)
                .enumerate()
                .unwrap();
            assert_eq!(terms, reference, "chunk size {chunk}");
        }
        assert!(!reference.dihedrals.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = branched();
        let index = full_index(true);
        let enumerator = TermEnumerator::new(&graph, &index).chunk_size(3);

        assert_eq!(enumerator.enumerate().unwrap(), enumerator.enumerate().unwrap());
    }

    #[test]
    fn four_ring_has_one_term_per_distinct_path() {
        let graph = graph(
            &[(1, 0), (2, 0), (3, 0), (4, 0)],
            &[[1, 2], [2, 3], [3, 4], [4, 1]],
        );
        let index = full_index(true);
        let terms = TermEnumerator::new(&graph, &index)
            .chunk_size(1)
            .enumerate()
            .unwrap();

        let angles: Vec<_> = terms.angles.iter().map(|t| t.ids).collect();
        assert_eq!(angles, vec![[1, 2, 3], [1, 4, 3], [2, 1, 4], [2, 3, 4]]);

        let dihedrals: Vec<_> = terms.dihedrals.iter().map(|t| t.ids).collect();
        assert_eq!(
            dihedrals,
            vec![[1, 2, 3, 4], [1, 4, 3, 2], [2, 1, 4, 3], [3, 2, 1, 4]]
        );

        let pairs: Vec<_> = terms.pairs.iter().map(|t| t.ids).collect();
        assert_eq!(pairs, vec![[1, 2], [1, 4], [2, 3], [3, 4]]);
    }

    #[test]
    fn pairs_sharing_endpoints_collapse() {
        let graph = graph(
            &[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)],
            &[[1, 2], [2, 3], [3, 4], [4, 1], [3, 5]],
        );
        let index = full_index(true);
        let terms = TermEnumerator::new(&graph, &index).enumerate().unwrap();

        let to_five: Vec<_> = terms
            .dihedrals
            .iter()
            .filter(|t| t.ids[0] == 1 && t.ids[3] == 5)
            .map(|t| t.ids)
            .collect();
        assert_eq!(to_five, vec![[1, 2, 3, 5], [1, 4, 3, 5]]);

        let pair_count = terms.pairs.iter().filter(|t| t.ids == [1, 5]).count();
        assert_eq!(pair_count, 1);
    }

    #[test]
    fn empty_graph_yields_no_terms() {
        let graph = GraphBuilder::new().build().unwrap();
        let index = full_index(true);
        let terms = TermEnumerator::new(&graph, &index).enumerate().unwrap();

        assert_eq!(terms, Terms::default());
    }
}
