//! Abstraction layer for parallel iteration.
//!
//! When the `parallel` feature is enabled, this module re-exports the subset of Rayon's
//! primitives used by the term enumerator. When disabled, it provides serial fallbacks that
//! mimic the same method names, so the map/union-reduce pipeline is written once and
//! produces identical results either way.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IntoParallelIterator, ParallelIterator, ParallelSliceMut};

#[cfg(not(feature = "parallel"))]
pub use self::fallback::*;

/// Number of worker threads available to the map phase.
#[cfg(feature = "parallel")]
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}

/// Number of worker threads available to the map phase (always one without `parallel`).
#[cfg(not(feature = "parallel"))]
pub fn worker_count() -> usize {
    1
}

#[cfg(not(feature = "parallel"))]
mod fallback {
    pub use std::iter::Iterator as ParallelIterator;

    /// Shim trait to allow `into_par_iter()` on types that implement `IntoIterator`.
    pub trait IntoParallelIterator {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Item = I::Item;
        type Iter = I::IntoIter;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }

    /// Shim trait to allow parallel sorting on slices.
    pub trait ParallelSliceMut<T> {
        /// Sorts the slice using the default ordering, potentially in parallel.
        fn par_sort_unstable(&mut self)
        where
            T: Ord;
    }

    impl<T> ParallelSliceMut<T> for [T] {
        fn par_sort_unstable(&mut self)
        where
            T: Ord,
        {
            self.sort_unstable();
        }
    }

    /// Extension trait adding Rayon's reduction entry points to standard iterators.
    pub trait ParallelIteratorExt: Iterator {
        /// Folds all items with an associative operator, returning `None` when empty.
        fn reduce_with<OP>(self, op: OP) -> Option<Self::Item>
        where
            Self: Sized,
            OP: FnMut(Self::Item, Self::Item) -> Self::Item,
        {
            self.reduce(op)
        }
    }

    impl<I: Iterator> ParallelIteratorExt for I {}
}
