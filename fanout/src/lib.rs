//! Transform collections sequentially or with one concurrent task per element.
//!
//! This crate provides the [`Strategy`] trait, which abstracts over sequential and concurrent
//! execution of `map`, `filter`, `reduce`, `fold`, and `for_each`. Algorithms written against
//! [`Strategy`] can be executed either on the calling thread or fanned out across a thread pool
//! without changing their results.
//!
//! # Overview
//!
//! Two implementations are provided:
//!
//! - [`Sequential`]: Single-pass loops on the current thread (works in `no_std`)
//! - [`Concurrent`]: Spawns one task per element on a rayon thread pool and blocks until every
//!   task has completed (requires `std`)
//!
//! The [`sequential`] module also exposes the primitives as free functions, alongside
//! [`contains`](sequential::contains) and [`index_of`](sequential::index_of).
//!
//! # Ordering
//!
//! Both strategies return identical results for the same inputs:
//!
//! - `map` preserves positional correspondence (`output[i] = f(input[i])`).
//! - `filter` preserves input order.
//! - `fold` combines partial results in input order and only requires an associative `reduce_op`.
//! - `reduce` folds every element exactly once, but [`Concurrent`] applies the reducer in
//!   completion order, so the reducer must be commutative and associative.
//!
//! # Features
//!
//! - `std` (default): Enables the [`Concurrent`] strategy backed by rayon
//!
//! # Example
//!
//! ```
//! use commonware_fanout::{Sequential, Strategy};
//!
//! fn sum_of_odd_squares<S: Strategy>(strategy: &S, data: &[i64]) -> i64 {
//!     let odds = strategy.filter(data, |x| x % 2 != 0);
//!     let squares = strategy.map(&odds, |x| x * x);
//!     strategy.reduce(&squares, 0, |acc, x| acc + x)
//! }
//!
//! let data = vec![1, 2, 3, 4, 5];
//! assert_eq!(sum_of_odd_squares(&Sequential, &data), 35);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use cfg_if::cfg_if;
use core::fmt;
use thiserror::Error;

pub mod sequential;
pub use sequential::Sequential;

cfg_if! {
    if #[cfg(feature = "std")] {
        mod engine;
        mod concurrent;
        pub use concurrent::Concurrent;
    }
}

/// Errors that can occur when interacting with this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// No element equals the lookup target.
    #[error("element not found")]
    NotFound,
    /// The thread pool backing a concurrent strategy could not be built.
    #[cfg(feature = "std")]
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A strategy for executing element-wise transformations over a slice.
///
/// Implementations must produce the same result as [`Sequential`] for every operation
/// (subject to the commutativity requirement documented on [`reduce`](Self::reduce)).
pub trait Strategy: Clone + Send + Sync + fmt::Debug + 'static {
    /// Applies `f` to every element, returning the results in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_fanout::{Sequential, Strategy};
    ///
    /// let squared = Sequential.map(&[1, 2, 3, 4, 5], |x| x * x);
    /// assert_eq!(squared, vec![1, 4, 9, 16, 25]);
    /// ```
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Send + Sync;

    /// Returns the elements for which `predicate` holds, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_fanout::{Sequential, Strategy};
    ///
    /// let odds = Sequential.filter(&[1, 2, 3, 4, 6], |x| x % 2 == 1);
    /// assert_eq!(odds, vec![1, 3]);
    /// ```
    fn filter<T, F>(&self, items: &[T], predicate: F) -> Vec<T>
    where
        T: Clone + Send + Sync,
        F: Fn(&T) -> bool + Send + Sync;

    /// Folds every element into `initial` using `reducer`.
    ///
    /// Each element is folded exactly once. Only [`Sequential`] guarantees left-to-right
    /// application; other strategies may apply the reducer in any order, so callers that need
    /// a deterministic result must supply a commutative and associative reducer (or use
    /// [`fold`](Self::fold)).
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_fanout::{Sequential, Strategy};
    ///
    /// let sum = Sequential.reduce(&[1i32, 2, 3, 4, 5], 0, |acc, x| acc + x);
    /// assert_eq!(sum, 15);
    /// ```
    fn reduce<T, R, F>(&self, items: &[T], initial: R, reducer: F) -> R
    where
        T: Sync,
        R: Send,
        F: Fn(R, &T) -> R + Send + Sync;

    /// Reduces a slice to a single value by folding partitions and combining the partials.
    ///
    /// # Arguments
    ///
    /// - `items`: The elements to fold over
    /// - `identity`: Produces the identity value for a partition's accumulator
    /// - `fold_op`: Combines an accumulator with a single element: `(acc, item) -> acc`
    /// - `reduce_op`: Combines two accumulators: `(left, right) -> acc`
    ///
    /// Partials are always combined in input order, so `reduce_op` must be associative but
    /// need not be commutative.
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_fanout::{Sequential, Strategy};
    ///
    /// let joined = Sequential.fold(
    ///     &["a", "b", "c"],
    ///     String::new,
    ///     |mut acc, s| { acc.push_str(s); acc },
    ///     |mut a, b| { a.push_str(&b); a },
    /// );
    /// assert_eq!(joined, "abc");
    /// ```
    fn fold<T, R, ID, F, RD>(&self, items: &[T], identity: ID, fold_op: F, reduce_op: RD) -> R
    where
        T: Sync,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, &T) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync;

    /// Invokes `f` on every element.
    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync;
}

#[cfg(test)]
mod tests {
    use crate::{Concurrent, Sequential, Strategy};
    use proptest::prelude::*;
    use std::{num::NonZeroUsize, sync::Mutex};

    /// Creates a Concurrent strategy for testing.
    fn concurrent_strategy() -> Concurrent {
        Concurrent::new(NonZeroUsize::new(4).unwrap()).unwrap()
    }

    #[test]
    fn example_scenario() {
        let concurrent = concurrent_strategy();

        assert_eq!(
            concurrent.map(&[1, 2, 3, 4, 5], |x| x * x),
            vec![1, 4, 9, 16, 25]
        );
        assert_eq!(concurrent.filter(&[1, 2, 3, 4, 6], |x| x % 2 == 1), vec![1, 3]);
        assert_eq!(concurrent.reduce(&[1i32, 2, 3, 4, 5], 0, |acc, x| acc + x), 15);
    }

    proptest! {
        #[test]
        fn map_matches(data in prop::collection::vec(any::<i32>(), 0..500)) {
            let sequential = Sequential;
            let concurrent = concurrent_strategy();

            let seq_result: Vec<i64> = sequential.map(&data, |&x| (x as i64).wrapping_mul(3));
            let con_result: Vec<i64> = concurrent.map(&data, |&x| (x as i64).wrapping_mul(3));

            prop_assert_eq!(seq_result.len(), data.len());
            prop_assert_eq!(seq_result, con_result);
        }

        #[test]
        fn filter_matches(data in prop::collection::vec(any::<i32>(), 0..500), modulus in 1i32..8) {
            let sequential = Sequential;
            let concurrent = concurrent_strategy();

            let seq_result = sequential.filter(&data, |x| x % modulus == 0);
            let con_result = concurrent.filter(&data, |x| x % modulus == 0);

            prop_assert_eq!(seq_result, con_result);
        }

        #[test]
        fn reduce_sum_matches(data in prop::collection::vec(any::<i64>(), 0..500), initial in any::<i64>()) {
            let sequential = Sequential;
            let concurrent = concurrent_strategy();

            let seq_result = sequential.reduce(&data, initial, |acc, &x| acc.wrapping_add(x));
            let con_result = concurrent.reduce(&data, initial, |acc, &x| acc.wrapping_add(x));

            prop_assert_eq!(seq_result, con_result);
        }

        #[test]
        fn reduce_empty_returns_initial(initial in any::<i64>()) {
            let empty: Vec<i64> = vec![];

            prop_assert_eq!(Sequential.reduce(&empty, initial, |acc, &x| acc + x), initial);
            prop_assert_eq!(concurrent_strategy().reduce(&empty, initial, |acc, &x| acc + x), initial);
        }

        #[test]
        #[allow(clippy::redundant_clone)]
        fn fold_collect_preserves_elements(data in prop::collection::vec(any::<i32>(), 0..500)) {
            let sequential = Sequential;
            let concurrent = concurrent_strategy();

            let seq_result: Vec<i32> = sequential.fold(
                &data,
                Vec::new,
                |mut acc, &x| { acc.push(x); acc },
                |mut a, b| { a.extend(b); a },
            );
            let con_result: Vec<i32> = concurrent.fold(
                &data,
                Vec::new,
                |mut acc, &x| { acc.push(x); acc },
                |mut a, b| { a.extend(b); a },
            );

            prop_assert_eq!(seq_result, data.clone());
            prop_assert_eq!(con_result, data);
        }

        #[test]
        fn for_each_visits_every_element(data in prop::collection::vec(any::<u16>(), 0..500)) {
            let visited = Mutex::new(Vec::new());
            concurrent_strategy().for_each(&data, |&x| visited.lock().unwrap().push(x));

            let mut visited = visited.into_inner().unwrap();
            let mut expected = data.clone();
            visited.sort_unstable();
            expected.sort_unstable();
            prop_assert_eq!(visited, expected);
        }
    }
}
