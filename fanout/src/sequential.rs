//! Single-pass primitives executed on the calling thread.
//!
//! These functions define the reference semantics for every [Strategy]: any other strategy
//! must produce the same output as the functions here for the same inputs.

use crate::{Error, Strategy};
use alloc::vec::Vec;

/// Applies `f` to every element, returning the results in input order.
pub fn map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        result.push(f(item));
    }
    result
}

/// Returns a copy of every element for which `predicate` holds, in input order.
pub fn filter<T, F>(items: &[T], predicate: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if predicate(item) {
            result.push(item.clone());
        }
    }
    result
}

/// Folds every element into `initial`, left to right.
pub fn reduce<T, R, F>(items: &[T], initial: R, reducer: F) -> R
where
    F: Fn(R, &T) -> R,
{
    let mut acc = initial;
    for item in items {
        acc = reducer(acc, item);
    }
    acc
}

/// Invokes `f` on every element, in input order.
pub fn for_each<T, F>(items: &[T], f: F)
where
    F: Fn(&T),
{
    for item in items {
        f(item);
    }
}

/// Returns `true` if `target` is present in `items`.
pub fn contains<T: PartialEq>(items: &[T], target: &T) -> bool {
    index_of(items, target).is_ok()
}

/// Returns the position of the first element equal to `target`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no element equals `target`.
pub fn index_of<T: PartialEq>(items: &[T], target: &T) -> Result<usize, Error> {
    for (i, item) in items.iter().enumerate() {
        if item == target {
            return Ok(i);
        }
    }
    Err(Error::NotFound)
}

/// A sequential execution strategy.
///
/// This strategy executes all operations on the current thread without any
/// parallelism. It is useful for:
///
/// - Debugging and testing (deterministic execution)
/// - `no_std` environments where threading is unavailable
/// - Small workloads where spawning tasks costs more than the work itself
///
/// # Examples
///
/// ```
/// use commonware_fanout::{Sequential, Strategy};
///
/// let data: Vec<i32> = vec![1, 2, 3, 4, 5];
/// let sum = Sequential.reduce(&data, 0, |acc, x| acc + x);
/// assert_eq!(sum, 15);
/// ```
#[derive(Default, Debug, Clone)]
pub struct Sequential;

impl Strategy for Sequential {
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Send + Sync,
    {
        map(items, f)
    }

    fn filter<T, F>(&self, items: &[T], predicate: F) -> Vec<T>
    where
        T: Clone + Send + Sync,
        F: Fn(&T) -> bool + Send + Sync,
    {
        filter(items, predicate)
    }

    fn reduce<T, R, F>(&self, items: &[T], initial: R, reducer: F) -> R
    where
        T: Sync,
        R: Send,
        F: Fn(R, &T) -> R + Send + Sync,
    {
        reduce(items, initial, reducer)
    }

    fn fold<T, R, ID, F, RD>(&self, items: &[T], identity: ID, fold_op: F, _reduce_op: RD) -> R
    where
        T: Sync,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, &T) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync,
    {
        reduce(items, identity(), fold_op)
    }

    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync,
    {
        for_each(items, f)
    }
}
