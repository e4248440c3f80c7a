//! Concurrent execution with one task per element.

use crate::{engine::fan_out, Error, Strategy};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{mem, num::NonZeroUsize, sync::Arc, sync::Mutex};
use tracing::debug;

/// A concurrent execution strategy backed by a rayon thread pool.
///
/// Every operation spawns one task per element and blocks the caller until all tasks have
/// completed. No partial result is observable before the operation returns.
///
/// # Shared State
///
/// Tasks never write to the same location without exclusive access:
///
/// - [`map`](Strategy::map) and [`filter`](Strategy::filter) give each task its own
///   pre-allocated output slot. `filter` compacts the slots after all tasks complete,
///   preserving input order.
/// - [`reduce`](Strategy::reduce) folds each element into a single accumulator inside a
///   mutex-guarded critical section. A task that finds the accumulator busy hands its element
///   to the current holder instead of waiting, so a reducer may itself call back into the
///   same pool. Elements are folded in completion order, so the reducer must be commutative
///   and associative for the result to be deterministic.
/// - [`fold`](Strategy::fold) gives each pool thread a private accumulator over a contiguous
///   partition and combines the partials in input order, requiring only associativity.
///
/// # Thread Pool Ownership
///
/// `Concurrent` holds an optional [`Arc<ThreadPool>`], so it can be cheaply cloned and shared
/// across threads. Without a pool ([`Concurrent::default`]), tasks run on rayon's global pool.
///
/// # Examples
///
/// ```
/// use commonware_fanout::{Concurrent, Strategy};
/// use std::num::NonZeroUsize;
///
/// let strategy = Concurrent::new(NonZeroUsize::new(2).unwrap()).unwrap();
///
/// let data: Vec<i64> = (0..1000).collect();
/// let sum = strategy.reduce(&data, 0i64, |acc, &n| acc + n);
/// assert_eq!(sum, 499500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Concurrent {
    thread_pool: Option<Arc<ThreadPool>>,
}

impl Concurrent {
    /// Creates a new [`Concurrent`] strategy with a dedicated pool of `concurrency` threads.
    pub fn new(concurrency: NonZeroUsize) -> Result<Self, Error> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(concurrency.get())
            .thread_name(|index| format!("fanout-{index}"))
            .build()?;
        debug!(concurrency = concurrency.get(), "created thread pool");
        Ok(Self {
            thread_pool: Some(Arc::new(thread_pool)),
        })
    }

    /// Returns the number of threads tasks are scheduled across.
    pub fn concurrency(&self) -> usize {
        match &self.thread_pool {
            Some(thread_pool) => thread_pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn fan_out<I, W>(&self, tasks: I, work: W)
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator + Send,
        I::Item: Send,
        W: Fn(I::Item) + Sync,
    {
        fan_out(self.thread_pool.as_deref(), tasks, work)
    }
}

impl From<Arc<ThreadPool>> for Concurrent {
    fn from(thread_pool: Arc<ThreadPool>) -> Self {
        Self {
            thread_pool: Some(thread_pool),
        }
    }
}

impl Strategy for Concurrent {
    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Send + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<U>> = Vec::with_capacity(items.len());
        slots.resize_with(items.len(), || None);
        self.fan_out(items.iter().zip(slots.iter_mut()), |(item, slot)| {
            *slot = Some(f(item));
        });

        slots
            .into_iter()
            .map(|slot| slot.expect("every slot is written before fan-in"))
            .collect()
    }

    fn filter<T, F>(&self, items: &[T], predicate: F) -> Vec<T>
    where
        T: Clone + Send + Sync,
        F: Fn(&T) -> bool + Send + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let mut keep = vec![false; items.len()];
        self.fan_out(items.iter().zip(keep.iter_mut()), |(item, keep)| {
            *keep = predicate(item);
        });

        // Compact in input order
        items
            .iter()
            .zip(keep)
            .filter_map(|(item, keep)| keep.then(|| item.clone()))
            .collect()
    }

    fn reduce<T, R, F>(&self, items: &[T], initial: R, reducer: F) -> R
    where
        T: Sync,
        R: Send,
        F: Fn(R, &T) -> R + Send + Sync,
    {
        if items.is_empty() {
            return initial;
        }

        // The accumulator is only ever `None` while a task holds the lock. Tasks never block
        // on it: the reducer may itself wait on this pool, and the waiting thread can pick up
        // a sibling task that would otherwise try to re-acquire a lock it already holds.
        let accumulator = Mutex::new(Some(initial));
        let deferred: Mutex<Vec<&T>> = Mutex::new(Vec::new());
        self.fan_out(items.iter(), |item| {
            let Ok(mut guard) = accumulator.try_lock() else {
                deferred.lock().unwrap().push(item);
                return;
            };
            let mut acc = guard.take().expect("accumulator missing");
            acc = reducer(acc, item);
            loop {
                let batch = mem::take(&mut *deferred.lock().unwrap());
                if batch.is_empty() {
                    break;
                }
                for item in batch {
                    acc = reducer(acc, item);
                }
            }
            *guard = Some(acc);
        });

        // Elements deferred after the last holder drained the queue
        let acc = accumulator
            .into_inner()
            .unwrap()
            .expect("accumulator missing");
        deferred
            .into_inner()
            .unwrap()
            .into_iter()
            .fold(acc, reducer)
    }

    fn fold<T, R, ID, F, RD>(&self, items: &[T], identity: ID, fold_op: F, reduce_op: RD) -> R
    where
        T: Sync,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, &T) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync,
    {
        if items.is_empty() {
            return identity();
        }

        let chunk_size = items.len().div_ceil(self.concurrency());
        let partitions = items.chunks(chunk_size);
        let mut partials: Vec<Option<R>> = Vec::with_capacity(partitions.len());
        partials.resize_with(partitions.len(), || None);
        self.fan_out(partitions.zip(partials.iter_mut()), |(partition, partial)| {
            let acc = partition.iter().fold(identity(), &fold_op);
            *partial = Some(acc);
        });

        partials
            .into_iter()
            .map(|partial| partial.expect("every partial is written before fan-in"))
            .reduce(reduce_op)
            .unwrap_or_else(identity)
    }

    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync,
    {
        self.fan_out(items.iter(), &f);
    }
}
