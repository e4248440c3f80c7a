//! Fan-out/fan-in over a rayon thread pool.

use rayon::ThreadPool;
use tracing::trace;

/// Spawns one task per item and returns once every task has run `work` to completion.
///
/// Each task owns its item, so any per-task state (an index, an output slot, a partition)
/// must be carried in the item rather than captured from the caller's loop.
///
/// If `pool` is `None`, tasks are spawned onto the pool of the calling thread (or rayon's
/// global pool when called from outside any pool).
///
/// # Panics
///
/// If `work` panics in any task, the remaining tasks still run to completion before the
/// panic is propagated to the caller. The barrier never waits on a task that will not finish.
pub(crate) fn fan_out<I, W>(pool: Option<&ThreadPool>, tasks: I, work: W)
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator + Send,
    I::Item: Send,
    W: Fn(I::Item) + Sync,
{
    let tasks = tasks.into_iter();
    let count = tasks.len();
    if count == 0 {
        return;
    }

    let work = &work;
    let run = move || {
        rayon::scope(|scope| {
            for task in tasks {
                scope.spawn(move |_| work(task));
            }
        })
    };

    trace!(count, "fanning out");
    match pool {
        Some(pool) => pool.install(run),
        None => run(),
    }
    trace!(count, "fanned in");
}
