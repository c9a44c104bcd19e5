//! Scoped fan-out for independent scoring work.

use std::panic;

/// Map `f` over `items`, splitting contiguous chunks across scoped threads
/// once there are at least `min_items` items and more than one worker.
///
/// Output order always matches input order. A panic in a worker is re-raised
/// on the calling thread.
pub(crate) fn parallel_map<T, R, F>(items: &[T], workers: usize, min_items: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if workers <= 1 || items.len() < min_items.max(2) {
        return items.iter().map(&f).collect();
    }

    let chunk_size = chunk_len(items.len(), workers);
    let f = &f;

    crossbeam::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move |_| chunk.iter().map(f).collect::<Vec<R>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .collect::<Vec<R>>()
    })
    .unwrap_or_else(|err| panic::resume_unwind(err))
}

/// Contiguous chunk length used to split `len` items across `workers`
pub(crate) fn chunk_len(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}
