//! Run independent futures side by side and collect every outcome.

use std::future::Future;

use futures_util::future::join_all;

/// Drives every future to completion concurrently.
///
/// Returns all successes in input order, or, if anything failed, all
/// failures in input order. A failing future does not cancel its siblings.
pub async fn settle_all<I, F, T, E>(tasks: I) -> Result<Vec<T>, Vec<E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let results = join_all(tasks).await;

    let mut successes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(err) => failures.push(err),
        }
    }

    if failures.is_empty() {
        Ok(successes)
    } else {
        Err(failures)
    }
}
