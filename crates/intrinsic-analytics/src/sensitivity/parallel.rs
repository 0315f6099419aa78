//! Conditional parallel evaluation.
//!
//! Uses rayon when the `parallel` feature is enabled and the batch is large
//! enough; results are returned in input order either way.

use super::SensitivityConfig;

/// Maps `f` over `items`, in parallel when `config` allows it.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &SensitivityConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            log::trace!("evaluating {} points in parallel", items.len());
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
