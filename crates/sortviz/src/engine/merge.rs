//! Top-down merge sort.

use super::Driver;
use crate::error::EngineError;
use futures::future::{BoxFuture, FutureExt};

impl<T> Driver<'_, T>
where
    T: Ord + Clone + Send + Sync,
{
    /// Sorts the inclusive range `l..=r` of the working buffer.
    pub(super) fn merge_sort(&mut self, l: usize, r: usize) -> BoxFuture<'_, Result<(), EngineError>> {
        async move {
            if l >= r {
                return Ok(());
            }

            let m = l + (r - l) / 2;
            self.merge_sort(l, m).await?;
            self.merge_sort(m + 1, r).await?;
            self.merge(l, m, r).await
        }
        .boxed()
    }

    /// Merges the sorted runs `l..=m` and `m+1..=r`.
    ///
    /// Ties take from the left run. Every placement is a write; only
    /// placements decided by comparing both heads count a comparison.
    async fn merge(&mut self, l: usize, m: usize, r: usize) -> Result<(), EngineError> {
        let left = self.buf[l..=m].to_vec();
        let right = self.buf[m + 1..=r].to_vec();

        let (mut i, mut j, mut k) = (0, 0, l);
        while i < left.len() && j < right.len() {
            self.compare();
            if left[i] <= right[j] {
                self.buf[k] = left[i].clone();
                i += 1;
            } else {
                self.buf[k] = right[j].clone();
                j += 1;
            }
            self.write().await?;
            k += 1;
        }

        for value in left[i..].iter().chain(&right[j..]) {
            self.buf[k] = value.clone();
            k += 1;
            self.write().await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{algorithm::Algorithm, engine::testing::sort_recorded, model::Counters};

    #[tokio::test(start_paused = true)]
    async fn trivial_inputs_do_no_work() {
        for input in [vec![], vec![7]] {
            let (output, counters, recorder) = sort_recorded(Algorithm::Merge, input.clone()).await;

            assert_eq!(output, input);
            assert_eq!(counters, Counters::default());
            assert!(recorder.snapshots().is_empty());
            assert!(recorder.finished().is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drained_elements_are_written_but_not_compared() {
        let (output, counters, recorder) = sort_recorded(Algorithm::Merge, vec![2, 1]).await;

        assert_eq!(output, vec![1, 2]);
        assert_eq!(
            counters,
            Counters {
                comparisons: 1,
                writes: 2
            }
        );
        assert_eq!(recorder.snapshots(), vec![vec![1, 1], vec![1, 2]]);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_every_element_on_every_level() {
        let (output, counters, _) = sort_recorded(Algorithm::Merge, vec![4, 3, 2, 1]).await;

        assert_eq!(output, vec![1, 2, 3, 4]);
        assert_eq!(
            counters,
            Counters {
                comparisons: 4,
                writes: 8
            }
        );
    }
}
