//! Quick sort with Lomuto partitioning.

use super::Driver;
use crate::error::EngineError;
use futures::future::{BoxFuture, FutureExt};

impl<T> Driver<'_, T>
where
    T: Ord + Clone + Send + Sync,
{
    /// Sorts the inclusive range `start..=end` of the working buffer.
    pub(super) fn quick(&mut self, start: usize, end: usize) -> BoxFuture<'_, Result<(), EngineError>> {
        async move {
            if start >= end {
                return Ok(());
            }

            let pivot = self.partition(start, end).await?;
            if pivot > start {
                self.quick(start, pivot - 1).await?;
            }
            self.quick(pivot + 1, end).await
        }
        .boxed()
    }

    /// Partitions `low..=high` around `buf[high]` and returns the pivot's
    /// final index. Every exchange is a write, including the pivot move and
    /// exchanges of an element with itself.
    async fn partition(&mut self, low: usize, high: usize) -> Result<usize, EngineError> {
        let pivot = self.buf[high].clone();

        // everything left of `boundary` is smaller than the pivot
        let mut boundary = low;
        for j in low..high {
            self.compare();
            if self.buf[j] < pivot {
                self.buf.swap(boundary, j);
                boundary += 1;
                self.write().await?;
            }
        }

        self.buf.swap(boundary, high);
        self.write().await?;

        Ok(boundary)
    }
}

#[cfg(test)]
mod tests {
    use crate::{algorithm::Algorithm, engine::testing::sort_recorded, model::Counters};

    #[tokio::test(start_paused = true)]
    async fn trivial_inputs_do_no_work() {
        for input in [vec![], vec![42]] {
            let (output, counters, recorder) = sort_recorded(Algorithm::Quick, input.clone()).await;

            assert_eq!(output, input);
            assert_eq!(counters, Counters::default());
            assert!(recorder.snapshots().is_empty());
            assert!(recorder.finished().is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn partitions_around_the_last_element() {
        let (output, counters, recorder) = sort_recorded(Algorithm::Quick, vec![3, 1, 2]).await;

        assert_eq!(output, vec![1, 2, 3]);
        assert_eq!(
            counters,
            Counters {
                comparisons: 2,
                writes: 2
            }
        );
        assert_eq!(recorder.snapshots(), vec![vec![1, 3, 2], vec![1, 2, 3]]);
    }

    #[tokio::test(start_paused = true)]
    async fn sorted_input_is_quadratic() {
        let input = (0..10).collect::<Vec<i64>>();
        let (output, counters, _) = sort_recorded(Algorithm::Quick, input.clone()).await;

        assert_eq!(output, input);
        // each partition exchanges every element with itself, then the pivot
        assert_eq!(counters.comparisons, 45);
        assert_eq!(counters.writes, 45 + 9);
    }
}
