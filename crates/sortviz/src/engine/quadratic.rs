//! Bubble, insertion and selection sort.

use super::Driver;
use crate::error::EngineError;

impl<T> Driver<'_, T>
where
    T: Ord + Clone + Send + Sync,
{
    pub(super) async fn bubble(&mut self) -> Result<(), EngineError> {
        let n = self.buf.len();
        for i in 0..n {
            for j in 0..n - i - 1 {
                self.compare();
                if self.buf[j] > self.buf[j + 1] {
                    self.buf.swap(j, j + 1);
                    self.write().await?;
                }
            }
        }
        Ok(())
    }

    /// Each shift to the right is counted as a write. Dropping the key into
    /// its slot is published but not counted.
    pub(super) async fn insertion(&mut self) -> Result<(), EngineError> {
        for i in 1..self.buf.len() {
            let key = self.buf[i].clone();

            // `hole` is the slot the key would go into right now
            let mut hole = i;
            while hole > 0 {
                self.compare();
                if self.buf[hole - 1] > key {
                    self.buf[hole] = self.buf[hole - 1].clone();
                    hole -= 1;
                    self.write().await?;
                } else {
                    break;
                }
            }

            self.buf[hole] = key;
            self.publish().await?;
        }
        Ok(())
    }

    pub(super) async fn selection(&mut self) -> Result<(), EngineError> {
        let n = self.buf.len();
        for i in 0..n {
            let mut min = i;
            for j in i + 1..n {
                self.compare();
                if self.buf[j] < self.buf[min] {
                    min = j;
                }
            }

            if min != i {
                self.buf.swap(i, min);
                self.write().await?;
            }
        }
        Ok(())
    }
}
