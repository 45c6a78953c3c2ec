use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::Error;

/// Disjoint train/validation/test partitions of a set of sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splits<T> {
    pub train: Vec<Vec<T>>,
    pub val: Vec<Vec<T>>,
    pub test: Vec<Vec<T>>,
}

impl<T> Splits<T> {
    /// Partitions with their conventional names, in train/val/test order.
    pub fn named(&self) -> [(&'static str, &[Vec<T>]); 3] {
        [
            ("train", self.train.as_slice()),
            ("val", self.val.as_slice()),
            ("test", self.test.as_slice()),
        ]
    }
}

/// Deduplicate and sort `sequences`, shuffle them with `seed`, then take
/// `floor(n * test_fraction)` for test, `floor(n * val_fraction)` for validation,
/// and leave the rest for training.
pub fn split<T>(
    sequences: &[Vec<T>],
    test_fraction: f64,
    val_fraction: f64,
    seed: u64,
) -> Result<Splits<T>, Error>
where
    T: Ord + Clone,
{
    let in_range = |f: f64| (0.0..=1.0).contains(&f);
    if !in_range(test_fraction) || !in_range(val_fraction) || test_fraction + val_fraction > 1.0
    {
        return Err(Error::InvalidFractions {
            test: test_fraction,
            val: val_fraction,
        });
    }

    let unique: BTreeSet<&Vec<T>> = sequences.iter().collect();
    let mut shuffled: Vec<Vec<T>> = unique.into_iter().cloned().collect();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let n = shuffled.len();
    let n_test = (n as f64 * test_fraction).floor() as usize;
    let n_val = (n as f64 * val_fraction).floor() as usize;

    let train = shuffled.split_off(n_test + n_val);
    let val = shuffled.split_off(n_test);
    let test = shuffled;

    log::info!(
        "split {} unique of {} sequences into {} train, {} val, {} test",
        n,
        sequences.len(),
        train.len(),
        val.len(),
        test.len(),
    );
    Ok(Splits { train, val, test })
}
