use super::random::LegacyRandomState;

/// Seed and held-out share used when the model was trained.
pub const TRAINING_SPLIT_SEED: u32 = 2025;
pub const TRAINING_TEST_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("cannot split {samples} rows: the training partition would be empty")]
    TooFewSamples { samples: usize },
    #[error("class {class} has only {count} row; every class needs at least 2")]
    SparseClass { class: u8, count: usize },
    #[error("training partition of {train} rows cannot hold {classes} classes")]
    TooFewForClasses { train: usize, classes: usize },
    #[error("test partition of {test} rows cannot hold {classes} classes")]
    TestTooSmallForClasses { test: usize, classes: usize },
}

/// Partition sizes for a float test share: the test side is rounded up.
pub fn partition_sizes(samples: usize, test_fraction: f64) -> (usize, usize) {
    let test = (test_fraction * samples as f64).ceil() as usize;
    let test = test.min(samples);
    (samples - test, test)
}

/// Row indices (into `labels`) of the training partition of a label-stratified shuffle split.
///
/// Classes are the distinct label values in ascending order. Per-class allocations follow the
/// approximate mode of the class proportions; each class is then permuted and its first `n_i`
/// rows go to training. The returned indices are in the order the final shuffle emits them.
pub fn stratified_train_indices(
    labels: &[u8],
    test_fraction: f64,
    seed: u32,
) -> Result<Vec<usize>, SplitError> {
    let (n_train, n_test) = partition_sizes(labels.len(), test_fraction);
    if n_train == 0 {
        return Err(SplitError::TooFewSamples {
            samples: labels.len(),
        });
    }

    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    // Stable grouping: rows of each class keep their original relative order.
    let class_rows: Vec<Vec<usize>> = classes
        .iter()
        .map(|class| {
            labels
                .iter()
                .enumerate()
                .filter(|(_, label)| *label == class)
                .map(|(row, _)| row)
                .collect()
        })
        .collect();
    let class_counts: Vec<usize> = class_rows.iter().map(Vec::len).collect();

    if let Some((class, count)) = classes
        .iter()
        .zip(&class_counts)
        .find(|(_, count)| **count < 2)
    {
        return Err(SplitError::SparseClass {
            class: *class,
            count: *count,
        });
    }
    if n_train < classes.len() {
        return Err(SplitError::TooFewForClasses {
            train: n_train,
            classes: classes.len(),
        });
    }
    if n_test < classes.len() {
        return Err(SplitError::TestTooSmallForClasses {
            test: n_test,
            classes: classes.len(),
        });
    }

    let mut rng = LegacyRandomState::seeded(seed);
    let train_alloc = approximate_mode(&class_counts, n_train, &mut rng);
    let remaining: Vec<usize> = class_counts
        .iter()
        .zip(&train_alloc)
        .map(|(count, taken)| count - taken)
        .collect();
    // Drawn only to keep the stream aligned with the reference procedure.
    let _test_alloc = approximate_mode(&remaining, n_test, &mut rng);

    let mut train = Vec::with_capacity(n_train);
    for (rows, take) in class_rows.iter().zip(&train_alloc) {
        let permutation = rng.permutation(rows.len());
        train.extend(permutation.iter().take(*take).map(|&position| rows[position]));
    }

    rng.shuffle(&mut train);
    Ok(train)
}

/// Distribute `draws` across classes proportionally to `counts`, flooring first and handing the
/// leftover draws to the largest fractional remainders. Ties are broken by a seeded choice.
pub(crate) fn approximate_mode(
    counts: &[usize],
    draws: usize,
    rng: &mut LegacyRandomState,
) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let continuous: Vec<f64> = counts
        .iter()
        .map(|&count| count as f64 / total as f64 * draws as f64)
        .collect();
    let mut floored: Vec<usize> = continuous.iter().map(|value| value.floor() as usize).collect();
    let mut need_to_add = draws.saturating_sub(floored.iter().sum());

    if need_to_add > 0 {
        let remainder: Vec<f64> = continuous
            .iter()
            .zip(&floored)
            .map(|(value, floor)| value - *floor as f64)
            .collect();

        let mut values = remainder.clone();
        values.sort_by(|a, b| b.total_cmp(a));
        values.dedup();

        for value in values {
            let tied: Vec<usize> = remainder
                .iter()
                .enumerate()
                .filter(|(_, candidate)| **candidate == value)
                .map(|(class, _)| class)
                .collect();
            let add_now = tied.len().min(need_to_add);
            let chosen = rng.permutation(tied.len());
            for &position in chosen.iter().take(add_now) {
                floored[tied[position]] += 1;
            }
            need_to_add -= add_now;
            if need_to_add == 0 {
                break;
            }
        }
    }

    floored
}
