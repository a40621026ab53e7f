//! Property tests for fold partitioning.

use foldboost::cv::{FoldPlan, FoldStrategy};
use proptest::prelude::*;

fn strategy() -> impl Strategy<Value = FoldStrategy> {
    prop_oneof![
        Just(FoldStrategy::Contiguous),
        any::<u64>().prop_map(|seed| FoldStrategy::Shuffled { seed }),
    ]
}

/// `(n_rows, k)` with `2 <= k <= n_rows`.
fn rows_and_k() -> impl Strategy<Value = (usize, usize)> {
    (2usize..300).prop_flat_map(|n| (Just(n), 2..=n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_validation_sets_partition_rows(
        (n, k) in rows_and_k(),
        strategy in strategy(),
    ) {
        let plan = FoldPlan::new(n, k, strategy).unwrap();
        prop_assert_eq!(plan.k(), k);

        let mut seen = vec![0usize; n];
        for fold in 0..k {
            for &row in plan.validation_indices(fold) {
                seen[row] += 1;
            }
        }
        prop_assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn prop_fold_sizes_balanced(
        (n, k) in rows_and_k(),
        strategy in strategy(),
    ) {
        let plan = FoldPlan::new(n, k, strategy).unwrap();
        let sizes = plan.fold_sizes();

        for (fold, &size) in sizes.iter().enumerate() {
            let expected = n / k + usize::from(fold < n % k);
            prop_assert_eq!(size, expected);
        }
        if n % k == 0 {
            prop_assert!(sizes.iter().all(|&s| s == n / k));
        }
    }

    #[test]
    fn prop_training_is_complement(
        (n, k) in rows_and_k(),
        strategy in strategy(),
    ) {
        let plan = FoldPlan::new(n, k, strategy).unwrap();
        for fold in 0..k {
            let valid = plan.validation_indices(fold);
            let train = plan.training_indices(fold);

            prop_assert!(valid.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(train.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(valid.len() + train.len(), n);
            prop_assert!(train.iter().all(|r| valid.binary_search(r).is_err()));
        }
    }

    #[test]
    fn prop_out_of_range_k_rejected(n in 0usize..50, extra in 1usize..10) {
        prop_assert!(FoldPlan::new(n, n + extra, FoldStrategy::Contiguous).is_err());
        prop_assert!(FoldPlan::new(n, 1, FoldStrategy::Contiguous).is_err());
    }
}
