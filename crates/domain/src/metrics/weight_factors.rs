use crate::error::{RebalanceError, Result};

/// HHI score of a perfectly spread pool.
pub const MAX_HHI_SCORE: f64 = 10000.0;

/// Weight factor rewarding pools with many node operators.
///
/// factor_i = sqrt(count_i) / Σ sqrt(count_j)
pub fn operator_weight_factors(counts: &[u64]) -> Result<Vec<f64>> {
    let sqrt_total = counts
        .iter()
        .fold(0.0, |acc, &count| acc + (count as f64).sqrt());

    if sqrt_total == 0.0 {
        return Err(RebalanceError::AllWeightsZero("operator counts"));
    }

    Ok(counts
        .iter()
        .map(|&count| (count as f64).sqrt() / sqrt_total)
        .collect())
}

/// Complement of the Herfindahl-Hirschman index of each pool's validator
/// distribution, on a 0..=10000 scale.
///
/// score = 10000 - Σ (validators_i / pool_total * 100)²
///
/// A single-operator pool scores 0. A pool with no validators at all has no
/// measurable spread and also scores 0.
pub fn protocol_hhi_scores(distributions: &[Vec<u64>]) -> Vec<f64> {
    distributions
        .iter()
        .map(|validator_counts| {
            let total: u64 = validator_counts.iter().sum();
            if total == 0 {
                return 0.0;
            }
            let total = total as f64;
            let concentration = validator_counts.iter().fold(0.0, |acc, &count| {
                acc + ((count as f64 / total) * 100.0).powi(2)
            });
            MAX_HHI_SCORE - concentration
        })
        .collect()
}

/// Each score over the sum of all scores. All-zero scores give all-zero factors.
pub fn hhi_weight_factors(scores: &[f64]) -> Vec<f64> {
    let total = scores.iter().fold(0.0, |acc, &score| acc + score);
    if total == 0.0 {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|&score| score / total).collect()
}

/// Combines both factors on top of a baseline of 1 per pool.
///
/// weight_i = (1 + op_i + hhi_i) / (n + Σ op + Σ hhi)
pub fn target_weights(operator_factors: &[f64], hhi_factors: &[f64]) -> Result<Vec<f64>> {
    if operator_factors.len() != hhi_factors.len() {
        return Err(RebalanceError::LengthMismatch {
            expected: operator_factors.len(),
            actual: hhi_factors.len(),
        });
    }
    if operator_factors.is_empty() {
        return Err(RebalanceError::AllWeightsZero("target weights of an empty pool set"));
    }

    // Summed in this order so results match the reference weights bit for bit.
    let total = operator_factors.len() as f64
        + operator_factors.iter().fold(0.0, |acc, &f| acc + f)
        + hhi_factors.iter().fold(0.0, |acc, &f| acc + f);

    Ok(operator_factors
        .iter()
        .zip(hhi_factors)
        .map(|(&op, &hhi)| (1.0 + op + hhi) / total)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tolerance, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_operator_factors_reference_counts() {
        let factors = operator_weight_factors(&[35, 2188, 5, 1, 8, 14]).unwrap();
        assert_close(
            &factors,
            &[0.0947, 0.7484, 0.0358, 0.0160, 0.0453, 0.0599],
            5e-5,
        );
        assert!((factors.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_operator_factors_all_zero_is_an_error() {
        assert_eq!(
            operator_weight_factors(&[0, 0, 0]),
            Err(RebalanceError::AllWeightsZero("operator counts"))
        );
        assert!(operator_weight_factors(&[]).is_err());
    }

    #[test]
    fn test_hhi_scores_reference_distribution() {
        let scores = protocol_hhi_scores(&[
            vec![100, 200],
            vec![10, 1],
            vec![1, 1, 1],
            vec![1],
            vec![1],
            vec![1, 1],
        ]);
        assert_close(&scores, &[4444.44, 1652.89, 6666.67, 0.0, 0.0, 5000.0], 0.01);
    }

    #[test]
    fn test_hhi_single_operator_scores_zero() {
        let scores = protocol_hhi_scores(&[vec![1], vec![4000], vec![7]]);
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hhi_empty_distribution_scores_zero() {
        assert_eq!(protocol_hhi_scores(&[vec![], vec![0, 0]]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_hhi_approaches_max_with_even_spread() {
        let narrow = protocol_hhi_scores(&[vec![5; 10]])[0];
        let wide = protocol_hhi_scores(&[vec![5; 1000]])[0];
        assert!(narrow < wide);
        assert!((MAX_HHI_SCORE - wide) < 10.0 + TOLERANCE);
    }

    #[test]
    fn test_hhi_factors_all_zero_scores() {
        let factors = hhi_weight_factors(&[0.0; 6]);
        assert_eq!(factors, vec![0.0; 6]);
        assert!(factors.iter().all(|f| !f.is_nan()));
    }

    #[test]
    fn test_target_weights_keep_baseline_when_factors_collapse() {
        let weights = target_weights(&[0.0; 4], &[0.0; 4]).unwrap();
        assert_eq!(weights, vec![0.25; 4]);
    }

    #[test]
    fn test_target_weights_rejects_mismatched_lengths() {
        assert!(matches!(
            target_weights(&[0.5, 0.5], &[1.0]),
            Err(RebalanceError::LengthMismatch { .. })
        ));
        assert!(matches!(
            target_weights(&[], &[]),
            Err(RebalanceError::AllWeightsZero(_))
        ));
    }

    #[test]
    fn test_target_weights_reference_inputs() {
        let operator = operator_weight_factors(&[1, 1, 1, 1, 1, 2]).unwrap();
        let hhi = hhi_weight_factors(&protocol_hhi_scores(&[
            vec![100, 200],
            vec![1],
            vec![1],
            vec![1],
            vec![1],
            vec![1, 1],
        ]));
        let weights = target_weights(&operator, &hhi).unwrap();

        assert_eq!(weights[0], 0.20331149918147617);
        assert_eq!(weights[1], 0.14448796976971146);
        assert_eq!(weights[5], 0.21873662173967812);
    }

    fn distributions() -> impl Strategy<Value = Vec<Vec<u64>>> {
        prop::collection::vec(prop::collection::vec(0u64..5000, 0..40), 1..12)
    }

    proptest! {
        #[test]
        fn prop_operator_factors_sum_to_one(counts in prop::collection::vec(1u64..100_000, 1..20)) {
            let factors = operator_weight_factors(&counts).unwrap();
            prop_assert!((factors.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
            prop_assert!(factors.iter().all(|f| (0.0..=1.0).contains(f)));
        }

        #[test]
        fn prop_hhi_scores_stay_in_range(dists in distributions()) {
            for score in protocol_hhi_scores(&dists) {
                prop_assert!(score > -TOLERANCE && score <= MAX_HHI_SCORE);
            }
        }

        #[test]
        fn prop_hhi_factors_sum_to_one_or_zero(dists in distributions()) {
            let factors = hhi_weight_factors(&protocol_hhi_scores(&dists));
            let sum: f64 = factors.iter().sum();
            prop_assert!(sum.abs() < TOLERANCE || (sum - 1.0).abs() < TOLERANCE);
            prop_assert!(factors.iter().all(|f| !f.is_nan()));
        }

        #[test]
        fn prop_target_weights_sum_to_one(
            counts in prop::collection::vec(1u64..10_000, 6),
            dists in prop::collection::vec(prop::collection::vec(1u64..500, 1..30), 6),
        ) {
            let operator = operator_weight_factors(&counts).unwrap();
            let hhi = hhi_weight_factors(&protocol_hhi_scores(&dists));
            let weights = target_weights(&operator, &hhi).unwrap();
            prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
            prop_assert!(weights.iter().all(|w| *w > 0.0));
        }
    }
}
