//! Rate, Duration and Transition Helpers

use time_window::Sample;

/// Per-interval rate of change `Δv/Δt`, skipping non-positive `Δt`
pub fn rates_of_change(samples: &[Sample<f64>]) -> Vec<f64> {
    interval_rates(samples).into_iter().map(|r| r.value).collect()
}

/// Like [`rates_of_change`], each rate stamped with the closing sample's time
pub fn interval_rates(samples: &[Sample<f64>]) -> Vec<Sample<f64>> {
    samples
        .windows(2)
        .filter_map(|pair| {
            let dt = pair[1].timestamp - pair[0].timestamp;
            (dt > 0.0).then(|| {
                Sample::new(pair[1].timestamp, (pair[1].value - pair[0].value) / dt)
            })
        })
        .collect()
}

/// Share of elapsed time whose closing sample satisfies `predicate`.
///
/// Each interval contributes its duration, so sparse and dense stretches
/// of the window weigh the same per second. Returns 0 when the samples
/// cover no positive duration.
pub fn time_weighted_share<T, F>(samples: &[Sample<T>], predicate: F) -> f64
where
    F: Fn(&T) -> bool,
{
    let mut total = 0.0;
    let mut matched = 0.0;
    for pair in samples.windows(2) {
        let dt = pair[1].timestamp - pair[0].timestamp;
        if dt > 0.0 {
            total += dt;
            if predicate(&pair[1].value) {
                matched += dt;
            }
        }
    }
    if total > 0.0 {
        matched / total
    } else {
        0.0
    }
}

/// Trailing moving average; the first values average over what is available
pub fn moving_average(values: &[f64], width: usize) -> Vec<f64> {
    let width = width.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(width);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Number of false -> true transitions
pub fn rising_edges(flags: &[bool]) -> usize {
    flags.windows(2).filter(|pair| !pair[0] && pair[1]).count()
}

/// Number of value changes between consecutive entries
pub fn transitions<T: PartialEq>(values: &[T]) -> usize {
    values.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rates_skip_non_positive_dt() {
        let samples = vec![
            Sample::new(0.0, 0.0),
            Sample::new(1.0, 10.0),
            Sample::new(1.0, 50.0),
            Sample::new(2.0, 40.0),
        ];
        assert_eq!(rates_of_change(&samples), vec![10.0, -10.0]);
    }

    #[test]
    fn test_interval_rates_carry_closing_time() {
        let samples = vec![
            Sample::new(0.0, 0.0),
            Sample::new(0.5, 10.0),
            Sample::new(0.5, 99.0),
            Sample::new(1.0, 0.0),
        ];
        let rates = interval_rates(&samples);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].timestamp, 0.5);
        assert_eq!(rates[0].value, 20.0);
        assert_eq!(rates[1].timestamp, 1.0);
        assert_eq!(rates[1].value, -198.0);
    }

    #[test]
    fn test_time_weighted_share() {
        // 1s at low value, then 3s above threshold
        let samples = vec![
            Sample::new(0.0, 1000.0),
            Sample::new(1.0, 1000.0),
            Sample::new(4.0, 3000.0),
        ];
        let share = time_weighted_share(&samples, |rpm| *rpm > 2500.0);
        assert!((share - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_time_weighted_share_without_duration() {
        let samples = vec![Sample::new(2.0, true)];
        assert_eq!(time_weighted_share(&samples, |v| *v), 0.0);
    }

    #[test]
    fn test_moving_average() {
        let smoothed = moving_average(&[3.0, 6.0, 9.0, 0.0], 3);
        assert_eq!(smoothed, vec![3.0, 4.5, 6.0, 5.0]);
    }

    #[test]
    fn test_edges_and_transitions() {
        assert_eq!(rising_edges(&[false, true, true, false, true]), 2);
        assert_eq!(rising_edges(&[true, true]), 0);
        assert_eq!(transitions(&['D', 'D', 'S', 'D', 'D']), 2);
        assert_eq!(transitions::<char>(&[]), 0);
    }

    proptest! {
        #[test]
        fn prop_share_is_a_proportion(
            points in proptest::collection::vec((0.0f64..1.0, 0.0f64..5000.0), 0..100),
        ) {
            let mut t = 0.0;
            let samples: Vec<Sample<f64>> = points
                .iter()
                .map(|(dt, rpm)| {
                    t += dt;
                    Sample::new(t, *rpm)
                })
                .collect();
            let share = time_weighted_share(&samples, |rpm| *rpm > 2500.0);
            prop_assert!((0.0..=1.0).contains(&share));
        }
    }
}
