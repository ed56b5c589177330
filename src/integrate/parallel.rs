//! Sequential and partitioned summation of kernel segments.
//!
//! Segment `i` spans samples `i-1..=i` for `i` in `1..N`. A partition covering
//! segments `start..end` computes its own cached value at `start-1`, so no
//! state is shared between partitions and every segment is counted once.
//! Partition sums are combined in index order.

use rayon::prelude::*;

use crate::domain::ProfileView;
use crate::error::KineticsError;
use crate::integrate::kernel::DamageKernel;
use crate::math::real::Real;

/// Partitions are never smaller than this many segments.
const MIN_PARTITION: usize = 1024;

/// Unscaled sum of segments `start..end` (`1 <= start <= end <= N`).
pub(crate) fn segment_sum<T, K>(
    kernel: &K,
    profile: ProfileView<'_, T>,
    start: usize,
    end: usize,
) -> Result<T, KineticsError>
where
    T: Real,
    K: DamageKernel<T>,
{
    let time = profile.time();
    let temp = profile.temperature();
    let mut sum = T::zero();
    if start >= end {
        return Ok(sum);
    }

    let mut prev = (temp[start - 1].clone(), kernel.sample(temp[start - 1].clone())?);
    for i in start..end {
        let cur = (temp[i].clone(), kernel.sample(temp[i].clone())?);
        let dt = time[i].clone() - time[i - 1].clone();
        if dt != T::zero() {
            sum += kernel.segment(dt, &prev, &cur);
        }
        prev = cur;
    }
    Ok(sum)
}

/// Unscaled sum of all segments split into partitions of `chunk_len` segments.
pub(crate) fn partitioned_sum<T, K>(
    kernel: &K,
    profile: ProfileView<'_, T>,
    chunk_len: usize,
) -> Result<T, KineticsError>
where
    T: Real,
    K: DamageKernel<T>,
{
    let segments = profile.len();
    let chunk_len = chunk_len.max(1);
    let ranges: Vec<(usize, usize)> = (1..segments)
        .step_by(chunk_len)
        .map(|start| (start, (start + chunk_len).min(segments)))
        .collect();

    let partials = ranges
        .par_iter()
        .map(|&(start, end)| segment_sum(kernel, profile, start, end))
        .collect::<Result<Vec<T>, KineticsError>>()?;

    Ok(partials.into_iter().fold(T::zero(), |acc, v| acc + v))
}

/// Sum all segments, in parallel when the profile exceeds `parallel_threshold` samples.
pub(crate) fn total<T, K>(
    kernel: &K,
    profile: ProfileView<'_, T>,
    parallel_threshold: usize,
) -> Result<T, KineticsError>
where
    T: Real,
    K: DamageKernel<T>,
{
    let n = profile.len();
    if n <= parallel_threshold {
        return segment_sum(kernel, profile, 1, n);
    }
    let threads = rayon::current_num_threads().max(1);
    let chunk_len = (n - 1).div_ceil(threads).max(MIN_PARTITION);
    partitioned_sum(kernel, profile, chunk_len)
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand::rngs::StdRng;

    use super::*;
    use crate::integrate::kernel::{ExponentialIntegral, Trapezoid};

    fn random_profile(rng: &mut StdRng, n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut t = Vec::with_capacity(n);
        let mut temp = Vec::with_capacity(n);
        let mut now = 0.0;
        for _ in 0..n {
            t.push(now);
            temp.push(rng.gen_range(305.0..345.0));
            // Occasional zero-width steps.
            if rng.gen_bool(0.9) {
                now += rng.gen_range(1e-4..1e-2);
            }
        }
        (t, temp)
    }

    #[test]
    fn partitions_match_sequential_sum() {
        let mut rng = StdRng::seed_from_u64(42);
        let trap = Trapezoid::new(3.1e99, 6.28e5, 0.0);
        let exact = ExponentialIntegral::new(3.1e99, 6.28e5, 0.0).unwrap();
        for &n in &[2usize, 3, 17, 1000, 5003] {
            let (t, temp) = random_profile(&mut rng, n);
            let view = ProfileView::new(&t, &temp).unwrap();

            let seq = segment_sum(&trap, view, 1, n).unwrap();
            for &chunk in &[1usize, 2, 7, 64, 4096, 10_000] {
                let par = partitioned_sum(&trap, view, chunk).unwrap();
                assert!(((par - seq) / seq).abs() < 1e-12, "n={n} chunk={chunk}");
            }

            let seq = segment_sum(&exact, view, 1, n).unwrap();
            let par = partitioned_sum(&exact, view, 13).unwrap();
            assert!(((par - seq) / seq).abs() < 1e-12);
        }
    }

    #[test]
    fn threshold_selects_path_without_changing_result() {
        let mut rng = StdRng::seed_from_u64(7);
        let (t, temp) = random_profile(&mut rng, 3000);
        let view = ProfileView::new(&t, &temp).unwrap();
        let trap = Trapezoid::new(1.0, 5.0e4, 1.5);
        let seq = total(&trap, view, usize::MAX).unwrap();
        let par = total(&trap, view, 2).unwrap();
        assert!(((par - seq) / seq).abs() < 1e-12);
    }
}
