use std::fmt::Debug;

/// T values are float numbers
pub trait Float: ::num::Float + Debug + Default + Send + Sync {}

impl<T: ::num::Float + Debug + Default + Send + Sync> Float for T {}

/// Share of `part` in `total` expressed in percents. Zero total yields zero.
#[inline]
pub fn percent<F: Float>(part: u64, total: u64) -> F {
    if total == 0 {
        return F::zero();
    }
    // u64 -> float conversion never fails for IEEE floats
    let part = F::from(part).unwrap_or_else(F::zero);
    let total = F::from(total).unwrap_or_else(F::one);
    part / total * F::from(100).unwrap_or_else(F::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        for (part, total, expected) in [
            (0, 0, 0.0),
            (5, 0, 0.0),
            (0, 10, 0.0),
            (1, 2, 50.0),
            (1, 3, 100.0 / 3.0),
            (7, 7, 100.0),
        ] {
            let result: f64 = percent(part, total);
            assert!((result - expected).abs() < 1e-12, "{part}/{total} = {result}");
        }
        assert_eq!(percent::<f32>(1, 4), 25.0);
    }
}
