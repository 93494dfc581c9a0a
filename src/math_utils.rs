//! Small numeric helpers

/// Clamp into `[0, 1]`. NaN maps to 0.
pub fn clamp_unit<T>(v: T) -> T
where
    T: num_traits::Float,
{
    if v.is_nan() {
        return T::zero();
    }
    v.max(T::zero()).min(T::one())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.5_f32), 0.0);
        assert_eq!(clamp_unit(1.5_f32), 1.0);
        assert_eq!(clamp_unit(0.25_f32), 0.25);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }
}
