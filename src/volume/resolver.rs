#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    #[error("Device reported no channels")]
    NoChannels,
    #[error("Normalization constant is zero")]
    ZeroNorm,
}

/// Averages raw channel levels into a percentage of `norm`.
///
/// The mean is truncated to an integer before scaling, so `[1, 2]` averages
/// to `1`, not `1.5`.
pub fn resolve(levels: &[u32], norm: u32) -> Result<f64, VolumeError> {
    if levels.is_empty() {
        return Err(VolumeError::NoChannels);
    }
    if norm == 0 {
        return Err(VolumeError::ZeroNorm);
    }

    let sum: u64 = levels.iter().map(|&level| u64::from(level)).sum();
    let mean = sum / levels.len() as u64;

    Ok(mean as f64 / f64::from(norm) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORM: u32 = 0x10000;

    #[test]
    fn test_resolve_full_volume() {
        assert_eq!(resolve(&[65536, 65536], NORM), Ok(100.0));
    }

    #[test]
    fn test_resolve_half_volume() {
        assert_eq!(resolve(&[32768], NORM), Ok(50.0));
    }

    #[test]
    fn test_resolve_uneven_channels() {
        assert_eq!(resolve(&[0, 65536], NORM), Ok(50.0));
    }

    #[test]
    fn test_resolve_truncates_mean_before_scaling() {
        // (1 + 2) / 2 truncates to 1
        assert_eq!(resolve(&[1, 2], 100), Ok(1.0));
        assert_eq!(resolve(&[1, 2], 100), resolve(&[1, 1], 100));
    }

    #[test]
    fn test_resolve_over_amplified() {
        assert_eq!(resolve(&[98304, 98304], NORM), Ok(150.0));
    }

    #[test]
    fn test_resolve_large_levels_do_not_overflow() {
        let levels = vec![u32::MAX; 8];
        let expected = f64::from(u32::MAX) / f64::from(NORM) * 100.0;
        assert_eq!(resolve(&levels, NORM), Ok(expected));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let levels = [12345, 54321, 40000];
        let first = resolve(&levels, NORM).unwrap();
        let _ = resolve(&[1], NORM);
        assert_eq!(resolve(&levels, NORM).unwrap(), first);
    }

    #[test]
    fn test_resolve_empty_channels() {
        assert_eq!(resolve(&[], NORM), Err(VolumeError::NoChannels));
    }

    #[test]
    fn test_resolve_zero_norm() {
        assert_eq!(resolve(&[100], 0), Err(VolumeError::ZeroNorm));
    }
}
