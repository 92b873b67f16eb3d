use serde::{Deserialize, Serialize};

/// Volume as announced to the user.
#[derive(Clone, Copy, Debug)]
pub enum DisplayVolume {
    Muted,
    Level(f64),
}

impl DisplayVolume {
    /// Sentinel returned by [`DisplayVolume::as_f64`] for muted devices.
    pub const MUTED_SENTINEL: f64 = -1.0;

    pub fn as_f64(&self) -> f64 {
        match self {
            DisplayVolume::Muted => Self::MUTED_SENTINEL,
            DisplayVolume::Level(percent) => *percent,
        }
    }

    pub fn is_muted(&self) -> bool {
        matches!(self, DisplayVolume::Muted)
    }

    /// Rounded percentage for display; `0` when muted.
    pub fn percent(&self, policy: RoundingPolicy) -> u32 {
        match self {
            DisplayVolume::Muted => 0,
            DisplayVolume::Level(percent) => policy.apply(*percent),
        }
    }
}

impl PartialEq for DisplayVolume {
    fn eq(&self, other: &Self) -> bool {
        self.as_f64() == other.as_f64()
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    #[default]
    Nearest,
    Ceil,
}

impl RoundingPolicy {
    pub fn apply(&self, percent: f64) -> u32 {
        let rounded = match self {
            RoundingPolicy::Nearest => percent.round(),
            RoundingPolicy::Ceil => percent.ceil(),
        };
        if rounded <= 0.0 {
            0
        } else {
            rounded as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_sentinel() {
        assert_eq!(DisplayVolume::Muted.as_f64(), -1.0);
        assert!(DisplayVolume::Muted.is_muted());
        assert!(!DisplayVolume::Level(0.0).is_muted());
    }

    #[test]
    fn test_muted_never_equals_level() {
        assert_ne!(DisplayVolume::Muted, DisplayVolume::Level(0.0));
        assert_ne!(DisplayVolume::Muted, DisplayVolume::Level(100.0));
        assert_eq!(DisplayVolume::Muted, DisplayVolume::Muted);
        assert_eq!(DisplayVolume::Level(42.5), DisplayVolume::Level(42.5));
    }

    #[test]
    fn test_rounding_nearest() {
        let policy = RoundingPolicy::Nearest;
        assert_eq!(policy.apply(49.4), 49);
        assert_eq!(policy.apply(49.5), 50);
        assert_eq!(policy.apply(100.0), 100);
    }

    #[test]
    fn test_rounding_ceil() {
        let policy = RoundingPolicy::Ceil;
        assert_eq!(policy.apply(49.01), 50);
        assert_eq!(policy.apply(49.0), 49);
    }

    #[test]
    fn test_rounding_clamps_negative() {
        assert_eq!(RoundingPolicy::Nearest.apply(-1.0), 0);
        assert_eq!(RoundingPolicy::Ceil.apply(-0.5), 0);
    }

    #[test]
    fn test_percent_of_muted_is_zero() {
        assert_eq!(DisplayVolume::Muted.percent(RoundingPolicy::Nearest), 0);
        assert_eq!(DisplayVolume::Muted.percent(RoundingPolicy::Ceil), 0);
        assert_eq!(DisplayVolume::Level(33.3).percent(RoundingPolicy::Ceil), 34);
    }

    #[test]
    fn test_rounding_policy_names() {
        use clap::ValueEnum;

        assert_eq!(RoundingPolicy::default(), RoundingPolicy::Nearest);
        assert_eq!(RoundingPolicy::from_str("ceil", false), Ok(RoundingPolicy::Ceil));
        assert_eq!(RoundingPolicy::from_str("nearest", false), Ok(RoundingPolicy::Nearest));
        assert!(RoundingPolicy::from_str("floor", false).is_err());
    }
}
