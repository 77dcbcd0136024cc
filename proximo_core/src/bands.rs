//! Proximity bands and their static actuation targets.

/// Discrete proximity classification of a filtered distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeBand {
    Close,
    Medium,
    Far,
    /// Beyond the far threshold or otherwise unclassified.
    Unspecified,
}

impl RangeBand {
    /// Classify a distance in centimeters. Upper bounds are inclusive.
    pub fn classify(distance_cm: f32) -> Self {
        if distance_cm <= 20.0 {
            RangeBand::Close
        } else if distance_cm <= 40.0 {
            RangeBand::Medium
        } else if distance_cm <= 80.0 {
            RangeBand::Far
        } else {
            RangeBand::Unspecified
        }
    }

    /// Static actuation target for this band.
    pub fn target(self) -> &'static ActuationTarget {
        match self {
            RangeBand::Close => &CLOSE,
            RangeBand::Medium => &MEDIUM,
            RangeBand::Far => &FAR,
            RangeBand::Unspecified => &UNSPECIFIED,
        }
    }

    /// Audio cue volume for this band: muted when close, full when far.
    pub fn volume(self) -> f32 {
        match self {
            RangeBand::Close => 0.0,
            RangeBand::Medium => 0.5,
            RangeBand::Far => 1.0,
            RangeBand::Unspecified => 1.0,
        }
    }
}

/// Per-band setpoints applied uniformly to every device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationTarget {
    /// Vibration strength in [0, 1].
    pub vibration_intensity: f32,
    pub vibration_hz: f32,
    /// RGB color, float channels in [0, 1].
    pub color: [f32; 3],
    pub target_temp_c: f32,
}

const CLOSE: ActuationTarget = ActuationTarget {
    vibration_intensity: 1.0,
    vibration_hz: 250.0,
    color: [1.0, 0.0, 0.0],
    target_temp_c: 31.0,
};

const MEDIUM: ActuationTarget = ActuationTarget {
    vibration_intensity: 0.6,
    vibration_hz: 170.0,
    color: [1.0, 0.65, 0.0],
    target_temp_c: 29.0,
};

const FAR: ActuationTarget = ActuationTarget {
    vibration_intensity: 0.3,
    vibration_hz: 100.0,
    color: [0.0, 1.0, 0.0],
    target_temp_c: 28.0,
};

const UNSPECIFIED: ActuationTarget = ActuationTarget {
    vibration_intensity: 0.0,
    vibration_hz: 0.0,
    color: [0.0, 0.0, 0.0],
    target_temp_c: 27.0,
};

#[cfg(test)]
mod tests {
    use super::RangeBand;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RangeBand::Close)]
    #[case(20.0, RangeBand::Close)]
    #[case(20.0001, RangeBand::Medium)]
    #[case(40.0, RangeBand::Medium)]
    #[case(40.0001, RangeBand::Far)]
    #[case(80.0, RangeBand::Far)]
    #[case(80.0001, RangeBand::Unspecified)]
    #[case(200.0, RangeBand::Unspecified)]
    fn classification_boundaries(#[case] distance_cm: f32, #[case] expected: RangeBand) {
        assert_eq!(RangeBand::classify(distance_cm), expected);
    }

    #[rstest]
    #[case(RangeBand::Close, 0.0)]
    #[case(RangeBand::Medium, 0.5)]
    #[case(RangeBand::Far, 1.0)]
    #[case(RangeBand::Unspecified, 1.0)]
    fn volume_table_is_exact(#[case] band: RangeBand, #[case] volume: f32) {
        assert_eq!(band.volume(), volume);
    }

    #[test]
    fn closer_bands_vibrate_harder() {
        let close = RangeBand::Close.target();
        let medium = RangeBand::Medium.target();
        let far = RangeBand::Far.target();
        assert!(close.vibration_intensity > medium.vibration_intensity);
        assert!(medium.vibration_intensity > far.vibration_intensity);
        assert_eq!(RangeBand::Unspecified.target().vibration_intensity, 0.0);
    }
}
