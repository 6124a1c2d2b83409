//! Tuning surface of the engine. Every cutoff the detectors and calculators
//! apply lives here.

// Sampling floors
pub const MIN_CLOCK_INS_FOR_PATTERNS: usize = 5;
pub const MIN_CLOCK_INS_FOR_PERFECT_PATTERN: usize = 10;
pub const MIN_EVENTS_FOR_INSIGHTS: usize = 5;
/// Scheduled days or sessions needed before a compliance rate is reported.
pub const MIN_SAMPLES_FOR_RATE: usize = 3;
pub const MIN_SESSIONS_FOR_TREND: usize = 20;

// Lookback windows
pub const ANOMALY_LOOKBACK_DAYS: i64 = 30;
pub const INSIGHT_LOOKBACK_MONTHS: u32 = 3;

// exact_time_pattern
pub const EXACT_TIME_MIN_COUNT: usize = 5;
pub const EXACT_TIME_MIN_RATIO: f64 = 0.70;
pub const EXACT_TIME_BASE_CONFIDENCE: f64 = 60.0;
pub const EXACT_TIME_RATIO_WEIGHT: f64 = 35.0;
pub const EXACT_TIME_MAX_CONFIDENCE: f64 = 95.0;

// same_location
/// Coordinates are rounded to 3 decimals (a cell of roughly 111 m).
pub const LOCATION_GRID_SCALE: f64 = 1_000.0;
pub const LOCATION_MIN_EVENTS: usize = 3;
pub const LOCATION_MIN_OTHER_EMPLOYEES: usize = 2;
pub const SAME_LOCATION_CONFIDENCE: u8 = 75;

// perfect_pattern
pub const PERFECT_PATTERN_MAX_STDDEV_MINUTES: f64 = 2.0;
pub const PERFECT_PATTERN_CONFIDENCE: u8 = 70;

// off_hours
pub const OFF_HOURS_EARLY_BEFORE: u32 = 6;
pub const OFF_HOURS_LATE_FROM: u32 = 22;
pub const OFF_HOURS_MIN_RATIO: f64 = 0.30;
pub const OFF_HOURS_CONFIDENCE: u8 = 65;

// absence_conflict
pub const ABSENCE_CONFLICT_CONFIDENCE: u8 = 90;

// Aggregation
pub const NOTIFICATION_MIN_CONFIDENCE: u8 = 65;

// Punctuality
pub const PUNCTUALITY_GRACE_MINUTES: f64 = 5.0;
pub const PUNCTUALITY_STRENGTH_RATE: f64 = 95.0;
pub const PUNCTUALITY_IMPROVEMENT_RATE: f64 = 80.0;

// Hour compliance
pub const HOURS_STRENGTH_MIN_RATE: f64 = 95.0;
pub const HOURS_STRENGTH_MAX_RATE: f64 = 105.0;
pub const HOURS_SHORT_RATE: f64 = 90.0;
pub const HOURS_OVER_RATE: f64 = 110.0;

// Schedule adherence
pub const ADHERENCE_GRACE_MINUTES: i64 = 15;
pub const ADHERENCE_STRENGTH_RATE: f64 = 90.0;
pub const ADHERENCE_IMPROVEMENT_RATE: f64 = 70.0;

// Pauses
pub const PAUSE_STRENGTH_MAX_MINUTES: f64 = 45.0;
pub const PAUSE_IMPROVEMENT_MIN_MINUTES: f64 = 60.0;

// Incidents
pub const INCIDENTS_MINOR_MAX: usize = 2;

// Trend
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;
/// Trend percentages at or below this magnitude are not reported.
pub const TREND_NOISE_FLOOR: f64 = 0.1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_detector_clears_the_notification_gate() {
        // lowest exact-time score is reached at the minimum ratio
        let exact_time_floor =
            (EXACT_TIME_BASE_CONFIDENCE + EXACT_TIME_MIN_RATIO * EXACT_TIME_RATIO_WEIGHT).floor() as u8;
        assert!(exact_time_floor >= 84);

        let lowest = [
            exact_time_floor,
            SAME_LOCATION_CONFIDENCE,
            PERFECT_PATTERN_CONFIDENCE,
            OFF_HOURS_CONFIDENCE,
            ABSENCE_CONFLICT_CONFIDENCE,
        ]
        .into_iter()
        .min()
        .unwrap();
        assert!(lowest >= NOTIFICATION_MIN_CONFIDENCE);
    }

    #[test]
    fn absence_conflict_is_the_strongest_signal() {
        assert!(ABSENCE_CONFLICT_CONFIDENCE > SAME_LOCATION_CONFIDENCE);
        assert!(ABSENCE_CONFLICT_CONFIDENCE > PERFECT_PATTERN_CONFIDENCE);
        assert!(ABSENCE_CONFLICT_CONFIDENCE > OFF_HOURS_CONFIDENCE);
    }

    #[test]
    fn silent_bands_are_well_formed() {
        assert!(PUNCTUALITY_IMPROVEMENT_RATE < PUNCTUALITY_STRENGTH_RATE);
        assert!(HOURS_SHORT_RATE < HOURS_STRENGTH_MIN_RATE);
        assert!(HOURS_STRENGTH_MAX_RATE < HOURS_OVER_RATE);
        assert!(ADHERENCE_IMPROVEMENT_RATE < ADHERENCE_STRENGTH_RATE);
        assert!(PAUSE_STRENGTH_MAX_MINUTES < PAUSE_IMPROVEMENT_MIN_MINUTES);
    }
}
