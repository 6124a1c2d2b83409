use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Absence {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl Absence {
    pub fn is_approved(&self) -> bool {
        self.status.eq_ignore_ascii_case("approved")
    }

    /// Inclusive on both ends.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_both_ends_of_the_range() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let absence = Absence {
            user_id: "u1".into(),
            start_date: d(4),
            end_date: d(6),
            status: "Approved".into(),
        };

        assert!(absence.is_approved());
        assert!(absence.covers(d(4)));
        assert!(absence.covers(d(6)));
        assert!(!absence.covers(d(3)));
        assert!(!absence.covers(d(7)));
    }
}
