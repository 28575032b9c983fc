use chrono::{DateTime, TimeZone, Utc};

/// Application close for the current cycle, 12:00 UTC on 6 October 2026.
pub fn application_deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 6, 12, 0, 0).unwrap()
}

/// Remaining time toward the fixed deadline, recomputed once per UI tick.
/// Once the deadline passes the display freezes on `Passed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Passed,
}

impl Countdown {
    pub fn at(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Self {
        let remaining = deadline - now;
        if remaining.num_seconds() <= 0 {
            return Countdown::Passed;
        }

        let total = remaining.num_seconds();
        Countdown::Remaining {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn now(deadline: DateTime<Utc>) -> Self {
        Self::at(Utc::now(), deadline)
    }

    pub fn display(&self) -> String {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => format!(
                "{}d {:02}h {:02}m {:02}s until applications close",
                days, hours, minutes, seconds
            ),
            Countdown::Passed => "Application deadline has passed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_remaining_time_into_units() {
        let deadline = application_deadline();
        let now = deadline - chrono::Duration::seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        let countdown = Countdown::at(now, deadline);
        assert_eq!(
            countdown,
            Countdown::Remaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
        assert_eq!(
            countdown.display(),
            "2d 03h 04m 05s until applications close"
        );
    }

    #[test]
    fn freezes_on_passed_at_and_after_the_deadline() {
        let deadline = application_deadline();
        assert_eq!(Countdown::at(deadline, deadline), Countdown::Passed);
        let later = deadline + chrono::Duration::days(40);
        assert_eq!(Countdown::at(later, deadline), Countdown::Passed);
        assert_eq!(
            Countdown::at(later, deadline).display(),
            "Application deadline has passed"
        );
    }

    #[test]
    fn one_second_before_still_counts_down() {
        let deadline = application_deadline();
        let now = deadline - chrono::Duration::seconds(1);
        assert_eq!(
            Countdown::at(now, deadline),
            Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
    }
}
