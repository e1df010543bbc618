use chrono::{DateTime, TimeZone};
use std::{fmt::Display, time::Duration};

use crate::display::{DisplayCommand, Region};

/// How often the date/time regions are refreshed.
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(60);

/// e.g. `Today Friday, Oct 16`.
pub fn date_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("Today {}", now.format("%A, %b %-d"))
}

/// 24-hour `HH:MM`.
pub fn time_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%H:%M").to_string()
}

pub fn clock_commands<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<DisplayCommand>
where
    Tz::Offset: Display,
{
    vec![
        DisplayCommand::text(Region::Date, date_line(now)),
        DisplayCommand::text(Region::Time, time_line(now)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_date_and_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 7, 5, 0).unwrap();

        assert_eq!(date_line(&now), "Today Friday, Oct 16");
        assert_eq!(time_line(&now), "07:05");
    }

    #[test]
    fn uses_the_given_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 3, 23, 30, 0).unwrap().with_timezone(&tz);

        assert_eq!(date_line(&now), "Today Sunday, Jan 4");
        assert_eq!(time_line(&now), "01:30");
    }

    #[test]
    fn commands_target_date_and_time_only() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let regions: Vec<Region> = clock_commands(&now).iter().map(|c| c.region()).collect();
        assert_eq!(regions, vec![Region::Date, Region::Time]);
    }
}
