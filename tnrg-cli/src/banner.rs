//! Opening and closing banners printed by the coordinator.

use std::fmt;

use jiff::{Unit, Zoned};
use tnrg_core::Role;

const RULE: &str = "----------------------------------";
const TIME_FORMAT: &str = "%Y-%m-%d. %H:%M:%S";

/// Wall time between two instants, split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Elapsed {
    /// Computes the elapsed time from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the span cannot be computed, for example when the
    /// instants lie in incompatible time zones.
    pub fn between(start: &Zoned, end: &Zoned) -> Result<Self, jiff::Error> {
        let span = start.until((Unit::Day, end))?;
        Ok(Self {
            days: i64::from(span.get_days()),
            hours: i64::from(span.get_hours()),
            minutes: span.get_minutes(),
            seconds: span.get_seconds(),
        })
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days {} hours {} minutes {} seconds",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Times a driver run and prints its banners on the coordinator.
#[derive(Debug)]
pub struct Banner {
    role: Role,
    started: Zoned,
}

impl Banner {
    /// Prints the opening banner with the run's summary `lines`.
    pub fn start(role: Role, lines: &[String]) -> Self {
        let banner = Self {
            role,
            started: Zoned::now(),
        };
        if role.is_coordinator() {
            println!("{}", banner.opening(lines));
        }
        banner
    }

    fn opening(&self, lines: &[String]) -> String {
        let mut text = format!("Running Time is {}", self.started.strftime(TIME_FORMAT));
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(RULE);
        text
    }

    fn closing(&self, finished: &Zoned) -> String {
        let mut text = format!(
            "{RULE}\nFinished Time is {}",
            finished.strftime(TIME_FORMAT)
        );
        match Elapsed::between(&self.started, finished) {
            Ok(elapsed) => text.push_str(&format!("\nElapsed wall time is {elapsed}.")),
            Err(err) => log::warn!("could not compute the elapsed time: {err}"),
        }
        text
    }

    /// Prints the closing banner with the elapsed wall time.
    pub fn finish(self) {
        if self.role.is_coordinator() {
            println!("{}", self.closing(&Zoned::now()));
        }
    }
}

/// Summary lines naming the scheme and its bond dimension.
#[must_use]
pub fn scheme_lines(scheme: &str, version: &str, chi: usize) -> Vec<String> {
    vec![
        format!("Using the RG scheme {scheme} with version {version}."),
        format!("    Bond dimension is --{chi}--"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> Zoned {
        text.parse().unwrap()
    }

    #[test]
    fn elapsed_splits_into_days_and_clock_units() {
        let start = at("2024-03-01T08:00:00[UTC]");
        let end = at("2024-03-03T11:04:05.5[UTC]");

        let elapsed = Elapsed::between(&start, &end).unwrap();

        assert_eq!(
            elapsed,
            Elapsed {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
        assert_eq!(elapsed.to_string(), "2 days 3 hours 4 minutes 5 seconds");
    }

    #[test]
    fn banner_text() {
        let banner = Banner {
            role: Role::Coordinator,
            started: at("2024-03-01T08:00:00[UTC]"),
        };
        let lines = scheme_lines("efrg", "bistage", 6);

        assert_eq!(
            banner.opening(&lines),
            "Running Time is 2024-03-01. 08:00:00\n\
             Using the RG scheme efrg with version bistage.\n    \
             Bond dimension is --6--\n\
             ----------------------------------"
        );
        assert_eq!(
            banner.closing(&at("2024-03-01T08:00:42[UTC]")),
            "----------------------------------\n\
             Finished Time is 2024-03-01. 08:00:42\n\
             Elapsed wall time is 0 days 0 hours 0 minutes 42 seconds."
        );
    }
}
