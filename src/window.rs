//! Delivery window parsing and containment.
//!
//! Windows look like `"Wednesday 9AM - 4PM"` in the fixtures and `"9AM - 4PM"`
//! in configuration. Hours are kept as written for display and compared on
//! a 24-hour clock.

use std::fmt;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// One end of a delivery window, e.g. `9AM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hour {
    pub value: u8,
    pub meridiem: Meridiem,
}

impl Hour {
    /// Hour of day on a 24-hour clock, `12AM` being 0 and `12PM` being 12.
    pub fn clock_hour(&self) -> u8 {
        match (self.meridiem, self.value) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        }
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.meridiem {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        };
        write!(f, "{}{}", self.value, marker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryWindow {
    pub start: Hour,
    pub end: Hour,
}

impl DeliveryWindow {
    /// Parse `"[<weekday>] <hour><AM|PM> - <hour><AM|PM>"`.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let window = match tokens.len() {
            3 => &tokens[..],
            4 => &tokens[1..],
            n => {
                return Err(PipelineError::parse(
                    input,
                    format!("expected 3 or 4 whitespace-separated tokens, found {n}"),
                ))
            }
        };

        if window[1] != "-" {
            return Err(PipelineError::parse(
                input,
                format!("expected '-' between hours, found {:?}", window[1]),
            ));
        }

        let start = parse_hour(input, window[0])?;
        let end = parse_hour(input, window[2])?;
        Ok(Self { start, end })
    }

    /// False when the window ends before it starts on the 24-hour clock,
    /// e.g. `10PM - 2AM`.
    pub fn is_same_day(&self) -> bool {
        self.start.clock_hour() <= self.end.clock_hour()
    }

    /// True when `other` lies entirely inside this window. Overnight windows
    /// are never contained.
    pub fn contains(&self, other: &DeliveryWindow) -> bool {
        other.is_same_day()
            && self.start.clock_hour() <= other.start.clock_hour()
            && other.end.clock_hour() <= self.end.clock_hour()
    }
}

fn parse_hour(input: &str, token: &str) -> Result<Hour> {
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, marker) = token.split_at(split);

    let meridiem = if marker.eq_ignore_ascii_case("am") {
        Meridiem::Am
    } else if marker.eq_ignore_ascii_case("pm") {
        Meridiem::Pm
    } else {
        return Err(PipelineError::parse(
            input,
            format!("hour {token:?} is missing an AM/PM marker"),
        ));
    };

    let value: u8 = digits
        .parse()
        .map_err(|_| PipelineError::parse(input, format!("hour {token:?} is not an integer")))?;
    if !(1..=12).contains(&value) {
        return Err(PipelineError::parse(
            input,
            format!("hour {value} is outside 1-12"),
        ));
    }

    Ok(Hour { value, meridiem })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(s: &str) -> DeliveryWindow {
        DeliveryWindow::parse(s).unwrap()
    }

    #[test]
    fn test_parse_with_weekday() {
        let w = window("Wednesday 1AM - 7PM");
        assert_eq!(w.start.value, 1);
        assert_eq!(w.start.meridiem, Meridiem::Am);
        assert_eq!(w.end.value, 7);
        assert_eq!(w.end.meridiem, Meridiem::Pm);
    }

    #[test]
    fn test_parse_without_weekday() {
        let w = window("9AM - 4PM");
        assert_eq!(w.start.to_string(), "9AM");
        assert_eq!(w.end.to_string(), "4PM");
    }

    #[test]
    fn test_parse_lowercase_marker() {
        let w = window("10am - 12pm");
        assert_eq!(w.start.to_string(), "10AM");
        assert_eq!(w.end.to_string(), "12PM");
    }

    #[test]
    fn test_missing_marker_is_parse_error() {
        let err = DeliveryWindow::parse("9 - 11AM").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn test_wrong_token_count_is_parse_error() {
        for input in ["", "9AM", "9AM - ", "Monday 9AM - 11AM extra", "9 AM - 11 AM"] {
            let err = DeliveryWindow::parse(input).unwrap_err();
            assert!(matches!(err, PipelineError::Parse { .. }), "{input:?}");
        }
    }

    #[test]
    fn test_non_integer_hour_is_parse_error() {
        assert!(DeliveryWindow::parse("xAM - 11AM").is_err());
        assert!(DeliveryWindow::parse("9AM - 1.5PM").is_err());
        assert!(DeliveryWindow::parse("13AM - 1PM").is_err());
        assert!(DeliveryWindow::parse("0AM - 1PM").is_err());
    }

    #[test]
    fn test_missing_separator_is_parse_error() {
        assert!(DeliveryWindow::parse("9AM to 11AM").is_err());
    }

    #[test]
    fn test_contains() {
        let target = window("9AM - 4PM");
        assert!(target.contains(&window("Monday 9AM - 11AM")));
        assert!(target.contains(&window("Monday 10AM - 4PM")));
        assert!(!target.contains(&window("Monday 8AM - 11AM")));
        assert!(!target.contains(&window("Monday 9AM - 5PM")));
        assert!(!target.contains(&window("Monday 9PM - 11PM")));
    }

    #[test]
    fn test_overnight_window_is_not_contained() {
        let target = window("9AM - 4PM");
        let overnight = window("Friday 10PM - 2AM");
        assert!(!overnight.is_same_day());
        assert!(!target.contains(&overnight));
        assert!(!window("12AM - 11PM").contains(&window("Saturday 11PM - 1AM")));
        assert!(window("Friday 9AM - 9AM").is_same_day());
    }

    #[test]
    fn test_clock_hour_handles_noon_and_midnight() {
        assert_eq!(window("12AM - 12PM").start.clock_hour(), 0);
        assert_eq!(window("12AM - 12PM").end.clock_hour(), 12);
        assert_eq!(window("11AM - 1PM").end.clock_hour(), 13);
        assert!(window("12AM - 11PM").contains(&window("Sunday 12PM - 1PM")));
    }
}
