use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Start time of an event, at minute precision
///
/// # Invariants
/// - Between 00:00 and 23:59
/// - Always rendered as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(u16);

impl SlotTime {
    /// Creates a slot time from an hour and a minute
    ///
    /// # Example
    /// ```
    /// use padel_tournament_api::domain::event::SlotTime;
    ///
    /// let time = SlotTime::new(14, 5).expect("valid time");
    /// assert_eq!(time.to_string(), "14:05");
    /// ```
    pub fn new(hour: u16, minute: u16) -> Result<Self, String> {
        if hour > 23 || minute > 59 {
            return Err(format!("Invalid time: {:02}:{:02}", hour, minute));
        }
        Ok(SlotTime(hour * 60 + minute))
    }

    /// Parses `HH:MM`, or `HH:MM:SS` with the seconds dropped
    ///
    /// Every component must have exactly two digits.
    pub fn parse(value: &str) -> Result<Self, String> {
        let invalid = || format!("L'heure doit être au format HH:MM ({})", value);

        let parts: Vec<&str> = value.split(':').collect();
        if !(2..=3).contains(&parts.len())
            || parts
                .iter()
                .any(|p| p.len() != 2 || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }

        let hour: u16 = parts[0].parse().map_err(|_| invalid())?;
        let minute: u16 = parts[1].parse().map_err(|_| invalid())?;
        if let Some(seconds) = parts.get(2) {
            let seconds: u16 = seconds.parse().map_err(|_| invalid())?;
            if seconds > 59 {
                return Err(invalid());
            }
        }

        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn minutes_since_midnight(self) -> u16 {
        self.0
    }

    /// Absolute distance in minutes between two times of the same day
    pub fn minutes_apart(self, other: SlotTime) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for SlotTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SlotTime::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        let time = SlotTime::parse("09:30").unwrap();
        assert_eq!(time.minutes_since_midnight(), 570);
        assert_eq!(time.to_string(), "09:30");
    }

    #[test]
    fn drops_seconds() {
        assert_eq!(SlotTime::parse("14:00:00").unwrap(), SlotTime::new(14, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_values() {
        for raw in ["9:30", "24:00", "12:60", "12-30", "ab:cd", "12:30:75", ""] {
            assert!(SlotTime::parse(raw).is_err(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = SlotTime::new(14, 0).unwrap();
        let b = SlotTime::new(15, 5).unwrap();
        assert_eq!(a.minutes_apart(b), 65);
        assert_eq!(b.minutes_apart(a), 65);
    }

    #[test]
    fn serde_uses_the_display_form() {
        let time: SlotTime = serde_json::from_str("\"18:45\"").unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"18:45\"");
        assert!(serde_json::from_str::<SlotTime>("\"7pm\"").is_err());
    }
}
