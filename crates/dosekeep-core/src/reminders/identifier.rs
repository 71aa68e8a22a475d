//! Trigger identifier encoding.
//!
//! The pending-notification list of the OS is the only record of what has
//! been scheduled, so the recurrence slot is encoded into each identifier.
//! Cancellation and supersession are then plain prefix scans.
//!
//! ```text
//! Daily    reminder-{goal}-{hour}-{minute}
//! Weekly   reminder-{goal}-w{weekday}-{hour}-{minute}     weekday 1=Sunday..7=Saturday
//! Monthly  reminder-{goal}-d{day}-{hour}-{minute}
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::frequency::Frequency;

pub const IDENTIFIER_PREFIX: &str = "reminder-";

/// The recurrence slot an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub frequency: Frequency,
    /// 1=Sunday..7=Saturday, set for weekly slots.
    pub weekday: Option<u32>,
    /// 1..=31, set for monthly slots.
    pub day: Option<u32>,
    pub hour: u32,
    pub minute: u32,
}

impl Slot {
    /// Extract the fields `frequency` cares about from a target time.
    pub fn from_time(at: &NaiveDateTime, frequency: Frequency) -> Self {
        let (weekday, day) = match frequency {
            Frequency::Daily => (None, None),
            Frequency::Weekly => (Some(at.weekday().number_from_sunday()), None),
            Frequency::Monthly => (None, Some(at.day())),
        };
        Self {
            frequency,
            weekday,
            day,
            hour: at.hour(),
            minute: at.minute(),
        }
    }

    fn tail(&self) -> String {
        match (self.frequency, self.weekday, self.day) {
            (Frequency::Weekly, Some(w), _) => format!("w{}-{}-{}", w, self.hour, self.minute),
            (Frequency::Monthly, _, Some(d)) => format!("d{}-{}-{}", d, self.hour, self.minute),
            _ => format!("{}-{}", self.hour, self.minute),
        }
    }
}

/// An identifier split back into goal id and slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedIdentifier {
    pub goal_id: String,
    pub slot: Slot,
}

/// Identifier for the trigger of `goal_id` at `at`, repeating per `frequency`.
pub fn encode(goal_id: &str, at: &NaiveDateTime, frequency: Frequency) -> String {
    encode_slot(goal_id, &Slot::from_time(at, frequency))
}

pub fn encode_slot(goal_id: &str, slot: &Slot) -> String {
    format!("{}{}-{}", IDENTIFIER_PREFIX, goal_id, slot.tail())
}

/// Whether `identifier` was produced for `goal_id`.
///
/// The remainder after `reminder-{goal_id}` must be a well-formed slot, so a
/// goal never claims the identifiers of another goal whose id it prefixes.
pub fn matches_goal(identifier: &str, goal_id: &str) -> bool {
    identifier
        .strip_prefix(IDENTIFIER_PREFIX)
        .and_then(|rest| rest.strip_prefix(goal_id))
        .and_then(|rest| rest.strip_prefix('-'))
        .map(|tail| parse_tail(&tail.split('-').collect::<Vec<_>>()).is_some())
        .unwrap_or(false)
}

/// Split an identifier into goal id and slot.
///
/// Parses from the right. An id that itself ends in something shaped like a
/// weekly or monthly tag is read as that tag.
pub fn decode(identifier: &str) -> Option<DecodedIdentifier> {
    let rest = identifier.strip_prefix(IDENTIFIER_PREFIX)?;
    let parts: Vec<&str> = rest.split('-').collect();

    for tail_len in [3usize, 2] {
        if parts.len() <= tail_len {
            continue;
        }
        let (head, tail) = parts.split_at(parts.len() - tail_len);
        if let Some(slot) = parse_tail(tail) {
            let goal_id = head.join("-");
            if goal_id.is_empty() {
                return None;
            }
            return Some(DecodedIdentifier { goal_id, slot });
        }
    }
    None
}

fn parse_tail(parts: &[&str]) -> Option<Slot> {
    match parts {
        [hour, minute] => Some(Slot {
            frequency: Frequency::Daily,
            weekday: None,
            day: None,
            hour: parse_hour(hour)?,
            minute: parse_minute(minute)?,
        }),
        [tag, hour, minute] => {
            let (frequency, weekday, day) = if let Some(w) = tag.strip_prefix('w') {
                let w = parse_number(w).filter(|w| (1..=7).contains(w))?;
                (Frequency::Weekly, Some(w), None)
            } else if let Some(d) = tag.strip_prefix('d') {
                let d = parse_number(d).filter(|d| (1..=31).contains(d))?;
                (Frequency::Monthly, None, Some(d))
            } else {
                return None;
            };
            Some(Slot {
                frequency,
                weekday,
                day,
                hour: parse_hour(hour)?,
                minute: parse_minute(minute)?,
            })
        }
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_hour(s: &str) -> Option<u32> {
    parse_number(s).filter(|h| *h < 24)
}

fn parse_minute(s: &str) -> Option<u32> {
    parse_number(s).filter(|m| *m < 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2024-03-05 is a Tuesday.
    fn tuesday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn encodes_each_frequency() {
        let at = tuesday(8, 5);
        assert_eq!(encode("g1", &at, Frequency::Daily), "reminder-g1-8-5");
        assert_eq!(encode("g1", &at, Frequency::Weekly), "reminder-g1-w3-8-5");
        assert_eq!(encode("g1", &at, Frequency::Monthly), "reminder-g1-d5-8-5");
    }

    #[test]
    fn matches_only_its_own_goal() {
        let id = encode("12", &tuesday(9, 0), Frequency::Daily);
        assert!(matches_goal(&id, "12"));
        assert!(!matches_goal(&id, "1"));
        assert!(!matches_goal(&id, "123"));
        assert!(!matches_goal("alarm-12-9-0", "12"));
    }

    #[test]
    fn uuid_goal_ids_do_not_collide() {
        let a = "5f0c5e1e-7a3b-4c1d-9e2f-0a1b2c3d4e5f";
        let id = encode(a, &tuesday(22, 45), Frequency::Weekly);
        assert!(matches_goal(&id, a));
        assert!(!matches_goal(&id, "5f0c5e1e-7a3b-4c1d-9e2f"));
    }

    #[test]
    fn decode_recovers_goal_and_slot() {
        let a = "5f0c5e1e-7a3b-4c1d-9e2f-0a1b2c3d4e5f";
        let decoded = decode(&encode(a, &tuesday(22, 45), Frequency::Monthly)).unwrap();
        assert_eq!(decoded.goal_id, a);
        assert_eq!(decoded.slot.frequency, Frequency::Monthly);
        assert_eq!(decoded.slot.day, Some(5));
        assert_eq!((decoded.slot.hour, decoded.slot.minute), (22, 45));

        let decoded = decode("reminder-g1-7-30").unwrap();
        assert_eq!(decoded.goal_id, "g1");
        assert_eq!(decoded.slot.frequency, Frequency::Daily);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("reminder-").is_none());
        assert!(decode("reminder-8-30").is_none());
        assert!(decode("reminder-g1-25-0").is_none());
        assert!(decode("reminder-g1-8-60").is_none());
        assert!(decode("something-else").is_none());
    }
}
