use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Calendar event categories offered by the calendar form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventCategory {
    #[default]
    Wellness,
    #[serde(rename = "Focus Block")]
    FocusBlock,
    #[serde(rename = "1:1")]
    OneOnOne,
    Deadline,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Wellness,
        EventCategory::FocusBlock,
        EventCategory::OneOnOne,
        EventCategory::Deadline,
        EventCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Wellness => "Wellness",
            EventCategory::FocusBlock => "Focus Block",
            EventCategory::OneOnOne => "1:1",
            EventCategory::Deadline => "Deadline",
            EventCategory::Other => "Other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "wellness" => Ok(EventCategory::Wellness),
            "focus block" | "focus" => Ok(EventCategory::FocusBlock),
            "1:1" | "one on one" => Ok(EventCategory::OneOnOne),
            "deadline" => Ok(EventCategory::Deadline),
            "other" => Ok(EventCategory::Other),
            _ => Err(format!(
                "Unknown category '{}', expected one of: {}",
                s,
                EventCategory::ALL
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_form_labels() {
        for category in EventCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("focus-block".parse::<EventCategory>(), Ok(EventCategory::FocusBlock));
        assert_eq!("1:1".parse::<EventCategory>(), Ok(EventCategory::OneOnOne));
        assert_eq!("DEADLINE".parse::<EventCategory>(), Ok(EventCategory::Deadline));
        assert!("vacation".parse::<EventCategory>().is_err());
    }
}
