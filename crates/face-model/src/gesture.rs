//! Gesture kinds and the gesture selection that drives clicks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A debounced facial gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// The detector reports a smile.
    Smile,
    /// Right eye closed while the left eye stays open.
    RightBlink,
}

/// Which gesture produces clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    #[default]
    Smile,
    Blink,
}

impl GestureMode {
    /// The gesture kind whose debouncer drives clicks in this mode.
    pub fn gesture(&self) -> GestureKind {
        match self {
            GestureMode::Smile => GestureKind::Smile,
            GestureMode::Blink => GestureKind::RightBlink,
        }
    }

    /// Map a numeric selection (0 = smile, 1 = blink). Anything else is smile.
    pub fn from_index(index: u32) -> Self {
        match index {
            1 => GestureMode::Blink,
            _ => GestureMode::Smile,
        }
    }
}

impl fmt::Display for GestureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureMode::Smile => write!(f, "smile"),
            GestureMode::Blink => write!(f, "blink"),
        }
    }
}

/// Error returned when a gesture mode string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gesture mode '{0}' (expected 'smile' or 'blink')")]
pub struct ParseGestureModeError(pub String);

impl FromStr for GestureMode {
    type Err = ParseGestureModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smile" | "0" => Ok(GestureMode::Smile),
            "blink" | "wink" | "1" => Ok(GestureMode::Blink),
            other => Err(ParseGestureModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gesture_mode() {
        assert_eq!("smile".parse::<GestureMode>().unwrap(), GestureMode::Smile);
        assert_eq!(" Blink ".parse::<GestureMode>().unwrap(), GestureMode::Blink);
        assert_eq!("1".parse::<GestureMode>().unwrap(), GestureMode::Blink);
        assert!("nod".parse::<GestureMode>().is_err());
    }

    #[test]
    fn test_index_selection_defaults_to_smile() {
        assert_eq!(GestureMode::from_index(0), GestureMode::Smile);
        assert_eq!(GestureMode::from_index(1), GestureMode::Blink);
        assert_eq!(GestureMode::from_index(7), GestureMode::Smile);
    }

    #[test]
    fn test_mode_maps_to_gesture_kind() {
        assert_eq!(GestureMode::Smile.gesture(), GestureKind::Smile);
        assert_eq!(GestureMode::Blink.gesture(), GestureKind::RightBlink);
    }
}
