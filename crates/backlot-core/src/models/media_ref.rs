//! Media path references
//!
//! Edit and save endpoints accept either an existing media UUID or the
//! literal `new` to address a not-yet-created entry with the same routes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::AppError;

/// Path reference to a media entry: an existing row or the `new` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRef {
    New,
    Id(Uuid),
}

impl MediaRef {
    pub fn is_new(&self) -> bool {
        matches!(self, MediaRef::New)
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            MediaRef::New => None,
            MediaRef::Id(id) => Some(*id),
        }
    }
}

impl FromStr for MediaRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "new" {
            Ok(MediaRef::New)
        } else {
            Ok(MediaRef::Id(Uuid::parse_str(s)?))
        }
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaRef::New => f.write_str("new"),
            MediaRef::Id(id) => write!(f, "{}", id),
        }
    }
}

impl<'de> Deserialize<'de> for MediaRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_new_sentinel() {
        let media_ref: MediaRef = "new".parse().unwrap();
        assert!(media_ref.is_new());
        assert_eq!(media_ref.id(), None);
    }

    #[test]
    fn test_parses_uuid() {
        let id = Uuid::new_v4();
        let media_ref: MediaRef = id.to_string().parse().unwrap();
        assert_eq!(media_ref, MediaRef::Id(id));
        assert_eq!(media_ref.id(), Some(id));
    }

    #[test]
    fn test_rejects_other_strings() {
        assert!("latest".parse::<MediaRef>().is_err());
        assert!("New".parse::<MediaRef>().is_err());
        assert!("".parse::<MediaRef>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let id = Uuid::new_v4();
        assert_eq!(MediaRef::New.to_string(), "new");
        assert_eq!(MediaRef::Id(id).to_string(), id.to_string());
    }
}
