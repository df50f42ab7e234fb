//! Publishing workflow status
//!
//! A media entry carries a set of status flags stored as a SMALLINT
//! bitmask. Bit weights are chosen so that `ORDER BY status DESC` lists
//! media still moving through the workflow (unreviewed, unencoded, draft)
//! ahead of published entries.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// A single flag in the media status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFlag {
    Trash,
    Publish,
    Draft,
    Unencoded,
    Unreviewed,
}

impl StatusFlag {
    /// Every flag, in ascending bit order.
    pub const ALL: [StatusFlag; 5] = [
        StatusFlag::Trash,
        StatusFlag::Publish,
        StatusFlag::Draft,
        StatusFlag::Unencoded,
        StatusFlag::Unreviewed,
    ];

    pub const fn bit(self) -> i16 {
        match self {
            StatusFlag::Trash => 1,
            StatusFlag::Publish => 2,
            StatusFlag::Draft => 4,
            StatusFlag::Unencoded => 8,
            StatusFlag::Unreviewed => 16,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StatusFlag::Trash => "trash",
            StatusFlag::Publish => "publish",
            StatusFlag::Draft => "draft",
            StatusFlag::Unencoded => "unencoded",
            StatusFlag::Unreviewed => "unreviewed",
        }
    }
}

/// The set of status flags on a media entry.
///
/// Serializes as an array of flag names, e.g. `["draft", "unreviewed"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct MediaStatus(i16);

impl MediaStatus {
    const MASK: i16 = 0b1_1111;

    pub const fn empty() -> Self {
        MediaStatus(0)
    }

    /// Status assigned to newly created media: a draft that still needs
    /// encoding and review.
    pub const fn initial() -> Self {
        MediaStatus(
            StatusFlag::Draft.bit() | StatusFlag::Unencoded.bit() | StatusFlag::Unreviewed.bit(),
        )
    }

    /// Reconstruct from raw bits, ignoring unknown bits.
    pub const fn from_bits(bits: i16) -> Self {
        MediaStatus(bits & Self::MASK)
    }

    pub const fn bits(self) -> i16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: StatusFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[must_use]
    pub const fn with(self, flag: StatusFlag) -> Self {
        MediaStatus(self.0 | flag.bit())
    }

    #[must_use]
    pub const fn without(self, flag: StatusFlag) -> Self {
        MediaStatus(self.0 & !flag.bit())
    }

    /// Flags present in this set, in ascending bit order.
    pub fn flags(self) -> Vec<StatusFlag> {
        StatusFlag::ALL
            .into_iter()
            .filter(|flag| self.contains(*flag))
            .collect()
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in self.flags() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(flag.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for MediaStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags = self.flags();
        let mut seq = serializer.serialize_seq(Some(flags.len()))?;
        for flag in flags {
            seq.serialize_element(&flag)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for MediaStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flags = Vec::<StatusFlag>::deserialize(deserializer)?;
        Ok(flags
            .into_iter()
            .fold(MediaStatus::empty(), MediaStatus::with))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        let status = MediaStatus::initial();
        assert!(status.contains(StatusFlag::Draft));
        assert!(status.contains(StatusFlag::Unencoded));
        assert!(status.contains(StatusFlag::Unreviewed));
        assert!(!status.contains(StatusFlag::Publish));
        assert!(!status.contains(StatusFlag::Trash));
    }

    #[test]
    fn test_with_and_without() {
        let status = MediaStatus::initial().without(StatusFlag::Unreviewed);
        assert!(!status.contains(StatusFlag::Unreviewed));
        assert!(status.contains(StatusFlag::Draft));

        let published = status
            .without(StatusFlag::Draft)
            .without(StatusFlag::Unencoded)
            .with(StatusFlag::Publish);
        assert_eq!(published.flags(), vec![StatusFlag::Publish]);
    }

    #[test]
    fn test_without_is_idempotent() {
        let status = MediaStatus::initial()
            .without(StatusFlag::Publish)
            .without(StatusFlag::Publish);
        assert_eq!(status, MediaStatus::initial());
    }

    #[test]
    fn test_pending_work_sorts_above_published() {
        // The listing relies on ORDER BY status DESC to surface media
        // that still needs attention.
        let pending = MediaStatus::initial();
        let published = MediaStatus::empty().with(StatusFlag::Publish);
        assert!(pending.bits() > published.bits());
    }

    #[test]
    fn test_from_bits_ignores_unknown_bits() {
        let status = MediaStatus::from_bits(0b0100_0110);
        assert_eq!(
            status.flags(),
            vec![StatusFlag::Publish, StatusFlag::Draft]
        );
    }

    #[test]
    fn test_display_joins_flag_names() {
        assert_eq!(MediaStatus::initial().to_string(), "draft,unencoded,unreviewed");
        assert_eq!(MediaStatus::empty().to_string(), "");
    }

    #[test]
    fn test_serde_round_trip() {
        let status = MediaStatus::initial();
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"["draft","unencoded","unreviewed"]"#);
        let back: MediaStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
