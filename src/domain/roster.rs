//! Roster query model and the presence records returned by the remote API.

use serde::{Deserialize, Serialize};

use super::fields::FieldFlags;

/// Remote query flavour: the global online list or one organization's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Online,
    Organization,
}

impl Mode {
    pub const ONLINE_CODE: i64 = 1;
    pub const ORGANIZATION_CODE: i64 = 2;

    /// Map a wire code to a mode. Codes outside the two supported values are
    /// unknown and yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            Self::ONLINE_CODE => Some(Self::Online),
            Self::ORGANIZATION_CODE => Some(Self::Organization),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Mode::Online => Self::ONLINE_CODE,
            Mode::Organization => Self::ORGANIZATION_CODE,
        }
    }

    /// Keyword used in upstream request paths.
    pub fn command(self) -> &'static str {
        match self {
            Mode::Online => "online",
            Mode::Organization => "org",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Online => "online",
            Mode::Organization => "organization",
        }
    }
}

/// Game-server shard selector; `All` queries every shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    #[default]
    All,
    First,
    Second,
}

impl Dimension {
    /// Map a wire code to a shard. Unknown codes fall back to `All`, keeping
    /// the upstream path well-formed for arbitrary inbound input.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Dimension::First,
            2 => Dimension::Second,
            _ => Dimension::All,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Dimension::All => 0,
            Dimension::First => 1,
            Dimension::Second => 2,
        }
    }
}

/// One member's presence record as returned by the remote roster API.
///
/// `channel_name` is only supplied for online-list queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub ingame: bool,
    #[serde(default)]
    pub idle_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

/// Ordered sequence of presence records for one query; may be empty.
pub type RosterResult = Vec<RosterRow>;

/// Wire-level widget selection, after permissive integer parsing.
///
/// Unparseable inbound values arrive here as 0; mode and organization are
/// validated where they are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterQuery {
    pub mode: i64,
    pub dimension: Dimension,
    pub organization: i64,
    pub fields: FieldFlags,
}

impl RosterQuery {
    /// Stable signature string the response cache keys on. Distinct
    /// selections never produce the same signature.
    pub fn signature(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.mode,
            self.dimension.code(),
            self.organization,
            self.fields.bits()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_round_trip() {
        assert_eq!(Mode::from_code(1), Some(Mode::Online));
        assert_eq!(Mode::from_code(2), Some(Mode::Organization));
        assert_eq!(Mode::from_code(0), None);
        assert_eq!(Mode::from_code(7), None);
        assert_eq!(Mode::Online.code(), 1);
        assert_eq!(Mode::Organization.code(), 2);
    }

    #[test]
    fn unknown_dimension_codes_fall_back_to_all_shards() {
        assert_eq!(Dimension::from_code(1), Dimension::First);
        assert_eq!(Dimension::from_code(2), Dimension::Second);
        assert_eq!(Dimension::from_code(0), Dimension::All);
        assert_eq!(Dimension::from_code(-3), Dimension::All);
        assert_eq!(Dimension::from_code(99), Dimension::All);
    }

    #[test]
    fn roster_row_decodes_upstream_keys() {
        let row: RosterRow = serde_json::from_str(
            r#"{"name":"Trader","country":"SE","ingame":true,"idleTime":120,"channelName":"General"}"#,
        )
        .expect("row decodes");
        assert_eq!(row.name, "Trader");
        assert_eq!(row.idle_time, 120);
        assert_eq!(row.channel_name.as_deref(), Some("General"));
    }

    #[test]
    fn roster_row_tolerates_missing_optional_keys() {
        let row: RosterRow =
            serde_json::from_str(r#"{"name":"Doc","country":"DE","ingame":false,"idleTime":5}"#)
                .expect("row decodes");
        assert_eq!(row.channel_name, None);
    }

    #[test]
    fn signature_covers_the_full_selection() {
        let query = RosterQuery {
            mode: 2,
            dimension: Dimension::First,
            organization: 12_345,
            fields: FieldFlags::NAME | FieldFlags::COUNTRY,
        };
        assert_eq!(query.signature(), "2:1:12345:3");

        let other = RosterQuery {
            fields: FieldFlags::NAME,
            ..query
        };
        assert_ne!(query.signature(), other.signature());
    }
}
