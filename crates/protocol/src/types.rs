use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::PEOPLE_FILE_VERSION;

/// Identifier of a person.
///
/// The API uses Discord snowflakes (serialized as numbers or strings) for
/// newer accounts and textual Wurstmineberg ids for older ones. Both are kept
/// in their string form so a roster key and an online-list entry for the same
/// person always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(uid: &str) -> Self {
        Self(uid.to_string())
    }
}

impl From<String> for Uid {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UidVisitor;

        impl Visitor<'_> for UidVisitor {
            type Value = Uid;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a snowflake or a Wurstmineberg id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Uid, E> {
                Ok(Uid(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Uid, E> {
                Ok(Uid(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uid, E> {
                Ok(Uid(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uid, E> {
                if v < 0 {
                    return Err(E::invalid_value(de::Unexpected::Signed(v), &self));
                }
                Ok(Uid(v.to_string()))
            }
        }

        deserializer.deserialize_any(UidVisitor)
    }
}

/// A roster entry. Only the display name is modeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// All known people, keyed by uid.
pub type Roster = HashMap<Uid, Person>;

/// Checked `version` field of the people file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PeopleFileVersion;

/// The people file uses a format version this client does not understand.
#[derive(Debug, thiserror::Error)]
#[error(
    "people file returned from API has version {0} but this app only supports version {PEOPLE_FILE_VERSION}"
)]
pub struct PeopleFileVersionError(pub u8);

impl TryFrom<u8> for PeopleFileVersion {
    type Error = PeopleFileVersionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value == PEOPLE_FILE_VERSION {
            Ok(Self)
        } else {
            Err(PeopleFileVersionError(value))
        }
    }
}

impl From<PeopleFileVersion> for u8 {
    fn from(_: PeopleFileVersion) -> Self {
        PEOPLE_FILE_VERSION
    }
}

/// Response body of `people.json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeopleFile {
    pub version: PeopleFileVersion,
    pub people: Roster,
}

/// Live status of one world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStatus {
    /// Reported game version. Modded servers may not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub running: bool,
    /// Online players in server order. Absent means nobody is online.
    #[serde(default)]
    pub list: Vec<Uid>,
}

/// World statuses keyed by world name, iterated in name order.
pub type WorldStatusSet = BTreeMap<String, WorldStatus>;
