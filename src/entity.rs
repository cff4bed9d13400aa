//! Navigation types and the key vocabulary shared by catalog templates.
//!
//! The host application builds an [`EntityKeys`] mapping for the active
//! object; templates reference these key names through `%(key)s`
//! placeholders. Keys that the host could not determine are simply absent,
//! keys it found but that carry no value are present with an empty string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Flat key/value mapping describing the active entity.
pub type EntityKeys = BTreeMap<String, String>;

/// Kind of genealogical object currently active in the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NavType {
    People,
    Places,
    Sources,
    Families,
    Events,
    Citations,
    Media,
}

impl NavType {
    /// Every navigation type a `*` catalog row expands to, in display order.
    pub const ALL: [NavType; 7] = [
        NavType::People,
        NavType::Places,
        NavType::Sources,
        NavType::Families,
        NavType::Events,
        NavType::Citations,
        NavType::Media,
    ];

    /// Returns the stable label used in catalogs and hidden-link keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::People => "People",
            Self::Places => "Places",
            Self::Sources => "Sources",
            Self::Families => "Families",
            Self::Events => "Events",
            Self::Citations => "Citations",
            Self::Media => "Media",
        }
    }

    /// Icon name shown next to rows of this navigation type.
    #[must_use]
    pub fn category_icon(self) -> &'static str {
        match self {
            Self::People => "gramps-person",
            Self::Places => "gramps-place",
            Self::Sources => "gramps-source",
            Self::Families => "gramps-family",
            Self::Events => "gramps-event",
            Self::Citations => "gramps-citation",
            Self::Media => "gramps-media",
        }
    }
}

impl fmt::Display for NavType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a navigation type label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown navigation type '{0}'")]
pub struct UnknownNavType(pub String);

impl FromStr for NavType {
    type Err = UnknownNavType;

    /// Accepts the catalog labels and their singular forms (`Person`, `Family`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "People" | "Person" => Ok(Self::People),
            "Places" | "Place" => Ok(Self::Places),
            "Sources" | "Source" => Ok(Self::Sources),
            "Families" | "Family" => Ok(Self::Families),
            "Events" | "Event" => Ok(Self::Events),
            "Citations" | "Citation" => Ok(Self::Citations),
            "Media" => Ok(Self::Media),
            other => Err(UnknownNavType(other.to_string())),
        }
    }
}

/// Key names available for `People` templates.
pub mod person_keys {
    pub const GIVEN: &str = "given";
    pub const MIDDLE: &str = "middle";
    pub const SURNAME: &str = "surname";
    pub const BIRTH_YEAR: &str = "birth_year";
    pub const BIRTH_YEAR_FROM: &str = "birth_year_from";
    pub const BIRTH_YEAR_TO: &str = "birth_year_to";
    pub const BIRTH_YEAR_BEFORE: &str = "birth_year_before";
    pub const BIRTH_YEAR_AFTER: &str = "birth_year_after";
    pub const DEATH_YEAR: &str = "death_year";
    pub const DEATH_YEAR_FROM: &str = "death_year_from";
    pub const DEATH_YEAR_TO: &str = "death_year_to";
    pub const DEATH_YEAR_BEFORE: &str = "death_year_before";
    pub const DEATH_YEAR_AFTER: &str = "death_year_after";
    pub const BIRTH_PLACE: &str = "birth_place";
    pub const DEATH_PLACE: &str = "death_place";
    pub const BIRTH_ROOT_PLACE: &str = "birth_root_place";
    pub const DEATH_ROOT_PLACE: &str = "death_root_place";

    pub const ALL: [&str; 17] = [
        GIVEN,
        MIDDLE,
        SURNAME,
        BIRTH_YEAR,
        BIRTH_YEAR_FROM,
        BIRTH_YEAR_TO,
        BIRTH_YEAR_BEFORE,
        BIRTH_YEAR_AFTER,
        DEATH_YEAR,
        DEATH_YEAR_FROM,
        DEATH_YEAR_TO,
        DEATH_YEAR_BEFORE,
        DEATH_YEAR_AFTER,
        BIRTH_PLACE,
        DEATH_PLACE,
        BIRTH_ROOT_PLACE,
        DEATH_ROOT_PLACE,
    ];
}

/// Key names available for `Places` templates.
pub mod place_keys {
    pub const PLACE: &str = "place";
    pub const ROOT_PLACE: &str = "root_place";

    pub const ALL: [&str; 2] = [PLACE, ROOT_PLACE];
}

/// Key names available for `Sources` templates.
pub mod source_keys {
    pub const TITLE: &str = "source_title";

    pub const ALL: [&str; 1] = [TITLE];
}

/// Family events that contribute year and place keys to `Families` templates.
const FAMILY_EVENTS: [&str; 2] = ["marriage", "divorce"];

/// Parents whose person keys are repeated under a role prefix for `Families` templates.
const FAMILY_ROLES: [&str; 2] = ["father", "mother"];

/// Suffixes appended to an event name to form its year keys.
const YEAR_SUFFIXES: [&str; 5] = ["year", "year_from", "year_to", "year_before", "year_after"];

/// Returns the documented key vocabulary for a navigation type.
///
/// Families combine the person vocabulary under `father_`/`mother_` prefixes
/// with marriage and divorce year/place keys. Events, citations and media
/// have no fixed vocabulary; their templates rely on attribute-derived keys.
#[must_use]
pub fn key_vocabulary(nav_type: NavType) -> Vec<String> {
    match nav_type {
        NavType::People => person_keys::ALL.iter().map(ToString::to_string).collect(),
        NavType::Places => place_keys::ALL.iter().map(ToString::to_string).collect(),
        NavType::Sources => source_keys::ALL.iter().map(ToString::to_string).collect(),
        NavType::Families => {
            let mut keys: Vec<String> = FAMILY_ROLES
                .iter()
                .flat_map(|role| {
                    person_keys::ALL
                        .iter()
                        .map(move |key| format!("{role}_{key}"))
                })
                .collect();
            for event in FAMILY_EVENTS {
                keys.extend(YEAR_SUFFIXES.iter().map(|suffix| format!("{event}_{suffix}")));
                keys.push(format!("{event}_place"));
                keys.push(format!("{event}_root_place"));
            }
            keys
        }
        NavType::Events | NavType::Citations | NavType::Media => Vec::new(),
    }
}

/// How a multi-word given name is mapped onto the `given`/`middle` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MiddleNameHandling {
    /// Keep the full given name in `given`; `middle` is empty.
    LeaveAlone,
    /// First word goes to `given`, the remaining words to `middle`.
    #[default]
    Separate,
    /// First word goes to `given`, the remaining words are dropped.
    Remove,
}

impl MiddleNameHandling {
    /// Returns the stable label used in the settings file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeaveAlone => "leave alone",
            Self::Separate => "separate",
            Self::Remove => "remove",
        }
    }

    /// Parses a settings label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "leave alone" => Some(Self::LeaveAlone),
            "separate" => Some(Self::Separate),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    /// Splits a full given name into `(given, middle)`.
    #[must_use]
    pub fn split(self, full_given: &str) -> (String, String) {
        let full_given = full_given.trim();
        match self {
            Self::LeaveAlone => (full_given.to_string(), String::new()),
            Self::Separate | Self::Remove => {
                let mut words = full_given.split_whitespace();
                let given = words.next().unwrap_or_default().to_string();
                let middle = if self == Self::Separate {
                    words.collect::<Vec<_>>().join(" ")
                } else {
                    String::new()
                };
                (given, middle)
            }
        }
    }

    /// Inserts `given` and `middle` keys (optionally role-prefixed) into `keys`.
    pub fn apply(self, keys: &mut EntityKeys, prefix: Option<&str>, full_given: &str) {
        let (given, middle) = self.split(full_given);
        let key = |name: &str| match prefix {
            Some(prefix) => format!("{prefix}_{name}"),
            None => name.to_string(),
        };
        keys.insert(key(person_keys::GIVEN), given);
        keys.insert(key(person_keys::MIDDLE), middle);
    }
}
