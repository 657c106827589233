//! Interest catalogue offered to travellers.
//!
//! The catalogue is presentation configuration: requests carry plain strings,
//! so entries can change without touching prompt rendering or generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Interests offered by the interactive surface.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Interest {
    /// Historical sites.
    History,
    /// Galleries and street art.
    Art,
    /// Museums.
    Museums,
    /// Local food.
    Food,
    /// Cafés.
    Coffee,
    /// Bars and clubs.
    Nightlife,
    /// Beaches.
    Beaches,
    /// Lookouts and panoramas.
    Viewpoints,
    /// Notable buildings.
    Architecture,
    /// Parks and outdoors.
    Nature,
    /// Shopping streets and markets.
    Shopping,
    /// Live music.
    Music,
}

impl Interest {
    /// Every catalogue entry in display order.
    pub const ALL: [Self; 12] = [
        Self::History,
        Self::Art,
        Self::Museums,
        Self::Food,
        Self::Coffee,
        Self::Nightlife,
        Self::Beaches,
        Self::Viewpoints,
        Self::Architecture,
        Self::Nature,
        Self::Shopping,
        Self::Music,
    ];

    /// Display label, also used verbatim in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::History => "History",
            Self::Art => "Art",
            Self::Museums => "Museums",
            Self::Food => "Food",
            Self::Coffee => "Coffee",
            Self::Nightlife => "Nightlife",
            Self::Beaches => "Beaches",
            Self::Viewpoints => "Viewpoints",
            Self::Architecture => "Architecture",
            Self::Nature => "Nature",
            Self::Shopping => "Shopping",
            Self::Music => "Music",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AsRef<str> for Interest {
    fn as_ref(&self) -> &str {
        self.label()
    }
}

impl FromStr for Interest {
    type Err = Error;

    /// Case-insensitive lookup by label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|interest| interest.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownInterest { name: s.to_owned() })
    }
}
