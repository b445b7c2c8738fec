use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voice requested from the post generator. Serialized as the bare variant
/// name, which is what the generator prompt interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Excited,
    Controversial,
    Educational,
    Humorous,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown tone: {0}")]
pub struct UnknownTone(pub String);

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Excited,
        Tone::Controversial,
        Tone::Educational,
        Tone::Humorous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Excited => "Excited",
            Tone::Controversial => "Controversial",
            Tone::Educational => "Educational",
            Tone::Humorous => "Humorous",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}
