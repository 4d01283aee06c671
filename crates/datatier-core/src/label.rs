//! Four-tier sensitivity taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sensitivity tier assigned to a column, ordered from least to most sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Public,
    /// Also reported as "Internal" by some deployments.
    #[serde(alias = "Internal")]
    Restricted,
    Confidential,
    #[serde(rename = "Top Secret")]
    TopSecret,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown classification label '{0}'")]
pub struct UnknownLabel(pub String);

impl Label {
    /// All tiers in ascending sensitivity.
    pub const ALL: [Label; 4] = [
        Label::Public,
        Label::Restricted,
        Label::Confidential,
        Label::TopSecret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Public => "Public",
            Label::Restricted => "Restricted",
            Label::Confidential => "Confidential",
            Label::TopSecret => "Top Secret",
        }
    }

    /// Exact, case-sensitive match on a canonical tier name.
    ///
    /// "Internal" is accepted as the legacy name of `Restricted`. Anything
    /// else, including differently cased names, yields `None`.
    pub fn parse_canonical(s: &str) -> Option<Label> {
        match s {
            "Public" => Some(Label::Public),
            "Restricted" | "Internal" => Some(Label::Restricted),
            "Confidential" => Some(Label::Confidential),
            "Top Secret" => Some(Label::TopSecret),
            _ => None,
        }
    }

    /// One-line description of the tier.
    pub fn description(&self) -> &'static str {
        match self {
            Label::Public => "Data that can be shared with the public without restrictions.",
            Label::Restricted => {
                "Data requiring special protection; unauthorized disclosure does not pose a serious threat."
            }
            Label::Confidential => {
                "Sensitive data; unauthorized disclosure could cause significant harm to the state or organizations."
            }
            Label::TopSecret => {
                "Highly sensitive data; unauthorized disclosure could threaten national security or cause severe damage to strategic interests."
            }
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse_canonical(s).ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
