use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A single content digest algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    Sha256,
    Sha1,
}

impl DigestAlgorithm {
    /// The label used inside fingerprint pairs (`sha256:...`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha1 => "sha1",
        }
    }

    /// Hex characters in one rendered digest of this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha1 => 40,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Named digest policy in force for a store.
///
/// The policy fixes the expected length of object file names and the set of
/// digest algorithms minted when new records are created. It is selected
/// once per run and threaded into every component; there is no ambient
/// process-wide policy state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashPolicy {
    /// Current default: SHA-256, 64 hex characters.
    #[default]
    Sha256,
    /// Legacy stores: SHA-1, 40 hex characters.
    Sha1,
}

impl HashPolicy {
    /// The algorithm object file names are expected to spell.
    pub fn primary(&self) -> DigestAlgorithm {
        match self {
            Self::Sha256 => DigestAlgorithm::Sha256,
            Self::Sha1 => DigestAlgorithm::Sha1,
        }
    }

    /// Expected hex-character count of a valid object name.
    pub fn hex_len(&self) -> usize {
        self.primary().hex_len()
    }

    /// Returns `true` for policies older than the current default.
    pub fn is_legacy(&self) -> bool {
        !matches!(self, Self::Sha256)
    }

    /// Algorithms computed when minting a record for a new object.
    ///
    /// Legacy policies also compute the current default, so a store can be
    /// upgraded progressively without a separate migration pass.
    pub fn mint_algorithms(&self) -> &'static [DigestAlgorithm] {
        match self {
            Self::Sha256 => &[DigestAlgorithm::Sha256],
            Self::Sha1 => &[DigestAlgorithm::Sha1, DigestAlgorithm::Sha256],
        }
    }

    /// Fast, shallow probe: is `name` structurally a digest under this policy?
    ///
    /// True iff the length matches exactly and every character is an ASCII
    /// hex digit. This says nothing about whether the name is the real
    /// digest of the referenced bytes.
    pub fn is_valid_name(&self, name: &str) -> bool {
        name.len() == self.hex_len() && name.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for HashPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary().label())
    }
}

impl FromStr for HashPolicy {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha1" => Ok(Self::Sha1),
            other => Err(TypeError::UnknownPolicy(other.to_string())),
        }
    }
}
