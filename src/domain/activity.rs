// ============================================================
// Layer 3 - Activity Domain Type
// ============================================================
// The closed vocabulary of activities recorded in the WISDM
// accelerometer dataset.
//
// Variant order is the lexicographic order of the label strings,
// so the derived Ord and the column index used for one-hot
// encoding agree with sorting the labels as text.

use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// One of the six activities a window can be labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    Downstairs,
    Jogging,
    Sitting,
    Standing,
    Upstairs,
    Walking,
}

impl Activity {
    /// Every activity in declaration (= sorted) order
    pub const ALL: [Activity; 6] = [
        Activity::Downstairs,
        Activity::Jogging,
        Activity::Sitting,
        Activity::Standing,
        Activity::Upstairs,
        Activity::Walking,
    ];

    /// Number of activities in the vocabulary
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this activity in `Activity::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label exactly as it appears in the raw CSV
    pub fn as_str(self) -> &'static str {
        match self {
            Activity::Downstairs => "Downstairs",
            Activity::Jogging    => "Jogging",
            Activity::Sitting    => "Sitting",
            Activity::Standing   => "Standing",
            Activity::Upstairs   => "Upstairs",
            Activity::Walking    => "Walking",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive parse of a raw CSV label
impl FromStr for Activity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::ALL.iter().find(|a| a.as_str() == s) {
            Some(a) => Ok(*a),
            None    => bail!("unknown activity label '{s}'"),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_sorted() {
        let mut names: Vec<&str> = Activity::ALL.iter().map(|a| a.as_str()).collect();
        let declared = names.clone();
        names.sort();
        assert_eq!(names, declared);
    }

    #[test]
    fn test_parse_round_trip() {
        for a in Activity::ALL {
            assert_eq!(a.as_str().parse::<Activity>().unwrap(), a);
            assert_eq!(Activity::ALL[a.index()], a);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("walking".parse::<Activity>().is_err());
        assert!("Running".parse::<Activity>().is_err());
    }
}
