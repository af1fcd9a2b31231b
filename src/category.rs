use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// KCET admission reservation categories. These are the exact seat-matrix
/// codes used in the official cutoff tables, not the informal
/// general/obc/sc/st labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "1G")]
    OneG,
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "1R")]
    OneR,
    #[serde(rename = "2AG")]
    TwoAG,
    #[serde(rename = "2AK")]
    TwoAK,
    #[serde(rename = "2AR")]
    TwoAR,
    #[serde(rename = "2BG")]
    TwoBG,
    #[serde(rename = "2BK")]
    TwoBK,
    #[serde(rename = "2BR")]
    TwoBR,
    #[serde(rename = "3AG")]
    ThreeAG,
    #[serde(rename = "3AK")]
    ThreeAK,
    #[serde(rename = "3AR")]
    ThreeAR,
    #[serde(rename = "3BG")]
    ThreeBG,
    #[serde(rename = "3BK")]
    ThreeBK,
    #[serde(rename = "3BR")]
    ThreeBR,
    #[serde(rename = "GM")]
    Gm,
    #[serde(rename = "GMK")]
    Gmk,
    #[serde(rename = "GMR")]
    Gmr,
    #[serde(rename = "SCG")]
    Scg,
    #[serde(rename = "SCK")]
    Sck,
    #[serde(rename = "SCR")]
    Scr,
    #[serde(rename = "STG")]
    Stg,
    #[serde(rename = "STK")]
    Stk,
    #[serde(rename = "STR")]
    Str,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Category::OneG,
        Category::OneK,
        Category::OneR,
        Category::TwoAG,
        Category::TwoAK,
        Category::TwoAR,
        Category::TwoBG,
        Category::TwoBK,
        Category::TwoBR,
        Category::ThreeAG,
        Category::ThreeAK,
        Category::ThreeAR,
        Category::ThreeBG,
        Category::ThreeBK,
        Category::ThreeBR,
        Category::Gm,
        Category::Gmk,
        Category::Gmr,
        Category::Scg,
        Category::Sck,
        Category::Scr,
        Category::Stg,
        Category::Stk,
        Category::Str,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::OneG => "1G",
            Category::OneK => "1K",
            Category::OneR => "1R",
            Category::TwoAG => "2AG",
            Category::TwoAK => "2AK",
            Category::TwoAR => "2AR",
            Category::TwoBG => "2BG",
            Category::TwoBK => "2BK",
            Category::TwoBR => "2BR",
            Category::ThreeAG => "3AG",
            Category::ThreeAK => "3AK",
            Category::ThreeAR => "3AR",
            Category::ThreeBG => "3BG",
            Category::ThreeBK => "3BK",
            Category::ThreeBR => "3BR",
            Category::Gm => "GM",
            Category::Gmk => "GMK",
            Category::Gmr => "GMR",
            Category::Scg => "SCG",
            Category::Sck => "SCK",
            Category::Scr => "SCR",
            Category::Stg => "STG",
            Category::Stk => "STK",
            Category::Str => "STR",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Category::ALL
            .iter()
            .copied()
            .find(|cat| cat.code() == code)
            .ok_or(EngineError::UnknownCategory(code))
    }
}
