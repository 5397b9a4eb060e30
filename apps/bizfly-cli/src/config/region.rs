//! Bizfly Cloud regions

use crate::error::{CliError, CliResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    HaNoi,
    HoChiMinh,
    VcHaNoi,
}

impl Region {
    /// Canonical region name as the API expects it
    pub fn name(&self) -> &'static str {
        match self {
            Region::HaNoi => "HaNoi",
            Region::HoChiMinh => "HoChiMinh",
            Region::VcHaNoi => "VC-HaNoi",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = CliError;

    fn from_str(s: &str) -> CliResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "hn" | "hanoi" => Ok(Region::HaNoi),
            "hcm" | "hochiminh" => Ok(Region::HoChiMinh),
            "vc-hanoi" => Ok(Region::VcHaNoi),
            _ => Err(CliError::Config(format!("invalid region {}", s))),
        }
    }
}
