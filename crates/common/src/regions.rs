use serde::Serialize;
use std::fmt;

/// Sentinel region covering the whole country.
pub const COUNTRY_CODE: &str = "US";

const COUNTRY_PREFIX: &str = "US-";
const COUNTRY_NAME: &str = "United States";

/// Short code to full subdivision name, exhaustive over all 50 states.
/// Both lookup directions fall back to the country sentinel on a miss, so a
/// gap here degrades silently rather than failing.
const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Region identifier in its canonical textual form: either the country
/// sentinel `US` or a prefixed subdivision code like `US-CA`. Construction
/// normalizes bare short codes, so downstream consumers never see mixed
/// representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn country() -> Self {
        Self(COUNTRY_CODE.to_string())
    }

    pub fn new(code: &str) -> Self {
        if code == COUNTRY_CODE || code.starts_with(COUNTRY_PREFIX) {
            Self(code.to_string())
        } else {
            Self(format!("{COUNTRY_PREFIX}{code}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_country(&self) -> bool {
        self.0 == COUNTRY_CODE
    }

    /// The short code without the country prefix (`US-CA` -> `CA`).
    pub fn bare(&self) -> &str {
        self.0.strip_prefix(COUNTRY_PREFIX).unwrap_or(&self.0)
    }

    /// Full subdivision name, or the country name when the code is the
    /// sentinel or not in the table.
    pub fn display_name(&self) -> &'static str {
        STATES
            .iter()
            .find(|(code, _)| *code == self.bare())
            .map(|(_, name)| *name)
            .unwrap_or(COUNTRY_NAME)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive lookup of a subdivision name against the static table.
pub fn code_for_state_name(name: &str) -> Option<RegionCode> {
    STATES
        .iter()
        .find(|(_, state)| state.eq_ignore_ascii_case(name))
        .map(|(code, _)| RegionCode::new(code))
}
