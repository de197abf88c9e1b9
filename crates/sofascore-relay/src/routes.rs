//! Sport selectors and the static route table.

use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

/// A recognized `sport` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sport {
    Nba,
    Mlb,
    Kbo,
    Npb,
    Soccer,
}

impl Sport {
    pub const ALL: [Sport; 5] = [Sport::Nba, Sport::Mlb, Sport::Kbo, Sport::Npb, Sport::Soccer];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
            Sport::Kbo => "kbo",
            Sport::Npb => "npb",
            Sport::Soccer => "soccer",
        }
    }

    /// Upstream path for this sport, relative to the base URL.
    pub fn upstream_path(self) -> &'static str {
        match self {
            Sport::Nba => "/basketball/nba",
            Sport::Mlb => "/baseball/usa/mlb",
            Sport::Kbo => "/baseball/south-korea/kbo",
            Sport::Npb => "/baseball/japan/pro-yakyu-npb",
            Sport::Soccer => "/football",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Sport {
    type Err = RelayError;

    /// Exact, case-sensitive match on the wire token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == s)
            .ok_or(RelayError::InvalidSelector)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable sport -> absolute URL mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    urls: [String; 5],
}

impl RouteTable {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            urls: Sport::ALL.map(|sport| format!("{base}{}", sport.upstream_path())),
        }
    }

    pub fn url_for(&self, sport: Sport) -> &str {
        &self.urls[sport.index()]
    }

    /// Parse a raw selector and resolve it in one step.
    pub fn resolve(&self, selector: Option<&str>) -> Result<(Sport, &str), RelayError> {
        let sport: Sport = selector.ok_or(RelayError::InvalidSelector)?.parse()?;
        Ok((sport, self.url_for(sport)))
    }
}
