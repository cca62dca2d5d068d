//! Instrument universe: named asset groups of symbols.
//!
//! Configured as
//!
//! ```ini
//! [universe]
//! groups = crypto,tech
//! crypto = BTC-USD,ETH-USD
//! tech = AAPL,MSFT
//! ```
//!
//! Without a `[universe]` section the built-in groups are used.

use std::collections::HashSet;

use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;

const BUILTIN_GROUPS: &[(&str, &str)] = &[
    ("crypto", "BTC-USD,ETH-USD,SOL-USD,XRP-USD,ADA-USD,DOGE-USD"),
    (
        "tech",
        "AAPL,MSFT,NVDA,GOOGL,AMZN,META,TSLA,AVGO,TSM,BABA",
    ),
    ("energy", "XOM,CVX,BP,TOT,COP,SHEL"),
    (
        "fx",
        "EURUSD=X,JPY=X,GBPUSD=X,AUDUSD=X,CAD=X,EURJPY=X,GBPJPY=X,EURGBP=X",
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AssetGroup {
    pub name: String,
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub groups: Vec<AssetGroup>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    #[error("group {0} has no codes")]
    EmptyGroup(String),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("no groups configured")]
    NoGroups,
}

/// Split a comma-separated code list. Symbols keep their case.
pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let code = token.trim();
        if code.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(code.to_string()) {
            return Err(UniverseError::DuplicateCode(code.to_string()));
        }
        codes.push(code.to_string());
    }

    Ok(codes)
}

impl Universe {
    /// Build from `(group name, code list)` pairs, rejecting codes that
    /// appear in more than one group.
    pub fn from_lists<'a, I>(lists: I) -> Result<Self, UniverseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut seen = HashSet::new();
        let mut groups = Vec::new();

        for (name, list) in lists {
            if list.trim().is_empty() {
                return Err(UniverseError::EmptyGroup(name.to_string()));
            }
            let codes = parse_codes(list)?;
            if let Some(dup) = codes.iter().find(|c| !seen.insert(c.to_string())) {
                return Err(UniverseError::DuplicateCode(dup.clone()));
            }
            groups.push(AssetGroup {
                name: name.to_string(),
                codes,
            });
        }

        if groups.is_empty() {
            return Err(UniverseError::NoGroups);
        }
        Ok(Universe { groups })
    }

    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .map(|(name, list)| AssetGroup {
                name: name.to_string(),
                codes: list.split(',').map(str::to_string).collect(),
            })
            .collect();
        Universe { groups }
    }

    /// A one-instrument universe for ad-hoc runs.
    pub fn single(code: &str) -> Self {
        Universe {
            groups: vec![AssetGroup {
                name: "adhoc".to_string(),
                codes: vec![code.trim().to_string()],
            }],
        }
    }

    pub fn only_group(self, name: &str) -> Result<Self, UniverseError> {
        let group = self
            .groups
            .into_iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| UniverseError::UnknownGroup(name.to_string()))?;
        Ok(Universe {
            groups: vec![group],
        })
    }

    pub fn count(&self) -> usize {
        self.groups.iter().map(|g| g.codes.len()).sum()
    }

    /// `(group, code)` pairs in configuration order.
    pub fn instruments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups
            .iter()
            .flat_map(|g| g.codes.iter().map(move |c| (g.name.as_str(), c.as_str())))
    }
}

/// Read `[universe]` from config, falling back to the built-in groups.
pub fn load_universe(config: &dyn ConfigPort) -> Result<Universe, SignalError> {
    let Some(names) = config.get_string("universe", "groups") else {
        return Ok(Universe::builtin());
    };

    let mut lists = Vec::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let list = config
            .get_string("universe", name)
            .ok_or_else(|| SignalError::ConfigMissing {
                section: "universe".into(),
                key: name.to_string(),
            })?;
        lists.push((name.to_string(), list));
    }

    Ok(Universe::from_lists(
        lists.iter().map(|(n, l)| (n.as_str(), l.as_str())),
    )?)
}
