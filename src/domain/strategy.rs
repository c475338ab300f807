use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Pattern,
    Model,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Pattern => "pattern",
            StrategyKind::Model => "model",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pattern" => Ok(StrategyKind::Pattern),
            "model" => Ok(StrategyKind::Model),
            _ => Err(format!("Unknown extraction strategy: {}", s)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the routed strategies run for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    Single(StrategyKind),
    FallbackChain(Vec<StrategyKind>),
    RaceAndMerge(Vec<StrategyKind>),
}

impl ExecutionPlan {
    pub fn strategies(&self) -> &[StrategyKind] {
        match self {
            ExecutionPlan::Single(kind) => std::slice::from_ref(kind),
            ExecutionPlan::FallbackChain(kinds) => kinds,
            ExecutionPlan::RaceAndMerge(kinds) => kinds,
        }
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPlan::Single(kind) => write!(f, "single({})", kind),
            ExecutionPlan::FallbackChain(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                write!(f, "fallback({})", names.join("->"))
            }
            ExecutionPlan::RaceAndMerge(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                write!(f, "race({})", names.join("+"))
            }
        }
    }
}
