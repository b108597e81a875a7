//! Allocation strategies.
//!
//! Provides a greedy earliest-start allocator and a seeded random baseline,
//! both pure functions of a [`ProblemModel`].
//!
//! # Algorithm
//!
//! `GreedyAllocator` processes tasks by priority and gives each to the
//! capable resource that can start it earliest. It is not optimal, but it is
//! fast, deterministic, and feasible by construction.
//!
//! `RandomAllocator` uses the same feasibility rules with random ordering
//! and random resource choice.
//!
//! # Aliases
//!
//! The `genetic` and `ip` identifiers are accepted for compatibility with
//! existing comparison setups. They run the greedy allocator and relabel the
//! result; no evolutionary search or integer program is solved.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Gerkey & Matarić (2004), "A Formal Analysis and Taxonomy of Task
//!   Allocation in Multi-Robot Systems"

mod availability;
mod greedy;
mod random;

pub use greedy::{priority_order, GreedyAllocator};
pub use random::RandomAllocator;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::config::AllocationConfig;
use crate::error::{AllocError, Result};
use crate::models::{Allocation, ProblemModel};

/// A pure mapping from problem to allocation.
///
/// Implementations must not keep state between calls; anything mutable
/// lives inside `allocate`.
pub trait AllocationStrategy: Send + Sync + Debug {
    /// Strategy name (e.g., "Greedy").
    fn name(&self) -> &'static str;

    /// Produces an allocation covering every task of `problem`.
    fn allocate(&self, problem: &ProblemModel) -> Allocation;
}

/// Strategy selector.
///
/// Parse from an identifier with [`Strategy::parse`] or `str::parse`.
/// Unknown identifiers are an error, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Priority-driven earliest-start greedy.
    Greedy,
    /// Random baseline with the given seed.
    Random { seed: u64 },
    /// Alias of Greedy, relabelled.
    Genetic,
    /// Alias of Greedy, relabelled.
    IntegerProgramming,
}

impl Strategy {
    /// Seed used when `random` is given without one.
    pub const DEFAULT_SEED: u64 = 42;

    /// Parses a strategy identifier.
    ///
    /// Accepted (case-insensitive): `greedy`, `random`, `random:<seed>`,
    /// `genetic` / `ga`, `ip` / `integer_programming`.
    pub fn parse(identifier: &str) -> Result<Self> {
        let id = identifier.trim().to_ascii_lowercase();
        match id.as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "random" => Ok(Strategy::Random {
                seed: Self::DEFAULT_SEED,
            }),
            "genetic" | "ga" => Ok(Strategy::Genetic),
            "ip" | "integer_programming" | "integerprogramming" => {
                Ok(Strategy::IntegerProgramming)
            }
            other => match other.strip_prefix("random:").map(str::parse::<u64>) {
                Some(Ok(seed)) => Ok(Strategy::Random { seed }),
                _ => Err(AllocError::UnknownStrategy(identifier.to_string())),
            },
        }
    }

    /// Display label, also written to `Allocation::strategy`.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Greedy => "Greedy",
            Strategy::Random { .. } => "Random",
            Strategy::Genetic => "Genetic",
            Strategy::IntegerProgramming => "IntegerProgramming",
        }
    }

    /// Runs the strategy with default settings.
    pub fn allocate(&self, problem: &ProblemModel) -> Allocation {
        self.allocate_with(problem, AllocationConfig::default())
    }

    /// Runs the strategy with explicit settings.
    pub fn allocate_with(&self, problem: &ProblemModel, config: AllocationConfig) -> Allocation {
        match *self {
            Strategy::Greedy => GreedyAllocator::new().with_config(config).allocate(problem),
            Strategy::Random { seed } => RandomAllocator::new(seed)
                .with_config(config)
                .allocate(problem),
            Strategy::Genetic | Strategy::IntegerProgramming => {
                let mut allocation = GreedyAllocator::new().with_config(config).allocate(problem);
                allocation.strategy = self.label().to_string();
                allocation.notes = format!(
                    "{} is an alias of the greedy allocator; no search was performed",
                    self.label()
                );
                allocation
            }
        }
    }
}

impl FromStr for Strategy {
    type Err = AllocError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::parse(s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Random { seed } => write!(f, "random:{seed}"),
            Strategy::Greedy => f.write_str("greedy"),
            Strategy::Genetic => f.write_str("genetic"),
            Strategy::IntegerProgramming => f.write_str("ip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_a;

    #[test]
    fn test_parse_identifiers() {
        assert_eq!(Strategy::parse("Greedy").unwrap(), Strategy::Greedy);
        assert_eq!(
            Strategy::parse("random").unwrap(),
            Strategy::Random { seed: 42 }
        );
        assert_eq!(
            "random:7".parse::<Strategy>().unwrap(),
            Strategy::Random { seed: 7 }
        );
        assert_eq!(Strategy::parse("GA").unwrap(), Strategy::Genetic);
        assert_eq!(Strategy::parse("ip").unwrap(), Strategy::IntegerProgramming);
    }

    #[test]
    fn test_unknown_strategy_is_error() {
        for bad in ["annealing", "", "random:", "random:x", "greedy2"] {
            match Strategy::parse(bad) {
                Err(AllocError::UnknownStrategy(id)) => assert_eq!(id, bad),
                other => panic!("{bad:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for s in [
            Strategy::Greedy,
            Strategy::Random { seed: 9 },
            Strategy::Genetic,
            Strategy::IntegerProgramming,
        ] {
            assert_eq!(Strategy::parse(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn test_aliases_relabel_greedy() {
        let problem = scenario_a();
        let greedy = Strategy::Greedy.allocate(&problem);
        for alias in [Strategy::Genetic, Strategy::IntegerProgramming] {
            let allocation = alias.allocate(&problem);
            assert_eq!(allocation.assignments, greedy.assignments);
            assert_eq!(allocation.unassigned_task_ids, greedy.unassigned_task_ids);
            assert_eq!(allocation.strategy, alias.label());
            assert!(allocation.notes.contains("alias"));
        }
    }

    #[test]
    fn test_trait_objects() {
        let problem = scenario_a();
        let strategies: Vec<Box<dyn AllocationStrategy>> = vec![
            Box::new(GreedyAllocator::new()),
            Box::new(RandomAllocator::new(3)),
        ];
        for s in &strategies {
            let allocation = s.allocate(&problem);
            assert_eq!(allocation.strategy, s.name());
            assert!(allocation.is_partition_of(&problem));
        }
    }
}
