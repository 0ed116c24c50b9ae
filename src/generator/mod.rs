//! Scenario generation orchestrator.
//!
//! The generator is a **factory holder**: strategies are chosen once from
//! configuration and then run over every operation of a contract.
//!
//! ```text
//! Config:    StrategyFlags      →  Vec<Box<dyn ScenarioStrategy>>
//! Generate:  Contract           →  Vec<Scenario>   (operation order, then strategy order)
//! ```

use tracing::{debug, info};

use crate::config::StrategyFlags;
use crate::contract::{Contract, Operation};
use crate::scenario::Scenario;
use crate::strategy::{ScenarioStrategy, StrategyKind};

/// Runs the enabled strategies over operations.
#[derive(Debug)]
pub struct ScenarioGenerator {
    strategies: Vec<Box<dyn ScenarioStrategy>>,
}

impl ScenarioGenerator {
    /// Registers the strategies enabled in `flags`, in the fixed order
    /// happy path, validation, error, edge case.
    #[must_use]
    pub fn new(flags: &StrategyFlags) -> Self {
        let strategies = StrategyKind::ALL
            .into_iter()
            .filter(|kind| flags.is_enabled(*kind))
            .map(StrategyKind::create)
            .collect();
        Self::with_strategies(strategies)
    }

    /// Uses exactly the given strategies, in the given order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ScenarioStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the registered strategies, in run order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Scenarios for one operation.
    #[must_use]
    pub fn generate(&self, op: &Operation) -> Vec<Scenario> {
        let mut scenarios = Vec::new();
        for strategy in &self.strategies {
            let produced = strategy.generate(op);
            debug!(
                strategy = strategy.name(),
                operation = %op.id(),
                count = produced.len(),
                "strategy finished"
            );
            scenarios.extend(produced);
        }
        scenarios
    }

    /// Scenarios for every operation of `contract`, in declaration order.
    #[must_use]
    pub fn generate_all(&self, contract: &Contract) -> Vec<Scenario> {
        let scenarios: Vec<_> = contract
            .operations()
            .flat_map(|op| self.generate(op))
            .collect();
        info!(
            operations = contract.len(),
            strategies = self.strategies.len(),
            scenarios = scenarios.len(),
            "scenario generation complete"
        );
        scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractInfo, HttpMethod, Response, Schema};
    use crate::scenario::Tag;

    fn contract() -> Contract {
        Contract::new(
            ContractInfo::default(),
            None,
            vec![
                Operation::new(HttpMethod::Post, "/users")
                    .with_operation_id("createUser")
                    .with_request_body(
                        Schema::object()
                            .with_property("email", Schema::string())
                            .with_required("email"),
                    )
                    .with_response(Response::new(201))
                    .with_response(Response::new(400)),
                Operation::new(HttpMethod::Get, "/users").with_operation_id("listUsers"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn registers_enabled_strategies_in_fixed_order() {
        let all = ScenarioGenerator::new(&StrategyFlags::default());
        assert_eq!(
            all.strategy_names(),
            ["happy_path", "validation", "error", "edge_case"]
        );

        let flags = StrategyFlags {
            happy_path: false,
            error_cases: false,
            ..StrategyFlags::default()
        };
        assert_eq!(
            ScenarioGenerator::new(&flags).strategy_names(),
            ["validation", "edge_case"]
        );
    }

    #[test]
    fn output_is_grouped_by_operation_then_strategy() {
        let scenarios = ScenarioGenerator::new(&StrategyFlags::default()).generate_all(&contract());
        let ops: Vec<_> = scenarios.iter().map(|s| s.operation_id.as_str()).collect();
        assert_eq!(
            ops,
            [
                "createUser",
                "createUser",
                "createUser",
                "createUser",
                "createUser",
                "listUsers"
            ]
        );
        assert!(scenarios[0].has_tag(Tag::HappyPath));
        assert!(scenarios[1].has_tag(Tag::Validation));
        assert!(scenarios[3].has_tag(Tag::Error));
        assert!(scenarios[4].has_tag(Tag::EdgeCase));
    }

    #[test]
    fn no_strategies_yield_nothing() {
        let generator = ScenarioGenerator::with_strategies(Vec::new());
        assert!(generator.generate_all(&contract()).is_empty());
    }

    #[test]
    fn generation_is_repeatable() {
        let generator = ScenarioGenerator::new(&StrategyFlags::default());
        assert_eq!(
            generator.generate_all(&contract()),
            generator.generate_all(&contract())
        );
    }
}
