#![no_main]

use libfuzzer_sys::fuzz_target;
use scenariogen::config::StrategyFlags;
use scenariogen::contract::ContractParser;
use scenariogen::generator::ScenarioGenerator;
use scenariogen::render::{KarateRenderer, render_feature};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Any contract that loads must also generate and render without panicking.
    if let Ok(contract) = ContractParser::parse_str(text) {
        let scenarios = ScenarioGenerator::new(&StrategyFlags::default()).generate_all(&contract);
        let _ = render_feature(&contract, &KarateRenderer.render_all(&scenarios));
    }
});
