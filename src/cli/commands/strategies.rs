//! List strategies command.

use anyhow::Result;
use trading_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        if info.aliases.is_empty() {
            println!("  {} ({})", info.id, info.name);
        } else {
            println!("  {} ({}), aliases: {}", info.id, info.name, info.aliases.join(", "));
        }
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", serde_json::to_string(&info.default_config)?);
        println!();
    }

    println!("Use --strategy <id> and --param key=value to select and tune a strategy.");

    Ok(())
}
