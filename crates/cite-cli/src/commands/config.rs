use cite_config::CiteConfig;

use crate::bootstrap;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `dcite config`.
pub fn handle(format: OutputFormat) -> anyhow::Result<()> {
    let config = bootstrap::load_config()?.redacted();
    println!("{}", render(&config, format)?);
    Ok(())
}

fn render(config: &CiteConfig, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => output::render_json(config),
        OutputFormat::Text => Ok(toml::to_string_pretty(config)?),
    }
}
