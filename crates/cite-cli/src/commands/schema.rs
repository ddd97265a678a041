use cite_core::ResearchAnswer;

use crate::output;

/// Handle `dcite schema`.
pub fn handle() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(ResearchAnswer);
    println!("{}", output::render_json(&schema)?);
    Ok(())
}
