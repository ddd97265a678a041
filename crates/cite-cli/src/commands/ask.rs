use anyhow::Context;
use cite_research::{ResearchLoop, ResearchRequest};

use crate::bootstrap;
use crate::cli::{AskArgs, OutputFormat};
use crate::output;

/// Handle `dcite ask`.
pub async fn handle(args: &AskArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    let collaborators = bootstrap::build_collaborators(&config).await?;
    let research = ResearchLoop::new(collaborators, config.research.clone())
        .context("invalid research configuration")?;

    let answer = research
        .answer(&request_from_args(args))
        .await
        .context("research session failed")?;
    println!("{}", output::render_answer(&answer, format)?);
    Ok(())
}

/// `--safe-mode` forces reduced fetch; without it the configured flag applies.
fn request_from_args(args: &AskArgs) -> ResearchRequest {
    ResearchRequest {
        question: args.question.clone(),
        max_iterations: args.max_iters,
        results_per_query: args.topk,
        model: args.model.clone(),
        reduced_fetch: args.safe_mode.then_some(true),
    }
}
