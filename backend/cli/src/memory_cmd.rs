//! CLI Memory Subcommands
//!
//! Run the query pipeline or store documents from the terminal, without Slack.

use anyhow::{Result, bail};
use recall_config::RecallConfig;

use crate::components;

/// Answer `query` once, as a first mention in a fresh thread would be.
pub async fn ask(config: &RecallConfig, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("query must not be empty");
    }
    let pipeline = components::query_pipeline(config)?;
    let answer = pipeline.run(query, None).await?;

    println!("{}", answer.text);
    if let Some(id) = answer.document_id {
        eprintln!("(context document: {id})");
    }
    Ok(())
}

/// Store each text as its own document and print the generated ids.
pub async fn remember(config: &RecallConfig, texts: &[String]) -> Result<()> {
    let texts: Vec<String> = texts
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        bail!("nothing to remember");
    }
    let store = components::document_store(config)?;
    for id in store.store_documents(&texts).await? {
        println!("{id}");
    }
    Ok(())
}
