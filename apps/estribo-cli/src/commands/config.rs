//! # Config Commands
//!
//! Show or replace the sale configuration (margin and output tax).

use std::io::Write;

use estribo_core::SaleConfiguration;
use tracing::info;

use super::{write_json, Context};
use crate::cli::ConfigCommand;
use crate::error::{CliError, CliResult};

pub async fn run(ctx: Context<'_>, action: ConfigCommand, out: &mut dyn Write) -> CliResult<()> {
    let repo = ctx.db.config();

    let config = match action {
        ConfigCommand::Show => repo.get().await?,

        ConfigCommand::Set { margin, tax } => {
            if margin.is_none() && tax.is_none() {
                return Err(CliError::validation("Nothing to change: pass --margin and/or --tax"));
            }

            let current = repo.get().await?;
            let updated = SaleConfiguration::new(
                margin.unwrap_or(current.margin_pct),
                tax.unwrap_or(current.tax_pct),
            );
            repo.replace(&updated).await?;
            info!(
                margin_pct = updated.margin_pct,
                tax_pct = updated.tax_pct,
                "Sale configuration replaced"
            );
            updated
        }
    };

    if ctx.json {
        return write_json(out, &config);
    }
    writeln!(out, "Margin: {:.2}%", config.margin_pct)?;
    writeln!(out, "Tax:    {:.2}%", config.tax_pct)?;
    Ok(())
}
