use anyhow::bail;
use clap::Args;
use console::style;
use produksi::model::DetailId;
use produksi::{
    CompletionMode, CompletionWorkflow, HttpProductionApi, SubmitError, ValidationResult,
};
use tracing::debug;

use super::{messages, prompt, show};

#[derive(Args)]
pub struct SubmitArgs {
    /// Production run id
    pub id: u64,

    /// Output weight for one employee row, by detail id (repeatable)
    #[arg(long = "weight", value_name = "ID=KG", value_parser = parse_weight_arg)]
    pub weights: Vec<(u64, String)>,

    /// Finished pieces that went into stock
    #[arg(long, value_name = "N")]
    pub stock: Option<String>,

    /// Submit without prompting
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Parse `ID=KG`
pub fn parse_weight_arg(raw: &str) -> Result<(u64, String), String> {
    let (id, kg) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=KG, got '{}'", raw))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a detail id", id.trim()))?;
    Ok((id, kg.trim().to_string()))
}

pub async fn run(
    api: &HttpProductionApi,
    mode: CompletionMode,
    args: SubmitArgs,
) -> anyhow::Result<()> {
    let mut workflow = CompletionWorkflow::load(api, args.id).await?;
    let run = workflow.run();

    match (mode, workflow.draft().mode()) {
        (CompletionMode::Finalize, CompletionMode::Correct) => bail!(
            "run {} is already completed; use `produksi correct {}` to change it",
            run.code,
            args.id
        ),
        (CompletionMode::Correct, CompletionMode::Finalize) => bail!(
            "run {} is not completed yet; use `produksi complete {}`",
            run.code,
            args.id
        ),
        _ => {}
    }

    apply_flags(&mut workflow, &args)?;
    show::print_run(workflow.run());

    loop {
        if !args.yes {
            prompt::edit_draft(&mut workflow)?;
        }

        show::print_totals(workflow.run(), workflow.draft());
        let verdict = workflow.check();
        let valid = verdict.is_valid();
        show::print_verdict(verdict, workflow.draft());

        if !valid {
            if args.yes {
                bail!("the completion was not submitted");
            }
            continue;
        }

        let question = if mode.finalizes() {
            "Complete this production run?"
        } else {
            "Save the corrected output?"
        };
        if !args.yes && !prompt::confirm(question, true)? {
            workflow.cancel();
            println!("{}", style("Cancelled, nothing was sent.").dim());
            return Ok(());
        }

        match workflow.submit(api).await {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .unwrap_or_else(|| "Production output saved".to_string());
                println!("{} {}", style("✓").green(), message);
                return Ok(());
            }
            Err(SubmitError::Api(err)) => {
                eprintln!("{} Submission failed", style("Error:").red().bold());
                for line in messages::api_failure(&err) {
                    eprintln!("  {}", line);
                }
                if args.yes || !prompt::confirm("Edit and try again?", true)? {
                    return Err(anyhow::Error::new(err).context("the completion was not submitted"));
                }
            }
            Err(SubmitError::Invalid(violation)) => {
                show::print_verdict(ValidationResult::Invalid(violation), workflow.draft());
                if args.yes {
                    bail!("the completion was not submitted");
                }
            }
            Err(other) => return Err(other.into()),
        }
    }
}

/// Apply `--weight` and `--stock` to the fresh draft
fn apply_flags(workflow: &mut CompletionWorkflow, args: &SubmitArgs) -> anyhow::Result<()> {
    for (id, kg) in &args.weights {
        if !workflow.input_output_weight(DetailId(*id), kg)? {
            bail!(
                "run {} has no employee row with detail id {}",
                workflow.run().code,
                id
            );
        }
        debug!(detail = id, weight = %kg, "weight set from flag");
    }
    if let Some(stock) = &args.stock {
        workflow.input_manual_stock(stock)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_arg() {
        assert_eq!(parse_weight_arg("11=4.5"), Ok((11, "4.5".to_string())));
        assert_eq!(parse_weight_arg(" 7 = 0,25 "), Ok((7, "0,25".to_string())));
        assert!(parse_weight_arg("4.5").is_err());
        assert!(parse_weight_arg("x=4").is_err());
    }
}
