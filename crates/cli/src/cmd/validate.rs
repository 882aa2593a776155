use anyhow::{Context, Result};
use std::path::PathBuf;

use promlint_core::validate_content;

use crate::output::{print_error, print_json, print_success, OutputMode};

#[derive(clap::Args)]
pub struct ValidateArgs {
    #[arg(help = "Path to a rule-group YAML file")]
    file: PathBuf,
}

pub fn execute(args: ValidateArgs, mode: OutputMode) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let report = validate_content(&content);

    match mode {
        OutputMode::Json => print_json(&report)?,
        OutputMode::Human => {
            if report.valid {
                print_success(&format!(
                    "{}: valid, {} expression(s) checked",
                    args.file.display(),
                    report.promql_checked
                ));
            } else {
                print_error(&format!(
                    "{}: {} defect(s), {} invalid expression(s)",
                    args.file.display(),
                    report.defects.len(),
                    report.promql_invalid
                ));
                for message in report.messages() {
                    println!("  - {message}");
                }
            }
        }
    }

    if report.valid {
        Ok(())
    } else {
        anyhow::bail!("document is invalid")
    }
}
