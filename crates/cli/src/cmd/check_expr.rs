use anyhow::Result;

use promlint_core::promql;

use crate::output::{print_error, print_json, print_success, OutputMode};

#[derive(clap::Args)]
pub struct CheckExprArgs {
    #[arg(help = "PromQL expression to lex-check")]
    expr: String,
}

pub fn execute(args: CheckExprArgs, mode: OutputMode) -> Result<()> {
    let errors: Vec<String> = promql::check(&args.expr)
        .into_iter()
        .map(|d| d.message)
        .collect();

    match mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
        }))?,
        OutputMode::Human => {
            if errors.is_empty() {
                print_success("expression is lexically valid");
            } else {
                print_error("expression has lexical defects");
                for message in &errors {
                    println!("  - {message}");
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("expression is invalid")
    }
}
