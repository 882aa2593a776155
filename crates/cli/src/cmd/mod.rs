mod check_expr;
mod query;
mod validate;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    Validate(validate::ValidateArgs),
    CheckExpr(check_expr::CheckExprArgs),
    Query(query::QueryArgs),
}

pub async fn run(opts: crate::Opts) -> Result<()> {
    let mode = opts.output_mode();
    match opts.cmd {
        Commands::Validate(args) => validate::execute(args, mode),
        Commands::CheckExpr(args) => check_expr::execute(args, mode),
        Commands::Query(args) => query::execute(args, mode).await,
    }
}
