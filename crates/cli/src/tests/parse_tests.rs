#[cfg(test)]
mod tests {
    use crate::Opts;
    use clap::Parser;

    fn parse(args: &[&str]) -> Opts {
        let mut full = vec!["promlint"];
        full.extend_from_slice(args);
        Opts::parse_from(full)
    }

    #[test]
    fn parse_validate() {
        let opts = parse(&["validate", "rules.yml"]);
        assert!(matches!(opts.cmd, crate::cmd::Commands::Validate(_)));
    }

    #[test]
    fn parse_check_expr() {
        let opts = parse(&["check-expr", "up == 0"]);
        assert!(matches!(opts.cmd, crate::cmd::Commands::CheckExpr(_)));
    }

    #[test]
    fn parse_query() {
        let opts = parse(&["query", "--url", "http://localhost:9090", "up"]);
        assert!(matches!(opts.cmd, crate::cmd::Commands::Query(_)));
    }

    #[test]
    fn parse_query_with_timeout() {
        let opts = parse(&[
            "query",
            "--url",
            "http://localhost:9090",
            "--timeout-secs",
            "3",
            "up",
        ]);
        assert!(matches!(opts.cmd, crate::cmd::Commands::Query(_)));
    }

    #[test]
    fn parse_json_flag() {
        let opts = parse(&["--json", "check-expr", "up"]);
        assert!(opts.json);
        assert_eq!(opts.output_mode(), crate::output::OutputMode::Json);
    }

    #[test]
    fn parse_human_default() {
        let opts = parse(&["check-expr", "up"]);
        assert!(!opts.json);
        assert_eq!(opts.output_mode(), crate::output::OutputMode::Human);
    }
}
