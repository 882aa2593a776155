use std::collections::HashSet;

use serde::Serialize;

use crate::defect::{Defect, DefectKind, DefectPath};
use crate::rules;

/// The single externally observable artifact of a validation run. Built
/// fresh per call, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub defects: Vec<Defect>,
    pub promql_checked: usize,
    pub promql_invalid: usize,
}

impl ValidationReport {
    /// Defect messages in report order; the first one is the headline error.
    pub fn messages(&self) -> Vec<String> {
        self.defects.iter().map(|d| d.message.clone()).collect()
    }
}

/// Fold accumulated defects into a report. `exprs_evaluated` is the number
/// of expressions the validator actually handed to the lexical checker; an
/// expression carrying several lexical defects still counts as one failure.
pub fn build(defects: Vec<Defect>, exprs_evaluated: usize) -> ValidationReport {
    let mut failed: HashSet<&DefectPath> = HashSet::new();
    for defect in &defects {
        if defect.kind == DefectKind::Lexical && defect.path.is_expr() {
            failed.insert(&defect.path);
        }
    }
    let promql_invalid = failed.len();
    ValidationReport {
        valid: defects.is_empty(),
        promql_checked: exprs_evaluated.saturating_sub(promql_invalid),
        promql_invalid,
        defects,
    }
}

/// Full engine pass over raw YAML text: safe-parse, structural walk,
/// lexical checks, report. A document that does not even parse yields a
/// report with a single top-level structural defect, never an error.
pub fn validate_content(content: &str) -> ValidationReport {
    match serde_yaml::from_str::<serde_yaml::Value>(content) {
        Ok(doc) => {
            let validation = rules::validate(&doc);
            build(validation.defects, validation.exprs_evaluated)
        }
        Err(e) => build(
            vec![Defect::structural(
                DefectPath::document(),
                format!("Invalid YAML: {e}"),
            )],
            0,
        ),
    }
}
