pub mod defect;
pub mod promql;
pub mod report;
pub mod rules;

pub use defect::{Defect, DefectKind, DefectPath};
pub use report::{validate_content, ValidationReport};
pub use rules::{validate, Validation};
