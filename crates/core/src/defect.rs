use serde::Serialize;

/// A single validation finding. Defects are only ever created and collected,
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defect {
    pub kind: DefectKind,
    pub path: DefectPath,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefectKind {
    Structural,
    Lexical,
}

/// Logical location of a defect inside the document: group index, rule index
/// and field name, each optional so the path can point at any level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DefectPath {
    pub group: Option<usize>,
    pub rule: Option<usize>,
    pub field: Option<&'static str>,
}

impl Defect {
    pub fn structural(path: DefectPath, message: impl Into<String>) -> Self {
        Self {
            kind: DefectKind::Structural,
            path,
            message: message.into(),
        }
    }

    pub fn lexical(path: DefectPath, message: impl Into<String>) -> Self {
        Self {
            kind: DefectKind::Lexical,
            path,
            message: message.into(),
        }
    }
}

impl DefectPath {
    pub fn document() -> Self {
        Self {
            group: None,
            rule: None,
            field: None,
        }
    }

    pub fn group(group: usize) -> Self {
        Self {
            group: Some(group),
            rule: None,
            field: None,
        }
    }

    pub fn group_field(group: usize, field: &'static str) -> Self {
        Self {
            group: Some(group),
            rule: None,
            field: Some(field),
        }
    }

    pub fn rule(group: usize, rule: usize) -> Self {
        Self {
            group: Some(group),
            rule: Some(rule),
            field: None,
        }
    }

    pub fn rule_field(group: usize, rule: usize, field: &'static str) -> Self {
        Self {
            group: Some(group),
            rule: Some(rule),
            field: Some(field),
        }
    }

    /// True when the path points at an `expr` field, which is what the
    /// report builder counts as a failed expression.
    pub fn is_expr(&self) -> bool {
        self.field == Some("expr") && self.rule.is_some()
    }
}

impl std::fmt::Display for DefectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.group, self.rule, self.field) {
            (None, _, None) => write!(f, "(document)"),
            (None, _, Some(field)) => write!(f, "{field}"),
            (Some(g), None, None) => write!(f, "groups[{g}]"),
            (Some(g), None, Some(field)) => write!(f, "groups[{g}].{field}"),
            (Some(g), Some(r), None) => write!(f, "groups[{g}].rules[{r}]"),
            (Some(g), Some(r), Some(field)) => {
                write!(f, "groups[{g}].rules[{r}].{field}")
            }
        }
    }
}
