use std::collections::HashSet;

use serde_yaml::Value;

use crate::defect::{Defect, DefectPath};
use crate::promql;

/// Outcome of walking one parsed rule document: every defect found, in
/// traversal order, plus how many expressions were actually handed to the
/// lexical checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub defects: Vec<Defect>,
    pub exprs_evaluated: usize,
}

/// Walk the expected `groups[].rules[]` shape and collect every defect in a
/// single pass. Traversal never stops at a bad group or rule; only a
/// document whose root is unusable cuts the walk short.
pub fn validate(doc: &Value) -> Validation {
    let mut defects = Vec::new();
    let mut exprs_evaluated = 0;

    if !doc.is_mapping() {
        defects.push(Defect::structural(
            DefectPath::document(),
            "document root must be a mapping",
        ));
        return Validation {
            defects,
            exprs_evaluated,
        };
    }

    let Some(groups) = doc.get("groups") else {
        defects.push(Defect::structural(
            DefectPath::document(),
            "missing 'groups' key",
        ));
        return Validation {
            defects,
            exprs_evaluated,
        };
    };
    let Some(groups) = groups.as_sequence() else {
        defects.push(Defect::structural(
            DefectPath {
                group: None,
                rule: None,
                field: Some("groups"),
            },
            "'groups' must be a sequence",
        ));
        return Validation {
            defects,
            exprs_evaluated,
        };
    };

    if groups.is_empty() {
        defects.push(Defect::structural(
            DefectPath {
                group: None,
                rule: None,
                field: Some("groups"),
            },
            "'groups' must contain at least one group",
        ));
    }

    let mut seen_names: HashSet<String> = HashSet::new();

    for (i, group) in groups.iter().enumerate() {
        if !group.is_mapping() {
            structural(&mut defects, DefectPath::group(i), "must be a mapping");
            continue;
        }

        match group.get("name") {
            None => structural(
                &mut defects,
                DefectPath::group_field(i, "name"),
                "missing 'name'",
            ),
            Some(name) => match name.as_str() {
                Some(name) if !name.is_empty() => {
                    if !seen_names.insert(name.to_string()) {
                        structural(
                            &mut defects,
                            DefectPath::group_field(i, "name"),
                            format!("duplicate group name '{name}'"),
                        );
                    }
                }
                _ => structural(
                    &mut defects,
                    DefectPath::group_field(i, "name"),
                    "'name' must be a non-empty string",
                ),
            },
        }

        let Some(rules) = group.get("rules") else {
            structural(
                &mut defects,
                DefectPath::group_field(i, "rules"),
                "missing 'rules'",
            );
            continue;
        };
        let Some(rules) = rules.as_sequence() else {
            structural(
                &mut defects,
                DefectPath::group_field(i, "rules"),
                "'rules' must be a sequence",
            );
            continue;
        };

        for (j, rule) in rules.iter().enumerate() {
            exprs_evaluated += check_rule(&mut defects, i, j, rule);
        }
    }

    Validation {
        defects,
        exprs_evaluated,
    }
}

/// Validate one rule entry; returns 1 when its expression was lexically
/// evaluated, 0 otherwise.
fn check_rule(defects: &mut Vec<Defect>, i: usize, j: usize, rule: &Value) -> usize {
    if !rule.is_mapping() {
        structural(defects, DefectPath::rule(i, j), "must be a mapping");
        return 0;
    }

    let alert_ok = check_required_string(defects, i, j, rule, "alert");
    let expr_ok = check_required_string(defects, i, j, rule, "expr");

    if let Some(for_value) = rule.get("for") {
        let path = DefectPath::rule_field(i, j, "for");
        match for_value.as_str() {
            None => structural(defects, path, "'for' must be a duration string"),
            Some(s) if !duration_ok(s) => structural(
                defects,
                path,
                format!("invalid 'for' duration '{s}' (expected digits followed by s, m, h or d)"),
            ),
            Some(_) => {}
        }
    }

    check_string_mapping(defects, i, j, rule, "labels", "label");
    check_string_mapping(defects, i, j, rule, "annotations", "annotation");

    // The checker only sees expressions whose rule is structurally sound;
    // a broken rule keeps its structural defect and is skipped here.
    if alert_ok && expr_ok {
        let expr = rule.get("expr").and_then(Value::as_str).unwrap_or_default();
        let path = DefectPath::rule_field(i, j, "expr");
        for found in promql::check(expr) {
            defects.push(Defect::lexical(
                path.clone(),
                format!("{path}: {}", found.message),
            ));
        }
        return 1;
    }
    0
}

fn check_required_string(
    defects: &mut Vec<Defect>,
    i: usize,
    j: usize,
    rule: &Value,
    field: &'static str,
) -> bool {
    let path = DefectPath::rule_field(i, j, field);
    match rule.get(field) {
        None => {
            structural(defects, path, format!("missing '{field}'"));
            false
        }
        Some(value) => match value.as_str() {
            Some(s) if !s.is_empty() => true,
            _ => {
                structural(
                    defects,
                    path,
                    format!("'{field}' must be a non-empty string"),
                );
                false
            }
        },
    }
}

fn check_string_mapping(
    defects: &mut Vec<Defect>,
    i: usize,
    j: usize,
    rule: &Value,
    field: &'static str,
    entry_word: &str,
) {
    let Some(value) = rule.get(field) else {
        return;
    };
    let path = DefectPath::rule_field(i, j, field);
    let Some(mapping) = value.as_mapping() else {
        structural(defects, path, format!("'{field}' must be a mapping"));
        return;
    };
    for (key, entry) in mapping {
        match key.as_str() {
            None => structural(
                defects,
                path.clone(),
                format!("{entry_word} keys must be strings"),
            ),
            Some(key) => {
                if entry.as_str().is_none() {
                    structural(
                        defects,
                        path.clone(),
                        format!("{entry_word} '{key}' must be a string"),
                    );
                }
            }
        }
    }
}

fn structural(defects: &mut Vec<Defect>, path: DefectPath, message: impl std::fmt::Display) {
    let message = format!("{path}: {message}");
    defects.push(Defect::structural(path, message));
}

fn duration_ok(s: &str) -> bool {
    let Some(unit) = s.chars().last() else {
        return false;
    };
    if !matches!(unit, 's' | 'm' | 'h' | 'd') {
        return false;
    }
    let digits = &s[..s.len() - unit.len_utf8()];
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defect::DefectKind;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn run(yaml: &str) -> Validation {
        validate(&parse(yaml))
    }

    #[test]
    fn minimal_valid_document() {
        let v = run("groups:\n  - name: g1\n    rules:\n      - alert: A\n        expr: up == 0\n");
        assert!(v.defects.is_empty());
        assert_eq!(v.exprs_evaluated, 1);
    }

    #[test]
    fn full_rule_passes() {
        let v = run(concat!(
            "groups:\n",
            "  - name: node\n",
            "    rules:\n",
            "      - alert: InstanceDown\n",
            "        expr: up == 0\n",
            "        for: 5m\n",
            "        labels:\n",
            "          severity: critical\n",
            "        annotations:\n",
            "          summary: instance is down\n",
        ));
        assert!(v.defects.is_empty(), "{:?}", v.defects);
    }

    #[test]
    fn missing_groups_is_single_top_level_defect() {
        let v = run("foo: bar\n");
        assert_eq!(v.defects.len(), 1);
        assert_eq!(v.defects[0].kind, DefectKind::Structural);
        assert_eq!(v.defects[0].message, "missing 'groups' key");
        assert_eq!(v.exprs_evaluated, 0);
    }

    #[test]
    fn non_mapping_root_is_single_defect() {
        let v = run("- a\n- b\n");
        assert_eq!(v.defects.len(), 1);
        assert_eq!(v.defects[0].message, "document root must be a mapping");
    }

    #[test]
    fn groups_must_be_sequence() {
        let v = run("groups: 42\n");
        assert_eq!(v.defects.len(), 1);
        assert!(v.defects[0].message.contains("'groups' must be a sequence"));
    }

    #[test]
    fn empty_groups_rejected() {
        let v = run("groups: []\n");
        assert_eq!(v.defects.len(), 1);
        assert!(v.defects[0].message.contains("at least one group"));
    }

    #[test]
    fn group_must_be_mapping() {
        let v = run("groups:\n  - 17\n");
        assert_eq!(v.defects.len(), 1);
        assert_eq!(v.defects[0].message, "groups[0]: must be a mapping");
    }

    #[test]
    fn missing_name_and_rules_both_reported() {
        let v = run("groups:\n  - rules: []\n  - name: g2\n");
        let msgs: Vec<_> = v.defects.iter().map(|d| d.message.as_str()).collect();
        assert!(msgs.contains(&"groups[0].name: missing 'name'"));
        assert!(msgs.contains(&"groups[1].rules: missing 'rules'"));
    }

    #[test]
    fn duplicate_group_names_flagged_once_rules_still_checked() {
        let v = run(concat!(
            "groups:\n",
            "  - name: g1\n",
            "    rules:\n",
            "      - alert: A\n",
            "  - name: g1\n",
            "    rules:\n",
            "      - expr: up\n",
        ));
        let dups: Vec<_> = v
            .defects
            .iter()
            .filter(|d| d.message.contains("duplicate group name"))
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].path, DefectPath::group_field(1, "name"));
        // Both groups' rules were still visited.
        let msgs: Vec<_> = v.defects.iter().map(|d| d.message.as_str()).collect();
        assert!(msgs.contains(&"groups[0].rules[0].expr: missing 'expr'"));
        assert!(msgs.contains(&"groups[1].rules[0].alert: missing 'alert'"));
    }

    #[test]
    fn empty_expr_is_structural_not_lexical() {
        let v = run("groups:\n  - name: g\n    rules:\n      - alert: A\n        expr: \"\"\n");
        assert_eq!(v.defects.len(), 1);
        assert_eq!(v.defects[0].kind, DefectKind::Structural);
        assert_eq!(v.exprs_evaluated, 0);
    }

    #[test]
    fn broken_alert_skips_lexical_evaluation() {
        // expr is lexically fine, but the rule is structurally invalid so
        // it must not count as evaluated.
        let v = run("groups:\n  - name: g\n    rules:\n      - expr: up == 0\n");
        assert_eq!(v.exprs_evaluated, 0);
        assert!(v.defects.iter().all(|d| d.kind == DefectKind::Structural));
    }

    #[test]
    fn lexical_defects_rescoped_to_expr() {
        let v = run("groups:\n  - name: g\n    rules:\n      - alert: A\n        expr: rate(x[5m]\n");
        assert_eq!(v.exprs_evaluated, 1);
        let lex: Vec<_> = v
            .defects
            .iter()
            .filter(|d| d.kind == DefectKind::Lexical)
            .collect();
        assert_eq!(lex.len(), 1);
        assert_eq!(lex[0].path, DefectPath::rule_field(0, 0, "expr"));
        assert!(lex[0].message.starts_with("groups[0].rules[0].expr:"));
        assert!(lex[0].message.contains("()"));
    }

    #[test]
    fn structural_defects_precede_lexical_for_same_rule() {
        let v = run(concat!(
            "groups:\n",
            "  - name: g\n",
            "    rules:\n",
            "      - alert: A\n",
            "        expr: rate(x[5m]\n",
            "        for: soon\n",
        ));
        let kinds: Vec<_> = v.defects.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DefectKind::Structural, DefectKind::Lexical]);
    }

    #[test]
    fn duration_grammar() {
        assert!(duration_ok("5m"));
        assert!(duration_ok("30s"));
        assert!(duration_ok("2h"));
        assert!(duration_ok("7d"));
        assert!(!duration_ok("5"));
        assert!(!duration_ok("m"));
        assert!(!duration_ok("5x"));
        assert!(!duration_ok("1h30m"));
        assert!(!duration_ok(""));
        assert!(!duration_ok("-5m"));
    }

    #[test]
    fn malformed_for_does_not_block_other_checks() {
        let v = run(concat!(
            "groups:\n",
            "  - name: g\n",
            "    rules:\n",
            "      - alert: A\n",
            "        expr: up == 0\n",
            "        for: 90\n",
            "        labels:\n",
            "          severity: 2\n",
        ));
        let msgs: Vec<_> = v.defects.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].contains("'for' must be a duration string"));
        assert!(msgs[1].contains("label 'severity' must be a string"));
        // The expression itself was still evaluated.
        assert_eq!(v.exprs_evaluated, 1);
    }

    #[test]
    fn annotations_must_be_mapping() {
        let v = run(concat!(
            "groups:\n",
            "  - name: g\n",
            "    rules:\n",
            "      - alert: A\n",
            "        expr: up\n",
            "        annotations: [a, b]\n",
        ));
        assert_eq!(v.defects.len(), 1);
        assert!(v.defects[0]
            .message
            .contains("'annotations' must be a mapping"));
    }

    #[test]
    fn validation_is_idempotent() {
        let yaml = concat!(
            "groups:\n",
            "  - name: g1\n",
            "    rules:\n",
            "      - alert: A\n",
            "        expr: rate(x[5m]\n",
            "  - name: g1\n",
            "    rules: {}\n",
        );
        let first = run(yaml);
        let second = run(yaml);
        assert_eq!(first, second);
    }
}
