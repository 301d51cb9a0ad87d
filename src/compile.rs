use std::collections::BTreeMap;

use crate::{Condition, ConditionGroup, FieldTest, SpecError, Value};

const ANY: &str = "any";
const ALL: &str = "all";

/// Compile one `key: value` entry of a condition mapping.
///
/// A text value of the form `<op> <literal>` becomes a [`FieldTest::Comparison`];
/// every other value becomes a bare [`FieldTest::Equality`].
#[must_use]
pub fn compile_condition(key: &str, value: &Value) -> FieldTest {
    if let Value::Text(text) = value
        && let Some((op, literal)) = crate::parse::operator_literal(text)
    {
        return FieldTest::Comparison {
            path: key.to_owned(),
            op,
            literal: literal.to_owned(),
        };
    }
    FieldTest::Equality {
        path: key.to_owned(),
        literal: value.clone(),
    }
}

/// Compile a flat mapping of `path: literal` entries into an ANDed group.
///
/// Keys named `any`/`all` inside a group are ordinary paths; groups do not nest.
#[must_use]
pub fn compile_group(entries: &BTreeMap<String, Value>) -> ConditionGroup {
    ConditionGroup::new(
        entries
            .iter()
            .map(|(key, value)| compile_condition(key, value))
            .collect(),
    )
}

/// Compile a rule's `when` mapping.
///
/// `any` and `all` take lists of flat groups; every other key is its own test.
/// The result is ANDed at evaluation. A null or empty `when` compiles to no
/// conditions, which matches every record.
///
/// # Errors
///
/// Returns [`SpecError`] if `when` is not a mapping, or if `any`/`all` is not
/// a list of mappings.
pub fn compile_when(rule: &str, when: &Value) -> Result<Vec<Condition>, SpecError> {
    let entries = match when {
        Value::Null => return Ok(Vec::new()),
        Value::Map(entries) => entries,
        other => {
            return Err(SpecError::MalformedWhen {
                rule: rule.to_owned(),
                found: other.kind(),
            });
        }
    };

    let mut conditions = Vec::with_capacity(entries.len());
    if let Some(groups) = entries.get(ANY) {
        conditions.push(Condition::AnyOf(compile_groups(rule, ANY, groups)?));
    }
    if let Some(groups) = entries.get(ALL) {
        conditions.push(Condition::AllOf(compile_groups(rule, ALL, groups)?));
    }
    conditions.extend(
        entries
            .iter()
            .filter(|(key, _)| key.as_str() != ANY && key.as_str() != ALL)
            .map(|(key, value)| Condition::Test(compile_condition(key, value))),
    );
    Ok(conditions)
}

fn compile_groups(rule: &str, key: &str, value: &Value) -> Result<Vec<ConditionGroup>, SpecError> {
    let malformed = || SpecError::MalformedGroup {
        rule: rule.to_owned(),
        key: key.to_owned(),
    };
    let Value::List(items) = value else {
        return Err(malformed());
    };
    items
        .iter()
        .map(|item| item.as_map().map(compile_group).ok_or_else(malformed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompareOp;

    fn yaml(input: &str) -> Value {
        serde_yaml::from_str(input).unwrap()
    }

    #[test]
    fn operator_string_compiles_to_comparison() {
        let test = compile_condition("clause.normalized.amount", &Value::from(">= 100000"));
        assert_eq!(
            test,
            FieldTest::Comparison {
                path: "clause.normalized.amount".to_owned(),
                op: CompareOp::Gte,
                literal: "100000".to_owned(),
            }
        );
    }

    #[test]
    fn plain_values_compile_to_equality() {
        for value in [
            Value::from("indemnity"),
            Value::Int(3),
            Value::Bool(true),
            Value::Null,
            Value::from(">="),
        ] {
            let test = compile_condition("k", &value);
            assert_eq!(
                test,
                FieldTest::Equality {
                    path: "k".to_owned(),
                    literal: value.clone(),
                },
                "{value} should compile to equality"
            );
        }
    }

    #[test]
    fn empty_and_null_when_compile_to_nothing() {
        assert!(compile_when("r", &yaml("{}")).unwrap().is_empty());
        assert!(compile_when("r", &Value::Null).unwrap().is_empty());
    }

    #[test]
    fn any_all_then_flat_keys() {
        let when = yaml(
            r#"
clause.type: indemnity
all:
  - clause.page: "> 1"
any:
  - clause.normalized.amount: ">= 100000"
  - clause.normalized.uncapped: true
"#,
        );
        let conditions = compile_when("r", &when).unwrap();
        assert_eq!(conditions.len(), 3);
        match &conditions[0] {
            Condition::AnyOf(groups) => assert_eq!(groups.len(), 2),
            other => panic!("expected AnyOf first, got {other:?}"),
        }
        match &conditions[1] {
            Condition::AllOf(groups) => assert_eq!(groups.len(), 1),
            other => panic!("expected AllOf second, got {other:?}"),
        }
        assert!(matches!(
            &conditions[2],
            Condition::Test(FieldTest::Equality { path, .. }) if path == "clause.type"
        ));
    }

    #[test]
    fn groups_are_flat() {
        let when = yaml(
            r#"
any:
  - any: nested
    clause.type: sla
"#,
        );
        let conditions = compile_when("r", &when).unwrap();
        let Condition::AnyOf(groups) = &conditions[0] else {
            panic!("expected AnyOf");
        };
        let paths: Vec<&str> = groups[0].tests().iter().map(FieldTest::path).collect();
        assert_eq!(paths, vec!["any", "clause.type"]);
    }

    #[test]
    fn empty_group_lists_are_allowed() {
        let conditions = compile_when("r", &yaml("any: []\nall: []")).unwrap();
        assert_eq!(conditions, vec![Condition::AnyOf(vec![]), Condition::AllOf(vec![])]);
    }

    #[test]
    fn malformed_when() {
        let err = compile_when("r", &yaml("[a, b]")).unwrap_err();
        assert!(matches!(err, SpecError::MalformedWhen { found: "list", .. }));
    }

    #[test]
    fn malformed_groups() {
        for input in ["any: indemnity", "all: [1, 2]", "any:\n  - [nested]"] {
            let err = compile_when("r", &yaml(input)).unwrap_err();
            assert!(
                matches!(err, SpecError::MalformedGroup { .. }),
                "{input:?} should be rejected"
            );
        }
    }
}
