use std::time::Instant;

use crate::{
    CompareOp, Condition, ConditionGroup, EvaluationReport, FieldTest, Fire, Record, Rule, Value,
};

pub(crate) fn evaluate(rules: &[Rule], records: &[Record], document_id: &str) -> Vec<Fire> {
    collect_fires(rules, records, document_id, |_, _| {})
}

pub(crate) fn evaluate_detailed(
    rules: &[Rule],
    records: &[Record],
    document_id: &str,
) -> EvaluationReport {
    let start = Instant::now();
    let mut rule_hits = Vec::with_capacity(rules.len());
    let fires = collect_fires(rules, records, document_id, |rule, hits| {
        rule_hits.push((rule.id.clone(), hits));
    });
    EvaluationReport::new(fires, rule_hits, records.len(), start.elapsed())
}

/// Rule-major, then record order. `on_rule` sees each rule with its hit
/// count once that rule has run over every record.
fn collect_fires(
    rules: &[Rule],
    records: &[Record],
    document_id: &str,
    mut on_rule: impl FnMut(&Rule, usize),
) -> Vec<Fire> {
    let contexts: Vec<Value> = records.iter().map(Record::context).collect();
    let mut fires = Vec::new();

    for rule in rules {
        let before = fires.len();
        for (record, ctx) in records.iter().zip(&contexts) {
            if matches(&rule.when, ctx) {
                fires.push(fire(rule, record, document_id));
            }
        }
        on_rule(rule, fires.len() - before);
    }

    tracing::debug!(
        document_id,
        rules = rules.len(),
        records = records.len(),
        fires = fires.len(),
        "evaluated rule set"
    );
    fires
}

/// AND of every condition; an empty list matches.
pub(crate) fn matches(when: &[Condition], ctx: &Value) -> bool {
    when.iter().all(|condition| eval_condition(condition, ctx))
}

fn fire(rule: &Rule, record: &Record, document_id: &str) -> Fire {
    Fire::new(
        rule.id.as_str(),
        document_id,
        record.id.as_str(),
        rule.then.severity.as_str(),
        rule.then.message.as_str(),
    )
}

fn eval_condition(condition: &Condition, ctx: &Value) -> bool {
    match condition {
        Condition::Test(test) => eval_test(test, ctx),
        Condition::AnyOf(groups) => groups.iter().any(|g| eval_group(g, ctx)),
        Condition::AllOf(groups) => groups.iter().all(|g| eval_group(g, ctx)),
    }
}

fn eval_group(group: &ConditionGroup, ctx: &Value) -> bool {
    group.tests().iter().all(|test| eval_test(test, ctx))
}

fn eval_test(test: &FieldTest, ctx: &Value) -> bool {
    match test {
        FieldTest::Equality { path, literal } => match crate::resolve(ctx, path) {
            Some(lhs) => lhs.compare(CompareOp::Eq, literal),
            None => literal.is_null(),
        },
        // An explicit null is treated like a missing field.
        FieldTest::Comparison { path, op, literal } => crate::resolve(ctx, path)
            .filter(|lhs| !lhs.is_null())
            .is_some_and(|lhs| {
                let (lhs, rhs) = crate::coerce_pair(lhs, literal);
                lhs.compare(*op, &rhs)
            }),
    }
}
