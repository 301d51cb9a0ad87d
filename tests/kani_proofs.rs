#![cfg(kani)]
//! Kani proof harnesses for the clausal evaluation model.
//!
//! The model mirrors `evaluate` over integer fields without `String`,
//! `Value` trees, or path resolution:
//! - A field is either present with an `i64` value or missing.
//! - A test compares one field against a threshold with one of 6 operators.
//!   A missing field fails every test.
//! - A group is the AND of up to `MAX_TESTS` tests.
//! - A condition is a single test, an ANY of groups, or an ALL of groups.
//! - A rule is the AND of its conditions; fires are rule-major, then record.
//!
//! Run with: `cargo kani --tests --harness <harness_name>`

const MAX_TESTS: usize = 3;
const MAX_GROUPS: usize = 3;
const MAX_RECORDS: usize = 3;
const MAX_RULES: usize = 3;

/// Compare with one of 6 operators (encoded as 0..5). Missing never matches.
fn compare_op(lhs: Option<i64>, op: u8, rhs: i64) -> bool {
    let Some(lhs) = lhs else {
        return false;
    };
    match op {
        0 => lhs == rhs,
        1 => lhs != rhs,
        2 => lhs > rhs,
        3 => lhs >= rhs,
        4 => lhs < rhs,
        _ => lhs <= rhs,
    }
}

#[derive(Clone, Copy)]
struct Test {
    field: usize,
    op: u8,
    threshold: i64,
}

#[derive(Clone, Copy)]
struct Group {
    len: usize,
    tests: [Test; MAX_TESTS],
}

/// 0 = single test (uses `groups[0].tests[0]`), 1 = ANY, 2 = ALL.
#[derive(Clone, Copy)]
struct Condition {
    kind: u8,
    len: usize,
    groups: [Group; MAX_GROUPS],
}

fn any_test(n_fields: usize) -> Test {
    let test = Test {
        field: kani::any(),
        op: kani::any(),
        threshold: kani::any(),
    };
    kani::assume(test.field < n_fields);
    kani::assume(test.op < 6);
    test
}

fn any_group(n_fields: usize) -> Group {
    let len: usize = kani::any();
    kani::assume(len <= MAX_TESTS);
    Group {
        len,
        tests: [any_test(n_fields), any_test(n_fields), any_test(n_fields)],
    }
}

fn any_condition(n_fields: usize) -> Condition {
    let kind: u8 = kani::any();
    kani::assume(kind < 3);
    let len: usize = kani::any();
    kani::assume(len <= MAX_GROUPS);
    Condition {
        kind,
        len,
        groups: [any_group(n_fields), any_group(n_fields), any_group(n_fields)],
    }
}

fn eval_test(fields: &[Option<i64>], test: &Test) -> bool {
    compare_op(fields[test.field], test.op, test.threshold)
}

fn eval_group(fields: &[Option<i64>], group: &Group) -> bool {
    let mut i = 0;
    while i < group.len {
        if !eval_test(fields, &group.tests[i]) {
            return false;
        }
        i += 1;
    }
    true
}

fn eval_condition(fields: &[Option<i64>], condition: &Condition) -> bool {
    match condition.kind {
        0 => eval_test(fields, &condition.groups[0].tests[0]),
        1 => {
            let mut i = 0;
            while i < condition.len {
                if eval_group(fields, &condition.groups[i]) {
                    return true;
                }
                i += 1;
            }
            false
        }
        _ => {
            let mut i = 0;
            while i < condition.len {
                if !eval_group(fields, &condition.groups[i]) {
                    return false;
                }
                i += 1;
            }
            true
        }
    }
}

/// A rule with up to two conditions, ANDed.
fn eval_rule(fields: &[Option<i64>], conditions: &[Condition; 2], n: usize) -> bool {
    let mut i = 0;
    while i < n {
        if !eval_condition(fields, &conditions[i]) {
            return false;
        }
        i += 1;
    }
    true
}

// ---------------------------------------------------------------------------
// Proof 1: `!=` is the negation of `==` on present fields, and every
// operator is false on a missing field.
// ---------------------------------------------------------------------------

#[kani::proof]
fn neq_negates_eq() {
    let lhs: i64 = kani::any();
    let rhs: i64 = kani::any();
    assert_eq!(compare_op(Some(lhs), 1, rhs), !compare_op(Some(lhs), 0, rhs));
}

#[kani::proof]
fn missing_field_fails_every_operator() {
    let op: u8 = kani::any();
    let rhs: i64 = kani::any();
    assert!(!compare_op(None, op, rhs));
}

#[kani::proof]
fn ordering_is_consistent() {
    let lhs: i64 = kani::any();
    let rhs: i64 = kani::any();
    let lt = compare_op(Some(lhs), 4, rhs);
    let gte = compare_op(Some(lhs), 3, rhs);
    let gt = compare_op(Some(lhs), 2, rhs);
    let lte = compare_op(Some(lhs), 5, rhs);
    assert!(lt != gte);
    assert!(gt != lte);
}

// ---------------------------------------------------------------------------
// Proof 2: Group semantics.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(5)]
fn empty_any_never_matches_empty_all_always_matches() {
    let fields: [Option<i64>; 2] = kani::any();
    let mut condition = any_condition(2);
    condition.len = 0;

    condition.kind = 1;
    assert!(!eval_condition(&fields, &condition));
    condition.kind = 2;
    assert!(eval_condition(&fields, &condition));
}

#[kani::proof]
#[kani::unwind(5)]
fn empty_group_matches() {
    let fields: [Option<i64>; 2] = kani::any();
    let mut group = any_group(2);
    group.len = 0;
    assert!(eval_group(&fields, &group));
}

#[kani::proof]
#[kani::unwind(5)]
fn single_group_any_equals_all() {
    let fields: [Option<i64>; 2] = kani::any();
    let mut condition = any_condition(2);
    condition.len = 1;

    condition.kind = 1;
    let any = eval_condition(&fields, &condition);
    condition.kind = 2;
    let all = eval_condition(&fields, &condition);
    assert_eq!(any, all);
}

#[kani::proof]
#[kani::unwind(5)]
fn rule_is_and_of_conditions() {
    let fields: [Option<i64>; 2] = kani::any();
    let conditions = [any_condition(2), any_condition(2)];

    let both = eval_rule(&fields, &conditions, 2);
    let first = eval_rule(&fields, &conditions, 1);
    let second = eval_condition(&fields, &conditions[1]);
    assert_eq!(both, first && second);
    // No conditions matches everything.
    assert!(eval_rule(&fields, &conditions, 0));
}

// ---------------------------------------------------------------------------
// Proof 3: Fire ordering.
//
// Emitting fires rule-major, then record order, yields strictly increasing
// (rule, record) keys, so there are no duplicates.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(5)]
fn fires_are_rule_major() {
    let n_rules: usize = kani::any();
    kani::assume(n_rules <= MAX_RULES);
    let n_records: usize = kani::any();
    kani::assume(n_records <= MAX_RECORDS);
    let matched: [[bool; MAX_RECORDS]; MAX_RULES] = kani::any();

    let mut last: Option<(usize, usize)> = None;
    let mut count = 0;
    let mut r = 0;
    while r < n_rules {
        let mut c = 0;
        while c < n_records {
            if matched[r][c] {
                if let Some(prev) = last {
                    assert!(prev < (r, c));
                }
                last = Some((r, c));
                count += 1;
            }
            c += 1;
        }
        r += 1;
    }
    assert!(count <= n_rules * n_records);
}
