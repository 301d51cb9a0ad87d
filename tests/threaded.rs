use std::sync::Arc;
use std::thread;

use clausal::{Fire, FireStore, MemoryFireStore, Record, RuleSetBuilder, any_of, field, group};

fn exposure_rules() -> clausal::RuleSet {
    RuleSetBuilder::new()
        .rule("exposure", |r| {
            r.when(any_of([
                group([field("clause.type").eq("indemnity")]),
                group([field("clause.normalized.amount").gte("100000")]),
            ]))
            .severity("high")
        })
        .rule("low_cap", |r| {
            r.when(field("clause.normalized.cap_ratio_to_annual_fees").lte("0.5"))
                .severity("medium")
        })
        .build()
}

#[test]
fn evaluate_across_threads() {
    let ruleset = Arc::new(exposure_rules());

    let inputs = vec![
        // indemnity clause -> exposure
        vec![Record::new("c1", "D1", "indemnity")],
        // large payment with a low cap -> exposure, low_cap
        vec![
            Record::new("c1", "D2", "payment")
                .set("amount", 250_000_i64)
                .set("cap_ratio_to_annual_fees", 0.25),
        ],
        // small payment -> nothing
        vec![Record::new("c1", "D3", "payment").set("amount", 500_i64)],
        // empty document -> nothing
        vec![],
    ];

    let handles: Vec<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(i, records)| {
            let rs = Arc::clone(&ruleset);
            thread::spawn(move || rs.evaluate(&records, &format!("D{}", i + 1)))
        })
        .collect();

    let results: Vec<Vec<Fire>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], vec![Fire::new("exposure", "D1", "c1", "high", "")]);
    assert_eq!(
        results[1],
        vec![
            Fire::new("exposure", "D2", "c1", "high", ""),
            Fire::new("low_cap", "D2", "c1", "medium", ""),
        ]
    );
    assert!(results[2].is_empty());
    assert!(results[3].is_empty());
}

#[test]
fn concurrent_evaluation_matches_sequential() {
    let ruleset = Arc::new(exposure_rules());
    let records: Arc<Vec<Record>> = Arc::new(
        (0..50_i64)
            .map(|i| {
                Record::new(&format!("c{i}"), "D1", if i % 7 == 0 { "indemnity" } else { "payment" })
                    .set("amount", i * 5_000)
                    .set("cap_ratio_to_annual_fees", (i % 10) as f64 / 10.0)
            })
            .collect(),
    );
    let expected = ruleset.evaluate(&records, "D1");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let rs = Arc::clone(&ruleset);
            let records = Arc::clone(&records);
            thread::spawn(move || rs.evaluate(&records, "D1"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn shared_store_across_threads() {
    let ruleset = Arc::new(exposure_rules());
    let store = MemoryFireStore::new();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let rs = Arc::clone(&ruleset);
            let store = store.clone();
            thread::spawn(move || {
                let doc = format!("D{i}");
                let category = if i % 2 == 0 { "indemnity" } else { "sla" };
                let records = [Record::new("c1", &doc, category)];
                // Re-running must leave exactly one run's worth of fires.
                rs.run(&doc, &records, &store).unwrap();
                rs.run(&doc, &records, &store).unwrap()
            })
        })
        .collect();

    let summaries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(store.len(), 6);

    for (i, summary) in summaries.iter().enumerate() {
        let doc = format!("D{i}");
        let expected = usize::from(i % 2 == 0);
        assert!(summary.policy_results);
        assert_eq!(summary.count, expected);
        assert_eq!(store.fires_for(&doc).unwrap().len(), expected);
    }
}

#[test]
fn ruleset_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<clausal::RuleSet>();
    assert_send_sync::<MemoryFireStore>();
    assert_send_sync::<Fire>();
}
