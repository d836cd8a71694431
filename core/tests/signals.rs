//! Signal aggregation: per-account counters, volume and round trips.

use ringwatch_core::{
    config::GeneratorParams,
    dataset::{AccountIndex, Dataset},
    error::DeskError,
    generator::GraphGenerator,
    rng::SeededRng,
    signals::{aggregate, aggregate_into},
    types::{Account, Position, Transaction},
};

fn account(id: &str) -> Account {
    Account::new(id, Position { x: 0.0, y: 0.0 })
}

fn tx(from: &str, to: &str, amount: f64, hour: u8) -> Transaction {
    Transaction { from: from.into(), to: to.into(), amount, hour }
}

fn generated(seed: u64, accounts: usize, transactions: usize) -> Dataset {
    GraphGenerator::new(GeneratorParams::new(accounts, transactions))
        .unwrap()
        .generate(&mut SeededRng::new(seed))
        .dataset
}

#[test]
fn reciprocal_pair_scenario() {
    let mut dataset = Dataset::new(
        vec![account("A"), account("B")],
        vec![tx("A", "B", 5000.0, 2), tx("B", "A", 5000.0, 2)],
    )
    .unwrap();

    let stats = aggregate(&mut dataset).unwrap();
    assert_eq!(stats.transactions, 2);
    assert_eq!(stats.distinct_edges, 2);
    assert_eq!(stats.reciprocal_edges, 2);

    for a in &dataset.accounts {
        assert_eq!(a.signals.incoming, 1, "{}", a.id);
        assert_eq!(a.signals.outgoing, 1, "{}", a.id);
        assert_eq!(a.signals.volume, 10000.0, "{}", a.id);
        assert_eq!(a.signals.late_night_tx, 2, "{}", a.id);
        assert_eq!(a.signals.round_trip_tx, 2, "{}", a.id);
    }
}

#[test]
fn every_transaction_between_a_reciprocal_pair_counts() {
    let mut dataset = Dataset::new(
        vec![account("A"), account("B"), account("C")],
        vec![
            tx("A", "B", 100.0, 10),
            tx("A", "B", 100.0, 11),
            tx("B", "A", 100.0, 12),
            tx("A", "C", 100.0, 13),
        ],
    )
    .unwrap();
    let stats = aggregate(&mut dataset).unwrap();

    // A->B appears twice but collapses to one edge.
    assert_eq!(stats.distinct_edges, 3);
    assert_eq!(stats.reciprocal_edges, 2);

    let a = dataset.account("A").unwrap().signals;
    let b = dataset.account("B").unwrap().signals;
    let c = dataset.account("C").unwrap().signals;
    assert_eq!(a.round_trip_tx, 3);
    assert_eq!(b.round_trip_tx, 3);
    assert_eq!(c.round_trip_tx, 0);
    assert_eq!((a.outgoing, a.incoming), (3, 1));
    assert_eq!(c.incoming, 1);
}

#[test]
fn late_night_window_ends_at_hour_four() {
    let mut dataset = Dataset::new(
        vec![account("A"), account("B")],
        vec![tx("A", "B", 1.0, 0), tx("A", "B", 1.0, 4), tx("A", "B", 1.0, 5), tx("A", "B", 1.0, 23)],
    )
    .unwrap();
    aggregate(&mut dataset).unwrap();

    assert_eq!(dataset.account("A").unwrap().signals.late_night_tx, 2);
    assert_eq!(dataset.account("B").unwrap().signals.late_night_tx, 2);
}

#[test]
fn flow_counts_match_transaction_count() {
    for seed in 0..10u64 {
        let mut dataset = generated(seed, 90, 1200);
        aggregate(&mut dataset).unwrap();

        let incoming: u32 = dataset.accounts.iter().map(|a| a.signals.incoming).sum();
        let outgoing: u32 = dataset.accounts.iter().map(|a| a.signals.outgoing).sum();
        assert_eq!(incoming as usize, 1200);
        assert_eq!(outgoing as usize, 1200);
    }
}

#[test]
fn volume_is_sum_of_touching_amounts() {
    let mut dataset = generated(77, 40, 600);
    aggregate(&mut dataset).unwrap();

    for a in &dataset.accounts {
        let expected: f64 = dataset
            .transactions
            .iter()
            .filter(|t| t.from == a.id || t.to == a.id)
            .map(|t| t.amount)
            .sum();
        assert!(
            (a.signals.volume - expected).abs() < 1e-6,
            "{}: volume {} != {}",
            a.id,
            a.signals.volume,
            expected
        );
    }
}

#[test]
fn reaggregation_resets_instead_of_accumulating() {
    let mut dataset = generated(5, 30, 400);
    aggregate(&mut dataset).unwrap();
    let first: Vec<_> = dataset.accounts.iter().map(|a| a.signals).collect();

    aggregate(&mut dataset).unwrap();
    let second: Vec<_> = dataset.accounts.iter().map(|a| a.signals).collect();

    assert_eq!(first, second);
}

#[test]
fn unknown_account_fails_fast_with_zeroed_signals() {
    let mut accounts = vec![account("A"), account("B")];
    accounts[0].signals.incoming = 9;
    let index = AccountIndex::build(&accounts).unwrap();
    let transactions = vec![tx("A", "B", 10.0, 3), tx("A", "ZZZ", 10.0, 3)];

    let err = aggregate_into(&mut accounts, &transactions, &index).unwrap_err();
    assert!(matches!(err, DeskError::UnknownAccount { ref id } if id == "ZZZ"));
    assert!(err.is_precondition());
    for a in &accounts {
        assert_eq!(a.signals, Default::default(), "{} was half-counted", a.id);
    }
}

#[test]
fn dataset_rejects_malformed_input() {
    let two = || vec![account("A"), account("B")];

    assert!(matches!(
        Dataset::new(vec![account("A"), account("A")], vec![]),
        Err(DeskError::DuplicateAccount { .. })
    ));
    assert!(matches!(
        Dataset::new(two(), vec![tx("A", "Q", 1.0, 1)]),
        Err(DeskError::UnknownAccount { .. })
    ));
    assert!(matches!(
        Dataset::new(two(), vec![tx("A", "A", 1.0, 1)]),
        Err(DeskError::InvalidTransaction { index: 0, .. })
    ));
    assert!(matches!(
        Dataset::new(two(), vec![tx("A", "B", 1.0, 1), tx("A", "B", 0.0, 1)]),
        Err(DeskError::InvalidTransaction { index: 1, .. })
    ));
    assert!(matches!(
        Dataset::new(two(), vec![tx("A", "B", 1.0, 24)]),
        Err(DeskError::InvalidTransaction { index: 0, .. })
    ));
}
