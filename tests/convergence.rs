//! Integration tests for the write/merge protocol across several clients.
//!
//! Walks through the canonical cart scenarios end to end: siblings are
//! kept until a writer's baseline covers them, and every client that
//! writes after the last concurrent write ends up with the same view.

use std::collections::BTreeSet;

use leaderless_register::prelude::*;
use leaderless_register::Simulation;

fn set<'a>(items: &[&'a str]) -> BTreeSet<&'a str> {
    items.iter().copied().collect()
}

#[test]
fn three_step_cart_scenario() {
    let mut store = VersionStore::new();
    let mut a = ReplicaClient::new("a");
    let mut b = ReplicaClient::new("b");

    // A's first write: nothing to prune.
    let outcome = a.write(&mut store, "milk");
    assert_eq!(outcome.baseline, 1);
    assert_eq!(a.view(), &set(&["milk"]));

    // B has never written, so A's entry survives next to B's.
    let request = b.build_request("eggs");
    assert_eq!(request.baseline, None);
    let response = store.apply(request);
    assert_eq!(response.version, 2);
    assert_eq!(response.payloads, vec![vec!["milk"], vec!["eggs"]]);
    b.merge(&response);
    assert_eq!(b.view(), &set(&["eggs", "milk"]));

    // A saw version 1, so that entry goes; B's sibling at 2 stays.
    let request = a.build_request("flour");
    assert_eq!(request.baseline, Some(1));
    let response = store.apply(request);
    assert_eq!(response.version, 3);
    assert_eq!(response.payloads, vec![vec!["eggs"], vec!["flour", "milk"]]);
    a.merge(&response);
    assert_eq!(a.view(), &set(&["eggs", "flour", "milk"]));

    // B has not written again and still holds its older view.
    assert_eq!(b.view(), &set(&["eggs", "milk"]));
}

#[test]
fn duplicate_item_count_is_lost() {
    let mut store = VersionStore::new();
    let mut a = ReplicaClient::new("a");
    a.write(&mut store, "milk");

    let request = a.build_request("milk");
    assert_eq!(request.payload, vec!["milk", "milk"]);

    let response = store.apply(request);
    assert_eq!(store.entries().last().unwrap().payload(), &["milk", "milk"]);
    assert_eq!(response.payloads, vec![vec!["milk", "milk"]]);

    a.merge(&response);
    assert_eq!(a.view(), &set(&["milk"]));
}

#[test]
fn own_write_is_always_visible() {
    let mut store = VersionStore::new();
    let mut clients: Vec<ReplicaClient<u32>> =
        (0..4).map(|i| ReplicaClient::new(format!("c{i}"))).collect();

    for round in 0..20u32 {
        let client = &mut clients[(round as usize * 7) % 4];
        let request = client.build_request(round);
        let response = store.apply(request.clone());

        let mut own = request.payload.clone();
        own.sort();
        assert!(
            response.payloads.contains(&own),
            "round {round}: own payload missing from response"
        );
        client.merge(&response);
    }
}

#[test]
fn siblings_accumulate_until_superseded() {
    let mut store = VersionStore::new();
    let mut writers: Vec<ReplicaClient<&str>> =
        ["a", "b", "c"].into_iter().map(ReplicaClient::new).collect();

    for (w, item) in writers.iter_mut().zip(["x", "y", "z"]) {
        w.write(&mut store, item);
    }
    assert_eq!(store.sibling_count(), 3);

    // c saw everything up to 3; only its own new write remains.
    let outcome = writers[2].write(&mut store, "w");
    assert_eq!(outcome.siblings, 1);
    assert_eq!(outcome.view, vec!["w", "x", "y", "z"]);
}

#[test]
fn behind_client_still_sees_entries_others_pruned() {
    let mut store = VersionStore::new();
    let mut a = ReplicaClient::new("a");
    let mut b = ReplicaClient::new("b");

    a.write(&mut store, "milk"); // v1
    b.write(&mut store, "eggs"); // v2, b.baseline = 2
    a.write(&mut store, "ham"); // v3, prunes v1; a.baseline = 3

    // b's baseline 2 prunes v2 only; a's v3 survives as a sibling.
    let outcome = b.write(&mut store, "coffee");
    assert_eq!(outcome.baseline, 4);
    assert_eq!(outcome.siblings, 2);
    assert_eq!(outcome.view, vec!["coffee", "eggs", "ham", "milk"]);
}

#[test]
fn quiet_round_converges_all_clients() {
    let names = ["client_1", "client_2", "client_3"];
    let mut sim = Simulation::new(names);
    sim.run([
        ("client_2", "bacon"),
        ("client_1", "milk"),
        ("client_3", "coffee"),
        ("client_2", "eggs"),
        ("client_1", "flour"),
    ])
    .unwrap();

    // Each client writes once more with an item it already holds.
    let quiet: Vec<_> = names
        .iter()
        .map(|n| {
            let item = *sim.client(n).unwrap().iter().next().unwrap();
            (*n, item)
        })
        .collect();
    sim.run(quiet).unwrap();

    assert!(sim.is_converged());
    let expected = set(&["bacon", "coffee", "eggs", "flour", "milk"]);
    for client in sim.clients() {
        assert_eq!(client.view(), &expected, "{} diverged", client.name());
    }
    assert_eq!(sim.union_of_entries(), expected);
}

#[test]
fn shared_store_serialises_threaded_writers() {
    let shared = SharedStore::new();

    std::thread::scope(|s| {
        for i in 0..4u32 {
            let mut handle = shared.clone();
            s.spawn(move || {
                let mut client = ReplicaClient::new(format!("t{i}"));
                for j in 0..25 {
                    client.write(&mut handle, i * 100 + j);
                }
                client
            });
        }
    });

    shared.with(|store| {
        assert_eq!(store.current_version(), 100);
        let versions: Vec<_> = store.entries().iter().map(|e| e.version()).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(versions, sorted);
    });
}
