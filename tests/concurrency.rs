//! Multi-threaded behaviour of the set engine
//!
//! Every thread runs its own dispatcher forked from a common one, so they all
//! share one key-space.

use ferrumset::{Dispatcher, RespValue};
use std::collections::HashSet;
use std::thread;

fn integer(reply: RespValue) -> i64 {
    reply.as_integer().unwrap_or_else(|| panic!("Expected integer, got {:?}", reply))
}

#[test]
fn test_concurrent_smove_conserves_members() {
    let mut root = Dispatcher::new();
    let members: Vec<String> = (0..200).map(|i| format!("m{}", i)).collect();

    let mut sadd = vec!["SADD".to_string(), "left".to_string()];
    sadd.extend(members.iter().cloned());
    assert_eq!(integer(root.dispatch_words(sadd)), 200);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let mut dispatcher = root.fork();
            let members = members.clone();
            thread::spawn(move || {
                let (from, to) = if t % 2 == 0 { ("left", "right") } else { ("right", "left") };
                for _ in 0..5 {
                    for member in &members {
                        dispatcher.dispatch_words(["SMOVE", from, to, member.as_str()]);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let left = integer(root.dispatch_words(["SCARD", "left"]));
    let right = integer(root.dispatch_words(["SCARD", "right"]));
    assert_eq!(left + right, 200);

    let both = root.dispatch_words(["SINTER", "left", "right"]);
    assert_eq!(both, RespValue::array(vec![]));
}

#[test]
fn test_concurrent_sadd() {
    let root = Dispatcher::new();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let mut dispatcher = root.fork();
            thread::spawn(move || {
                let mut added = 0;
                for i in 0..250 {
                    // Threads overlap on half of their members
                    let member = format!("m{}", (t / 2) * 250 + i);
                    added += integer(dispatcher.dispatch_words(["SADD", "shared", member.as_str()]));
                }
                added
            })
        })
        .collect();

    let added: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(added, 1000);

    let mut root = root;
    assert_eq!(integer(root.dispatch_words(["SCARD", "shared"])), 1000);
}

#[test]
fn test_scan_during_mutation_returns_stable_members() {
    let mut root = Dispatcher::new();

    let stable: Vec<String> = (0..300).map(|i| format!("stable{}", i)).collect();
    let mut sadd = vec!["SADD".to_string(), "s".to_string()];
    sadd.extend(stable.iter().cloned());
    root.dispatch_words(sadd);

    // Grow and shrink the table while a scan is in progress
    let mut writer = root.fork();
    let churn = thread::spawn(move || {
        for round in 0..5 {
            for i in 0..400 {
                let member = format!("churn{}-{}", round, i);
                writer.dispatch_words(["SADD", "s", member.as_str()]);
            }
            for i in 0..400 {
                let member = format!("churn{}-{}", round, i);
                writer.dispatch_words(["SREM", "s", member.as_str()]);
            }
        }
    });

    let mut seen = HashSet::new();
    let mut cursor = "0".to_string();
    loop {
        let reply = root.dispatch_words(["SSCAN", "s", cursor.as_str(), "COUNT", "7"]);
        let RespValue::Array(parts) = reply else {
            panic!("Expected array reply");
        };
        cursor = String::from_utf8(parts[0].as_bulk_string().unwrap().to_vec()).unwrap();
        for member in parts[1].as_array().unwrap() {
            seen.insert(member.as_bulk_string().unwrap().clone());
        }
        if cursor == "0" {
            break;
        }
    }

    churn.join().unwrap();

    for member in &stable {
        assert!(seen.contains(member.as_bytes()), "{} missed by scan", member);
    }
}

#[test]
fn test_sunionstore_while_sources_change() {
    let mut root = Dispatcher::new();
    root.dispatch_words(["SADD", "a", "1", "2"]);
    root.dispatch_words(["SADD", "b", "3"]);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let mut dispatcher = root.fork();
            thread::spawn(move || {
                for i in 0..100 {
                    if t == 0 {
                        let member = format!("x{}", i);
                        dispatcher.dispatch_words(["SADD", "b", member.as_str()]);
                    } else {
                        let stored = integer(dispatcher.dispatch_words(["SUNIONSTORE", "dest", "a", "b"]));
                        assert!(stored >= 3);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    root.dispatch_words(["SUNIONSTORE", "dest", "a", "b"]);
    assert_eq!(integer(root.dispatch_words(["SCARD", "dest"])), 103);
}
