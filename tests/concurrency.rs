use std::sync::Arc;
use std::thread;
use ymlcheck::schema::*;
use ymlcheck::{make_validator, validate};

fn schema() -> Schema {
    Schema::new(
        Block::new()
            .with("id", Property::new(number()).required())
            .with(
                "tags",
                Property::new(block(
                    Block::new().with("env", Property::new(string_one_of(&["dev", "prod"]))),
                )),
            ),
    )
}

#[test]
fn repeated_runs_do_not_interfere() {
    let schema = schema();
    let text = "id: 1\ntags:\n  env: dev\n";
    // If "seen" state leaked between runs, the second run would report
    // duplicates.
    for _ in 0..3 {
        assert!(validate(&schema, text).is_empty());
    }
    assert_eq!(schema, self::schema());
}

#[test]
fn shared_schema_across_threads() {
    let schema = Arc::new(schema());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let env = if i % 2 == 0 { "dev" } else { "qa" };
                let text = format!("id: {}\ntags:\n  env: {}\n", i, env);
                (i, validate(&schema, &text))
            })
        })
        .collect();

    for handle in handles {
        let (i, diagnostics) = handle.join().unwrap();
        if i % 2 == 0 {
            assert!(diagnostics.is_empty());
        } else {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].row, 2);
        }
    }
}

#[test]
fn validator_closure_is_shareable() {
    let check = Arc::new(make_validator(&schema()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let check = Arc::clone(&check);
            thread::spawn(move || check("tags:\n  env: prod\n"))
        })
        .collect();
    for handle in handles {
        let diagnostics = handle.join().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Format Error: Option \"id\" is required");
    }
}
