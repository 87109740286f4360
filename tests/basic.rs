use ymlcheck::schema::*;
use ymlcheck::{validate, Diagnostic, Severity};

fn error(row: usize, column: usize, message: &str) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        message: message.to_string(),
        row,
        column,
    }
}

#[test]
fn empty_file_has_no_errors() {
    let schema = Schema::default();
    assert!(validate(&schema, "").is_empty());
    assert!(validate(&schema, " ").is_empty());
    assert!(validate(&schema, "     ").is_empty());
    assert!(validate(&schema, "\n\n\n").is_empty());
}

#[test]
fn one_key_value_pair() {
    let schema = Schema::new(Block::new().with("foo", Property::new(string_one_of(&["bar"]))));
    assert!(validate(&schema, "\nfoo: bar\n").is_empty());
}

#[test]
fn nonexistent_key() {
    let schema = Schema::new(Block::new().with("bar", Property::new(string_one_of(&["bar"]))));
    assert_eq!(
        validate(&schema, "\nfoo: bar\n"),
        vec![error(
            1,
            1,
            r#"Format Error: Property "foo" not allowed here. Allowed options: "bar""#
        )]
    );
}

#[test]
fn embedded_simple() {
    let schema = Schema::new(Block::new().with(
        "foo",
        Property::new(block(
            Block::new().with("bar", Property::new(string_one_of(&["var"]))),
        )),
    ));
    assert!(validate(&schema, "\nfoo:\n  bar: var\n").is_empty());
}

#[test]
fn embedded_simple_value_mismatch() {
    let schema = Schema::new(Block::new().with(
        "foo",
        Property::new(block(
            Block::new().with("bar", Property::new(number_one_of(&[123]))),
        )),
    ));
    assert_eq!(
        validate(&schema, "\nfoo:\n  bar: 543\n"),
        vec![error(
            2,
            3,
            "Format Error: Only following values are allowed: 123"
        )]
    );
}

#[test]
fn string_one_of_value_mismatch() {
    let schema = Schema::new(Block::new().with("foo", Property::new(string_one_of(&["bar"]))));
    assert_eq!(
        validate(&schema, "\nfoo: var\n"),
        vec![error(
            1,
            1,
            "Format Error: Only following values are allowed: bar"
        )]
    );
}

#[test]
fn empty_block_warning() {
    let schema = Schema::new(Block::new().with("foo", Property::new(block(Block::new()))));
    assert_eq!(
        validate(&schema, "foo:\n"),
        vec![Diagnostic {
            severity: Severity::Warning,
            message: "Empty block".into(),
            row: 0,
            column: 1,
        }]
    );
    // End of input right after the colon is also an empty block.
    assert_eq!(validate(&schema, "foo:").len(), 1);
}

#[test]
fn comments_are_ignored() {
    let schema = Schema::new(
        Block::new()
            .with("a", Property::new(string()))
            .with(
                "b",
                Property::new(block(Block::new().with("c", Property::new(number())))),
            ),
    );
    let text = "# leading comment\na: x # trailing\nb:\n  # inside the block\n  c: 3\n";
    assert!(validate(&schema, text).is_empty());
}

#[test]
fn quoted_strings() {
    let schema = Schema::new(
        Block::new()
            .with("title", Property::new(string()))
            .with("mode", Property::new(string_one_of(&["a b"]))),
    );
    assert!(validate(&schema, "title: \"Hello, world: 1 - 2\"\nmode: \"a b\"\n").is_empty());
    // Quoted keys work too.
    assert!(validate(&schema, "\"title\": x\n").is_empty());
}
