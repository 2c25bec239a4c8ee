//! Path grammar against realistic story paths

use geostory_common::value;
use geostory_parser::{effective_path, get, parse, resolve, Path, PathCache, PathSyntaxError, Segment};

/// Paths as they are written by the builder and stored in story settings
const STORED_PATHS: &[&str] = &[
    "sections",
    "sections[0]",
    "sections.0.contents.1",
    r#"sections[{"id":"abc"}].contents[{"id":"col1"}].contents[0]"#,
    r#"sections[{id: "abc"}].contents[0].background"#,
    "sections[{'id': 'abc'}].title",
    r#"settings["font-size"]"#,
    "resources[{\"id\": 12}]",
];

#[test]
fn test_canonical_form_reparses_to_same_path() {
    for source in STORED_PATHS {
        let path = parse(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
        let canonical = path.to_string();
        assert_eq!(parse(&canonical).unwrap(), path, "{} -> {}", source, canonical);
    }
}

#[test]
fn test_quote_styles_are_equivalent() {
    let a = parse(r#"sections[{"id":"abc"}].title"#).unwrap();
    let b = parse(r#"sections[{id: "abc"}].title"#).unwrap();
    let c = parse("sections[{'id': 'abc'}].title").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(
        a.segments()[1],
        Segment::Predicate {
            key: "id".into(),
            value: "abc".into()
        }
    );
}

#[test]
fn test_malformed_paths_are_rejected() {
    let cases = [
        "sections[",
        "sections[0",
        "sections]",
        "sections.{\"id\":\"x\"}",
        "[{\"id\":\"x\"}]",
        "sections[{}]",
        "sections[{\"id\":\"x\",\"type\":\"y\"}]",
        "sections[{\"id\":[1]}]",
        "sections..title",
        "sections#",
    ];
    for source in cases {
        assert!(parse(source).is_err(), "{} should not parse", source);
    }
    assert!(matches!(parse("sections#"), Err(PathSyntaxError::LexError { .. })));
}

#[test]
fn test_resolution_against_story() {
    let story = value!({
        "sections": [
            {"id": "abc", "title": "A", "contents": [
                {"id": "col1", "contents": [{"id": "t", "html": "<p/>"}]}
            ]}
        ],
        "resources": [{"id": 12, "type": "image"}],
        "settings": {"font-size": 14}
    });

    let html = parse(r#"sections[{"id":"abc"}].contents[{"id":"col1"}].contents[0].html"#).unwrap();
    assert_eq!(get(&story, &html), Some(&value!("<p/>")));
    assert_eq!(get(&story, &parse(r#"settings["font-size"]"#).unwrap()), Some(&value!(14)));
    assert_eq!(
        get(&story, &parse("resources[{\"id\": 12.0}].type").unwrap()),
        Some(&value!("image"))
    );

    let miss = resolve(&story, &parse(r#"sections[{"id":"zzz"}].title"#).unwrap());
    assert!(!miss.found);

    assert_eq!(
        effective_path(&story, &html).map(|p| p.to_string()),
        Some("sections[0].contents[0].contents[0].html".to_string())
    );
}

#[test]
fn test_builder_matches_parser() {
    let built = Path::root()
        .child("sections")
        .predicate("id", "abc")
        .child("contents")
        .index(2);
    assert_eq!(parse(r#"sections[{"id":"abc"}].contents[2]"#).unwrap(), built);
}

#[test]
fn test_cache_shares_parses_across_calls() {
    let cache = PathCache::new();
    for _ in 0..3 {
        for source in STORED_PATHS {
            cache.parse(source).unwrap();
        }
    }
    assert_eq!(cache.len(), STORED_PATHS.len());
}
