use wpstruct_core::records::{CustomField, Post, Term};
use wpstruct_core::{Value, populate, serialize};

const END_TO_END: &str = "post_title: Hello
  World
post_content: body text
custom_fields: [{\"key\":\"a\",\"value\":\"1\"},{\"key\":\"b\",\"value\":\"2\"}]
ping_status: null
";

#[test]
fn end_to_end_draft_to_struct() {
    let parsed = wpstruct_core::FlatFileParser::new()
        .parse_str(END_TO_END)
        .expect("parse");
    assert!(parsed.diagnostics.is_empty());
    let s = &parsed.fields;
    assert_eq!(
        s.keys().collect::<Vec<_>>(),
        vec!["post_title", "post_content", "custom_fields"]
    );
    assert_eq!(s.get("post_title"), Some(&Value::String("Hello  World".into())));
    assert_eq!(s.get("post_content"), Some(&Value::String("body text".into())));
    assert!(!s.contains_key("ping_status"));

    let fields = s.get("custom_fields").and_then(Value::as_list).unwrap();
    let pairs: Vec<_> = fields
        .iter()
        .map(|f| {
            let f = f.as_struct().unwrap();
            (
                f.get("key").and_then(Value::as_str).unwrap().to_string(),
                f.get("value").and_then(Value::as_str).unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
    );
}

#[test]
fn draft_file_loads_into_post() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("post.txt");
    std::fs::write(&p, END_TO_END).unwrap();
    let loaded = wpstruct_core::from_flat_file::<Post>(&p).expect("load");
    assert!(loaded.is_clean());
    let post = loaded.record;
    assert_eq!(post.post_title.as_deref(), Some("Hello  World"));
    assert_eq!(post.ping_status, None);
    assert_eq!(
        post.custom_fields,
        Some(vec![
            CustomField {
                id: None,
                key: Some("a".into()),
                value: Some("1".into()),
            },
            CustomField {
                id: None,
                key: Some("b".into()),
                value: Some("2".into()),
            },
        ])
    );
}

#[test]
fn draft_scalars_coerce_on_populate() {
    let text = "post_id: 12
sticky: true
post_date: 20150102T03:04:05
terms: [{\"name\":\"news\",\"taxonomy\":\"category\",\"count\":4}]
";
    let loaded = wpstruct_core::from_flat_str::<Post>(text).expect("load");
    assert!(loaded.is_clean(), "{:?}", loaded.populate_error);
    let post = loaded.record;
    assert_eq!(post.post_id, Some(12));
    assert_eq!(post.sticky, Some(true));
    assert_eq!(
        post.post_date.map(|d| d.to_string()),
        Some("2015-01-02 03:04:05".to_string())
    );
    let terms = post.terms.unwrap();
    assert_eq!(terms[0].count, Some(4));
    assert_eq!(terms[0].taxonomy.as_deref(), Some("category"));
}

#[test]
fn post_round_trips_through_struct() {
    let post = Post {
        post_id: Some(3),
        post_title: Some("t".into()),
        sticky: Some(false),
        terms: Some(vec![Term {
            name: Some("x".into()),
            count: Some(1),
            ..Term::default()
        }]),
        ..Post::default()
    };
    let s = serialize(&post);
    assert_eq!(
        s.keys().collect::<Vec<_>>(),
        vec!["post_id", "post_title", "sticky", "terms"]
    );
    let mut back = Post::default();
    populate(&s, &mut back).unwrap();
    assert_eq!(back, post);
}

#[test]
fn unresolvable_list_does_not_abort_draft() {
    let text = "post_title: kept
post_thumbnail: [{\"attachment_id\":1}]
post_content: also kept
";
    let loaded = wpstruct_core::from_flat_str::<Post>(text).expect("load");
    assert_eq!(loaded.record.post_title.as_deref(), Some("kept"));
    assert_eq!(loaded.record.post_content.as_deref(), Some("also kept"));
    assert_eq!(loaded.record.post_thumbnail, None);
    assert_eq!(loaded.diagnostics.len(), 1);
    assert_eq!(
        loaded.diagnostics[0].kind,
        wpstruct_core::DiagnosticKind::UnresolvedType("PostThumbnail".into())
    );
}

#[test]
fn invalid_draft_returns_no_struct() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("bad.txt");
    std::fs::write(&p, "  leading continuation\npost_title: x\n").unwrap();
    let err = wpstruct_core::from_flat_file::<Post>(&p).unwrap_err();
    assert!(matches!(
        err,
        wpstruct_core::ParseError::InvalidFormat { line: 1, .. }
    ));
}

#[test]
fn find_drafts_walks_subdirectories() {
    use std::fs;
    let d = tempfile::tempdir().unwrap();
    fs::create_dir_all(d.path().join("a/b")).unwrap();
    fs::write(d.path().join("a/b/two.draft"), "k: v").unwrap();
    fs::write(d.path().join("one.txt"), "k: v").unwrap();
    fs::write(d.path().join("image.jpg"), [0u8; 4]).unwrap();
    let found = wpstruct_core::find_drafts(d.path());
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap() != "jpg"));
}

#[test]
fn parsed_struct_dumps_as_json() {
    let parsed = wpstruct_core::FlatFileParser::new()
        .parse_str(END_TO_END)
        .unwrap();
    let opts = wpstruct_core::json::JsonOpts {
        pretty: false,
        ..Default::default()
    };
    let js = wpstruct_core::json::dump_struct_json(&parsed.fields, &opts).unwrap();
    assert_eq!(
        js,
        r#"{"post_title":"Hello  World","post_content":"body text","custom_fields":[{"key":"a","value":"1"},{"key":"b","value":"2"}]}"#
    );
}
