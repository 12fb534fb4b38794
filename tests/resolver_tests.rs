//! Member discovery, object type resolution and source fetch tests

mod common;

use serde_json::json;

use common::MockGateway;
use rpgfree::models::{ConversionTarget, FilterKind, MemberFilter, ObjectType, SourceMember};
use rpgfree::resolver::{fetch_member_source, list_members, ObjectTypeResolver};

fn catalog_rows() -> Vec<serde_json::Value> {
    vec![
        json!({"SYSTEM_TABLE_MEMBER": "calc1", "SOURCE_TYPE": "rpgle", "PARTITION_TEXT": "Calculator"}),
        json!({"SYSTEM_TABLE_MEMBER": "CALC2", "SOURCE_TYPE": "SQLRPGLE", "PARTITION_TEXT": null}),
        json!({"SYSTEM_TABLE_MEMBER": "SETUP", "SOURCE_TYPE": "CLP", "PARTITION_TEXT": "Install"}),
        json!({"SYSTEM_TABLE_MEMBER": "PAYROLL", "SOURCE_TYPE": "RPGLE", "PARTITION_TEXT": "Payroll"}),
    ]
}

#[tokio::test]
async fn test_list_members_keeps_only_convertible_types() {
    let gateway = MockGateway::new().on_query("SYSPARTITIONSTAT", catalog_rows());
    let target = ConversionTarget::for_file("PRODLIB", "QRPGLESRC", None);

    let members = list_members(&gateway, &target).await.unwrap();

    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["CALC1", "CALC2", "PAYROLL"]);
    // catalog casing is normalized on the way in
    assert_eq!(members[0].extension, "RPGLE");
    assert_eq!(members[0].text.as_deref(), Some("Calculator"));
    assert_eq!(members[1].text, None);
}

#[tokio::test]
async fn test_list_members_applies_simple_patterns() {
    let gateway = MockGateway::new().on_query("SYSPARTITIONSTAT", catalog_rows());
    let filter = MemberFilter {
        members: Some("CALC*".to_string()),
        extensions: None,
        kind: FilterKind::Simple,
    };
    let target = ConversionTarget::for_file("PRODLIB", "QRPGLESRC", Some(filter));

    let members = list_members(&gateway, &target).await.unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["CALC1", "CALC2"]);
}

#[tokio::test]
async fn test_list_members_applies_regex_patterns() {
    let gateway = MockGateway::new().on_query("SYSPARTITIONSTAT", catalog_rows());
    let filter = MemberFilter {
        members: Some("^PAY.+".to_string()),
        extensions: None,
        kind: FilterKind::Regex,
    };
    let target = ConversionTarget::for_file("PRODLIB", "QRPGLESRC", Some(filter));

    let members = list_members(&gateway, &target).await.unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["PAYROLL"]);
}

#[tokio::test]
async fn test_resolver_queries_each_library_once() {
    let gateway = MockGateway::new()
        .on_query(
            "OBJECT_STATISTICS('PRODLIB'",
            vec![json!({"OBJNAME": "CALC1", "OBJTYPE": "*PGM"})],
        )
        .on_query(
            "OBJECT_STATISTICS('QGPL'",
            vec![json!({"OBJNAME": "PAYROLL", "OBJTYPE": "*MODULE"})],
        );
    let libraries = vec!["PRODLIB".to_string(), "QGPL".to_string()];
    let mut resolver = ObjectTypeResolver::new(&gateway, &libraries);

    let calc1 = resolver.resolve("PRODLIB", "CALC1").await.unwrap();
    let payroll = resolver.resolve("PRODLIB", "payroll").await.unwrap();
    let unknown = resolver.resolve("PRODLIB", "UNKNOWN").await.unwrap();

    assert_eq!(calc1, ObjectType::Pgm);
    assert_eq!(payroll, ObjectType::Module);
    assert_eq!(unknown, ObjectType::None);
    // three lookups, two libraries, two catalog queries
    assert_eq!(gateway.calls_matching("OBJECT_STATISTICS"), 2);
}

#[tokio::test]
async fn test_resolver_searches_the_origin_library_first() {
    let gateway = MockGateway::new().on_query(
        "OBJECT_STATISTICS('DEVLIB'",
        vec![json!({"OBJNAME": "CALC1", "OBJTYPE": "*PGM"})],
    );
    let libraries = vec!["PRODLIB".to_string()];
    let mut resolver = ObjectTypeResolver::new(&gateway, &libraries);

    let resolved = resolver.resolve("DEVLIB", "CALC1").await.unwrap();

    assert_eq!(resolved, ObjectType::Pgm);
    // the library list is never consulted once the origin matches
    assert!(gateway.call_containing("PRODLIB").is_none());
    assert_eq!(gateway.calls_matching("OBJECT_STATISTICS"), 1);
}

#[tokio::test]
async fn test_resolver_with_empty_library_list_still_checks_the_origin() {
    let gateway = MockGateway::new().on_query("OBJECT_STATISTICS('PRODLIB'", vec![]);
    let libraries: Vec<String> = Vec::new();
    let mut resolver = ObjectTypeResolver::new(&gateway, &libraries);

    let resolved = resolver.resolve("PRODLIB", "CALC1").await.unwrap();

    assert_eq!(resolved, ObjectType::None);
    assert_eq!(gateway.calls_matching("OBJECT_STATISTICS"), 1);
}

fn calc1() -> SourceMember {
    SourceMember {
        library: "PRODLIB".to_string(),
        file: "QRPGLESRC".to_string(),
        name: "CALC1".to_string(),
        extension: "RPGLE".to_string(),
        text: None,
    }
}

#[tokio::test]
async fn test_fetch_member_source_joins_trimmed_lines() {
    let gateway = MockGateway::new()
        .on_query("CREATE OR REPLACE ALIAS", vec![])
        .on_query(
            "SELECT SRCDTA",
            vec![
                json!({"SRCDTA": "     H DATEDIT(*YMD)   "}),
                json!({"SRCDTA": "     C                   EVAL      X = 1  "}),
            ],
        )
        .on_query("DROP ALIAS", vec![]);

    let source = fetch_member_source(&gateway, &calc1()).await.unwrap();
    assert_eq!(
        source,
        "     H DATEDIT(*YMD)\n     C                   EVAL      X = 1"
    );

    let calls = gateway.calls();
    assert!(calls[0].starts_with("CREATE OR REPLACE ALIAS QTEMP.CALC1"));
    assert!(calls[0].contains("PRODLIB.QRPGLESRC (CALC1)"));
    assert_eq!(calls[1], "SELECT SRCDTA FROM QTEMP.CALC1");
    assert_eq!(calls[2], "DROP ALIAS QTEMP.CALC1");
}

#[tokio::test]
async fn test_fetch_member_source_drops_alias_even_when_the_read_fails() {
    // SELECT is deliberately left unscripted and errors out
    let gateway = MockGateway::new()
        .on_query("CREATE OR REPLACE ALIAS", vec![])
        .on_query("DROP ALIAS", vec![]);

    let result = fetch_member_source(&gateway, &calc1()).await;
    assert!(result.is_err());
    assert_eq!(gateway.calls_matching("DROP ALIAS"), 1);
}
