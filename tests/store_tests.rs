//! Settings store persistence tests

use std::fs;

use tempfile::TempDir;

use rpgfree::models::{
    CommandParams, ConversionEntry, ConversionList, ConversionStatus, EntryPatch, ObjectType,
};
use rpgfree::store::Store;

fn entry(member: &str) -> ConversionEntry {
    ConversionEntry {
        member: member.to_string(),
        library: "PRODLIB".to_string(),
        source_file: "QRPGLESRC".to_string(),
        source_type: "RPGLE".to_string(),
        object_type: None,
        status: ConversionStatus::Na,
        message: String::new(),
        conversion_date: None,
    }
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));

    assert_eq!(store.params().unwrap(), CommandParams::default());
    assert!(store.lists().unwrap().is_empty());
    assert!(store.find("anything").unwrap().is_none());
}

#[test]
fn test_params_survive_a_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut params = CommandParams::default();
    params.set("INDENT", "4").unwrap();
    params.set("CVT_GOTO", "*NO").unwrap();
    Store::new(&path).save_params(&params).unwrap();

    let reloaded = Store::new(&path).params().unwrap();
    assert_eq!(reloaded, params);
    assert_eq!(reloaded.indent, "4");
    assert_eq!(reloaded.cvt_goto, "*NO");
}

#[test]
fn test_settings_document_uses_legacy_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let store = Store::new(&path);
    store.save_params(&CommandParams::default()).unwrap();
    store.add(ConversionList::new("sprint", "DEV400")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"CVT_GOTO\""));
    assert!(text.contains("\"TOSRCMBR\""));
    assert!(text.contains("\"conversionList\""));
    assert!(text.contains("\"listname\""));
    assert!(text.contains("\"connectionname\""));
}

#[test]
fn test_save_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");

    Store::new(&path)
        .add(ConversionList::new("sprint", "DEV400"))
        .unwrap();

    assert!(path.exists());
}

#[test]
fn test_find_and_remove_are_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));
    store.add(ConversionList::new("sprint", "DEV400")).unwrap();
    store.add(ConversionList::new("backlog", "DEV400")).unwrap();

    assert!(store.find("SPRINT").unwrap().is_some());

    store.remove("Sprint").unwrap();
    let remaining = store.lists().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "backlog");
}

#[test]
fn test_update_replaces_the_stored_list() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));
    store.add(ConversionList::new("sprint", "DEV400")).unwrap();

    let mut edited = store.find("sprint").unwrap().unwrap();
    edited.description = "payroll rewrite".to_string();
    edited.target_library = "CONVLIB".to_string();
    store.update(edited).unwrap();

    let reloaded = store.find("sprint").unwrap().unwrap();
    assert_eq!(reloaded.description, "payroll rewrite");
    assert_eq!(reloaded.target_library, "CONVLIB");
}

#[test]
fn test_update_item_merges_the_patch() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));
    let mut list = ConversionList::new("sprint", "DEV400");
    list.items.push(entry("CALC1"));
    list.items.push(entry("PAYROLL"));
    store.add(list).unwrap();

    let patch = EntryPatch {
        source_file: Some("QRPGLESRC".to_string()),
        object_type: Some(ObjectType::Pgm),
        status: Some(ConversionStatus::Succeed),
        message: Some("MSG3867: member converted".to_string()),
        ..Default::default()
    };
    store.update_item("sprint", "calc1", &patch).unwrap();

    let reloaded = store.find("sprint").unwrap().unwrap();
    let calc1 = reloaded.find_item("CALC1").unwrap();
    assert_eq!(calc1.status, ConversionStatus::Succeed);
    assert_eq!(calc1.message, "MSG3867: member converted");
    assert_eq!(calc1.object_type, Some(ObjectType::Pgm));
    assert_eq!(calc1.source_file, "QRPGLESRC");

    // the sibling entry is untouched
    let payroll = reloaded.find_item("PAYROLL").unwrap();
    assert_eq!(payroll.status, ConversionStatus::Na);
}

#[test]
fn test_update_item_on_unknown_member_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));
    let mut list = ConversionList::new("sprint", "DEV400");
    list.items.push(entry("CALC1"));
    store.add(list).unwrap();

    let patch = EntryPatch {
        status: Some(ConversionStatus::Failed),
        ..Default::default()
    };
    store.update_item("sprint", "MISSING", &patch).unwrap();
    store.update_item("ghosts", "CALC1", &patch).unwrap();

    let reloaded = store.find("sprint").unwrap().unwrap();
    assert_eq!(
        reloaded.find_item("CALC1").unwrap().status,
        ConversionStatus::Na
    );
}

#[test]
fn test_remove_item_drops_only_that_member() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("settings.json"));
    let mut list = ConversionList::new("sprint", "DEV400");
    list.items.push(entry("CALC1"));
    list.items.push(entry("PAYROLL"));
    store.add(list).unwrap();

    store.remove_item("sprint", "calc1").unwrap();

    let reloaded = store.find("sprint").unwrap().unwrap();
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.items[0].member, "PAYROLL");
}
