use crate::support::{harness_with, reopen};
use cookdb::fs::{FileSystem, Location};
use cookdb::versions::{data_version, version_table_path, Versions};
use cookdb::{AssetPath, DatabaseOptions, FileType, GameDirectory, Platform};

fn reprocessing(versions: Versions) -> DatabaseOptions {
    DatabaseOptions {
        process_one_to_one_versions: true,
        versions,
    }
}

#[test]
fn first_open_writes_table_and_keeps_files() {
    let h = harness_with(reprocessing(Versions::default()));
    assert!(h.fs.contains(Location::Cooked(Platform::Pc), version_table_path()));
}

#[test]
fn data_version_bump_deletes_stale_one_to_one_outputs() {
    let h = harness_with(reprocessing(Versions::default()));
    let script = AssetPath::content("scripts/main.lua");
    let font = AssetPath::content("fonts/body.ttf");
    let movie = AssetPath::content("ui/menu.swf");
    for p in [script, font, movie] {
        h.fs.set_cooked(Platform::Pc, p, 100);
    }

    let bumped = Versions::default().with_data(FileType::Script, data_version(FileType::Script) + 1);
    let _db = reopen(&h, reprocessing(bumped));

    let remaining = h.fs.list_for_platform(Platform::Pc, GameDirectory::Content);
    assert!(!remaining.contains(&script));
    assert!(remaining.contains(&font));
    assert!(remaining.contains(&movie), "many-to-one outputs are left to their records");
}

#[test]
fn reprocessing_disabled_leaves_tree_alone() {
    let h = harness_with(DatabaseOptions::default());
    let script = AssetPath::content("scripts/main.lua");
    h.fs.set_cooked(Platform::Pc, script, 100);
    let bumped = Versions::default().with_cooker(1);
    let _db = reopen(&h, DatabaseOptions { process_one_to_one_versions: false, versions: bumped });
    assert!(h.fs.contains(Location::Cooked(Platform::Pc), script));
    assert!(!h.fs.contains(Location::Cooked(Platform::Pc), version_table_path()));
}
