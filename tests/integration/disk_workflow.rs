use cookdb::fs::{DiskFileSystem, FileSystem};
use cookdb::watch::ManualNotifier;
use cookdb::{AssetPath, CookDatabase, DatabaseOptions, DependencySpec, FileType, Platform};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

struct DiskTree {
    _dir: TempDir,
    disk: DiskFileSystem,
}

impl DiskTree {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("source")).unwrap();
        fs::create_dir_all(dir.path().join("cooked")).unwrap();
        let disk = DiskFileSystem::new(dir.path().join("source"), dir.path().join("cooked"));
        Self { _dir: dir, disk }
    }

    fn open(&self) -> CookDatabase {
        CookDatabase::new(
            Platform::Linux,
            DatabaseOptions::default(),
            Arc::new(self.disk.clone()),
            Box::new(ManualNotifier::new()),
        )
        .unwrap()
    }

    fn write(&self, file: PathBuf, secs: u64) {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, b"data").unwrap();
        set_mtime(&file, secs);
    }

    fn write_source(&self, path: AssetPath, secs: u64) {
        self.write(self.disk.source_file(path), secs);
    }

    fn write_cooked(&self, path: AssetPath, secs: u64) {
        self.write(self.disk.cooked_file(Platform::Linux, path), secs);
    }
}

fn set_mtime(file: &Path, secs: u64) {
    let handle = fs::File::options().write(true).open(file).unwrap();
    handle
        .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn record_is_written_next_to_cooked_output() {
    let tree = DiskTree::new();
    let foo = AssetPath::content("ui/foo.png");
    tree.write_source(foo, 900);
    tree.write_cooked(foo, 1000);

    let db = tree.open();
    db.update_metadata(foo, 1000, &[DependencySpec::source(foo)])
        .unwrap();

    let record_file = tree
        .disk
        .cooked_dir()
        .join("Linux/content/ui/foo.sif0.json");
    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(&record_file).unwrap()).unwrap();
    assert_eq!(json["CookedTimestamp"], 1000);
    assert_eq!(json["Sources"][0]["Source"], "content://ui/foo.png");
    assert_eq!(json["Sources"][0]["Timestamp"], 900);
}

#[test]
fn texture_example_on_disk() {
    let tree = DiskTree::new();
    let foo = AssetPath::content("foo.png");
    tree.write_source(foo, 900);
    tree.write_cooked(foo, 1000);

    let db = tree.open();
    db.update_metadata(foo, 1000, &[DependencySpec::source(foo)])
        .unwrap();
    assert!(db.check_up_to_date(foo));

    set_mtime(&tree.disk.source_file(foo), 950);
    db.manual_on_file_change(foo);
    let mut details = Vec::new();
    assert!(!db.check_up_to_date_with_details(foo, &mut details));
    assert_eq!(details, vec![foo]);

    // A restarted database reaches the same verdict from the record alone.
    drop(db);
    let db = tree.open();
    assert!(!db.check_up_to_date_with_details(foo, &mut details));
    assert_eq!(details, vec![foo]);
}

#[test]
fn directory_growth_on_disk() {
    let tree = DiskTree::new();
    let project = AssetPath::content("sound/music.fspro");
    let banks = AssetPath::content_directory("sound/banks", FileType::SoundBank);
    tree.write_source(AssetPath::content("sound/banks/a.bank"), 10);
    tree.write_source(AssetPath::content("sound/banks/readme.txt"), 10);
    tree.write_cooked(project, 100);

    let db = tree.open();
    db.update_metadata(project, 100, &[DependencySpec::directory(banks)])
        .unwrap();
    assert_eq!(db.record(project).unwrap().directories[0].file_count, 1);
    assert!(db.check_up_to_date(project));

    // Files of another type do not count toward a typed directory.
    let notes = AssetPath::content("sound/banks/more.txt");
    tree.write_source(notes, 11);
    db.manual_on_file_change(notes);
    assert!(db.check_up_to_date(project));

    let bank = AssetPath::content("sound/banks/deep/b.bank");
    tree.write_source(bank, 11);
    db.manual_on_file_change(bank);
    let mut details = Vec::new();
    assert!(!db.check_up_to_date_with_details(project, &mut details));
    assert_eq!(details, vec![banks]);
}

#[test]
fn deleted_cooked_output_is_stale() {
    let tree = DiskTree::new();
    let script = AssetPath::content("scripts/main.lua");
    tree.write_source(script, 10);
    tree.write_cooked(script, 20);

    let db = tree.open();
    db.update_metadata(script, 20, &[DependencySpec::source(script)])
        .unwrap();
    fs::remove_file(tree.disk.cooked_file(Platform::Linux, script)).unwrap();
    db.manual_on_file_change(script);
    assert!(!db.check_up_to_date(script));
    assert_eq!(
        tree.disk.modified_time_for_platform(Platform::Linux, script),
        None
    );
}
