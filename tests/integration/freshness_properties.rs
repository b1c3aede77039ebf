use crate::support::{harness, reopen};
use cookdb::versions::{data_version, Versions};
use cookdb::watch::FileChange;
use cookdb::{
    AssetPath, CookDatabase, DatabaseOptions, DependencySpec, FileType, Platform, StaleReason,
    Verdict,
};
use proptest::prelude::*;

#[test]
fn outputs_without_record_are_stale() {
    let h = harness();
    for name in ["fx/bloom.fx", "ui/menu.swf", "foo.png", "scripts/main.lua"] {
        let out = AssetPath::content(name);
        h.fs.set_cooked(Platform::Pc, out, 10);
        let mut details = vec![AssetPath::content("leftover.lua")];
        assert!(!h.db.check_up_to_date(out));
        assert!(!h.db.check_up_to_date_with_details(out, &mut details));
        assert!(details.is_empty(), "no record is global staleness");
    }
}

#[test]
fn update_then_check_is_up_to_date() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let header = AssetPath::content("fx/common.fxh");
    let sibling = AssetPath::content("fx/bloom.fxb");
    h.fs.set_source(header, 40);
    h.fs.set_cooked(Platform::Pc, sibling, 90);
    h.fs.set_cooked(Platform::Pc, out, 100);

    h.db.update_metadata(
        out,
        100,
        &[DependencySpec::source(header), DependencySpec::sibling(sibling)],
    )
    .unwrap();
    assert!(h.db.check_up_to_date(out));

    // A fresh database reads the persisted record and agrees.
    let other = reopen(&h, DatabaseOptions::default());
    assert!(other.check_up_to_date(out));
    let record = other.record(out).unwrap();
    assert_eq!(record.sources.len(), 1);
    assert_eq!(record.siblings.len(), 1);
    assert_eq!(record.cooker_version, CookDatabase::cooker_version());
    assert_eq!(record.data_version, data_version(FileType::Effect));
}

#[test]
fn change_event_invalidates_with_details() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let header = AssetPath::content("fx/common.fxh");
    let other = AssetPath::content("fx/other.fxh");
    h.fs.set_source(header, 40);
    h.fs.set_source(other, 40);
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(
        out,
        100,
        &[DependencySpec::source(header), DependencySpec::source(other)],
    )
    .unwrap();
    assert!(h.db.check_up_to_date(out));

    h.fs.set_source(header, 41);
    assert!(h.notifier.emit(FileChange::modified(header)));

    assert!(!h.db.check_up_to_date(out));
    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(out, &mut details));
    assert_eq!(details, vec![header]);
    assert!(h.db.is_changed(header));
}

#[test]
fn sibling_change_is_reported() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let sibling = AssetPath::content("fx/bloom.fxb");
    h.fs.set_cooked(Platform::Pc, sibling, 90);
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[DependencySpec::sibling(sibling)])
        .unwrap();

    h.fs.remove_cooked(Platform::Pc, sibling);
    h.db.manual_on_file_change(sibling);
    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(out, &mut details));
    assert_eq!(details, vec![sibling]);
}

#[test]
fn new_file_in_directory_dependency_makes_output_stale() {
    let h = harness();
    let project = AssetPath::content("sound/music.fspro");
    let banks = AssetPath::content_directory("sound/banks", FileType::Unknown);
    h.fs.set_source(AssetPath::content("sound/banks/a.bank"), 5);
    h.fs.set_source(AssetPath::content("sound/banks/b.bank"), 5);
    h.fs.set_cooked(Platform::Pc, project, 100);
    h.db.update_metadata(project, 100, &[DependencySpec::directory(banks)])
        .unwrap();
    assert!(h.db.check_up_to_date(project));

    let added = AssetPath::content("sound/banks/c.bank");
    h.fs.set_source(added, 6);
    h.notifier.emit(FileChange::added(added));

    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(project, &mut details));
    assert_eq!(details, vec![banks]);
}

#[test]
fn removed_file_in_directory_dependency_makes_output_stale() {
    let h = harness();
    let project = AssetPath::content("sound/music.fspro");
    let banks = AssetPath::content_directory("sound/banks", FileType::Unknown);
    let doomed = AssetPath::content("sound/banks/a.bank");
    h.fs.set_source(doomed, 5);
    h.fs.set_cooked(Platform::Pc, project, 100);
    h.db.update_metadata(project, 100, &[DependencySpec::directory(banks)])
        .unwrap();

    h.fs.remove_source(doomed);
    h.notifier.emit(FileChange::removed(doomed));
    assert!(!h.db.check_up_to_date(project));
}

#[test]
fn version_bump_is_global_staleness() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let header = AssetPath::content("fx/common.fxh");
    h.fs.set_source(header, 40);
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[DependencySpec::source(header)])
        .unwrap();

    let bumped = DatabaseOptions {
        versions: Versions::default().with_data(FileType::Effect, data_version(FileType::Effect) + 1),
        ..DatabaseOptions::default()
    };
    let db = reopen(&h, bumped);
    let mut details = vec![header];
    assert!(!db.check_up_to_date_with_details(out, &mut details));
    assert!(details.is_empty());
    assert!(matches!(
        db.verdict(out),
        Verdict::Stale(StaleReason::DataVersion { .. })
    ));

    let cooker = DatabaseOptions {
        versions: Versions::default().with_cooker(CookDatabase::cooker_version() + 1),
        ..DatabaseOptions::default()
    };
    assert!(h.db.check_up_to_date(out));
    let db = reopen(&h, cooker);
    assert!(!db.check_up_to_date(out));
    let mut details = vec![header];
    assert!(!db.check_up_to_date_with_details(out, &mut details));
    assert!(details.is_empty());
    assert!(matches!(
        db.verdict(out),
        Verdict::Stale(StaleReason::CookerVersion { .. })
    ));
}

#[test]
fn output_change_keeps_it_in_dependents() {
    let h = harness();
    let movie = AssetPath::content("ui/menu.swf");
    let images = AssetPath::content_directory("ui/menu", FileType::Unknown);
    let shared = AssetPath::content("ui/shared.png");
    let frame = AssetPath::content("ui/menu/frame.png");
    h.fs.set_source(shared, 10);
    h.fs.set_cooked(Platform::Pc, movie, 100);
    h.db.update_metadata(
        movie,
        100,
        &[DependencySpec::directory(images), DependencySpec::source(shared)],
    )
    .unwrap();
    assert_eq!(h.db.dependents(frame), vec![movie]);

    assert!(h.notifier.emit(FileChange::modified(movie)));
    assert_eq!(h.db.dependents(frame), vec![movie]);
    assert_eq!(h.db.dependents(shared), vec![movie]);

    // A texture source shares its path with the texture outputs.
    assert!(h.notifier.emit(FileChange::modified(shared)));
    assert_eq!(h.db.dependents(shared), vec![movie]);
    assert_eq!(h.db.dependents(frame), vec![movie]);
    assert!(h.db.verify_index().is_ok());
}

#[test]
fn directory_dependents_reach_deep_descendants() {
    let h = harness();
    let movie = AssetPath::content("ui/menu.swf");
    let images = AssetPath::content_directory("ui/menu", FileType::Unknown);
    h.fs.set_cooked(Platform::Pc, movie, 100);
    h.db.update_metadata(movie, 100, &[DependencySpec::directory(images)])
        .unwrap();

    let mut out = Vec::new();
    h.db.get_dependents(AssetPath::content("ui/menu/icons/large/ok.png"), &mut out);
    assert_eq!(out, vec![movie]);
    h.db.get_dependents(AssetPath::content("ui/other/ok.png"), &mut out);
    assert!(out.is_empty());
}

#[test]
fn texture_example_foo_png() {
    let h = harness();
    let foo = AssetPath::content("foo.png");
    h.fs.set_source(foo, 900);
    h.fs.set_cooked(Platform::Pc, foo, 1000);

    h.db.update_metadata(foo, 1000, &[DependencySpec::source(foo)])
        .unwrap();
    assert!(h.db.check_up_to_date(foo));

    h.fs.set_source(foo, 950);
    h.notifier.emit(FileChange::modified(foo));

    assert!(!h.db.check_up_to_date(foo));
    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(foo, &mut details));
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].url(), "content://foo.png");
}

#[test]
fn texture_mip_dependencies_are_normalized() {
    let h = harness();
    let atlas = AssetPath::content("ui/atlas.fcn");
    let mip = AssetPath::content("ui/frame.png").with_type(FileType::Texture3);
    h.fs.set_source(mip.normalized(), 10);
    h.fs.set_cooked(Platform::Pc, atlas, 100);
    h.db.update_metadata(atlas, 100, &[DependencySpec::source(mip)])
        .unwrap();

    assert!(h.db.check_up_to_date(atlas));
    assert_eq!(h.db.dependents(mip), vec![atlas]);
    let record = h.db.record(atlas).unwrap();
    assert_eq!(record.sources[0].path.file_type(), FileType::Texture0);
}

#[test]
fn debug_only_dependencies_are_tracked_like_any_other() {
    let h = harness();
    let out = AssetPath::content("scripts/main.lua");
    let debug_src = AssetPath::content("scripts/debug.lua");
    h.fs.set_source(debug_src, 10);
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[DependencySpec::source(debug_src).debug_only()])
        .unwrap();
    assert!(h.db.check_up_to_date(out));

    h.fs.set_source(debug_src, 11);
    h.db.manual_on_file_change(debug_src);
    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(out, &mut details));
    assert_eq!(details, vec![debug_src]);
}

#[test]
fn corrupt_record_counts_as_absent() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.fs.put_cooked_bytes(Platform::Pc, out.record_path(), b"{\"CookedTimestamp\": ");

    assert!(!h.db.check_up_to_date(out));
    assert!(h.db.record(out).is_none());

    h.db.update_metadata(out, 100, &[]).unwrap();
    assert!(h.db.check_up_to_date(out));
}

#[test]
fn failed_write_keeps_previous_answer_source() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let header = AssetPath::content("fx/common.fxh");
    h.fs.set_source(header, 40);
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[DependencySpec::source(header)])
        .unwrap();

    h.fs.set_reject_writes(true);
    let err = h.db.update_metadata(out, 100, &[]);
    assert!(err.is_err());
    h.fs.set_reject_writes(false);

    // The committed record still drives the answer.
    assert!(h.db.check_up_to_date(out));
    assert_eq!(h.db.record(out).unwrap().sources.len(), 1);
    assert!(h.db.verify_index().is_ok());
}

#[test]
fn missing_source_at_cook_time_is_reported() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    let ghost = AssetPath::content("fx/ghost.fxh");
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[DependencySpec::source(ghost)])
        .unwrap();

    let mut details = Vec::new();
    assert!(!h.db.check_up_to_date_with_details(out, &mut details));
    assert_eq!(details, vec![ghost]);
}

#[test]
fn recooked_output_is_stale_until_recorded() {
    let h = harness();
    let out = AssetPath::content("fx/bloom.fx");
    h.fs.set_cooked(Platform::Pc, out, 100);
    h.db.update_metadata(out, 100, &[]).unwrap();

    h.fs.set_cooked(Platform::Pc, out, 120);
    h.notifier.emit(FileChange::modified(out));
    assert_eq!(
        h.db.verdict(out),
        Verdict::Stale(StaleReason::OutputChanged {
            recorded: 100,
            current: Some(120)
        })
    );

    h.db.update_metadata(out, 120, &[]).unwrap();
    assert!(h.db.check_up_to_date(out));
}

#[test]
fn rename_invalidates_both_paths() {
    let h = harness();
    let a_out = AssetPath::content("a.fx");
    let b_out = AssetPath::content("b.fx");
    let old = AssetPath::content("old.fxh");
    let new = AssetPath::content("new.fxh");
    h.fs.set_source(old, 1);
    h.fs.set_source(new, 1);
    h.fs.set_cooked(Platform::Pc, a_out, 10);
    h.fs.set_cooked(Platform::Pc, b_out, 10);
    h.db.update_metadata(a_out, 10, &[DependencySpec::source(old)]).unwrap();
    h.db.update_metadata(b_out, 10, &[DependencySpec::source(new)]).unwrap();

    h.fs.remove_source(old);
    h.fs.set_source(new, 2);
    h.notifier.emit(FileChange::renamed(old, new));

    assert!(!h.db.check_up_to_date(a_out));
    assert!(!h.db.check_up_to_date(b_out));
    assert_eq!(h.db.take_changed(), vec![new, old]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_stale_exactly_when_a_source_moved(
        stamps in prop::collection::vec((1u64..50, any::<bool>()), 1..6)
    ) {
        let h = harness();
        let out = AssetPath::content("fx/prop.fx");
        h.fs.set_cooked(Platform::Pc, out, 1000);
        let sources: Vec<AssetPath> = (0..stamps.len())
            .map(|i| AssetPath::content(&format!("fx/prop{}.fxh", i)))
            .collect();
        for (src, (ts, _)) in sources.iter().zip(&stamps) {
            h.fs.set_source(*src, *ts);
        }
        let specs: Vec<DependencySpec> = sources.iter().copied().map(DependencySpec::source).collect();
        h.db.update_metadata(out, 1000, &specs).unwrap();

        let mut expected = Vec::new();
        for (src, (ts, touch)) in sources.iter().zip(&stamps) {
            if *touch {
                h.fs.set_source(*src, ts + 100);
                h.db.manual_on_file_change(*src);
                expected.push(*src);
            }
        }

        let mut details = Vec::new();
        let fresh = h.db.check_up_to_date_with_details(out, &mut details);
        prop_assert_eq!(fresh, expected.is_empty());
        prop_assert_eq!(details, expected);
    }
}
