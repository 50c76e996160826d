//! Golden tests for export collections.
//!
//! These tests pin closure discovery, export-id assignment, reference
//! construction and the on-disk artifact layout.

use std::cell::Cell;
use std::path::Path;

use asset_export_collection::{
    AssetExportCollection, AssetExporter, AssetType, BehaviourData, ClassId, CollectionError,
    CollectionGuid, ContainerId, DeferredStructure, EngineVersion, ExportCollection, ExportContext,
    ExportId, ExportSettings, InMemoryContainer, Meta, MetaPtr, PathId, PersistedObject,
    SerializedField, SerializedStructure, SourceContainer, StructureSlot,
};
use tracing_subscriber::EnvFilter;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Writes the primary object's name and counts calls.
struct RecordingExporter {
    succeed: bool,
    calls: Cell<usize>,
}

impl RecordingExporter {
    fn ok() -> Self {
        Self { succeed: true, calls: Cell::new(0) }
    }

    fn failing() -> Self {
        Self { succeed: false, calls: Cell::new(0) }
    }
}

impl AssetExporter for RecordingExporter {
    fn export(&self, _ctx: &ExportContext, asset: &PersistedObject, file_path: &Path) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.succeed && std::fs::write(file_path, asset.best_name()).is_ok()
    }
}

/// Exporter with its own main-id policy and meta-typed references.
struct ImportedExporter;

impl AssetExporter for ImportedExporter {
    fn export(&self, _ctx: &ExportContext, _asset: &PersistedObject, file_path: &Path) -> bool {
        std::fs::write(file_path, b"binary").is_ok()
    }

    fn main_export_id(&self, _asset: &PersistedObject) -> ExportId {
        ExportId(4_900_000)
    }

    fn export_type(&self, _asset: &PersistedObject) -> AssetType {
        AssetType::Meta
    }

    fn file_extension(&self, _asset: &PersistedObject) -> &str {
        "bytes"
    }
}

fn refs(ids: &[i64]) -> StructureSlot {
    SerializedStructure::new("Data", vec![])
        .with_references(ids.iter().copied())
        .into()
}

fn scriptable(id: i64, targets: &[i64]) -> PersistedObject {
    PersistedObject::behaviour(id, BehaviourData::scriptable(refs(targets)))
}

fn plain(id: i64, targets: &[i64]) -> PersistedObject {
    PersistedObject::behaviour(id, BehaviourData::plain(refs(targets)))
}

fn scene(id: i64) -> PersistedObject {
    PersistedObject::behaviour(id, BehaviourData::scene(StructureSlot::Missing))
}

fn build_container(objects: Vec<PersistedObject>) -> InMemoryContainer {
    let mut container = InMemoryContainer::new(ContainerId(3), "resources.assets");
    for object in objects {
        container.add(object).unwrap();
    }
    container
}

fn member_ids(collection: &dyn ExportCollection<'_>) -> Vec<i64> {
    collection.assets().iter().map(|a| a.path_id().0).collect()
}

fn obj(container: &InMemoryContainer, id: i64) -> &PersistedObject {
    container.get(PathId(id)).unwrap()
}

fn context() -> ExportContext {
    ExportContext::new(EngineVersion::new(2021, 3, 4), ExportSettings::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// CLOSURE TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ordinary_primary_uses_exporter_main_id() {
    init_tracing();
    let container = build_container(vec![PersistedObject::ordinary(8, ClassId::TEXT_ASSET, "TextAsset")]);
    let exporter = ImportedExporter;

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 8)).unwrap();

    assert_eq!(member_ids(&collection), vec![8]);
    assert_eq!(collection.export_id(obj(&container, 8)).unwrap(), ExportId(4_900_000));
}

#[test]
fn test_scene_reference_excluded() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[5, 9]),
        plain(5, &[]),
        scene(9),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 5]);
    assert!(!collection.contains(obj(&container, 9)));
}

#[test]
fn test_chain_is_followed_depth_first() {
    init_tracing();
    // 1 → {5, 6}, 5 → {7}
    let container = build_container(vec![
        scriptable(1, &[5, 6]),
        plain(5, &[7]),
        plain(6, &[]),
        plain(7, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 5, 7, 6]);
}

#[test]
fn test_three_level_chain() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[5]),
        plain(5, &[7]),
        plain(7, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 5, 7]);
    assert_eq!(collection.export_id(obj(&container, 7)).unwrap(), ExportId(7));
}

#[test]
fn test_reference_cycle_terminates() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2]),
        plain(2, &[1, 2, 3]),
        plain(3, &[2]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 2, 3]);
}

#[test]
fn test_long_chain_does_not_exhaust_the_stack() {
    init_tracing();
    const LEN: i64 = 10_000;
    let mut objects = vec![scriptable(1, &[2])];
    for id in 2..=LEN {
        objects.push(plain(id, &[id + 1]));
    }
    let container = build_container(objects);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), (1..=LEN).collect::<Vec<_>>());
    assert_eq!(collection.export_id(obj(&container, LEN)).unwrap(), ExportId(LEN));
}

#[test]
fn test_ordinary_object_with_behaviour_class_is_not_a_behaviour() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2]),
        PersistedObject::ordinary(2, ClassId::MONO_BEHAVIOUR, "MonoBehaviour"),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();
    assert_eq!(member_ids(&collection), vec![1]);

    let alone = AssetExportCollection::new(&exporter, &container, obj(&container, 2)).unwrap();
    assert_eq!(alone.export_id(obj(&container, 2)).unwrap(), ExportId(11_400_000));
}

#[test]
fn test_standalone_and_ordinary_references_excluded() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2, 3, 4]),
        scriptable(2, &[]),
        PersistedObject::ordinary(3, ClassId::MESH, "Mesh"),
        plain(4, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 4]);
}

#[test]
fn test_missing_structures_stop_the_walk() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2]),
        PersistedObject::behaviour(2, BehaviourData::plain(StructureSlot::Missing)),
        plain(3, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 2]);
}

#[test]
fn test_structure_without_reference_index_stops_the_walk() {
    init_tracing();
    let unindexed = SerializedStructure::new("Data", vec![SerializedField::local_pointer("child", 2)]);
    let container = build_container(vec![
        PersistedObject::behaviour(1, BehaviourData::scriptable(unindexed.into())),
        plain(2, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1]);
}

#[test]
fn test_deferred_structures_are_loaded() {
    init_tracing();
    let root = SerializedStructure::new(
        "Quest",
        vec![SerializedField::local_pointer("first_step", 10)],
    );
    let step = SerializedStructure::new(
        "QuestStep",
        vec![SerializedField::local_pointer("next", 11)],
    );
    let container = build_container(vec![
        PersistedObject::behaviour(
            1,
            BehaviourData::scriptable(DeferredStructure::from_json(serde_json::to_vec(&root).unwrap()).into()),
        ),
        PersistedObject::behaviour(
            10,
            BehaviourData::plain(DeferredStructure::from_json(serde_json::to_vec(&step).unwrap()).into()),
        ),
        plain(11, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&collection), vec![1, 10, 11]);
}

#[test]
fn test_scene_primary_rejected() {
    init_tracing();
    let container = build_container(vec![scene(4)]);
    let exporter = RecordingExporter::ok();

    let err = AssetExportCollection::new(&exporter, &container, obj(&container, 4)).unwrap_err();

    assert!(matches!(err, CollectionError::InvalidPrimaryObject(info) if info.path_id == PathId(4)));
}

#[test]
fn test_contains_matches_export_id_for_every_object() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2, 4]),
        plain(2, &[3]),
        plain(3, &[]),
        scene(4),
        PersistedObject::ordinary(5, ClassId::MESH, "Mesh"),
    ]);
    let exporter = RecordingExporter::ok();

    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    for object in container.objects() {
        assert_eq!(collection.contains(object), collection.export_id(object).is_ok());
    }
}

#[test]
fn test_rebuild_is_deterministic() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[7, 3]),
        plain(3, &[7]),
        plain(7, &[]),
    ]);
    let exporter = RecordingExporter::ok();

    let first = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();
    let second = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();

    assert_eq!(member_ids(&first), member_ids(&second));
    assert_eq!(first.export_ids().collect::<Vec<_>>(), second.export_ids().collect::<Vec<_>>());
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// POINTER TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cross_collection_pointers() {
    init_tracing();
    let container = build_container(vec![
        scriptable(1, &[2]),
        plain(2, &[]),
        PersistedObject::ordinary(20, ClassId::TEXTURE_2D, "Texture2D"),
    ]);
    let exporter = RecordingExporter::ok();
    let imported = ImportedExporter;

    let data = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();
    let texture = AssetExportCollection::new(&imported, &container, obj(&container, 20)).unwrap();
    let collections: Vec<&dyn ExportCollection<'_>> = vec![&data, &texture];

    let owner = collections
        .iter()
        .find(|c| c.contains(obj(&container, 20)))
        .unwrap();
    let ptr = owner.create_export_pointer(obj(&container, 20), false).unwrap();
    assert_eq!(ptr, MetaPtr::foreign(ExportId(4_900_000), texture.guid(), AssetType::Meta));

    let inner = data.create_export_pointer(obj(&container, 2), true).unwrap();
    assert_eq!(inner, MetaPtr::local(ExportId(2)));

    let err = data.export_id(obj(&container, 20)).unwrap_err();
    assert!(matches!(err, CollectionError::NotAMember(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// WRITE TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_write_produces_artifact_and_meta() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let container = build_container(vec![
        scriptable(1, &[2]).with_asset_bundle_name("items"),
        plain(2, &[]),
    ]);
    let exporter = RecordingExporter::ok();
    let guid = CollectionGuid::new_random();
    let collection =
        AssetExportCollection::with_guid(&exporter, &container, obj(&container, 1), guid).unwrap();

    let written = collection.write(&context(), dir.path()).unwrap();

    assert_eq!(
        written.file_path,
        dir.path().join("Assets").join("MonoBehaviour").join("MonoBehaviour_1.asset")
    );
    assert!(written.file_path.is_file());
    assert_eq!(exporter.calls.get(), 1);

    let meta: Meta = serde_json::from_slice(&std::fs::read(&written.meta_path).unwrap()).unwrap();
    assert_eq!(meta.guid, guid);
    assert_eq!(meta.importer.main_object_file_id, ExportId(1));
    assert_eq!(meta.importer.asset_bundle_name.as_deref(), Some("items"));
    assert!(meta.time_created.is_some());
}

#[test]
fn test_write_uses_directory_hint() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let container = build_container(vec![PersistedObject::ordinary(4, ClassId::TEXT_ASSET, "TextAsset")
        .with_original_name("Dialogue")
        .with_original_directory("Assets/Text/../Localization")]);
    let exporter = ImportedExporter;
    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 4)).unwrap();

    let first = collection.write(&context(), dir.path()).unwrap();
    let second = collection.write(&context(), dir.path()).unwrap();

    let expected_dir = dir.path().join("Assets").join("Text").join("Localization");
    assert_eq!(first.file_path, expected_dir.join("Dialogue.bytes"));
    assert_eq!(second.file_path, expected_dir.join("Dialogue_1.bytes"));
    assert!(second.meta_path.is_file());
}

#[test]
fn test_write_failure_produces_no_meta() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let container = build_container(vec![scriptable(1, &[])]);
    let exporter = RecordingExporter::failing();
    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 1)).unwrap();
    let ctx = context();

    let err = collection.write(&ctx, dir.path()).unwrap_err();

    let CollectionError::SerializationFailed { path, .. } = err else {
        panic!("expected SerializationFailed");
    };
    assert!(!path.exists());
    assert!(!ctx.meta_path(&path).exists());
    assert_eq!(exporter.calls.get(), 1);
}

#[test]
fn test_old_format_drops_bundle_name() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let container = build_container(vec![PersistedObject::ordinary(6, ClassId::MESH, "Mesh")
        .with_asset_bundle_name("level1")]);
    let exporter = RecordingExporter::ok();
    let settings = ExportSettings { write_time_created: false, ..ExportSettings::default() };
    let ctx = ExportContext::new(EngineVersion::new(4, 6, 0), settings);
    let collection = AssetExportCollection::new(&exporter, &container, obj(&container, 6)).unwrap();

    let written = collection.write(&ctx, dir.path()).unwrap();

    let meta: Meta = serde_json::from_slice(&std::fs::read(&written.meta_path).unwrap()).unwrap();
    assert!(meta.importer.asset_bundle_name.is_none());
    assert!(meta.time_created.is_none());
    assert_eq!(meta.importer.main_object_file_id, ExportId(4_300_000));
}
