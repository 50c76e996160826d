//! Export collection rooted at one standalone asset.
//!
//! ## Closure Discovery
//!
//! A scriptable asset may point, through its serialized fields, at plain
//! behaviours that exist only as sub-records of that asset. Those are pulled
//! into the same artifact so they are not emitted as orphaned files:
//!
//! 1. Load the behaviour's structure (a deferred structure is loaded once)
//! 2. Read its referenced path id set; stop if either is unavailable
//! 3. Scan the source container in enumeration order for referenced objects
//!    that are not yet members
//! 4. Keep only behaviours that are neither scriptable nor scene-attached
//! 5. Append, assign an export id, then descend before moving on (depth-first)
//!
//! A member is appended and assigned exactly once before the walk descends
//! into it, so reference cycles terminate.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::canonical::canonical_hash_hex;
use crate::export::{
    fix_invalid_path_characters, unique_file_name, AssetExporter, ExportContext, Meta,
    NativeFormatImporter,
};
use crate::store::SourceContainer;
use crate::types::{
    AssetInfo, BehaviourData, CollectionGuid, ExportId, MetaPtr, PathId, PersistedObject,
};
use super::{CollectionError, ExportCollection, WrittenArtifact};

/// Export collection for one standalone primary asset and the plain
/// behaviours embedded in it.
pub struct AssetExportCollection<'a, E: AssetExporter + ?Sized, C: SourceContainer + ?Sized> {
    exporter: &'a E,
    container: &'a C,
    asset: &'a PersistedObject,
    guid: CollectionGuid,
    /// Members in discovery order, primary first.
    members: Vec<&'a PersistedObject>,
    export_ids: BTreeMap<AssetInfo, ExportId>,
}

impl<'a, E: AssetExporter + ?Sized, C: SourceContainer + ?Sized> AssetExportCollection<'a, E, C> {
    /// Build the collection for `asset` with a fresh GUID.
    ///
    /// # Errors
    /// - `InvalidPrimaryObject` if `asset` is a scene-attached behaviour
    /// - `ContainerMismatch` if `asset` was not loaded from `container`
    pub fn new(exporter: &'a E, container: &'a C, asset: &'a PersistedObject) -> Result<Self, CollectionError> {
        Self::with_guid(exporter, container, asset, CollectionGuid::new_random())
    }

    /// Build the collection for `asset` with a caller-supplied GUID.
    pub fn with_guid(
        exporter: &'a E,
        container: &'a C,
        asset: &'a PersistedObject,
        guid: CollectionGuid,
    ) -> Result<Self, CollectionError> {
        if asset.info().container != container.id() {
            return Err(CollectionError::ContainerMismatch {
                asset: asset.info(),
                container: container.id(),
            });
        }
        if asset.is_scene_behaviour() {
            return Err(CollectionError::InvalidPrimaryObject(asset.info()));
        }

        let mut collection = Self {
            exporter,
            container,
            asset,
            guid,
            members: Vec::new(),
            export_ids: BTreeMap::new(),
        };
        collection.push_member(asset);

        if asset.as_behaviour().is_some_and(BehaviourData::is_standalone_scriptable) {
            collection.add_embedded_behaviours(asset);
        }

        tracing::trace!(
            asset = %asset.info(),
            members = collection.members.len(),
            "Built asset export collection"
        );
        Ok(collection)
    }

    /// Depth-first walk over an explicit stack of
    /// (referrer, referenced ids, scan position) frames.
    fn add_embedded_behaviours(&mut self, root: &'a PersistedObject) {
        let container = self.container;
        let objects = container.objects();
        let mut stack: Vec<(&'a PersistedObject, &'a BTreeSet<PathId>, usize)> = Vec::new();
        if let Some(referenced) = root.structure().and_then(|s| s.referenced_path_ids()) {
            stack.push((root, referenced, 0));
        }

        while let Some((behaviour, referenced, cursor)) = stack.pop() {
            let mut found = None;
            for (index, candidate) in objects.iter().enumerate().skip(cursor) {
                if !referenced.contains(&candidate.path_id()) || self.contains(candidate) {
                    continue;
                }
                let Some(data) = candidate.as_behaviour() else {
                    continue;
                };
                if !data.is_embeddable() {
                    tracing::trace!(
                        candidate = %candidate.path_id(),
                        referrer = %behaviour.path_id(),
                        "Skipping standalone or scene behaviour"
                    );
                    continue;
                }
                found = Some((index, candidate));
                break;
            }
            let Some((index, candidate)) = found else {
                continue;
            };

            tracing::debug!(
                member = %candidate.path_id(),
                primary = %self.asset.path_id(),
                "Adding embedded behaviour"
            );
            self.push_member(candidate);

            // Resume the referrer after the child's subtree is done.
            stack.push((behaviour, referenced, index + 1));
            if let Some(child) = candidate.structure().and_then(|s| s.referenced_path_ids()) {
                stack.push((candidate, child, 0));
            }
        }
    }

    fn push_member(&mut self, asset: &'a PersistedObject) {
        let export_id = self.assign_export_id(asset);
        self.export_ids.insert(asset.info(), export_id);
        self.members.push(asset);
    }

    /// Behaviours keep their path id; everything else takes the exporter's
    /// main export id.
    fn assign_export_id(&self, asset: &PersistedObject) -> ExportId {
        if asset.is_behaviour() {
            ExportId(asset.path_id().0)
        } else {
            self.exporter.main_export_id(asset)
        }
    }

    /// The primary object.
    pub fn asset(&self) -> &'a PersistedObject {
        self.asset
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: the primary object is a member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// (identity key, export id) pairs in member order.
    pub fn export_ids(&self) -> impl Iterator<Item = (AssetInfo, ExportId)> + '_ {
        self.members
            .iter()
            .filter_map(|m| self.export_ids.get(&m.info()).map(|id| (m.info(), *id)))
    }

    /// Hash of the ordered member list and export ids, GUID excluded.
    ///
    /// Rebuilding a collection from the same source data yields the same
    /// fingerprint.
    ///
    /// # Errors
    /// Propagates canonical serialization failures.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let members: Vec<(AssetInfo, ExportId)> = self.export_ids().collect();
        canonical_hash_hex(&members)
    }

    fn create_importer(&self, ctx: &ExportContext) -> Result<NativeFormatImporter, CollectionError> {
        let mut importer = NativeFormatImporter::create(ctx);
        importer.main_object_file_id = self.export_id(self.asset)?;
        if let Some(bundle) = self.asset.asset_bundle_name() {
            importer.set_asset_bundle_name(bundle);
        }
        Ok(importer)
    }
}

impl<E: AssetExporter + ?Sized, C: SourceContainer + ?Sized> fmt::Debug for AssetExportCollection<'_, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetExportCollection")
            .field("asset", &self.asset.info())
            .field("container", &self.container.name())
            .field("guid", &self.guid)
            .field("export_ids", &self.export_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, E: AssetExporter + ?Sized, C: SourceContainer + ?Sized> ExportCollection<'a>
    for AssetExportCollection<'a, E, C>
{
    fn guid(&self) -> CollectionGuid {
        self.guid
    }

    fn name(&self) -> String {
        self.asset.best_name()
    }

    fn assets(&self) -> &[&'a PersistedObject] {
        &self.members
    }

    fn contains(&self, asset: &PersistedObject) -> bool {
        self.export_ids.contains_key(&asset.info())
    }

    fn export_id(&self, asset: &PersistedObject) -> Result<ExportId, CollectionError> {
        self.export_ids
            .get(&asset.info())
            .copied()
            .ok_or(CollectionError::NotAMember(asset.info()))
    }

    fn create_export_pointer(&self, asset: &PersistedObject, is_local: bool) -> Result<MetaPtr, CollectionError> {
        let export_id = self.export_id(asset)?;
        if is_local {
            Ok(MetaPtr::local(export_id))
        } else {
            Ok(MetaPtr::foreign(export_id, self.guid, self.exporter.export_type(self.asset)))
        }
    }

    fn write(&self, ctx: &ExportContext, project_dir: &Path) -> Result<WrittenArtifact, CollectionError> {
        let asset = self.asset;
        let sub_path = match asset.original_directory() {
            Some(dir) => project_dir.join(fix_invalid_path_characters(dir)),
            None => project_dir
                .join(&ctx.settings().assets_dir)
                .join(asset.class_name()),
        };
        std::fs::create_dir_all(&sub_path)?;

        let file_name = unique_file_name(&sub_path, &asset.best_name(), self.exporter.file_extension(asset));
        let file_path = sub_path.join(file_name);

        if !self.exporter.export(ctx, asset, &file_path) {
            tracing::warn!(
                asset = %asset.info(),
                path = %file_path.display(),
                "Exporter failed, skipping meta"
            );
            return Err(CollectionError::SerializationFailed {
                asset: asset.info(),
                path: file_path,
            });
        }

        let meta = Meta::new(self.guid, self.create_importer(ctx)?);
        let meta_path = ctx.export_meta(&meta, &file_path)?;

        tracing::info!(
            asset = %asset.info(),
            guid = %self.guid,
            members = self.members.len(),
            path = %file_path.display(),
            "Exported asset collection"
        );
        Ok(WrittenArtifact { file_path, meta_path })
    }
}
