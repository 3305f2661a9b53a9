use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;

use crate::constants::ID_SUFFIX_LEN;
use crate::invitation::Invitation;
use crate::media::MediaStore;

// The document store behind shareable invitation ids. Kept as a trait so
// the directory-backed implementation stays swappable, like the rest of
// the collaborators around the playback engine.
pub trait InvitationStore {
    fn get(&self, id: &str) -> Result<Option<Invitation>>;
    fn put(&self, id: &str, invitation: &Invitation) -> Result<()>;
    fn delete(&self, id: &str) -> Result<()>;
    fn list(&self) -> Result<Vec<(String, Invitation)>>;
}

// One pretty-printed JSON document per invitation under
// <root>/invitations/<id>.json.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.root.join("invitations").join(format!("{id}.json"))
    }
}

impl InvitationStore for DirStore {
    fn get(&self, id: &str) -> Result<Option<Invitation>> {
        let path = self.document_path(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let invitation = serde_json::from_str(&text)
            .with_context(|| format!("invalid invitation document {}", path.display()))?;
        Ok(Some(invitation))
    }

    fn put(&self, id: &str, invitation: &Invitation) -> Result<()> {
        let path = self.document_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(invitation)?;
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.document_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }

    fn list(&self) -> Result<Vec<(String, Invitation)>> {
        let dir = self.root.join("invitations");
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", dir.display())),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(invitation) = self.get(&id)? {
                records.push((id, invitation));
            }
        }
        Ok(records)
    }
}

// Shareable id: romanized first names run together, lowercased and
// stripped to ascii alphanumerics, e.g. "minkyuyoonjou".
pub fn derive_id(invitation: &Invitation) -> String {
    let id: String = format!(
        "{}{}",
        invitation.groom_english_first_name, invitation.bride_english_first_name
    )
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_lowercase())
    .collect();
    if id.is_empty() { "invitation".to_string() } else { id }
}

// Allocate an unused id, appending random letters when the name-derived
// one is already taken.
pub fn allocate_id(store: &dyn InvitationStore, invitation: &Invitation) -> Result<String> {
    let base = derive_id(invitation);
    if store.get(&base)?.is_none() {
        return Ok(base);
    }
    let mut rng = rand::rng();
    loop {
        let suffix: String = (0..ID_SUFFIX_LEN).map(|_| rng.random_range('a'..='z')).collect();
        let candidate = format!("{base}{suffix}");
        if store.get(&candidate)?.is_none() {
            return Ok(candidate);
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<String>,
    pub failures: Vec<(String, String)>,
}

// Purge every invitation whose expiry has passed: media namespace first,
// then the document. One bad record does not stop the sweep.
pub fn cleanup_expired(
    store: &dyn InvitationStore,
    media: &MediaStore,
    now_ms: i64,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();
    for (id, invitation) in store.list()? {
        if !invitation.is_expired(now_ms) {
            continue;
        }
        let result = media
            .delete_namespace(&id)
            .and_then(|()| store.delete(&id));
        match result {
            Ok(()) => {
                info!("deleted expired invitation {id}");
                report.deleted.push(id);
            }
            Err(e) => {
                warn!("failed to delete expired invitation {id}: {e:#}");
                report.failures.push((id, format!("{e:#}")));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invitation::tests::sample;
    use tempfile::tempdir;

    #[test]
    fn documents_round_trip_through_the_directory() {
        let root = tempdir().unwrap();
        let store = DirStore::new(root.path());
        let invitation = sample(6);

        assert!(store.get("minkyuyoonjou").unwrap().is_none());
        store.put("minkyuyoonjou", &invitation).unwrap();
        assert_eq!(store.get("minkyuyoonjou").unwrap(), Some(invitation));

        store.delete("minkyuyoonjou").unwrap();
        assert!(store.get("minkyuyoonjou").unwrap().is_none());
        store.delete("minkyuyoonjou").unwrap(); // idempotent
    }

    #[test]
    fn list_returns_records_sorted_by_id() {
        let root = tempdir().unwrap();
        let store = DirStore::new(root.path());
        store.put("zoe", &sample(6)).unwrap();
        store.put("amy", &sample(7)).unwrap();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["amy", "zoe"]);
    }

    #[test]
    fn id_is_derived_from_romanized_first_names() {
        let invitation = sample(6);
        assert_eq!(derive_id(&invitation), "minkyuyoonjou");

        let mut anonymous = invitation;
        anonymous.groom_english_first_name = String::new();
        anonymous.bride_english_first_name = "  ".to_string();
        assert_eq!(derive_id(&anonymous), "invitation");
    }

    #[test]
    fn collisions_get_a_random_suffix() {
        let root = tempdir().unwrap();
        let store = DirStore::new(root.path());
        let invitation = sample(6);

        let first = allocate_id(&store, &invitation).unwrap();
        assert_eq!(first, "minkyuyoonjou");
        store.put(&first, &invitation).unwrap();

        let second = allocate_id(&store, &invitation).unwrap();
        assert_ne!(second, first);
        assert!(second.starts_with("minkyuyoonjou"));
        assert_eq!(second.len(), first.len() + ID_SUFFIX_LEN);
    }

    #[test]
    fn cleanup_removes_expired_records_and_their_media() {
        let root = tempdir().unwrap();
        let photos = tempdir().unwrap();
        let store = DirStore::new(root.path());
        let media = MediaStore::new(root.path());

        let photo = photos.path().join("p.png");
        image::RgbImage::new(2, 2).save(&photo).unwrap();

        let mut expired = sample(6);
        expired.expires_at = 1_000;
        expired.image_paths = media.import_photos("old", &[photo.clone()]).unwrap();
        store.put("old", &expired).unwrap();

        let mut live = sample(6);
        live.expires_at = 5_000;
        store.put("new", &live).unwrap();

        let report = cleanup_expired(&store, &media, 2_000).unwrap();
        assert_eq!(report.deleted, vec!["old"]);
        assert!(report.failures.is_empty());
        assert!(store.get("old").unwrap().is_none());
        assert!(!media.resolve("media/old/000.jpg").exists());
        assert!(store.get("new").unwrap().is_some());
    }

    #[test]
    fn cleanup_ignores_records_that_never_expire() {
        let root = tempdir().unwrap();
        let store = DirStore::new(root.path());
        let media = MediaStore::new(root.path());
        store.put("forever", &sample(6)).unwrap(); // expires_at == 0
        let report = cleanup_expired(&store, &media, i64::MAX).unwrap();
        assert!(report.deleted.is_empty());
        assert!(store.get("forever").unwrap().is_some());
    }
}
