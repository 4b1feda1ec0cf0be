//! In-memory port implementations shared by use-case tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{CoreError, MetadataKey, NewRecord, PainRecord, RecordId, RecordPatch};
use crate::ports::{
    AccessToken, AuthHandshake, Connectivity, RecordFilter, RecordStore, RemoteId, RemoteStore,
    ResourceKind, SortOrder,
};

// ============================================================================
// MemoryRecordStore
// ============================================================================

/// Millisecond-precision now, matching what survives the wire format
fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

#[derive(Default)]
pub(crate) struct MemoryRecordStore {
    records: Mutex<Vec<PainRecord>>,
    metadata: Mutex<HashMap<&'static str, String>>,
}

impl MemoryRecordStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn records(&self) -> Vec<PainRecord> {
        self.records.lock().unwrap().clone()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.lock().unwrap().iter().position(|r| &r.id == id)
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, values: NewRecord) -> Result<PainRecord, CoreError> {
        let record = values.into_record(RecordId::generate(), now_ms());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, patch: RecordPatch) -> Result<PainRecord, CoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        patch.apply(record, now_ms());
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        self.records.lock().unwrap().retain(|r| &r.id != id);
        Ok(())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
    ) -> Result<Vec<PainRecord>, CoreError> {
        let cutoff = filter.cutoff(Utc::now());
        let mut matches: Vec<PainRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.pain >= filter.min_pain)
            .filter(|r| cutoff.map_or(true, |c| r.start_at >= c))
            .filter(|r| {
                filter
                    .region_key
                    .as_deref()
                    .map_or(true, |k| r.region.key == k)
            })
            .filter(|r| {
                filter
                    .joint_key
                    .as_deref()
                    .map_or(true, |k| r.joint.as_ref().is_some_and(|j| j.key == k))
            })
            .cloned()
            .collect();
        match order {
            SortOrder::NewestFirst => matches.sort_by(|a, b| b.start_at.cmp(&a.start_at)),
            SortOrder::OldestFirst => matches.sort_by(|a, b| a.start_at.cmp(&b.start_at)),
        }
        Ok(matches)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<PainRecord>, CoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }

    async fn put(&self, record: &PainRecord) -> Result<(), CoreError> {
        match self.position(&record.id) {
            Some(i) => self.records.lock().unwrap()[i] = record.clone(),
            None => self.records.lock().unwrap().push(record.clone()),
        }
        Ok(())
    }

    async fn get_metadata(&self, key: MetadataKey) -> Result<Option<String>, CoreError> {
        Ok(self.metadata.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn set_metadata(&self, key: MetadataKey, value: &str) -> Result<(), CoreError> {
        self.metadata
            .lock()
            .unwrap()
            .insert(key.as_str(), value.to_string());
        Ok(())
    }

    async fn clear_metadata(&self) -> Result<(), CoreError> {
        self.metadata.lock().unwrap().clear();
        Ok(())
    }
}

// ============================================================================
// MemoryRemoteStore
// ============================================================================

struct RemoteResource {
    id: RemoteId,
    name: String,
    kind: ResourceKind,
    parents: Vec<RemoteId>,
    content: String,
}

/// Fake drive: a flat list of named resources with parent links.
///
/// Records the method names it serves, in order, so tests can assert on the
/// remote call sequence.
#[derive(Default)]
pub(crate) struct MemoryRemoteStore {
    resources: Mutex<Vec<RemoteResource>>,
    next_id: AtomicU32,
    calls: Mutex<Vec<String>>,
}

impl MemoryRemoteStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn mint_id(&self) -> RemoteId {
        RemoteId::new(format!("res-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn log(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn seed_folder(&self, name: &str) -> RemoteId {
        let id = self.mint_id();
        self.resources.lock().unwrap().push(RemoteResource {
            id: id.clone(),
            name: name.to_string(),
            kind: ResourceKind::Folder,
            parents: Vec::new(),
            content: String::new(),
        });
        id
    }

    pub(crate) fn seed_file(&self, name: &str, parent: &RemoteId, content: &str) -> RemoteId {
        let id = self.mint_id();
        self.resources.lock().unwrap().push(RemoteResource {
            id: id.clone(),
            name: name.to_string(),
            kind: ResourceKind::File,
            parents: vec![parent.clone()],
            content: content.to_string(),
        });
        id
    }

    pub(crate) fn content_of(&self, id: &RemoteId) -> Option<String> {
        self.resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.content.clone())
    }

    pub(crate) fn parents_of(&self, id: &RemoteId) -> Vec<RemoteId> {
        self.resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.parents.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn find_child(
        &self,
        _token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
        kind: ResourceKind,
    ) -> Result<Option<RemoteId>, CoreError> {
        self.log("find_child");
        Ok(self
            .resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.name == name
                    && r.kind == kind
                    && match parent {
                        Some(p) => r.parents.contains(p),
                        None => r.parents.is_empty(),
                    }
            })
            .map(|r| r.id.clone()))
    }

    async fn create_folder(
        &self,
        _token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, CoreError> {
        self.log("create_folder");
        let id = self.mint_id();
        self.resources.lock().unwrap().push(RemoteResource {
            id: id.clone(),
            name: name.to_string(),
            kind: ResourceKind::Folder,
            parents: parent.cloned().into_iter().collect(),
            content: String::new(),
        });
        Ok(id)
    }

    async fn create_file(
        &self,
        _token: &AccessToken,
        name: &str,
        parent: &RemoteId,
        content: &str,
    ) -> Result<RemoteId, CoreError> {
        self.log("create_file");
        Ok(self.seed_file(name, parent, content))
    }

    async fn get_parents(
        &self,
        _token: &AccessToken,
        id: &RemoteId,
    ) -> Result<Vec<RemoteId>, CoreError> {
        self.log("get_parents");
        Ok(self.parents_of(id))
    }

    async fn set_parents(
        &self,
        _token: &AccessToken,
        id: &RemoteId,
        add: &RemoteId,
        remove: &[RemoteId],
    ) -> Result<(), CoreError> {
        self.log("set_parents");
        let mut resources = self.resources.lock().unwrap();
        let resource = resources
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| CoreError::RemoteRequestFailed(format!("no such resource: {id}")))?;
        resource.parents.retain(|p| !remove.contains(p));
        if !resource.parents.contains(add) {
            resource.parents.push(add.clone());
        }
        Ok(())
    }

    async fn read_file(&self, _token: &AccessToken, id: &RemoteId) -> Result<String, CoreError> {
        self.log("read_file");
        self.content_of(id)
            .ok_or_else(|| CoreError::RemoteRequestFailed(format!("no such resource: {id}")))
    }

    async fn overwrite_file(
        &self,
        _token: &AccessToken,
        id: &RemoteId,
        content: &str,
    ) -> Result<(), CoreError> {
        self.log("overwrite_file");
        let mut resources = self.resources.lock().unwrap();
        let resource = resources
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| CoreError::RemoteRequestFailed(format!("no such resource: {id}")))?;
        resource.content = content.to_string();
        Ok(())
    }
}

// ============================================================================
// Session doubles
// ============================================================================

/// Handshake that always succeeds with a fixed token
pub(crate) struct StaticHandshake(pub(crate) &'static str);

#[async_trait::async_trait]
impl AuthHandshake for StaticHandshake {
    async fn authorize(&self) -> Result<AccessToken, CoreError> {
        Ok(AccessToken::new(self.0))
    }
}

pub(crate) struct AlwaysOnline;

#[async_trait::async_trait]
impl Connectivity for AlwaysOnline {
    async fn is_online(&self) -> bool {
        true
    }
}
