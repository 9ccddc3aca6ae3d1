/// JSON-file-backed item and session stores.
///
/// Layout under the data directory:
///   items.json          array of loosely-shaped item records
///   sessions/<id>.json  one serialized session per file
///
/// Records are validated into typed values here; nothing untyped reaches the engine.
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use suparank_core::{Error, Item, ItemStore, Result, Session, SessionId, SessionStore};
use tracing::{debug, warn};

/// Title given to item records that have none.
pub const UNTITLED: &str = "Untitled";

const ITEMS_FILE: &str = "items.json";
const SESSIONS_DIR: &str = "sessions";
const ITEM_ID_PREFIX: &str = "rec";
const SESSION_ID_PREFIX: &str = "ses";
const ID_SUFFIX_LEN: usize = 14;

/// Item as stored on disk: an ID plus a free-form field map.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct ItemRecord {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl ItemRecord {
    fn new(id: String, title: &str, description: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("Title".to_string(), Value::from(title));
        fields.insert("Description".to_string(), Value::from(description));
        ItemRecord { id, fields }
    }

    fn to_item(&self) -> Item {
        let text = |key: &str| self.fields.get(key).and_then(Value::as_str).map(str::to_string);
        Item {
            id: self.id.clone(),
            title: text("Title").unwrap_or_else(|| UNTITLED.to_string()),
            description: text("Description").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let store = FileStore {
            root: root.to_path_buf(),
        };
        fs::create_dir_all(store.sessions_dir()).map_err(|e| unavailable(&store.root, e))?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn items_path(&self) -> PathBuf {
        self.root.join(ITEMS_FILE)
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// `None` for IDs that could not have been allocated by this store.
    fn session_path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.sessions_dir().join(format!("{id}.json")))
    }

    fn read_item_records(&self) -> Result<Vec<ItemRecord>> {
        let path = self.items_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable(&path, e)),
        };
        let raw: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
            Error::StoreUnavailable(format!("{} is not a JSON array: {e}", path.display()))
        })?;

        let mut records: Vec<ItemRecord> = Vec::with_capacity(raw.len());
        let mut seen = HashSet::new();
        for value in raw {
            match serde_json::from_value::<ItemRecord>(value) {
                Ok(record) if !is_valid_id(&record.id) => {
                    warn!(id = %record.id, "skipping item record with unusable id");
                }
                Ok(record) if !seen.insert(record.id.clone()) => {
                    warn!(id = %record.id, "skipping item record with duplicate id");
                }
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping malformed item record: {e}"),
            }
        }
        Ok(records)
    }

    fn write_item_records(&self, records: &[ItemRecord]) -> Result<()> {
        let path = self.items_path();
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| Error::StoreUnavailable(format!("failed to encode items: {e}")))?;
        write_atomic(&path, &json)
    }

    fn write_session(&self, path: &Path, state: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::StoreUnavailable(format!("failed to encode session: {e}")))?;
        write_atomic(path, &json)
    }

    /// IDs of every stored session.
    pub fn session_ids(&self) -> Result<Vec<SessionId>> {
        let dir = self.sessions_dir();
        let entries = fs::read_dir(&dir).map_err(|e| unavailable(&dir, e))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| unavailable(&dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl SessionStore for FileStore {
    fn create(&mut self, state: &Session) -> Result<SessionId> {
        let (id, path) = loop {
            let id = new_record_id(SESSION_ID_PREFIX);
            if let Some(path) = self.session_path(&id) {
                if !path.exists() {
                    break (id, path);
                }
            }
        };
        self.write_session(&path, state)?;
        debug!(session = %id, "created session file");
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Session> {
        let path = self.session_path(id).ok_or_else(|| Error::session_not_found(id))?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::session_not_found(id)),
            Err(e) => return Err(unavailable(&path, e)),
        };

        let session: Session = serde_json::from_str(&content).map_err(|e| {
            warn!(session = %id, "unreadable session record: {e}");
            Error::session_not_found(id)
        })?;
        if let Err(reason) = session.validate() {
            warn!(session = %id, "inconsistent session record: {reason}");
            return Err(Error::session_not_found(id));
        }
        Ok(session)
    }

    fn save(&mut self, id: &str, state: &Session) -> Result<()> {
        let path = self.session_path(id).ok_or_else(|| Error::session_not_found(id))?;
        if !path.exists() {
            return Err(Error::session_not_found(id));
        }
        self.write_session(&path, state)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let path = self.session_path(id).ok_or_else(|| Error::session_not_found(id))?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::session_not_found(id)),
            Err(e) => Err(unavailable(&path, e)),
        }
    }
}

impl ItemStore for FileStore {
    fn list_all(&self) -> Result<Vec<Item>> {
        Ok(self.read_item_records()?.iter().map(ItemRecord::to_item).collect())
    }

    fn get(&self, id: &str) -> Result<Item> {
        self.read_item_records()?
            .iter()
            .find(|record| record.id == id)
            .map(ItemRecord::to_item)
            .ok_or_else(|| Error::item_not_found(id))
    }

    fn create(&mut self, title: &str, description: &str) -> Result<Item> {
        let mut records = self.read_item_records()?;
        let id = loop {
            let id = new_record_id(ITEM_ID_PREFIX);
            if !records.iter().any(|record| record.id == id) {
                break id;
            }
        };
        let record = ItemRecord::new(id, title, description);
        let item = record.to_item();
        records.push(record);
        self.write_item_records(&records)?;
        Ok(item)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut records = self.read_item_records()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(Error::item_not_found(id));
        }
        self.write_item_records(&records)
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> Error {
    Error::StoreUnavailable(format!("{}: {err}", path.display()))
}

/// Write via a sibling temp file and rename, so readers never see half a file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| unavailable(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| unavailable(path, e))
}

fn new_record_id(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{prefix}{suffix}")
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
