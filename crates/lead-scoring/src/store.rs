use crate::domain::{Lead, ScoredLead, StoredOffer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

const OFFERS_FILE: &str = "offers.json";
const LEADS_FILE: &str = "leads.json";
const RESULTS_FILE: &str = "results.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-document persistence seam for the three singletons the service
/// holds: the current offer, the current lead set, and the latest result
/// batch. Every put replaces the previous document wholesale.
pub trait DocumentStore: Send + Sync {
    fn put_offer(&self, offer: &StoredOffer) -> Result<(), StoreError>;
    fn get_offer(&self) -> Result<Option<StoredOffer>, StoreError>;
    fn put_leads(&self, leads: &[Lead]) -> Result<(), StoreError>;
    fn get_leads(&self) -> Result<Option<Vec<Lead>>, StoreError>;
    fn put_results(&self, results: &[ScoredLead]) -> Result<(), StoreError>;
    fn get_results(&self) -> Result<Option<Vec<ScoredLead>>, StoreError>;
}

/// JSON documents on disk under a data directory. Writes go through a temp
/// file and a rename so readers never observe a partial document.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn write_document<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let staging = self.dir.join(format!("{name}.tmp"));
        let json = serde_json::to_vec_pretty(value)?;
        fs::write(&staging, json)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let raw = match fs::read(self.dir.join(name)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }
}

impl DocumentStore for JsonFileStore {
    fn put_offer(&self, offer: &StoredOffer) -> Result<(), StoreError> {
        self.write_document(OFFERS_FILE, offer)
    }

    fn get_offer(&self) -> Result<Option<StoredOffer>, StoreError> {
        self.read_document(OFFERS_FILE)
    }

    fn put_leads(&self, leads: &[Lead]) -> Result<(), StoreError> {
        self.write_document(LEADS_FILE, leads)
    }

    fn get_leads(&self) -> Result<Option<Vec<Lead>>, StoreError> {
        self.read_document(LEADS_FILE)
    }

    fn put_results(&self, results: &[ScoredLead]) -> Result<(), StoreError> {
        self.write_document(RESULTS_FILE, results)
    }

    fn get_results(&self) -> Result<Option<Vec<ScoredLead>>, StoreError> {
        self.read_document(RESULTS_FILE)
    }
}

/// Mutex-guarded singletons, used by tests and handler-level exercising.
#[derive(Default)]
pub struct InMemoryStore {
    offer: Mutex<Option<StoredOffer>>,
    leads: Mutex<Option<Vec<Lead>>>,
    results: Mutex<Option<Vec<ScoredLead>>>,
}

impl DocumentStore for InMemoryStore {
    fn put_offer(&self, offer: &StoredOffer) -> Result<(), StoreError> {
        *self.offer.lock().expect("store mutex poisoned") = Some(offer.clone());
        Ok(())
    }

    fn get_offer(&self) -> Result<Option<StoredOffer>, StoreError> {
        Ok(self.offer.lock().expect("store mutex poisoned").clone())
    }

    fn put_leads(&self, leads: &[Lead]) -> Result<(), StoreError> {
        *self.leads.lock().expect("store mutex poisoned") = Some(leads.to_vec());
        Ok(())
    }

    fn get_leads(&self) -> Result<Option<Vec<Lead>>, StoreError> {
        Ok(self.leads.lock().expect("store mutex poisoned").clone())
    }

    fn put_results(&self, results: &[ScoredLead]) -> Result<(), StoreError> {
        *self.results.lock().expect("store mutex poisoned") = Some(results.to_vec());
        Ok(())
    }

    fn get_results(&self) -> Result<Option<Vec<ScoredLead>>, StoreError> {
        Ok(self.results.lock().expect("store mutex poisoned").clone())
    }
}
