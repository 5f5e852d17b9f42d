//! Filesystem-backed JSON persistence for invoices, work definitions, and
//! sequence counters.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use tally_core::{
    storage::{BillingStorage, SequenceStore},
    CoreError,
};
use tally_domain::{Invoice, SequenceConfig, WorkDefinition};

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const SEQUENCE_FILE: &str = "sequences.json";

/// Directory layout used by the JSON backend.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub invoice_root: PathBuf,
    pub work_root: PathBuf,
    pub sequence_path: PathBuf,
}

impl StoragePaths {
    /// Standard layout under a single data root.
    pub fn under(root: &Path) -> Self {
        Self {
            invoice_root: root.join("invoices"),
            work_root: root.join("work"),
            sequence_path: root.join(SEQUENCE_FILE),
        }
    }
}

/// Filesystem JSON persistence for the billing core.
///
/// Sequence issuance serializes behind a shared mutex: the counter file is
/// read, advanced, and atomically replaced before the reserved number is
/// handed out, so concurrent callers never observe the same value.
#[derive(Clone)]
pub struct JsonBillingStorage {
    paths: StoragePaths,
    sequence_lock: Arc<Mutex<()>>,
}

impl JsonBillingStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.invoice_root)?;
        fs::create_dir_all(&paths.work_root)?;
        if let Some(parent) = paths.sequence_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            paths,
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn invoice_path(&self, number: &str) -> PathBuf {
        self.paths
            .invoice_root
            .join(format!("{}.{}", canonical_name(number), FILE_EXTENSION))
    }

    pub fn work_path(&self, name: &str) -> PathBuf {
        self.paths
            .work_root
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn sequence_path(&self) -> &Path {
        &self.paths.sequence_path
    }

    fn lock_sequences(&self) -> MutexGuard<'_, ()> {
        self.sequence_lock
            .lock()
            .expect("sequence issuance lock poisoned")
    }

    fn read_sequences(&self) -> Result<Vec<SequenceConfig>, CoreError> {
        if !self.paths.sequence_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.paths.sequence_path)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn write_sequences(&self, sequences: &[SequenceConfig]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(sequences)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        write_atomic(&self.paths.sequence_path, &json)
    }
}

impl BillingStorage for JsonBillingStorage {
    fn save_invoice(&self, invoice: &Invoice) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(invoice)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        write_atomic(&self.invoice_path(&invoice.number), &json)
    }

    fn load_invoice(&self, number: &str) -> Result<Invoice, CoreError> {
        let path = self.invoice_path(number);
        if !path.exists() {
            return Err(CoreError::InvoiceNotFound(number.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn list_invoices(&self) -> Result<Vec<String>, CoreError> {
        list_stems(&self.paths.invoice_root)
    }

    fn delete_invoice(&self, number: &str) -> Result<(), CoreError> {
        let path = self.invoice_path(number);
        if !path.exists() {
            return Err(CoreError::InvoiceNotFound(number.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn save_work(&self, work: &WorkDefinition) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(work)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        write_atomic(&self.work_path(&work.name), &json)
    }

    fn load_work(&self, name: &str) -> Result<WorkDefinition, CoreError> {
        let path = self.work_path(name);
        if !path.exists() {
            return Err(CoreError::WorkNotFound(name.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn list_work(&self) -> Result<Vec<String>, CoreError> {
        list_stems(&self.paths.work_root)
    }

    fn delete_work(&self, name: &str) -> Result<(), CoreError> {
        let path = self.work_path(name);
        if !path.exists() {
            return Err(CoreError::WorkNotFound(name.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

impl SequenceStore for JsonBillingStorage {
    fn define(&self, config: &SequenceConfig) -> Result<(), CoreError> {
        let _guard = self.lock_sequences();
        let mut sequences = self.read_sequences()?;
        match sequences.iter_mut().find(|entry| entry.key == config.key) {
            Some(existing) => *existing = config.clone(),
            None => sequences.push(config.clone()),
        }
        self.write_sequences(&sequences)
    }

    fn get(&self, key: &str) -> Result<SequenceConfig, CoreError> {
        let _guard = self.lock_sequences();
        self.read_sequences()?
            .into_iter()
            .find(|entry| entry.key == key)
            .ok_or_else(|| CoreError::SequenceNotFound(key.to_string()))
    }

    fn list(&self) -> Result<Vec<SequenceConfig>, CoreError> {
        let _guard = self.lock_sequences();
        let mut sequences = self.read_sequences()?;
        sequences.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(sequences)
    }

    fn fetch_and_increment(&self, key: &str) -> Result<SequenceConfig, CoreError> {
        let _guard = self.lock_sequences();
        let mut sequences = self.read_sequences()?;
        let entry = sequences
            .iter_mut()
            .find(|entry| entry.key == key)
            .ok_or_else(|| CoreError::SequenceNotFound(key.to_string()))?;
        let reserved = entry.clone();
        *entry = entry.bumped();
        // The advanced counter hits disk before the number leaves this scope.
        self.write_sequences(&sequences)?;
        Ok(reserved)
    }
}

fn canonical_name(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !slug.is_empty() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

fn list_stems(dir: &Path) -> Result<Vec<String>, CoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
