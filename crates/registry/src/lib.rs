use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use common::{Error, Result, WatchSpec};

/// Durable symbol → watch mapping backed by a single JSON file.
///
/// Every mutation rewrites the whole file; the rewrite goes through a temp
/// file and an atomic rename, so a crash mid-write can never leave a torn
/// store behind. A process restart always observes the last successfully
/// applied mutation.
///
/// Callers share one instance behind `Arc<RwLock<_>>`: the scheduler takes
/// a snapshot per tick and applies its batch of removals through the write
/// lock, and the management API performs individual mutations the same way.
pub struct WatchRegistry {
    path: PathBuf,
    watches: BTreeMap<String, WatchSpec>,
}

impl WatchRegistry {
    /// Open the registry at `path`. A missing file is an empty registry,
    /// not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let watches = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, watches })
    }

    /// Insert or overwrite the watch for `symbol` and persist.
    ///
    /// The symbol is the key: a second add for the same symbol silently
    /// replaces the previous spec. An added watch is always armed, so
    /// re-adding a deactivated symbol reactivates it.
    pub fn add(&mut self, symbol: impl Into<String>, mut spec: WatchSpec) -> Result<()> {
        if spec.period == 0 {
            return Err(Error::InvalidSpec(
                "period must be a positive integer".to_string(),
            ));
        }

        let symbol = symbol.into();
        spec.active = true;
        info!(
            symbol,
            interval = %spec.interval,
            field = %spec.price_field,
            period = spec.period,
            condition = %spec.condition,
            "Watch added"
        );
        self.watches.insert(symbol, spec);
        self.persist()
    }

    /// Delete the watch if present and persist. Absent symbol is a no-op,
    /// not an error.
    pub fn remove(&mut self, symbol: &str) -> Result<()> {
        if self.watches.remove(symbol).is_some() {
            info!(symbol, "Watch removed");
            self.persist()
        } else {
            Ok(())
        }
    }

    /// Set `active = false` if present and persist. No-op if absent.
    /// There is no reactivate; a deactivated watch stays skipped until
    /// removed or re-added.
    pub fn deactivate(&mut self, symbol: &str) -> Result<()> {
        match self.watches.get_mut(symbol) {
            Some(spec) => {
                spec.active = false;
                info!(symbol, "Watch deactivated");
                self.persist()
            }
            None => Ok(()),
        }
    }

    /// Remove every listed symbol with a single store rewrite. Used by the
    /// scheduler to retire all watches that triggered in one tick.
    pub fn remove_batch<'a, I>(&mut self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = false;
        for symbol in symbols {
            if self.watches.remove(symbol).is_some() {
                debug!(symbol, "Watch retired");
                changed = true;
            }
        }
        if changed {
            self.persist()
        } else {
            Ok(())
        }
    }

    /// Point-in-time copy of every entry. Later mutations do not show
    /// through the snapshot.
    pub fn list(&self) -> Vec<(String, WatchSpec)> {
        self.watches
            .iter()
            .map(|(symbol, spec)| (symbol.clone(), spec.clone()))
            .collect()
    }

    /// Active entries only, as captured at the start of a tick.
    pub fn active(&self) -> Vec<(String, WatchSpec)> {
        self.watches
            .iter()
            .filter(|(_, spec)| spec.active)
            .map(|(symbol, spec)| (symbol.clone(), spec.clone()))
            .collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&WatchSpec> {
        self.watches.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Serialize the full mapping and swap it into place atomically.
    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.watches)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
