//! LabelStore: one observer's converging label table.
//!
//! Concurrency: a coarse `RwLock` guards the in-memory table and an
//! independent `Mutex` guards disk I/O. `persist` copies the table under the
//! read lock and releases it before writing, so votes keep flowing while a
//! snapshot is on its way to disk. Lock order is always I/O then table.

pub mod backup;
mod codec;
mod count_index;
mod table;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hexrecon_core::config::StoreConfig;
use hexrecon_core::{ImageId, Label, LabelRecord, LabelSource, StoreError};
use rand::Rng;
use tracing::{debug, error, info, trace};

use self::table::LabelTable;

/// How a store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Refuse every mutation and never write to disk.
    pub read_only: bool,
    /// Move the previous table to `<path>~<epoch>~` before persisting.
    pub save_backups: bool,
    /// Persist a modified writable store when it is dropped.
    pub persist_on_drop: bool,
}

impl StoreOptions {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            save_backups: false,
            persist_on_drop: false,
        }
    }

    /// Writable, but nothing reaches disk unless `persist` is called.
    pub fn ephemeral() -> Self {
        Self {
            read_only: false,
            save_backups: false,
            persist_on_drop: false,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            read_only: false,
            save_backups: config.effective_save_backups(),
            persist_on_drop: config.effective_persist_on_drop(),
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            save_backups: true,
            persist_on_drop: true,
        }
    }
}

/// A persistent mapping from image identity to a converging
/// `(label, count)` record, with a reverse count index.
///
/// Records are created by [`force_set`](Self::force_set) and only ever
/// changed by [`vote`](Self::vote) or `force_set`; they are never deleted.
pub struct LabelStore {
    path: PathBuf,
    options: StoreOptions,
    table: RwLock<LabelTable>,
    io: Mutex<()>,
    persisted_generation: AtomicU64,
}

impl LabelStore {
    /// Load the table at `path`.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let table = load_table(&path)?;
        info!(
            path = %path.display(),
            identities = table.len(),
            read_only = options.read_only,
            "opened label store"
        );
        Ok(Self::with_table(path, options, table, 0))
    }

    /// Load the table at `path` read-only.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(path, StoreOptions::read_only())
    }

    /// Write an empty table to `path` (which must not exist) and open it.
    pub fn create(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if options.read_only {
            return Err(StoreError::ReadOnly {
                path: path.display().to_string(),
            });
        }
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StoreError::AlreadyExists {
                    path: path.display().to_string(),
                },
                _ => StoreError::io(&path, e),
            })?;
        codec::write_table(BufWriter::new(file), &[]).map_err(|e| io_error(&path, e))?;
        info!(path = %path.display(), "created label store");
        Ok(Self::with_table(path, options, LabelTable::default(), 0))
    }

    /// Build a store in memory. Nothing is read from `path`; it is only
    /// where `persist` will write. The store starts out modified.
    pub fn from_records<I>(path: impl AsRef<Path>, records: I, options: StoreOptions) -> Self
    where
        I: IntoIterator<Item = (ImageId, LabelRecord)>,
    {
        let mut table = LabelTable::default();
        for (id, record) in records {
            table.force_set(id, record);
        }
        table.set_generation(1);
        Self::with_table(path.as_ref().to_path_buf(), options, table, 0)
    }

    fn with_table(path: PathBuf, options: StoreOptions, table: LabelTable, persisted: u64) -> Self {
        Self {
            path,
            options,
            table: RwLock::new(table),
            io: Mutex::new(()),
            persisted_generation: AtomicU64::new(persisted),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    // ---- Lookups ----

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.contains(id))
    }

    /// The record for `id`; fails with `UnknownIdentity` if it is not tracked.
    pub fn get(&self, id: &str) -> Result<LabelRecord, StoreError> {
        self.read()?
            .get(id)
            .ok_or_else(|| self.unknown(id))
    }

    /// How many identities have a count of exactly `n`.
    pub fn count_exactly(&self, n: u32) -> Result<usize, StoreError> {
        Ok(self.read()?.count_exactly(n))
    }

    /// How many identities have a count of at least `n`.
    pub fn count_at_least(&self, n: u32) -> Result<usize, StoreError> {
        Ok(self.read()?.count_at_least(n))
    }

    /// `(count, identities)` for every count currently held, ascending.
    pub fn count_histogram(&self) -> Result<Vec<(u32, usize)>, StoreError> {
        Ok(self.read()?.histogram())
    }

    /// Any identity, chosen uniformly at random.
    pub fn sample_uniform(&self) -> Result<Option<ImageId>, StoreError> {
        self.sample_uniform_with(&mut rand::thread_rng())
    }

    pub fn sample_uniform_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<ImageId>, StoreError> {
        Ok(self.read()?.sample_uniform(rng).cloned())
    }

    /// An identity with a count of exactly `n`, chosen uniformly at random.
    pub fn sample_with_count(&self, n: u32) -> Result<Option<ImageId>, StoreError> {
        self.sample_with_count_with(n, &mut rand::thread_rng())
    }

    pub fn sample_with_count_with<R: Rng + ?Sized>(
        &self,
        n: u32,
        rng: &mut R,
    ) -> Result<Option<ImageId>, StoreError> {
        Ok(self.read()?.sample_with_count(n, rng).cloned())
    }

    /// The first identity in table order. Cheaper than sampling.
    pub fn example_identity(&self) -> Result<Option<ImageId>, StoreError> {
        Ok(self.read()?.first().cloned())
    }

    /// `(identity, label)` for every count >= `n`, in table order.
    pub fn all_with_count_at_least(&self, n: u32) -> Result<Vec<(ImageId, Label)>, StoreError> {
        Ok(self.read()?.labels_where(|count| count >= n))
    }

    /// `(identity, label)` for every count == `n`, in table order.
    pub fn all_with_count_exactly(&self, n: u32) -> Result<Vec<(ImageId, Label)>, StoreError> {
        Ok(self.read()?.labels_where(|count| count == n))
    }

    /// Owned copy of every row, in table order.
    pub fn records(&self) -> Result<Vec<(ImageId, LabelRecord)>, StoreError> {
        Ok(self.read()?.snapshot())
    }

    /// Check that the count index agrees with the records.
    pub fn check_index_consistency(&self) -> Result<(), String> {
        self.read()
            .map_err(|e| e.to_string())?
            .check_consistency()
    }

    // ---- Mutations ----

    /// Record one vote for `proposed` on `id`.
    ///
    /// An empty record, or one already holding `proposed`, gains a vote.
    /// Any other record loses one, dropping back to `0000` when it runs out.
    /// Returns the record after the vote.
    pub fn vote(&self, id: &str, proposed: Label) -> Result<LabelRecord, StoreError> {
        self.check_writable()?;
        let (before, after) = self
            .write()?
            .vote(id, proposed)
            .ok_or_else(|| self.unknown(id))?;
        trace!(
            id,
            %proposed,
            before = %before.label,
            before_count = before.count,
            after = %after.label,
            after_count = after.count,
            "vote"
        );
        Ok(after)
    }

    /// Overwrite `id` with `(label, count)`, registering it if new.
    pub fn force_set(&self, id: impl Into<ImageId>, label: Label, count: u32) -> Result<(), StoreError> {
        self.check_writable()?;
        let id = id.into();
        trace!(id = %id, %label, count, "force set");
        self.write()?.force_set(id, LabelRecord::new(label, count));
        Ok(())
    }

    /// Vote `label` twice for every tracked identity in `ids`, skipping
    /// untracked ones. Used for regions whose contents are known in advance.
    /// Returns how many identities were voted.
    pub fn confirm_known<I, S>(&self, ids: I, label: Label) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_writable()?;
        let mut table = self.write()?;
        let mut touched = 0;
        for id in ids {
            let id = id.as_ref();
            if table.vote(id, label).is_some() {
                table.vote(id, label);
                touched += 1;
            }
        }
        debug!(path = %self.path.display(), %label, touched, "confirmed known labels");
        Ok(touched)
    }

    // ---- Persistence ----

    /// Whether the table changed since it was loaded or last persisted.
    pub fn is_dirty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.generation() > self.persisted_generation.load(Ordering::SeqCst))
    }

    /// Write the table to disk, first moving the previous file to a
    /// timestamped backup unless backups are disabled.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        let _io = self.lock_io()?;

        let (rows, generation) = {
            let table = self.read()?;
            (table.snapshot(), table.generation())
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = temp_table_builder()
            .tempfile_in(dir)
            .map_err(|e| StoreError::io(dir, e))?;
        // The replacement keeps the mode of the table it replaces.
        match fs::metadata(&self.path) {
            Ok(meta) => tmp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| StoreError::io(tmp.path(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&self.path, e)),
        }
        codec::write_table(BufWriter::new(tmp.as_file_mut()), &rows)
            .map_err(|e| io_error(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        let backup = if self.options.save_backups {
            backup::rotate(&self.path)?
        } else {
            None
        };
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        self.persisted_generation.fetch_max(generation, Ordering::SeqCst);
        info!(
            path = %self.path.display(),
            rows = rows.len(),
            backup = ?backup,
            "persisted label store"
        );
        Ok(())
    }

    /// Re-read the table from disk, discarding in-memory changes.
    /// A failed load leaves the current state untouched.
    pub fn reload(&self) -> Result<(), StoreError> {
        let _io = self.lock_io()?;
        let mut fresh = load_table(&self.path)?;
        let mut table = self.write()?;
        let generation = table.generation() + 1;
        fresh.set_generation(generation);
        *table = fresh;
        self.persisted_generation.store(generation, Ordering::SeqCst);
        info!(path = %self.path.display(), identities = table.len(), "reloaded label store");
        Ok(())
    }

    /// Persist if modified, then release the store.
    pub fn close(mut self) -> Result<(), StoreError> {
        let result = if !self.options.read_only && self.is_dirty()? {
            self.persist()
        } else {
            Ok(())
        };
        self.options.persist_on_drop = false;
        result
    }

    // ---- Internals ----

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.options.read_only {
            return Err(StoreError::ReadOnly {
                path: self.path.display().to_string(),
            });
        }
        Ok(())
    }

    fn unknown(&self, id: &str) -> StoreError {
        StoreError::UnknownIdentity {
            id: id.to_string(),
            path: self.path.display().to_string(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LabelTable>, StoreError> {
        self.table
            .read()
            .map_err(|_| StoreError::LockPoisoned { which: "label table" })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LabelTable>, StoreError> {
        self.table
            .write()
            .map_err(|_| StoreError::LockPoisoned { which: "label table" })
    }

    fn lock_io(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.io
            .lock()
            .map_err(|_| StoreError::LockPoisoned { which: "label store I/O" })
    }
}

impl Drop for LabelStore {
    fn drop(&mut self) {
        if self.options.read_only || !self.options.persist_on_drop {
            return;
        }
        match self.is_dirty() {
            Ok(false) => {}
            Ok(true) => {
                if let Err(e) = self.persist() {
                    error!(path = %self.path.display(), error = %e, "failed to persist label store on drop");
                }
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "cannot inspect label store on drop");
            }
        }
    }
}

impl std::fmt::Debug for LabelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelStore")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl LabelSource for LabelStore {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn lookup(&self, id: &str) -> Result<Option<LabelRecord>, StoreError> {
        Ok(self.read()?.get(id))
    }

    fn labels_with_count_at_least(&self, n: u32) -> Result<Vec<(ImageId, Label)>, StoreError> {
        self.all_with_count_at_least(n)
    }
}

/// Temp file builder for a table about to replace the one on disk. New
/// tables get the usual umask-governed mode rather than tempfile's 0600.
fn temp_table_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".hexrecon-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

fn load_table(path: &Path) -> Result<LabelTable, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    codec::read_table(BufReader::new(file), path)
}

fn io_error(path: &Path, err: csv::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
