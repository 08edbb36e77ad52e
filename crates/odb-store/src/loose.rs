use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use odb_types::ObjectId;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Filesystem object store using the loose-object layout.
///
/// Each object lives at `<root>/<first 2 hex>/<remaining 38 hex>` as a
/// zlib-compressed frame. The root must already exist; fan-out directories
/// are created on first write.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    root: PathBuf,
    config: StoreConfig,
}

impl LooseObjectStore {
    /// Open a store rooted at `root` with the default configuration.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: StoreConfig::default(),
        }
    }

    /// Open a store with an explicit configuration.
    ///
    /// Fails with `Config` if the configuration is out of range.
    pub fn with_config(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            root: root.into(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Where the object with this address is (or would be) stored.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.fanout()).join(id.rest())
    }

    /// Every address present on disk, sorted. Stray files are skipped.
    pub fn all_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for dir in fs::read_dir(&self.root)? {
            let dir = dir?;
            let prefix = dir.file_name();
            let Some(prefix) = prefix.to_str() else { continue };
            if prefix.len() != 2 || !dir.file_type()?.is_dir() {
                continue;
            }
            for file in fs::read_dir(dir.path())? {
                let file = file?;
                let name = file.file_name();
                let Some(rest) = name.to_str() else { continue };
                match ObjectId::from_hex(&format!("{prefix}{rest}")) {
                    Ok(id) => ids.push(id),
                    Err(_) => tracing::trace!(?name, "skipping non-object file"),
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn compress(&self, frame: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(frame.len() / 2),
            Compression::new(self.config.compression_level),
        );
        encoder.write_all(frame)?;
        encoder.finish()
    }

    /// Write to a temp file next to the target and rename it into place
    /// without replacing an existing object.
    fn persist_staged(&self, dir: &Path, path: &Path, compressed: &[u8]) -> StoreResult<bool> {
        let mut tmp = tempfile::Builder::new().prefix("tmp_obj_").tempfile_in(dir)?;
        tmp.write_all(compressed)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    }

    fn persist_direct(&self, path: &Path, compressed: &[u8]) -> StoreResult<bool> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        file.write_all(compressed)?;
        Ok(true)
    }
}

impl ObjectStore for LooseObjectStore {
    fn read_frame(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(*id)),
            Err(e) => return Err(e.into()),
        };
        let mut frame = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut frame)
            .map_err(|e| StoreError::malformed(None, format!("{id}: bad zlib stream: {e}")))?;
        tracing::trace!(%id, compressed = compressed.len(), size = frame.len(), "inflated object");
        Ok(frame)
    }

    fn write_frame(&self, id: &ObjectId, frame: &[u8]) -> StoreResult<bool> {
        let path = self.object_path(id);
        if path.exists() {
            return Ok(false);
        }
        let dir = self.root.join(id.fanout());
        fs::create_dir_all(&dir)?;
        let compressed = self.compress(frame)?;
        if self.config.staged_writes {
            self.persist_staged(&dir, &path, &compressed)
        } else {
            self.persist_direct(&path, &compressed)
        }
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}
