//! Slot-addressed firmware storage
//!
//! [`SlotStore`] maps the three named slots onto files in a firmware
//! directory and owns the copy discipline: the normal write path stages into
//! a temp file and commits with a rename, so a slot is never observed
//! holding a partial image unless someone used [`SlotStore::write_in_place`].
//! That primitive exists for fault-injection harnesses; the update manager
//! never calls it.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::config::FirmwareUpdateConfig;
use crate::error::FirmwareUpdateError;
use crate::slot::Slot;

const COPY_CHUNK: usize = 64 * 1024;

/// File-backed store for the three firmware slots
#[derive(Debug, Clone)]
pub struct SlotStore {
    installed: PathBuf,
    candidate: PathBuf,
    backup: PathBuf,
}

impl SlotStore {
    /// Build a store from the configured slot locations
    pub fn new(config: &FirmwareUpdateConfig) -> Self {
        Self {
            installed: config.firmware_dir.join(&config.installed_file),
            candidate: config.firmware_dir.join(&config.candidate_file),
            backup: config.firmware_dir.join(&config.backup_file),
        }
    }

    /// Path backing a slot
    pub fn slot_path(&self, slot: Slot) -> &Path {
        match slot {
            Slot::Installed => &self.installed,
            Slot::Candidate => &self.candidate,
            Slot::Backup => &self.backup,
        }
    }

    /// Whether the slot has ever been written
    pub async fn exists(&self, slot: Slot) -> bool {
        fs::try_exists(self.slot_path(slot)).await.unwrap_or(false)
    }

    /// Open a slot for reading
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::SlotNotFound`] if the slot has never been
    /// written, [`FirmwareUpdateError::Read`] on any other I/O failure.
    pub async fn open(&self, slot: Slot) -> Result<File, FirmwareUpdateError> {
        File::open(self.slot_path(slot))
            .await
            .map_err(|e| FirmwareUpdateError::read(slot, e))
    }

    /// Byte count of the image held in a slot
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::SlotNotFound`] if the slot is absent,
    /// [`FirmwareUpdateError::Read`] on any other I/O failure.
    pub async fn size(&self, slot: Slot) -> Result<u64, FirmwareUpdateError> {
        let metadata = fs::metadata(self.slot_path(slot))
            .await
            .map_err(|e| FirmwareUpdateError::read(slot, e))?;
        Ok(metadata.len())
    }

    /// Replace a slot's content with all bytes from `source`, atomically
    ///
    /// The image is staged into a temp file next to the slot and committed
    /// with a rename; observers see either the old image or the complete new
    /// one.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::Write`] on any I/O failure, including failures
    /// reading `source`.
    pub async fn write<R>(&self, slot: Slot, source: &mut R) -> Result<u64, FirmwareUpdateError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.write_atomic(slot, source, |e| FirmwareUpdateError::write(slot, e))
            .await
    }

    /// Replace a slot's content by truncating and writing in place
    ///
    /// The low-level primitive: an interruption mid-copy leaves the slot
    /// holding a prefix of `source`, exactly what an abrupt power loss
    /// produces. Fault-injection harnesses rely on that; the update
    /// manager's normal path goes through [`SlotStore::write`] instead.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::Write`] on any I/O failure.
    pub async fn write_in_place<R>(
        &self,
        slot: Slot,
        source: &mut R,
    ) -> Result<u64, FirmwareUpdateError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.ensure_parent_dir(slot).await?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.slot_path(slot))
            .await
            .map_err(|e| FirmwareUpdateError::write(slot, e))?;

        let written = copy_stream(source, &mut file, |e| FirmwareUpdateError::write(slot, e))
            .await?;
        file.flush()
            .await
            .map_err(|e| FirmwareUpdateError::write(slot, e))?;

        Ok(written)
    }

    /// Copy one slot's image into another
    ///
    /// Open + write composition with read failures attributed to `src` and
    /// write failures to `dst`.
    ///
    /// # Errors
    ///
    /// [`FirmwareUpdateError::SlotNotFound`] / [`FirmwareUpdateError::Read`]
    /// for the source, [`FirmwareUpdateError::Write`] for the destination.
    pub async fn copy(&self, src: Slot, dst: Slot) -> Result<u64, FirmwareUpdateError> {
        let mut reader = self.open(src).await?;
        self.write_atomic(dst, &mut reader, |e| FirmwareUpdateError::read(src, e))
            .await
    }

    async fn write_atomic<R>(
        &self,
        slot: Slot,
        source: &mut R,
        map_read_err: impl Fn(std::io::Error) -> FirmwareUpdateError,
    ) -> Result<u64, FirmwareUpdateError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.ensure_parent_dir(slot).await?;

        let final_path = self.slot_path(slot);
        let tmp_path = staging_path(final_path);

        let result = async {
            let mut tmp = File::create(&tmp_path)
                .await
                .map_err(|e| FirmwareUpdateError::write(slot, e))?;

            let written = copy_stream_mapped(source, &mut tmp, &map_read_err, |e| {
                FirmwareUpdateError::write(slot, e)
            })
            .await?;

            tmp.flush()
                .await
                .map_err(|e| FirmwareUpdateError::write(slot, e))?;
            tmp.sync_all()
                .await
                .map_err(|e| FirmwareUpdateError::write(slot, e))?;
            drop(tmp);

            fs::rename(&tmp_path, final_path)
                .await
                .map_err(|e| FirmwareUpdateError::write(slot, e))?;

            Ok(written)
        }
        .await;

        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                debug!(slot = %slot, error = %e, "staging file cleanup skipped");
            }
        }

        result
    }

    async fn ensure_parent_dir(&self, slot: Slot) -> Result<(), FirmwareUpdateError> {
        if let Some(parent) = self.slot_path(slot).parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FirmwareUpdateError::write(slot, e))?;
        }
        Ok(())
    }
}

fn staging_path(final_path: &Path) -> PathBuf {
    let file_name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slot".to_string());
    final_path.with_file_name(format!(".{file_name}.staging"))
}

async fn copy_stream<R, W>(
    source: &mut R,
    dest: &mut W,
    map_err: impl Fn(std::io::Error) -> FirmwareUpdateError,
) -> Result<u64, FirmwareUpdateError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWriteExt + Unpin,
{
    copy_stream_mapped(source, dest, &map_err, &map_err).await
}

async fn copy_stream_mapped<R, W>(
    source: &mut R,
    dest: &mut W,
    map_read_err: impl Fn(std::io::Error) -> FirmwareUpdateError,
    map_write_err: impl Fn(std::io::Error) -> FirmwareUpdateError,
) -> Result<u64, FirmwareUpdateError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWriteExt + Unpin,
{
    let mut buffer = vec![0u8; COPY_CHUNK];
    let mut written = 0u64;

    loop {
        let bytes_read = source.read(&mut buffer).await.map_err(&map_read_err)?;
        if bytes_read == 0 {
            break;
        }
        dest.write_all(&buffer[..bytes_read])
            .await
            .map_err(&map_write_err)?;
        written += bytes_read as u64;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SlotStore {
        SlotStore::new(&FirmwareUpdateConfig::with_firmware_dir(dir.path()))
    }

    #[tokio::test]
    async fn open_absent_slot_is_not_found() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        let result = store.open(Slot::Installed).await;
        assert!(matches!(
            result,
            Err(FirmwareUpdateError::SlotNotFound(Slot::Installed))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn size_absent_slot_is_not_found() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        assert!(matches!(
            store.size(Slot::Backup).await,
            Err(FirmwareUpdateError::SlotNotFound(Slot::Backup))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn write_then_read_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let image = vec![0x5au8; 4096];

        let written = store.write(Slot::Candidate, &mut image.as_slice()).await?;
        assert_eq!(written, 4096);
        assert_eq!(store.size(Slot::Candidate).await?, 4096);

        let mut reader = store.open(Slot::Candidate).await?;
        let mut back = Vec::new();
        reader.read_to_end(&mut back).await?;
        assert_eq!(back, image);
        Ok(())
    }

    #[tokio::test]
    async fn write_overwrites_previous_content() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        store
            .write(Slot::Installed, &mut vec![1u8; 1000].as_slice())
            .await?;
        store
            .write(Slot::Installed, &mut vec![2u8; 100].as_slice())
            .await?;

        assert_eq!(store.size(Slot::Installed).await?, 100);
        Ok(())
    }

    #[tokio::test]
    async fn write_leaves_no_staging_file_behind() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        store
            .write(Slot::Installed, &mut vec![7u8; 64].as_slice())
            .await?;

        let mut entries = fs::read_dir(dir.path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["installed_firmware.bin".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn copy_replicates_content_exactly() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let image: Vec<u8> = (0..150_000u32).map(|i| (i % 255) as u8).collect();

        store.write(Slot::Installed, &mut image.as_slice()).await?;
        let copied = store.copy(Slot::Installed, Slot::Backup).await?;
        assert_eq!(copied, image.len() as u64);

        let mut reader = store.open(Slot::Backup).await?;
        let mut back = Vec::new();
        reader.read_to_end(&mut back).await?;
        assert_eq!(back, image);
        Ok(())
    }

    #[tokio::test]
    async fn copy_from_absent_slot_reports_source() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        assert!(matches!(
            store.copy(Slot::Candidate, Slot::Installed).await,
            Err(FirmwareUpdateError::SlotNotFound(Slot::Candidate))
        ));
        assert!(!store.exists(Slot::Installed).await);
        Ok(())
    }

    #[tokio::test]
    async fn write_in_place_with_bounded_reader_truncates() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let image = vec![0xeeu8; 150_000];

        store.write(Slot::Candidate, &mut image.as_slice()).await?;

        // Model an interrupted copy: only the first 10 KiB land.
        let reader = store.open(Slot::Candidate).await?;
        let mut truncated = reader.take(10 * 1024);
        let written = store.write_in_place(Slot::Installed, &mut truncated).await?;

        assert_eq!(written, 10 * 1024);
        assert_eq!(store.size(Slot::Installed).await?, 10 * 1024);
        Ok(())
    }
}
