//! Data-файл: растущий mmap-буфер под слоты документов.
//!
//! Файл открывается (или создаётся с начальным размером в один шаг роста)
//! и отображается в память целиком. Рост выполняется кратно growth_step:
//! flush, set_len, переотображение. Все записи идут через bytes_mut,
//! границы held by caller.
//!
//! used_size - high-water mark занятых байт. На открытии восстанавливается
//! сканом с конца файла до последнего ненулевого байта: слоты никогда не
//! пишут нулевой "хвост" (payload добивается PAD_BYTE), поэтому всё после
//! последнего ненулевого байта - неразмеченный резерв.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use memmap2::MmapMut;

use crate::config::StoreConfig;
use crate::metrics::record_file_growth;

pub struct DataFile {
    path: PathBuf,
    name: String,
    file: File,
    mmap: MmapMut,
    size: u64,
    used_size: u64,
    growth_step: u64,
    data_fsync: bool,
}

impl DataFile {
    /// Открывает data-файл, создавая его при отсутствии.
    ///
    /// Новый (или пустой) файл сразу получает размер в один шаг роста,
    /// чтобы отображение не было нулевой длины.
    pub fn open(path: &Path, cfg: &StoreConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .with_context(|| format!("open data file {}", path.display()))?;

        let meta = file
            .metadata()
            .with_context(|| format!("stat data file {}", path.display()))?;
        let mut size = meta.len();
        if size == 0 {
            size = cfg.growth_step;
            file.set_len(size)
                .with_context(|| format!("presize data file {} to {}", path.display(), size))?;
        }

        // SAFETY: файл открыт на чтение/запись и принадлежит этому
        // экземпляру; отображение живёт не дольше file и пересоздаётся
        // при каждом set_len.
        let mmap = unsafe { MmapMut::map_mut(&file) }
            .with_context(|| format!("mmap data file {}", path.display()))?;

        let used_size = mmap
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i as u64 + 1)
            .unwrap_or(0);

        let name = path.display().to_string();
        debug!(
            "data file {} opened: size={} used={} growth_step={}",
            name, size, used_size, cfg.growth_step
        );

        Ok(Self {
            path: path.to_path_buf(),
            name,
            file,
            mmap,
            size,
            used_size,
            growth_step: cfg.growth_step,
            data_fsync: cfg.data_fsync,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Метка файла для диагностических сообщений.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Текущий выделенный размер (байт).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// High-water mark занятых байт.
    pub fn used_size(&self) -> u64 {
        self.used_size
    }

    /// used_size только растёт; уменьшение - ошибка вызывающего кода.
    pub(crate) fn set_used_size(&mut self, used: u64) {
        debug_assert!(used >= self.used_size);
        debug_assert!(used <= self.size);
        self.used_size = used;
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.mmap[..]
    }

    /// Гарантирует, что used_size + additional не выходит за size,
    /// при необходимости наращивая файл кратно growth_step.
    pub fn ensure_capacity(&mut self, additional: u64) -> Result<()> {
        let need = self.used_size + additional;
        if need <= self.size {
            return Ok(());
        }
        let mut new_size = self.size;
        while new_size < need {
            new_size += self.growth_step;
        }
        self.grow_to(new_size)
    }

    fn grow_to(&mut self, new_size: u64) -> Result<()> {
        let old_size = self.size;
        self.mmap
            .flush()
            .with_context(|| format!("flush {} before growth", self.name))?;
        self.file
            .set_len(new_size)
            .with_context(|| format!("grow {} to {}", self.name, new_size))?;

        // SAFETY: те же гарантии, что и при открытии; старое отображение
        // заменяется до первого обращения к новому диапазону.
        self.mmap = unsafe { MmapMut::map_mut(&self.file) }
            .with_context(|| format!("remap {} after growth", self.name))?;
        self.size = new_size;

        if self.data_fsync {
            self.file
                .sync_all()
                .with_context(|| format!("fsync {} after growth", self.name))?;
        }

        record_file_growth(new_size - old_size);
        debug!("data file {} grown: {} -> {}", self.name, old_size, new_size);
        Ok(())
    }

    /// Сбрасывает отображение на диск (и fsync при data_fsync).
    pub fn flush(&mut self) -> Result<()> {
        self.mmap
            .flush()
            .with_context(|| format!("flush {}", self.name))?;
        if self.data_fsync {
            self.file
                .sync_all()
                .with_context(|| format!("fsync {}", self.name))?;
        }
        Ok(())
    }
}
