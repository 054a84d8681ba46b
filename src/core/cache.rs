//! Content-addressed result cache.
//!
//! Each `(key, text)` pair maps to `<dir>/<sha256("key:text")>.json`, so a
//! changed source text invalidates its slot. Cache failures never abort a
//! run: they are counted, detailed in verbose mode and treated as a miss.

use std::{
    fs, io,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use colored::Colorize;
use sha2::{Digest, Sha256};

use crate::core::types::ExtractionResult;

pub const DEFAULT_CACHE_DIR: &str = ".txcontext-cache";

#[derive(Debug)]
pub struct Cache {
    dir: PathBuf,
    enabled: bool,
    verbose: bool,
    errors: AtomicUsize,
}

impl Cache {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool, verbose: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
            verbose,
            errors: AtomicUsize::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self::new(DEFAULT_CACHE_DIR, false, false)
    }

    pub fn get(&self, key: &str, text: &str) -> Option<ExtractionResult> {
        if !self.enabled {
            return None;
        }

        let path = self.slot_path(key, text);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                self.warn("read", key, &e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(result) => Some(result),
            Err(e) => {
                self.warn("read", key, &e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, text: &str, result: &ExtractionResult) {
        if !self.enabled {
            return;
        }

        if let Err(e) = self.write_slot(key, text, result) {
            self.warn("write", key, &e);
        }
    }

    fn write_slot(&self, key: &str, text: &str, result: &ExtractionResult) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
        fs::write(self.slot_path(key, text), json)
    }

    /// Remove every cached slot.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Read and write failures seen so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    fn slot_path(&self, key: &str, text: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot_name(key, text)))
    }

    fn warn(&self, action: &str, key: &str, error: &dyn std::fmt::Display) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        if self.verbose {
            eprintln!(
                "{} Cache {} error for {}: {}",
                "warning:".bold().yellow(),
                action,
                key,
                error
            );
        }
    }
}

/// Hex SHA-256 of `key:text`.
pub fn slot_name(key: &str, text: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", key, text).as_bytes());
    format!("{:x}", digest)
}
