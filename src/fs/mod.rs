use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use util::PathEncodingError;

/// Text tables written by the stages
mod tables;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
}

/// All file operations in the crate should go through this struct.
///
/// All writes check that the path in question is a child of the
/// single whitelisted prefix (the output dir), otherwise they will not be performed.
#[derive(Debug)]
pub struct Fs {
    /// The directory we are allowed to modify
    output_prefix: PathBuf,
    /// if true, prevents all writes
    dry_run: bool,
}

impl Fs {
    /// Create a new `Fs` with the given output directory.
    pub fn new(output_prefix: &Path, dry_run: bool) -> Self {
        Self {
            output_prefix: output_prefix.to_path_buf(),
            dry_run,
        }
    }

    #[inline]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Check whether output dir exists, and create it if not.
    pub fn ensure_output_dir_exists(&mut self, verbose: bool) -> Result<()> {
        if !self.output_prefix.exists() {
            if self.dry_run {
                eprintln!(
                    "Dry run. Not creating output directory {:?}",
                    self.output_prefix
                );
                return Ok(());
            }
            eprintln!(
                "Output directory {:?} doesn't exist. Creating.",
                self.output_prefix
            );
            fs::create_dir_all(&self.output_prefix).context("creating output directory")?;
        } else if !self.output_prefix.is_dir() {
            return Err(Error::NotDirectory(
                self.output_prefix
                    .to_str()
                    .ok_or(PathEncodingError)?
                    .to_string(),
            )
            .into());
        } else if verbose {
            eprintln!(
                "Output directory {:?} already exists. Not creating.",
                self.output_prefix
            );
        }

        self.output_prefix = self.output_prefix.canonicalize()?;
        Ok(())
    }

    /// Resolve `path` against the canonical output directory.
    /// Relative paths that were built from the un-canonicalized prefix still pass
    /// the whitelist this way.
    fn resolve(&self, path: &Path) -> PathBuf {
        match path.parent().and_then(|p| p.canonicalize().ok()) {
            Some(parent) => match path.file_name() {
                Some(name) => parent.join(name),
                None => parent,
            },
            None => path.to_path_buf(),
        }
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = self.resolve(path.as_ref());
        self.check_whitelist(&path)?;
        fs::write(&path, text).with_context(|| format!("writing file {path:?}"))?;
        log::info!("wrote {path:?}");
        Ok(())
    }

    /// Serialize `value` as pretty-printed JSON into a file.
    pub fn write_json<T: AsRef<Path>, V: Serialize + ?Sized>(&self, path: T, value: &V) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("serializing JSON")?;
        self.write_file(path, &text)
    }

    /// Read entire file into a String.
    pub fn read_to_buf<T: AsRef<Path>>(&self, path: T, strbuf: &mut String) -> Result<()> {
        use std::io::Read;
        let path = path.as_ref();
        strbuf.clear();
        let cap = fs::metadata(path)?.len() as usize;
        if cap > strbuf.len() {
            strbuf.reserve(cap - strbuf.len());
        }
        let mut f = fs::File::open(path)?;
        f.read_to_string(strbuf)?;
        Ok(())
    }

    /// Read and deserialize a JSON file.
    pub fn read_json<T: AsRef<Path>, V: DeserializeOwned>(
        &self,
        path: T,
        strbuf: &mut String,
    ) -> Result<V> {
        let path = path.as_ref();
        self.read_to_buf(path, strbuf)
            .with_context(|| format!("while reading {path:?}"))?;
        let value = serde_json::from_str(strbuf)
            .with_context(|| format!("while parsing JSON in {path:?}"))?;
        Ok(value)
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        path.as_ref().starts_with(&self.output_prefix)
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if self.dry_run || !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(path.to_str().ok_or(PathEncodingError)?.to_owned()).into())
        } else {
            Ok(())
        }
    }
}
