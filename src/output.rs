// Request file output for apirecon
// One text file per operation inside a directory recreated for every run

use crate::error::{ReconError, Result};
use crate::models::Operation;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
    static ref REPEATED_UNDERSCORES: Regex = Regex::new(r"_{2,}").unwrap();
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(raw, "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "operation".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<method>_<operationId>`, or `<method>_<path>` when the operation has no id.
pub fn operation_file_stem(op: &Operation) -> String {
    let method = op.method.as_str().to_lowercase();
    let id = match &op.operation_id {
        Some(id) if !id.trim().is_empty() => id.clone(),
        _ => op.path.clone(),
    };
    sanitize_identifier(&format!("{}_{}", method, id))
}

/// Output directory for generated request files.
///
/// Names are unique within one run: a second operation mapping to the same
/// stem gets `_2`, the third `_3`, and so on.
pub struct RequestWriter {
    dir: PathBuf,
    used: HashSet<String>,
}

impl RequestWriter {
    /// Remove `dir` if it exists and create it empty.
    pub fn recreate(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let io_err = |source| ReconError::OutputDir {
            path: dir.display().to_string(),
            source,
        };
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(io_err)?;
        }
        fs::create_dir_all(&dir).map_err(io_err)?;
        Ok(Self {
            dir,
            used: HashSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unique_name(&mut self, stem: &str) -> String {
        let mut name = stem.to_string();
        let mut n = 2;
        while self.used.contains(&name) {
            name = format!("{}_{}", stem, n);
            n += 1;
        }
        self.used.insert(name.clone());
        format!("{}.txt", name)
    }

    /// Write the request text for `op`; returns the path written.
    pub fn write(&mut self, op: &Operation, request: &str) -> Result<PathBuf> {
        let file_name = self.unique_name(&operation_file_stem(op));
        let path = self.dir.join(file_name);
        fs::write(&path, request).map_err(|source| ReconError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}
