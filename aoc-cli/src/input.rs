//! Puzzle inputs on the local filesystem

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-based store of puzzle inputs
///
/// Directory structure: `{input_dir}/{year}/day{day:02}.txt`, optionally
/// with one year/day redirected to an explicit file.
pub struct InputStore {
    input_dir: PathBuf,
    override_file: Option<(u16, u8, PathBuf)>,
}

impl InputStore {
    /// Create a store rooted at `input_dir`
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            override_file: None,
        }
    }

    /// Read `year`/`day` from `path` instead of the input tree
    pub fn with_override(mut self, year: u16, day: u8, path: PathBuf) -> Self {
        self.override_file = Some((year, day, path));
        self
    }

    /// Where the input for a specific year/day is read from
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        match &self.override_file {
            Some((y, d, path)) if (*y, *d) == (year, day) => path.clone(),
            _ => self
                .input_dir
                .join(year.to_string())
                .join(format!("day{:02}.txt", day)),
        }
    }

    /// Check if input is present
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.input_path(year, day).is_file()
    }

    /// Read the input for `year`/`day`
    pub fn get(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.input_path(year, day);
        read(&path).map_err(|kind| match kind {
            ErrorKind::NotFound => InputError::Missing { year, day, path },
            kind => InputError::Read { path, kind },
        })
    }
}

fn read(path: &Path) -> Result<String, ErrorKind> {
    fs::read_to_string(path).map_err(|e| e.kind())
}
