//! Access to directories of glyph source files.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

/// A directory of glyph sources, possibly containing layer sub-directories.
pub trait SourceDir {
    /// Returns `true` if a file with this name exists.
    fn contains(&self, file_name: &str) -> bool;

    /// Read the contents of a file.
    fn read(&self, file_name: &str) -> io::Result<Vec<u8>>;

    /// The names of all files, in sorted order.
    fn file_names(&self) -> io::Result<Vec<String>>;

    /// A sub-directory. It need not exist; a missing directory is empty.
    fn sub_dir(&self, name: &str) -> Rc<dyn SourceDir>;
}

/// A directory on the file system.
#[derive(Clone, Debug)]
pub struct FsDir {
    path: PathBuf,
}

impl FsDir {
    /// A source directory at `path`, which need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceDir for FsDir {
    fn contains(&self, file_name: &str) -> bool {
        self.path.join(file_name).is_file()
    }

    fn read(&self, file_name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path.join(file_name))
    }

    fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::warn!("skipping non UTF-8 file name {name:?}"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn sub_dir(&self, name: &str) -> Rc<dyn SourceDir> {
        Rc::new(FsDir::new(self.path.join(name)))
    }
}

/// A directory tree held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryDir {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeMap<String, MemoryDir>,
}

impl MemoryDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any existing file with the same name.
    pub fn insert_file(&mut self, file_name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(file_name.into(), data.into());
    }

    /// The sub-directory with this name, created if missing.
    pub fn dir_mut(&mut self, name: &str) -> &mut MemoryDir {
        self.dirs.entry(name.to_owned()).or_default()
    }
}

impl SourceDir for MemoryDir {
    fn contains(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    fn read(&self, file_name: &str) -> io::Result<Vec<u8>> {
        self.files.get(file_name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no file '{file_name}'"))
        })
    }

    fn file_names(&self) -> io::Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn sub_dir(&self, name: &str) -> Rc<dyn SourceDir> {
        Rc::new(self.dirs.get(name).cloned().unwrap_or_default())
    }
}
