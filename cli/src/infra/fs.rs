//! Filesystem infrastructure — implements `PathProbe`.

use std::path::Path;

use crate::application::ports::PathProbe;

/// Local filesystem.
pub struct LocalFs;

impl PathProbe for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
