//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use sprig_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{SprigError, SprigResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SprigResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> SprigResult<()> {
        std::fs::write(path, contents).map_err(|e| map_io_error(path, e))
    }

    fn set_executable(&self, path: &Path) -> SprigResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)
                .map_err(|e| map_io_error(path, e))?
                .permissions();
            perms.set_mode(perms.mode() | 0o111);
            std::fs::set_permissions(path, perms).map_err(|e| map_io_error(path, e))?;
        }
        #[cfg(not(unix))]
        {
            let _ = path;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_entries(&self, path: &Path) -> SprigResult<Vec<String>> {
        let mut names = std::fs::read_dir(path)
            .map_err(|e| map_io_error(path, e))?
            .map(|entry| {
                entry
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .map_err(|e| map_io_error(path, e))
            })
            .collect::<SprigResult<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn is_writable(&self, path: &Path) -> bool {
        can_write(path)
    }
}

/// Ask the kernel whether the real user may write to `path`.
#[cfg(unix)]
fn can_write(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn can_write(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

fn map_io_error(path: &Path, e: io::Error) -> SprigError {
    ApplicationError::filesystem(path, &e).into()
}
