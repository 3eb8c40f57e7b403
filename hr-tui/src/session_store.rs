use hr_client::{LeaveError, TokenStore};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

fn secure_write(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

/// Keeps the bearer token in a file only the current user can read.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The token file under the hr-tui config directory.
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(crate::config::root_path()?.join("session")))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> hr_client::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let token = std::fs::read_to_string(&self.path)
            .map_err(|e| LeaveError::Io(format!("Failed to read session file: {e}")))?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn save(&self, token: &str) -> hr_client::Result<()> {
        Ok(secure_write(&self.path, token)?)
    }

    fn clear(&self) -> hr_client::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> FileTokenStore {
        let dir = std::env::temp_dir().join(format!("hr-tui-test-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        FileTokenStore::new(dir.join("session"))
    }

    #[test]
    fn save_load_clear() {
        let store = temp_store("roundtrip");
        assert_eq!(store.load().unwrap(), None);

        store.save("abc.def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn blank_file_counts_as_logged_out() {
        let store = temp_store("blank");
        store.save("  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store("mode");
        store.save("secret").unwrap();
        let mode = std::fs::metadata(&store.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
