//! Shared helpers for tests that stub the external encoder.

use std::sync::{Mutex, MutexGuard, OnceLock};

fn path_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// A fake `ffmpeg` executable placed first on PATH for the lifetime of
/// the value. PATH is process-global, so installs are serialized and
/// the previous value is restored on drop.
pub struct FakeFfmpeg {
    _dir: tempfile::TempDir,
    saved_path: Option<std::ffi::OsString>,
    _guard: MutexGuard<'static, ()>,
}

impl FakeFfmpeg {
    pub fn install(script: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let guard = path_lock().lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("ffmpeg");
        std::fs::write(&exe, script).unwrap();
        let mut perms = std::fs::metadata(&exe).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&exe, perms).unwrap();

        let saved = std::env::var_os("PATH");
        let mut paths = vec![dir.path().to_path_buf()];
        if let Some(old) = &saved {
            paths.extend(std::env::split_paths(old));
        }
        std::env::set_var("PATH", std::env::join_paths(paths).unwrap());

        Self {
            _dir: dir,
            saved_path: saved,
            _guard: guard,
        }
    }
}

impl Drop for FakeFfmpeg {
    fn drop(&mut self) {
        match &self.saved_path {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }
    }
}
