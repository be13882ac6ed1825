use anyhow::{Context, Result};
use pitaka_core::UserContext;
use std::fs;
use std::path::{Path, PathBuf};

/// `$PITAKA_HOME`, or `~/.pitaka` when unset.
pub fn pitaka_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("PITAKA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pitaka"))
}

pub fn ensure_pitaka_home() -> Result<PathBuf> {
    let dir = pitaka_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn session_path(home: &Path) -> PathBuf {
    home.join("session.json")
}

pub fn store_path(home: &Path) -> PathBuf {
    home.join("expenses.json")
}

pub fn write_session(home: &Path, user: &UserContext) -> Result<()> {
    let p = session_path(home);
    let json = serde_json::to_string_pretty(user)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_session(home: &Path) -> Result<Option<UserContext>> {
    let p = session_path(home);
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let user = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(user))
}

/// The logged-in user, or an error telling how to log in.
pub fn require_session(home: &Path) -> Result<UserContext> {
    read_session(home)?.context("not logged in. Run: pitaka login --user <id>")
}

/// Returns false if there was no session to clear.
pub fn clear_session(home: &Path) -> Result<bool> {
    let p = session_path(home);
    if !p.exists() {
        return Ok(false);
    }
    fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    Ok(true)
}
