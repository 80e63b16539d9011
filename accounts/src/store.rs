use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AccountError, MIN_PASSWORD_LEN, MIN_USERNAME_LEN};

pub const DEFAULT_DB_FILE: &str = "user_database.json";

/// Win/loss counters for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
}

impl UserStats {
    /// Leaderboard score: wins first, win ratio as a tie-breaker, in hundredths
    pub fn leaderboard_score(&self) -> u32 {
        if self.games == 0 {
            return 0;
        }
        let wins = f64::from(self.wins);
        let ratio = wins / f64::from(self.games);
        ((wins + ratio * 0.1) * 100.0) as u32
    }
}

/// One stored account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// SHA-256 hex digest of the password
    pub password: String,
    #[serde(default)]
    pub stats: UserStats,
    /// Unix seconds
    #[serde(default)]
    pub last_login: f64,
}

/// JSON-backed account store keyed by username
///
/// The in-memory map is authoritative; every mutation is written back to
/// disk immediately.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: BTreeMap<String, UserRecord>,
}

impl UserStore {
    /// Open the store at `path`, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => store,
            Err(AccountError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No user database at {:?}, starting empty", path);
                Self::empty(path)
            }
            Err(e) => {
                log::warn!("Could not read user database {:?}: {}. Starting empty", path, e);
                Self::empty(path)
            }
        }
    }

    /// Strict load; fails on a missing or corrupt file
    pub fn load(path: &Path) -> Result<Self, AccountError> {
        let data = fs::read_to_string(path)?;
        let users: BTreeMap<String, UserRecord> = serde_json::from_str(&data)?;
        log::debug!("Loaded {} users from {:?}", users.len(), path);
        Ok(Self {
            path: path.to_path_buf(),
            users,
        })
    }

    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            users: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Create an account with zeroed stats
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        let name_len = username.chars().count();
        if name_len < MIN_USERNAME_LEN {
            return Err(AccountError::UsernameTooShort(name_len));
        }
        let password_len = password.chars().count();
        if password_len < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort(password_len));
        }
        if self.users.contains_key(username) {
            return Err(AccountError::UsernameTaken);
        }

        self.users.insert(
            username.to_string(),
            UserRecord {
                password: hash_password(password),
                stats: UserStats::default(),
                last_login: now_seconds(),
            },
        );
        self.save()?;
        log::info!("Registered user {}", username);
        Ok(())
    }

    /// Check credentials; on success the login time is updated
    ///
    /// A failure to persist the new login time is logged, not returned.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<bool, AccountError> {
        let Some(record) = self.users.get_mut(username) else {
            return Ok(false);
        };
        if record.password != hash_password(password) {
            return Ok(false);
        }

        record.last_login = now_seconds();
        if let Err(e) = self.save() {
            log::warn!("Could not save login time for {}: {}", username, e);
        }
        Ok(true)
    }

    /// Count one finished match for `username`
    pub fn record_result(&mut self, username: &str, won: bool) -> Result<(), AccountError> {
        let record = self
            .users
            .get_mut(username)
            .ok_or_else(|| AccountError::UnknownUser(username.to_string()))?;

        record.stats.games += 1;
        if won {
            record.stats.wins += 1;
        } else {
            record.stats.losses += 1;
        }
        self.save()
    }

    pub fn stats(&self, username: &str) -> Option<UserStats> {
        self.users.get(username).map(|record| record.stats)
    }

    pub fn last_login(&self, username: &str) -> Option<f64> {
        self.users.get(username).map(|record| record.last_login)
    }

    /// Best players first; ties keep alphabetical order
    pub fn top_scores(&self, limit: usize) -> Vec<(String, u32)> {
        let mut scores: Vec<(String, u32)> = self
            .users
            .iter()
            .map(|(name, record)| (name.clone(), record.stats.leaderboard_score()))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores.truncate(limit);
        scores
    }

    /// Write the whole store: temp file first, then rename over the old one
    pub fn save(&self) -> Result<(), AccountError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(&self.users)?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        log::debug!("Saved {} users to {:?}", self.users.len(), self.path);
        Ok(())
    }
}

/// Hex SHA-256 of the password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
