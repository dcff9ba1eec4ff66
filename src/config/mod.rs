use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// Startup and lookup failures from the configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    ParseFile {
        path: String,
        source: serde_json::Error,
    },
    #[error("could not bind configuration: {0}")]
    Bind(serde_json::Error),
    #[error("DbSets is empty")]
    EmptyDbSets,
    #[error("DbSetActiveIdx {idx} is out of range (DbSets has {len} entries)")]
    ActiveIdxOutOfRange { idx: usize, len: usize },
    #[error("DbSetActiveIdx is not a valid index: {0}")]
    InvalidActiveIdx(String),
    #[error("duplicate login name in active DbSet: {0}")]
    DuplicateLogin(String),
    #[error("login name must not be empty")]
    BlankLoginName,
    #[error("database login {0} not found in active DbSet")]
    LoginNotFound(String),
    #[error("connection string {0} not found")]
    ConnectionNotFound(String),
}

/// One named credential within a Database Set. Location and server are
/// denormalized in from the owning set during construction; the connection
/// string itself is resolved lazily through [`AppConfig::connection_string`].
#[derive(Debug, Clone, Deserialize)]
pub struct LoginEntry {
    #[serde(rename = "DbLocation", default)]
    pub db_location: String,
    #[serde(rename = "DbServer", default)]
    pub db_server: String,
    #[serde(rename = "DbUserLogin")]
    pub db_user_login: String,
    #[serde(rename = "DbConnection")]
    pub db_connection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbSet {
    #[serde(rename = "DbLocation")]
    pub db_location: String,
    #[serde(rename = "DbServer")]
    pub db_server: String,
    #[serde(rename = "DbLogins", default)]
    pub db_logins: Vec<LoginEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordSaltDetails {
    #[serde(rename = "Salt")]
    pub salt: String,
    #[serde(rename = "Iterations")]
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(rename = "LifeTimeMinutes")]
    pub life_time_minutes: u32,

    #[serde(rename = "ValidateIssuerSigningKey", default)]
    pub validate_issuer_signing_key: bool,
    #[serde(rename = "IssuerSigningKey", default)]
    pub issuer_signing_key: String,

    #[serde(rename = "ValidateIssuer", default = "default_true")]
    pub validate_issuer: bool,
    #[serde(rename = "ValidIssuer", default)]
    pub valid_issuer: Option<String>,

    #[serde(rename = "ValidateAudience", default = "default_true")]
    pub validate_audience: bool,
    #[serde(rename = "ValidAudience", default)]
    pub valid_audience: Option<String>,

    #[serde(rename = "RequireExpirationTime", default)]
    pub require_expiration_time: bool,
    #[serde(rename = "ValidateLifetime", default = "default_true")]
    pub validate_lifetime: bool,
}

fn default_true() -> bool {
    true
}

/// The merged configuration as it appears on disk. `DbSetActiveIdx` arrives
/// as a bare number or as a string depending on which layer supplied it.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "ConnectionStrings", default)]
    connection_strings: HashMap<String, String>,
    #[serde(rename = "DbSets", default)]
    db_sets: Vec<DbSet>,
    #[serde(rename = "DbSetActiveIdx")]
    db_set_active_idx: IdxValue,
    #[serde(rename = "PasswordSaltDetails")]
    password_salt: PasswordSaltDetails,
    #[serde(rename = "JwtConfig")]
    jwt: JwtConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdxValue {
    Number(usize),
    Text(String),
}

impl IdxValue {
    fn resolve(&self) -> Result<usize, ConfigError> {
        match self {
            IdxValue::Number(n) => Ok(*n),
            IdxValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidActiveIdx(s.clone())),
        }
    }
}

/// Application configuration, built once at startup and shared read-only.
///
/// Two JSON layers are merged: a secrets file (lowest precedence) and a local
/// `appsettings.json` override. The active Database Set is selected by
/// `DbSetActiveIdx`; an out-of-range index fails the load so the process
/// never serves traffic with a partial configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    connection_strings: HashMap<String, String>,
    active_db_set: DbSet,
    password_salt: PasswordSaltDetails,
    jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from the paths named by `FRIENDS_SECRETS_FILE` and
    /// `FRIENDS_APPSETTINGS` (default `appsettings.json`). A missing secrets
    /// layer is allowed; the override layer must exist if named explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets = std::env::var("FRIENDS_SECRETS_FILE").ok();
        let appsettings =
            std::env::var("FRIENDS_APPSETTINGS").unwrap_or_else(|_| "appsettings.json".into());
        Self::load(secrets.as_deref().map(Path::new), Path::new(&appsettings))
    }

    /// Load and merge the two configuration layers, then bind and validate.
    pub fn load(secrets_path: Option<&Path>, override_path: &Path) -> Result<Self, ConfigError> {
        let mut merged = match secrets_path {
            Some(path) => read_layer(path)?,
            None => Value::Object(Default::default()),
        };
        merge_layer(&mut merged, read_layer(override_path)?);
        Self::from_merged(merged)
    }

    /// Bind an already-merged configuration value. Test-only entry point.
    #[cfg(test)]
    pub(crate) fn from_value(merged: Value) -> Result<Self, ConfigError> {
        Self::from_merged(merged)
    }

    fn from_merged(merged: Value) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_value(merged).map_err(ConfigError::Bind)?;

        if raw.db_sets.is_empty() {
            return Err(ConfigError::EmptyDbSets);
        }
        let idx = raw.db_set_active_idx.resolve()?;
        let len = raw.db_sets.len();
        let set = raw
            .db_sets
            .into_iter()
            .nth(idx)
            .ok_or(ConfigError::ActiveIdxOutOfRange { idx, len })?;

        // Denormalize location/server into fresh immutable login entries and
        // reject duplicate names while doing so.
        let mut seen = HashSet::new();
        let mut logins = Vec::with_capacity(set.db_logins.len());
        for login in set.db_logins {
            let key = login.db_user_login.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigError::BlankLoginName);
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateLogin(login.db_user_login));
            }
            logins.push(LoginEntry {
                db_location: set.db_location.clone(),
                db_server: set.db_server.clone(),
                db_user_login: login.db_user_login,
                db_connection: login.db_connection,
            });
        }

        Ok(Self {
            connection_strings: raw.connection_strings,
            active_db_set: DbSet {
                db_location: set.db_location,
                db_server: set.db_server,
                db_logins: logins,
            },
            password_salt: raw.password_salt,
            jwt: raw.jwt,
        })
    }

    pub fn active_db_set(&self) -> &DbSet {
        &self.active_db_set
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    pub fn password_salt(&self) -> &PasswordSaltDetails {
        &self.password_salt
    }

    /// Case-insensitive, whitespace-trimming lookup of a login in the active
    /// Database Set. A blank name fails before any lookup is attempted.
    pub fn resolve_login(&self, name: &str) -> Result<&LoginEntry, ConfigError> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(ConfigError::BlankLoginName);
        }
        self.active_db_set
            .db_logins
            .iter()
            .find(|l| l.db_user_login.trim().to_lowercase() == wanted)
            .ok_or_else(|| ConfigError::LoginNotFound(name.trim().to_string()))
    }

    /// Resolve a login's connection reference against the named-connection
    /// table. The indirection lets deployments rotate secrets without code
    /// changes.
    pub fn connection_string(&self, login: &LoginEntry) -> Result<&str, ConfigError> {
        self.connection_strings
            .get(&login.db_connection)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::ConnectionNotFound(login.db_connection.clone()))
    }
}

fn read_layer(path: &Path) -> Result<Value, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::ParseFile {
        path: path.display().to_string(),
        source,
    })
}

/// Deep-merge `overlay` into `base`; overlay wins on conflicts, objects are
/// merged key by key, everything else is replaced wholesale.
fn merge_layer(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_layer(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
