//! References to the data sources `ogr2ogr` reads from and writes to.
//!
//! A [`DataSource`] has two renderings:
//!
//! - [`DataSource::encode`] is the form handed to the process. It is an
//!   [`OsString`] so file paths that are not valid UTF-8 survive untouched.
//! - The [`Display`](std::fmt::Display) impl is the human-readable form used
//!   in logs and error messages. Secrets such as database passwords are masked.
//!
//! # Examples
//!
//! ```
//! use ogrkit_core_common::{DataSource, PgConnection};
//!
//! let file = DataSource::from("/data/roads.shp");
//! assert!(file.is_file());
//!
//! let pg = DataSource::from(
//!     PgConnection::new()
//!         .with_host("localhost")
//!         .with_dbname("gis")
//!         .with_password("secret"),
//! );
//! assert!(!pg.is_file());
//! assert!(!pg.to_string().contains("secret"));
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix `ogr2ogr` uses to recognise PostgreSQL connection strings.
pub const PG_PREFIX: &str = "PG:";

const MASKED_PASSWORD: &str = "xxxxxx";

/// An input or output location for `ogr2ogr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A dataset on the local filesystem (shapefile, GeoJSON file, SQLite db, ...).
    File(PathBuf),
    /// A PostgreSQL/PostGIS database described by its connection parameters.
    Postgres(PgConnection),
    /// Any other connection string, passed through verbatim.
    Connection(String),
}

impl DataSource {
    /// Interprets user-supplied text as a data source.
    ///
    /// Text starting with `PG:` (case-insensitive) is kept as a raw connection
    /// string; everything else is treated as a file path.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let is_pg = text
            .get(..PG_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PG_PREFIX));
        if is_pg {
            Self::Connection(text.to_string())
        } else {
            Self::File(PathBuf::from(text))
        }
    }

    /// Returns `true` when this reference points at a filesystem path.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the filesystem path for file references.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }

    /// Renders the reference in the form passed to the external process.
    #[must_use]
    pub fn encode(&self) -> OsString {
        match self {
            Self::File(path) => path.as_os_str().to_os_string(),
            Self::Postgres(conn) => OsString::from(conn.encode()),
            Self::Connection(raw) => OsString::from(raw),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Postgres(conn) => write!(f, "{conn}"),
            Self::Connection(raw) => f.write_str(&mask_raw_password(raw)),
        }
    }
}

/// Masks `password=...` parameters in a raw connection string.
fn mask_raw_password(raw: &str) -> String {
    split_parameters(raw)
        .into_iter()
        .map(|part| match part.split_once('=') {
            Some((key, _)) if key.to_ascii_lowercase().ends_with("password") => {
                format!("{key}={MASKED_PASSWORD}")
            },
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a connection string on the spaces between its parameters.
///
/// Single-quoted values may contain spaces and `\'` escapes, the same form
/// [`PgConnection`] encodes them in; an unterminated quote runs to the end.
fn split_parameters(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '\'' => quoted = !quoted,
            ' ' if !quoted => {
                parts.push(&raw[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }
    parts.push(&raw[start..]);
    parts
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        Self::File(PathBuf::from(path))
    }
}

impl From<String> for DataSource {
    fn from(path: String) -> Self {
        Self::File(PathBuf::from(path))
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<PgConnection> for DataSource {
    fn from(conn: PgConnection) -> Self {
        Self::Postgres(conn)
    }
}

/// Connection parameters for a PostgreSQL/PostGIS data source.
///
/// Only the parameters that are set end up in the connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgConnection {
    /// Database server host name or address.
    pub host: Option<String>,
    /// Database server port.
    pub port: Option<u16>,
    /// Database name.
    pub dbname: Option<String>,
    /// Schema used for unqualified table names (`active_schema`).
    pub schema: Option<String>,
    /// Login role.
    pub user: Option<String>,
    /// Login password. Never shown by the `Display` impl.
    pub password: Option<String>,
}

impl PgConnection {
    /// Creates an empty set of connection parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Builds the full `PG:` connection string, password included.
    #[must_use]
    pub fn encode(&self) -> String {
        self.render(false)
    }

    fn render(&self, mask_password: bool) -> String {
        let port = self.port.map(|p| p.to_string());
        let password = if mask_password {
            self.password.as_ref().map(|_| MASKED_PASSWORD.to_string())
        } else {
            self.password.clone()
        };

        let params = [
            ("host", self.host.as_ref()),
            ("port", port.as_ref()),
            ("dbname", self.dbname.as_ref()),
            ("user", self.user.as_ref()),
            ("password", password.as_ref()),
            ("active_schema", self.schema.as_ref()),
        ];

        let body = params
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{key}='{}'", escape_value(v))))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{PG_PREFIX}{body}")
    }
}

impl fmt::Display for PgConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Escapes a conninfo value for use inside single quotes.
fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
