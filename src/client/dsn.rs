//! DSN parsing
//!
//! Supports formats:
//! * `user:password@host:port/database[?ssl=true|custom]` (standard)
//! * `user:password@host:port[?database]` (legacy)
//!
//! A DSN is standard when a `/` follows the `@` with no other `@` in between
//! and at least one character that is neither `@` nor `/` after it. Only
//! standard DSNs have their query parameters interpreted, and only `ssl` is
//! understood; any other parameter is dropped.

use crate::connection::{SslMode, TlsRegistry};
use crate::protocol::{ConnectOptions, TlsMode};
use crate::{Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use url::Url;

const SCHEME_PREFIX: &str = "mysql://";

const INVALID_DSN: &str = "invalid dsn, must be user:password@addr[/db[?param=X]]";

fn standard_form() -> &'static Regex {
    static STANDARD_FORM: OnceLock<Regex> = OnceLock::new();
    STANDARD_FORM.get_or_init(|| Regex::new("@[^@]+/[^@/]+").expect("valid pattern"))
}

/// Parsed connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Username
    pub user: String,
    /// Password (empty if absent)
    pub password: String,
    /// `host:port`
    pub addr: String,
    /// Database name.
    ///
    /// For legacy DSNs this is the raw text after `?`, passed through as-is.
    pub database: String,
    /// Secure transport directive
    pub sslmode: SslMode,
}

impl ConnectionParams {
    /// Parse a DSN
    pub fn parse(dsn: &str) -> Result<Self> {
        let standard = standard_form().is_match(dsn);
        let url = parse_url(&format!("{}{}", SCHEME_PREFIX, dsn))?;

        let user = decode(url.username())?;
        let password = decode(url.password().unwrap_or_default())?;
        let addr = host_port(&url);

        if !standard {
            // Legacy DSN: no parameter processing
            return Ok(Self {
                user,
                password,
                addr,
                database: raw_query(dsn).to_string(),
                sslmode: SslMode::Disable,
            });
        }

        let path = url.path();
        let database = decode(path.strip_prefix('/').unwrap_or(path))?;

        let mut ssl = None;
        for (key, value) in url.query_pairs() {
            if key == "ssl" {
                if ssl.is_none() {
                    ssl = Some(value);
                }
            } else {
                tracing::debug!(param = %key, "ignoring unsupported DSN parameter");
            }
        }

        let sslmode = match ssl {
            Some(value) => value.parse()?,
            None => SslMode::Disable,
        };

        Ok(Self {
            user,
            password,
            addr,
            database,
            sslmode,
        })
    }
}

impl ConnectionParams {
    /// Resolve the secure transport directive against the TLS registry.
    ///
    /// `ssl=custom` with nothing registered for the address yields
    /// `TlsMode::Custom(None)`; the connector decides what that means.
    pub fn resolve_tls(&self, registry: &TlsRegistry) -> TlsMode {
        match self.sslmode {
            SslMode::Disable => TlsMode::Disabled,
            SslMode::SkipVerify => TlsMode::SkipVerify,
            SslMode::Custom => {
                let profile = registry.get(&self.addr);
                if profile.is_none() {
                    tracing::warn!(addr = %self.addr, "ssl=custom but no TLS profile registered");
                }
                TlsMode::Custom(profile)
            }
        }
    }

    /// Convert to ConnectOptions
    pub fn to_options(&self, tls: TlsMode) -> ConnectOptions {
        ConnectOptions::new(&self.addr, &self.user)
            .password(&self.password)
            .database(&self.database)
            .tls(tls)
    }
}

impl std::str::FromStr for ConnectionParams {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Extract the `host:port` of a DSN.
///
/// Accepts the DSN with or without a `mysql://` prefix.
pub fn parse_addr(dsn: &str) -> Result<String> {
    let url = if dsn.contains("://") {
        parse_url(dsn)?
    } else {
        parse_url(&format!("{}{}", SCHEME_PREFIX, dsn))?
    };
    Ok(host_port(&url))
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(|e| Error::Config(format!("{} ({})", INVALID_DSN, e)))
}

/// Text between the first `?` and any `#`, exactly as written
fn raw_query(dsn: &str) -> &str {
    dsn.split_once('?')
        .map(|(_, rest)| rest.split('#').next().unwrap_or_default())
        .unwrap_or_default()
}

fn host_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn decode(s: &str) -> Result<String> {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .map_err(|e| Error::Config(format!("{} ({})", INVALID_DSN, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard() {
        let params = ConnectionParams::parse("u:p@h:1234/db").unwrap();
        assert_eq!(params.user, "u");
        assert_eq!(params.password, "p");
        assert_eq!(params.addr, "h:1234");
        assert_eq!(params.database, "db");
        assert_eq!(params.sslmode, SslMode::Disable);
    }

    #[test]
    fn test_parse_standard_ssl_true() {
        let params = ConnectionParams::parse("u:p@h:1234/db?ssl=true").unwrap();
        assert_eq!(params.sslmode, SslMode::SkipVerify);
        assert_eq!(params.database, "db");
    }

    #[test]
    fn test_parse_standard_ssl_custom() {
        let params = ConnectionParams::parse("u:p@h:1234/db?ssl=custom").unwrap();
        assert_eq!(params.sslmode, SslMode::Custom);
        assert_eq!(params.addr, "h:1234");
    }

    #[test]
    fn test_parse_standard_ssl_bogus() {
        let result = ConnectionParams::parse("u:p@h:1234/db?ssl=bogus");
        assert!(matches!(result, Err(Error::UnsupportedSsl(v)) if v == "bogus"));
    }

    #[test]
    fn test_parse_standard_ssl_empty() {
        let result = ConnectionParams::parse("u:p@h:1234/db?ssl=");
        assert!(matches!(result, Err(Error::UnsupportedSsl(_))));
    }

    #[test]
    fn test_parse_standard_first_ssl_wins() {
        let params = ConnectionParams::parse("u:p@h:1234/db?ssl=custom&ssl=true").unwrap();
        assert_eq!(params.sslmode, SslMode::Custom);
    }

    #[test]
    fn test_parse_standard_drops_other_params() {
        let params =
            ConnectionParams::parse("u:p@h:1234/db?charset=utf8mb4&ssl=true&timeout=5s").unwrap();
        assert_eq!(params.database, "db");
        assert_eq!(params.sslmode, SslMode::SkipVerify);
    }

    #[test]
    fn test_parse_legacy_no_database() {
        let params = ConnectionParams::parse("u:p@h:1234").unwrap();
        assert_eq!(params.user, "u");
        assert_eq!(params.password, "p");
        assert_eq!(params.addr, "h:1234");
        assert_eq!(params.database, "");
        assert_eq!(params.sslmode, SslMode::Disable);
    }

    #[test]
    fn test_parse_legacy_query_is_database() {
        let params = ConnectionParams::parse("u:p@h:1234?mydb").unwrap();
        assert_eq!(params.database, "mydb");
        assert_eq!(params.sslmode, SslMode::Disable);
    }

    #[test]
    fn test_parse_legacy_query_passed_through_unencoded() {
        let params = ConnectionParams::parse("u:p@h:1234?my db").unwrap();
        assert_eq!(params.database, "my db");

        let params = ConnectionParams::parse("u:p@h:1234?caf%C3%A9#frag").unwrap();
        assert_eq!(params.database, "caf%C3%A9");
    }

    #[test]
    fn test_parse_legacy_ignores_ssl() {
        let params = ConnectionParams::parse("u:p@h:1234?ssl=bogus").unwrap();
        assert_eq!(params.database, "ssl=bogus");
        assert_eq!(params.sslmode, SslMode::Disable);
    }

    #[test]
    fn test_parse_percent_encoded_credentials() {
        let params = ConnectionParams::parse("us%40er:p%3Ass@h:3306/my%20db").unwrap();
        assert_eq!(params.user, "us@er");
        assert_eq!(params.password, "p:ss");
        assert_eq!(params.database, "my db");
    }

    #[test]
    fn test_parse_without_password() {
        let params = ConnectionParams::parse("root@localhost:3306/app").unwrap();
        assert_eq!(params.user, "root");
        assert_eq!(params.password, "");
        assert_eq!(params.addr, "localhost:3306");
    }

    #[test]
    fn test_parse_without_port() {
        let params = ConnectionParams::parse("u:p@localhost/app").unwrap();
        assert_eq!(params.addr, "localhost");
    }

    #[test]
    fn test_parse_ipv6() {
        let params = ConnectionParams::parse("u:p@[::1]:3306/app").unwrap();
        assert_eq!(params.addr, "[::1]:3306");
    }

    #[test]
    fn test_parse_invalid_port() {
        let result = ConnectionParams::parse("u:p@h:notaport/db");
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("invalid dsn")));
    }

    #[test]
    fn test_parse_port_out_of_range() {
        assert!(ConnectionParams::parse("u:p@h:99999/db").is_err());
    }

    #[test]
    fn test_from_str() {
        let params: ConnectionParams = "u:p@h:1234/db".parse().unwrap();
        assert_eq!(params.database, "db");
    }

    #[test]
    fn test_standard_form_detection() {
        assert!(standard_form().is_match("u:p@h:1234/db"));
        assert!(!standard_form().is_match("u:p@h:1234"));
        assert!(!standard_form().is_match("u:p@h:1234/"));
        assert!(!standard_form().is_match("u:p@/db"));
    }

    #[test]
    fn test_resolve_tls() {
        let registry = TlsRegistry::new();
        let params = ConnectionParams::parse("u:p@h:1234/db").unwrap();
        assert!(matches!(params.resolve_tls(&registry), TlsMode::Disabled));

        let params = ConnectionParams::parse("u:p@h:1234/db?ssl=true").unwrap();
        assert!(matches!(params.resolve_tls(&registry), TlsMode::SkipVerify));

        let params = ConnectionParams::parse("u:p@h:1234/db?ssl=custom").unwrap();
        assert!(matches!(params.resolve_tls(&registry), TlsMode::Custom(None)));

        registry
            .register("u:p@h:1234/db", b"", b"", b"", true, "h")
            .unwrap();
        assert!(matches!(
            params.resolve_tls(&registry),
            TlsMode::Custom(Some(_))
        ));
    }

    #[test]
    fn test_to_options() {
        let params = ConnectionParams::parse("u:p@h:1234/db").unwrap();
        let options = params.to_options(TlsMode::Disabled);
        assert_eq!(options.addr, "h:1234");
        assert_eq!(options.user, "u");
        assert_eq!(options.password, "p");
        assert_eq!(options.database, "db");
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("u:p@h:1234/db?ssl=custom").unwrap(), "h:1234");
        assert_eq!(parse_addr("mysql://u:p@h:1234/db").unwrap(), "h:1234");
        assert!(parse_addr("u:p@h:bad/db").is_err());
    }
}
