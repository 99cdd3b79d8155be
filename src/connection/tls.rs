//! TLS configuration and the per-address TLS profile registry.
//!
//! A DSN selects secure transport with its `ssl` parameter. `ssl=custom`
//! looks up a profile registered for the DSN's `host:port` in a
//! [`TlsRegistry`] owned by the host process.

use crate::{Error, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Secure transport directive carried by a DSN (`ssl` query parameter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    /// No `ssl` parameter: plaintext connection
    #[default]
    Disable,
    /// `ssl=true`: TLS, server certificate is not verified
    SkipVerify,
    /// `ssl=custom`: TLS using the profile registered for the address
    Custom,
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disable => write!(f, "disable"),
            Self::SkipVerify => write!(f, "true"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for SslMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "true" => Ok(Self::SkipVerify),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::UnsupportedSsl(s.to_string())),
        }
    }
}

/// TLS configuration for one server address.
///
/// Built from in-memory PEM material with [`TlsConfig::builder`].
#[derive(Clone)]
pub struct TlsConfig {
    /// Expected server name (empty = derive from the address)
    server_name: String,
    /// Whether server certificate verification is disabled
    danger_skip_verify: bool,
    /// Whether a client certificate is presented (mTLS)
    client_auth: bool,
    /// Compiled rustls ClientConfig
    client_config: Arc<ClientConfig>,
}

impl TlsConfig {
    /// Create a new TLS configuration builder.
    pub fn builder() -> TlsConfigBuilder {
        TlsConfigBuilder::default()
    }

    /// Get the rustls ClientConfig for this TLS configuration.
    pub fn client_config(&self) -> Arc<ClientConfig> {
        self.client_config.clone()
    }

    /// Expected server name, if one was given.
    pub fn server_name(&self) -> Option<&str> {
        if self.server_name.is_empty() {
            None
        } else {
            Some(&self.server_name)
        }
    }

    /// Check if server certificate verification is disabled.
    pub fn danger_skip_verify(&self) -> bool {
        self.danger_skip_verify
    }

    /// Check if a client certificate is presented.
    pub fn client_auth(&self) -> bool {
        self.client_auth
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("server_name", &self.server_name)
            .field("danger_skip_verify", &self.danger_skip_verify)
            .field("client_auth", &self.client_auth)
            .field("client_config", &"<ClientConfig>")
            .finish()
    }
}

/// Builder for TLS configuration.
#[derive(Default)]
pub struct TlsConfigBuilder {
    ca_pem: Vec<u8>,
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
    danger_skip_verify: bool,
    server_name: String,
}

impl TlsConfigBuilder {
    /// Set the CA certificate bundle (PEM).
    pub fn ca_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = pem.into();
        self
    }

    /// Set the client certificate chain and private key (PEM) for mutual TLS.
    ///
    /// Both are optional, but must be given together.
    pub fn client_cert_pem(mut self, cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        self.cert_pem = cert.into();
        self.key_pem = key.into();
        self
    }

    /// ⚠️ **DANGER**: Accept any server certificate.
    pub fn danger_skip_verify(mut self, skip: bool) -> Self {
        self.danger_skip_verify = skip;
        self
    }

    /// Set the expected server name.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Build the TLS configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the CA bundle holds no certificate and verification is enabled
    /// - a PEM block cannot be parsed
    /// - only one of client certificate and key is given
    pub fn build(self) -> Result<TlsConfig> {
        let builder = if self.danger_skip_verify {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
        } else {
            ClientConfig::builder().with_root_certificates(load_root_store(&self.ca_pem)?)
        };

        let client_auth = !self.cert_pem.is_empty() || !self.key_pem.is_empty();
        let client_config = if client_auth {
            let certs = load_certs(&self.cert_pem, "client certificate")?;
            let key = load_private_key(&self.key_pem)?;
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| Error::Config(format!("invalid client certificate: {}", e)))?
        } else {
            builder.with_no_client_auth()
        };

        Ok(TlsConfig {
            server_name: self.server_name,
            danger_skip_verify: self.danger_skip_verify,
            client_auth,
            client_config: Arc::new(client_config),
        })
    }
}

fn load_root_store(ca_pem: &[u8]) -> Result<RootCertStore> {
    let mut root_store = RootCertStore::empty();
    let (added, _ignored) =
        root_store.add_parsable_certificates(load_certs(ca_pem, "CA certificate")?);
    if added == 0 {
        return Err(Error::Config("no valid CA certificates found".into()));
    }
    Ok(root_store)
}

fn load_certs(pem: &[u8], what: &str) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::Cursor::new(pem);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", what, e)))?;

    if certs.is_empty() {
        return Err(Error::Config(format!("no {} found in PEM data", what)));
    }
    Ok(certs)
}

fn load_private_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::Cursor::new(pem);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| Error::Config(format!("failed to parse client key: {}", e)))?
        .ok_or_else(|| Error::Config("no client key found in PEM data".into()))
}

/// Accepts any server certificate.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

/// TLS profiles keyed by `host:port`.
///
/// Keyed by address rather than server name, since several services may
/// share a hostname on different ports. Cloning yields another handle to the
/// same store. Profiles are meant to be registered during startup, before
/// the connections that use them are opened; the last registration for an
/// address wins.
#[derive(Clone, Default)]
pub struct TlsRegistry {
    profiles: Arc<RwLock<HashMap<String, Arc<TlsConfig>>>>,
}

impl TlsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from PEM material and store it under the DSN's address.
    ///
    /// Only the `host:port` part of `dsn` is consulted. Empty `cert_pem` and
    /// `key_pem` mean no client certificate.
    pub fn register(
        &self,
        dsn: &str,
        ca_pem: &[u8],
        cert_pem: &[u8],
        key_pem: &[u8],
        danger_skip_verify: bool,
        server_name: &str,
    ) -> Result<()> {
        let addr = crate::client::parse_addr(dsn)?;
        let config = TlsConfig::builder()
            .ca_pem(ca_pem)
            .client_cert_pem(cert_pem, key_pem)
            .danger_skip_verify(danger_skip_verify)
            .server_name(server_name)
            .build()?;
        self.insert(addr, config);
        Ok(())
    }

    /// Store a prebuilt profile for `addr`
    pub fn insert(&self, addr: impl Into<String>, config: TlsConfig) {
        let addr = addr.into();
        tracing::debug!(addr = %addr, "registered TLS profile");
        crate::metrics::counters::tls_profile_registered();
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(addr, Arc::new(config));
    }

    /// Look up the profile for `addr`
    pub fn get(&self, addr: &str) -> Option<Arc<TlsConfig>> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(addr)
            .cloned()
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no profile is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TlsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsRegistry")
            .field("profiles", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_from_str() {
        assert_eq!("true".parse::<SslMode>().unwrap(), SslMode::SkipVerify);
        assert_eq!("custom".parse::<SslMode>().unwrap(), SslMode::Custom);
    }

    #[test]
    fn test_ssl_mode_from_str_invalid() {
        assert!(matches!(
            "bogus".parse::<SslMode>(),
            Err(Error::UnsupportedSsl(v)) if v == "bogus"
        ));
        assert!("false".parse::<SslMode>().is_err());
        assert!("".parse::<SslMode>().is_err());
    }

    #[test]
    fn test_ssl_mode_default() {
        assert_eq!(SslMode::default(), SslMode::Disable);
    }

    #[test]
    fn test_skip_verify_without_ca() {
        let tls = TlsConfig::builder()
            .danger_skip_verify(true)
            .server_name("db.internal")
            .build()
            .expect("Failed to build TLS config");

        assert!(tls.danger_skip_verify());
        assert!(!tls.client_auth());
        assert_eq!(tls.server_name(), Some("db.internal"));
    }

    #[test]
    fn test_verify_requires_ca() {
        let result = TlsConfig::builder().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_garbage_ca_rejected() {
        let result = TlsConfig::builder().ca_pem(&b"not a certificate"[..]).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_client_cert_without_key_rejected() {
        let result = TlsConfig::builder()
            .danger_skip_verify(true)
            .client_cert_pem(&b"garbage"[..], Vec::<u8>::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_tls_config_debug() {
        let tls = TlsConfig::builder()
            .danger_skip_verify(true)
            .build()
            .expect("Failed to build TLS config");

        let debug_str = format!("{:?}", tls);
        assert!(debug_str.contains("TlsConfig"));
        assert!(debug_str.contains("danger_skip_verify"));
    }

    #[test]
    fn test_registry_keyed_by_addr() {
        let registry = TlsRegistry::new();
        registry
            .register("user:pass@db1:3306/app", b"", b"", b"", true, "db1")
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("db1:3306").is_some());
        assert!(registry.get("db1:3307").is_none());
        assert!(registry.get("db1").is_none());
    }

    #[test]
    fn test_registry_last_write_wins() {
        let registry = TlsRegistry::new();
        registry
            .register("u:p@h:1234/db", b"", b"", b"", true, "first")
            .unwrap();
        registry
            .register("mysql://u:p@h:1234/other", b"", b"", b"", true, "second")
            .unwrap();

        assert_eq!(registry.len(), 1);
        let profile = registry.get("h:1234").unwrap();
        assert_eq!(profile.server_name(), Some("second"));
    }

    #[test]
    fn test_registry_clone_shares_store() {
        let registry = TlsRegistry::new();
        let handle = registry.clone();
        registry
            .register("u:p@h:1234/db", b"", b"", b"", true, "")
            .unwrap();
        assert!(handle.get("h:1234").is_some());
    }

    #[test]
    fn test_registry_rejects_malformed_dsn() {
        let registry = TlsRegistry::new();
        let result = registry.register("u:p@h:notaport/db", b"", b"", b"", true, "");
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(registry.is_empty());
    }
}
