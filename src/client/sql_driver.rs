//! MySqlDriver implementation

use super::dsn::ConnectionParams;
use crate::connection::{Connection, TlsRegistry};
use crate::driver;
use crate::error::translate;
use crate::protocol::Connector;
use crate::Result;
use tracing::Instrument;

/// Name the driver registers under
pub const DRIVER_NAME: &str = "mysql";

/// Opens [`Connection`]s from DSNs.
///
/// Holds the protocol connector and a handle to the TLS profiles used by
/// `ssl=custom` DSNs.
pub struct MySqlDriver<K> {
    connector: K,
    tls: TlsRegistry,
}

impl<K: Connector> MySqlDriver<K> {
    /// Create a driver
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let tls = TlsRegistry::new();
    /// tls.register("app:secret@db.internal:3306/app", ca, cert, key, false, "db.internal")?;
    ///
    /// let driver = MySqlDriver::new(connector, tls);
    /// let mut conn = driver.open("app:secret@db.internal:3306/app?ssl=custom").await?;
    /// ```
    pub fn new(connector: K, tls: TlsRegistry) -> Self {
        Self { connector, tls }
    }

    /// TLS profiles consulted by `ssl=custom`
    pub fn tls_registry(&self) -> &TlsRegistry {
        &self.tls
    }

    /// Open a connection
    ///
    /// Supports both legacy DSNs (`user:password@addr[?db]`) and standard
    /// DSNs (`user:password@addr/db[?ssl=true|custom]`). Nothing is sent to
    /// the server if the DSN is malformed.
    pub async fn open(&self, dsn: &str) -> Result<Connection<K::Conn>> {
        let params = ConnectionParams::parse(dsn)?;
        let tls = params.resolve_tls(&self.tls);
        let tls_label = tls.as_str();
        let options = params.to_options(tls);

        async {
            match self.connector.connect(options).await {
                Ok(native) => {
                    tracing::info!("connection established");
                    crate::metrics::counters::connection_opened(tls_label);
                    Ok(Connection::new(native))
                }
                Err(e) => {
                    crate::metrics::counters::connection_open_failed();
                    Err(translate("open", e))
                }
            }
        }
        .instrument(tracing::info_span!(
            "open",
            addr = %params.addr,
            user = %params.user,
            database = %params.database,
            tls = tls_label
        ))
        .await
    }
}

impl<K: Connector> driver::Driver for MySqlDriver<K> {
    type Conn = Connection<K::Conn>;

    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    async fn open(&self, dsn: &str) -> Result<Connection<K::Conn>> {
        MySqlDriver::open(self, dsn).await
    }
}

impl<K> std::fmt::Debug for MySqlDriver<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlDriver")
            .field("tls", &self.tls)
            .finish_non_exhaustive()
    }
}
