#![no_main]

use libfuzzer_sys::fuzz_target;
use mysql_sqldriver::{ConnectionParams, SslMode};

fuzz_target!(|dsn: &str| {
    if let Ok(params) = ConnectionParams::parse(dsn) {
        // Legacy DSNs never carry a TLS directive
        if !dsn.contains('/') {
            assert_eq!(params.sslmode, SslMode::Disable);
        }
    }
    let _ = mysql_sqldriver::client::parse_addr(dsn);
});
