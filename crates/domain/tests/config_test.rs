use rqlite_dns_domain::config::{CliOverrides, Config, LogFormat};

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.server.dns_port, 53);
    assert_eq!(config.server.bind_address, "0.0.0.0");
    assert_eq!(config.server.query_timeout_ms, 2000);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
    assert!(config.next.upstream.is_none());
    assert_eq!(config.resolver_config().unwrap().ttl, 300);
}

#[test]
fn test_parse_full_file() {
    let config = Config::from_toml(
        r#"
[server]
dns_port = 5353
udp_workers = 4

[logging]
level = "debug"
format = "json"

[next]
upstream = "1.1.1.1:53"

[plugin]
directives = """
rqlite {
    dsn http://localhost:4001?level=strong
    ttl 300
}
"""
"#,
    )
    .unwrap();

    assert_eq!(config.server.dns_port, 5353);
    assert_eq!(config.server.udp_workers, 4);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.next.upstream.as_deref(), Some("1.1.1.1:53"));
    assert!(config.validate().is_ok());

    let resolver = config.resolver_config().unwrap();
    assert_eq!(resolver.dsn, "http://localhost:4001?level=strong");
    assert_eq!(resolver.ttl, 300);
}

#[test]
fn test_cli_dsn_overrides_directive() {
    let dir = std::env::temp_dir().join(format!("rqlite-dns-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        "[plugin]\ndirectives = \"rqlite {\\n dsn http://a:4001\\n}\"\n",
    )
    .unwrap();

    let config = Config::load(
        path.to_str(),
        CliOverrides {
            dns_port: Some(5300),
            dsn: Some("sqlite::memory:".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(config.server.dns_port, 5300);
    assert_eq!(config.resolver_config().unwrap().dsn, "sqlite::memory:");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_validate_rejects_bad_upstream() {
    let config = Config::from_toml(
        "[next]\nupstream = \"not-an-address\"\n[plugin]\ndirectives = \"rqlite {\\n dsn sqlite::memory:\\n}\"\n",
    )
    .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_requires_dsn() {
    assert!(Config::default().validate().is_err());
}

#[test]
fn test_missing_file_is_error() {
    assert!(Config::load(Some("/nonexistent/rqlite-dns.toml"), CliOverrides::default()).is_err());
}
