use std::collections::HashMap;
use std::time::Duration;

use pinreset::config::{Config, Environment, IdentityConfig, EMAILJS_DEFAULT_URL};

fn resolve(vars: &[(&str, &str)]) -> Result<Config, String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

const SMTP: [(&str, &str); 4] = [
    ("PINRESET_SMTP_HOST", "smtp.example.com"),
    ("PINRESET_SMTP_USER", "mailer"),
    ("PINRESET_SMTP_PASS", "secret"),
    ("PINRESET_SMTP_FROM", "PIN Reset <no-reply@example.com>"),
];

#[test]
fn defaults_without_any_variables() {
    let config = resolve(&[]).unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert!(config.database_url.is_none());
    assert_eq!(config.port, 3000);
    assert_eq!(config.public_host, "http://0.0.0.0:3000");
    assert_eq!(config.app_scheme, "appwallet");
    assert!(!config.return_debug_link);
    assert!(config.sweep_interval.is_none());
    assert!(config.emailjs.is_none());
    assert!(config.smtp.is_none());
    assert_eq!(config.identity, IdentityConfig::Disabled);
}

#[test]
fn production_requires_database_url() {
    let err = resolve(&[("PINRESET_ENV", "production")]).unwrap_err();
    assert!(err.contains("DATABASE_URL"));

    let config = resolve(&[
        ("PINRESET_ENV", "production"),
        ("DATABASE_URL", "postgres://localhost/pinreset"),
    ])
    .unwrap();
    assert!(config.is_production());
}

#[test]
fn invalid_numbers_name_the_variable() {
    let err = resolve(&[("PINRESET_PORT", "eighty")]).unwrap_err();
    assert!(err.contains("PINRESET_PORT"));

    let err = resolve(&[("PINRESET_SWEEP_INTERVAL_SECS", "-5")]).unwrap_err();
    assert!(err.contains("PINRESET_SWEEP_INTERVAL_SECS"));

    let mut vars = SMTP.to_vec();
    vars.push(("PINRESET_SMTP_PORT", "smtp"));
    let err = resolve(&vars).unwrap_err();
    assert!(err.contains("PINRESET_SMTP_PORT"));
}

#[test]
fn sweep_interval_zero_disables_sweeper() {
    let config = resolve(&[("PINRESET_SWEEP_INTERVAL_SECS", "0")]).unwrap();
    assert!(config.sweep_interval.is_none());

    let config = resolve(&[("PINRESET_SWEEP_INTERVAL_SECS", "90")]).unwrap();
    assert_eq!(config.sweep_interval, Some(Duration::from_secs(90)));
}

#[test]
fn public_host_drops_trailing_slash() {
    let config = resolve(&[("PINRESET_PUBLIC_HOST", "https://wallet.example.com/")]).unwrap();
    assert_eq!(config.public_host, "https://wallet.example.com");
}

#[test]
fn identity_url_requires_api_key() {
    let err = resolve(&[("PINRESET_IDENTITY_URL", "https://id.example.com/token")]).unwrap_err();
    assert!(err.contains("PINRESET_IDENTITY_API_KEY"));
}

#[test]
fn identity_url_takes_precedence_over_jwt_secret() {
    let config = resolve(&[
        ("PINRESET_IDENTITY_URL", "https://id.example.com/token"),
        ("PINRESET_IDENTITY_API_KEY", "key"),
        ("PINRESET_JWT_SECRET", "jwt-secret"),
    ])
    .unwrap();
    assert_eq!(
        config.identity,
        IdentityConfig::Http {
            url: "https://id.example.com/token".to_string(),
            api_key: "key".to_string(),
        }
    );

    let config = resolve(&[("PINRESET_JWT_SECRET", "jwt-secret")]).unwrap();
    assert_eq!(
        config.identity,
        IdentityConfig::Jwt {
            secret: "jwt-secret".to_string()
        }
    );
}

#[test]
fn complete_smtp_group_defaults_to_starttls_port() {
    let config = resolve(&SMTP).unwrap();
    let smtp = config.smtp.unwrap();
    assert_eq!(smtp.host, "smtp.example.com");
    assert_eq!(smtp.port, 587);
    assert!(!smtp.secure);
}

#[test]
fn secure_smtp_defaults_to_implicit_tls_port() {
    let mut vars = SMTP.to_vec();
    vars.push(("PINRESET_SMTP_SECURE", "true"));
    let smtp = resolve(&vars).unwrap().smtp.unwrap();
    assert!(smtp.secure);
    assert_eq!(smtp.port, 465);

    vars.push(("PINRESET_SMTP_PORT", "2465"));
    assert_eq!(resolve(&vars).unwrap().smtp.unwrap().port, 2465);
}

#[test]
fn partial_smtp_group_is_rejected() {
    let err = resolve(&SMTP[..3]).unwrap_err();
    assert!(err.contains("SMTP"));
    assert!(err.contains("PINRESET_SMTP_FROM"));
    assert!(!err.contains("PINRESET_SMTP_HOST"));

    let err = resolve(&[("PINRESET_SMTP_HOST", "smtp.example.com")]).unwrap_err();
    assert!(err.contains("PINRESET_SMTP_USER"));
    assert!(err.contains("PINRESET_SMTP_PASS"));
    assert!(err.contains("PINRESET_SMTP_FROM"));
}

#[test]
fn blank_values_count_as_unset() {
    let mut vars = SMTP.to_vec();
    vars[3] = ("PINRESET_SMTP_FROM", "  ");
    let err = resolve(&vars).unwrap_err();
    assert!(err.contains("PINRESET_SMTP_FROM"));
}

#[test]
fn emailjs_group_is_all_or_nothing() {
    let config = resolve(&[
        ("PINRESET_EMAILJS_SERVICE_ID", "service"),
        ("PINRESET_EMAILJS_TEMPLATE_ID", "template"),
        ("PINRESET_EMAILJS_USER_ID", "user"),
    ])
    .unwrap();
    let emailjs = config.emailjs.unwrap();
    assert_eq!(emailjs.url, EMAILJS_DEFAULT_URL);
    assert_eq!(emailjs.template_id, "template");

    let err = resolve(&[("PINRESET_EMAILJS_SERVICE_ID", "service")]).unwrap_err();
    assert!(err.contains("PINRESET_EMAILJS_TEMPLATE_ID"));
    assert!(err.contains("PINRESET_EMAILJS_USER_ID"));
}
