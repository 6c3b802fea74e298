use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub public_host: String,
    pub app_scheme: String,
    pub return_debug_link: bool,
    pub log_level: String,
    pub sweep_interval: Option<Duration>,
    pub emailjs: Option<EmailJsConfig>,
    pub smtp: Option<SmtpConfig>,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub url: String,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
    /// Implicit TLS instead of STARTTLS.
    pub secure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityConfig {
    Disabled,
    Jwt { secret: String },
    Http { url: String, api_key: String },
}

/// EmailJS REST endpoint. The account's template must render these
/// `template_params`: `to_email`, `subject`, `reset_link`, `deep_link`,
/// `message_html` and `message_text`.
pub const EMAILJS_DEFAULT_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

const EMAILJS_VARS: [&str; 3] = [
    "PINRESET_EMAILJS_SERVICE_ID",
    "PINRESET_EMAILJS_TEMPLATE_ID",
    "PINRESET_EMAILJS_USER_ID",
];

const SMTP_VARS: [&str; 4] = [
    "PINRESET_SMTP_HOST",
    "PINRESET_SMTP_USER",
    "PINRESET_SMTP_PASS",
    "PINRESET_SMTP_FROM",
];

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let vars = Vars(lookup);

        let environment = match vars.or("PINRESET_ENV", "development").as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let database_url = vars.optional("DATABASE_URL");
        if database_url.is_none() && environment == Environment::Production {
            return Err("DATABASE_URL is required when PINRESET_ENV=production".to_string());
        }

        let host: IpAddr = vars.parse("PINRESET_HOST", "0.0.0.0")?;
        let port: u16 = vars.parse("PINRESET_PORT", "3000")?;

        let public_host = vars
            .or("PINRESET_PUBLIC_HOST", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let app_scheme = vars.or("PINRESET_APP_SCHEME", "appwallet");
        let return_debug_link = vars.flag("PINRESET_RETURN_DEBUG_LINK");
        let log_level = vars.or("PINRESET_LOG_LEVEL", "info");

        let sweep_secs: u64 = vars.parse("PINRESET_SWEEP_INTERVAL_SECS", "0")?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        let emailjs = match vars.group(EMAILJS_VARS, "EmailJS")? {
            Some([service_id, template_id, user_id]) => Some(EmailJsConfig {
                url: vars.or("PINRESET_EMAILJS_URL", EMAILJS_DEFAULT_URL),
                service_id,
                template_id,
                user_id,
            }),
            None => None,
        };

        let smtp = match vars.group(SMTP_VARS, "SMTP")? {
            Some([host, user, pass, from]) => {
                let secure = vars.flag("PINRESET_SMTP_SECURE");
                let default_port = if secure { "465" } else { "587" };
                Some(SmtpConfig {
                    host,
                    port: vars.parse("PINRESET_SMTP_PORT", default_port)?,
                    user,
                    pass,
                    from,
                    secure,
                })
            }
            None => None,
        };

        let identity = match (
            vars.optional("PINRESET_IDENTITY_URL"),
            vars.optional("PINRESET_IDENTITY_API_KEY"),
            vars.optional("PINRESET_JWT_SECRET"),
        ) {
            (Some(url), Some(api_key), _) => IdentityConfig::Http { url, api_key },
            (Some(_), None, _) => {
                return Err("PINRESET_IDENTITY_URL requires PINRESET_IDENTITY_API_KEY".to_string());
            }
            (None, _, Some(secret)) => IdentityConfig::Jwt { secret },
            _ => IdentityConfig::Disabled,
        };

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            public_host,
            app_scheme,
            return_debug_link,
            log_level,
            sweep_interval,
            emailjs,
            smtp,
            identity,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str) -> bool {
        matches!(
            self.or(key, "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    }

    fn parse<T>(&self, key: &str, default: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or(key, default)
            .parse()
            .map_err(|e| format!("Invalid {key}: {e}"))
    }

    /// All of `keys` or none of them.
    fn group<const N: usize>(&self, keys: [&str; N], label: &str) -> Result<Option<[String; N]>, String> {
        let values = keys.map(|key| self.optional(key));
        let missing: Vec<&str> = keys
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();

        if missing.len() == N {
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(format!("{label} is partially configured; missing {}", missing.join(", ")));
        }
        Ok(Some(values.map(Option::unwrap_or_default)))
    }
}
