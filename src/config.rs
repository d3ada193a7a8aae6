use std::env;

pub const DEFAULT_DB_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_url: String,
    /// Overrides the database named in `db_url`.
    pub db_name: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_url = lookup("DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        let db_name = lookup("DB_NAME").filter(|s| !s.is_empty());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { db_url, db_name, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.db_url, DEFAULT_DB_URL);
        assert_eq!(cfg.db_name, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("DB_URL", "mongodb://db:27017/outiblog"),
            ("DB_NAME", "other"),
            ("PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_url, "mongodb://db:27017/outiblog");
        assert_eq!(cfg.db_name.as_deref(), Some("other"));
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn empty_db_name_is_ignored() {
        let cfg = Config::from_lookup(lookup_from(&[("DB_NAME", "")])).unwrap();
        assert_eq!(cfg.db_name, None);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
    }
}
