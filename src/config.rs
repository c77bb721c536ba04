use log::warn;

pub const ENDPOINT_ENV: &str = "SAGEMAKER_ENDPOINT_NAME";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Name of the SageMaker endpoint to score against. Checked per request.
    pub endpoint_name: Option<String>,
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_name = lookup(ENDPOINT_ENV).filter(|name| !name.is_empty());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("Invalid PORT {:?}, falling back to {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let workers = lookup("WORKERS")
            .and_then(|w| w.parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or_else(num_cpus::get);

        Settings {
            endpoint_name,
            host,
            port,
            workers,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = settings(&[]);
        assert_eq!(s.endpoint_name, None);
        assert_eq!(s.bind_address(), "0.0.0.0:8080");
        assert!(s.workers >= 1);
    }

    #[test]
    fn empty_endpoint_counts_as_missing() {
        assert_eq!(settings(&[(ENDPOINT_ENV, "")]).endpoint_name, None);
        assert_eq!(
            settings(&[(ENDPOINT_ENV, "sag-rf-endpoint")]).endpoint_name,
            Some("sag-rf-endpoint".to_string())
        );
    }

    #[test]
    fn bad_numbers_fall_back() {
        let s = settings(&[("HOST", "127.0.0.1"), ("PORT", "http"), ("WORKERS", "0")]);
        assert_eq!(s.bind_address(), "127.0.0.1:8080");
        assert!(s.workers >= 1);

        let s = settings(&[("PORT", "9000"), ("WORKERS", "3")]);
        assert_eq!(s.port, 9000);
        assert_eq!(s.workers, 3);
    }
}
