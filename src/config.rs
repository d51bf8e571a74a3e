use crate::error::{AppResult, BadEnvVarSnafu, ParseTimeoutSnafu, UnknownDeleteTransportSnafu};
use dotenvy::var;
use snafu::ResultExt;
use std::{sync::Arc, time::Duration};

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    backend_config: Arc<BackendConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            backend_config: Arc::new(BackendConfig::new()?),
        })
    }

    pub fn backend_config(&self) -> Arc<BackendConfig> {
        self.backend_config.clone()
    }
}

/// How a soft delete reaches the backend. Both carry the full aggregate with the delete flag set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeleteTransport {
    /// `PUT /students`
    Put,
    /// `PATCH /students/{id}`
    Patch,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
    delete_transport: DeleteTransport,
    timeout: Duration,
}

impl BackendConfig {
    pub fn new() -> AppResult<Self> {
        Self::from_lookup(|name| var(name))
    }

    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> AppResult<Self> {
        let get_env_var = |name| lookup(name).context(BadEnvVarSnafu { name });
        let get_optional = |name| lookup(name).ok().filter(|value: &String| !value.trim().is_empty());

        let base_url = get_env_var("STUDENTS_API_BASE_URL")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let delete_transport = match get_optional("STUDENTS_DELETE_TRANSPORT") {
            None => DeleteTransport::Put,
            Some(found) => match found.trim().to_ascii_lowercase().as_str() {
                "put" => DeleteTransport::Put,
                "patch" => DeleteTransport::Patch,
                _ => return UnknownDeleteTransportSnafu { found }.fail(),
            },
        };

        let timeout = match get_optional("STUDENTS_API_TIMEOUT_SECS") {
            None => Duration::from_secs(10),
            Some(secs) => Duration::from_secs(secs.trim().parse().context(ParseTimeoutSnafu)?),
        };

        Ok(Self {
            base_url,
            delete_transport,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn delete_transport(&self) -> DeleteTransport {
        self.delete_transport
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(
        vars: &[(&'static str, &str)],
    ) -> impl Fn(&'static str) -> Result<String, dotenvy::Error> {
        let vars: HashMap<&'static str, String> = vars
            .iter()
            .map(|(name, value)| (*name, (*value).to_string()))
            .collect();
        move |name| {
            vars.get(name)
                .cloned()
                .ok_or(dotenvy::Error::EnvVar(std::env::VarError::NotPresent))
        }
    }

    #[test]
    fn defaults_apply_when_only_base_url_is_set() {
        let config =
            BackendConfig::from_lookup(lookup_from(&[("STUDENTS_API_BASE_URL", "http://localhost:8080/")]))
                .unwrap();

        assert_eq!(
            config,
            BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                delete_transport: DeleteTransport::Put,
                timeout: Duration::from_secs(10),
            }
        );
        assert_eq!(config.url("/students"), "http://localhost:8080/students");
    }

    #[test]
    fn patch_transport_and_timeout_are_read() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("STUDENTS_API_BASE_URL", "http://api"),
            ("STUDENTS_DELETE_TRANSPORT", "PATCH"),
            ("STUDENTS_API_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.delete_transport(), DeleteTransport::Patch);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn missing_base_url_is_an_error() {
        let err = BackendConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            AppError::BadEnvVar {
                name: "STUDENTS_API_BASE_URL",
                ..
            }
        ));
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let err = BackendConfig::from_lookup(lookup_from(&[
            ("STUDENTS_API_BASE_URL", "http://api"),
            ("STUDENTS_DELETE_TRANSPORT", "delete"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::UnknownDeleteTransport { found } if found == "delete"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = BackendConfig::from_lookup(lookup_from(&[
            ("STUDENTS_API_BASE_URL", "http://api"),
            ("STUDENTS_API_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ParseTimeout { .. }));
    }
}
