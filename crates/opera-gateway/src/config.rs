// config.rs
use crate::errors::GatewayError;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuración de la pasarela REST. Se construye a mano o desde el
/// entorno (`from_env`), siguiendo el mismo esquema de variables que el
/// resto del despliegue:
///
/// - `OPERA_API_URL` (obligatoria): URL base del backend, sin `/` final.
/// - `OPERA_API_TOKEN` (opcional): token bearer adjuntado a cada petición.
/// - `OPERA_HTTP_TIMEOUT_SECS` (opcional): timeout por petición, 10 s por
///   defecto.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub base_url: String,
  pub token: Option<String>,
  pub timeout: Duration,
}

impl GatewayConfig {
  pub fn new(base_url: &str) -> Result<Self, GatewayError> {
    let base = base_url.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
      return Err(GatewayError::Config(format!("la URL base debe ser http(s): '{}'", base_url.trim())));
    }
    Ok(Self { base_url: base.to_string(),
              token: None,
              timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) })
  }

  pub fn with_token(mut self, token: &str) -> Self {
    self.token = Some(token.to_string());
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Lee la configuración del entorno (cargando `.env` si existe).
  pub fn from_env() -> Result<Self, GatewayError> {
    dotenvy::dotenv().ok();
    let base = std::env::var("OPERA_API_URL").map_err(|_| {
                                               GatewayError::Config("OPERA_API_URL no está definida".to_string())
                                             })?;
    let mut config = Self::new(&base)?;
    if let Ok(token) = std::env::var("OPERA_API_TOKEN") {
      if !token.trim().is_empty() {
        config.token = Some(token.trim().to_string());
      }
    }
    if let Ok(raw) = std::env::var("OPERA_HTTP_TIMEOUT_SECS") {
      let secs: u64 = raw.trim().parse().map_err(|_| {
                                           GatewayError::Config(format!("OPERA_HTTP_TIMEOUT_SECS inválida: '{}'", raw))
                                         })?;
      config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
  }
}
