// client.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cliente del club. El identificador es la clave que viaja en los
/// contextos de workflow (`client_id`); el resto son datos de contacto.
///
/// Todos los campos se validan en la construcción: una vez creado el
/// cliente es estructuralmente correcto y los accesores no pueden fallar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  id: String,
  nom: String,
  prenom: String,
  email: Option<String>,
  telephone: Option<String>,
}

impl Client {
  pub fn new(id: &str, nom: &str, prenom: &str) -> Result<Self, DomainError> {
    if id.trim().is_empty() {
      return Err(DomainError::Validation("el id del cliente no puede estar vacío".to_string()));
    }
    if nom.trim().is_empty() {
      return Err(DomainError::Validation("el nom del cliente no puede estar vacío".to_string()));
    }
    if prenom.trim().is_empty() {
      return Err(DomainError::Validation("el prenom del cliente no puede estar vacío".to_string()));
    }
    Ok(Self { id: id.trim().to_string(),
              nom: nom.trim().to_string(),
              prenom: prenom.trim().to_string(),
              email: None,
              telephone: None })
  }

  /// Añade un email con comprobación básica de forma (local@dominio.tld).
  pub fn with_email(mut self, email: &str) -> Result<Self, DomainError> {
    let email = email.trim();
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
      return Err(DomainError::Validation(format!("email inválido: '{}'", email)));
    }
    self.email = Some(email.to_string());
    Ok(self)
  }

  /// Añade un teléfono: prefijo `+` opcional y de 6 a 15 dígitos, ignorando
  /// espacios, puntos y guiones de presentación.
  pub fn with_telephone(mut self, telephone: &str) -> Result<Self, DomainError> {
    let raw = telephone.trim();
    let compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '.' | '-')).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) || !(6..=15).contains(&digits.len()) {
      return Err(DomainError::Validation(format!("teléfono inválido: '{}'", raw)));
    }
    self.telephone = Some(raw.to_string());
    Ok(self)
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn nom(&self) -> &str {
    &self.nom
  }

  pub fn prenom(&self) -> &str {
    &self.prenom
  }

  pub fn email(&self) -> Option<&str> {
    self.email.as_deref()
  }

  pub fn telephone(&self) -> Option<&str> {
    self.telephone.as_deref()
  }

  /// Nombre de presentación: "Prenom Nom".
  pub fn nom_complet(&self) -> String {
    format!("{} {}", self.prenom, self.nom)
  }
}

impl fmt::Display for Client {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Client({}, {})", self.id, self.nom_complet())
  }
}
