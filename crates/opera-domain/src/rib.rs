// rib.rs
use crate::DomainError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Longitud total del IBAN por código de país (ISO 13616). La tabla cubre
/// los países de origen habituales de la clientela; un país fuera de la
/// tabla se rechaza en lugar de adivinar su longitud.
static IBAN_LENGTHS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
  HashMap::from([("AD", 24),
                 ("AT", 20),
                 ("BE", 16),
                 ("CH", 21),
                 ("DE", 22),
                 ("ES", 24),
                 ("FR", 27),
                 ("GB", 22),
                 ("IE", 22),
                 ("IT", 27),
                 ("LU", 20),
                 ("MA", 28),
                 ("MC", 27),
                 ("NL", 18),
                 ("PT", 25)])
});

/// Relevé d'identité bancaire: la referencia de cuenta que un cliente
/// registra para los prélèvements. El IBAN y el BIC se normalizan
/// (mayúsculas, sin espacios) y se validan estructuralmente en la
/// construcción, así que un `Rib` existente siempre es utilizable tal cual
/// en un mandato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rib {
  client_id: String,
  titulaire: String,
  banque: String,
  iban: String,
  bic: String,
}

impl Rib {
  pub fn new(client_id: &str, titulaire: &str, banque: &str, iban: &str, bic: &str) -> Result<Self, DomainError> {
    if client_id.trim().is_empty() {
      return Err(DomainError::Validation("el client_id del RIB no puede estar vacío".to_string()));
    }
    if titulaire.trim().is_empty() {
      return Err(DomainError::Validation("el titulaire del RIB no puede estar vacío".to_string()));
    }
    if banque.trim().is_empty() {
      return Err(DomainError::Validation("la banque del RIB no puede estar vacía".to_string()));
    }
    let iban = validate_iban(iban)?;
    let bic = validate_bic(bic)?;
    Ok(Self { client_id: client_id.trim().to_string(),
              titulaire: titulaire.trim().to_string(),
              banque: banque.trim().to_string(),
              iban,
              bic })
  }

  pub fn client_id(&self) -> &str {
    &self.client_id
  }

  pub fn titulaire(&self) -> &str {
    &self.titulaire
  }

  pub fn banque(&self) -> &str {
    &self.banque
  }

  /// IBAN normalizado (mayúsculas, sin espacios).
  pub fn iban(&self) -> &str {
    &self.iban
  }

  pub fn bic(&self) -> &str {
    &self.bic
  }

  /// IBAN parcialmente oculto para mostrar en pantallas y resúmenes.
  pub fn iban_masque(&self) -> String {
    // La longitud mínima aceptada supera con holgura 4+4, no hay solape.
    format!("{}…{}", &self.iban[..4], &self.iban[self.iban.len() - 4..])
  }
}

impl fmt::Display for Rib {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Rib({} — {} / {})", self.titulaire, self.banque, self.iban_masque())
  }
}

/// Normaliza y valida un IBAN: mayúsculas sin espacios, país en la tabla,
/// longitud exacta del país y checksum ISO 7064 mod 97-10. Devuelve la
/// forma normalizada.
fn validate_iban(raw: &str) -> Result<String, DomainError> {
  let iban: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
  if iban.len() < 15 || !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
    return Err(DomainError::Validation(format!("IBAN inválido: '{}'", raw.trim())));
  }
  let country = &iban[..2];
  if !country.chars().all(|c| c.is_ascii_uppercase()) || !iban[2..4].chars().all(|c| c.is_ascii_digit()) {
    return Err(DomainError::Validation(format!("IBAN inválido: '{}' no empieza por país + dígitos de control", iban)));
  }
  match IBAN_LENGTHS.get(country) {
    Some(expected) if *expected == iban.len() => {}
    Some(expected) => {
      return Err(DomainError::Validation(format!("IBAN inválido: {} requiere {} caracteres y llegaron {}",
                                                 country,
                                                 expected,
                                                 iban.len())));
    }
    None => {
      return Err(DomainError::Validation(format!("IBAN inválido: país '{}' no soportado", country)));
    }
  }
  if mod97(&iban) != 1 {
    return Err(DomainError::Validation(format!("IBAN inválido: checksum incorrecto para '{}'", iban)));
  }
  Ok(iban)
}

/// Resto mod 97 del IBAN reordenado (los 4 primeros caracteres al final,
/// letras convertidas a números A=10..Z=35), calculado incrementalmente
/// para no necesitar aritmética de precisión arbitraria.
fn mod97(iban: &str) -> u32 {
  let mut rem: u32 = 0;
  for c in iban[4..].chars().chain(iban[..4].chars()) {
    if let Some(d) = c.to_digit(10) {
      rem = (rem * 10 + d) % 97;
    } else {
      let v = c as u32 - 'A' as u32 + 10;
      rem = (rem * 100 + v) % 97;
    }
  }
  rem
}

/// Normaliza y valida un BIC (ISO 9362): 8 u 11 caracteres, banco (4
/// letras) + país (2 letras) + plaza (2 alfanuméricos) + sucursal opcional
/// (3 alfanuméricos). Devuelve la forma normalizada en mayúsculas.
fn validate_bic(raw: &str) -> Result<String, DomainError> {
  let bic = raw.trim().to_uppercase();
  // Solo ASCII antes de trocear: el alfabeto BIC no admite acentos.
  if !bic.chars().all(|c| c.is_ascii_alphanumeric()) {
    return Err(DomainError::Validation(format!("BIC inválido: '{}' contiene caracteres fuera de A-Z/0-9", raw.trim())));
  }
  if bic.len() != 8 && bic.len() != 11 {
    return Err(DomainError::Validation(format!("BIC inválido: '{}' debe tener 8 u 11 caracteres", raw.trim())));
  }
  let ok = bic[..4].chars().all(|c| c.is_ascii_uppercase())
           && bic[4..6].chars().all(|c| c.is_ascii_uppercase())
           && bic[6..].chars().all(|c| c.is_ascii_alphanumeric());
  if !ok {
    return Err(DomainError::Validation(format!("BIC inválido: '{}' no respeta banco/país/plaza", bic)));
  }
  Ok(bic)
}
