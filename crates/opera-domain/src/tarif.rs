// tarif.rs
//
// Aritmética de importes de venta. Una sola fórmula para toda la caja:
// precio unitario × cantidad × (1 − remise/100), redondeada al céntimo.
// El paso de selección es quien acota sus entradas (cantidad ≥ 1, remise
// en [0, 100]); estas funciones son puras y no re-validan.

/// Redondeo comercial al céntimo más cercano.
pub fn round_cents(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Importe neto de una línea de venta. Con `prix_unitaire = 300`,
/// `quantite = 2` y `remise_pct = 10` el resultado es `540.00`.
pub fn net_total(prix_unitaire: f64, quantite: u32, remise_pct: f64) -> f64 {
  round_cents(prix_unitaire * quantite as f64 * (1.0 - remise_pct / 100.0))
}
