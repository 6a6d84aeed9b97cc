// samples.rs
use crate::{Client, Produit, Rib};

/// Juegos de datos deterministas para demos y pruebas. Cada llamada
/// devuelve los mismos registros, ya validados por los constructores del
/// dominio.
pub struct Samples;

impl Samples {
  pub fn clients() -> Vec<Client> {
    vec![Client::new("C1", "Moreau", "Claire").unwrap()
                                              .with_email("claire.moreau@example.fr")
                                              .unwrap()
                                              .with_telephone("06 12 34 56 78")
                                              .unwrap(),
         Client::new("C2", "Benali", "Karim").unwrap()
                                              .with_email("k.benali@example.fr")
                                              .unwrap(),
         Client::new("C3", "Lefèvre", "Antoine").unwrap()
                                                 .with_telephone("+33 7 98 76 54 32")
                                                 .unwrap(),
         Client::new("C4", "Rossi", "Giulia").unwrap()]
  }

  pub fn produits() -> Vec<Produit> {
    vec![Produit::new("P1", "Abonnement annuel", "abonnement", 500.0).unwrap(),
         Produit::new("P2", "Abonnement mensuel", "abonnement", 59.9).unwrap(),
         Produit::new("P3", "Pack découverte 10 séances", "cours", 300.0).unwrap(),
         Produit::new("P4", "Cours particulier", "cours", 35.0).unwrap(),
         Produit::new("P5", "Serviette brodée", "boutique", 19.99).unwrap(),
         // Producto retirado: no debe aparecer en las listas de venta.
         Produit::new("P6", "Abonnement étudiant (ancien)", "abonnement", 39.0).unwrap().desactivado()]
  }

  pub fn ribs() -> Vec<Rib> {
    vec![Rib::new("C1",
                  "Claire Moreau",
                  "Crédit Agricole",
                  "FR1420041010050500013M02606",
                  "AGRIFRPP907").unwrap(),
         Rib::new("C2", "Karim Benali", "BNP Paribas", "DE89370400440532013000", "BNPAFRPP").unwrap(),
         Rib::new("C3", "Antoine Lefèvre", "ING Belgique", "BE68539007547034", "GEBABEBB").unwrap()]
  }
}
