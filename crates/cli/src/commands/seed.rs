//! Seed the database with sample customers.
//!
//! Every sample goes through the same validation as the web form. Customers
//! whose email is already registered are looked up and skipped, so the
//! command can be run repeatedly.

use thiserror::Error;
use tracing::{info, warn};

use cadastro_web::db::{CustomerGateway, PgCustomerGateway, RepositoryError};
use cadastro_web::models::CustomerForm;
use cadastro_web::validation;

use super::{ConnectError, connect};

/// Sample customers: name, email, street, city, state, postal code.
const SAMPLE_CUSTOMERS: &[Sample] = &[
    (
        "Ana Souza",
        "ana.souza@example.com",
        "Rua das Flores, 120",
        "Niterói",
        "RJ",
        "24020-000",
    ),
    (
        "Bruno Lima",
        "bruno.lima@example.com",
        "Avenida Paulista, 1000, ap. 52",
        "São Paulo",
        "SP",
        "01310-100",
    ),
    (
        "Carla Mendes",
        "carla.mendes@example.com",
        "Rua da Bahia, 45",
        "Belo Horizonte",
        "MG",
        "30160-011",
    ),
    (
        "Diego Ferreira",
        "diego.ferreira@example.com",
        "Rua dos Andradas, 800",
        "Porto Alegre",
        "RS",
        "90020-004",
    ),
    (
        "Elisa Rocha",
        "elisa.rocha@example.com",
        "Avenida Sete de Setembro, 300",
        "Salvador",
        "BA",
        "40060-001",
    ),
];

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid sample customer {0}")]
    InvalidSample(&'static str),
}

/// What a seed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
    /// Customers stored after the run.
    pub total: i64,
}

/// Insert the sample customers.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or a write fails for
/// a reason other than a duplicate email.
pub async fn run() -> Result<SeedSummary, SeedError> {
    let pool = connect().await?;
    seed(&PgCustomerGateway::new(pool)).await
}

/// Insert every sample whose email is not registered yet.
async fn seed(gateway: &dyn CustomerGateway) -> Result<SeedSummary, SeedError> {
    let mut inserted = 0;
    let mut skipped = 0;

    for sample in SAMPLE_CUSTOMERS {
        let input = validation::validate(&sample_form(sample))
            .map_err(|_| SeedError::InvalidSample(sample.0))?;

        if let Some(existing) = gateway.find_by_email(&input.email).await? {
            info!(customer_id = %existing.id, email = %existing.email, "Customer already exists, skipping");
            skipped += 1;
            continue;
        }

        match gateway.create(&input).await {
            Ok(customer) => {
                info!(customer_id = %customer.id, email = %customer.email, "Inserted customer");
                inserted += 1;
            }
            // Registered by someone else since the lookup.
            Err(RepositoryError::Conflict(_)) => {
                warn!(email = %input.email, "Customer already exists, skipping");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let total = gateway.count().await?;
    Ok(SeedSummary {
        inserted,
        skipped,
        total,
    })
}

type Sample = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

fn sample_form(&(name, email, street, city, state, zip_code): &Sample) -> CustomerForm {
    CustomerForm {
        id: None,
        name: name.to_owned(),
        email: email.to_owned(),
        street: street.to_owned(),
        city: city.to_owned(),
        state: state.to_owned(),
        zip_code: zip_code.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use cadastro_integration_tests::{MemoryCustomerGateway, customer_form};

    use super::*;

    #[test]
    fn test_samples_pass_validation() {
        for sample in SAMPLE_CUSTOMERS {
            assert!(
                validation::validate(&sample_form(sample)).is_ok(),
                "sample {} should be valid",
                sample.0
            );
        }
    }

    #[test]
    fn test_sample_emails_are_unique() {
        let emails: HashSet<_> = SAMPLE_CUSTOMERS.iter().map(|sample| sample.1).collect();
        assert_eq!(emails.len(), SAMPLE_CUSTOMERS.len());
    }

    #[tokio::test]
    async fn test_seed_inserts_samples_into_empty_storage() {
        let gateway = MemoryCustomerGateway::new();

        let summary = seed(&gateway).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                inserted: SAMPLE_CUSTOMERS.len(),
                skipped: 0,
                total: 5,
            }
        );
    }

    #[tokio::test]
    async fn test_seed_skips_registered_emails_without_writing() {
        let gateway = MemoryCustomerGateway::new();
        gateway.insert(&customer_form("Ana", "ANA.SOUZA@example.com"));

        let summary = seed(&gateway).await.unwrap();

        assert_eq!(summary.inserted, SAMPLE_CUSTOMERS.len() - 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total, 5);
        assert_eq!(gateway.calls.create(), SAMPLE_CUSTOMERS.len() - 1);

        let again = seed(&gateway).await.unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, SAMPLE_CUSTOMERS.len());
        assert_eq!(gateway.calls.create(), SAMPLE_CUSTOMERS.len() - 1);
    }
}
