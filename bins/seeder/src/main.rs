//! Demo book seeder for Emanet Defteri development and testing.
//!
//! Seeds three customers, three value types and a handful of deposits and
//! loans for the demo user, then logs each customer's net position.
//! Running it twice leaves an already seeded book alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use emanet_core::format::format_net;
use emanet_core::ledger::{DepositDirection, LoanDirection, NewCustomer, NewDeposit, NewLoan};
use emanet_core::registry::{NewValueType, Unit};
use emanet_core::{BalanceEngine, BookPolicy};
use emanet_db::{CollectionRepository, SyncManager};
use emanet_shared::{AppConfig, CustomerId, UserId, ValueTypeId};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Owner of the demo book.
const DEMO_USER: &str = "demo-user";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emanet=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = emanet_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    emanet_db::migrate(&db).await.context("Failed to migrate")?;
    info!(url = %config.database.url, "Connected to database");

    let mut manager = SyncManager::new(
        CollectionRepository::new(db),
        BookPolicy::from(&config.ledger),
    );
    manager.connect(UserId::from(DEMO_USER)).await?;

    if manager.book()?.customers().next().is_some() {
        info!(user_id = DEMO_USER, "Demo book already seeded, skipping");
    } else {
        seed(&mut manager).await?;
    }

    report(&manager, &config)?;
    manager.disconnect();
    Ok(())
}

fn value_type(id: &str, name: &str, symbol: &str, unit: Unit) -> NewValueType {
    NewValueType {
        id: Some(ValueTypeId::from_key(id)),
        name: name.to_string(),
        symbol: symbol.to_string(),
        unit,
        color: None,
        description: None,
    }
}

fn customer(id: &str, first: &str, last: &str, phone: &str, note: &str) -> NewCustomer {
    NewCustomer {
        id: Some(CustomerId::from_key(id)),
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: Some(phone.to_string()),
        note: Some(note.to_string()),
        sequence_number: None,
    }
}

async fn seed(manager: &mut SyncManager<CollectionRepository>) -> anyhow::Result<()> {
    let bracelet = manager
        .add_value_type(value_type("demo-tur-1", "22 Ayar Bilezik", "Au", Unit::Weight))
        .await?
        .id;
    let silver = manager
        .add_value_type(value_type("demo-tur-2", "Gümüş", "Ag", Unit::Weight))
        .await?
        .id;
    let cash = manager
        .add_value_type(value_type("demo-tur-3", "Nakit TL", "₺", Unit::Currency))
        .await?
        .id;
    info!("Seeded value types");

    let ahmet = manager
        .add_customer(customer("demo-musteri-1", "Ahmet", "Yılmaz", "0532 123 4567", "Güvenilir müşteri"))
        .await?
        .id;
    let fatma = manager
        .add_customer(customer("demo-musteri-2", "Fatma", "Demir", "0533 987 6543", "Düzenli müşteri"))
        .await?
        .id;
    let mehmet = manager
        .add_customer(customer("demo-musteri-3", "Mehmet", "Kaya", "0534 555 1234", "Yeni müşteri"))
        .await?
        .id;
    info!("Seeded customers");

    let deposits = [
        (&ahmet, &bracelet, DepositDirection::In, dec!(500), "22 ayar bilezik emanet"),
        (&fatma, &silver, DepositDirection::In, dec!(25), "Gümüş emanet"),
        (&ahmet, &bracelet, DepositDirection::Out, dec!(150), "Altın geri alındı"),
        (&mehmet, &cash, DepositDirection::In, dec!(5000), "Nakit emanet"),
    ];
    for (customer_id, value_type_id, direction, amount, description) in deposits {
        manager
            .record_deposit(
                NewDeposit::new(customer_id.clone(), value_type_id.clone(), direction, amount)
                    .with_description(description),
            )
            .await?;
    }

    let loans = [
        (&fatma, &bracelet, dec!(150), "22 ayar bilezik borç"),
        (&mehmet, &cash, dec!(3500), "Nakit borç"),
    ];
    for (customer_id, value_type_id, amount, description) in loans {
        manager
            .record_loan(
                NewLoan::new(customer_id.clone(), value_type_id.clone(), LoanDirection::Out, amount)
                    .with_description(description),
            )
            .await?;
    }
    info!("Seeded deposits and loans");
    Ok(())
}

fn report(manager: &SyncManager<CollectionRepository>, config: &AppConfig) -> anyhow::Result<()> {
    let book = manager.book()?;
    let summary = BalanceEngine::book_summary(book.customers(), book.deposits(), book.loans());
    info!(
        customers = summary.customer_count,
        deposit_types = summary.deposit_type_count,
        loan_types = summary.loan_type_count,
        "Demo book ready"
    );

    for customer in book.customers_by_sequence() {
        let net = BalanceEngine::net_position(book.deposits(), book.loans(), &customer.id);
        for (value_type_id, amount) in net {
            info!(
                customer = %customer.full_name(),
                net = %format_net(amount, &book.value_type(&value_type_id), &config.display),
                "Net position"
            );
        }
    }
    Ok(())
}
