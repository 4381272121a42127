//! Database seeder for Vertice development and testing.
//!
//! Seeds an admin, a client with a few deposits, and prints bearer tokens
//! for both so the API can be exercised locally.
//!
//! Usage: cargo run --bin seeder

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;
use vertice_db::UserRepository;
use vertice_db::entities::{investments, sea_orm_active_enums::InvestmentStatus};
use vertice_shared::{AppConfig, JwtService};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Client user ID (consistent for all seeds)
const CLIENT_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// Seeded deposits: (id, amount in cents, status, days since payment).
const INVESTMENTS: [(&str, i64, InvestmentStatus, i64); 3] = [
    (
        "00000000-0000-0000-0000-000000000101",
        5_000_000,
        InvestmentStatus::Approved,
        120,
    ),
    (
        "00000000-0000-0000-0000-000000000102",
        1_500_000,
        InvestmentStatus::Approved,
        30,
    ),
    (
        "00000000-0000-0000-0000-000000000103",
        250_000,
        InvestmentStatus::Pending,
        1,
    ),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = vertice_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding investments...");
    seed_investments(&db).await;

    let jwt = JwtService::new(&config.jwt);
    println!("Development tokens (valid {}s):", config.jwt.access_token_expiry_secs);
    for (label, id, is_admin) in [("admin", admin_id(), true), ("client", client_id(), false)] {
        match jwt.generate_access_token(id, is_admin) {
            Ok(token) => println!("  {label}: {token}"),
            Err(e) => eprintln!("  Failed to issue {label} token: {e}"),
        }
    }

    println!("Seeding complete!");
}

fn admin_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn client_id() -> Uuid {
    Uuid::parse_str(CLIENT_USER_ID).unwrap()
}

/// Upserts the admin and the client.
async fn seed_users(db: &DatabaseConnection) {
    let repo = UserRepository::new(db.clone());
    let users = [
        (admin_id(), "admin", "admin@vertice.dev", true),
        (client_id(), "client", "client@vertice.dev", false),
    ];

    for (id, username, email, is_admin) in users {
        match repo.upsert(id, username, email, is_admin).await {
            Ok(user) => println!("  Upserted {} ({})", user.username, user.id),
            Err(e) => eprintln!("Failed to upsert user {username}: {e}"),
        }
    }
}

/// Seeds the client's deposits, skipping any that already exist.
async fn seed_investments(db: &DatabaseConnection) {
    let now = Utc::now();
    let mut inserted = 0;

    for (id, amount_cents, status, days_ago) in INVESTMENTS {
        let id = Uuid::parse_str(id).unwrap();
        if investments::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let paid_at: DateTime<Utc> = now - Duration::days(days_ago);
        let reviewed = status == InvestmentStatus::Approved;
        let investment = investments::ActiveModel {
            id: Set(id),
            user_id: Set(client_id()),
            amount_cents: Set(amount_cents),
            status: Set(status),
            paid_at: Set(Some(paid_at.into())),
            external_ref: Set(Some(format!("seed-{days_ago}d"))),
            reviewed_by: Set(reviewed.then(admin_id)),
            reviewed_at: Set(reviewed.then(|| now.into())),
            created_at: Set(paid_at.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = investment.insert(db).await {
            eprintln!("Failed to insert investment {id}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} investments");
}
