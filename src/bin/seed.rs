use std::sync::Arc;

use clap::Parser;
use chrono::{Duration, Utc};
use fake::{Fake, faker::name::en::Name};
use rand::{seq::SliceRandom, Rng};
use sqlx::sqlite::SqlitePoolOptions;

use staffboard::{
    auth::AuthService,
    domain::{CreateAnnouncementRequest, CreateUserRequest, User, UserRole},
    repository::{SqliteAnnouncementRepository, SqliteUserRepository, UserRepository},
    service::announcement_service::AnnouncementService,
};

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Operations",
    "Finance",
    "People",
    "Sales",
    "Support",
];

/// Provision accounts and sample announcements for a local dashboard.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://staffboard.db?mode=rwc")]
    database_url: String,

    /// Number of generated employee accounts
    #[arg(long, default_value_t = 8)]
    employees: usize,

    /// Password given to every seeded account
    #[arg(long, default_value = "password123")]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let announcements = AnnouncementService::new(Arc::new(
        SqliteAnnouncementRepository::new(db_pool.clone()),
    ));

    // Shared hash for every seeded account
    let password_hash = AuthService::hash_password(&args.password).await?;

    println!("👥 Creating users...");

    let superadmin = user_repo.create(CreateUserRequest {
        name: "Sam Superadmin".to_string(),
        email: "superadmin@staffboard.local".to_string(),
        department: "Operations".to_string(),
        role: UserRole::Superadmin,
        password_hash: password_hash.clone(),
        joined_at: Some(Utc::now() - Duration::days(900)),
    }).await?;

    let admin = user_repo.create(CreateUserRequest {
        name: "Alex Admin".to_string(),
        email: "admin@staffboard.local".to_string(),
        department: "People".to_string(),
        role: UserRole::Admin,
        password_hash: password_hash.clone(),
        joined_at: Some(Utc::now() - Duration::days(400)),
    }).await?;

    let mut rng = rand::thread_rng();
    for i in 0..args.employees {
        let name: String = Name().fake();
        let department = DEPARTMENTS.choose(&mut rng).copied().unwrap_or("Engineering");
        user_repo.create(CreateUserRequest {
            name,
            email: format!("employee{}@staffboard.local", i + 1),
            department: department.to_string(),
            role: UserRole::Employee,
            password_hash: password_hash.clone(),
            joined_at: Some(Utc::now() - Duration::days(rng.gen_range(30..700))),
        }).await?;
    }

    println!(
        "  ✅ Created superadmin ({}), admin ({}) and {} employees, password '{}'",
        superadmin.email, admin.email, args.employees, args.password
    );

    println!("📣 Creating announcements...");

    post(&announcements, &admin, "Office closed Friday", "The office is closed this Friday for maintenance.").await?;
    post(&announcements, &admin, "New coffee machine", "Second floor kitchen has a new espresso machine.").await?;
    let policy = post(
        &announcements,
        &superadmin,
        "Policy Update",
        "New WFH policy: up to three remote days per week.",
    ).await?;
    announcements.set_pinned(&superadmin, policy.id, true).await?;

    println!("  ✅ Created 3 announcements (1 pinned)");
    println!("🎉 Seeding complete");

    Ok(())
}

async fn post(
    service: &AnnouncementService,
    author: &User,
    title: &str,
    content: &str,
) -> anyhow::Result<staffboard::domain::Announcement> {
    let announcement = service.create(author, CreateAnnouncementRequest {
        title: title.to_string(),
        content: content.to_string(),
        author_id: None,
        author_name: None,
    }).await?;

    Ok(announcement)
}
