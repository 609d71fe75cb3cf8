use std::sync::Arc;

use academy_admin::{
    config::Settings,
    domain::MessageInput,
    repository::COLLECTION_KEYS,
    service::ServiceContext,
    store::{SqliteStore, Storage},
};
use clap::Parser;
use fake::{
    faker::{
        internet::en::SafeEmail,
        lorem::en::{Paragraph, Sentence},
        name::en::Name,
    },
    Fake,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seed", about = "Populate the academy data store with default records")]
struct Args {
    /// Clear every collection and the admin record before seeding
    #[arg(long)]
    reset: bool,

    /// Append this many generated contact messages
    #[arg(long, default_value_t = 0)]
    messages: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academy_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    println!("🌱 Starting data store seeding...");

    println!("📋 Opening {} and running migrations...", settings.database.url);
    let store = SqliteStore::connect(&settings.database).await?;
    let context = ServiceContext::new(Storage::new(Arc::new(store)), &settings);

    if args.reset {
        println!("🧹 Clearing existing data...");
        context.seed_initializer.reset().await?;
    }

    let report = context.seed_initializer.run().await?;
    if report.is_empty() {
        println!("  ✅ All {} collections already present, nothing to seed", COLLECTION_KEYS.len());
    } else {
        for key in &report.written {
            println!("  ✅ Seeded {}", key);
        }
    }

    if args.messages > 0 {
        println!("✉️  Generating {} contact messages...", args.messages);
        for _ in 0..args.messages {
            let subject: String = Sentence(2..5).fake();
            context
                .message_repo
                .create(MessageInput {
                    name: Name().fake(),
                    email: SafeEmail().fake(),
                    subject: subject.trim_end_matches('.').to_string(),
                    message: Paragraph(1..3).fake(),
                })
                .await?;
        }
        println!("  ✅ Created {} messages", args.messages);
    }

    println!("\n✨ Seeding complete!");
    println!("\n📝 Admin credentials:");
    println!("  {} / {}", settings.auth.default_email, settings.auth.default_password);

    Ok(())
}
