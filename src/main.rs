use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_admin::{
    config::Settings,
    export::{self, ExportFormat},
    service::ServiceContext,
    store::{SqliteStore, Storage},
};

#[derive(Parser)]
#[command(name = "academy-admin", about = "School admin console over the local data store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check credentials against the stored admin record and start a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show record counts and whether a session is active
    Status,
    /// Print a resource collection as JSON
    List {
        #[arg(value_enum)]
        resource: ResourceKind,
    },
    /// Export all events
    ExportEvents {
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Announcements,
    Events,
    Teachers,
    Departments,
    Gallery,
    Messages,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academy_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    let store = SqliteStore::connect(&settings.database)
        .await
        .with_context(|| format!("opening {}", settings.database.url))?;
    let context = ServiceContext::new(Storage::new(Arc::new(store)), &settings);

    tracing::warn!("Admin credentials are stored and compared in plaintext; use for local demos only");

    if settings.seed.on_startup {
        context.seed_initializer.run().await?;
    }

    match cli.command {
        Command::Login { email, password } => {
            let session = context.session_gate.authenticate(&email, &password).await?;
            println!("Logged in as {}", session.email);
        }
        Command::Logout => {
            context.session_gate.logout().await?;
            println!("Logged out");
        }
        Command::Status => {
            let summary = context.dashboard_service.summary().await?;
            let authenticated = context.session_gate.is_authenticated().await?;
            println!("{}", export::to_pretty_json(&summary)?);
            println!("Session: {}", if authenticated { "active" } else { "none" });
        }
        Command::List { resource } => {
            require_session(&context).await?;
            println!("{}", list_json(&context, resource).await?);
        }
        Command::ExportEvents { format } => {
            require_session(&context).await?;
            let events = context.event_repo.list().await?;
            print!("{}", export::export_events(&events, format.into())?);
        }
    }

    Ok(())
}

async fn require_session(context: &ServiceContext) -> anyhow::Result<()> {
    if !context.session_gate.is_authenticated().await? {
        anyhow::bail!("Not logged in. Run `academy-admin login` first.");
    }
    Ok(())
}

async fn list_json(context: &ServiceContext, resource: ResourceKind) -> anyhow::Result<String> {
    let json = match resource {
        ResourceKind::Announcements => export::to_pretty_json(&context.announcement_repo.list().await?)?,
        ResourceKind::Events => export::to_pretty_json(&context.event_repo.list().await?)?,
        ResourceKind::Teachers => export::to_pretty_json(&context.teacher_repo.list().await?)?,
        ResourceKind::Departments => export::to_pretty_json(&context.department_repo.list().await?)?,
        ResourceKind::Gallery => export::to_pretty_json(&context.gallery_repo.list().await?)?,
        ResourceKind::Messages => export::to_pretty_json(&context.message_repo.list().await?)?,
    };
    Ok(json)
}
