use std::sync::Arc;

use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use roofline_core::config::Config;
use roofline_core::tracing::init_tracing;
use roofline_storage::s3::S3Storage;

use roofline_admin::config::AdminConfig;
use roofline_admin::infra::db::DbAdminRepository;
use roofline_admin::router::build_router;
use roofline_admin::state::{AppState, Settings};
use roofline_admin::usecase::auth::{CreateMainAdminUseCase, NewAdminInput};
use roofline_admin::usecase::expiry::ExpirySweepUseCase;

#[derive(Parser)]
#[command(about = "Roofline admin panel API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and the verification expiry sweep (default)
    Serve,
    /// Create a MAIN_ADMIN account and exit
    CreateMainAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let config = AdminConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    match cli.command.unwrap_or(Command::Serve) {
        Command::CreateMainAdmin {
            name,
            email,
            password,
        } => {
            let usecase = CreateMainAdminUseCase {
                admins: DbAdminRepository { db },
            };
            match usecase
                .execute(NewAdminInput {
                    name,
                    email,
                    password,
                })
                .await
            {
                Ok(admin) => println!("created main admin {} <{}>", admin.id, admin.email),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Serve => serve(config, db).await,
    }
}

async fn serve(config: AdminConfig, db: sea_orm::DatabaseConnection) {
    let redis = deadpool_redis::Config::from_url(&config.redis_url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: Arc::from(config.admin_jwt_secret.as_str()),
        storage: S3Storage::new(config.s3_settings()),
        settings: Settings::from(&config),
    };

    let sweep = ExpirySweepUseCase {
        sweeper: state.expiry_sweeper(),
    };
    tokio::spawn(sweep.run(config.sweep_interval()));

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.admin_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("admin service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
