use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use coursework_crud::{
    api::validation,
    database::{self, DB, models::user},
    repositories::{CrudRepository, Repositories, UserRepository},
    services::passwords,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Administration utility for the coursework backend.
/// Creates the schema, manages login accounts and dumps stored records.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Database maintenance.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
    /// Login accounts.
    User {
        #[command(subcommand)]
        user_command: UserCommand,
    },
    /// Prints every record of a resource as JSON.
    Dump {
        #[arg(value_enum)]
        resource: Resource,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Creates every missing table.
    Init,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Creates a user, or replaces the password and role of an existing one.
    Add {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Grants the ADMIN role.
        #[arg(long)]
        admin: bool,
    },
    /// Lists users without their password hashes.
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Resource {
    HelpRequests,
    Articles,
    MenuItemReviews,
    RecommendationRequests,
}

async fn get_db_connection() -> Result<DB, Box<dyn std::error::Error>> {
    let url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    Ok(database::connect_from_url(&url).await?)
}

fn print_json<T: Serialize>(records: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

async fn add_user(
    repositories: &Repositories,
    email: &str,
    password: &str,
    admin: bool,
) -> Result<user::Model, Box<dyn std::error::Error>> {
    let email = validation::normalize_email(email);
    if !validation::validate_email(&email) {
        return Err(format!("Invalid email address: {}", email).into());
    }
    if !validation::ensure_max_len(password, validation::MAX_PASSWORD_BYTES) {
        return Err("Password is too long".into());
    }

    let existing = repositories.users.find_by_email(&email).await?;
    let account = user::Model {
        id: existing.map(|u| u.id).unwrap_or(0),
        email,
        password_hash: passwords::hash_password(password, passwords::HASH_COST)?,
        admin,
    };

    Ok(repositories.users.save(account).await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let cli = Cli::parse();

    let db = get_db_connection().await?;

    match &cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommand::Init => {
                database::ensure_tables(&db).await?;
                println!("Schema is up to date.");
            }
        },
        Commands::User { user_command } => {
            let repositories = Repositories::sea_orm(db);
            match user_command {
                UserCommand::Add {
                    email,
                    password,
                    admin,
                } => {
                    let account = add_user(&repositories, email, password, *admin).await?;
                    println!(
                        "Saved user {} (id {}, admin: {})",
                        account.email, account.id, account.admin
                    );
                }
                UserCommand::List => {
                    let users = repositories.users.find_all().await?;
                    print_json(&users)?;
                }
            }
        }
        Commands::Dump { resource } => {
            let repositories = Repositories::sea_orm(db);
            match resource {
                Resource::HelpRequests => {
                    print_json(&repositories.help_requests.find_all().await?)?
                }
                Resource::Articles => print_json(&repositories.articles.find_all().await?)?,
                Resource::MenuItemReviews => {
                    print_json(&repositories.menu_item_reviews.find_all().await?)?
                }
                Resource::RecommendationRequests => {
                    print_json(&repositories.recommendation_requests.find_all().await?)?
                }
            }
        }
    }

    Ok(())
}
