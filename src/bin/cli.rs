use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use wayfare::cli::{CreateAdmin, create_admin};
use wayfare::store::PgStore;
use wayfare_config::ServerConfig;

#[derive(Parser)]
#[command(name = "wayfare-cli")]
#[command(about = "Wayfare CLI - Administrative tools for Wayfare", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new admin account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
            phone,
        } => {
            let input = CreateAdmin {
                first_name: prompt(first_name, "First name")?,
                last_name: prompt(last_name, "Last name")?,
                email: prompt(email, "Email address")?,
                phone_number: prompt(phone, "Phone number")?,
                password: match password {
                    Some(p) => p,
                    None => Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords don't match")
                        .interact()?,
                },
            };

            let database_url = std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = wayfare_db::init_db_pool(&database_url).await?;
            wayfare_db::run_migrations(&pool).await?;
            let store = PgStore::new(pool);

            let bcrypt_cost = ServerConfig::from_env().bcrypt_cost;
            match create_admin(&store, input, bcrypt_cost).await {
                Ok(user) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Email: {}", user.email);
                    println!("   Name: {} {}", user.first_name, user.last_name);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {e:#}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
