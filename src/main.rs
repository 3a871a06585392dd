use std::path::PathBuf;
use std::process::ExitCode;

use bigdecimal::BigDecimal;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use furniture_orders::application::order_service::OrderForm;
use furniture_orders::domain::user::{NewUser, Role};
use furniture_orders::errors::AppError;
use furniture_orders::handlers::orders::{self, Credentials, ListQuery};
use furniture_orders::{build_app, AppConfig};

#[derive(Parser)]
#[command(name = "furniture-orders")]
#[command(about = "Furniture workshop order tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct Login {
    /// Username to act as
    #[arg(long = "user")]
    username: String,

    #[arg(long)]
    password: String,
}

impl From<Login> for Credentials {
    fn from(l: Login) -> Self {
        Credentials {
            username: l.username,
            password: l.password,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List orders, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Case-insensitive part of the author's name
        #[arg(long)]
        author: Option<String>,
        /// Status label or alias (queued, in-progress, completed, all)
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "type")]
        furniture_type: Option<String>,
        #[arg(long)]
        min_cost: Option<BigDecimal>,
        #[arg(long)]
        max_cost: Option<BigDecimal>,
    },

    /// Show one order and its status
    Show { id: String },

    /// Collection-wide statistics
    Stats,

    /// Place a new order
    Add {
        /// Act as this user; omit for a guest order when allowed
        #[arg(long = "user", requires = "password")]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long = "type")]
        furniture_type: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        wood: Option<String>,
        #[arg(long)]
        hardware: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        install_cost: Option<BigDecimal>,
        #[arg(long)]
        pay: Option<String>,
        #[arg(long)]
        prepay: Option<u8>,
        #[arg(long)]
        client_name: Option<String>,
        #[arg(long)]
        client_address: Option<String>,
        #[arg(long)]
        client_phone: Option<String>,
    },

    /// Change an order's status (admin or designer)
    SetStatus {
        id: String,
        status: String,
        #[command(flatten)]
        login: Login,
    },

    /// Mark an order completed
    Complete { id: String },

    /// Delete an order (admin)
    Delete {
        id: String,
        #[command(flatten)]
        login: Login,
    },

    /// Bulk-add orders from a JSON file (admin)
    Import {
        path: PathBuf,
        #[command(flatten)]
        login: Login,
    },

    /// Remove every order (admin)
    Reset {
        #[command(flatten)]
        login: Login,
    },

    /// Create a user account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        role: Option<Role>,
    },

    /// Report what the order store holds
    StorageInfo,
}

fn run(cmd: Commands) -> Result<String, AppError> {
    let config = AppConfig::from_env()?;
    let mut app = build_app(&config)?;

    match cmd {
        Commands::List {
            page,
            author,
            status,
            furniture_type,
            min_cost,
            max_cost,
        } => orders::list_orders(
            &app,
            ListQuery {
                page,
                author,
                status,
                furniture_type,
                min_cost,
                max_cost,
            },
        ),
        Commands::Show { id } => orders::show_order(&app, &id),
        Commands::Stats => orders::statistics(&app),
        Commands::Add {
            username,
            password,
            furniture_type,
            description,
            wood,
            hardware,
            width,
            height,
            depth,
            quantity,
            install_cost,
            pay,
            prepay,
            client_name,
            client_address,
            client_phone,
        } => {
            let credentials = username.map(|username| Credentials {
                username,
                password: password.unwrap_or_default(),
            });
            let form = OrderForm {
                furniture_type,
                custom_description: description,
                wood_type: wood,
                hardware_type: hardware,
                width_cm: width,
                height_cm: height,
                depth_cm: depth,
                quantity,
                install_cost,
                payment_method: pay,
                prepayment_percent: prepay,
                client_name,
                client_address,
                client_phone,
            };
            orders::create_order(&mut app, credentials.as_ref(), form)
        }
        Commands::SetStatus { id, status, login } => {
            orders::set_status(&mut app, &login.into(), &id, &status)
        }
        Commands::Complete { id } => orders::complete_order(&mut app, &id),
        Commands::Delete { id, login } => orders::delete_order(&mut app, &login.into(), &id),
        Commands::Import { path, login } => orders::import_orders(&mut app, &login.into(), &path),
        Commands::Reset { login } => orders::clear_orders(&mut app, &login.into()),
        Commands::Register {
            username,
            password,
            name,
            email,
            role,
        } => orders::register(
            &app,
            NewUser {
                username,
                password,
                name,
                email,
                role,
            },
        ),
        Commands::StorageInfo => orders::storage_info(&app),
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    match run(cli.cmd) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
