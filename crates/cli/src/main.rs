//! Al-Thawqa CLI - drive the restaurant site's cart, forms and login from a
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! althawqa menu list --category mains
//!
//! # Build an order and check out
//! althawqa cart add "Chicken Kabsa"
//! althawqa cart inc 0
//! althawqa cart checkout
//!
//! # Book a table
//! althawqa reserve -n "Khalid" -e khalid@example.com -p 0501234567 \
//!     --date 2026-03-14 --time 19:30 --guests 4
//! ```
//!
//! # Commands
//!
//! - `cart` - List, add, change quantities, remove and check out
//! - `menu list` - Show the menu, optionally one category
//! - `contact` - Send a contact message
//! - `reserve` - Book a table
//! - `login` / `whoami` / `logout` - Manage the stored session
//!
//! State is kept in the file named by `ALTHAWQA_STORAGE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use althawqa_core::AccountKind;
use althawqa_storefront::config::StorefrontConfig;
use althawqa_storefront::services::{ContactForm, LoginForm, ReservationForm};
use althawqa_storefront::telemetry;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "althawqa")]
#[command(author, version, about = "Al-Thawqa restaurant site tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Send a message to the restaurant
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        message: String,
    },
    /// Book a table
    Reserve {
        /// Full name for the booking
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        phone: String,

        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Time as HH:MM
        #[arg(long)]
        time: String,

        #[arg(long)]
        guests: String,

        /// Special requests
        #[arg(long, default_value = "")]
        notes: String,

        /// Subscribe to the newsletter
        #[arg(long)]
        newsletter: bool,
    },
    /// Log in with a site account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Portal to log in through (`customer`, `admin`)
        #[arg(short, long, default_value = "customer")]
        kind: AccountKind,

        /// Keep me signed in
        #[arg(long)]
        remember: bool,
    },
    /// Show the logged-in user
    Whoami,
    /// Log out
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    List,
    /// Add one unit of a dish
    Add {
        /// Dish name as it appears on the menu
        name: String,

        /// Unit price; skips the menu lookup
        #[arg(long)]
        price: Option<u64>,

        /// Menu catalog (YAML) to look the dish up in
        #[arg(long)]
        menu: Option<PathBuf>,
    },
    /// Increase the quantity of a row by one
    Inc { index: usize },
    /// Decrease the quantity of a row by one, removing it at zero
    Dec { index: usize },
    /// Remove a row
    Remove { index: usize },
    /// Place the order
    Checkout,
}

#[derive(Subcommand)]
enum MenuAction {
    /// List dishes
    List {
        /// Category to show, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Menu catalog (YAML); defaults to the built-in menu
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing("althawqa_storefront=warn,althawqa_cli=warn");

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let _sentry = telemetry::init_sentry(&config);

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&config),
            CartAction::Add { name, price, menu } => {
                commands::cart::add(&config, &name, price, menu.as_deref())?;
            }
            CartAction::Inc { index } => commands::cart::adjust(&config, index, 1)?,
            CartAction::Dec { index } => commands::cart::adjust(&config, index, -1)?,
            CartAction::Remove { index } => commands::cart::remove(&config, index)?,
            CartAction::Checkout => commands::cart::checkout(&config).await?,
        },
        Commands::Menu { action } => match action {
            MenuAction::List { category, file } => {
                commands::menu::list(file.as_deref(), &category, config.cart.currency)?;
            }
        },
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                subject,
                message,
            };
            commands::forms::contact(&config, form).await?;
        }
        Commands::Reserve {
            name,
            email,
            phone,
            date,
            time,
            guests,
            notes,
            newsletter,
        } => {
            let form = ReservationForm {
                full_name: name,
                email,
                phone,
                date,
                time,
                guests,
                special_requests: notes,
                newsletter,
            };
            commands::forms::reserve(&config, form).await?;
        }
        Commands::Login {
            email,
            password,
            kind,
            remember,
        } => {
            let form = LoginForm {
                email,
                password: SecretString::from(password),
                remember,
                kind,
            };
            commands::session::login(&config, form).await?;
        }
        Commands::Whoami => commands::session::whoami(&config)?,
        Commands::Logout => commands::session::logout(&config)?,
    }
    Ok(())
}
