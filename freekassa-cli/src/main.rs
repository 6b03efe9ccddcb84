//! Freekassa CLI
//!
//! Command-line interface for the Freekassa API and the notification
//! listener.

mod config;

use std::net::IpAddr;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freekassa_client::FreekassaClient;
use freekassa_notify::{LoggingHandler, Notification, inbound::NotificationServer};
use freekassa_types::{
    API_URL, Compat, CreateOrder, CreateWithdrawal, NonceMode, OrderStatus, OrdersQuery,
    TIME_FORMAT, order_label,
};

#[derive(Parser)]
#[command(name = "freekassa")]
#[command(author, version, about = "Freekassa API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Freekassa API
    #[arg(long, env = "FREEKASSA_API_URL", default_value = API_URL)]
    api_url: String,

    /// API key used to sign requests
    #[arg(long, env = "FREEKASSA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Shop id
    #[arg(long, env = "FREEKASSA_SHOP_ID")]
    shop_id: Option<i64>,

    /// Reproduce the legacy integration's requests byte for byte
    /// (fixed nonce, collapsed date range, padded success_url key)
    #[arg(long, env = "FREEKASSA_LEGACY")]
    legacy: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the shop balance
    Balance,
    /// List orders
    Orders(ListArgs),
    /// Create a payment order
    CreateOrder {
        /// Payment system id
        #[arg(long)]
        system: i64,
        #[arg(long)]
        email: String,
        /// Payer IP address
        #[arg(long)]
        ip: String,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "RUB")]
        currency: String,
        /// Merchant order id
        #[arg(long)]
        payment_id: Option<String>,
        #[arg(long)]
        tel: Option<String>,
        #[arg(long)]
        success_url: Option<String>,
        #[arg(long)]
        failure_url: Option<String>,
        #[arg(long)]
        notification_url: Option<String>,
    },
    /// List withdrawals
    Withdrawals(ListArgs),
    /// Create a withdrawal
    CreateWithdrawal {
        /// Payment system id
        #[arg(long)]
        system: i64,
        /// Destination wallet or card
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "RUB")]
        currency: String,
        #[arg(long)]
        payment_id: Option<String>,
    },
    /// List payment systems for orders
    Currencies,
    /// Check whether a payment system is available
    CurrencyStatus {
        /// Payment system id
        id: i64,
    },
    /// List payment systems for withdrawals
    WithdrawalCurrencies,
    /// List shops
    Shops,
    /// Print the label of an order status code
    StatusLabel {
        #[arg(allow_negative_numbers = true)]
        code: i64,
    },
    /// Verify a notification given as KEY=VALUE pairs
    Verify {
        /// Second secret word of the shop
        #[arg(long, env = "FREEKASSA_SECRET2", hide_env_values = true)]
        secret2: String,
        /// Source IP to check against the provider allow-list
        #[arg(long)]
        ip: Option<IpAddr>,
        /// Notification fields, e.g. MERCHANT_ID=5 AMOUNT=10.00
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Serve the notification URL
    Listen,
}

#[derive(Args, Clone)]
struct ListArgs {
    #[arg(long)]
    order_id: Option<i64>,
    #[arg(long)]
    payment_id: Option<String>,
    /// Status code (0 new, 1 paid, 8 error, 9 cancelled)
    #[arg(long)]
    status: Option<i64>,
    /// Start of the range, "YYYY.MM.DD HH:MM:SS" or "YYYY-MM-DD"
    #[arg(long, value_parser = parse_time)]
    date_from: Option<NaiveDateTime>,
    /// End of the range, same formats as --date-from
    #[arg(long, value_parser = parse_time)]
    date_to: Option<NaiveDateTime>,
    #[arg(long)]
    page: Option<u32>,
}

impl ListArgs {
    fn into_query(self) -> Result<OrdersQuery> {
        let order_status = self
            .status
            .map(|code| {
                OrderStatus::from_code(code)
                    .ok_or_else(|| anyhow::anyhow!("Unknown status code: {}", code))
            })
            .transpose()?;

        Ok(OrdersQuery {
            order_id: self.order_id,
            payment_id: self.payment_id,
            order_status,
            date_from: self.date_from,
            date_to: self.date_to,
            page: self.page,
        })
    }
}

fn parse_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| format!("Invalid date: {}", s))
}

fn parse_field(s: &str) -> Result<(String, String)> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got {}", s))
}

fn build_client(cli: &Cli) -> Result<FreekassaClient> {
    let api_key = cli
        .api_key
        .clone()
        .context("--api-key or FREEKASSA_API_KEY is required")?;
    let shop_id = cli
        .shop_id
        .context("--shop-id or FREEKASSA_SHOP_ID is required")?;

    let mut client = FreekassaClient::new(api_key, shop_id).with_base_url(&cli.api_url);
    if cli.legacy {
        client = client
            .with_compat(Compat::legacy())
            .with_nonce_mode(NonceMode::Fixed);
    }
    Ok(client)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,freekassa_client=debug,freekassa_notify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let output = match &cli.command {
        Commands::StatusLabel { code } => {
            println!("{}", order_label(*code));
            return Ok(());
        }

        Commands::Verify {
            secret2,
            ip,
            fields,
        } => {
            let payload = fields
                .iter()
                .map(|f| parse_field(f))
                .collect::<Result<Vec<_>>>()?;
            let notification = Notification::new(payload, secret2.as_str(), *ip);
            println!("{}", notification.check()?);
            return Ok(());
        }

        Commands::Listen => {
            let config = config::ListenConfig::from_env()?;
            tracing::info!("Starting notification server on port {}", config.port);

            let server = NotificationServer::new(config.secret2, LoggingHandler)
                .with_ip_check(config.check_ip)
                .with_trusted_proxy(config.trust_proxy);
            server.run(&format!("0.0.0.0:{}", config.port)).await?;
            return Ok(());
        }

        Commands::Balance => build_client(&cli)?.get_balance().await?,

        Commands::Orders(args) => {
            let client = build_client(&cli)?;
            let query = args.clone().into_query()?;
            client.get_orders(&query).await?
        }

        Commands::CreateOrder {
            system,
            email,
            ip,
            amount,
            currency,
            payment_id,
            tel,
            success_url,
            failure_url,
            notification_url,
        } => {
            let order = CreateOrder {
                currency: currency.clone(),
                payment_id: payment_id.clone(),
                tel: tel.clone(),
                success_url: success_url.clone(),
                failure_url: failure_url.clone(),
                notification_url: notification_url.clone(),
                ..CreateOrder::new(*system, email.as_str(), ip.as_str(), *amount)
            };
            build_client(&cli)?.create_order(&order).await?
        }

        Commands::Withdrawals(args) => {
            let client = build_client(&cli)?;
            let query = args.clone().into_query()?;
            client.get_withdrawals(&query).await?
        }

        Commands::CreateWithdrawal {
            system,
            account,
            amount,
            currency,
            payment_id,
        } => {
            let withdrawal = CreateWithdrawal {
                currency: currency.clone(),
                payment_id: payment_id.clone(),
                ..CreateWithdrawal::new(*system, account.as_str(), *amount)
            };
            build_client(&cli)?.create_withdrawal(&withdrawal).await?
        }

        Commands::Currencies => build_client(&cli)?.get_payment_systems().await?,

        Commands::CurrencyStatus { id } => build_client(&cli)?.check_payment_system(*id).await?,

        Commands::WithdrawalCurrencies => {
            build_client(&cli)?
                .get_payment_systems_for_withdrawal()
                .await?
        }

        Commands::Shops => build_client(&cli)?.get_shops().await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
