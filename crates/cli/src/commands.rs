//! CLI commands

use anyhow::{Result, anyhow, bail};
use brewdesk_http::BrewClient;
use brewdesk_http::types::{DateRange, RatingRequest, ShopQuery};
use chrono::{Duration, NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;
use tracing::info;

use crate::config::CommandContext;

const MAX_WINDOW_HOURS: i64 = 24 * 366;
const MAX_ANALYTICS_DAYS: i64 = 3660;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session locally
    Login {
        username: String,

        /// Password (prefer the environment variable over the flag)
        #[arg(long, env = "BREWDESK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Remember the username after the session ends
        #[arg(long)]
        remember_me: bool,
    },

    /// Sign out and forget the stored tokens
    Logout,

    /// Show whether a session is stored
    Status,

    /// Browse and manage shops
    Shops {
        #[command(subcommand)]
        command: ShopCommands,
    },

    /// Show a shop's menu
    Menu {
        /// Shop id (defaults to the active shop)
        shop: Option<String>,
    },

    /// List a shop's promotions
    Promos {
        /// Shop id (defaults to the active shop)
        shop: Option<String>,

        /// Flag promotions ending within this many hours
        #[arg(long, default_value = "24", value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_HOURS))]
        expiring_within: i64,
    },

    /// List a shop's reviews
    Reviews {
        /// Shop id (defaults to the active shop)
        shop: Option<String>,
    },

    /// Show your profile
    Profile,

    /// Show daily visits for a shop
    Analytics {
        /// Shop id (defaults to the active shop)
        shop: Option<String>,

        /// First day (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Days ending today, used when no explicit range is given
        #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=MAX_ANALYTICS_DAYS))]
        days: u32,
    },

    /// Issue a check-in QR code
    Qr {
        /// Shop id (defaults to the active shop)
        shop: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ShopCommands {
    /// List shops
    List {
        /// Search term
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        page: Option<u32>,
    },

    /// Show one shop
    Show { id: String },

    /// Make a shop the active one for owner commands
    Use { id: String },

    /// Rate a shop from 1 to 5
    Rate {
        id: String,
        score: u8,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show opening hours
    Hours { id: Option<String> },
}

impl Commands {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        if let Self::Status = self {
            return show_status(&context);
        }

        let client = context.client()?;

        match self {
            Self::Login {
                username,
                password,
                remember_me,
            } => {
                let response = client.login(&username, &password, remember_me).await?;
                println!("Signed in as {username}");
                if let Some(role) = response.role {
                    println!("Role: {role:?}");
                }
                Ok(())
            }
            Self::Logout => {
                client.logout().await?;
                println!("Signed out");
                Ok(())
            }
            Self::Status => show_status(&context),
            Self::Shops { command } => command.execute(&client).await,
            Self::Menu { shop } => {
                let shop = shop_or_active(&client, shop)?;
                print_json(&client.get_menu(&shop).await?)
            }
            Self::Promos {
                shop,
                expiring_within,
            } => {
                let shop = shop_or_active(&client, shop)?;
                let promos = client.list_promotions(&shop).await?;
                let now = Utc::now();
                let window = expiry_window(expiring_within)?;
                for promo in &promos {
                    let marker = if promo.is_near_expiry(now, window) {
                        " (ending soon)"
                    } else if promo.is_active(now) {
                        ""
                    } else {
                        " (inactive)"
                    };
                    println!("{} {}{marker} until {}", promo.id, promo.title, promo.ends_at);
                }
                Ok(())
            }
            Self::Reviews { shop } => {
                let shop = shop_or_active(&client, shop)?;
                print_json(&client.list_reviews(&shop).await?)
            }
            Self::Profile => print_json(&client.get_profile().await?),
            Self::Analytics {
                shop,
                from,
                to,
                days,
            } => {
                let shop = shop_or_active(&client, shop)?;
                let range = analytics_range(from, to, days, Utc::now().date_naive())?;
                let report = client.get_analytics(&shop, &range).await?;
                print_json(&report)?;
                println!("Total visits: {}", report.total_visits());
                Ok(())
            }
            Self::Qr { shop } => {
                let shop = shop_or_active(&client, shop)?;
                let qr = client.create_qr_code(&shop).await?;
                let now = Utc::now();
                println!("{}", qr.image_url);
                if qr.is_expired(now) {
                    println!("Code {} has already expired", qr.code);
                } else {
                    let remaining = qr.remaining(now);
                    println!("Code {} expires in {}s", qr.code, remaining.num_seconds());
                }
                Ok(())
            }
        }
    }
}

impl ShopCommands {
    pub async fn execute(self, client: &BrewClient) -> Result<()> {
        match self {
            Self::List { search, page } => {
                let shops = client.list_shops(&ShopQuery { search, page }).await?;
                for shop in shops {
                    let rating = shop
                        .average_rating
                        .map_or_else(|| "unrated".to_string(), |r| format!("{r:.1}"));
                    println!("{}  {}  ({rating})  {}", shop.id, shop.name, shop.address);
                }
                Ok(())
            }
            Self::Show { id } => print_json(&client.get_shop(&id).await?),
            Self::Use { id } => {
                client.select_shop(&id)?;
                info!(shop_id = %id, "Active shop changed");
                println!("Active shop: {id}");
                Ok(())
            }
            Self::Rate { id, score, comment } => {
                let shop = client
                    .rate_shop(&id, &RatingRequest { score, comment })
                    .await?;
                println!("{} is now rated {:?}", shop.name, shop.average_rating);
                Ok(())
            }
            Self::Hours { id } => {
                let id = shop_or_active(client, id)?;
                let hours = client.get_opening_hours(&id).await?;
                for day in hours.days {
                    match (day.opens, day.closes) {
                        (Some(opens), Some(closes)) => {
                            println!("{:?}: {opens} - {closes}", day.weekday);
                        }
                        _ => println!("{:?}: closed", day.weekday),
                    }
                }
                Ok(())
            }
        }
    }
}

fn show_status(context: &CommandContext) -> Result<()> {
    use brewdesk_core::{FileSessionStore, SessionStore};

    let store = FileSessionStore::open(context.session_path())?;
    match store.session()? {
        Some(session) => {
            println!("Signed in against {}", context.client_config.base_url);
            if let Some(username) = session.remembered_username {
                println!("Username: {username}");
            }
        }
        None => {
            println!("Not signed in");
            if let Some(username) = store.remembered_username()? {
                println!("Remembered username: {username}");
            }
        }
    }
    if let Some(shop) = store.active_shop()? {
        println!("Active shop: {shop}");
    }
    Ok(())
}

fn shop_or_active(client: &BrewClient, shop: Option<String>) -> Result<String> {
    if let Some(shop) = shop {
        return Ok(shop);
    }
    match client.active_shop()? {
        Some(shop) => Ok(shop),
        None => bail!("no shop given and no active shop; run `brewdesk shops use <id>`"),
    }
}

fn expiry_window(hours: i64) -> Result<Duration> {
    Duration::try_hours(hours).ok_or_else(|| anyhow!("--expiring-within {hours} is out of range"))
}

fn analytics_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    days: u32,
    today: NaiveDate,
) -> Result<DateRange> {
    match (from, to) {
        (Some(from), Some(to)) => {
            DateRange::new(from, to).ok_or_else(|| anyhow!("--from must not be after --to"))
        }
        _ => DateRange::last_days(today, days)
            .ok_or_else(|| anyhow!("--days {days} reaches past the supported calendar")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_expiry_window_rejects_overflow() {
        assert_eq!(expiry_window(2).unwrap(), Duration::hours(2));
        assert!(expiry_window(i64::MAX / 1000).is_err());
    }

    #[test]
    fn test_analytics_range_from_days() {
        let range = analytics_range(None, None, 7, day(7)).unwrap();
        assert_eq!(range, DateRange::new(day(1), day(7)).unwrap());
        assert!(analytics_range(None, None, u32::MAX, day(1)).is_err());
        assert!(analytics_range(Some(day(5)), Some(day(2)), 7, day(7)).is_err());
    }

    #[test]
    fn test_out_of_range_flags_are_rejected_by_parser() {
        assert!(TestCli::try_parse_from(["brewdesk", "analytics", "--days", "4294967295"]).is_err());
        assert!(TestCli::try_parse_from(["brewdesk", "promos", "--expiring-within", "9223372036854775"]).is_err());
        assert!(TestCli::try_parse_from(["brewdesk", "analytics", "--days", "30"]).is_ok());
    }
}
