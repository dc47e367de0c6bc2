//! Command runners.
//!
//! Long-running commands open a screen and log every state it publishes
//! until Ctrl-C. One-shot commands print their result and return.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fmt::Debug;
use tokio::sync::watch;

use super::args::CliCommand;
use crate::models::Rate;
use crate::screen::{
    Banner, DetailScreen, FavoriteScreen, HomeRates, HomeScreen, RateDetailView, RootScreen,
    RootUiState, ScreenState, SearchPhase, SearchScreen, SearchUiState, Services, SettingScreen,
};

/// Run a command that needs services. `Version`, `Help` and `Invalid` are
/// handled before services are built and are no-ops here.
pub async fn run_command(command: CliCommand, services: Services) -> Result<()> {
    match command {
        CliCommand::Home => {
            let root = RootScreen::open(&services);
            let home = HomeScreen::open(services);
            follow("home", &root, home.state(), describe_home).await;
        }
        CliCommand::Favorites => {
            let root = RootScreen::open(&services);
            let favorites = FavoriteScreen::open(services);
            follow("favorites", &root, favorites.state(), |s| {
                describe_state(s, |rates: &Vec<Rate>| format!("{} favorites: {}", rates.len(), symbols(rates)))
            })
            .await;
        }
        CliCommand::Detail { id } => {
            let root = RootScreen::open(&services);
            let detail = DetailScreen::open(services, id, root.bottom_bar());
            follow("detail", &root, detail.state(), describe_detail).await;
            detail.navigate_back();
        }
        CliCommand::Search { query } => {
            let root = RootScreen::open(&services);
            let search = SearchScreen::open(services, root.bottom_bar());
            search.on_query_change(query);
            follow("search", &root, search.state(), describe_search).await;
            search.navigate_back();
        }
        CliCommand::ToggleFavorite { id } => toggle_favorite(&services, &id).await?,
        CliCommand::Theme { set } => theme(&services, set).await?,
        CliCommand::Version | CliCommand::Help | CliCommand::Invalid { .. } => {}
    }
    Ok(())
}

async fn toggle_favorite(services: &Services, id: &str) -> Result<()> {
    let detail = services
        .rates
        .fetch_rate(id)
        .await
        .wrap_err_with(|| format!("could not load rate '{}'", id))?;
    let rate = detail.to_rate();

    let favorited = services
        .favorites
        .toggle_favorite(&rate)
        .await
        .wrap_err("could not update favorites")?;

    if favorited {
        println!("{} ({}) added to favorites", rate.symbol, rate.id);
    } else {
        println!("{} ({}) removed from favorites", rate.symbol, rate.id);
    }
    Ok(())
}

async fn theme(services: &Services, set: Option<crate::models::ThemeType>) -> Result<()> {
    let screen = SettingScreen::open(services.clone());
    if let Some(theme) = set {
        screen
            .change_theme(theme)
            .await
            .wrap_err("could not save theme")?;
    }
    let current = services
        .settings
        .current_theme()
        .await
        .wrap_err("could not read theme")?;
    println!("theme: {}", current);
    Ok(())
}

/// Log `screen` and root state changes until Ctrl-C.
async fn follow<S, F>(name: &str, root: &RootScreen, mut screen: watch::Receiver<S>, describe: F)
where
    F: Fn(&S) -> String,
{
    let mut root_state = root.state();
    log_root(&root_state.borrow_and_update());
    tracing::info!("{}: {}", name, describe(&*screen.borrow_and_update()));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = screen.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = describe(&*screen.borrow_and_update());
                tracing::info!("{}: {}", name, line);
            }
            changed = root_state.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = root_state.borrow_and_update().clone();
                log_root(&state);
            }
            _ = &mut ctrl_c => {
                tracing::info!("{}: interrupted", name);
                break;
            }
        }
    }
}

fn log_root(state: &RootUiState) {
    let banner = match state.banner {
        Banner::None => "none",
        Banner::Offline => "offline",
        Banner::Online => "back online",
    };
    tracing::info!(
        "root: banner={} theme={} bottom_bar={}",
        banner,
        state.theme,
        if state.bottom_bar_visible { "shown" } else { "hidden" }
    );
}

fn symbols(rates: &[Rate]) -> String {
    const SHOWN: usize = 8;
    let mut listed: Vec<&str> = rates.iter().take(SHOWN).map(|r| r.symbol.as_str()).collect();
    if rates.len() > SHOWN {
        listed.push("...");
    }
    listed.join(", ")
}

fn describe_state<T: Debug>(state: &ScreenState<T>, loaded: impl Fn(&T) -> String) -> String {
    match state {
        ScreenState::Loaded(value) => loaded(value),
        other => other.to_string(),
    }
}

fn describe_home(state: &ScreenState<HomeRates>) -> String {
    describe_state(state, |home| {
        let marked = home.rates.iter().filter(|r| home.is_favorite(r)).count();
        format!(
            "{} rates ({} favorite): {}",
            home.rates.len(),
            marked,
            symbols(&home.rates)
        )
    })
}

fn describe_detail(state: &ScreenState<RateDetailView>) -> String {
    describe_state(state, |view| {
        let quoted = view
            .rate
            .quoted_at()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "?".to_string());
        format!(
            "{} {}{} = {} USD at {}",
            view.rate.symbol,
            view.rate.currency_symbol.as_deref().unwrap_or(""),
            if view.is_favorite { " (favorite)" } else { "" },
            view.rate.rate_usd,
            quoted
        )
    })
}

fn describe_search(state: &SearchUiState) -> String {
    match &state.phase {
        SearchPhase::Start => format!("'{}': start", state.query),
        SearchPhase::Results(results) => format!(
            "'{}': {}",
            state.query,
            describe_state(results, |r| format!("{} matches: {}", r.rates.len(), symbols(&r.rates)))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FavoriteRecord, RateDetail};
    use crate::screen::SearchResults;
    use rust_decimal::Decimal;

    fn rate(symbol: &str) -> Rate {
        Rate {
            id: symbol.to_lowercase(),
            symbol: symbol.to_string(),
            currency_symbol: None,
            rate_type: "fiat".to_string(),
            rate_usd: Decimal::ONE,
        }
    }

    #[test]
    fn test_symbols_truncates() {
        let rates: Vec<_> = (0..10).map(|i| rate(&format!("S{}", i))).collect();
        let listed = symbols(&rates);
        assert!(listed.starts_with("S0, S1"));
        assert!(listed.ends_with("..."));
    }

    #[test]
    fn test_describe_home_counts_favorites() {
        let state = ScreenState::Loaded(HomeRates {
            rates: vec![rate("USD"), rate("EUR")],
            favorites: vec![FavoriteRecord::new("eur", "EUR")],
        });
        assert_eq!(describe_home(&state), "2 rates (1 favorite): USD, EUR");
    }

    #[test]
    fn test_describe_failure_states() {
        let state: ScreenState<HomeRates> = ScreenState::AutoRetrying {
            message: "offline".to_string(),
        };
        assert_eq!(describe_home(&state), "auto-retrying: offline");
    }

    #[test]
    fn test_describe_detail() {
        let state = ScreenState::Loaded(RateDetailView {
            rate: RateDetail {
                id: "euro".to_string(),
                symbol: "EUR".to_string(),
                currency_symbol: Some("€".to_string()),
                rate_type: "fiat".to_string(),
                rate_usd: Decimal::new(108, 2),
                timestamp: 0,
            },
            is_favorite: true,
        });
        assert_eq!(
            describe_detail(&state),
            "EUR € (favorite) = 1.08 USD at 00:00:00"
        );
    }

    #[test]
    fn test_describe_search() {
        let state = SearchUiState {
            query: "x".to_string(),
            phase: SearchPhase::Results(ScreenState::Empty),
        };
        assert_eq!(describe_search(&state), "'x': empty");

        let loaded = SearchUiState {
            query: "us".to_string(),
            phase: SearchPhase::Results(ScreenState::Loaded(SearchResults {
                query: "us".to_string(),
                rates: vec![rate("USD")],
                favorites: vec![],
            })),
        };
        assert_eq!(describe_search(&loaded), "'us': 1 matches: USD");
    }
}
