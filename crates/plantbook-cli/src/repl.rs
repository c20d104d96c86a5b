//! Interactive session.
//!
//! Listing loads run in the background so a new search can be typed while
//! one is still in flight; the listing flow drops the older result.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use plantbook_application::{ListingFlow, LoadOutcome};
use plantbook_core::listing::{ListingState, LoadRequest};
use plantbook_core::navigation::{Navigator, PlantsRoute, Tab};

use crate::app::AppContext;
use crate::commands::listing::to_offset;
use crate::commands::settings::parse_color;
use crate::render;

const COMMANDS: &[&str] = &[
    "/list", "/search", "/show", "/back", "/settings", "/veg", "/edible", "/flower", "/fruit",
    "/tab", "/help", "quit",
];

/// Filter argument of `/list` that means "use my preferences".
const PREFERENCES_FILTER: &str = "prefs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List { filter: Option<String> },
    Search(String),
    Show(usize),
    Back,
    Settings,
    Vegetables(Option<bool>),
    Edible(Option<bool>),
    FlowerColor(String),
    FruitColor(String),
    Tab(Tab),
    Help,
    Quit,
}

/// Parses one input line. Text without a leading `/` is a search term.
pub fn parse_line(line: &str) -> std::result::Result<ReplCommand, String> {
    let line = line.trim();
    let (head, arg) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };

    match head {
        "quit" | "exit" | "/quit" => Ok(ReplCommand::Quit),
        "/help" => Ok(ReplCommand::Help),
        "/list" => Ok(ReplCommand::List {
            filter: arg.map(str::to_string),
        }),
        "/search" => arg
            .map(|term| ReplCommand::Search(term.to_string()))
            .ok_or_else(|| "Usage: /search <term>".to_string()),
        "/show" => arg
            .and_then(|n| n.parse::<usize>().ok())
            .map(ReplCommand::Show)
            .ok_or_else(|| "Usage: /show <number>".to_string()),
        "/back" => Ok(ReplCommand::Back),
        "/settings" => Ok(ReplCommand::Settings),
        "/veg" => parse_switch(arg).map(ReplCommand::Vegetables),
        "/edible" => parse_switch(arg).map(ReplCommand::Edible),
        "/flower" => Ok(ReplCommand::FlowerColor(arg.unwrap_or("").to_string())),
        "/fruit" => Ok(ReplCommand::FruitColor(arg.unwrap_or("").to_string())),
        "/tab" => arg
            .and_then(|t| Tab::from_str(t).ok())
            .map(ReplCommand::Tab)
            .ok_or_else(|| "Usage: /tab plants|settings".to_string()),
        cmd if cmd.starts_with('/') => Err(format!("Unknown command: {}", cmd)),
        _ => Ok(ReplCommand::Search(line.to_string())),
    }
}

fn parse_switch(arg: Option<&str>) -> std::result::Result<Option<bool>, String> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("on" | "true" | "yes") => Ok(Some(true)),
        Some("off" | "false" | "no") => Ok(Some(false)),
        Some(other) => Err(format!("Expected on or off, got '{}'", other)),
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Starts a listing load in the background; its final state goes to `tx`.
fn spawn_load(listing: &Arc<ListingFlow>, tx: &mpsc::Sender<ListingState>, request: LoadRequest) {
    let listing = Arc::clone(listing);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = listing.load(request).await;
        if matches!(outcome, LoadOutcome::Superseded { .. }) {
            return;
        }
        let state = listing.snapshot().await;
        let _ = tx.send(state).await;
    });
}

fn print_help() {
    let help = [
        ("<text>", "search plants"),
        ("/list [prefs|filter]", "list plants, optionally filtered"),
        ("/search <term>", "search plants"),
        ("/show <n>", "show details of listing row n"),
        ("/back", "return to the listing"),
        ("/settings", "show preferences"),
        ("/veg [on|off]", "toggle vegetables"),
        ("/edible [on|off]", "toggle edible plants"),
        ("/flower <color|any>", "set flower color"),
        ("/fruit <color|any>", "set fruit color"),
        ("/tab plants|settings", "switch tab"),
        ("quit", "exit"),
    ];
    for (cmd, what) in help {
        println!("  {:<22} {}", cmd.bright_cyan(), what.bright_black());
    }
}

/// Runs the REPL until `quit` or end of input.
pub async fn run(app: AppContext) -> Result<()> {
    let (listing_tx, mut listing_rx) = mpsc::channel::<ListingState>(16);

    let printer = tokio::spawn(async move {
        while let Some(state) = listing_rx.recv().await {
            render::print_listing(&state);
        }
    });

    app.preferences.load_preferences().await;
    let mut navigator = Navigator::new();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Plantbook ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a plant name to search, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!(
        "{}",
        format!("Plant database: {}", app.config.api.base_url).bright_black()
    );
    println!();

    spawn_load(&app.listing, &listing_tx, LoadRequest::initial());

    loop {
        let prompt = format!("{}> ", navigator.tab());
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = match parse_line(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };
                if command == ReplCommand::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                handle(&app, &mut navigator, &listing_tx, command).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    drop(listing_tx);
    let _ = printer.await;

    Ok(())
}

async fn handle(
    app: &AppContext,
    navigator: &mut Navigator,
    listing_tx: &mpsc::Sender<ListingState>,
    command: ReplCommand,
) {
    match command {
        ReplCommand::List { filter } => {
            let request = match filter.as_deref() {
                None => LoadRequest::initial(),
                Some(PREFERENCES_FILTER) => {
                    LoadRequest::filtered(app.preferences.current().await.to_filter_token())
                }
                Some(token) => LoadRequest::filtered(token),
            };
            show_listing_screen(navigator);
            spawn_load(&app.listing, listing_tx, request);
        }
        ReplCommand::Search(term) => {
            show_listing_screen(navigator);
            spawn_load(&app.listing, listing_tx, LoadRequest::search(term));
        }
        ReplCommand::Show(position) => {
            let record = match to_offset(position) {
                Some(index) => app.listing.select(index).await,
                None => None,
            };
            match record {
                Some(record) => {
                    render::print_detail(&record);
                    navigator.open_details(record);
                }
                None => {
                    let message = if app.listing.snapshot().await.loading {
                        "Still loading, try again in a moment.".to_string()
                    } else {
                        format!("No plant at position {}", position)
                    };
                    println!("{}", message.yellow());
                }
            }
        }
        ReplCommand::Back => {
            if navigator.back() {
                render::print_listing(&app.listing.snapshot().await);
            } else {
                println!("{}", "Already at the listing.".bright_black());
            }
        }
        ReplCommand::Settings => {
            navigator.switch_tab(Tab::Settings);
            render::print_settings(&app.preferences.current().await);
        }
        ReplCommand::Vegetables(value) => {
            let value = value.unwrap_or(!app.preferences.current().await.want_vegetables);
            render::print_settings(&app.preferences.toggle_vegetables(value).await);
        }
        ReplCommand::Edible(value) => {
            let value = value.unwrap_or(!app.preferences.current().await.want_edible);
            render::print_settings(&app.preferences.toggle_edible(value).await);
        }
        ReplCommand::FlowerColor(input) => match parse_color(&input) {
            Ok(color) => render::print_settings(&app.preferences.set_flower_color(color).await),
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        ReplCommand::FruitColor(input) => match parse_color(&input) {
            Ok(color) => render::print_settings(&app.preferences.set_fruit_color(color).await),
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        ReplCommand::Tab(tab) => {
            navigator.switch_tab(tab);
            match (tab, navigator.plants_route()) {
                (Tab::Settings, _) => render::print_settings(&app.preferences.current().await),
                (Tab::Plants, PlantsRoute::Details(record)) => render::print_detail(record),
                (Tab::Plants, PlantsRoute::Listing) => {
                    render::print_listing(&app.listing.snapshot().await)
                }
            }
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
}

fn show_listing_screen(navigator: &mut Navigator) {
    navigator.switch_tab(Tab::Plants);
    navigator.back();
}
