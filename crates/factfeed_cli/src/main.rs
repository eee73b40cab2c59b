//! Command-line front end for the fact feed.
//!
//! # Responsibility
//! - Drive `FeedController` against a local SQLite database.
//! - Render the filtered view as plain text.

use clap::{Parser, Subcommand};
use factfeed_core::db::open_db;
use factfeed_core::{
    core_version, find_category, init_logging, list_categories, Fact, FactId, FeedConfig,
    FeedController, FeedError, FeedEvent, SqliteFactGateway, VoteField, FEED_PAGE_SIZE,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "factfeed")]
#[command(about = "Browse, share and vote on short facts", long_about = None)]
#[command(version = core_version())]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database path; overrides the configuration.
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known categories and their colors.
    Categories,
    /// Show the newest facts, optionally for one category.
    List {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Share a new fact.
    Submit {
        #[arg(long)]
        text: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        category: String,
    },
    /// Vote on a fact: interest, mindblow or false.
    Vote {
        id: FactId,
        #[arg(value_parser = parse_vote_field)]
        field: VoteField,
        /// Category page to look the fact up in.
        #[arg(long, default_value = "all")]
        category: String,
    },
}

fn parse_vote_field(value: &str) -> Result<VoteField, String> {
    VoteField::parse(value).ok_or_else(|| format!("`{value}` is not one of interest|mindblow|false"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match cli.config.as_ref() {
        Some(path) => FeedConfig::load(path)?,
        None => FeedConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir)?;
    }

    if let Command::Categories = cli.command {
        for category in list_categories() {
            println!("{:<14} {}", category.name, category.color);
        }
        return Ok(());
    }

    let conn = open_db(&config.db_path)?;
    let mut controller = FeedController::new(SqliteFactGateway::new(&conn));
    controller.subscribe(|event: &FeedEvent| {
        if let FeedEvent::Notice(notice) = event {
            eprintln!("{} ({})", notice.message, notice.detail);
        }
    });
    info!("event=cli_start module=cli status=ok");

    match cli.command {
        Command::Categories => {}
        Command::List { category } => {
            controller.set_active_category(&category)?;
            if controller.store().is_empty() {
                println!("No facts for this category yet!");
            }
            for fact in controller.facts() {
                println!("{}", render_fact(fact));
            }
        }
        Command::Submit {
            text,
            source,
            category,
        } => {
            let fact = controller.submit_fact(&text, &source, &category)?;
            println!("{}", render_fact(&fact));
        }
        Command::Vote {
            id,
            field,
            category,
        } => {
            controller.set_active_category(&category)?;
            controller
                .cast_vote(id, field)
                .map_err(|err| with_view_hint(err, &category))?;
            if let Some(fact) = controller.store().get(id) {
                println!("{}", render_fact(fact));
            }
        }
    }

    Ok(())
}

fn with_view_hint(err: FeedError, category: &str) -> Box<dyn Error> {
    match err {
        FeedError::FactNotInView(id) => format!(
            "fact {id} is not among the newest {FEED_PAGE_SIZE} facts in `{category}`; \
             pass --category <name> to search its category page"
        )
        .into(),
        other => other.into(),
    }
}

fn render_fact(fact: &Fact) -> String {
    let disputed = if fact.is_disputed() {
        "[DISPUTED] "
    } else {
        ""
    };
    let color = find_category(&fact.category).map_or("", |category| category.color);
    format!(
        "#{:<5} {disputed}{} ({}) [{} {color}] interest={} mindblow={} false={}",
        fact.id,
        fact.text,
        fact.source,
        fact.category,
        fact.votes_interest,
        fact.votes_mindblow,
        fact.votes_false
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_vote_field, render_fact, with_view_hint, Cli, Command};
    use clap::{CommandFactory, Parser};
    use factfeed_core::{Fact, FeedError, VoteField};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn vote_field_argument_accepts_short_names() {
        assert_eq!(parse_vote_field("false"), Ok(VoteField::False));
        assert!(parse_vote_field("like").is_err());
    }

    #[test]
    fn vote_defaults_to_all_and_accepts_a_category_page() {
        let cli = Cli::try_parse_from(["factfeed", "vote", "7", "interest"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Vote { id: 7, ref category, .. } if category == "all"
        ));

        let cli = Cli::try_parse_from(["factfeed", "vote", "7", "false", "--category", "history"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Vote { field: VoteField::False, ref category, .. } if category == "history"
        ));
    }

    #[test]
    fn missing_fact_error_suggests_category_option() {
        let message = with_view_hint(FeedError::FactNotInView(7), "all").to_string();
        assert!(message.contains("fact 7"));
        assert!(message.contains("--category"));

        let passthrough = with_view_hint(FeedError::SubmitInFlight, "all").to_string();
        assert_eq!(passthrough, FeedError::SubmitInFlight.to_string());
    }

    #[test]
    fn disputed_facts_are_marked() {
        let fact = Fact {
            id: 3,
            text: "Goldfish have a three-second memory".to_string(),
            source: "https://example.com/goldfish".to_string(),
            category: "science".to_string(),
            votes_interest: 0,
            votes_mindblow: 1,
            votes_false: 4,
            created_at: 0,
        };
        let line = render_fact(&fact);
        assert!(line.contains("[DISPUTED]"));
        assert!(line.contains("#16a34a"));
        assert!(line.ends_with("false=4"));
    }
}
