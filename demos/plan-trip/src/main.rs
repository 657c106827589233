//! Command-line itinerary planner.
//!
//! With `--city` it plans once and exits; otherwise it asks for a city and
//! interests in a loop until end of input or `quit`.

mod selection;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, stdin, stdout};
use tracing::debug;
use trip_planner::config::PlannerConfig;
use trip_planner::{ErrorClass, GenerationError, Interest, TemplateVariant, TripPlanner, telemetry};

use crate::selection::{catalogue_grid, parse_selection};

const MISSING_INPUT_WARNING: &str = "Please enter a city and select at least one interest.";

#[derive(Debug, Parser)]
#[command(name = "plan-trip", version, about = "Generate a personalised one-day itinerary")]
struct Args {
    /// Destination city. Omit to run interactively.
    #[arg(long)]
    city: Option<String>,

    /// Interest to include; repeat for several.
    #[arg(long = "interest", short = 'i')]
    interests: Vec<String>,

    /// Template variant: freeform-markdown, strict-sectioned-markdown, or brief-bulleted.
    #[arg(long)]
    variant: Option<TemplateVariant>,

    /// Model identifier override.
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature override, within [0, 1].
    #[arg(long)]
    temperature: Option<f32>,

    /// Print the interest catalogue and exit.
    #[arg(long)]
    list_interests: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init(telemetry::DEFAULT_DIRECTIVE);
    let args = Args::parse();

    if args.list_interests {
        for interest in Interest::ALL {
            println!("{interest}");
        }
        return Ok(());
    }

    let planner = build_planner(&args)?;

    match args.city {
        Some(city) => {
            if missing_input(&city, &args.interests) {
                bail!(MISSING_INPUT_WARNING);
            }
            let itinerary = planner
                .plan_raw(&city, &args.interests, planner.variant())
                .await
                .map_err(|err| anyhow::anyhow!("{}", describe(&err)))?;
            print_itinerary(&itinerary);
            Ok(())
        }
        None => interactive(&planner).await,
    }
}

fn build_planner(args: &Args) -> Result<TripPlanner> {
    let mut config = PlannerConfig::from_env().context("failed to load configuration")?;
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature)?;
    }
    if let Some(variant) = args.variant {
        config = config.with_variant(variant);
    }
    Ok(TripPlanner::from_config(&config)?)
}

async fn interactive(planner: &TripPlanner) -> Result<()> {
    let mut lines = BufReader::new(stdin()).lines();

    println!("AI Travel Itinerary Planner");
    println!("Enter a destination and choose your interests to generate a personalised day-trip itinerary.");
    println!("Type `quit` to exit.\n");

    loop {
        let Some(city) = ask(&mut lines, "City (e.g. Lisbon, Tokyo, Barcelona): ").await? else {
            break;
        };
        if city.eq_ignore_ascii_case("quit") {
            break;
        }

        println!("\n{}\n", catalogue_grid());
        let Some(raw) = ask(&mut lines, "Interests (numbers or names, comma-separated): ").await?
        else {
            break;
        };

        let interests = match parse_selection(&raw) {
            Ok(interests) => interests,
            Err(token) => {
                eprintln!("Unknown interest `{token}`; pick from the list above.\n");
                continue;
            }
        };
        if missing_input(&city, &interests) {
            eprintln!("{MISSING_INPUT_WARNING}\n");
            continue;
        }

        debug!(city = %city, interests = interests.len(), "submitting interactive request");
        match planner.plan_raw(&city, &interests, planner.variant()).await {
            Ok(itinerary) => print_itinerary(&itinerary),
            Err(err) => eprintln!("{}\n", describe(&err)),
        }
    }

    Ok(())
}

async fn ask(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    let mut out = stdout();
    out.write_all(prompt.as_bytes()).await?;
    out.flush().await?;
    Ok(lines
        .next_line()
        .await
        .context("failed to read from stdin")?
        .map(|line| line.trim().to_owned()))
}

fn missing_input<S: AsRef<str>>(city: &str, interests: &[S]) -> bool {
    city.trim().is_empty() || interests.iter().all(|interest| interest.as_ref().trim().is_empty())
}

fn print_itinerary(itinerary: &str) {
    println!("\n## Your Itinerary\n\n{itinerary}\n");
}

fn describe(err: &GenerationError) -> String {
    let hint = match err {
        GenerationError::Validation { .. } => return err.to_string(),
        GenerationError::CredentialRejected { .. } => "check the GROQ_API_KEY value",
        _ => match err.class() {
            ErrorClass::FixConfiguration => "check the planner configuration",
            ErrorClass::Transient => "try again in a moment",
            ErrorClass::NoContent => "the model produced nothing; try again",
        },
    };
    format!("Could not generate an itinerary: {err} ({hint})")
}
