use clap::{Args, Parser, Subcommand};
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use locationiq_geocoder::error::{AppError, Result};
use locationiq_geocoder::models::Place;
use locationiq_geocoder::{Config, LocationIqClient};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// Default search radius for `nearby`, in meters.
pub const DEFAULT_RADIUS: u32 = 100;

/// Default tag for `nearby`, matching every kind of point of interest.
pub const DEFAULT_TAG: &str = "all";

/// CLI for LocationIQ forward, reverse and nearby geocoding
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print the raw JSON payload instead of a table
    #[arg(long, global = true)]
    pub raw: bool,

    /// LocationIQ region (us1, eu1); overrides LOCATIONIQ_REGION
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom API host; overrides the region and LOCATIONIQ_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Command to run; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Convert coordinates into an address
    Reverse(ReverseArgs),

    /// Convert an address into coordinates
    Search(SearchArgs),

    /// Find points of interest around coordinates
    Nearby(NearbyArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReverseArgs {
    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchArgs {
    /// Free-text address; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct NearbyArgs {
    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,

    /// Point-of-interest tag, e.g. restaurant, school, all
    #[arg(short, long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Search radius in meters
    #[arg(short, long, default_value_t = DEFAULT_RADIUS)]
    pub radius: u32,
}

impl Commands {
    /// Loose call arguments for the client, one accepted shape per command.
    pub fn to_args(&self) -> Vec<Value> {
        match self {
            Commands::Reverse(args) => vec![json!(args.lat), json!(args.lon)],
            Commands::Search(args) => vec![json!(args.query.join(" "))],
            Commands::Nearby(args) => vec![json!({
                "lat": args.lat,
                "lng": args.lon,
                "tag": args.tag,
                "radius": args.radius,
            })],
        }
    }

    fn describe(&self) -> String {
        match self {
            Commands::Reverse(args) => format!("Reverse geocoding {}, {}", args.lat, args.lon),
            Commands::Search(args) => format!("Searching for \"{}\"", args.query.join(" ")),
            Commands::Nearby(args) => format!(
                "Looking for '{}' within {} m of {}, {}",
                args.tag, args.radius, args.lat, args.lon
            ),
        }
    }
}

/// CLI application
pub struct App {
    client: LocationIqClient,
    raw: bool,
}

impl App {
    /// Create the application from environment configuration and CLI overrides
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::from_env()?;

        if let Some(region) = &cli.region {
            config.region = region.parse()?;
        }
        if let Some(base_url) = &cli.base_url {
            config.base_url = Some(base_url.clone());
        }

        info!("Using LocationIQ host {}", config.base_url());

        Ok(Self::with_client(config.into_client(), cli.raw))
    }

    pub fn with_client(client: LocationIqClient, raw: bool) -> Self {
        Self { client, raw }
    }

    /// Run a command and print its result
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        let payload = self.execute(&command).await?;
        println!("{}", self.render(&payload)?);
        Ok(())
    }

    /// Run a command against the API and return the untouched payload
    pub async fn execute(&self, command: &Commands) -> Result<Value> {
        let description = command.describe();
        info!("{}", description);

        let spinner = spinner(description)?;
        let args = command.to_args();
        let result = match command {
            Commands::Reverse(_) => self.client.reverse(&args).await,
            Commands::Search(_) => self.client.search(&args).await,
            Commands::Nearby(_) => self.client.nearby(&args).await,
        };
        spinner.finish_and_clear();

        Ok(result?)
    }

    /// Pretty JSON in raw mode, otherwise a table of places
    pub fn render(&self, payload: &Value) -> Result<String> {
        if self.raw {
            return Ok(serde_json::to_string_pretty(payload)?);
        }

        let places = Place::list_from(payload);
        if places.is_empty() {
            return Ok("No places found.".yellow().to_string());
        }
        Ok(format!(
            "{}\n{}",
            format!("{} place(s) found", places.len()).green().bold(),
            places_table(&places)
        ))
    }
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Build the results table shown for every command
pub fn places_table(places: &[Place]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Lat", "Lon", "Type", "Distance (m)"]);

    for place in places {
        table.add_row(vec![
            place.id().to_string(),
            place.label().to_string(),
            place.lat.clone().unwrap_or_default(),
            place.lon.clone().unwrap_or_default(),
            place.kind.clone().unwrap_or_default(),
            place.distance.clone().unwrap_or_default(),
        ]);
    }

    table
}

/// Prompt the user for a latitude/longitude pair
pub fn prompt_coordinates() -> Result<(f64, f64)> {
    let theme = ColorfulTheme::default();
    let lat: f64 = Input::with_theme(&theme)
        .with_prompt("Latitude")
        .validate_with(|v: &f64| validate_range(*v, 90.0))
        .interact_text()?;
    let lon: f64 = Input::with_theme(&theme)
        .with_prompt("Longitude")
        .validate_with(|v: &f64| validate_range(*v, 180.0))
        .interact_text()?;
    Ok((lat, lon))
}

/// Prompt the user for a free-text address
pub fn prompt_query() -> Result<String> {
    let query: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Address")
        .validate_with(|v: &String| {
            if v.trim().is_empty() {
                Err("Address cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(query.trim().to_string())
}

/// Prompt the user for a point-of-interest tag and radius
pub fn prompt_tag_and_radius() -> Result<(String, u32)> {
    let theme = ColorfulTheme::default();
    let tag: String = Input::with_theme(&theme)
        .with_prompt("Tag")
        .default(DEFAULT_TAG.to_string())
        .interact_text()?;
    let radius: u32 = Input::with_theme(&theme)
        .with_prompt("Radius (m)")
        .default(DEFAULT_RADIUS)
        .interact_text()?;
    Ok((tag, radius))
}

fn validate_range(value: f64, bound: f64) -> std::result::Result<(), String> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(format!("Must be between -{} and {}", bound, bound))
    }
}

/// Build a command interactively for the given menu entry
pub fn prompt_command(selection: usize) -> Result<Commands> {
    match selection {
        0 => {
            let (lat, lon) = prompt_coordinates()?;
            Ok(Commands::Reverse(ReverseArgs { lat, lon }))
        },
        1 => Ok(Commands::Search(SearchArgs {
            query: vec![prompt_query()?],
        })),
        2 => {
            let (lat, lon) = prompt_coordinates()?;
            let (tag, radius) = prompt_tag_and_radius()?;
            Ok(Commands::Nearby(NearbyArgs {
                lat,
                lon,
                tag,
                radius,
            }))
        },
        other => Err(AppError::Cli(format!("Unknown menu entry: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locationiq_geocoder::error::ErrorKind;
    use mockito::{Matcher, Server};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_parses_reverse_with_negative_longitude() {
        let cli = parse(&["locationiq", "reverse", "51.5034", "-0.1276"]);
        assert_eq!(
            cli.command,
            Some(Commands::Reverse(ReverseArgs {
                lat: 51.5034,
                lon: -0.1276
            }))
        );
    }

    #[test]
    fn test_cli_parses_search_words() {
        let cli = parse(&["locationiq", "--raw", "search", "10", "Downing", "Street"]);
        assert!(cli.raw);
        let command = cli.command.unwrap();
        assert_eq!(command.to_args(), vec![json!("10 Downing Street")]);
    }

    #[test]
    fn test_cli_nearby_defaults() {
        let cli = parse(&["locationiq", "nearby", "48.85", "2.35", "--region", "eu1"]);
        assert_eq!(cli.region.as_deref(), Some("eu1"));
        match cli.command {
            Some(Commands::Nearby(args)) => {
                assert_eq!(args.tag, DEFAULT_TAG);
                assert_eq!(args.radius, DEFAULT_RADIUS);
            },
            other => panic!("Expected nearby command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_without_subcommand_is_interactive() {
        let cli = parse(&["locationiq"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["locationiq", "search"]).is_err());
    }

    #[test]
    fn test_places_table_lists_every_place() {
        let places = vec![
            Place {
                place_id: Some("1".to_string()),
                display_name: Some("Tour Eiffel".to_string()),
                lat: Some("48.8584".to_string()),
                lon: Some("2.2945".to_string()),
                ..Place::default()
            },
            Place {
                osm_id: Some("99".to_string()),
                name: Some("Le Procope".to_string()),
                kind: Some("restaurant".to_string()),
                distance: Some("120".to_string()),
                ..Place::default()
            },
        ];

        let rendered = places_table(&places).to_string();
        assert!(rendered.contains("Tour Eiffel"));
        assert!(rendered.contains("Le Procope"));
        assert!(rendered.contains("restaurant"));
        assert!(rendered.contains("99"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(90.0, 90.0).is_ok());
        assert!(validate_range(-180.0, 180.0).is_ok());
        assert!(validate_range(91.0, 90.0).is_err());
        assert!(validate_range(f64::NAN, 90.0).is_err());
    }

    #[tokio::test]
    async fn test_execute_nearby_against_mock_server() {
        let mut server = Server::new_async().await;
        let mut client = LocationIqClient::with_base_url(&server.url());
        client.init("pk.cli");
        let app = App::with_client(client, false);

        let _m = server
            .mock("GET", "/v1/nearby.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "pk.cli".into()),
                Matcher::UrlEncoded("tag".into(), "cafe".into()),
                Matcher::UrlEncoded("radius".into(), "250".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"place_id":"5","name":"Cafe de Flore","type":"cafe","distance":80}]"#)
            .create_async()
            .await;

        let command = Commands::Nearby(NearbyArgs {
            lat: 48.854,
            lon: 2.333,
            tag: "cafe".to_string(),
            radius: 250,
        });
        let payload = app.execute(&command).await.unwrap();
        let rendered = app.render(&payload).unwrap();

        assert!(rendered.contains("Cafe de Flore"));
        assert!(rendered.contains("80"));
    }

    #[tokio::test]
    async fn test_execute_surfaces_geocode_errors() {
        let app = App::with_client(LocationIqClient::new(), true);
        let command = Commands::Search(SearchArgs {
            query: vec!["Paris".to_string()],
        });

        match app.execute(&command).await {
            Err(AppError::Geocode(e)) => assert_eq!(e.kind(), ErrorKind::NotInitiated),
            other => panic!("Expected geocode error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_raw_is_pretty_json() {
        let app = App::with_client(LocationIqClient::new(), true);
        let rendered = app.render(&json!({"place_id": "1"})).unwrap();
        assert_eq!(rendered, "{\n  \"place_id\": \"1\"\n}");
    }
}
