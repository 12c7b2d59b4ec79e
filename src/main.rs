mod cli;

use clap::Parser;
use cli::{App, Cli};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use locationiq_geocoder::error::{AppError, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    info!("Initializing LocationIQ geocoder...");

    let app = match App::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!("{} {}", "Error: Failed to initialize application:".red(), e);
            return Err(e);
        },
    };

    // One-shot mode
    if let Some(command) = cli.command {
        let result = app.run_command(command).await;
        if let Err(e) = &result {
            report(e);
        }
        return result;
    }

    println!("{}", "Welcome to the LocationIQ geocoder!".cyan().bold());

    // Main interactive loop
    loop {
        let options = &[
            "Reverse geocode coordinates",
            "Search an address",
            "Find nearby points of interest",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()?
            .unwrap_or(options.len() - 1); // Default to Exit if cancelled

        if selection == options.len() - 1 {
            println!("{}", "Exiting. Goodbye!".green());
            break;
        }

        println!("\n---\n");

        let command = match cli::prompt_command(selection) {
            Ok(command) => command,
            Err(e) => {
                println!("{} {}", "Failed to get input:".red(), e);
                continue;
            },
        };

        if let Err(e) = app.run_command(command).await {
            report(&e);
        }

        println!("\n---\n");
    }

    Ok(())
}

fn report(e: &AppError) {
    error!("Command execution failed: {:?}", e);
    match e {
        AppError::Geocode(geocode) => println!(
            "{} {}",
            format!("[{}]", geocode.kind()).red().bold(),
            geocode.to_string().red()
        ),
        other => println!("{} {}", "Error executing command:".red(), other.to_string().red()),
    }
}
