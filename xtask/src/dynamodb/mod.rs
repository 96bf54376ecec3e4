//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use aws_sdk_dynamodb::Client;
use dialoguer::Confirm;

#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy the movies table.
    Deploy(DeployCommand),

    /// Insert demo movies.
    Seed(SeedCommand),
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Create the movies table, keyed by `title` (S) and `year` (N).

A table that already exists with another key schema is reported and left
alone. Pass --destroy to delete the table instead.

Point AWS_ENDPOINT_URL at DynamoDB Local (http://localhost:8000) to work
against a local store. AWS_REGION and AWS_PROFILE are honored.")]
pub struct DeployCommand {
    /// Do not ask before changing the table.
    #[arg(long)]
    pub force: bool,

    /// Delete the table.
    #[arg(long)]
    pub destroy: bool,

    #[arg(long, default_value = "Movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,
}

/// Demo movies mix flat and nested info, and two share a title.
#[derive(Debug, clap::Parser)]
pub struct SeedCommand {
    #[arg(long, default_value = "Movies", env = "MOVIES_TABLE_NAME")]
    pub table_name: String,

    /// Do not ask before inserting.
    #[arg(long)]
    pub force: bool,
}

pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();
    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
    }
    let dynamo_client = client::create_client(&aws_config).await;

    match command.action {
        DynamodbAction::Deploy(cmd) if cmd.destroy => {
            run_destroy(&dynamo_client, cmd, &global).await
        }
        DynamodbAction::Deploy(cmd) => run_deploy(&dynamo_client, cmd, &global).await,
        DynamodbAction::Seed(cmd) => run_seed(&dynamo_client, cmd, &global).await,
    }
}

/// Asks before a change unless `force` is set. Declining cancels the command.
fn confirm(prompt: &str, default: bool, force: bool) -> Result<()> {
    if force || Confirm::new().with_prompt(prompt).default(default).interact()? {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

async fn run_deploy(dynamo: &Client, cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let desired = config::movies_table_config().with_table_name(&cmd.table_name);
    let current = client::get_table_state(dynamo, &cmd.table_name).await?;
    let plan = planning::calculate_deploy_plan(current.as_ref(), &desired);

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy plan:"));
        for line in planning::format_deploy_plan(&plan) {
            match line.chars().next() {
                Some('+') => aprintln!("  {}", p_g(&line)),
                Some('~') => aprintln!("  {}", p_y(&line)),
                _ => aprintln!("  {}", line),
            }
        }
    }

    // A mismatched key schema is reported by the executor as an error.
    if let planning::DeployPlan::CreateTable { .. } = plan {
        confirm("Create the table?", true, cmd.force)?;
    }
    deploy::execute_deploy_plan(dynamo, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g(&format!("Table {} is ready.", cmd.table_name)));
    }
    Ok(())
}

async fn run_destroy(dynamo: &Client, cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let current = client::get_table_state(dynamo, &cmd.table_name).await?;
    let plan = planning::calculate_destroy_plan(current.as_ref(), &cmd.table_name);

    if !global.is_silent() {
        aprintln!("{}", p_y("Destroy plan:"));
        for line in planning::format_destroy_plan(&plan) {
            aprintln!("  {}", p_r(&line));
        }
    }

    if let planning::DestroyPlan::AlreadyGone { .. } = plan {
        return Ok(());
    }
    confirm(
        &format!("Delete {} and every movie in it?", cmd.table_name),
        false,
        cmd.force,
    )?;
    deploy::execute_destroy_plan(dynamo, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g(&format!("Table {} deleted.", cmd.table_name)));
    }
    Ok(())
}

async fn run_seed(dynamo: &Client, cmd: SeedCommand, global: &crate::Global) -> Result<()> {
    if client::get_table_state(dynamo, &cmd.table_name).await?.is_none() {
        return Err(DynamodbError::TableNotFound {
            table_name: cmd.table_name,
        });
    }

    let movies = seed::demo_movies();
    if !global.is_silent() {
        aprintln!("{} {}", p_c("Movies for"), cmd.table_name);
        for movie in &movies {
            aprintln!("  {}", seed::format_movie(movie));
        }
    }

    confirm(&format!("Insert {} movies?", movies.len()), true, cmd.force)?;
    let inserted = seed::seed_movies(dynamo, &cmd.table_name, &movies).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g(&format!("{inserted} movies inserted.")));
        if inserted < movies.len() {
            aprintln!(
                "{}",
                p_y(&format!(
                    "{} movies were left unprocessed; run the seed again.",
                    movies.len() - inserted
                ))
            );
        }
    }
    Ok(())
}
