use anyhow::Result;
use clap::Parser;
use client_core::{DirectoryClient, EmployeeField};
use shared::domain::EmployeeId;
use tracing::info;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Employee service base URL; overrides directory.toml and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Page through the whole directory instead of only the first chunk.
    #[arg(long)]
    walk: bool,
    /// Employee id to edit after loading.
    #[arg(long)]
    edit_id: Option<i64>,
    /// New name for the edited employee.
    #[arg(long)]
    name: Option<String>,
    /// New job title for the edited employee.
    #[arg(long)]
    job_title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let settings = config::load_settings();
    let server_url = args.server_url.unwrap_or(settings.server_url);

    info!(server_url = %server_url, "connecting to employee service");
    let client = DirectoryClient::connect(server_url.clone())?;
    client.fetch_all().await?;

    let snapshot = client.directory_snapshot().await;
    println!(
        "Loaded {} employees, {} visible",
        snapshot.total,
        snapshot.visible.len()
    );
    for record in &snapshot.visible {
        println!(
            "  #{} {} — {} | {} | {}",
            record.id.0, record.name, record.job_title, record.company, record.department
        );
    }

    if args.walk {
        while client.advance().await {}
        let snapshot = client.directory_snapshot().await;
        println!("Walked directory: {} visible", snapshot.visible.len());
    }

    if let Some(id) = args.edit_id {
        let snapshot = client.directory_snapshot().await;
        let Some(record) = snapshot.visible.iter().find(|r| r.id == EmployeeId(id)) else {
            anyhow::bail!("employee {id} is not in the visible window; try --walk");
        };
        client.select(record).await;
        if let Some(name) = args.name {
            client.edit_field(EmployeeField::Name, name).await;
        }
        if let Some(job_title) = args.job_title {
            client.edit_field(EmployeeField::JobTitle, job_title).await;
        }
        client.save().await?;

        let edit = client.edit_snapshot().await;
        println!("Save status: {:?}", edit.save_status);
    }

    Ok(())
}
