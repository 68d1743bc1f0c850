use std::{env, fs, sync::Arc};

use branch_portal::client::AdminClient;
use branch_portal::dashboard::Dashboard;
use branch_portal::db::repository::Table;
use branch_portal::models::{Entity, NewCourse, NewInstructor, NewProject, NewTeamMember};
use branch_portal::services::{EntityService, Services, Transport};
use dotenvy::dotenv;
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn is_dry_run() -> bool {
    !env::args().any(|a| a == "--apply")
}

#[derive(Debug, Deserialize)]
struct SeedData {
    #[serde(default)]
    courses: Vec<NewCourse>,
    #[serde(default)]
    team_members: Vec<NewTeamMember>,
    #[serde(default)]
    projects: Vec<NewProject>,
    #[serde(default)]
    instructors: Vec<NewInstructor>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "branch_portal=warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let seed_file = env::var("SEED_FILE").unwrap_or_else(|_| "tools/seed/data.json".to_string());

    let data: SeedData = serde_json::from_str(&fs::read_to_string(&seed_file)?)?;
    let client = match env::var("ADMIN_TOKEN") {
        Ok(token) => AdminClient::with_token(&site_url, token)?,
        Err(_) => {
            let email = env::var("ADMIN_EMAIL")?;
            let password = env::var("ADMIN_PASSWORD")?;
            AdminClient::login(&site_url, &email, &password).await?
        }
    };
    let services = Services::new(Transport::Client(Arc::new(client)));

    let mut dashboard = Dashboard::new(services.clone());
    dashboard.load().await;

    let dry_run = is_dry_run();

    let missing: Vec<_> = data
        .courses
        .into_iter()
        .filter(|c| !dashboard.courses().iter().any(|e| e.slug == c.slug))
        .collect();
    seed(&services.courses, missing, dry_run, |c| c.slug.clone()).await;

    let missing: Vec<_> = data
        .team_members
        .into_iter()
        .filter(|m| !dashboard.team_members().iter().any(|e| e.name == m.name))
        .collect();
    seed(&services.team_members, missing, dry_run, |m| m.name.clone()).await;

    let missing: Vec<_> = data
        .projects
        .into_iter()
        .filter(|p| !dashboard.projects().iter().any(|e| e.title == p.title))
        .collect();
    seed(&services.projects, missing, dry_run, |p| p.title.clone()).await;

    let missing: Vec<_> = data
        .instructors
        .into_iter()
        .filter(|i| !dashboard.instructors().iter().any(|e| e.email == i.email))
        .collect();
    seed(&services.instructors, missing, dry_run, |i| i.email.clone()).await;

    if !dry_run {
        dashboard.load().await;
    }
    let summary = dashboard.summary();
    println!(
        "Courses: {} ({} current), team members: {}, projects: {}, instructors: {}",
        summary.courses,
        summary.current_courses,
        summary.team_members,
        summary.projects,
        summary.instructors
    );

    Ok(())
}

async fn seed<E, F>(service: &EntityService<E>, records: Vec<E::New>, dry_run: bool, key: F)
where
    E: Table,
    F: Fn(&E::New) -> String,
{
    let mut created = 0;
    let total = records.len();

    for new in records {
        let name = key(&new);
        if dry_run {
            println!("[DRY RUN] Would create {} {}", E::LABEL, name);
            continue;
        }

        match service.create(new).await {
            Some(record) => {
                println!("Created {} {} -> {}", E::LABEL, name, record.id());
                created += 1;
            }
            None => println!("Failed to create {} {}", E::LABEL, name),
        }
    }

    println!("{}: {} / {} missing records created", E::COLLECTION, created, total);
}
