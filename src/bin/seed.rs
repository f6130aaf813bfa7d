//! CLI tool to seed development data and mint a bearer token.
//!
//! Usage:
//!   cargo run --bin seed -- --username tester1
//!
//! Creates (or reuses) the user, seeds a sample plan with a case and two
//! steps on first run, and prints a development bearer token for the
//! user.

use std::env;

use planboard_lib::auth;
use planboard_lib::config::Config;
use planboard_lib::db::cases::NewTestCase;
use planboard_lib::db::plans::NewTestPlan;
use planboard_lib::db::DbPool;
use planboard_lib::models::{CaseStatus, PlanStatus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut username = "tester1".to_string();
    let mut email: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                if i < args.len() {
                    username = args[i].clone();
                }
            }
            "--email" | "-e" => {
                i += 1;
                if i < args.len() {
                    email = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if !config.is_development() {
        eprintln!("Refusing to seed outside development mode");
        std::process::exit(1);
    }

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    pool.run_migrations().await.expect("Failed to run migrations");

    let user = match pool
        .get_user_by_username(&username)
        .await
        .expect("Failed to query user")
    {
        Some(existing) => {
            println!("User '{}' already exists", username);
            existing
        }
        None => {
            let user = pool
                .insert_user(&username, email.as_deref())
                .await
                .expect("Failed to create user");
            println!("Created user '{}'", username);

            let plan = pool
                .insert_plan(NewTestPlan {
                    title: "Login flow".to_string(),
                    description: "Smoke tests for the login flow".to_string(),
                    status: PlanStatus::InProgress,
                })
                .await
                .expect("Failed to seed plan");

            let case = pool
                .insert_case(NewTestCase {
                    plan_id: plan.id,
                    title: "Valid credentials".to_string(),
                    description: "Login succeeds with a valid username/password".to_string(),
                    status: CaseStatus::Ready,
                })
                .await
                .expect("Failed to seed case");

            pool.insert_step(case.id, 1, "Open the login page", "The login form is shown")
                .await
                .expect("Failed to seed step");
            pool.insert_step(
                case.id,
                2,
                "Submit valid credentials",
                "The dashboard is shown",
            )
            .await
            .expect("Failed to seed step");

            println!("Seeded sample plan '{}' with one case", plan.title);
            user
        }
    };

    let token = auth::issue_token(&config.jwt_secret, user.id, &user.username, 24 * 30)
        .expect("Failed to mint token");

    println!();
    println!("User id: {}", user.id);
    println!("Bearer token (valid 30 days):");
    println!("{}", token);
}

fn print_usage() {
    println!("Usage: seed [--username <name>] [--email <email>]");
    println!();
    println!("Seeds a development user (plus sample data on first run)");
    println!("and prints a bearer token for the user.");
}
