//! Runboard CLI
//!
//! Command-line interface for the scoreboard and tournament scheduler:
//! - Render update messages and list players
//! - Trigger player updates
//! - Manage schedules and share registration links
//! - Register for a time slot

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use runboard::api::{ApiClient, ApiClientConfig, ApiError};
use runboard::config::{generate_default_config, Config};
use runboard::leaderboard::{
    parse_update_message, render_score_table, ProgressTicker, RenderedScoreboard, UpdateState,
};
use runboard::schedule::{
    create_default_schedule, slot_label, sort_time_slots, validate_schedule, RegistrationLink,
    RegistrationSession, Schedule, ScheduleError, ScheduleView, SubmitOutcome,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "runboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Speedrun scoreboard and tournament scheduler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Global scoreboard
    Scoreboard {
        #[command(subcommand)]
        command: ScoreboardCommand,
    },

    /// Log in with a speedrun.com API key
    Login {
        #[arg(long)]
        api_key: String,
    },

    /// Tournament schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Register for a time slot through a registration link
    Register {
        /// Registration link or `{id}-{key}` token
        link: String,
        /// Time slot id
        #[arg(long)]
        slot: i64,
        /// Participant names, one per flag
        #[arg(short, long = "participant", required = true)]
        participants: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ScoreboardCommand {
    /// Render an update message from a file or stdin
    Render {
        /// Input file, `-` or nothing for stdin
        file: Option<PathBuf>,
    },
    /// List players
    Players,
    /// List your friends, or add/remove one by user id
    Friends {
        #[arg(long, conflicts_with = "remove")]
        add: Option<String>,
        #[arg(long)]
        remove: Option<String>,
    },
    /// Update a player and show the resulting scores
    Update {
        /// speedrun.com user name or id
        player: String,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// List your schedules
    List,
    /// Show one schedule with slot availability
    Show { id: i64 },
    /// Show registrations of a schedule
    View {
        id: i64,
        /// Registration key, when viewing someone else's schedule
        #[arg(long)]
        key: Option<String>,
    },
    /// Create a schedule with one default time slot
    Create {
        #[arg(long)]
        name: Option<String>,
        /// Open registrations right away
        #[arg(long)]
        active: bool,
    },
    /// Print the registration link of a schedule
    Link { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    runboard::logging::init_tracing(&config.logging)?;

    let json = cli.format == "json";

    match cli.command {
        Commands::Scoreboard { command } => match command {
            ScoreboardCommand::Render { file } => {
                let raw = read_input(file.as_ref())?;
                let scoreboard = render_score_table(&parse_update_message(&raw));
                print_scoreboard(&scoreboard, json)?;
            }

            ScoreboardCommand::Players => {
                let client = api_client(&config)?;
                let players = client.list_players().await.map_err(api_failure)?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&players)?);
                } else if players.is_empty() {
                    println!("No players yet.");
                } else {
                    println!("{:<6} {:<24} {:>10}", "Rank", "Name", "Score");
                    println!("{}", "-".repeat(42));
                    for player in players {
                        let rank = player.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
                        println!("{:<6} {:<24} {:>10.2}", rank, player.name, player.score);
                    }
                }
            }

            ScoreboardCommand::Friends { add, remove } => {
                let client = api_client(&config)?;

                if let Some(user_id) = add {
                    println!("{}", client.add_friend(&user_id).await.map_err(friend_failure)?);
                } else if let Some(user_id) = remove {
                    println!("{}", client.remove_friend(&user_id).await.map_err(api_failure)?);
                } else {
                    let friends = client.list_friends().await.map_err(api_failure)?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&friends)?);
                    } else if friends.is_empty() {
                        println!("No friends yet.");
                    } else {
                        for user_id in friends {
                            println!("{}", user_id);
                        }
                    }
                }
            }

            ScoreboardCommand::Update { player } => {
                let client = api_client(&config)?;
                let result = update_with_progress(&client, &player).await?;

                let scoreboard = render_score_table(&parse_update_message(&result.message));
                if !json {
                    println!("[{}]", result.state);
                }
                print_scoreboard(&scoreboard, json)?;

                if result.state == UpdateState::Danger {
                    bail!("update of {} failed", player);
                }
            }
        },

        Commands::Login { api_key } => {
            let mut client = api_client(&config)?;
            let login = client.login(&api_key).await.map_err(api_failure)?;

            println!("Logged in as {} ({})", login.user.name, login.user.user_id);
            println!();
            println!("Keep the token for later commands:");
            println!("  export RUNBOARD_TOKEN={}", login.token);
        }

        Commands::Schedule { command } => {
            let client = api_client(&config)?;

            match command {
                ScheduleCommand::List => {
                    let schedules = client.list_schedules().await.map_err(api_failure)?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&schedules)?);
                    } else if schedules.is_empty() {
                        println!("No schedules yet.");
                        println!();
                        println!("Create your first one with:");
                        println!("  runboard schedule create --name \"Weekly race\"");
                    } else {
                        println!("{:<8} {:<32} {:<8} {}", "ID", "Name", "Active", "Slots");
                        println!("{}", "-".repeat(60));
                        for schedule in schedules {
                            println!(
                                "{:<8} {:<32} {:<8} {}",
                                schedule.id,
                                schedule.name,
                                if schedule.active { "yes" } else { "no" },
                                schedule.time_slots.len()
                            );
                        }
                    }
                }

                ScheduleCommand::Show { id } => {
                    let schedule = client.get_schedule(id, None).await.map_err(api_failure)?;
                    print_schedule(schedule, json)?;
                }

                ScheduleCommand::View { id, key } => {
                    let schedule = client
                        .get_schedule(id, key.as_deref())
                        .await
                        .map_err(api_failure)?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&schedule)?);
                    } else {
                        println!("{}", ScheduleView::new(&schedule));
                    }
                }

                ScheduleCommand::Create { name, active } => {
                    let mut schedule = create_default_schedule(Utc::now()).active(active);
                    if let Some(name) = name {
                        schedule.name = name;
                    }
                    validate_schedule(&schedule)?;

                    let id = client.save_schedule(&schedule).await.map_err(api_failure)?;
                    println!("Created schedule {}", id);

                    let created = client.get_schedule(id, None).await.map_err(api_failure)?;
                    println!("Registration link: {}", created.registration_link(&config.api.origin));
                }

                ScheduleCommand::Link { id } => {
                    let schedule = client.get_schedule(id, None).await.map_err(api_failure)?;
                    println!("{}", schedule.registration_link(&config.api.origin));
                }
            }
        }

        Commands::Register {
            link,
            slot,
            participants,
        } => {
            let link = RegistrationLink::parse(&link)?;
            let client = api_client(&config)?;

            let mut session = RegistrationSession::open(&client, &link)
                .await
                .map_err(schedule_failure)?
                .ok_or_else(|| anyhow!("Registration form does not exist"))?;

            if !session.schedule().active {
                bail!("Registration for {} is closed", session.schedule().name);
            }

            session.select_slot(slot, Utc::now())?;
            for (index, name) in participants.into_iter().enumerate() {
                session.set_participant(index, name);
            }

            match session.submit(&client).await.map_err(schedule_failure)? {
                SubmitOutcome::Registered { registration_id, .. } => {
                    println!("Registered (registration {})", registration_id);
                    println!();
                    println!("{}", ScheduleView::new(session.schedule()));
                }
                SubmitOutcome::SlotFull { message, .. } => {
                    bail!("{}", message);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn api_client(config: &Config) -> anyhow::Result<ApiClient> {
    ApiClient::new(ApiClientConfig::from(&config.api)).context("failed to build HTTP client")
}

fn api_failure(err: ApiError) -> anyhow::Error {
    tracing::error!(error = %err, "Request failed");
    anyhow!("{}", err.user_message())
}

/// Friend endpoints explain rejections (422) in plain text
fn friend_failure(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::Status { status: 422, message } if !message.is_empty() => anyhow!("{}", message),
        other => api_failure(other),
    }
}

fn schedule_failure(err: ScheduleError) -> anyhow::Error {
    match err {
        ScheduleError::Api(e) => anyhow!("{}", e.user_message()),
        other => other.into(),
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// Run a player update while printing the remaining update window
async fn update_with_progress(
    client: &ApiClient,
    player: &str,
) -> anyhow::Result<runboard::leaderboard::UpdateResult> {
    let mut ticker = ProgressTicker::start_now();
    let mut progress = ticker.subscribe();
    let mut shown = -1i64;

    let update = client.update_player(player);
    tokio::pin!(update);

    let result = loop {
        tokio::select! {
            result = &mut update => break result,
            changed = progress.changed() => {
                if changed.is_err() {
                    break (&mut update).await;
                }
                let percent = progress.borrow().floor() as i64;
                if percent != shown {
                    shown = percent;
                    eprint!("\rUpdating {}... {:>3}% of the update window left", player, percent);
                }
            }
        }
    };

    ticker.stop();
    eprintln!();

    result.map_err(api_failure)
}

fn print_scoreboard(scoreboard: &RenderedScoreboard, json: bool) -> anyhow::Result<()> {
    if json {
        let sections: Vec<serde_json::Value> = scoreboard
            .sections
            .iter()
            .map(|section| {
                serde_json::json!({
                    "label": section.label,
                    "rows": section.rows.iter().map(|row| serde_json::json!({
                        "position": row.position,
                        "description": row.description,
                        "points": row.points,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let value = serde_json::json!({
            "header": scoreboard.header,
            "sections": sections,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", scoreboard);
    }
    Ok(())
}

fn print_schedule(mut schedule: Schedule, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    sort_time_slots(&mut schedule.time_slots);
    let now = Utc::now();

    println!("{} (id {})", schedule.name, schedule.id);
    println!("Registration: {}", if schedule.active { "open" } else { "closed" });
    println!();

    if schedule.time_slots.is_empty() {
        println!("No time slots.");
    } else {
        println!("{:<8} {:<40} {}", "Slot", "When", "Per entry");
        println!("{}", "-".repeat(60));
        for slot in &schedule.time_slots {
            println!(
                "{:<8} {:<40} {}",
                slot.id,
                slot_label(slot, now),
                slot.participants_per_entry
            );
        }
    }
    Ok(())
}
