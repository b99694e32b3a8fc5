// Snake draft simulator entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player pool and pick model
// 4. Build the point sampler, teams and league
// 5. Run the simulated draft with a seeded RNG
// 6. Print the draft board and projected standings
// 7. Run the Monte-Carlo season valuation and print it

use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use snakedraft_core::config;
use snakedraft_core::draft::league::League;
use snakedraft_core::draft::team::Team;
use snakedraft_core::projections;
use snakedraft_core::sim::DraftSimulator;
use snakedraft_core::valuation::monte_carlo::simulate_season_outcomes;
use snakedraft_core::valuation::sampler::PointSampler;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Snake draft simulator starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} rounds, snake={}",
        config.league.name, config.league.num_teams, config.draft.rounds, config.draft.snake_draft
    );

    // 3. Load data
    let data = projections::load_all(&config).context("failed to load draft data")?;
    info!(
        "Loaded {} players and {} pick model bands",
        data.players.len(),
        data.pick_model.bands().len()
    );

    // 4. Sampler, teams, league
    let sampler =
        PointSampler::from_config(&config.scoring).context("invalid scoring configuration")?;
    let positions = Arc::new(config.draft.clone());
    let teams = (0..config.league.num_teams)
        .map(|i| {
            let team = Team::new(
                format!("Team {}", i + 1),
                format!("Owner {}", i + 1),
                i,
                Arc::clone(&positions),
            );
            if config.simulation.simulator_team == Some(i) {
                team.as_simulator()
            } else {
                team
            }
        })
        .collect();
    let mut league = League::new(teams, positions).context("failed to build league")?;

    // 5. Draft
    let mut rng = StdRng::seed_from_u64(config.simulation.seed);
    let mut simulator = DraftSimulator::new(&data.pick_model, data.players);
    let picks = simulator
        .run(&mut league, &mut rng)
        .context("draft simulation failed")?;
    info!("Draft finished with {} picks", picks);

    // 6. Report the draft
    let year = config.draft.active_year;
    println!("{} ({} season)", config.league.name, year);
    println!();
    println!("Draft board");
    for pick in league.draft_results() {
        println!(
            "  {:>3}. R{:<2} {:<10} {:<3} {}",
            pick.pick_number, pick.round, pick.team_name, pick.position.display_str(), pick.player_name
        );
    }
    if picks < league.total_picks() {
        println!(
            "  (player pool ran out after {} of {} picks)",
            picks,
            league.total_picks()
        );
    }

    println!();
    println!("Projected standings");
    let ranked = league
        .rank_by_projected_team_points()
        .context("failed to rank teams")?;
    for (place, team) in ranked.iter().enumerate() {
        let marker = if team.simulator { " *" } else { "" };
        println!(
            "  {:>2}. {:<10} roster {:>7.1}  starters {:>7.1}{}",
            place + 1,
            team.name,
            team.projected_roster_points(year)?,
            team.projected_starter_points(year)?,
            marker
        );
    }

    if let Some(team) = league.simulator_team() {
        println!();
        println!("{} starters", team.name);
        for player in team.starters() {
            println!(
                "  {:<3} {:<24} {:>6.1}",
                player.position.display_str(),
                player.name,
                player.projected_points(year)?
            );
        }
        let needs = team.needs();
        if !needs.is_empty() {
            let needs: Vec<String> = needs.iter().map(ToString::to_string).collect();
            println!("  open slots: {}", needs.join(", "));
        }
    }

    // 7. Monte-Carlo valuation
    let outcomes = simulate_season_outcomes(
        &league,
        &sampler,
        year,
        config.simulation.trials,
        &mut rng,
    )
    .context("season simulation failed")?;

    println!();
    println!("Simulated seasons ({} trials)", config.simulation.trials);
    for outcome in &outcomes {
        println!(
            "  {:<10} mean {:>7.1}  sd {:>6.1}  range {:>6.1}-{:<6.1}  wins {:>5.1}%",
            outcome.team_name,
            outcome.mean,
            outcome.std_dev,
            outcome.min,
            outcome.max,
            outcome.win_rate() * 100.0
        );
    }

    info!("Snake draft simulator finished");
    Ok(())
}

/// Initialize tracing to log to a file (logs/snakedraft.log).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("snakedraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snakedraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
