use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tablut_core::{Evaluator, Side};
use tools::selfplay::{GameConfig, GameSummary, Policy, SelfplayConfig, run_game, side_label};

/// 評価器同士の自己対局。1局ごとに1行の JSON を書き出す。
///
/// # よく使うコマンド例
///
/// - 既定の重み同士で10局（貪欲な方策、標準出力へ）:
///   `cargo run -p tools --bin selfplay -- --games 10`
///
/// - 確率的な方策で100局、攻め方だけ重みを差し替え:
///   `cargo run -p tools --bin selfplay -- --games 100 --policy stochastic --seed 42 --attacker-weights attacker.toml --out runs/selfplay.jsonl`
///
/// - 1手ごとのログ:
///   `RUST_LOG=debug cargo run -p tools --bin selfplay -- --games 1`
#[derive(Parser, Debug)]
#[command(author, version, about = "Tablut selfplay harness (evaluator vs evaluator)")]
struct Cli {
    /// Number of games to run
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Maximum plies per game before declaring a draw
    #[arg(long, default_value_t = 500)]
    max_plies: u32,

    /// Move selection policy
    #[arg(long, value_enum, default_value_t = Policy::Greedy)]
    policy: Policy,

    /// Base seed for the stochastic policy (game i uses seed + i)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Let the attackers move first (disables the opening book)
    #[arg(long, default_value_t = false)]
    attacker_first: bool,

    /// TOML file with [attacker] and [defender] weight tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file with the attacker weights (overrides --config)
    #[arg(long)]
    attacker_weights: Option<PathBuf>,

    /// TOML file with the defender weights (overrides --config)
    #[arg(long)]
    defender_weights: Option<PathBuf>,

    /// Output JSONL path (stdout if omitted)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<SelfplayConfig> {
    let mut config = match &cli.config {
        Some(path) => SelfplayConfig::load(path)?,
        None => SelfplayConfig::default(),
    };
    if let Some(path) = &cli.attacker_weights {
        config.set_weights(Side::Attacker, SelfplayConfig::load_weights(path)?);
    }
    if let Some(path) = &cli.defender_weights {
        config.set_weights(Side::Defender, SelfplayConfig::load_weights(path)?);
    }
    Ok(config)
}

fn open_output(out: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let Some(path) = out else {
        return Ok(Box::new(std::io::stdout().lock()));
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.games == 0 {
        bail!("--games must be >= 1");
    }

    let weights = load_config(&cli)?;
    let attacker = Evaluator::new(*weights.weights(Side::Attacker));
    let defender = Evaluator::new(*weights.weights(Side::Defender));
    let game_config = GameConfig {
        max_plies: cli.max_plies,
        policy: cli.policy,
        first_player: if cli.attacker_first {
            Side::Attacker
        } else {
            Side::Defender
        },
    };
    info!(
        "selfplay: games={} policy={:?} max_plies={} first={}",
        cli.games,
        cli.policy,
        cli.max_plies,
        game_config.first_player.label()
    );

    let mut writer = open_output(cli.out.as_ref())?;
    let mut summary = GameSummary::default();
    for game_idx in 0..cli.games {
        let game_id = game_idx + 1;
        let seed = cli.seed.wrapping_add(u64::from(game_idx));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut record = run_game(&attacker, &defender, &game_config, &mut rng, game_id, &mut |ev| {
            log::trace!("{}{} {}\n{}", side_label(ev.side), ev.ply, ev.mv, ev.position.grid());
        })?;
        if cli.policy == Policy::Stochastic {
            record.seed = Some(seed);
        }

        serde_json::to_writer(&mut writer, &record)?;
        writeln!(writer)?;
        writer.flush()?;

        info!(
            "game {game_id}: {:?} ({}) after {} plies",
            record.outcome, record.reason, record.plies
        );
        summary.record(&record);
    }

    info!(
        "summary: attackers={} defenders={} draws={} avg_plies={:.1}",
        summary.attackers_won,
        summary.defenders_won,
        summary.draws,
        summary.average_plies()
    );
    Ok(())
}
