//! Invader Swarm Demo
//!
//! Plays a headless round against a scripted player, renders every frame
//! into an in-memory screen, then replays the round and checks that the
//! final state hashes match.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use invader_swarm::{
    Cell, CharBuffer, SwarmConfig, SwarmController, TICK_RATE, VERSION,
    core::hash::StateHash,
    game::{
        events::SwarmEventData,
        host::{AudioCue, GameFlow, PlayerView, ScoreSink, Structures},
    },
};

/// Longest round the demo will play (two minutes).
const MAX_TICKS: u32 = TICK_RATE * 120;

/// Hits a base cell takes before it is gone.
const BASE_STRENGTH: u8 = 3;

/// One bomb roll in this many ticks.
const BOMB_CHANCE: u32 = 50;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Invader Swarm v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => SwarmConfig::default(),
    };

    demo_round(&config)
}

fn load_config(path: &Path) -> Result<SwarmConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = SwarmConfig::from_json_str(&json)
        .with_context(|| format!("loading config {}", path.display()))?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

// =============================================================================
// DEMO HOST
// =============================================================================

/// Everything outside the swarm: player, bases, shots, score.
struct DemoHost {
    player_x: i32,
    player_dir: i32,
    player_min_x: i32,
    player_max_x: i32,
    player_row: i32,
    shot: Option<Cell>,
    bombs: Vec<Cell>,
    bases: BTreeMap<Cell, u8>,
    score: u32,
    lives: u32,
    kills: u32,
    marches: u32,
    floor_reached: bool,
}

impl DemoHost {
    fn new(config: &SwarmConfig) -> Self {
        let px = &config.pixels;
        let player_row = config.playfield_rows - 1;

        // Four bases, three cells wide and two tall, above the player
        let mut bases = BTreeMap::new();
        let base_row = config.player_hit_row - 3;
        for i in 0..4 {
            let left = 4 + i * (config.playfield_cols / 4);
            for dc in 0..3 {
                for dr in 0..2 {
                    bases.insert(Cell::new(left + dc, base_row + dr), BASE_STRENGTH);
                }
            }
        }

        Self {
            player_x: px.left_edge,
            player_dir: 2,
            player_min_x: px.left_edge,
            player_max_x: px.left_edge + (config.playfield_cols - 3) * px.cell_px,
            player_row,
            shot: None,
            bombs: Vec::new(),
            bases,
            score: 0,
            lives: 3,
            kills: 0,
            marches: 0,
            floor_reached: false,
        }
    }

    /// Sweep the player back and forth.
    fn move_player(&mut self) {
        self.player_x += self.player_dir;
        if self.player_x <= self.player_min_x || self.player_x >= self.player_max_x {
            self.player_dir = -self.player_dir;
            self.player_x = self.player_x.clamp(self.player_min_x, self.player_max_x);
        }
    }

    /// Player's centre column.
    fn player_col(&self, config: &SwarmConfig) -> i32 {
        let (first, last) = config.pixels.column_span(self.player_x, config.player_width_px);
        (first + last) / 2
    }
}

impl PlayerView for DemoHost {
    fn player_x(&self) -> i32 {
        self.player_x
    }
}

impl Structures for DemoHost {
    fn query_and_damage(&mut self, cell: Cell, destroy_on_contact: bool) -> bool {
        let Some(strength) = self.bases.get_mut(&cell) else {
            return false;
        };
        if destroy_on_contact || *strength <= 1 {
            self.bases.remove(&cell);
        } else {
            *strength -= 1;
        }
        true
    }
}

impl ScoreSink for DemoHost {
    fn add_score(&mut self, points: u32) {
        self.score += points;
    }
}

impl AudioCue for DemoHost {
    fn unit_destroyed(&mut self) {
        self.kills += 1;
    }

    fn formation_advance(&mut self) {
        self.marches += 1;
    }
}

impl GameFlow for DemoHost {
    fn formation_reached_floor(&mut self) {
        self.floor_reached = true;
    }

    fn player_killed(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

// =============================================================================
// ROUND
// =============================================================================

/// Outcome of one scripted round.
struct RoundSummary {
    ticks: u32,
    score: u32,
    lives: u32,
    events: usize,
    kills: u32,
    marches: u32,
    hash: StateHash,
    screen: CharBuffer,
}

/// Run the scripted round to completion.
fn play_round(config: &SwarmConfig) -> Result<RoundSummary> {
    let mut swarm = SwarmController::new(config.clone()).context("building swarm")?;
    let mut host = DemoHost::new(config);
    let mut screen = CharBuffer::for_config(config);
    let mut events = 0;

    swarm.init();

    for t in 0..MAX_TICKS {
        let lives_before = host.lives;

        host.move_player();
        advance_shot(&mut swarm, &mut host, config);
        advance_bombs(&mut swarm, &mut host, config);

        let result = swarm.update(&mut host);
        events += result.events.len();

        for event in &result.events {
            match &event.data {
                SwarmEventData::Dropped { origin } => {
                    debug!(tick = t, row = origin.row, "Swarm dropped");
                }
                SwarmEventData::UnitHit { unit, points } => {
                    debug!(tick = t, unit, points, "Hit");
                }
                _ => {}
            }
        }

        swarm.render(&mut screen);

        if host.lives < lives_before {
            info!(tick = t, lives = host.lives, "Player lost a life");
            host.bombs.clear();
            host.shot = None;
            if host.lives == 0 {
                break;
            }
            swarm.reset_position_only();
        }

        if result.reached_floor || host.floor_reached {
            warn!(tick = t, "Swarm landed");
            break;
        }

        if result.cleared {
            info!(tick = t, score = host.score, "Wave cleared");
            break;
        }

        if t > 0 && t % (TICK_RATE * 10) == 0 {
            info!(
                "Tick {}: {} alive, score {}, {} bases cells left",
                t,
                swarm.formation().alive_count(),
                host.score,
                host.bases.len()
            );
        }
    }

    Ok(RoundSummary {
        ticks: swarm.tick_count(),
        score: host.score,
        lives: host.lives,
        events,
        kills: host.kills,
        marches: host.marches,
        hash: swarm.compute_hash(),
        screen,
    })
}

/// Fire when idle, otherwise move the shot up one row and test it.
fn advance_shot(swarm: &mut SwarmController, host: &mut DemoHost, config: &SwarmConfig) {
    let cell = match host.shot {
        Some(cell) => cell.offset(0, -1),
        None => Cell::new(host.player_col(config), host.player_row - 1),
    };

    if cell.row < 0 {
        host.shot = None;
        return;
    }

    if host.query_and_damage(cell, false) || swarm.resolve_projectile_hit(cell, host) {
        host.shot = None;
    } else {
        host.shot = Some(cell);
    }
}

/// Drop bombs from the front line and let them fall.
fn advance_bombs(swarm: &mut SwarmController, host: &mut DemoHost, config: &SwarmConfig) {
    if swarm.roll(BOMB_CHANCE) {
        if let Some(cell) = swarm.pick_random_shooter().and_then(|p| config.pixels.cell_of(p)) {
            host.bombs.push(cell);
        }
    }

    let (first, last) = config.pixels.column_span(host.player_x, config.player_width_px);
    let mut falling = Vec::with_capacity(host.bombs.len());

    for bomb in std::mem::take(&mut host.bombs) {
        let next = bomb.offset(0, 1);
        if host.query_and_damage(next, false) {
            continue;
        }
        if next.row == host.player_row && (first..=last).contains(&next.col) {
            host.player_killed();
            continue;
        }
        if next.row < config.playfield_rows {
            falling.push(next);
        }
    }

    host.bombs = falling;
}

fn demo_round(config: &SwarmConfig) -> Result<()> {
    info!("=== Starting Demo Round ===");
    info!("RNG Seed: {:#x}", config.rng_seed);

    let first = play_round(config)?;

    info!("=== Round Results ===");
    info!("Ticks: {} ({} seconds)", first.ticks, first.ticks / TICK_RATE);
    info!("Score: {}  Lives left: {}", first.score, first.lives);
    info!("Units destroyed: {}  Steps marched: {}", first.kills, first.marches);
    info!("Total events: {}", first.events);
    info!("Final State Hash: {}", hex::encode(first.hash));

    for row in 0..config.playfield_rows {
        debug!("{}", first.screen.row_text(row));
    }

    info!("=== Verifying Determinism ===");
    let replay = play_round(config)?;
    info!("Replay State Hash: {}", hex::encode(replay.hash));

    if first.hash == replay.hash && first.screen == replay.screen {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("replay diverged: {} vs {}", hex::encode(first.hash), hex::encode(replay.hash))
    }
}
