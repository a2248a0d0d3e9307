//! Reference engines the policy plays against.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Move, Position};
use tracing::debug;

use crate::config::{EngineKind, TrainingConfig};
use crate::error::{Result, TrainingError};
use crate::game::evaluation::{evaluate, Metric};

pub trait ReferenceEngine: Send {
    fn choose(&mut self, pos: &Chess) -> Result<Move>;
}

/// Plays a uniformly random legal move.
pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl ReferenceEngine for RandomEngine {
    fn choose(&mut self, pos: &Chess) -> Result<Move> {
        let legal = pos.legal_moves();
        if legal.is_empty() {
            return Err(TrainingError::NoLegalMove);
        }
        Ok(legal[self.rng.gen_range(0..legal.len())])
    }
}

/// Plays the move whose resulting position scores best for the mover.
pub struct GreedyEngine {
    metrics: Vec<Metric>,
}

impl GreedyEngine {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self { metrics }
    }
}

impl ReferenceEngine for GreedyEngine {
    fn choose(&mut self, pos: &Chess) -> Result<Move> {
        let mover = pos.turn();
        let mut best: Option<(Move, f64)> = None;
        for m in pos.legal_moves() {
            let mut next = pos.clone();
            next.play_unchecked(m);
            let score = evaluate(&next, mover).mean_of(&self.metrics);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((m, score)),
            }
        }
        best.map(|(m, _)| m).ok_or(TrainingError::NoLegalMove)
    }
}

/// An external engine driven over UCI with a fixed time per move.
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    movetime_ms: u64,
}

impl UciEngine {
    pub fn spawn(path: &Path, movetime_ms: u64) -> Result<Self> {
        Self::start(Command::new(path), movetime_ms)
    }

    /// Starts `command` and completes the `uci`/`isready` handshake.
    pub fn start(mut command: Command, movetime_ms: u64) -> Result<Self> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TrainingError::Engine(format!("could not start engine: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TrainingError::Engine("engine stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TrainingError::Engine("engine stdout unavailable".to_string()))?;

        let mut engine = Self { child, stdin, stdout: BufReader::new(stdout), movetime_ms };
        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        Ok(engine)
    }

    fn send(&mut self, command: &str) -> Result<()> {
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads lines until one starts with `token` and returns it.
    fn wait_for(&mut self, token: &str) -> Result<String> {
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(TrainingError::Engine(format!("engine exited before '{token}'")));
            }
            if line.starts_with(token) {
                return Ok(line);
            }
            debug!(line = line.trim_end(), "engine output");
        }
    }
}

/// The move of a `bestmove` line, checked against `pos`.
pub fn parse_bestmove(line: &str, pos: &Chess) -> Result<Move> {
    let token = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| TrainingError::Engine(format!("malformed reply '{}'", line.trim_end())))?;
    if token == "(none)" || token == "0000" {
        return Err(TrainingError::NoLegalMove);
    }
    let uci: UciMove = token
        .parse()
        .map_err(|_| TrainingError::Engine(format!("unparseable move '{token}'")))?;
    uci.to_move(pos)
        .map_err(|_| TrainingError::Engine(format!("illegal move '{token}'")))
}

impl ReferenceEngine for UciEngine {
    fn choose(&mut self, pos: &Chess) -> Result<Move> {
        let fen = Fen::from_position(pos, EnPassantMode::Legal);
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {}", self.movetime_ms))?;
        let line = self.wait_for("bestmove")?;
        parse_bestmove(&line, pos)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if self.send("quit").is_err() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

pub fn make_engine(config: &TrainingConfig, seed: u64) -> Result<Box<dyn ReferenceEngine>> {
    Ok(match config.engine {
        EngineKind::Random => Box::new(RandomEngine::new(seed)),
        EngineKind::Greedy => Box::new(GreedyEngine::new(config.reward_metrics.clone())),
        EngineKind::Uci => Box::new(UciEngine::spawn(&config.engine_path, config.engine_movetime_ms)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{CastlingMode, Role, Square};

    fn position(fen: &str) -> Chess {
        let fen: Fen = fen.parse().unwrap();
        fen.into_position(CastlingMode::Standard).unwrap()
    }

    #[test]
    fn test_random_engine_is_seeded() {
        let pos = Chess::default();
        let a = RandomEngine::new(3).choose(&pos).unwrap();
        let b = RandomEngine::new(3).choose(&pos).unwrap();
        assert_eq!(a, b);
        assert!(pos.is_legal(a));
    }

    #[test]
    fn test_greedy_engine_takes_the_hanging_queen() {
        let pos = position("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1");
        let mut engine = GreedyEngine::new(vec![Metric::MaterialBalance]);
        let m = engine.choose(&pos).unwrap();
        assert_eq!(m.role(), Role::Rook);
        assert_eq!(m.to(), Square::D5);
    }

    #[test]
    fn test_engines_report_no_legal_move() {
        let mated = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(matches!(RandomEngine::new(0).choose(&mated), Err(TrainingError::NoLegalMove)));
        let config = TrainingConfig {
            engine: EngineKind::Greedy,
            reward_metrics: vec![Metric::MaterialBalance],
            ..TrainingConfig::default()
        };
        let mut greedy = make_engine(&config, 0).unwrap();
        assert!(matches!(greedy.choose(&mated), Err(TrainingError::NoLegalMove)));
    }

    #[test]
    fn test_parse_bestmove() {
        let pos = Chess::default();
        let m = parse_bestmove("bestmove e2e4 ponder e7e5\n", &pos).unwrap();
        assert_eq!(m.to(), Square::E4);
        assert!(matches!(parse_bestmove("bestmove (none)", &pos), Err(TrainingError::NoLegalMove)));
        assert!(matches!(parse_bestmove("bestmove e2e5", &pos), Err(TrainingError::Engine(_))));
        assert!(matches!(parse_bestmove("bestmove", &pos), Err(TrainingError::Engine(_))));
    }

    #[test]
    fn test_missing_engine_binary_is_an_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = UciEngine::spawn(&dir.path().join("no-such-engine"), 10);
        assert!(matches!(result, Err(TrainingError::Engine(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_uci_engine_talks_to_a_scripted_engine() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("engine.sh");
        std::fs::write(
            &script,
            "while read line; do\n\
             case \"$line\" in\n\
             uci) echo 'id name scripted'; echo uciok ;;\n\
             isready) echo readyok ;;\n\
             go*) echo 'info depth 1'; echo 'bestmove g1f3' ;;\n\
             quit) exit 0 ;;\n\
             esac\n\
             done\n",
        )
        .unwrap();

        let mut command = Command::new("sh");
        command.arg(&script);
        let mut engine = UciEngine::start(command, 10).unwrap();
        let m = engine.choose(&Chess::default()).unwrap();
        assert_eq!(m.role(), Role::Knight);
        assert_eq!(m.to(), Square::F3);
    }
}
