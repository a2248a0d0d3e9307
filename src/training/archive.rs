//! Per-game archives written as `game_NNNN.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

const GAME_PREFIX: &str = "game_";

/// One self-play game: the board encodings seen by the trained side, the
/// move indices it chose and the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameArchive {
    pub inputs: Vec<Vec<f32>>,
    pub moves: Vec<usize>,
    pub result: String,
    pub plies: usize,
}

fn game_number(path: &Path) -> Option<u32> {
    path.file_stem()?.to_str()?.strip_prefix(GAME_PREFIX)?.parse().ok()
}

/// The next unused game number in `dir`. Entries that cannot be read are
/// skipped with a warning.
pub fn next_game_number(dir: &Path) -> u32 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 1;
    };
    let mut last = 0;
    for entry in entries {
        match entry {
            Ok(entry) => last = last.max(game_number(&entry.path()).unwrap_or(0)),
            Err(e) => warn!(dir = %dir.display(), error = %e, "skipping unreadable archive entry"),
        }
    }
    last + 1
}

impl GameArchive {
    /// Writes the archive as game `number` and returns its path.
    pub fn save(&self, dir: &Path, number: u32) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{GAME_PREFIX}{number:04}.json"));
        fs::write(&path, serde_json::to_string(self)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn archive(result: &str) -> GameArchive {
        GameArchive { inputs: vec![vec![0.0; 64]], moves: vec![12 * 64 + 28], result: result.to_string(), plies: 1 }
    }

    #[test]
    fn test_games_are_numbered_sequentially() {
        let dir = tempdir().unwrap();
        let first = archive("1-0").save(dir.path(), next_game_number(dir.path())).unwrap();
        let second = archive("0-1").save(dir.path(), next_game_number(dir.path())).unwrap();
        assert_eq!(first.file_name().unwrap(), "game_0001.json");
        assert_eq!(second.file_name().unwrap(), "game_0002.json");
        assert_eq!(next_game_number(dir.path()), 3);

        let saved: GameArchive = serde_json::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
        assert_eq!(saved, archive("0-1"));
    }

    #[test]
    fn test_numbering_continues_after_gaps() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("game_0007.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert_eq!(next_game_number(dir.path()), 8);
    }

    #[test]
    fn test_missing_directory_starts_at_one() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert_eq!(next_game_number(&missing), 1);
        let path = archive("1-0").save(&missing, 1).unwrap();
        assert_eq!(path, missing.join("game_0001.json"));
    }
}
