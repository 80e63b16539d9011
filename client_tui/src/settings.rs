//! Settings file loading

use std::fs;
use std::path::Path;

use game_core::Config;

/// Load game settings from a JSON file
///
/// A missing or invalid file falls back to the defaults with a warning;
/// loaded values are sanitized before use.
pub fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };

    let config = match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<Config>(&data) {
            Ok(config) => {
                log::info!("Loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Invalid settings file {:?}: {}. Using defaults", path, e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("Could not read settings file {:?}: {}. Using defaults", path, e);
            Config::default()
        }
    };
    config.sanitized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(load_config(None), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "paddle_speed": 7.5, "win_scores": { "versus": 3 } }"#)
            .expect("write");

        let config = load_config(Some(path.as_path()));
        assert_eq!(config.paddle_speed, 7.5);
        assert_eq!(config.win_scores.versus, 3);
        assert_eq!(config.win_scores.novice, Config::default().win_scores.novice);
        assert_eq!(config.ball_size, Config::default().ball_size);
    }

    #[test]
    fn test_bad_files_fall_back() {
        let dir = TempDir::new().expect("temp dir");
        assert_eq!(load_config(Some(dir.path().join("missing.json").as_path())), Config::default());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nope").expect("write");
        assert_eq!(load_config(Some(path.as_path())), Config::default());
    }

    #[test]
    fn test_nonsense_values_are_sanitized() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "ball_size": -4.0 }"#).expect("write");

        assert_eq!(load_config(Some(path.as_path())).ball_size, Config::default().ball_size);
    }

    #[test]
    fn test_zero_win_score_falls_back_to_default() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "win_scores": { "novice": 0 } }"#).expect("write");

        let config = load_config(Some(path.as_path()));
        assert_eq!(config.win_scores.novice, Config::default().win_scores.novice);
    }
}
