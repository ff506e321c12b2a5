// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::SceneConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scrollscape")]
#[command(about = "Scroll-driven 3D space scene", long_about = None)]
pub struct Cli {
    /// JSON scene configuration; defaults are used for anything it leaves out
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the texture images are loaded from
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Number of stars to scatter
    #[arg(long, value_name = "N")]
    pub stars: Option<usize>,

    /// Seed for star placement
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Transform snapshot to apply once the scene is built
    #[arg(long, value_name = "FILE")]
    pub restore: Option<PathBuf>,

    /// Where to write a transform snapshot on exit
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

impl Cli {
    /// Loads the config file, if any, and applies the flag overrides
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut SceneConfig) {
        if let Some(assets) = &self.assets {
            config.assets.root = assets.clone();
        }
        if let Some(stars) = self.stars {
            config.starfield.count = stars;
        }
        if let Some(seed) = self.seed {
            config.starfield.seed = Some(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "scrollscape",
            "--assets",
            "media",
            "--stars",
            "42",
            "--seed",
            "9",
            "--save",
            "out.json",
        ])
        .unwrap();

        let config = cli.scene_config().unwrap();
        assert_eq!(config.assets.root, PathBuf::from("media"));
        assert_eq!(config.starfield.count, 42);
        assert_eq!(config.starfield.seed, Some(9));
        assert_eq!(cli.save, Some(PathBuf::from("out.json")));
        assert_eq!(cli.restore, None);
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["scrollscape"]).unwrap();
        assert_eq!(cli.scene_config().unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_rejects_non_numeric_star_count() {
        assert!(Cli::try_parse_from(["scrollscape", "--stars", "lots"]).is_err());
    }
}
