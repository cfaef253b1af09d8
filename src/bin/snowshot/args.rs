// args.rs - Command-line options
//
// Tool switches are handled here; every other `--key value` pair is passed
// through to SnowConfig::set.

use std::path::PathBuf;

use snowfall_engine::{ConfigError, SnowConfig};

use crate::SnapshotError;

pub struct Args {
    pub config: SnowConfig,
    pub width: i32,
    pub height: i32,
    pub seconds: f32,
    pub fps: u32,
    pub seed: u64,
    pub tree_sprite: Option<PathBuf>,
    pub output: PathBuf,
}

impl Args {
    pub fn parse(args: &[String]) -> Result<Self, SnapshotError> {
        let mut parsed = Self {
            config: SnowConfig::default(),
            width: 1280,
            height: 720,
            seconds: 12.0,
            fps: 60,
            seed: 0x5EED,
            tree_sprite: None,
            output: PathBuf::from("snow.png"),
        };

        let mut i = 0;
        while i < args.len() {
            let key = args[i]
                .strip_prefix("--")
                .ok_or_else(|| SnapshotError::Usage(format!("unexpected argument `{}`", args[i])))?;
            let value = args
                .get(i + 1)
                .ok_or_else(|| SnapshotError::Usage(format!("missing value for --{key}")))?;

            match key {
                "width" => parsed.width = number(key, value)?,
                "height" => parsed.height = number(key, value)?,
                "seconds" => parsed.seconds = number(key, value)?,
                "fps" => parsed.fps = number::<u32>(key, value)?.clamp(10, 120),
                "seed" => parsed.seed = number(key, value)?,
                "tree-sprite" => parsed.tree_sprite = Some(PathBuf::from(value)),
                "out" => parsed.output = PathBuf::from(value),
                _ => parsed.config.set(key, value)?,
            }
            i += 2;
        }

        Ok(parsed)
    }
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SnapshotError> {
    value.parse().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}
