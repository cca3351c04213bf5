//! User configuration options.

use crate::{BASE_DIR, CLIOptions};
use dirs::config_dir;
use log::{error, info, warn};
use map_view::{RenderOptions, TraversalDepth};
use nanoserde::{DeRon, SerRon};
use std::{
    fs::{File, create_dir_all},
    io::{Read, Write},
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";
const CONFIG_FILE: &str = "user.ron";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = create_dir_all(&dir) {
            warn!(target: LOG_TAG, "Couldn't create {:?}: {}", dir, e);
            return None;
        }
    }
    dir.push(CONFIG_FILE);
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct UserConfig {
    #[nserde(default)]
    pub iwad: String,
    #[nserde(default)]
    pub map: String,
    #[nserde(default)]
    pub width: u32,
    #[nserde(default)]
    pub height: u32,
    /// `root`, `full`, or a number of levels
    #[nserde(default)]
    pub depth: String,
    #[nserde(default)]
    pub segs: bool,
    #[nserde(default)]
    pub vertexes: bool,
    #[nserde(default)]
    pub output: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            iwad: String::new(),
            map: String::new(),
            width: 640,
            height: 480,
            depth: TraversalDepth::default().to_string(),
            segs: false,
            vertexes: false,
            output: "bsp.png".to_owned(),
        }
    }
}

impl UserConfig {
    /// Read the config, or fall back to defaults if it is missing or broken
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            warn!(target: LOG_TAG, "No user config dir, using defaults");
            return UserConfig::default();
        };

        let mut buf = String::new();
        match File::open(&path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(read_len) if read_len > 0 => match UserConfig::from_ron(&buf) {
                Some(config) => {
                    info!(target: LOG_TAG, "Loaded user config file");
                    return config;
                }
                None => warn!(target: LOG_TAG, "Could not deserialise {:?} recreating config", path),
            },
            _ => info!(target: LOG_TAG, "No user config at {:?}, using defaults", path),
        }
        UserConfig::default()
    }

    fn from_ron(data: &str) -> Option<Self> {
        let mut config = UserConfig::deserialize_ron(data).ok()?;
        // Zeroed sizes come from fields missing in an older file
        let defaults = UserConfig::default();
        if config.width == 0 {
            config.width = defaults.width;
        }
        if config.height == 0 {
            config.height = defaults.height;
        }
        if config.depth.parse::<TraversalDepth>().is_err() {
            config.depth = defaults.depth;
        }
        if config.output.is_empty() {
            config.output = defaults.output;
        }
        Some(config)
    }

    pub fn write(&self) {
        let Some(path) = get_cfg_file() else {
            return;
        };
        let data = self.serialize_ron();
        match File::create(&path).and_then(|mut f| f.write_all(data.as_bytes())) {
            Ok(()) => info!(target: LOG_TAG, "Saved user config to {:?}", path),
            Err(err) => error!(target: LOG_TAG, "Could not write config: {}", err),
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if !cli.iwad.is_empty() && cli.iwad != self.iwad {
            cli.iwad.clone_into(&mut self.iwad);
            info!(target: LOG_TAG, "IWAD changed to: {}", &cli.iwad);
            // The saved map belonged to the old IWAD
            self.map.clear();
        } else {
            self.iwad.clone_into(&mut cli.iwad);
        }

        if let Some(map) = &cli.map {
            map.clone_into(&mut self.map);
        } else if !self.map.is_empty() {
            cli.map = Some(self.map.clone());
        }

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if let Some(depth) = cli.depth {
            self.depth = depth.to_string();
        } else {
            cli.depth = self.depth.parse().ok();
        }

        if let Some(f) = cli.segs {
            self.segs = f;
        } else {
            cli.segs = Some(self.segs);
        }

        if let Some(f) = cli.vertexes {
            self.vertexes = f;
        } else {
            cli.vertexes = Some(self.vertexes);
        }

        if let Some(output) = &cli.output {
            output.clone_into(&mut self.output);
        } else {
            cli.output = Some(self.output.clone());
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_depth: self.depth.parse().unwrap_or_default(),
            draw_segs: self.segs,
            draw_vertexes: self.vertexes,
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn cli(args: &[&str]) -> CLIOptions {
        CLIOptions::from_args(&["bsp-view"], args).unwrap()
    }

    #[test]
    fn ron_round_trip() {
        let config = UserConfig {
            iwad: "/games/doom1.wad".to_owned(),
            map: "E1M3".to_owned(),
            depth: "full".to_owned(),
            segs: true,
            ..UserConfig::default()
        };
        let data = config.serialize_ron();
        assert_eq!(UserConfig::from_ron(&data), Some(config));
    }

    #[test]
    fn partial_file_gets_defaults() {
        let config = UserConfig::from_ron("(iwad: \"doom2.wad\",)").unwrap();
        assert_eq!(config.iwad, "doom2.wad");
        assert_eq!(config.width, 640);
        assert_eq!(config.depth, "root");
        assert_eq!(config.output, "bsp.png");
    }

    #[test]
    fn broken_file_is_rejected() {
        assert_eq!(UserConfig::from_ron("not ron at all"), None);
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = UserConfig::default();
        let mut options = cli(&["--iwad", "freedoom1.wad", "--width", "1024", "--depth", "3"]);
        config.sync_cli(&mut options);

        assert_eq!(config.iwad, "freedoom1.wad");
        assert_eq!(config.width, 1024);
        assert_eq!(config.depth, "3");
        // Unset options are filled from the config
        assert_eq!(options.height, 480);
        assert_eq!(options.segs, Some(false));
        assert_eq!(options.output.as_deref(), Some("bsp.png"));
        assert_eq!(options.map, None);
    }

    #[test]
    fn config_fills_cli() {
        let mut config = UserConfig {
            iwad: "doom.wad".to_owned(),
            map: "E2M1".to_owned(),
            depth: "full".to_owned(),
            ..UserConfig::default()
        };
        let mut options = cli(&[]);
        config.sync_cli(&mut options);
        assert_eq!(options.iwad, "doom.wad");
        assert_eq!(options.map.as_deref(), Some("E2M1"));
        assert_eq!(options.depth, Some(TraversalDepth::Full));

        let render = config.render_options();
        assert_eq!(render.max_depth, TraversalDepth::Full);
        assert!(!render.draw_segs);
    }

    #[test]
    fn new_iwad_forgets_saved_map() {
        let saved = UserConfig {
            iwad: "doom.wad".to_owned(),
            map: "E1M1".to_owned(),
            ..UserConfig::default()
        };

        let mut config = saved.clone();
        let mut options = cli(&["--iwad", "doom2.wad"]);
        config.sync_cli(&mut options);
        assert_eq!(options.map, None);
        assert!(config.map.is_empty());

        let mut config = saved.clone();
        let mut options = cli(&["--iwad", "doom2.wad", "--map", "MAP07"]);
        config.sync_cli(&mut options);
        assert_eq!(config.map, "MAP07");

        // Naming the same IWAD again keeps the map
        let mut config = saved;
        let mut options = cli(&["--iwad", "doom.wad"]);
        config.sync_cli(&mut options);
        assert_eq!(options.map.as_deref(), Some("E1M1"));
    }
}
