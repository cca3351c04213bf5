use std::str::FromStr;

use argh::FromArgs;
use glam::Vec2;
use map_view::TraversalDepth;

/// Draw the BSP tree of one map in a WAD to a PNG
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// path to the WAD to read
    #[argh(option, default = "Default::default()")]
    pub iwad: String,
    /// map marker to draw, E1M1 or MAP01 style. Defaults to the first map
    #[argh(option)]
    pub map: Option<String>,
    /// image width in pixels
    #[argh(option, default = "0")]
    pub width: u32,
    /// image height in pixels
    #[argh(option, default = "0")]
    pub height: u32,
    /// how far down the BSP to draw <root, full, or a number of levels>
    #[argh(option)]
    pub depth: Option<TraversalDepth>,
    /// draw the segs of each sub-sector reached
    #[argh(option)]
    pub segs: Option<bool>,
    /// draw a dot on every vertex
    #[argh(option)]
    pub vertexes: Option<bool>,
    /// viewer world position as x,y. Defaults to the player one start
    #[argh(option)]
    pub viewer: Option<ViewerPos>,
    /// path of the PNG to write
    #[argh(option)]
    pub output: Option<String>,
    /// list the maps in the WAD and exit
    #[argh(switch)]
    pub list: bool,
}

/// A world position given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPos(pub Vec2);

impl FromStr for ViewerPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("invalid viewer position {s:?}, expected x,y");
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse::<f32>().map_err(|_| err())?;
        let y = y.trim().parse::<f32>().map_err(|_| err())?;
        Ok(ViewerPos(Vec2::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_pos() {
        assert_eq!(
            "1056,-3616".parse::<ViewerPos>(),
            Ok(ViewerPos(Vec2::new(1056.0, -3616.0)))
        );
        assert_eq!(
            " 1.5 , 2 ".parse::<ViewerPos>(),
            Ok(ViewerPos(Vec2::new(1.5, 2.0)))
        );
        assert!("1056".parse::<ViewerPos>().is_err());
        assert!("a,b".parse::<ViewerPos>().is_err());
    }

    #[test]
    fn parse_args() {
        let options = CLIOptions::from_args(
            &["bsp-view"],
            &[
                "--iwad", "doom1.wad", "--map", "E1M2", "--depth", "full", "--segs", "true",
                "--viewer", "10,20", "--list",
            ],
        )
        .unwrap();
        assert_eq!(options.iwad, "doom1.wad");
        assert_eq!(options.map.as_deref(), Some("E1M2"));
        assert_eq!(options.depth, Some(TraversalDepth::Full));
        assert_eq!(options.segs, Some(true));
        assert_eq!(options.viewer, Some(ViewerPos(Vec2::new(10.0, 20.0))));
        assert_eq!(options.width, 0);
        assert!(options.list);
    }
}
