//! Load a map from a WAD, draw its geometry and BSP tree top down, and save
//! the frame as a PNG.

mod cli;
mod config;

use cli::*;
use glam::Vec2;
use log::{LevelFilter, info, warn};
use map_view::BspRenderer;
use render_trait::{BufferSize, PixelBuffer, SoftFramebuffer};
use simplelog::TermLogger;
use std::error::Error;
use wad::WadArchive;

use crate::config::UserConfig;

const BASE_DIR: &str = "bsp-view/";

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    user_config.write();

    if options.iwad.is_empty() {
        return Err("no WAD given, pass --iwad <path>".into());
    }
    let mut wad = WadArchive::open(&options.iwad)?;
    info!(
        "Opened {} ({:?}, {} lumps)",
        options.iwad,
        wad.header().kind,
        wad.lumps().len()
    );

    let maps: Vec<String> = wad.map_names().into_iter().map(str::to_owned).collect();
    if options.list {
        for name in &maps {
            println!("{name}");
        }
        return Ok(());
    }

    let map_name = match options.map.clone() {
        Some(name) => name,
        None => maps.first().cloned().ok_or("the WAD has no maps")?,
    };
    let map = wad.load_map(&map_name)?;
    // The map owns all its tables, nothing else is read from the file
    drop(wad);

    let size = BufferSize::new(options.width as usize, options.height as usize);
    let renderer = BspRenderer::new(&map, size, user_config.render_options())?;

    let viewer = match (options.viewer, map.player_start()) {
        (Some(ViewerPos(pos)), _) => pos,
        (None, Some(start)) => Vec2::new(start.x as f32, start.y as f32),
        (None, None) => {
            warn!("{map_name} has no player start, placing the viewer in the middle");
            renderer.projection().extent().centre()
        }
    };

    let mut framebuffer = SoftFramebuffer::new(size.width_usize(), size.height_usize());
    renderer.render_frame(&mut framebuffer, viewer)?;

    let output = options.output.unwrap_or_else(|| user_config.output.clone());
    image::save_buffer(
        &output,
        framebuffer.read_pixels(),
        options.width,
        options.height,
        image::ColorType::Rgba8,
    )?;
    info!("Saved {map_name} to {output}");
    Ok(())
}
