use clap::Parser;
use std::path::PathBuf;

use crate::display::DisplayMode;
use crate::renderer::Preset;

#[derive(Parser, Debug, Default)]
#[command(name = "beatcanvas")]
#[command(author, version, about = "Audio-reactive canvas renderer with layered effects")]
pub struct Args {
    /// Output: terminal preview or headless rendering
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Effect tuning preset
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Comma-separated effects to enable, e.g. gradient,bar-circle,bounce
    #[arg(short, long, value_delimiter = ',')]
    pub effects: Option<Vec<String>>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<usize>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<usize>,

    /// Frames to render in headless mode
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Target frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for the noise effect
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a commented default config file and exit
    #[arg(long)]
    pub init_config: bool,
}
