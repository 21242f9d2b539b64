mod audio;
mod command;
mod config;
mod input;
mod logging;
mod theme;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
