use anyhow::Context;
use neontris_engine::PieceSeed;
use neontris_game::GameSession;

use crate::{audio::AudioPlayer, command::play::app::PlayApp, config::CliConfig, tui::Tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Replay a fixed piece sequence (32 hex digits)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Show the advisor's recommendation from the start
    #[clap(long)]
    advisor: bool,
    /// Let the advisor play
    #[clap(long)]
    auto: bool,
}

pub(crate) fn run(arg: &PlayArg, config: &CliConfig) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        advisor,
        auto,
    } = arg;

    let mut session_config = config.session_config();
    if seed.is_some() {
        session_config.game.seed = *seed;
    }
    session_config.game.advisor |= *advisor || *auto;
    let session = GameSession::new(session_config).context("Failed to start the game")?;
    let audio = AudioPlayer::new(&config.audio);

    let mut app = PlayApp::new(session, audio, &config.ui, *auto);
    Tui::new().run(&mut app)?;

    let stats = app.session().stats();
    tracing::info!(
        score = stats.score(),
        lines = stats.total_cleared_lines(),
        pieces = stats.completed_pieces(),
        "play finished"
    );
    Ok(())
}
