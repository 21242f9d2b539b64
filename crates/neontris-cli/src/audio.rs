//! Sound effects for session events.
//!
//! Playback needs the `audio` feature. Without it, or when the output device or a sound
//! file is missing, events are only logged and the game carries on silently.

use std::path::PathBuf;

use neontris_game::{EventSubscriber, GameEvent};

use crate::config::AudioSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Move,
    Rotate,
    Drop,
    Clear,
    GameOver,
}

impl Sound {
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::PieceMoved => Sound::Move,
            GameEvent::PieceRotated => Sound::Rotate,
            GameEvent::PieceDropped => Sound::Drop,
            GameEvent::LinesCleared(_) => Sound::Clear,
            GameEvent::GameOver => Sound::GameOver,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Move => "move.wav",
            Sound::Rotate => "rotate.wav",
            Sound::Drop => "drop.wav",
            Sound::Clear => "clear.wav",
            Sound::GameOver => "game_over.wav",
        }
    }
}

/// Plays one sound per session event, fire-and-forget.
#[derive(Debug)]
pub struct AudioPlayer {
    sounds_dir: PathBuf,
    output: Option<output::Output>,
}

impl AudioPlayer {
    pub fn new(config: &AudioSection) -> Self {
        let output = if config.enabled {
            output::Output::open(config.volume)
        } else {
            tracing::info!("audio disabled by config");
            None
        };
        Self {
            sounds_dir: config.sounds_dir.clone(),
            output,
        }
    }

    pub fn play(&self, sound: Sound) {
        let path = self.sounds_dir.join(sound.file_name());
        match &self.output {
            Some(output) => output.play(&path),
            None => tracing::trace!(?sound, "sound skipped"),
        }
    }
}

impl EventSubscriber for AudioPlayer {
    fn on_event(&mut self, event: GameEvent) {
        self.play(Sound::for_event(event));
    }
}

#[cfg(feature = "audio")]
mod output {
    use std::{fmt, fs::File, io::BufReader, path::Path};

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    pub(super) struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
    }

    impl fmt::Debug for Output {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Output")
                .field("volume", &self.volume)
                .finish_non_exhaustive()
        }
    }

    impl Output {
        pub(super) fn open(volume: f32) -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                    volume,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output device, sound disabled");
                    None
                }
            }
        }

        pub(super) fn play(&self, path: &Path) {
            let Ok(file) = File::open(path) else {
                tracing::debug!(path = %path.display(), "sound file missing");
                return;
            };
            let decoder = match Decoder::new(BufReader::new(file)) {
                Ok(decoder) => decoder,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot decode sound");
                    return;
                }
            };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.set_volume(self.volume);
                    sink.append(decoder);
                    sink.detach();
                }
                Err(e) => tracing::warn!(error = %e, "cannot open audio sink"),
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod output {
    use std::path::Path;

    #[derive(Debug)]
    pub(super) struct Output;

    impl Output {
        pub(super) fn open(_volume: f32) -> Option<Self> {
            tracing::info!("built without the `audio` feature, sound disabled");
            None
        }

        pub(super) fn play(&self, path: &Path) {
            tracing::trace!(path = %path.display(), "sound skipped");
        }
    }
}
