use std::path::{Path, PathBuf};

use tracing::debug;

/// Fire-and-forget preview playback.
///
/// Implementations never block and never report failure to the caller.
pub trait PreviewPlayer {
    /// Start playing `asset`, replacing whatever preview is already playing
    fn play(&mut self, asset: &Path);
    fn stop(&mut self);
}

/// Player used when the crate is built without audio output
#[derive(Debug, Default)]
pub struct SilentPreviewPlayer {
    current: Option<PathBuf>,
}

impl SilentPreviewPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }
}

impl PreviewPlayer for SilentPreviewPlayer {
    fn play(&mut self, asset: &Path) {
        debug!(asset = %asset.display(), "preview requested (audio disabled)");
        self.current = Some(asset.to_path_buf());
    }

    fn stop(&mut self) {
        self.current = None;
    }
}

#[cfg(feature = "audio")]
pub use self::rodio_player::RodioPreviewPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::debug;

    use super::PreviewPlayer;

    /// Plays previews on the default output device
    #[derive(Default)]
    pub struct RodioPreviewPlayer {
        output: Option<(OutputStream, OutputStreamHandle)>,
        sink: Option<Sink>,
    }

    impl RodioPreviewPlayer {
        pub fn new() -> Self {
            Self::default()
        }

        fn handle(&mut self) -> Option<&OutputStreamHandle> {
            if self.output.is_none() {
                match OutputStream::try_default() {
                    Ok(output) => self.output = Some(output),
                    Err(e) => {
                        debug!(error = %e, "no audio output device");
                        return None;
                    }
                }
            }
            self.output.as_ref().map(|(_, handle)| handle)
        }
    }

    impl PreviewPlayer for RodioPreviewPlayer {
        fn play(&mut self, asset: &Path) {
            self.stop();

            let Ok(file) = File::open(asset) else {
                debug!(asset = %asset.display(), "preview asset missing");
                return;
            };
            let Ok(source) = Decoder::new(BufReader::new(file)) else {
                debug!(asset = %asset.display(), "preview asset not decodable");
                return;
            };
            let Some(handle) = self.handle() else { return };
            let Ok(sink) = Sink::try_new(handle) else { return };

            sink.append(source);
            self.sink = Some(sink);
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_player_tracks_latest_request() {
        let mut player = SilentPreviewPlayer::new();
        assert!(player.current().is_none());

        player.play(Path::new("/previews/calm-voice.mp3"));
        player.play(Path::new("/previews/soft-piano.mp3"));
        assert_eq!(player.current(), Some(Path::new("/previews/soft-piano.mp3")));

        player.stop();
        assert!(player.current().is_none());
    }
}
