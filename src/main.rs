use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serene::{
    app::App,
    app_dirs::AppDirs,
    audio::PreviewPlayer,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    store::SessionStore,
    ui::ui,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// calm terminal meditation timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A calm meditation timer: pick a narrator voice, background music and a duration, then follow the countdown."
)]
pub struct Cli {
    /// directory holding the <name>.mp3 preview clips
    #[clap(long)]
    previews_dir: Option<PathBuf>,

    /// file used to remember speaker and music choices
    #[clap(long)]
    prefs_file: Option<PathBuf>,

    /// write logs to this file instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// read settings from this config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// keep remembered choices in memory only, for this run
    #[clap(long)]
    no_remember: bool,

    /// save the effective settings to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }

    /// Command line values win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.previews_dir {
            config.previews_dir = Some(dir.clone());
        }
        config
    }

    fn prefs(&self) -> Box<dyn PreferenceStore> {
        if self.no_remember {
            Box::new(MemoryPreferenceStore::new())
        } else {
            match &self.prefs_file {
                Some(path) => Box::new(FilePreferenceStore::with_path(path)),
                None => Box::new(FilePreferenceStore::new()),
            }
        }
    }
}

#[cfg(feature = "audio")]
fn preview_player() -> serene::audio::RodioPreviewPlayer {
    serene::audio::RodioPreviewPlayer::new()
}

#[cfg(not(feature = "audio"))]
fn preview_player() -> serene::audio::SilentPreviewPlayer {
    serene::audio::SilentPreviewPlayer::new()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = cli.config_store();
    let config = cli.apply(config_store.load());

    if cli.write_config {
        config_store.save(&config)?;
        println!("wrote {}", config_store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(e) = logging::init(&log_path, &config.log_level) {
        eprintln!("logging disabled: {e}");
    }

    let mut app = App::new(
        SessionStore::new(),
        cli.prefs(),
        preview_player(),
        config.previews_dir(),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, P, A>(terminal: &mut Terminal<B>, app: &mut App<P, A>) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    P: PreferenceStore,
    A: PreviewPlayer,
{
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        app.on_event(event, runner.elapsed());

        if app.should_quit() {
            break;
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["serene"]);
        assert_eq!(cli.previews_dir, None);
        assert_eq!(cli.prefs_file, None);
        assert_eq!(cli.config, None);
        assert!(!cli.no_remember);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_paths() {
        let cli = Cli::parse_from([
            "serene",
            "--previews-dir",
            "/srv/previews",
            "--prefs-file",
            "/tmp/p.json",
            "-c",
            "/tmp/c.json",
        ]);
        assert_eq!(cli.previews_dir, Some(PathBuf::from("/srv/previews")));
        assert_eq!(cli.prefs_file, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.config_store().path(), std::path::Path::new("/tmp/c.json"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["serene", "--previews-dir", "/cli"]);
        let cfg = Config {
            previews_dir: Some(PathBuf::from("/file")),
            log_level: "debug".into(),
        };
        let merged = cli.apply(cfg);
        assert_eq!(merged.previews_dir(), PathBuf::from("/cli"));
        assert_eq!(merged.log_level, "debug");
    }

    #[test]
    fn test_no_remember_uses_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let cli = Cli::parse_from([
            "serene",
            "--no-remember",
            "--prefs-file",
            path.to_str().unwrap(),
        ]);
        let mut prefs = cli.prefs();
        prefs.set("preferredSpeaker", "Calm Voice").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_prefs_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let cli = Cli::parse_from(["serene", "--prefs-file", path.to_str().unwrap()]);
        let mut prefs = cli.prefs();
        prefs.set("preferredMusic", "Soft Piano").unwrap();
        assert!(path.exists());
    }
}
