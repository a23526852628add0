// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use dotenv::dotenv;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use eduscript::app_config::{self, Config};
use eduscript::file_utils::{DownloadKind, FileManager};
use eduscript::language_utils::{self, SUPPORTED_TARGET_LANGUAGES};
use eduscript::server::{self, AppState};
use eduscript::providers::GenerationClient;
use eduscript::{Controller, SessionContext};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the browser interface (default command)
    Serve {
        /// Address to bind, overrides the configuration
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a script for a topic and write it to disk
    Script(ScriptArgs),

    /// Convert a TXT, PDF or DOCX document to speech
    Speak {
        /// Document to narrate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the MP3
        #[arg(short, long, default_value = "output.mp3")]
        output: PathBuf,
    },

    /// List the translation target languages
    Languages,

    /// Verify the generation credential and model with a minimal request
    Check,

    /// Generate shell completions for eduscript
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Topic of the script
    #[arg(short, long)]
    topic: String,

    /// Narration length in minutes (1-30)
    #[arg(short, long, default_value_t = 2)]
    duration: u32,

    /// Also generate the video script
    #[arg(long)]
    video: bool,

    /// Also translate the script into this language code (e.g. 'fr', 'zh-CN')
    #[arg(long, value_name = "LANG")]
    translate: Option<String>,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

/// EduScript - Educational script and speech generator
///
/// Generates narration and video scripts for a topic, translates them, and
/// converts documents to speech.
#[derive(Parser, Debug)]
#[command(name = "eduscript")]
#[command(version)]
#[command(about = "Educational script generation, translation and text-to-speech")]
#[command(long_about = "EduScript looks a topic up on Wikipedia, turns it into a narration script sized to a duration, \
and optionally expands it into a video script or translates it. It also converts TXT, PDF and DOCX documents to speech.

EXAMPLES:
    eduscript                                          # Serve the browser interface
    eduscript serve --port 8080                        # Serve on another port
    eduscript script -t Photosynthesis -d 3            # Write Photosynthesis_script.txt
    eduscript script -t Gravity --video --translate fr # Script, video script and French translation
    eduscript speak notes.pdf -o notes.mp3             # Narrate a document
    eduscript completions bash > eduscript.bash        # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json when present. Credentials come from the
    environment or a .env file: GROQ_API_KEY (or OPENAI_API_KEY / ANTHROPIC_API_KEY
    depending on the provider) and GOOGLE_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install with the most verbose filter; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    dotenv().ok();

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "eduscript", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Languages) => {
            print_languages();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli.config_path, cli.log_level)?;

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        Some(Commands::Script(args)) => run_script(&config, args).await,
        Some(Commands::Speak { file, output }) => run_speak(&config, file, output).await,
        Some(Commands::Check) => run_check(&config).await,
        Some(Commands::Languages) | Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Load, complete and validate the configuration, then apply the log level
fn load_config(path: &str, cli_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load(path)?;
    config.apply_env();

    if let Some(level) = cli_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config
        .validate()
        .with_context(|| format!("Invalid configuration (from {})", path))?;

    Ok(config)
}

async fn run_check(config: &Config) -> Result<()> {
    let provider = config.generation.provider.display_name();
    let model = config.generation.get_model();

    GenerationClient::from_config(&config.generation)
        .test_connection()
        .await
        .with_context(|| format!("{} rejected model '{}'", provider, model))?;

    info!("{} accepted model '{}'", provider, model);
    Ok(())
}

fn print_languages() {
    for (label, code) in SUPPORTED_TARGET_LANGUAGES {
        let direction = if language_utils::is_right_to_left(code) { "rtl" } else { "" };
        println!("{:<8} {:<24} {}", code, label, direction);
    }
}

async fn run_server(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let controller = Controller::from_config(&config);
    let state = Arc::new(AppState::new(controller));
    server::start_server(&config.server, state).await
}

async fn run_script(config: &Config, args: ScriptArgs) -> Result<()> {
    let controller = Controller::from_config(config);
    let mut ctx = SessionContext::new();

    info!("Generating a {} minute script about '{}'", args.duration, args.topic);
    let script = controller
        .generate_script(&mut ctx, &args.topic, args.duration)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    save(&args, DownloadKind::Script, &script)?;

    if args.video {
        match controller.generate_video_script(&mut ctx).await {
            Ok(video_script) => save(&args, DownloadKind::VideoScript, &video_script)?,
            Err(e) => error!("{}", e.user_message()),
        }
    }

    if let Some(language) = &args.translate {
        match controller.translate_script(&mut ctx, language).await {
            Ok(translated) => save(&args, DownloadKind::TranslatedScript, &translated.text)?,
            Err(e) => error!("{}", e.user_message()),
        }
    }

    Ok(())
}

fn save(args: &ScriptArgs, kind: DownloadKind, content: &str) -> Result<()> {
    let path = FileManager::save_download(&args.output_dir, args.topic.trim(), kind, content.as_bytes())?;
    info!("Wrote {}", path.display());
    Ok(())
}

async fn run_speak(config: &Config, file: PathBuf, output: PathBuf) -> Result<()> {
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid file name: {}", file.display()))?
        .to_string();
    let bytes = FileManager::read_bytes(&file)?;

    let controller = Controller::from_config(config);
    let mut ctx = SessionContext::new();

    match controller.convert_speech(&mut ctx, &file_name, &bytes).await {
        Ok(audio) => {
            info!("{}", audio.status());
            FileManager::write_to_file(&output, &audio.audio)?;
            info!("Wrote {}", output.display());
            Ok(())
        }
        Err(e) => {
            if e.is_warning() {
                warn!("{}", e.user_message());
            }
            Err(anyhow!(e.user_message()))
        }
    }
}
