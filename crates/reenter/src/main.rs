use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anthropic_api::AnthropicClient;
use reenter::{App, Mode, ReenterConfig, ReenterError, Session};
use reenter_tui::logging::init_file_logging;
use reenter_tui::{EnvConfig, ProcessTerminal};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let env_config = EnvConfig::from_env();
    if let Some(path) = env_config.log_file.as_deref() {
        if let Err(err) = init_file_logging(Path::new(path)) {
            eprintln!("reenter: logging disabled: {err}");
        }
    }

    #[cfg(unix)]
    let _signals = match install_interrupt_cleanup() {
        Ok(guard) => Some(guard),
        Err(err) => {
            tracing::warn!(error = %err, "signal cleanup not installed");
            None
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("reenter: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run(&env_config)) {
        Ok(code) => code,
        Err(err) => {
            if !err.is_interrupted() {
                eprintln!("reenter: {err}");
            }
            tracing::debug!(error = %err, "reenter failed");
            err.exit_code()
        }
    };
    ExitCode::from(code as u8)
}

async fn run(env_config: &EnvConfig) -> Result<i32, ReenterError> {
    let config = ReenterConfig::from_env();
    let client = AnthropicClient::new(config.api_config()?)?;

    let mut terminal = ProcessTerminal::with_config(env_config);
    let mut session = Session::new(project_path()?, Mode::Run);
    tracing::debug!(project = %session.meta.project_path.display(), "session started");

    let outcome = App::new(&client, config.models.clone())
        .run(&mut terminal, &mut session)
        .await?;
    tracing::debug!(?outcome, history = session.history.len(), "session finished");
    Ok(outcome.exit_code())
}

/// First argument resolved against the working directory, or the working directory itself.
fn project_path() -> Result<PathBuf, ReenterError> {
    let cwd = env::current_dir()?;
    Ok(match env::args_os().nth(1) {
        Some(arg) => cwd.join(arg),
        None => cwd,
    })
}

/// Ctrl-C outside a prompt (during an overlay) lands here: show the cursor, put the terminal
/// mode back, exit 130.
#[cfg(unix)]
fn install_interrupt_cleanup() -> std::io::Result<reenter_tui::SignalHookGuard> {
    use reenter_tui::{restore_saved_termios, HookTerminal, OutputGate, TerminalCmd};

    reenter_tui::install_signal_handlers(|| {
        let mut hook = HookTerminal::new();
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::ShowCursor);
        gate.push(TerminalCmd::BytesStatic("\r\n"));
        let _ = gate.flush(&mut hook);
        restore_saved_termios();
        std::process::exit(130);
    })
}
