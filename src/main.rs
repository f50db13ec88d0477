// histhook - shell hooks for an external history service
//
// This is the host side of the event layer: the hook scripts call one
// subcommand per shell lifecycle event, state travels through exported
// shell variables, and effects go back as directive lines on stdout.
// Diagnostics stay on stderr so stdout remains a clean directive channel.

use histhook_lib::{
    config::ENV_LOG,
    core::{dispatch, Effect, SessionState, ShellEvent, UpKeyContext},
    shell::{HookInstaller, Shell, ShellDetector},
    Config, ProcessClient, Result,
};
use serde::Serialize;
use std::env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(ENV_LOG, "warn")).init();

    // Grab whatever the hook (or the user) passed us
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "session-start" => handle_session_start(),
        "preexec" => handle_preexec(&args[2..]),
        "postexec" => handle_postexec(&args[2..]),
        "precmd" => handle_precmd(),
        "search" => handle_search(&args[2..]),
        "setup" => handle_setup(&args[2..]),
        "uninstall" => handle_uninstall(),
        "status" => handle_status(&args[2..]),
        "hook" => handle_hook(&args[2..]),
        "version" | "-v" | "--version" => {
            println!("histhook v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

/// Shared setup for the per-event subcommands
fn event_context() -> (Config, SessionState, ProcessClient) {
    let config = Config::from_env();
    let state = SessionState::from_env();
    let client = ProcessClient::new(&config, state.session_id.clone());
    (config, state, client)
}

fn handle_session_start() -> Result<()> {
    let (config, mut state, client) = event_context();

    dispatch(ShellEvent::SessionStart, &mut state, &client, &config);

    // Print the fresh id for the hook to export. On failure we print
    // nothing and exit 0: the shell stays usable either way.
    if let Some(id) = &state.session_id {
        println!("{}", id);
    }

    Ok(())
}

fn handle_preexec(args: &[String]) -> Result<()> {
    let command = join_trailing(args);
    if command.is_empty() {
        // Sometimes shell hooks call us with nothing. Just ignore it.
        return Ok(());
    }

    let (config, mut state, client) = event_context();

    dispatch(
        ShellEvent::PreExec { command },
        &mut state,
        &client,
        &config,
    );

    if let Some(id) = &state.history_id {
        println!("{}", id);
    }

    Ok(())
}

fn handle_postexec(args: &[String]) -> Result<()> {
    let mut exit_status = 0;

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--exit" {
            i += 1;
            if i < args.len() {
                exit_status = args[i].parse().unwrap_or(0);
            }
        }
        i += 1;
    }

    let (config, mut state, client) = event_context();
    dispatch(
        ShellEvent::PostExec { exit_status },
        &mut state,
        &client,
        &config,
    );

    Ok(())
}

fn handle_precmd() -> Result<()> {
    let (config, mut state, client) = event_context();

    let effects = dispatch(ShellEvent::Prompt, &mut state, &client, &config);

    if let Some(secs) = state.mark_unix_seconds() {
        println!("mark {}", secs);
    }
    if effects.contains(&Effect::MergeHistory) {
        println!("merge");
    }

    Ok(())
}

fn handle_search(args: &[String]) -> Result<()> {
    let mut context = UpKeyContext {
        cursor_line: 1,
        ..Default::default()
    };
    let mut extra_args = Vec::new();
    let mut buffer = String::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--line" => {
                i += 1;
                if i < args.len() {
                    context.cursor_line = args[i].parse().unwrap_or(1);
                }
            }
            "--search-mode" => context.search_mode = true,
            "--paging-mode" => context.paging_mode = true,
            "--" => {
                buffer = args[i + 1..].join(" ");
                break;
            }
            // Anything else is forwarded to the service's search call
            arg => extra_args.push(arg.to_string()),
        }
        i += 1;
    }

    let (config, mut state, client) = event_context();

    let effects = dispatch(
        ShellEvent::UpKey {
            buffer,
            context,
            extra_args,
        },
        &mut state,
        &client,
        &config,
    );

    print!("{}", render_search_directives(&effects));
    Ok(())
}

/// Turn search effects into the directive format the hook shims parse:
/// an action tag line, then the replacement buffer text (if any).
fn render_search_directives(effects: &[Effect]) -> String {
    let mut buffer_text: Option<&str> = None;
    let mut accept = false;

    for effect in effects {
        match effect {
            Effect::SetBuffer(text) => buffer_text = Some(text),
            Effect::AcceptLine => accept = true,
            Effect::NativeUpHistory => return "native-up-history\n".to_string(),
            Effect::NativeUpLine => return "native-up-line\n".to_string(),
            Effect::Redraw | Effect::MergeHistory => {}
        }
    }

    match (buffer_text, accept) {
        (Some(text), true) => format!("execute\n{}\n", text),
        (Some(text), false) => format!("replace\n{}\n", text),
        // Redraw-only: the shim repaints unconditionally.
        (None, _) => "noop\n".to_string(),
    }
}

fn handle_setup(args: &[String]) -> Result<()> {
    let installer = HookInstaller::new()?;

    let install_all = args.iter().any(|arg| arg == "--all");

    if install_all {
        println!("Installing hooks for all detected shells...\n");
        match installer.install_all() {
            Ok(shells) => {
                println!("Installed hooks for:");
                for shell in shells {
                    println!("  - {}", shell);
                }
                println!("\nRestart your shell to activate.");
            }
            Err(e) => {
                eprintln!("Setup failed: {}", e.user_message());
                return Err(e);
            }
        }
    } else {
        match installer.install_auto() {
            Ok(shell) => {
                println!("Detected shell: {}", shell);
                println!("Hook installed. Restart your shell to activate.");
            }
            Err(e) => {
                eprintln!("Setup failed: {}", e.user_message());
                eprintln!("Try `histhook setup --all` to install for every shell found.");
                return Err(e);
            }
        }
    }

    Ok(())
}

fn handle_uninstall() -> Result<()> {
    let installer = HookInstaller::new()?;

    for shell in Shell::ALL {
        match installer.uninstall(shell) {
            Ok(()) => println!("Uninstalled {} hook", shell),
            Err(e) => eprintln!("  (skipped {}: {})", shell, e),
        }
    }

    println!("\nNote: history data stays with the history service.");

    Ok(())
}

#[derive(Serialize)]
struct StatusReport {
    service: String,
    service_available: bool,
    session_active: bool,
    history_file: String,
    history_file_modified: Option<String>,
    state_dir: Option<String>,
    hooks: Vec<HookStatus>,
}

#[derive(Serialize)]
struct HookStatus {
    shell: String,
    installed: bool,
}

fn handle_status(args: &[String]) -> Result<()> {
    let config = Config::from_env();
    let state = SessionState::from_env();
    let client = ProcessClient::new(&config, state.session_id.clone());
    let installer = HookInstaller::new()?;

    let history_file_modified = std::fs::metadata(&config.history_file)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| {
            chrono::DateTime::<chrono::Local>::from(t)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        });

    let report = StatusReport {
        service: config.service_program.display().to_string(),
        service_available: client.is_available(),
        session_active: state.session_id.is_some(),
        history_file: config.history_file.display().to_string(),
        history_file_modified,
        state_dir: config.state_dir.as_ref().map(|p| p.display().to_string()),
        hooks: Shell::ALL
            .into_iter()
            .map(|shell| HookStatus {
                shell: shell.to_string(),
                installed: installer.is_installed(shell),
            })
            .collect(),
    };

    if args.iter().any(|arg| arg == "--json") {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|e| histhook_lib::HookError::Config(e.to_string()))?
        );
        return Ok(());
    }

    println!("\nhisthook status");
    println!("{}", "=".repeat(60));
    println!("  Service:      {}", report.service);
    println!(
        "  Available:    {}",
        if report.service_available { "yes" } else { "no" }
    );
    println!(
        "  Session:      {}",
        if report.session_active {
            "active"
        } else {
            "not started"
        }
    );
    println!("  History file: {}", report.history_file);
    if let Some(modified) = &report.history_file_modified {
        println!("  Last change:  {}", modified);
    }
    if let Some(state_dir) = &report.state_dir {
        println!("  State dir:    {}", state_dir);
    }

    println!("\nShell hooks:");
    for hook in &report.hooks {
        let mark = if hook.installed {
            "installed"
        } else {
            "not installed"
        };
        println!("  {:<6} {}", format!("{}:", hook.shell), mark);
    }

    println!("\nCurrent shell:");
    match ShellDetector::detect() {
        Ok(shell) => println!("  {}", shell),
        Err(_) => println!("  Unknown"),
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn handle_hook(args: &[String]) -> Result<()> {
    let name = match args.first() {
        Some(name) => name,
        None => {
            eprintln!("Usage: histhook hook <fish|zsh>");
            return Ok(());
        }
    };

    match Shell::from_name(name) {
        Some(shell) => {
            let installer = HookInstaller::new()?;
            print!("{}", installer.render(shell));
            Ok(())
        }
        None => {
            eprintln!("Unsupported shell: {}", name);
            Ok(())
        }
    }
}

/// Everything after an optional leading `--`, joined back together
fn join_trailing(args: &[String]) -> String {
    let rest = match args.first() {
        Some(first) if first == "--" => &args[1..],
        _ => args,
    };
    rest.join(" ").trim().to_string()
}

fn print_usage() {
    println!(
        r#"histhook v{} - shell hooks for an external history service

USAGE:
    histhook <COMMAND> [OPTIONS]

HOOK COMMANDS (called by the shell integration, not by hand):
    session-start          Coordinate startup sync, print a fresh session id
    preexec -- <command>   Start a history record, print its id
    postexec --exit <n>    End the in-flight record with an exit status
    precmd                 Check history freshness, print mark/merge directives
    search [opts] -- <buf> Up-key dispatch + interactive search directives

MANAGEMENT COMMANDS:
    setup [--all]          Install shell hooks
    uninstall              Remove shell hooks
    status [--json]        Show integration status
    hook <shell>           Print the rendered hook script for fish or zsh
    version                Show version
    help                   Show this help

ENVIRONMENT:
    HISTHOOK_SERVICE       History service binary (default: histd)
    HISTHOOK_STATE_DIR     Directory for the sync lock file
    HISTHOOK_HISTORY_FILE  History store watched for changes
    HISTHOOK_PRIVATE       Non-empty disables all recording
    HISTHOOK_LOG           Log filter (stderr only)

Run 'histhook setup' once; the hooks handle the rest automatically.
"#,
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_execute_directive() {
        let effects = vec![
            Effect::SetBuffer("foo".to_string()),
            Effect::AcceptLine,
            Effect::Redraw,
        ];
        assert_eq!(render_search_directives(&effects), "execute\nfoo\n");
    }

    #[test]
    fn test_render_replace_directive() {
        let effects = vec![Effect::SetBuffer("foo bar".to_string()), Effect::Redraw];
        assert_eq!(render_search_directives(&effects), "replace\nfoo bar\n");
    }

    #[test]
    fn test_render_noop_directive() {
        assert_eq!(render_search_directives(&[Effect::Redraw]), "noop\n");
    }

    #[test]
    fn test_render_native_directives() {
        assert_eq!(
            render_search_directives(&[Effect::NativeUpHistory]),
            "native-up-history\n"
        );
        assert_eq!(
            render_search_directives(&[Effect::NativeUpLine]),
            "native-up-line\n"
        );
    }

    #[test]
    fn test_join_trailing_strips_separator() {
        let args = vec!["--".to_string(), "git".to_string(), "status".to_string()];
        assert_eq!(join_trailing(&args), "git status");

        let args = vec!["ls".to_string()];
        assert_eq!(join_trailing(&args), "ls");

        assert_eq!(join_trailing(&[]), "");
    }
}
