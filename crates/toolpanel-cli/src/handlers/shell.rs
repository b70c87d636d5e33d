//! Interactive panel session.
//!
//! Reads commands from stdin line by line while printing notifications as
//! they arrive. Connection operations run as background tasks so the
//! prompt stays responsive and several servers can be worked on at once.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use toolpanel_gui::{OperationOutcome, PanelBackend};

use crate::bootstrap::CliContext;
use crate::presentation::{render_notification, render_tools, render_view};

const HELP: &str = "\
Commands:
  open               open the panel (refresh now, then every poll interval)
  close              close the panel and stop polling
  list               show the panel
  toggle <server>    connect or disconnect a server
  refresh <server>   re-read a server's tools
  expand <server>    show or hide a server's tools
  tools <server>     print a server's tools
  mode <choice>      set tool choice: none, auto or manual
  help               show this help
  quit               leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open,
    Close,
    List,
    Toggle(String),
    Refresh(String),
    Expand(String),
    Tools(String),
    Mode(String),
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Empty);
        };
        let argument = words.next().map(str::to_string);
        if words.next().is_some() {
            return Err(format!("too many arguments for '{verb}'"));
        }

        let needs = |build: fn(String) -> Self| {
            argument
                .clone()
                .map(build)
                .ok_or_else(|| format!("'{verb}' needs an argument"))
        };

        match verb.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "list" | "ls" => Ok(Self::List),
            "toggle" => needs(Self::Toggle),
            "refresh" => needs(Self::Refresh),
            "expand" => needs(Self::Expand),
            "tools" => needs(Self::Tools),
            "mode" => needs(Self::Mode),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

fn describe(name: &str, outcome: &OperationOutcome) -> String {
    match outcome {
        OperationOutcome::Completed => format!("{name}: done"),
        OperationOutcome::Failed(_) => format!("{name}: failed"),
        OperationOutcome::Skipped => format!("{name}: busy, request ignored"),
    }
}

/// Run a connection operation in the background and report when it settles.
fn spawn_operation(backend: &Arc<PanelBackend>, name: String, refresh: bool) {
    let backend = Arc::clone(backend);
    tokio::spawn(async move {
        let report = if refresh {
            backend.refresh_tools(&name).await
        } else {
            backend.toggle_connection(&name).await
        };
        let outcome = report.settled().await;
        println!("{}", describe(&name, &outcome));
    });
}

/// Run the interactive shell until `quit` or end of input.
pub async fn execute(ctx: &mut CliContext) -> Result<()> {
    let backend = Arc::clone(&ctx.backend);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    backend.open().await;
    print!("{}", render_view(&backend.view()));

    loop {
        tokio::select! {
            Some(notification) = ctx.notifications.recv() => {
                println!("{}", render_notification(&notification));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match ShellCommand::parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                if !dispatch(&backend, command).await {
                    break;
                }
            }
        }
    }

    backend.shutdown().await;
    Ok(())
}

/// Apply one command. Returns `false` when the session should end.
async fn dispatch(backend: &Arc<PanelBackend>, command: ShellCommand) -> bool {
    match command {
        ShellCommand::Empty => {}
        ShellCommand::Open => {
            if !backend.open().await {
                println!("panel already open");
            }
            print!("{}", render_view(&backend.view()));
        }
        ShellCommand::Close => {
            if !backend.close().await {
                println!("panel already closed");
            }
        }
        ShellCommand::List => print!("{}", render_view(&backend.view())),
        ShellCommand::Toggle(name) => {
            println!("{name}: working...");
            spawn_operation(backend, name, false);
        }
        ShellCommand::Refresh(name) => {
            println!("{name}: refreshing tools...");
            spawn_operation(backend, name, true);
        }
        ShellCommand::Expand(name) => {
            backend.toggle_expansion(&name);
            print!("{}", render_view(&backend.view()));
        }
        ShellCommand::Tools(name) => match backend.server_tools(&name) {
            Ok(tools) => print!("{}", render_tools(&name, &tools)),
            Err(e) => println!("{e}"),
        },
        ShellCommand::Mode(input) => match backend.set_tool_choice_str(&input) {
            Ok(choice) => println!("tool choice: {choice}"),
            Err(e) => println!("{e}"),
        },
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use toolpanel_core::{ServerRecord, ToolChoice};
    use toolpanel_memory::ServerFixture;

    use crate::bootstrap::{PanelConfig, bootstrap};

    fn shell_backend() -> Arc<PanelBackend> {
        let config = PanelConfig {
            servers: vec![ServerFixture::new("fs").with_tool("read_file", "Read a file")],
            ..PanelConfig::default()
        };
        bootstrap(config).unwrap().backend
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("toggle fs"), Ok(ShellCommand::Toggle("fs".into())));
        assert_eq!(ShellCommand::parse("  LIST "), Ok(ShellCommand::List));
        assert_eq!(ShellCommand::parse(""), Ok(ShellCommand::Empty));
        assert_eq!(ShellCommand::parse("mode manual"), Ok(ShellCommand::Mode("manual".into())));
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("toggle").is_err());
        assert!(ShellCommand::parse("toggle a b").is_err());
        assert!(ShellCommand::parse("launch fs").is_err());
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(describe("fs", &OperationOutcome::Completed), "fs: done");
        assert_eq!(
            describe("fs", &OperationOutcome::Skipped),
            "fs: busy, request ignored"
        );
    }

    #[tokio::test]
    async fn test_dispatch_toggle_then_list() {
        let backend = shell_backend();
        let mut snapshots = backend.subscribe_snapshots();

        assert!(dispatch(&backend, ShellCommand::Toggle("fs".into())).await);

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                snapshots.changed().await.unwrap();
                if snapshots
                    .borrow_and_update()
                    .get("fs")
                    .is_some_and(ServerRecord::is_connected)
                {
                    break;
                }
            }
        })
        .await
        .unwrap();

        assert!(dispatch(&backend, ShellCommand::List).await);
        assert!(backend.view().row("fs").unwrap().is_connected());
    }

    #[tokio::test]
    async fn test_dispatch_open_close_and_expand() {
        let backend = shell_backend();

        assert!(dispatch(&backend, ShellCommand::Open).await);
        assert!(backend.is_polling());
        assert_eq!(backend.snapshot().len(), 1);

        assert!(dispatch(&backend, ShellCommand::Expand("fs".into())).await);
        assert!(backend.view().row("fs").unwrap().expanded);

        assert!(dispatch(&backend, ShellCommand::Close).await);
        assert!(!backend.is_polling());
    }

    #[tokio::test]
    async fn test_dispatch_mode_and_quit() {
        let backend = shell_backend();

        assert!(dispatch(&backend, ShellCommand::Mode("manual".into())).await);
        assert_eq!(backend.tool_choice(), ToolChoice::Manual);

        assert!(dispatch(&backend, ShellCommand::Mode("sometimes".into())).await);
        assert_eq!(backend.tool_choice(), ToolChoice::Manual);

        assert!(!dispatch(&backend, ShellCommand::Quit).await);
    }
}
