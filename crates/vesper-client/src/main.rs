//! # vesper
//!
//! Line-oriented front-end for trying the messenger locally. Every user
//! registered here shares one in-process [`AppState`]; sent envelopes are
//! handed straight to the recipient's session when it exists, standing in
//! for a network transport.

use std::collections::HashMap;

use anyhow::bail;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use vesper_client::commands::{friends, identity, messaging, notifications};
use vesper_client::{init_tracing, AppState, ClientConfig, ClientError, Session, SharedState};
use vesper_shared::Username;
use vesper_store::{Decision, NotificationId};

const HELP: &str = "\
commands:
  register <name>        create a session and publish its key
  use <name>             switch the active session
  whoami                 show the active session
  users [query]          search the directory
  request <name>         send a friend request
  accept <name>          accept a pending request
  reject <name>          reject a pending request
  requests               list requests awaiting an answer
  send <name> <text>     encrypt and send a message
  chat <name>            show the conversation with <name>
  notes                  list notifications
  dismiss <id>           dismiss a notification
  logout                 end the active session
  quit";

struct Repl {
    state: SharedState,
    config: ClientConfig,
    sessions: HashMap<Username, Session>,
    active: Option<Username>,
}

impl Repl {
    fn active(&self) -> Result<&Session, String> {
        self.active
            .as_ref()
            .and_then(|name| self.sessions.get(name))
            .ok_or_else(|| "no active session (use `register <name>`)".to_string())
    }

    async fn dispatch(&mut self, line: &str) -> Result<bool, ClientError> {
        let mut parts = line.trim().splitn(3, ' ');
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            "register" => {
                let session = identity::register(&self.state, &self.config, arg).await?;
                let name = session.username().clone();
                println!(
                    "registered {name} ({})",
                    session.public_key().fingerprint()?
                );
                self.sessions.insert(name.clone(), session);
                self.active = Some(name);
            }
            "use" => match Username::parse(arg).filter(|n| self.sessions.contains_key(n)) {
                Some(name) => self.active = Some(name),
                None => println!("no local session named {arg:?}"),
            },
            "whoami" => match self.active() {
                Ok(session) => println!("{}", session.username()),
                Err(msg) => println!("{msg}"),
            },
            _ => {
                let session = match self.active() {
                    Ok(session) => session,
                    Err(msg) => {
                        println!("{msg}");
                        return Ok(true);
                    }
                };
                self.session_command(command, arg, rest, session).await?;
                if command == "logout" {
                    if let Some(name) = self.active.take() {
                        if let Some(session) = self.sessions.remove(&name) {
                            identity::logout(&self.state, session)?;
                            println!("logged out {name}");
                        }
                    }
                }
            }
        }
        Ok(true)
    }

    async fn session_command(
        &self,
        command: &str,
        arg: &str,
        rest: &str,
        session: &Session,
    ) -> Result<(), ClientError> {
        match command {
            "users" => {
                let query = [arg, rest].join(" ");
                for contact in friends::list_contacts(&self.state, session, &query)? {
                    println!(
                        "{:<16} {:<18} {:?}",
                        contact.username.as_str(),
                        contact.fingerprint.as_deref().unwrap_or("?"),
                        contact.status
                    );
                }
            }
            "request" => {
                friends::send_friend_request(&self.state, session, arg)?;
                println!("request sent to {arg}");
            }
            "accept" | "reject" => {
                let decision = if command == "accept" {
                    Decision::Accepted
                } else {
                    Decision::Rejected
                };
                let request = friends::respond_to_request(&self.state, session, arg, decision)?;
                println!("{} -> {}: {}", request.from, request.to, request.status);
            }
            "requests" => {
                for request in friends::pending_requests(&self.state, session)? {
                    println!("{} (since {})", request.from, request.created_at.format("%H:%M:%S"));
                }
            }
            "send" => {
                let sent = messaging::send_message(&self.state, session, arg, rest).await?;
                let wire = sent.envelope.to_bytes()?;
                println!("sent {} ({} bytes on the wire)", sent.message.id, wire.len());

                // Local delivery in place of a transport.
                if let Some(recipient) = self.sessions.get(&sent.envelope.recipient) {
                    let received = vesper_shared::Envelope::from_bytes(&wire)?;
                    let text = messaging::receive_message(&self.state, recipient, &received).await?;
                    println!("[{}] decrypted: {text}", recipient.username());
                }
            }
            "chat" => {
                for message in messaging::get_conversation(&self.state, session, arg)? {
                    println!(
                        "{} {}: {}",
                        message.created_at.format("%H:%M:%S"),
                        message.sender,
                        message.content
                    );
                }
            }
            "notes" => {
                for note in notifications::list_notifications(&self.state, session)? {
                    println!("#{} {}", note.id, note.text);
                }
            }
            "dismiss" => match arg.parse::<u64>() {
                Ok(id) => {
                    notifications::dismiss_notification(&self.state, session, NotificationId(id))?;
                }
                Err(_) => println!("usage: dismiss <id>"),
            },
            "logout" => {}
            other => println!("unknown command {other:?}; try `help`"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_tracing(&config);

    info!("Starting Vesper v{}", env!("CARGO_PKG_VERSION"));
    info!(?config, "Loaded configuration");

    let mut repl = Repl {
        state: AppState::from_config(&config).into_shared(),
        config,
        sessions: HashMap::new(),
        active: None,
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match repl.dispatch(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_fatal() => bail!(e),
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}
