//! Event service menu
//!
//! List and fetch events and event subscriptions, and subscribe to the
//! event stream with a local push-delivery listener.

use crate::client::{model, Connection, ResourceCollection};
use crate::error::Result;
use crate::events::{render_line, run_listener};
use rustyline::DefaultEditor;
use std::net::SocketAddr;

use super::{handle_response, pretty, probe, require, run_menu, Flow, Menu};

/// Run the event-service shell against the controller.
pub async fn run(conn: &Connection, bind: SocketAddr) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    probe(conn).await;
    run_menu(&mut editor, &EventMenu { conn, bind }).await?;
    Ok(())
}

struct EventMenu<'a> {
    conn: &'a Connection,
    /// Push listener bind address used by `sub`.
    bind: SocketAddr,
}

impl EventMenu<'_> {
    /// Fetch every member of the event collection and print each one.
    async fn get_all_events(&self, human: bool) -> Result<()> {
        let response = self.conn.get("/Events").await?;
        if !response.ok() {
            println!("Failed to retrieve response");
            return Ok(());
        }

        let collection: ResourceCollection = response.parse()?;
        for member in &collection.members {
            let id = member.id();
            let event = self.conn.get(&format!("/Events/{id}")).await?;
            if !event.ok() {
                println!("!!! Failed to retrieve event {id} !!!");
                return Ok(());
            }
            if human {
                println!("{}", render_line(&event.parse()?));
            } else if let Some(body) = event.json() {
                println!("{}", pretty(body));
            }
        }
        Ok(())
    }

    /// Subscribe the local listener to the event stream, then serve
    /// push deliveries until interrupted.
    async fn subscribe(&self) -> Result<()> {
        let destination = format!("http://{}/", self.bind);
        let response = self
            .conn
            .post("/Subscriptions", model::subscription(&destination))
            .await?;
        handle_response(&response);
        if !response.ok() {
            return Ok(());
        }
        run_listener(self.bind).await
    }
}

impl Menu for EventMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)".into()
    }

    fn intro(&self) -> &str {
        "Get/List/Subscribe to Events"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("list", "List Events"),
            ("get", "Get Event [EVENT ID] or [--all] [-H]"),
            ("list-subs", "List Event Subscriptions"),
            ("get-sub", "Get Event Subscription [SUBSCRIPTION ID]"),
            ("sub", "Subscribe to the Event Stream via a local listener"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "list" => {
                let response = self.conn.get("/Events").await?;
                handle_response(&response);
            }
            "get" => {
                let human = args.contains(&"-H") || args.contains(&"--human-readable");
                if args.contains(&"all") || args.contains(&"--all") {
                    self.get_all_events(human).await?;
                } else {
                    require(args, 1, "get [EVENT ID] or [--all] [-H]")?;
                    let response = self.conn.get(&format!("/Events/{}", args[0])).await?;
                    handle_response(&response);
                }
            }
            "list-subs" => {
                let response = self.conn.get("/Subscriptions").await?;
                handle_response(&response);
            }
            "get-sub" => {
                require(args, 1, "get-sub [SUBSCRIPTION ID]")?;
                let response = self.conn.get(&format!("/Subscriptions/{}", args[0])).await?;
                handle_response(&response);
            }
            "sub" => self.subscribe().await?,
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}
