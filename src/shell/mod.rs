//! Interactive command interpreter
//!
//! A tree of line-oriented menus, one per resource kind. Each menu
//! offers a fixed verb set; a handler validates its argument count,
//! builds a JSON payload, issues the HTTP call, and pretty-prints the
//! JSON response or the failing status code. Menus nest: `back` leaves
//! the current menu, `exit` leaves the program, and sub-resources are
//! reached by entering a child menu bound to the parent's identifier.

pub mod events;
pub mod storage;
pub mod telemetry;

use crate::client::ApiResponse;
use crate::error::{Error, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

// =============================================================================
// Menu Dispatch
// =============================================================================

/// What the shell loop does after a command completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Stay in the current menu.
    Continue,
    /// Leave the current menu.
    Back,
    /// Leave the program.
    Exit,
}

/// One interactive menu over a fixed verb set.
pub trait Menu {
    /// Prompt string, e.g. `(nnf)(storage pool)`.
    fn prompt(&self) -> String;

    /// One-line intro printed when the menu is entered.
    fn intro(&self) -> &str;

    /// Verb table for `help`: `(verb, description)`.
    fn verbs(&self) -> &'static [(&'static str, &'static str)];

    /// Handle one verb. Usage and HTTP errors are printed by the loop
    /// and return control to the prompt. The editor is passed through
    /// so a verb can enter a nested menu.
    async fn dispatch(
        &self,
        editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow>;
}

/// Drive a menu until it yields `Back` or `Exit`. `Exit` propagates
/// through nested menus; `Back` is consumed by the caller's loop.
pub async fn run_menu<M: Menu>(editor: &mut DefaultEditor, menu: &M) -> Result<Flow> {
    println!("{}", menu.intro());
    let prompt = format!("{} ", menu.prompt());

    loop {
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Flow::Exit),
            Err(e) => return Err(e.into()),
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = tokens.split_first() else {
            continue;
        };
        let _ = editor.add_history_entry(line.as_str());

        match *verb {
            "help" | "?" => print_help(menu),
            "back" => return Ok(Flow::Back),
            "exit" | "quit" => return Ok(Flow::Exit),
            _ => match menu.dispatch(editor, *verb, args).await {
                Ok(Flow::Continue) => {}
                Ok(flow) => return Ok(flow),
                // Malformed arguments or a failed request abort the
                // command; the shell returns to the prompt.
                Err(e) => println!("*** {e}"),
            },
        }
    }
}

fn print_help<M: Menu>(menu: &M) {
    for (verb, description) in menu.verbs() {
        println!("{verb:<10} {description}");
    }
    println!("{:<10} {}", "back", "Leave this menu");
    println!("{:<10} {}", "exit", "Leave the program");
}

// =============================================================================
// Response Handling
// =============================================================================

/// Pretty-print a 2xx JSON body, or report the failing status code.
pub fn handle_response(response: &ApiResponse) {
    if response.ok() {
        if let Some(body) = response.json() {
            println!("{}", pretty(body));
        }
    } else {
        println!("Error: {}", response.status());
    }
}

/// Render JSON with 4-space indentation.
pub fn pretty(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    if serde::Serialize::serialize(value, &mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

/// Validate a fixed argument count, returning the usage line otherwise.
pub fn require(args: &[&str], count: usize, usage: &'static str) -> Result<()> {
    if args.len() < count {
        return Err(Error::Usage(usage));
    }
    Ok(())
}

/// Print the greeting after the initial service-root probe.
pub async fn probe(conn: &crate::client::Connection) {
    if let Ok(response) = conn.get("").await {
        if response.ok() {
            println!("Connection Established. Starting Program...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_indents_four_spaces() {
        let rendered = pretty(&json!({"Id": "0"}));
        assert_eq!(rendered, "{\n    \"Id\": \"0\"\n}");
    }

    #[test]
    fn test_require_counts() {
        assert!(require(&["a", "b"], 2, "x").is_ok());
        let err = require(&["a"], 2, "create [POOL] [ENDPOINT]").unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
