use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{Session, SubmitError, submit};
use crate::ai::prompt::{ASSISTANT_NAME, PAGE_TITLE};
use crate::core::AppConfig;
use crate::gemini::GeminiClient;

#[derive(Debug, PartialEq)]
enum Input<'a> {
    Quit,
    Reset,
    Rename(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        _ if line == "/quit" || line == "/exit" => Input::Quit,
        _ if line == "/reset" => Input::Reset,
        Some(("/name", name)) => Input::Rename(name.trim()),
        _ if line == "/name" => Input::Rename(""),
        _ => Input::Message(line),
    }
}

pub async fn run(config: AppConfig, name: Option<String>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let client = GeminiClient::from_config(&config);
    let mut session = Session::init(&client);
    if let Some(name) = name {
        session.rename(&name);
    }

    println!("{}", PAGE_TITLE);
    println!("Commands: /name <your name>, /reset to clear the chat, /quit to leave\n");

    loop {
        let readline = rl.readline(&format!("👤 {}: ", session.display_name()));
        match readline {
            Ok(line) => match parse_input(&line) {
                Input::Quit => break,
                Input::Reset => {
                    session.reset(&client);
                    println!("🗑️ Chat history cleared.");
                }
                Input::Rename(name) => {
                    session.rename(name);
                    println!("Hello, {}!", session.display_name());
                }
                Input::Message(text) => {
                    let _ = rl.add_history_entry(text);
                    println!("{} is thinking...", ASSISTANT_NAME);
                    match submit(&mut session, text).await {
                        Ok(reply) => println!("🩺 {}: {}\n", ASSISTANT_NAME, reply.text()),
                        Err(SubmitError::EmptyMessage) => continue,
                        Err(e) => println!("{}", e),
                    }
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("  /exit "), Input::Quit);
        assert_eq!(parse_input("/reset"), Input::Reset);
        assert_eq!(parse_input("/name  Ada Lovelace "), Input::Rename("Ada Lovelace"));
        assert_eq!(parse_input("/name"), Input::Rename(""));
    }

    #[test]
    fn everything_else_is_a_message() {
        assert_eq!(
            parse_input("What is a fever?\n"),
            Input::Message("What is a fever?")
        );
        assert_eq!(parse_input("/reset please"), Input::Message("/reset please"));
        assert_eq!(parse_input(""), Input::Message(""));
    }
}
