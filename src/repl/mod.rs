//! # Headless Browser
//!
//! A line-oriented front end over [`Navigator`]. Each input line is one
//! user gesture; the content region is printed as wrapped text.
//!
//! ```text
//! stdin line ─► Command::parse ─► Navigator op ─► render ─► stdout
//!                                      │
//!                                      └─ full navigation pending? follow it
//! ```

pub mod command;
pub mod render;

use std::io;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{FieldValue, FilePart};
use crate::core::Navigator;
use command::{Command, HELP};
use render::{DEFAULT_WIDTH, list_interactive, wrap};

/// Runs the browser until `quit` or end of input.
pub async fn run(nav: Navigator, host_default: Option<String>) -> io::Result<()> {
    let outcome = nav.start(host_default.as_deref()).await;
    info!("Initial load: {:?}", outcome);
    print_page(&nav);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&nav);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(command::ParseError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        execute(&nav, command).await;

        if let Some(target) = nav.full_navigation() {
            println!("-> {target}");
            nav.follow_full_navigation(host_default.as_deref()).await;
            print_page(&nav);
        }
    }

    info!("Browser closed at {}", nav.location());
    Ok(())
}

async fn execute(nav: &Navigator, command: Command) {
    match command {
        Command::Go(page) => {
            nav.load_page(page.as_deref()).await;
            print_page(nav);
        }
        Command::Back => {
            nav.back().await;
            print_page(nav);
        }
        Command::Forward => {
            nav.forward().await;
            print_page(nav);
        }
        Command::Hash(fragment) => {
            let url = with_fragment(&nav.location(), &fragment);
            if nav.edit_hash(&url).await.is_empty() {
                println!("(address changed, page unchanged)");
            } else {
                print_page(nav);
            }
        }
        Command::List => {
            let lines = nav.with_document(|doc| list_interactive(doc, &nav.settings().tabs));
            if lines.is_empty() {
                println!("(nothing interactive)");
            }
            for line in lines {
                println!("{line}");
            }
        }
        Command::Click(node) => {
            let before = nav.content();
            if nav.click(node).await == 0 {
                println!("{node}: nothing happens");
            } else if nav.content() != before {
                print_page(nav);
            }
        }
        Command::Fill { form, name, value } => {
            let set = nav.with_document(|doc| doc.set_field(form, &name, FieldValue::Text(value)));
            if !set {
                println!("{form} has no field '{name}'");
            }
        }
        Command::Attach { form, name, path } => match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file = FilePart {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    content_type: None,
                    bytes,
                };
                let set = nav.with_document(|doc| doc.set_field(form, &name, FieldValue::File(file)));
                if !set {
                    println!("{form} has no field '{name}'");
                }
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                println!("cannot read {}: {e}", path.display());
            }
        },
        Command::Submit(form) => {
            if nav.submit(form).await == 0 {
                println!("{form}: not a bound form");
            } else {
                print_page(nav);
            }
        }
        Command::Show => print_page(nav),
        Command::Where => {
            let page = nav
                .current_page()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}  page={}  history={}  locator={}",
                nav.location(),
                page,
                nav.history_len(),
                nav.locator_name()
            );
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// `location` with its fragment replaced by `fragment`.
fn with_fragment(location: &str, fragment: &str) -> String {
    let base = location.split('#').next().unwrap_or("");
    let fragment = fragment.trim_start_matches('#');
    format!("{base}#{fragment}")
}

fn print_page(nav: &Navigator) {
    println!();
    println!("{}", wrap(&nav.text_content(), DEFAULT_WIDTH));
    println!();
}

fn print_prompt(nav: &Navigator) {
    use std::io::Write;
    print!("{}> ", nav.location());
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_fragment() {
        assert_eq!(with_fragment("/#/index", "#/login"), "/#/login");
        assert_eq!(with_fragment("/course/3", "top"), "/course/3#top");
        assert_eq!(with_fragment("/", "#/wishlist"), "/#/wishlist");
    }
}
