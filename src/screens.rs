//! Terminal rendition of the request and result screens.
//!
//! Each screen reads one line at a time and maps it to an [`Action`]
//! through a small command table. Only the handoff slot carries state
//! from one screen to the next.

use std::io::{self, Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::consts::REVEAL_INTERVAL;
use crate::presenter::image::{is_data_uri, placeholder_image};
use crate::presenter::reveal::TextReveal;
use crate::presenter::share::Notice;
use crate::presenter::{LoadOutcome, Presenter, RenderedQuote};
use crate::quote::{Category, QuoteResult};
use crate::requester::Requester;
use crate::spinner::Spinner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Request,
    Result,
}

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Toggle(Category),
    Generate,
    Share,
    NewQuote,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Generate,
    Share,
    NewQuote,
    Help,
    Quit,
}

/// A built-in command definition.
struct Command {
    name: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    /// Screen the command belongs to, `None` for both.
    screen: Option<Screen>,
    kind: Kind,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "go",
        aliases: &["g", "generate", ""],
        description: "get today's quote (or just press enter)",
        screen: Some(Screen::Request),
        kind: Kind::Generate,
    },
    Command {
        name: "share",
        aliases: &["s", "copy"],
        description: "share the quote or copy it to the clipboard",
        screen: Some(Screen::Result),
        kind: Kind::Share,
    },
    Command {
        name: "new",
        aliases: &["n", "again"],
        description: "back to the request screen for a new quote",
        screen: Some(Screen::Result),
        kind: Kind::NewQuote,
    },
    Command {
        name: "/help",
        aliases: &["/h", "/?"],
        description: "show this help",
        screen: None,
        kind: Kind::Help,
    },
    Command {
        name: "/quit",
        aliases: &["quit", "exit", "/exit"],
        description: "exit",
        screen: None,
        kind: Kind::Quit,
    },
];

fn commands_for(screen: Screen) -> impl Iterator<Item = &'static Command> {
    COMMANDS
        .iter()
        .filter(move |c| c.screen.is_none() || c.screen == Some(screen))
}

/// Map a line of input on `screen` to an action.
pub fn parse_action(screen: Screen, input: &str) -> Action {
    let input = input.trim();

    for command in commands_for(screen) {
        if input == command.name || command.aliases.contains(&input) {
            return match command.kind {
                Kind::Generate => Action::Generate,
                Kind::Share => Action::Share,
                Kind::NewQuote => Action::NewQuote,
                Kind::Help => Action::Help,
                Kind::Quit => Action::Quit,
            };
        }
    }

    if screen == Screen::Request
        && let Ok(category) = input.parse::<Category>()
    {
        return Action::Toggle(category);
    }

    Action::Unknown(input.to_string())
}

pub fn help_text(screen: Screen) -> String {
    let name = |c: &Command| {
        let aliases: Vec<&str> = c.aliases.iter().copied().filter(|a| !a.is_empty()).collect();
        if aliases.is_empty() {
            c.name.to_string()
        } else {
            format!("{} ({})", c.name, aliases.join(", "))
        }
    };
    let max_width = commands_for(screen).map(|c| name(c).len()).max().unwrap_or(10);

    let mut out = String::new();
    if screen == Screen::Request {
        let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        out.push_str(&format!("  {:<max_width$}  toggle a category\n", "<category>"));
        out.push_str(&format!("  {:<max_width$}  ({})\n", "", categories.join(", ")));
    }
    for command in commands_for(screen) {
        out.push_str(&format!("  {:<max_width$}  {}\n", name(command), command.description));
    }
    out
}

/// Blocking error dialog shown when a generate action fails.
pub fn error_dialog(message: &str) -> String {
    format!("An error occurred:\n{message}\n\nPlease try again in a moment.")
}

/// One-line description of an image source.
pub fn describe_image(src: &str) -> String {
    if src == placeholder_image() {
        "🐱 (placeholder cat)".to_string()
    } else if is_data_uri(src) {
        format!("🖼  inline image ({} bytes)", src.len())
    } else {
        format!("🖼  {src}")
    }
}

pub fn request_screen_text(requester: &Requester) -> String {
    let mut out = String::from("\nHow are you feeling today? Pick a category, or none for any.\n\n");
    for category in Category::ALL {
        let marker = if requester.selection().is_selected(category) {
            "●"
        } else {
            "○"
        };
        out.push_str(&format!(
            "  {marker} {:<11} {}\n",
            category.as_str(),
            category.tagline()
        ));
    }
    out
}

/// Everything on the result screen except the quote text itself.
pub fn result_header(view: &RenderedQuote) -> String {
    format!("\n{}\n", describe_image(&view.image))
}

pub fn result_footer(view: &RenderedQuote) -> String {
    let mut out = String::new();
    if !view.author_line.is_empty() {
        out.push_str(&format!("  {}\n", view.author_line));
    }
    if let Some(ts) = &view.timestamp {
        out.push_str(&format!("  {ts}\n"));
    }
    out
}

pub fn format_notice(notice: &Notice) -> String {
    format!("{} {}", notice.icon(), notice.message)
}

/// Run one generate action with the busy indicator up.
/// Prints the error dialog and returns `None` on failure.
pub async fn run_request(requester: &mut Requester) -> Option<QuoteResult> {
    let spinner = Spinner::start(requester.selection().current());
    let result = requester.generate().await;
    spinner.stop().await;

    match result {
        Ok(quote) => Some(quote),
        Err(e) => {
            eprintln!("\n{}", error_dialog(&e.to_string()));
            None
        }
    }
}

/// Print a view without animation.
pub fn print_view(view: &RenderedQuote) {
    print!("{}", result_header(view));
    println!("  {}", view.quote_text);
    print!("{}", result_footer(view));
}

type InputLines = Lines<BufReader<Stdin>>;

/// Next line of input. `None` on EOF, read error, or Ctrl+C.
async fn next_input(lines: &mut InputLines) -> Option<String> {
    tokio::select! {
        result = lines.next_line() => match result {
            Ok(Some(line)) => Some(line),
            Ok(None) => None,
            Err(e) => {
                eprintln!("input error: {e}");
                None
            }
        },
        _ = tokio::signal::ctrl_c() => None,
    }
}

/// What happened while the result screen was being shown.
enum Shown {
    /// Fully shown, waiting for input.
    Ready,
    /// The user typed something before the reveal finished.
    Interrupted(String),
    /// Input closed.
    Closed,
    /// Redirected back to the request screen.
    Redirected,
}

/// An interactive session: one terminal standing in for one browser tab.
pub struct Session {
    requester: Requester,
    presenter: Presenter,
    animate: bool,
    screen: Screen,
}

impl Session {
    pub fn new(requester: Requester, presenter: Presenter, animate: bool) -> Self {
        Self {
            requester,
            presenter,
            animate,
            screen: Screen::Request,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let pending = match self.screen {
                Screen::Request => {
                    print!("{}", request_screen_text(&self.requester));
                    None
                }
                Screen::Result => match self.show_result(&mut lines).await? {
                    Shown::Ready => None,
                    Shown::Interrupted(line) => Some(line),
                    Shown::Closed => break,
                    Shown::Redirected => {
                        self.screen = Screen::Request;
                        continue;
                    }
                },
            };

            let line = match pending {
                Some(line) => line,
                None => {
                    print!("\nmeow> ");
                    io::stdout().flush()?;
                    match next_input(&mut lines).await {
                        Some(line) => line,
                        None => {
                            println!();
                            break;
                        }
                    }
                }
            };

            if !self.handle(parse_action(self.screen, &line)).await? {
                break;
            }
        }
        Ok(())
    }

    async fn show_result(&mut self, lines: &mut InputLines) -> Result<Shown> {
        let view = match self.presenter.load().await? {
            LoadOutcome::Render(view) => view,
            LoadOutcome::Redirect { after } => {
                println!("\nNo quote yet, heading back to the request screen...");
                tokio::time::sleep(after).await;
                return Ok(Shown::Redirected);
            }
            LoadOutcome::Failed {
                view,
                redirect_after,
            } => {
                print_view(&view);
                tokio::time::sleep(redirect_after).await;
                return Ok(Shown::Redirected);
            }
        };

        if !(self.animate && view.animate) {
            print_view(&view);
            println!("\n  [share] [new] [/quit]");
            return Ok(Shown::Ready);
        }

        print!("{}  ", result_header(&view));
        io::stdout().flush()?;
        let mut reveal = TextReveal::start(&view.quote_text, REVEAL_INTERVAL);

        let shown = tokio::select! {
            _ = reveal.done() => Shown::Ready,
            line = next_input(lines) => match line {
                Some(line) => Shown::Interrupted(line),
                None => Shown::Closed,
            },
        };
        reveal.finish().await;

        print!("{}", result_footer(&view));
        println!("\n  [share] [new] [/quit]");
        Ok(shown)
    }

    /// Apply an action. Returns false when the session should end.
    pub async fn handle(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Toggle(category) => self.requester.click_category(category),
            Action::Generate => {
                if run_request(&mut self.requester).await.is_some() {
                    self.screen = Screen::Result;
                }
            }
            Action::Share => {
                if let Some(notice) = self.presenter.share().await {
                    println!("{}", format_notice(&notice));
                }
            }
            Action::NewQuote => {
                self.presenter.new_quote()?;
                self.screen = Screen::Request;
            }
            Action::Help => print!("{}", help_text(self.screen)),
            Action::Quit => return Ok(false),
            Action::Unknown(input) => {
                println!("unknown command: {input}");
                println!("type /help for available commands");
            }
        }
        Ok(true)
    }
}
