//! Interactive line-oriented dashboard over a running [`CoordinatorHandle`].

use super::rates::render_view;
use super::search::render_records;
use super::theme::theme_name;
use super::ui;
use crate::core::catalog;
use crate::core::coordinator::CoordinatorHandle;
use crate::core::session::SessionView;
use crate::core::theme::{Theme, ThemePreference};
use anyhow::{Result, bail};
use chrono::Utc;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  add <CODE|query>  track a currency (a query with a single match adds it)
  rm <CODE>         stop tracking a currency
  fav <CODE>        toggle a favorite (favorites are listed first)
  base <CODE>       change the base currency
  refresh           fetch the latest rates
  find [query]      search the currency catalog
  bases             list base currency choices
  dismiss           hide the current error
  theme             toggle dark mode
  list              show the dashboard again
  help              show this help
  quit              leave the dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardInput {
    Add(String),
    Remove(String),
    Favorite(String),
    Base(String),
    Refresh,
    Find(String),
    Bases,
    Dismiss,
    Theme,
    List,
    Help,
    Quit,
}

impl FromStr for DashboardInput {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let required = |usage: &str| -> Result<String> {
            if arg.is_empty() {
                bail!("Usage: {usage}");
            }
            Ok(arg.to_string())
        };

        let input = match command.to_lowercase().as_str() {
            "add" => DashboardInput::Add(required("add <CODE|query>")?),
            "rm" | "remove" => DashboardInput::Remove(required("rm <CODE>")?.to_uppercase()),
            "fav" | "favorite" => DashboardInput::Favorite(required("fav <CODE>")?.to_uppercase()),
            "base" => DashboardInput::Base(required("base <CODE>")?.to_uppercase()),
            "refresh" | "r" => DashboardInput::Refresh,
            "find" | "search" => DashboardInput::Find(arg.to_string()),
            "bases" => DashboardInput::Bases,
            "dismiss" => DashboardInput::Dismiss,
            "theme" => DashboardInput::Theme,
            "list" | "ls" => DashboardInput::List,
            "help" | "?" => DashboardInput::Help,
            "quit" | "exit" | "q" => DashboardInput::Quit,
            other => bail!("Unknown command: {other}. Type `help` for a list of commands."),
        };
        Ok(input)
    }
}

pub enum Step {
    Continue(String),
    Quit,
}

pub struct Dashboard<'a> {
    handle: CoordinatorHandle,
    preference: &'a ThemePreference,
    theme: Theme,
}

impl<'a> Dashboard<'a> {
    pub async fn new(handle: CoordinatorHandle, preference: &'a ThemePreference) -> Self {
        let theme = preference.theme().await;
        Self {
            handle,
            preference,
            theme,
        }
    }

    /// Gap-fills the startup list and renders the first screen.
    pub async fn start(&self) -> Result<String> {
        self.handle.start().await?;
        let view = self.settle().await?;
        Ok(self.render(&view))
    }

    pub async fn execute(&mut self, input: DashboardInput) -> Result<Step> {
        debug!(?input, "Dashboard command");
        let output = match input {
            DashboardInput::Add(query) => self.add(&query).await?,
            DashboardInput::Remove(code) => {
                if !self.is_tracked(&code) {
                    format!("{code} is not tracked.")
                } else {
                    let view = self.handle.remove_currency(&code).await?;
                    self.render(&view)
                }
            }
            DashboardInput::Favorite(code) => {
                if !self.is_tracked(&code) {
                    format!("{code} is not tracked.")
                } else {
                    let view = self.handle.toggle_favorite(&code).await?;
                    self.render(&view)
                }
            }
            DashboardInput::Base(code) => match catalog::lookup(&code) {
                Some(record) => {
                    self.handle.set_base_currency(record).await?;
                    let view = self.settle().await?;
                    self.render(&view)
                }
                None => format!("Unknown currency code: {code}"),
            },
            DashboardInput::Refresh => {
                self.handle.refresh().await?;
                let view = self.settle().await?;
                self.render(&view)
            }
            DashboardInput::Find(query) => render_records(&catalog::search(query.trim()), self.theme),
            DashboardInput::Bases => {
                let current = self.handle.view().base_currency_code;
                catalog::base_choices()
                    .iter()
                    .map(|record| {
                        let marker = if record.code == current { "*" } else { " " };
                        format!("{marker} {} {}  {}", record.emblem, record.code, record.name)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            DashboardInput::Dismiss => {
                let view = self.handle.dismiss_error().await?;
                self.render(&view)
            }
            DashboardInput::Theme => {
                self.theme = Theme::from_dark(self.preference.toggle().await?);
                format!(
                    "Theme: {}\n{}",
                    theme_name(self.theme),
                    self.render(&self.handle.view())
                )
            }
            DashboardInput::List => self.render(&self.handle.view()),
            DashboardInput::Help => HELP.to_string(),
            DashboardInput::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Continue(output))
    }

    async fn add(&self, query: &str) -> Result<String> {
        let code = query.trim().to_uppercase();
        let candidates = self.handle.add_candidates(query).await?;

        let record = match candidates.iter().find(|record| record.code == code) {
            Some(record) => *record,
            None if candidates.len() == 1 => candidates[0],
            None if candidates.is_empty() => {
                if catalog::lookup(&code).is_some() {
                    return Ok(format!("{code} is already tracked or is the base currency."));
                }
                return Ok(format!("No currencies available to add for '{query}'."));
            }
            None => {
                return Ok(format!(
                    "Several currencies match '{query}', add one by code:\n{}",
                    render_records(&candidates, self.theme)
                ));
            }
        };

        self.handle.add_currency(record).await?;
        let view = self.settle().await?;
        Ok(self.render(&view))
    }

    fn is_tracked(&self, code: &str) -> bool {
        self.handle
            .view()
            .currencies
            .iter()
            .any(|entry| entry.code() == code)
    }

    async fn settle(&self) -> Result<SessionView> {
        if !self.handle.view().is_loading {
            return self.handle.settled().await;
        }
        let spinner = ui::new_spinner("Fetching exchange rates...");
        let view = self.handle.settled().await;
        spinner.finish_and_clear();
        view
    }

    fn render(&self, view: &SessionView) -> String {
        render_view(view, self.theme, Utc::now())
    }
}

/// Runs the dashboard on stdin until `quit` or end of input.
pub async fn run(handle: CoordinatorHandle, preference: &ThemePreference) -> Result<()> {
    let mut dashboard = Dashboard::new(handle, preference).await;
    println!("{}", dashboard.start().await?);
    println!(
        "{}",
        ui::style_text("Type `help` for a list of commands.", ui::StyleType::Subtle)
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let input = match line.parse::<DashboardInput>() {
            Ok(input) => input,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };

        match dashboard.execute(input).await? {
            Step::Continue(output) => println!("{output}"),
            Step::Quit => break,
        }
    }
    Ok(())
}
