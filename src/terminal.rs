//! Line-oriented terminal front end: command parsing and page rendering.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::str::FromStr;

use log::error;

use crate::model::{ImageRef, Recipe};
use crate::session::{Action, PageDisplay, PageView};

pub const HELP: &str = "\
Commands:
  n, next            next page
  p, prev            previous page
  f, first           first page
  l, last            last page
  s, search <text>   show recipes whose name, ingredients or description contain <text>
  r, reset           clear the search
  v, view <number>   show a recipe in full
  h, help            show this help
  q, quit            exit";

const RULE: &str = "----------------------------------------";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Action),
    /// Show details for a 1-based catalog number
    View(usize),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Command::Navigate(Action::Next)),
            "p" | "prev" | "previous" => Ok(Command::Navigate(Action::Previous)),
            "f" | "first" => Ok(Command::Navigate(Action::First)),
            "l" | "last" => Ok(Command::Navigate(Action::Last)),
            "s" | "search" => Ok(Command::Navigate(Action::Search(rest.to_string()))),
            "r" | "reset" => Ok(Command::Navigate(Action::Reset)),
            "v" | "view" => rest
                .parse::<usize>()
                .ok()
                .filter(|&number| number > 0)
                .map(Command::View)
                .ok_or_else(|| format!("Expected a recipe number after '{}'", word)),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "" => Err("Empty command".to_string()),
            other => Err(format!("Unknown command '{}'", other)),
        }
    }
}

/// Renders pages as text cards
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_page(&mut self, view: &PageView<'_>) -> io::Result<()> {
        writeln!(self.out)?;
        match view.keyword {
            Some(keyword) => writeln!(self.out, "Recipes matching \"{}\"", keyword)?,
            None => writeln!(self.out, "Recipes")?,
        }

        if view.entries.is_empty() {
            match view.keyword {
                Some(keyword) => writeln!(self.out, "No recipes match \"{}\".", keyword)?,
                None => writeln!(self.out, "No recipes loaded.")?,
            }
        }

        for (index, recipe) in &view.entries {
            writeln!(self.out, "{}", RULE)?;
            writeln!(self.out, "Recipe #: {}", index + 1)?;
            writeln!(self.out, "Name: {}", recipe.name())?;
            writeln!(self.out, "Cook Time: {}", recipe.cook_time())?;
            writeln!(self.out, "Prep Time: {}", recipe.prep_time())?;
            writeln!(self.out, "Image: {}", image_label(recipe.image()))?;
        }
        writeln!(self.out, "{}", RULE)?;

        if !view.entries.is_empty() {
            let last_ordinal = view.first_ordinal + view.entries.len() - 1;
            writeln!(
                self.out,
                "Showing {}-{} of {} | Page {} of {}",
                view.first_ordinal, last_ordinal, view.active_len, view.page_number, view.page_count
            )?;
        }
        for failure in view.image_failures {
            writeln!(
                self.out,
                "Could not download image for recipe #{}: {}",
                failure.catalog_index + 1,
                failure.error
            )?;
        }
        writeln!(self.out, "{}", controls(view))?;
        self.out.flush()
    }
}

impl<W: Write> PageDisplay for TerminalDisplay<W> {
    fn render(&mut self, view: &PageView<'_>) {
        if let Err(e) = self.write_page(view) {
            error!("Failed to render page: {}", e);
        }
    }
}

/// Full description of a recipe, shown by the `view` command
pub fn describe_recipe(number: usize, recipe: &Recipe) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(text, "Recipe #: {}", number);
    let _ = writeln!(text, "Name: {}", recipe.name());
    let _ = writeln!(text, "Yield: {}", recipe.recipe_yield());
    let _ = writeln!(text, "Cook Time: {}", recipe.cook_time());
    let _ = writeln!(text, "Prep Time: {}", recipe.prep_time());
    let _ = writeln!(text, "Image: {}", image_label(recipe.image()));
    let _ = writeln!(text, "Ingredients:");
    for ingredient in recipe.ingredients() {
        let _ = writeln!(text, "  - {}", ingredient);
    }
    let _ = writeln!(text, "Description:");
    let _ = write!(text, "  {}", recipe.description());
    text
}

fn image_label(image: &ImageRef) -> String {
    match image {
        ImageRef::Local(path) => path.display().to_string(),
        ImageRef::Remote(_) => "[no image]".to_string(),
    }
}

fn controls(view: &PageView<'_>) -> String {
    let mut keys = Vec::new();
    if view.has_previous {
        keys.push("[f]irst");
        keys.push("[p]rev");
    }
    if view.has_next {
        keys.push("[n]ext");
        keys.push("[l]ast");
    }
    keys.push("[s]earch");
    if view.keyword.is_some() {
        keys.push("[r]eset");
    }
    keys.extend(["[v]iew", "[h]elp", "[q]uit"]);
    keys.join(" ")
}
