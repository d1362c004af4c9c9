use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::info;

use recipe_navigator::terminal::{describe_recipe, Command, TerminalDisplay, HELP};
use recipe_navigator::{load_recipes, BrowseSession, HttpImageFetcher, NavigatorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = NavigatorConfig::load()?;

    // A path on the command line wins over the configured feed
    let recipes_file = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.recipes_file.clone());

    let report = load_recipes(&recipes_file)?;
    info!(
        "{} recipes available, {} skipped",
        report.recipes.len(),
        report.skipped.len()
    );

    let fetcher = HttpImageFetcher::new(Some(config.timeout()), &config.user_agent)?;
    let mut session = BrowseSession::builder()
        .recipes(report.recipes)
        .config(&config)
        .fetcher(fetcher)
        .display(TerminalDisplay::stdout())
        .build()?;

    session.start();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Navigate(action)) => {
                session.apply(action);
            }
            Ok(Command::View(number)) => match session.recipe(number - 1) {
                Some(recipe) => writeln!(stdout, "{}", describe_recipe(number, recipe))?,
                None => writeln!(stdout, "No recipe #{}", number)?,
            },
            Ok(Command::Help) => writeln!(stdout, "{}", HELP)?,
            Ok(Command::Quit) => break,
            Err(e) => writeln!(stdout, "{}\n{}", e, HELP)?,
        }
    }

    Ok(())
}
