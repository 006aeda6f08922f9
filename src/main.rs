mod budget;
mod charts;
mod cli;
mod dashboard;
mod db;
mod error;
mod fmt;
mod models;
mod settings;
mod store;

use clap::{CommandFactory, Parser};

use cli::{BudgetCommands, CartCommands, Cli, Commands, ItemCommands, ReportCommands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Cart { command } => match command {
            CartCommands::Add { name, notes } => cli::carts::add(&name, notes.as_deref()),
            CartCommands::List { query } => cli::carts::list(query.as_deref()),
            CartCommands::Edit { cart, name, notes } => {
                cli::carts::edit(&cart, name.as_deref(), notes.as_deref())
            }
            CartCommands::Delete { cart } => cli::carts::delete(&cart),
            CartCommands::Move { cart, to } => cli::carts::move_to(&cart, to),
        },
        Commands::Item { command } => match command {
            ItemCommands::Add {
                name,
                cart,
                price,
                quantity,
                notes,
            } => cli::items::add(&cart, &name, price, quantity, notes.as_deref()),
            ItemCommands::List { cart, query } => cli::items::list(&cart, query.as_deref()),
            ItemCommands::Edit {
                id,
                name,
                notes,
                price,
            } => cli::items::edit(id, name.as_deref(), notes.as_deref(), price),
            ItemCommands::Toggle { id } => cli::items::toggle(id),
            ItemCommands::Qty { id, quantity } => cli::items::quantity(id, quantity),
            ItemCommands::Delete { id } => cli::items::delete(id),
        },
        Commands::Budget { command } => match command {
            BudgetCommands::Show => cli::budget::show(),
            BudgetCommands::Set { amount } => cli::budget::set(amount),
            BudgetCommands::Mode { mode } => cli::budget::mode(&mode),
        },
        Commands::Status => cli::status::run(),
        Commands::Report { command } => match command {
            ReportCommands::Spending { range, sort } => cli::report::spending(range, sort),
            ReportCommands::Carts { range, sort } => cli::report::carts(range, sort),
            ReportCommands::TopCarts => cli::report::top_carts(),
        },
        Commands::Demo => cli::demo::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kartstopper", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        log::debug!("command failed: {e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
