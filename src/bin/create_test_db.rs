use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use tally_rs::{
    DebtKind, NewDebtTransaction, NewExpense, NewIncome, NewUser, UserID, create_expense,
    create_income, create_user, initialize_db, record_debt_transaction,
};

/// A utility for creating a test database for the REST API server of tally_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: "not a real hash".to_owned(),
            profile_image_url: None,
        },
        &conn,
    )?;
    println!("Created user with ID {}", user.id);

    let today = OffsetDateTime::now_utc().date();

    println!("Creating income and expenses...");
    create_sample_ledger(user.id, today, &conn)?;

    println!("Creating debt transactions...");
    create_sample_debts(user.id, today, &conn)?;

    println!("Success!");

    Ok(())
}

fn create_sample_ledger(user_id: UserID, today: Date, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let incomes = [
        ("Salary", 4200.0, 3, Some("💼")),
        ("Freelance", 650.0, 20, None),
        ("Salary", 4200.0, 33, Some("💼")),
        ("Gift", 100.0, 75, Some("🎁")),
    ];

    for (source, amount, days_ago, icon) in incomes {
        create_income(
            user_id,
            NewIncome {
                source: source.to_owned(),
                amount,
                date: today - Duration::days(days_ago),
                icon: icon.map(str::to_owned),
                description: None,
            },
            conn,
        )?;
    }

    let expenses = [
        ("Rent", 1800.0, 1, Some("🏠")),
        ("Groceries", 145.2, 4, Some("🛒")),
        ("Transport", 60.0, 12, None),
        ("Groceries", 132.8, 25, Some("🛒")),
        ("Rent", 1800.0, 31, Some("🏠")),
        ("Holiday", 900.0, 50, Some("✈️")),
    ];

    for (category, amount, days_ago, icon) in expenses {
        create_expense(
            user_id,
            NewExpense {
                category: category.to_owned(),
                amount,
                date: today - Duration::days(days_ago),
                icon: icon.map(str::to_owned),
                description: None,
            },
            conn,
        )?;
    }

    Ok(())
}

fn create_sample_debts(user_id: UserID, today: Date, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let debts = [
        ("Alex", DebtKind::Borrow, 500.0, 14, Some("Concert tickets")),
        ("Alex", DebtKind::Spent, 200.0, 7, None),
        ("Sam", DebtKind::Borrow, 45.0, 2, Some("Dinner")),
    ];

    for (name, kind, amount, days_ago, description) in debts {
        record_debt_transaction(
            user_id,
            name,
            NewDebtTransaction {
                kind,
                amount,
                date: today - Duration::days(days_ago),
                description: description.map(str::to_owned),
            },
            conn,
        )?;
    }

    Ok(())
}
