//! Lockstep Ledger - interactive console
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────┐    ┌───────────┐
//! │  stdin   │───▶│  Ledger  │───▶│ Coordinator │───▶│ Accounts  │
//! │  (menu)  │    │(services)│    │(ordered lock│    │ (Decimal) │
//! └──────────┘    └──────────┘    └─────────────┘    └───────────┘
//! ```
//!
//! Flags: `--env <name>` / `-e <name>` selects `config/<name>.yaml`
//! (default `dev`).

use std::io::{self, BufRead, Write};

use lockstep_ledger::money::{format_currency, parse_amount};
use lockstep_ledger::{AppConfig, Ledger, LedgerError, TransferOutcome, WithdrawOutcome};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    CreateAccount,
    DepositMoney,
    WithdrawMoney,
    CheckBalance,
    TransferMoney,
    Exit,
}

impl MenuOption {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u8>().ok()? {
            1 => Some(MenuOption::CreateAccount),
            2 => Some(MenuOption::DepositMoney),
            3 => Some(MenuOption::WithdrawMoney),
            4 => Some(MenuOption::CheckBalance),
            5 => Some(MenuOption::TransferMoney),
            6 => Some(MenuOption::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "\nSelect an option:\n\
1. Create an Account\n\
2. Deposit Money\n\
3. Withdraw Money\n\
4. Check Account Balance\n\
5. Transfer Money\n\
6. Exit";

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// User-facing wording for service errors
fn describe(err: &LedgerError) -> String {
    match err {
        LedgerError::EmptyAccountId => "Account number cannot be empty.".to_string(),
        LedgerError::InvalidAmount { .. } => {
            "Invalid amount. Please enter a positive number.".to_string()
        }
        LedgerError::NegativeInitialBalance(_) => {
            "Invalid balance. Please enter a non-negative number.".to_string()
        }
        LedgerError::DuplicateAccount(_) => "Account number already exists.".to_string(),
        LedgerError::AccountNotFound(_) => "Account not found.".to_string(),
        LedgerError::SameAccount => "Sender and recipient accounts must be different.".to_string(),
        other => format!("Operation failed: {}", other),
    }
}

fn run<R: BufRead, W: Write>(ledger: &Ledger, input: R, output: W) -> io::Result<()> {
    let mut console = Console { input, output };
    console.say("Welcome to Lockstep Ledger!")?;

    loop {
        console.say(MENU)?;
        let Some(choice) = console.prompt("Enter your choice: ")? else {
            return Ok(());
        };
        let Some(option) = MenuOption::parse(&choice) else {
            console.say("Invalid choice. Please try again.")?;
            continue;
        };

        let keep_going = match option {
            MenuOption::CreateAccount => create_account(ledger, &mut console)?,
            MenuOption::DepositMoney => deposit(ledger, &mut console)?,
            MenuOption::WithdrawMoney => withdraw(ledger, &mut console)?,
            MenuOption::CheckBalance => check_balance(ledger, &mut console)?,
            MenuOption::TransferMoney => transfer(ledger, &mut console)?,
            MenuOption::Exit => {
                console.say("Thank you for using Lockstep Ledger. Goodbye!")?;
                return Ok(());
            }
        };
        if !keep_going {
            return Ok(());
        }
    }
}

// ============================================================
// MENU ACTIONS - each returns Ok(false) when input ran out
// ============================================================

fn create_account<R: BufRead, W: Write>(
    ledger: &Ledger,
    console: &mut Console<R, W>,
) -> io::Result<bool> {
    let Some(name) = console.prompt("Enter your name: ")? else {
        return Ok(false);
    };
    let Some(raw_balance) = console.prompt("Enter initial balance: ")? else {
        return Ok(false);
    };
    let Ok(initial_balance) = parse_amount(&raw_balance) else {
        console.say("Invalid balance. Please enter a valid number.")?;
        return Ok(true);
    };
    let Some(account_id) = console.prompt("Enter a unique account number: ")? else {
        return Ok(false);
    };

    let name = (!name.is_empty()).then_some(name.as_str());
    match ledger.create_account(&account_id, name, initial_balance) {
        Ok(_) => console.say("Account created successfully.")?,
        Err(e) => console.say(&describe(&e))?,
    }
    Ok(true)
}

fn deposit<R: BufRead, W: Write>(ledger: &Ledger, console: &mut Console<R, W>) -> io::Result<bool> {
    let Some(account_id) = console.prompt("Enter account number: ")? else {
        return Ok(false);
    };
    let Some(raw_amount) = console.prompt("Enter deposit amount: ")? else {
        return Ok(false);
    };
    let Ok(amount) = parse_amount(&raw_amount) else {
        console.say("Invalid amount. Please enter a valid number.")?;
        return Ok(true);
    };

    match ledger.deposit(&account_id, amount) {
        Ok(balance) => console.say(&format!(
            "Deposit successful. New balance: {}",
            format_currency(balance)
        ))?,
        Err(e) => console.say(&describe(&e))?,
    }
    Ok(true)
}

fn withdraw<R: BufRead, W: Write>(ledger: &Ledger, console: &mut Console<R, W>) -> io::Result<bool> {
    let Some(account_id) = console.prompt("Enter account number: ")? else {
        return Ok(false);
    };
    let Some(raw_amount) = console.prompt("Enter withdrawal amount: ")? else {
        return Ok(false);
    };
    let Ok(amount) = parse_amount(&raw_amount) else {
        console.say("Invalid amount. Please enter a valid number.")?;
        return Ok(true);
    };

    match ledger.withdraw(&account_id, amount) {
        Ok(WithdrawOutcome::Completed { balance }) => console.say(&format!(
            "Withdrawal successful. New balance: {}",
            format_currency(balance)
        ))?,
        Ok(WithdrawOutcome::InsufficientFunds { .. }) => console.say("Insufficient balance.")?,
        Err(e) => console.say(&describe(&e))?,
    }
    Ok(true)
}

fn check_balance<R: BufRead, W: Write>(
    ledger: &Ledger,
    console: &mut Console<R, W>,
) -> io::Result<bool> {
    let Some(account_id) = console.prompt("Enter account number: ")? else {
        return Ok(false);
    };

    match ledger.balance(&account_id) {
        Ok(snapshot) => {
            console.say(&format!(
                "Account Holder: {}",
                snapshot.name.as_deref().unwrap_or("")
            ))?;
            console.say(&format!(
                "Current Balance: {}",
                format_currency(snapshot.balance)
            ))?;
        }
        Err(e) => console.say(&describe(&e))?,
    }
    Ok(true)
}

fn transfer<R: BufRead, W: Write>(ledger: &Ledger, console: &mut Console<R, W>) -> io::Result<bool> {
    let Some(from) = console.prompt("Enter your account number (sender): ")? else {
        return Ok(false);
    };
    let Some(to) = console.prompt("Enter recipient account number: ")? else {
        return Ok(false);
    };
    let Some(raw_amount) = console.prompt("Enter transfer amount: ")? else {
        return Ok(false);
    };
    let Ok(amount) = parse_amount(&raw_amount) else {
        console.say("Invalid amount. Please enter a valid number.")?;
        return Ok(true);
    };

    match ledger.transfer(&from, &to, amount) {
        Ok(TransferOutcome::Completed(receipt)) => console.say(&format!(
            "Transfer successful. Sender new balance: {}, Recipient new balance: {}",
            format_currency(receipt.sender_balance),
            format_currency(receipt.recipient_balance)
        ))?,
        Ok(TransferOutcome::InsufficientFunds { .. }) => {
            console.say("Insufficient balance in sender account.")?
        }
        Err(LedgerError::AccountNotFound(id)) if id == from => {
            console.say("Sender account not found.")?
        }
        Err(LedgerError::AccountNotFound(_)) => console.say("Recipient account not found.")?,
        Err(e) => console.say(&describe(&e))?,
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}; using default configuration", e);
            AppConfig::default()
        }
    };
    let _log_guard = lockstep_ledger::logging::init_logging(&app_config);

    tracing::info!("Starting Lockstep Ledger in {} mode", env);
    let ledger = Ledger::new(&app_config.ledger);

    let stdin = io::stdin();
    run(&ledger, stdin.lock(), io::stdout())?;

    tracing::info!(accounts = ledger.store().len(), "Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_ledger::LedgerConfig;

    fn session(script: &str) -> (Ledger, String) {
        let ledger = Ledger::new(&LedgerConfig::default());
        let mut out = Vec::new();
        run(&ledger, script.as_bytes(), &mut out).unwrap();
        (ledger, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_menu_option_parse() {
        assert_eq!(MenuOption::parse("1"), Some(MenuOption::CreateAccount));
        assert_eq!(MenuOption::parse(" 6 "), Some(MenuOption::Exit));
        assert_eq!(MenuOption::parse("7"), None);
        assert_eq!(MenuOption::parse("abc"), None);
    }

    #[test]
    fn test_full_session() {
        let script = "1\nJohn Doe\n1000\nACC101\n\
                      1\nJane\n0\nACC102\n\
                      2\nACC101\n500\n\
                      5\nACC101\nACC102\n250.5\n\
                      3\nACC102\n1000\n\
                      4\nACC101\n\
                      6\n";
        let (ledger, out) = session(script);

        assert!(out.contains("Account created successfully."));
        assert!(out.contains("Deposit successful. New balance: $1,500.00"));
        assert!(out.contains(
            "Transfer successful. Sender new balance: $1,249.50, Recipient new balance: $250.50"
        ));
        assert!(out.contains("Insufficient balance."));
        assert!(out.contains("Account Holder: John Doe"));
        assert!(out.contains("Current Balance: $1,249.50"));
        assert!(out.contains("Goodbye!"));
        assert_eq!(ledger.store().len(), 2);
    }

    #[test]
    fn test_error_messages() {
        let script = "9\n\
                      1\nDup\n10\nACC1\n\
                      1\nDup\n10\nACC1\n\
                      1\nNeg\n-5\nACC2\n\
                      2\nACC1\nxyz\n\
                      2\nNOPE\n5\n\
                      5\nGHOST\nACC1\n5\n\
                      5\nACC1\nACC1\n5\n\
                      5\nACC1\nGHOST\n5\n";
        let (_, out) = session(script);

        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("Account number already exists."));
        assert!(out.contains("Invalid balance. Please enter a non-negative number."));
        assert!(out.contains("Invalid amount. Please enter a valid number."));
        assert!(out.contains("Account not found."));
        assert!(out.contains("Sender account not found."));
        assert!(out.contains("Sender and recipient accounts must be different."));
        assert!(out.contains("Recipient account not found."));
    }

    #[test]
    fn test_eof_ends_session() {
        let (_, out) = session("1\nHalf");
        assert!(out.contains("Enter initial balance: "));
        assert!(!out.contains("Goodbye!"));
    }
}
