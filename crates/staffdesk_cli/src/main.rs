//! Operator CLI for the staffdesk portal document.
//!
//! # Usage
//!
//! ```bash
//! # Remote document (reads STAFFDESK_BIN_ID / STAFFDESK_MASTER_KEY)
//! staffdesk summary
//!
//! # Local SQLite document
//! staffdesk --local ./portal.db employees --store riomar
//! staffdesk --local ./portal.db login --id 1001 --password secret
//!
//! # Mutations are gated by an admin login
//! staffdesk --local ./portal.db admin --admin-id admin --admin-password admin123 \
//!     add-store --name "North Way" --code "North Way"
//! staffdesk --local ./portal.db passwd --id 1001 --current secret --new s3cret --confirm s3cret
//! ```

use clap::{Parser, Subcommand};
use log::error;
use staffdesk_core::{
    init_console_logging, AccountService, AdminService, Dataset, DocumentStore, EmployeeUpdate,
    JsonBinStore, NewEmployee, NewPayslip, NewStore, PasswordChange, PortalRepository,
    RemoteStoreConfig, Role, SqliteDocumentStore, StoreFilter,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(version, about = "Inspect and verify the staffdesk portal document")]
struct Cli {
    /// Use a local SQLite document file instead of the remote store
    #[arg(long, global = true)]
    local: Option<PathBuf>,

    /// Log level written to stderr (trace|debug|info|warn|error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the core library is linked
    Ping,
    /// Print collection sizes and per-store headcounts
    Summary,
    /// Check a login id/password pair
    Login {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },
    /// List stores
    Stores,
    /// List non-admin employees
    Employees {
        /// Restrict to one store code
        #[arg(long)]
        store: Option<String>,
    },
    /// List payslips
    Payslips {
        /// Restrict to one store code
        #[arg(long)]
        store: Option<String>,
    },
    /// Change an account's own password
    Passwd {
        #[arg(long)]
        id: String,
        #[arg(long)]
        current: String,
        #[arg(long = "new")]
        new_password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Modify stores, employees or payslips as an administrator
    Admin {
        #[arg(long)]
        admin_id: String,
        #[arg(long)]
        admin_password: String,
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Register a store; the code is lowercased with whitespace removed
    AddStore {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },
    /// Delete a store that has no employees, with its payslips
    DeleteStore {
        #[arg(long)]
        code: String,
    },
    /// Register an employee in an existing store
    AddEmployee {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        store: String,
        #[arg(long)]
        password: String,
    },
    /// Update an employee; omit --password to keep the current one
    EditEmployee {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        store: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Delete an employee with their payslips
    DeleteEmployee {
        #[arg(long)]
        id: String,
    },
    /// Publish a payslip link (month as YYYY-MM)
    AddPayslip {
        #[arg(long)]
        store: String,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        month: String,
        #[arg(long)]
        link: String,
    },
    /// Delete one payslip
    DeletePayslip {
        #[arg(long)]
        id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_console_logging(&cli.log_level) {
        eprintln!("logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    if matches!(cli.command, Command::Ping) {
        println!("staffdesk_core ping={}", staffdesk_core::ping());
        println!("staffdesk_core version={}", staffdesk_core::core_version());
        return ExitCode::SUCCESS;
    }

    let result = match &cli.local {
        Some(path) => SqliteDocumentStore::open(path)
            .map_err(|err| err.to_string())
            .and_then(|store| run(PortalRepository::open(store), &cli.command)),
        None => RemoteStoreConfig::from_env()
            .map_err(|err| err.to_string())
            .and_then(|config| JsonBinStore::new(config).map_err(|err| err.to_string()))
            .and_then(|store| run(PortalRepository::open(store), &cli.command)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run<S: DocumentStore>(mut repo: PortalRepository<S>, command: &Command) -> Result<(), String> {
    match command {
        Command::Ping => Ok(()),
        Command::Summary => {
            print_summary(repo.snapshot());
            Ok(())
        }
        Command::Login { id, password } => {
            let account = AccountService::new(&mut repo);
            let session = account.login(id, password).map_err(|err| err.to_string())?;
            let role = match session.role {
                Role::Admin => "admin",
                Role::Employee => "employee",
            };
            println!("{}\t{}\t{role}", session.employee.id, session.employee.name);
            Ok(())
        }
        Command::Stores => {
            for store in &repo.snapshot().stores {
                println!("{}\t{}\t{}", store.id, store.name, store.employee_count());
            }
            Ok(())
        }
        Command::Employees { store } => {
            let snapshot = repo.snapshot();
            for employee in snapshot.employees_in_store(filter_for(store.as_deref())) {
                println!(
                    "{}\t{}\t{}",
                    employee.id,
                    employee.name,
                    snapshot.store_name(&employee.store_id)
                );
            }
            Ok(())
        }
        Command::Payslips { store } => {
            let snapshot = repo.snapshot();
            for payslip in snapshot.payslips_in_store(filter_for(store.as_deref())) {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    payslip.id,
                    snapshot.employee_name(&payslip.employee_id),
                    snapshot.store_name(&payslip.store_id),
                    payslip.month,
                    payslip.pdf_link
                );
            }
            Ok(())
        }
        Command::Passwd {
            id,
            current,
            new_password,
            confirm,
        } => {
            let mut account = AccountService::new(&mut repo);
            let change = PasswordChange {
                current: current.clone(),
                new_password: new_password.clone(),
                confirmation: confirm.clone(),
            };
            account
                .change_password(id, &change)
                .map_err(|err| err.to_string())?;
            println!("password updated for {id}");
            Ok(())
        }
        Command::Admin {
            admin_id,
            admin_password,
            action,
        } => {
            let session = AccountService::new(&mut repo)
                .login(admin_id, admin_password)
                .map_err(|err| err.to_string())?;
            if session.role != Role::Admin {
                return Err(format!("account {admin_id} is not an administrator"));
            }
            run_admin(&mut AdminService::new(&mut repo), action)
        }
    }
}

fn run_admin<S: DocumentStore>(
    admin: &mut AdminService<'_, S>,
    action: &AdminAction,
) -> Result<(), String> {
    match action {
        AdminAction::AddStore { name, code } => {
            let store = admin
                .add_store(&NewStore {
                    name: name.clone(),
                    code: code.clone(),
                })
                .map_err(|err| err.to_string())?;
            println!("{}\t{}", store.id, store.name);
        }
        AdminAction::DeleteStore { code } => {
            admin.delete_store(code).map_err(|err| err.to_string())?;
            println!("deleted store {code}");
        }
        AdminAction::AddEmployee {
            id,
            name,
            store,
            password,
        } => {
            let employee = admin
                .add_employee(&NewEmployee {
                    id: id.clone(),
                    name: name.clone(),
                    store_id: store.clone(),
                    password: password.clone(),
                })
                .map_err(|err| err.to_string())?;
            println!("{}\t{}\t{}", employee.id, employee.name, employee.store_id);
        }
        AdminAction::EditEmployee {
            id,
            name,
            store,
            password,
        } => {
            let update = EmployeeUpdate {
                name: name.clone(),
                store_id: store.clone(),
                password: password.clone(),
            };
            let employee = admin
                .edit_employee(id, &update)
                .map_err(|err| err.to_string())?;
            println!("{}\t{}\t{}", employee.id, employee.name, employee.store_id);
        }
        AdminAction::DeleteEmployee { id } => {
            admin.delete_employee(id).map_err(|err| err.to_string())?;
            println!("deleted employee {id}");
        }
        AdminAction::AddPayslip {
            store,
            employee,
            month,
            link,
        } => {
            let payslip = admin
                .add_payslip(&NewPayslip {
                    store_id: store.clone(),
                    employee_id: employee.clone(),
                    month: month.clone(),
                    link: link.clone(),
                })
                .map_err(|err| err.to_string())?;
            println!("{}\t{}\t{}", payslip.id, payslip.employee_id, payslip.month);
        }
        AdminAction::DeletePayslip { id } => {
            admin.delete_payslip(id).map_err(|err| err.to_string())?;
            println!("deleted payslip {id}");
        }
    }
    Ok(())
}

fn filter_for(store: Option<&str>) -> StoreFilter<'_> {
    store.map_or(StoreFilter::All, StoreFilter::Store)
}

fn print_summary(snapshot: &Dataset) {
    println!("stores={}", snapshot.stores.len());
    println!("employees={}", snapshot.employees_in_store(StoreFilter::All).len());
    println!("payslips={}", snapshot.payslips.len());
    for store in &snapshot.stores {
        println!("  {}\t{}\t{}", store.id, store.name, store.employee_count());
    }
}
