//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use serde::Serialize;
use splitalgo_core::identity;
use splitalgo_core::routes::post_login_destination;
use splitalgo_core::{
    CredentialOutcome, ExternalCredential, FileStorage, IdentityProvider, LoginForm, RegisterForm,
    Route, Session, SessionCheck,
};
use splitalgo_http::types::CreateGroupRequest;
use splitalgo_http::{ApiClient, AuthService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::state_dir::StateDir;
use crate::views;

/// Everything a command needs: the persistent session and a client bound to it
pub struct App {
    pub session: Session,
    pub client: ApiClient,
    session_path: PathBuf,
}

impl App {
    /// Open the session file and build the API client
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created or the
    /// configured API URL is unusable
    pub fn open(state_dir: &StateDir, config: &CliConfig) -> Result<Self> {
        let storage = FileStorage::open(state_dir.session_path())?;
        let session_path = storage.path().to_path_buf();
        let session = Session::new(Arc::new(storage));

        let mut builder = ApiClient::builder()
            .base_url(config.api_url.as_str())
            .session(session.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            session,
            client: builder.build()?,
            session_path,
        })
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SPLITALGO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Must match --password
        #[arg(long)]
        confirm_password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        /// Accept the Terms of Service and Privacy Policy
        #[arg(long)]
        accept_terms: bool,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SPLITALGO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Page to open after signing in (defaults to /dashboard)
        #[arg(long)]
        return_to: Option<String>,
    },

    /// Hand over a Google sign-in credential
    LoginGoogle {
        /// ID token returned by the Google sign-in widget
        #[arg(long)]
        credential: String,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// Fetch the signed-in account from the API
    Me,

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        command: WalletCommands,
    },

    /// Group operations
    Groups {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Expense operations
    Expenses {
        #[command(subcommand)]
        command: ExpenseCommands,
    },

    /// Settlement operations
    Settlements {
        #[command(subcommand)]
        command: SettlementCommands,
    },

    /// Open a page: /, /home, /login, /register, /dashboard or /groups
    Open { path: String },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Attach a wallet address to the account
    Connect { address: String },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List groups you belong to
    List,

    /// Create a group
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show a group with its members
    Show { group_id: String },

    /// Add a user to a group
    AddMember { group_id: String, user_id: String },

    /// Remove a member from a group
    RemoveMember { group_id: String, member_id: String },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense paid by you
    Add {
        group_id: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,
    },

    /// List a group's expenses
    List { group_id: String },
}

#[derive(Subcommand)]
pub enum SettlementCommands {
    /// Compute who owes whom in a group
    Calculate { group_id: String },

    /// Show a settlement
    Show { settlement_id: String },

    /// Execute a calculated settlement
    Execute { settlement_id: String },
}

impl Commands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Register {
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                accept_terms,
            } => {
                let form = RegisterForm {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                    accept_terms,
                };
                let response = app.auth().register(&form).await?;
                println!("Account created for {}", form.email.trim());
                info!(token_type = ?response.token_type, "Registered");
                land(app, post_login_destination(None)).await;
                Ok(())
            }
            Self::Login {
                email,
                password,
                return_to,
            } => {
                // Resolve before submitting so a typo does not cost a login
                let return_to = return_to.as_deref().map(str::parse::<Route>).transpose()?;
                app.auth().login(&LoginForm::new(email, password)).await?;
                println!("Signed in");
                land(app, post_login_destination(return_to)).await;
                Ok(())
            }
            Self::LoginGoogle { credential } => {
                let credential = ExternalCredential::new(IdentityProvider::Google, credential);
                match app.auth().external_credential(&credential) {
                    CredentialOutcome::NotForwarded => {
                        println!("Google credential received; no session was created");
                        Ok(())
                    }
                    CredentialOutcome::Empty => {
                        identity::external_sign_in_failed(IdentityProvider::Google);
                        bail!("Google sign-in failed: the credential was empty")
                    }
                }
            }
            Self::Logout => {
                app.auth().logout();
                println!("Signed out");
                Ok(())
            }
            Self::Status => {
                print_status(app);
                Ok(())
            }
            Self::Me => print_json(&app.client.me().await?),
            Self::Wallet { command } => command.execute(app).await,
            Self::Groups { command } => command.execute(app).await,
            Self::Expenses { command } => command.execute(app).await,
            Self::Settlements { command } => command.execute(app).await,
            Self::Open { path } => views::open(app, path.parse()?).await,
        }
    }
}

impl WalletCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Connect { address } => {
                let response = app.client.connect_wallet(address).await?;
                println!("{}", response.message);
                Ok(())
            }
        }
    }
}

impl GroupCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::List => views::open(app, Route::Groups).await,
            Self::Create { name, description } => {
                let group = app
                    .client
                    .create_group(&CreateGroupRequest { name, description })
                    .await?;
                print_json(&group)
            }
            Self::Show { group_id } => print_json(&app.client.get_group(&group_id).await?),
            Self::AddMember { group_id, user_id } => {
                print_json(&app.client.add_member(&group_id, user_id).await?)
            }
            Self::RemoveMember {
                group_id,
                member_id,
            } => print_json(&app.client.remove_member(&group_id, &member_id).await?),
        }
    }
}

impl ExpenseCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Add {
                group_id,
                amount,
                description,
            } => print_json(
                &app.client
                    .add_expense(&group_id, amount, description)
                    .await?,
            ),
            Self::List { group_id } => print_json(&app.client.list_expenses(&group_id).await?),
        }
    }
}

impl SettlementCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Calculate { group_id } => {
                print_json(&app.client.calculate_settlement(&group_id).await?)
            }
            Self::Show { settlement_id } => {
                print_json(&app.client.get_settlement(&settlement_id).await?)
            }
            Self::Execute { settlement_id } => {
                print_json(&app.client.execute_settlement(&settlement_id).await?)
            }
        }
    }
}

/// Open the page reached after signing in
///
/// The session is already stored at this point, so a page that fails to load
/// is reported without failing the command.
async fn land(app: &App, route: Route) {
    if let Err(err) = views::open(app, route).await {
        warn!(%route, error = %err, "Signed in but the landing page failed to load");
        eprintln!("Could not load {route}: {err}");
    }
}

fn print_status(app: &App) {
    println!("API: {}", app.client.base_url());
    println!("Session file: {}", app.session_path.display());
    match app.session.check() {
        SessionCheck::Authorized(session) => {
            let email = session
                .user
                .as_ref()
                .and_then(|user| user.get("email"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown user");
            println!("Signed in as {email}");
        }
        SessionCheck::Unauthorized => println!("Not signed in"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
