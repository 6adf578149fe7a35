//! Page views behind the route guard
//!
//! `open` is the navigator: it runs the guard for the requested page and
//! either renders it or follows the redirect to the sign-in page.

use anyhow::Result;
use serde_json::Value;
use splitalgo_core::{GuardState, Route, RouteGuard};
use splitalgo_http::types::Group;
use tracing::debug;

use crate::commands::App;

/// Navigate to `route`, following at most one redirect
pub async fn open(app: &App, route: Route) -> Result<()> {
    let mut guard = RouteGuard::new(route);

    match guard.evaluate(&app.session.check()) {
        GuardState::Redirecting(redirect) => {
            println!("Redirecting to {} (return to {})", redirect.to, redirect.from);
            guard.navigate(redirect.to);
            guard.evaluate(&app.session.check());
            if guard.renders() {
                render(app, guard.route(), Some(redirect.from)).await?;
            }
            Ok(())
        }
        GuardState::Allowed => render(app, guard.route(), None).await,
        GuardState::Checking => Ok(()),
    }
}

async fn render(app: &App, route: Route, return_to: Option<Route>) -> Result<()> {
    debug!(%route, "Rendering page");
    match route {
        Route::Home => {
            render_home(app);
            Ok(())
        }
        Route::Login => {
            println!("{}", login_hint(return_to));
            Ok(())
        }
        Route::Register => {
            println!(
                "Create an account: splitalgo register --email <EMAIL> --password <PASSWORD> \
                 --confirm-password <PASSWORD> --accept-terms"
            );
            Ok(())
        }
        Route::Dashboard => render_dashboard(app).await,
        Route::Groups => render_groups(app).await,
    }
}

fn render_home(app: &App) {
    println!("SplitAlgo: split shared expenses and settle them on Algorand");
    match app.session.user() {
        Some(user) => println!("Signed in as {}", display_name(&user)),
        None => println!("Sign in with `splitalgo login` or create an account with `splitalgo register`"),
    }
}

async fn render_dashboard(app: &App) -> Result<()> {
    let greeting = app
        .session
        .user()
        .map_or_else(|| "there".to_string(), |user| display_name(&user));
    println!("Welcome back, {greeting}");

    let groups = app.client.list_groups().await?;
    println!("You belong to {} group(s)", groups.len());
    for group in &groups {
        println!("  {}", group_line(group));
    }
    Ok(())
}

async fn render_groups(app: &App) -> Result<()> {
    let groups = app.client.list_groups().await?;
    if groups.is_empty() {
        println!("No groups yet. Create one with `splitalgo groups create --name <NAME>`");
        return Ok(());
    }
    for group in &groups {
        println!("{}", group_line(group));
    }
    Ok(())
}

fn login_hint(return_to: Option<Route>) -> String {
    let mut hint = "Sign in: splitalgo login --email <EMAIL> --password <PASSWORD>".to_string();
    if let Some(route) = return_to {
        hint.push_str(&format!(" --return-to {route}"));
    }
    hint
}

/// First name when the cached user has one, else the email
fn display_name(user: &Value) -> String {
    ["first_name", "email"]
        .iter()
        .filter_map(|key| user.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or("there")
        .to_string()
}

fn group_line(group: &Group) -> String {
    format!("{}  {}  ({} members)", group.id, group.name, group.member_count)
}
