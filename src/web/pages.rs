use askama::Template;
use axum::{
    extract::{MatchedPath, State},
    response::Html,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::errors::{AppError, AppResult};

/// One entry of the front-end route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRoute {
    pub path: &'static str,
    pub name: &'static str,
    /// Component the browser app mounts for this path
    pub component: &'static str,
}

pub static PAGE_ROUTES: [PageRoute; 4] = [
    PageRoute {
        path: "/",
        name: "home",
        component: "HomeView",
    },
    PageRoute {
        path: "/register",
        name: "register",
        component: "Register",
    },
    PageRoute {
        path: "/login",
        name: "login",
        component: "Login",
    },
    PageRoute {
        path: "/dashboard",
        name: "dashboard",
        component: "Dashboard",
    },
];

/// Exact-match lookup; no parameters, no fallbacks.
pub fn resolve(path: &str) -> Option<&'static PageRoute> {
    PAGE_ROUTES.iter().find(|route| route.path == path)
}

#[derive(Template)]
#[template(path = "app.html")]
struct AppShell<'a> {
    title: &'a str,
    route: &'a PageRoute,
}

/// Register every page path on the router.
pub fn page_routes() -> Router<AppState> {
    PAGE_ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, get(render_page))
        })
}

async fn render_page(
    State(state): State<AppState>,
    matched: MatchedPath,
) -> AppResult<Html<String>> {
    let route = resolve(matched.as_str()).ok_or(AppError::NotFound)?;

    let shell = AppShell {
        title: &state.app_name,
        route,
    };
    let body = shell
        .render()
        .map_err(|e| AppError::internal(format!("Template render failed: {}", e)))?;

    Ok(Html(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_path_resolves_to_one_component() {
        for route in &PAGE_ROUTES {
            let matches: Vec<_> = PAGE_ROUTES.iter().filter(|r| r.path == route.path).collect();
            assert_eq!(matches.len(), 1, "duplicate path {}", route.path);
            assert_eq!(resolve(route.path), Some(route));
        }
    }

    #[test]
    fn test_route_table() {
        let table: Vec<_> = PAGE_ROUTES
            .iter()
            .map(|r| (r.path, r.name, r.component))
            .collect();

        assert_eq!(
            table,
            vec![
                ("/", "home", "HomeView"),
                ("/register", "register", "Register"),
                ("/login", "login", "Login"),
                ("/dashboard", "dashboard", "Dashboard"),
            ]
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert!(resolve("/profile").is_none());
        assert!(resolve("/login/").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_shell_mounts_component() {
        let shell = AppShell {
            title: "auth-portal",
            route: &PAGE_ROUTES[3],
        };
        let html = shell.render().unwrap();

        assert!(html.contains(r#"data-component="Dashboard""#));
        assert!(html.contains(r#"data-route="dashboard""#));
        assert!(html.contains("<title>auth-portal</title>"));
    }
}
