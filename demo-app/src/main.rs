use std::sync::Arc;

use axum::{Router, response::Html, routing::get};

use gatekeeper_axum::{
    CurrentUser, HostedIdentityProvider, SharedProvider, auth_router, gatekeeper_pipeline,
};

mod server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_app");

    let provider: SharedProvider = Arc::new(HostedIdentityProvider::from_env()?);

    let app = Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/signup", get(signup))
        .route("/dashboard", get(dashboard))
        .merge(auth_router(provider.clone()))
        .layer(axum::middleware::from_fn_with_state(
            provider,
            gatekeeper_pipeline,
        ));

    let server = server::spawn_http_server(3000, app);
    server.await?;
    Ok(())
}

async fn home() -> Html<&'static str> {
    Html(r#"<h1>Home</h1><p><a href="/login">Log in</a> or <a href="/signup">Sign up</a></p>"#)
}

async fn login() -> Html<&'static str> {
    Html(r#"<h1>Log in</h1><p>POST {email, password} to /api/auth/signin with the csrf-token cookie mirrored in X-CSRF-Token.</p>"#)
}

async fn signup() -> Html<&'static str> {
    Html(r#"<h1>Sign up</h1><p>POST {email, password} to /api/auth/signup with the csrf-token cookie mirrored in X-CSRF-Token.</p>"#)
}

async fn dashboard(user: CurrentUser) -> Html<String> {
    Html(format!("<h1>Dashboard</h1><p>Signed in as {}</p>", user.0.email))
}
