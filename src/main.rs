use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use anyhow::Context;

use crate::config::Config;
use crate::models::Response;
use crate::repository::database::Database;

mod api;
mod config;
mod error;
mod models;
mod repository;
mod telemetry;

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    let response = Response {
        message: "Resource not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_subscriber(env!("CARGO_PKG_NAME"), "INFO")?;

    let todo_db = Database::new(&config).context("failed to open the todo database")?;
    let app_data = web::Data::new(todo_db);

    tracing::info!(host = %config.host, port = config.port, "starting http server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(api::todo::config)
            .service(healthcheck)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_healthcheck() {
        let app = test::init_service(App::new().service(healthcheck)).await;
        let req = TestRequest::default().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());
    }

    #[actix_web::test]
    async fn test_unknown_route_is_json_not_found() {
        let app = test::init_service(
            App::new()
                .service(healthcheck)
                .default_service(web::route().to(not_found)),
        )
        .await;
        let req = TestRequest::default().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, resp.status());
        let body: Response = test::read_body_json(resp).await;
        assert_eq!(body.message, "Resource not found");
    }
}
