use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::routes::{
    create_medical_record, dashboard, health_check, list_appointments, list_doctors,
    list_medical_records, list_patients, register_patient, schedule_appointment,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let connection = get_connection_pool(&config.database);
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, connection)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.with_db())
}

pub fn run(listener: TcpListener, db_pool: PgPool) -> Result<Server, anyhow::Error> {
    let connection: web::Data<PgPool> = web::Data::new(db_pool);
    let server: Server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(
                web::scope("/patients")
                    .route("", web::get().to(list_patients))
                    .route("", web::post().to(register_patient)),
            )
            .service(
                web::scope("/appointments")
                    .route("", web::get().to(list_appointments))
                    .route("", web::post().to(schedule_appointment)),
            )
            .service(
                web::scope("/medical_records")
                    .route("", web::get().to(list_medical_records))
                    .route("", web::post().to(create_medical_record)),
            )
            .route("/doctors", web::get().to(list_doctors))
            .route("/dashboard", web::get().to(dashboard))
            .route("/health_check", web::get().to(health_check))
            .app_data(connection.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
