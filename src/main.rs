use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use car_rental::config::environment::EnvironmentConfig;
use car_rental::database::connection::create_pool;
use car_rental::routes::build_router;
use car_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenvy::dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental API");
    info!("=================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState::with_postgres(config, pool);
    let app = build_router(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Users:");
    info!("   POST /api/users/register - Registro");
    info!("   POST /api/users/login - Login");
    info!("   GET  /api/users/profile - Perfil (auth)");
    info!("   PUT  /api/users/profile - Actualizar perfil (auth)");
    info!("   GET  /api/users - Listar usuarios (admin)");
    info!("   DELETE /api/users/:id - Borrar usuario (admin)");
    info!("🚗 Cars:");
    info!("   GET  /api/cars - Listar coches con filtros");
    info!("   GET  /api/cars/search - Buscar coches");
    info!("   GET  /api/cars/:id - Detalle de coche");
    info!("   POST /api/cars - Crear coche (admin)");
    info!("   PUT  /api/cars/:id - Actualizar coche (admin)");
    info!("   DELETE /api/cars/:id - Borrar coche (admin)");
    info!("📅 Bookings:");
    info!("   POST /api/bookings - Crear reserva (auth)");
    info!("   GET  /api/bookings/my-bookings - Mis reservas (auth)");
    info!("   GET  /api/bookings/:id - Detalle de reserva (auth)");
    info!("   PUT  /api/bookings/:id/cancel - Cancelar reserva (auth)");
    info!("   GET  /api/bookings - Todas las reservas (admin)");
    info!("   PUT  /api/bookings/:id/status - Cambiar estado (admin)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
