//! Server command.

use console::style;

use crate::config::Settings;
use crate::repository::migrations::run_migrations;

/// Run migrations and start the API server.
pub async fn cmd_serve(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = match bind {
        Some(bind) => parse_bind_address(bind, settings.port)?,
        None => ("127.0.0.1".to_string(), settings.port),
    };

    println!("{} Preparing database...", style("→").cyan());
    let pool = settings.create_pool();
    match run_migrations(pool.database_url()).await {
        Ok(()) => {
            println!("  {} Database ready", style("✓").green());
        }
        Err(e) => {
            eprintln!("  {} Migration failed: {}", style("✗").red(), e);
            return Err(anyhow::anyhow!("Database initialization failed: {}", e));
        }
    }

    println!(
        "{} Starting GitBoost pre-launch server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Blueprint generator (1/IP/day) + email capture");
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3001" -> 127.0.0.1:3001
/// - Just a host: "0.0.0.0" -> 0.0.0.0:<default>
/// - Host and port: "0.0.0.0:3001" -> 0.0.0.0:3001
fn parse_bind_address(bind: &str, default_port: u16) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    Ok((bind.to_string(), default_port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_forms() {
        assert_eq!(
            parse_bind_address("3001", 3001).unwrap(),
            ("127.0.0.1".to_string(), 3001)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0", 3001).unwrap(),
            ("0.0.0.0".to_string(), 3001)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:8080", 3001).unwrap(),
            ("0.0.0.0".to_string(), 8080)
        );
    }
}
