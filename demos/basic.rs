use dragon_conf::{AppContext, Config};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DatabaseSection {
    host: String,
    port: u16,
    pool_size: u32,
}

fn main() -> Result<(), dragon_conf::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Populate once, then share read-only
    let ctx = AppContext::builder()
        .with_config(
            Config::builder()
                .with_file("demos/default.json", "", false)
                .with_optional_file("demos/local.json", "", true)
                .with_env("DEMO_", "env", true)
                .with_default("pool_size", 8, "database", false),
        )
        .build()?;

    let config = ctx.config();

    println!(
        "App: {} (debug={}, tags={:?})",
        config.get_string("app.name"),
        config.get_bool("app.debug"),
        config.get_string_array("app.tags"),
    );

    let database: DatabaseSection = config.extract("database")?;
    println!("Database: {database:?}");

    for key in config.keys().filter(|k| k.starts_with("env.")) {
        println!("{key} is set");
    }

    Ok(())
}
