use tracing_subscriber::EnvFilter;

const SERVER_HOST: &str = "176.96.131.170";
const SERVER_PORT: u16 = 3030;
const SECURE: bool = true;

// Certificate validation name; the connection itself goes to SERVER_HOST.
const SERVER_NAME: &str = "screenshotpaylas.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    chatr_client::run(SERVER_HOST, SERVER_PORT, SECURE, SERVER_NAME).await?;

    Ok(())
}
